//! bitspi-linux-gpio - Linux GPIO character-device port
//!
//! This crate drives the bitspi transfer engine through ordinary GPIO
//! pins using the gpiocdev crate, which implements the modern Linux GPIO
//! character device interface (replacing the deprecated sysfs one).
//!
//! # Example
//!
//! ```no_run
//! use bitspi_core::{engine::SpiEngine, Mode};
//! use bitspi_linux_gpio::{LinuxGpioConfig, LinuxGpioPort};
//!
//! // The offsets below match the Raspberry Pi's hardware SPI0 pins, so
//! // existing CS0 wiring can be reused with the controller left idle.
//! let config = LinuxGpioConfig::new("/dev/gpiochip0", 8, 11, 10, 9);
//! //                                 device          CS SCK MOSI MISO
//! let port = LinuxGpioPort::open(&config)?;
//!
//! let mode = Mode::mode0(8)?;
//! let mut engine = SpiEngine::new(port)?;
//! let received = engine.transfer(0x0F, &mode)?;
//! println!("received 0x{:02X}", received);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # GPIO Pin Wiring
//!
//! | Slave pin | Line              | Direction |
//! |-----------|-------------------|-----------|
//! | CS#       | chip select       | output    |
//! | SCK       | clock             | output    |
//! | DI/MOSI   | data out          | output    |
//! | DO/MISO   | data in           | input     |
//!
//! # System Requirements
//!
//! - Linux kernel 4.8+ with GPIO character device support
//! - Access to `/dev/gpiochipN` devices (may require root or udev rules)

pub mod device;
pub mod error;

// Re-exports
pub use device::{parse_options, LinuxGpioConfig, LinuxGpioPort};
pub use error::{LinuxGpioError, Result};

use std::path::PathBuf;

/// Open a port from a comma-separated option string
///
/// This is a convenience function for CLI dispatch, e.g.
/// `dev=/dev/gpiochip0,cs=8,sck=11,mosi=10,miso=9`.
pub fn open_from_option_string(options: &str) -> Result<LinuxGpioPort> {
    let mut pairs = Vec::new();
    for item in options.split(',').filter(|s| !s.is_empty()) {
        match item.split_once('=') {
            Some((key, value)) => pairs.push((key, value)),
            None => {
                return Err(LinuxGpioError::InvalidParameter {
                    name: "port",
                    value: item.to_string(),
                })
            }
        }
    }
    let config = parse_options(&pairs)?;
    LinuxGpioPort::open(&config)
}

/// List the GPIO character devices present on this system
pub fn available_chips() -> Result<Vec<PathBuf>> {
    let mut chips: Vec<PathBuf> = std::fs::read_dir("/dev")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| {
                    name.strip_prefix("gpiochip")
                        .is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()) && !n.is_empty())
                })
        })
        .collect();
    chips.sort();
    Ok(chips)
}

//! Linux GPIO port implementation
//!
//! Implements the bitspi [`BitbangPort`] trait on top of the Linux GPIO
//! character device interface (gpiocdev). The four SPI lines are
//! requested once at open time with SPI-idle levels; the transfer engine
//! then drives them level by level.

use crate::error::{LinuxGpioError, Result};

use gpiocdev::line::{Offset, Value};
use gpiocdev::request::{Config, Request};

use bitspi_core::error::{Error, Result as CoreResult};
use bitspi_core::port::{BitbangPort, Direction, Line};

/// Configuration for opening a Linux GPIO port
#[derive(Debug, Clone, Default)]
pub struct LinuxGpioConfig {
    /// Device path (e.g., "/dev/gpiochip0")
    pub device: String,
    /// Chip-select GPIO line offset
    pub cs: Offset,
    /// Clock GPIO line offset
    pub sck: Offset,
    /// Data-out (MOSI) GPIO line offset
    pub mosi: Offset,
    /// Data-in (MISO) GPIO line offset
    pub miso: Offset,
}

impl LinuxGpioConfig {
    /// Create a configuration from a device path and the four line offsets
    pub fn new(
        device: impl Into<String>,
        cs: Offset,
        sck: Offset,
        mosi: Offset,
        miso: Offset,
    ) -> Self {
        Self {
            device: device.into(),
            cs,
            sck,
            mosi,
            miso,
        }
    }
}

/// Linux GPIO bit-bang port
///
/// Holds the gpiocdev line request for the port's lifetime; dropping the
/// port releases the lines back to the system.
pub struct LinuxGpioPort {
    request: Request,
    offsets: [Offset; 4],
}

fn index(line: Line) -> usize {
    match line {
        Line::ChipSelect => 0,
        Line::Clock => 1,
        Line::DataOut => 2,
        Line::DataIn => 3,
    }
}

impl LinuxGpioPort {
    /// Open a Linux GPIO port with the given configuration
    ///
    /// Initial state: CS high (slave deselected), SCK and MOSI low, MISO
    /// requested as input.
    pub fn open(config: &LinuxGpioConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }

        log::debug!("linux_gpio: opening device {}", config.device);

        let mut req_config = Config::default();
        req_config.with_line(config.cs).as_output(Value::Active); // CS starts high (deselected)
        req_config.with_line(config.sck).as_output(Value::Inactive);
        req_config.with_line(config.mosi).as_output(Value::Inactive);
        req_config.with_line(config.miso).as_input();

        let request = Request::from_config(req_config)
            .on_chip(&config.device)
            .with_consumer("bitspi")
            .request()
            .map_err(LinuxGpioError::LineRequestFailed)?;

        log::info!(
            "linux_gpio: opened {} (cs={}, sck={}, mosi={}, miso={})",
            config.device,
            config.cs,
            config.sck,
            config.mosi,
            config.miso,
        );

        Ok(Self {
            request,
            offsets: [config.cs, config.sck, config.mosi, config.miso],
        })
    }

    fn offset(&self, line: Line) -> Offset {
        self.offsets[index(line)]
    }
}

impl BitbangPort for LinuxGpioPort {
    fn configure_direction(&mut self, line: Line, direction: Direction) -> CoreResult<()> {
        let offset = self.offset(line);
        let mut cfg = Config::default();
        match direction {
            Direction::Input => {
                cfg.with_line(offset).as_input();
            }
            Direction::Output => {
                // outputs come up at their SPI-idle level
                let idle = match line {
                    Line::ChipSelect => Value::Active,
                    _ => Value::Inactive,
                };
                cfg.with_line(offset).as_output(idle);
            }
        }
        self.request.reconfigure(&cfg).map_err(|e| {
            log::error!("linux_gpio: failed to reconfigure {:?}: {}", line, e);
            Error::PortError
        })?;
        Ok(())
    }

    fn write_level(&mut self, line: Line, high: bool) -> CoreResult<()> {
        let value = if high { Value::Active } else { Value::Inactive };
        self.request.set_value(self.offset(line), value).map_err(|e| {
            log::error!("linux_gpio: failed to set {:?}: {}", line, e);
            Error::PortError
        })?;
        Ok(())
    }

    fn read_level(&mut self, line: Line) -> CoreResult<bool> {
        match self.request.value(self.offset(line)) {
            Ok(value) => Ok(value == Value::Active),
            Err(e) => {
                log::error!("linux_gpio: failed to get {:?}: {}", line, e);
                Err(Error::PortError)
            }
        }
    }

    fn wait_ms(&mut self, duration_ms: u64) {
        std::thread::sleep(std::time::Duration::from_millis(duration_ms));
    }
}

fn parse_offset(name: &'static str, value: &str) -> Result<Offset> {
    value.parse().map_err(|_| LinuxGpioError::InvalidParameter {
        name,
        value: value.to_string(),
    })
}

/// Parse port options from a list of key-value pairs
///
/// # Supported Options
///
/// - `dev=/dev/gpiochipN` - GPIO chip device path (required, or use gpiochip)
/// - `gpiochip=N` - GPIO chip number (alternative to dev)
/// - `cs=N` - chip-select GPIO line offset (required)
/// - `sck=N` - clock GPIO line offset (required)
/// - `mosi=N` - data-out GPIO line offset (required)
/// - `miso=N` - data-in GPIO line offset (required)
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxGpioConfig> {
    let mut config = LinuxGpioConfig::default();
    let mut have_cs = false;
    let mut have_sck = false;
    let mut have_mosi = false;
    let mut have_miso = false;
    let mut gpiochip: Option<u32> = None;

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "gpiochip" => {
                gpiochip = Some(parse_offset("gpiochip", value)?);
            }
            "cs" => {
                config.cs = parse_offset("cs", value)?;
                have_cs = true;
            }
            "sck" => {
                config.sck = parse_offset("sck", value)?;
                have_sck = true;
            }
            "mosi" => {
                config.mosi = parse_offset("mosi", value)?;
                have_mosi = true;
            }
            "miso" => {
                config.miso = parse_offset("miso", value)?;
                have_miso = true;
            }
            _ => {
                return Err(LinuxGpioError::UnknownOption {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    if config.device.is_empty() {
        match gpiochip {
            Some(n) => config.device = format!("/dev/gpiochip{}", n),
            None => return Err(LinuxGpioError::NoDevice),
        }
    } else if gpiochip.is_some() {
        return Err(LinuxGpioError::ConflictingDevice);
    }

    if !have_cs {
        return Err(LinuxGpioError::MissingParameter("cs"));
    }
    if !have_sck {
        return Err(LinuxGpioError::MissingParameter("sck"));
    }
    if !have_mosi {
        return Err(LinuxGpioError::MissingParameter("mosi"));
    }
    if !have_miso {
        return Err(LinuxGpioError::MissingParameter("miso"));
    }

    Ok(config)
}

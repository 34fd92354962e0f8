//! Error types for bitspi-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
///
/// Configuration and range errors are raised before any port I/O, so they
/// leave no observable side effect on the lines. A port error occurs
/// mid-transfer; the engine deasserts chip select before surfacing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Bit width outside the supported range (raised at Mode construction)
    InvalidConfiguration {
        /// The rejected bit width
        width: u8,
    },
    /// Output word does not fit in the configured bit width
    ValueOutOfRange {
        /// The rejected word
        data: u32,
        /// The configured bit width
        width: u8,
    },
    /// A line write or read failed in the digital-line driver
    PortError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { width } => {
                write!(f, "invalid bit width {} (supported: 1..=32)", width)
            }
            Self::ValueOutOfRange { data, width } => {
                write!(f, "value 0x{:X} does not fit in {} bits", data, width)
            }
            Self::PortError => write!(f, "digital line write/read failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

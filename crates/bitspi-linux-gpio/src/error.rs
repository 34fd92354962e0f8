//! Error types for Linux GPIO port operations

use thiserror::Error;

/// Linux GPIO port specific errors
#[derive(Debug, Error)]
pub enum LinuxGpioError {
    /// Failed to request GPIO lines
    #[error("Failed to request GPIO lines: {0}")]
    LineRequestFailed(#[source] gpiocdev::Error),

    /// Failed to enumerate GPIO chips
    #[error("Failed to enumerate GPIO chips: {0}")]
    ChipEnumerationFailed(#[from] std::io::Error),

    /// Invalid parameter
    #[error("Invalid value for parameter {name}: {value}")]
    InvalidParameter {
        /// Option key
        name: &'static str,
        /// Rejected value
        value: String,
    },

    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Unknown option key
    #[error("Unknown option: {key}={value}")]
    UnknownOption {
        /// Option key
        key: String,
        /// Option value
        value: String,
    },

    /// GPIO chip or device not specified
    #[error("No GPIO chip specified. Use dev=/dev/gpiochipN or gpiochip=N")]
    NoDevice,

    /// dev= and gpiochip= are mutually exclusive
    #[error("Only one of 'dev' or 'gpiochip' can be specified")]
    ConflictingDevice,
}

/// Result type for Linux GPIO port operations
pub type Result<T> = std::result::Result<T, LinuxGpioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LinuxGpioError::MissingParameter("cs").to_string(),
            "Missing required parameter: cs"
        );
        assert_eq!(
            LinuxGpioError::InvalidParameter {
                name: "sck",
                value: "abc".to_string(),
            }
            .to_string(),
            "Invalid value for parameter sck: abc"
        );
        assert_eq!(
            LinuxGpioError::UnknownOption {
                key: "spispeed".to_string(),
                value: "100".to_string(),
            }
            .to_string(),
            "Unknown option: spispeed=100"
        );
        assert_eq!(
            LinuxGpioError::NoDevice.to_string(),
            "No GPIO chip specified. Use dev=/dev/gpiochipN or gpiochip=N"
        );
    }
}

//! Abstract digital-line port
//!
//! The transfer engine drives SPI through this trait rather than any
//! concrete GPIO library, so backends can be swapped (Linux character
//! device, loopback for tests, ...). The port is resolved once at engine
//! construction and held as an owned dependency.
//!
//! Implementations must apply `write_level` before returning - no
//! buffering - since the half-cycle timing model assumes each write is
//! immediately observable to the slave.

use crate::error::Result;

/// The four lines a software SPI master drives or samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Chip select (active low)
    ChipSelect,
    /// Serial clock
    Clock,
    /// Master out, slave in
    DataOut,
    /// Master in, slave out
    DataIn,
}

/// Direction of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Line is read by the master
    Input,
    /// Line is driven by the master
    Output,
}

/// Trait for low-level digital-line access
///
/// Errors surface as [`crate::Error::PortError`]; backends log the
/// underlying driver detail at the point of failure.
pub trait BitbangPort {
    /// Configure a line as input or output
    fn configure_direction(&mut self, line: Line, direction: Direction) -> Result<()>;

    /// Drive a line to the given level (true = high)
    fn write_level(&mut self, line: Line, high: bool) -> Result<()>;

    /// Read a line's current level (true = high)
    fn read_level(&mut self, line: Line) -> Result<bool>;

    /// Block for roughly the given duration - best effort, no exactness
    /// guarantee
    fn wait_ms(&mut self, duration_ms: u64);
}

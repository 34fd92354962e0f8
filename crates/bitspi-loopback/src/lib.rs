//! bitspi-loopback - In-memory loopback port
//!
//! This crate provides a port that wires data-out straight back to
//! data-in, emulating the classic "connect MISO to MOSI" bench setup. It
//! is useful for exercising the transfer engine end to end without real
//! hardware: since the sample trigger always fires while the line holds
//! the currently written bit, a loopback transfer must return its input
//! unchanged in every mode.
//!
//! The port records every write and counts delay requests, so tests can
//! assert on the exact I/O the engine performed.

use bitspi_core::error::Result;
use bitspi_core::port::{BitbangPort, Direction, Line};

fn index(line: Line) -> usize {
    match line {
        Line::ChipSelect => 0,
        Line::Clock => 1,
        Line::DataOut => 2,
        Line::DataIn => 3,
    }
}

/// Loopback port: data-out externally tied to data-in
#[derive(Debug, Default)]
pub struct LoopbackPort {
    levels: [bool; 4],
    directions: [Option<Direction>; 4],
    writes: Vec<(Line, bool)>,
    waited_ms: u64,
}

impl LoopbackPort {
    /// Create a loopback port with all lines low and unconfigured
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of a line
    pub fn level(&self, line: Line) -> bool {
        match line {
            // the external wire
            Line::DataIn => self.levels[index(Line::DataOut)],
            _ => self.levels[index(line)],
        }
    }

    /// Configured direction of a line, if any
    pub fn direction(&self, line: Line) -> Option<Direction> {
        self.directions[index(line)]
    }

    /// Every `(line, level)` write in order
    pub fn writes(&self) -> &[(Line, bool)] {
        &self.writes
    }

    /// Total time the engine asked to wait
    pub fn waited_ms(&self) -> u64 {
        self.waited_ms
    }

    /// Forget recorded writes and delays (levels are kept)
    pub fn clear_recording(&mut self) {
        self.writes.clear();
        self.waited_ms = 0;
    }
}

impl BitbangPort for LoopbackPort {
    fn configure_direction(&mut self, line: Line, direction: Direction) -> Result<()> {
        self.directions[index(line)] = Some(direction);
        Ok(())
    }

    fn write_level(&mut self, line: Line, high: bool) -> Result<()> {
        self.levels[index(line)] = high;
        self.writes.push((line, high));
        Ok(())
    }

    fn read_level(&mut self, line: Line) -> Result<bool> {
        Ok(self.level(line))
    }

    fn wait_ms(&mut self, duration_ms: u64) {
        // loopback has no real slave to pace; account instead of sleeping
        self.waited_ms += duration_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitspi_core::engine::{EngineConfig, SpiEngine};
    use bitspi_core::Mode;

    #[test]
    fn test_data_in_mirrors_data_out() {
        let mut port = LoopbackPort::new();
        port.write_level(Line::DataOut, true).unwrap();
        assert!(port.read_level(Line::DataIn).unwrap());
        port.write_level(Line::DataOut, false).unwrap();
        assert!(!port.read_level(Line::DataIn).unwrap());
    }

    #[test]
    fn test_engine_configures_directions() {
        let engine = SpiEngine::new(LoopbackPort::new()).unwrap();
        let port = engine.into_port();
        assert_eq!(port.direction(Line::ChipSelect), Some(Direction::Output));
        assert_eq!(port.direction(Line::Clock), Some(Direction::Output));
        assert_eq!(port.direction(Line::DataOut), Some(Direction::Output));
        assert_eq!(port.direction(Line::DataIn), Some(Direction::Input));
        // construction leaves the slave deselected
        assert!(port.level(Line::ChipSelect));
    }

    #[test]
    fn test_round_trip_all_modes() {
        for mode in [
            Mode::mode0(8).unwrap(),
            Mode::mode1(8).unwrap(),
            Mode::mode2(8).unwrap(),
            Mode::mode3(8).unwrap(),
        ] {
            let mut engine = SpiEngine::new(LoopbackPort::new()).unwrap();
            for data in 0..=0xFF {
                assert_eq!(engine.transfer(data, &mode).unwrap(), data);
            }
        }
    }

    #[test]
    fn test_delay_accounting() {
        let mode = Mode::mode0(1).unwrap();
        let config = EngineConfig {
            delay_ms: Some(2),
            record_trace: false,
        };
        let mut engine = SpiEngine::with_config(LoopbackPort::new(), config).unwrap();
        engine.transfer(1, &mode).unwrap();
        // L = 5 half-cycles, 2 ms each
        assert_eq!(engine.into_port().waited_ms(), 10);
    }
}

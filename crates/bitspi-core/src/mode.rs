//! SPI clock-mode configuration
//!
//! A [`Mode`] captures the three parameters that select one of the four
//! standard SPI timing conventions plus the transfer width:
//!
//! - **CPOL** (clock polarity) - the clock line's idle level
//! - **CPHA** (clock phase) - whether data is driven one half-cycle before
//!   the first active clock edge (0) or coincident with it (1)
//! - **bit width** - how many bits one `transfer` call exchanges
//!
//! A mode is validated once at construction and read-only afterwards; it is
//! intended to be built once and reused across many transfers.

use crate::error::{Error, Result};

/// Immutable clock-mode configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    cpol: bool,
    cpha: bool,
    width: u8,
}

impl Mode {
    /// Largest supported bit width (words are `u32`)
    pub const MAX_WIDTH: u8 = 32;

    /// Create a mode from raw CPOL/CPHA levels and a bit width
    ///
    /// Fails with [`Error::InvalidConfiguration`] if `width` is outside
    /// `1..=32`. This is the only place width is validated; transfers
    /// never re-check it.
    pub fn new(cpol: bool, cpha: bool, width: u8) -> Result<Self> {
        if width < 1 || width > Self::MAX_WIDTH {
            return Err(Error::InvalidConfiguration { width });
        }
        Ok(Self { cpol, cpha, width })
    }

    /// SPI mode 0: CPOL=0, CPHA=0 (the most common slave configuration)
    pub fn mode0(width: u8) -> Result<Self> {
        Self::new(false, false, width)
    }

    /// SPI mode 1: CPOL=0, CPHA=1
    pub fn mode1(width: u8) -> Result<Self> {
        Self::new(false, true, width)
    }

    /// SPI mode 2: CPOL=1, CPHA=0
    pub fn mode2(width: u8) -> Result<Self> {
        Self::new(true, false, width)
    }

    /// SPI mode 3: CPOL=1, CPHA=1
    pub fn mode3(width: u8) -> Result<Self> {
        Self::new(true, true, width)
    }

    /// Clock polarity (idle level of the clock line)
    pub fn cpol(&self) -> bool {
        self.cpol
    }

    /// Clock phase
    pub fn cpha(&self) -> bool {
        self.cpha
    }

    /// Transfer width in bits
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Mask covering the `width` low bits of a word
    pub fn word_mask(&self) -> u32 {
        u32::MAX >> (32 - u32::from(self.width))
    }

    /// Length of every half-cycle sequence synthesized for this mode
    ///
    /// One full clock period spans two half-cycles; the data phase takes
    /// `2 * width` half-cycles, plus three for the chip-select envelope.
    pub fn half_cycles(&self) -> usize {
        2 * usize::from(self.width) + 3
    }
}

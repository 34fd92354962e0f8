//! bitspi-core - Software bit-banged SPI master
//!
//! This crate implements an SPI master entirely in software, by toggling
//! generic digital I/O lines. It is useful on hosts that have plain GPIO
//! pins but no SPI controller (or whose controller is reserved for other
//! use), trading raw transfer speed for portability and protocol
//! transparency.
//!
//! The crate is split along the protocol's natural seams:
//!
//! - [`mode`] - immutable clock-mode configuration (CPOL/CPHA/bit width)
//! - [`sequence`] - pure synthesis of the per-transfer half-cycle level
//!   sequences for chip select, clock, data out and the sample trigger
//! - [`port`] - the abstract digital-line port that backends implement
//! - [`engine`] - the transfer engine that replays synthesized sequences
//!   against a port and accumulates the received word
//! - [`waveform`] - optional textual waveform rendering for diagnostics
//!   (requires the `alloc` feature)
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable heap allocation for the waveform renderer
//!
//! # Example
//!
//! ```ignore
//! use bitspi_core::{engine::SpiEngine, mode::Mode, port::BitbangPort};
//!
//! fn exchange<P: BitbangPort>(port: P) -> bitspi_core::Result<u32> {
//!     let mode = Mode::mode0(8)?;
//!     let mut engine = SpiEngine::new(port)?;
//!     engine.transfer(0x0F, &mode)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod engine;
pub mod error;
pub mod mode;
pub mod port;
pub mod sequence;
#[cfg(feature = "alloc")]
pub mod waveform;

pub use error::{Error, Result};
pub use mode::Mode;

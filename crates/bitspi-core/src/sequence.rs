//! Half-cycle sequence synthesis
//!
//! The synthesizer is a pure function from `(output word, mode)` to four
//! equal-length sequences of line levels, one entry per half-cycle:
//!
//! - **select** - chip-select envelope (active low)
//! - **clock** - W complete clock periods inside the envelope
//! - **data_out** - each output bit held across its full clock period
//! - **sample** - the half-cycles at which the input line is captured
//!
//! All four sequences for one transfer share length `2 * width + 3` and are
//! index-aligned: position `i` in each refers to the same physical instant.
//! The transfer engine replays them in lockstep; nothing here performs I/O.

use crate::error::{Error, Result};
use crate::mode::Mode;

/// Capacity of a half-cycle sequence, sized for the widest transfer
pub const MAX_HALF_CYCLES: usize = 2 * Mode::MAX_WIDTH as usize + 3;

/// One line's levels across a whole transfer, one entry per half-cycle
pub type HalfCycleSequence = heapless::Vec<bool, MAX_HALF_CYCLES>;

/// The four index-aligned sequences driving one transfer
///
/// Synthesized fresh per transfer call and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSet {
    /// Chip-select levels (high = slave deselected)
    pub select: HalfCycleSequence,
    /// Clock levels
    pub clock: HalfCycleSequence,
    /// Data-out levels
    pub data_out: HalfCycleSequence,
    /// True at half-cycles where the input line must be sampled
    pub sample: HalfCycleSequence,
}

impl SequenceSet {
    /// Common length of the four sequences
    pub fn len(&self) -> usize {
        self.select.len()
    }

    /// Whether the set is empty (never true for a synthesized set)
    pub fn is_empty(&self) -> bool {
        self.select.is_empty()
    }
}

/// Build one sequence from a closed-form level rule
fn levels(len: usize, rule: impl Fn(usize) -> bool) -> HalfCycleSequence {
    let mut seq = HalfCycleSequence::new();
    for i in 0..len {
        // capacity is MAX_HALF_CYCLES and len <= 2 * MAX_WIDTH + 3
        let _ = seq.push(rule(i));
    }
    seq
}

/// Synthesize the four half-cycle sequences for one transfer
///
/// Pure and deterministic: identical inputs give bit-identical output.
/// Fails with [`Error::ValueOutOfRange`] if `data` does not fit in the
/// mode's bit width; no partial result is produced.
///
/// The construction rules, indexed by half-cycle `i` in `0..2W+3`:
///
/// - select: deselected at index 0, asserted for `1..=2W+1` (the data
///   phase plus one half-cycle margin), deselected again at the end;
/// - clock: idle at CPOL outside the data phase, W low-then-high periods
///   inside it (inverted wholesale for CPOL=1);
/// - data out: the W output bits MSB-first, each doubled to span one full
///   clock period, padded with one leading idle half-cycle for CPHA=0 or
///   two for CPHA=1 so the line either settles before the first active
///   edge or changes coincident with it;
/// - sample: exactly one trigger per clock period, in whichever half the
///   (CPOL, CPHA) convention latches data.
pub fn synthesize(data: u32, mode: &Mode) -> Result<SequenceSet> {
    if data & !mode.word_mask() != 0 {
        return Err(Error::ValueOutOfRange {
            data,
            width: mode.width(),
        });
    }

    let w = usize::from(mode.width());
    let len = mode.half_cycles();
    let cpol = mode.cpol();
    // CPHA=0 drives data one half-cycle ahead of the first active edge,
    // CPHA=1 drives it on that edge
    let pad = if mode.cpha() { 2 } else { 1 };

    let select = levels(len, |i| !(1..=2 * w + 1).contains(&i));
    let clock = levels(len, |i| ((1..=2 * w).contains(&i) && i % 2 == 0) ^ cpol);
    let data_out = levels(len, |i| {
        if (pad..pad + 2 * w).contains(&i) {
            let bit = (i - pad) / 2;
            data >> (w - 1 - bit) & 1 != 0
        } else {
            false
        }
    });
    let sample = levels(len, |i| {
        (pad..pad + 2 * w).contains(&i) && (i - pad) % 2 == 1
    });

    Ok(SequenceSet {
        select,
        clock,
        data_out,
        sample,
    })
}

//! Textual waveform rendering (diagnostic)
//!
//! Converts a recorded level sequence into a two-line Unicode timeline,
//! e.g. for the clock of a W=4, mode 0 transfer:
//!
//! ```text
//!            ┄    ┌─┐ ┌─┐ ┌─┐ ┌─┐
//!     clock  ┄┴───┘ └─┘ └─┘ └─┘ └───
//! ```
//!
//! Rendering is a tiny state machine over the previous level (unknown,
//! low, high) choosing the connector glyphs for each step. Nothing in the
//! transfer engine depends on this module; it only consumes engine output.

use alloc::string::String;

use crate::engine::TransferTrace;
use crate::mode::Mode;

/// Glyph pair (top line, bottom line) for one level step
fn glyphs(previous: Option<bool>, level: bool) -> (&'static str, &'static str) {
    match (previous, level) {
        (None, false) => ("┐ ", "┴─"),
        (None, true) => ("┬─", "┘ "),
        (Some(false), false) => ("  ", "──"),
        (Some(false), true) => ("┌─", "┘ "),
        (Some(true), false) => ("┐ ", "└─"),
        (Some(true), true) => ("──", "  "),
    }
}

/// Render one level sequence as two text lines
///
/// The label prefixes the bottom line; the top line is padded to match so
/// the waveforms stay column-aligned.
pub fn render(levels: &[bool], label: &str) -> (String, String) {
    let gutter = label.chars().count();
    let mut top = String::new();
    let mut bottom = String::new();
    for _ in 0..gutter {
        top.push(' ');
    }
    bottom.push_str(label);
    // sequences start from an unknown level
    top.push('┄');
    bottom.push('┄');
    let mut previous = None;
    for &level in levels {
        let (t, b) = glyphs(previous, level);
        top.push_str(t);
        bottom.push_str(b);
        previous = Some(level);
    }
    (top, bottom)
}

/// Width of the label gutter used by [`render_transfer`]
const GUTTER: usize = 12;

/// Render a whole recorded transfer: the four synthesized sequences, the
/// observed input levels, and the exchanged values
pub fn render_transfer(trace: &TransferTrace, sent: u32, received: u32, mode: &Mode) -> String {
    use core::fmt::Write as _;

    let w = usize::from(mode.width());
    let hex = w.div_ceil(4);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>GUTTER$}b{:0w$b} = x{:0hex$X} = d{}",
        "sent ",
        sent,
        sent,
        sent,
        w = w,
        hex = hex,
    );
    let named = [
        ("select ", &trace.sequences.select),
        ("clock ", &trace.sequences.clock),
        ("data out ", &trace.sequences.data_out),
        ("input ", &trace.input),
        ("trigger ", &trace.sequences.sample),
    ];
    for (name, levels) in named {
        let mut label = String::new();
        for _ in 0..GUTTER.saturating_sub(name.chars().count()) {
            label.push(' ');
        }
        label.push_str(name);
        let (top, bottom) = render(levels, &label);
        let _ = writeln!(out, "{}", top);
        let _ = writeln!(out, "{}", bottom);
    }
    let _ = writeln!(
        out,
        "{:>GUTTER$}b{:0w$b} = x{:0hex$X} = d{}",
        "received ",
        received,
        received,
        received,
        w = w,
        hex = hex,
    );
    out
}

//! CLI argument parsing

use bitspi_core::Mode;
use clap::{Args, Parser, Subcommand};

/// Parse a word given in decimal, hex (0x) or binary (0b)
pub fn parse_word(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else if let Some(bin) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        u32::from_str_radix(bin, 2).map_err(|e| format!("Invalid binary value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

#[derive(Parser)]
#[command(name = "bitspi")]
#[command(author, version, about = "Software bit-banged SPI master", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Clock-mode options shared across commands
#[derive(Args, Debug, Clone, Copy)]
pub struct ModeArgs {
    /// Clock idles high (CPOL=1)
    #[arg(long)]
    pub cpol: bool,

    /// Data changes on the first active clock edge (CPHA=1)
    #[arg(long)]
    pub cpha: bool,

    /// Transfer width in bits (1..=32)
    #[arg(short, long, default_value_t = 8)]
    pub width: u8,
}

impl ModeArgs {
    pub fn to_mode(self) -> bitspi_core::Result<Mode> {
        Mode::new(self.cpol, self.cpha, self.width)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange words with a slave over GPIO lines
    Transfer {
        /// Port options (dev=/dev/gpiochip0,cs=8,sck=11,mosi=10,miso=9)
        #[arg(short, long)]
        port: String,

        #[command(flatten)]
        mode: ModeArgs,

        /// Delay between half-cycles in milliseconds
        #[arg(long)]
        delay: Option<u64>,

        /// Words to send (decimal, 0x hex or 0b binary)
        #[arg(value_parser = parse_word, required = true)]
        values: Vec<u32>,
    },

    /// Run the loopback self-test (no hardware required)
    Selftest {
        /// Widths to sweep (comma-separated)
        #[arg(long, value_delimiter = ',', default_values_t = [1, 4, 8, 16])]
        widths: Vec<u8>,

        /// Try every value up to 2^width instead of the boundary set
        /// (widths above 16 bits always use the boundary set)
        #[arg(long)]
        exhaustive: bool,

        /// Delay between half-cycles in milliseconds
        #[arg(long)]
        delay: Option<u64>,
    },

    /// Print the synthesized waveforms of one loopback transfer
    Trace {
        #[command(flatten)]
        mode: ModeArgs,

        /// Word to transfer (decimal, 0x hex or 0b binary)
        #[arg(value_parser = parse_word)]
        value: u32,
    },

    /// List GPIO character devices
    Chips,
}

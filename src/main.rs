//! bitspi - Software bit-banged SPI master
//!
//! Talks to SPI slave devices using nothing but generic GPIO lines: the
//! clock, data and chip-select waveforms are synthesized in software and
//! replayed pin write by pin write. Useful on hosts without an SPI
//! controller, or when the controller is reserved for other use.
//!
//! Subcommands:
//! - `transfer` - exchange words with real hardware via Linux GPIO
//! - `selftest` - verify the engine against an in-memory loopback port
//! - `trace` - print the synthesized waveforms of one transfer
//! - `chips` - list GPIO character devices on this system

mod cli;

use bitspi_core::engine::{EngineConfig, SpiEngine};
use bitspi_core::{waveform, Mode};
use bitspi_loopback::LoopbackPort;
use clap::Parser;
use cli::{Cli, Commands, ModeArgs};
use indicatif::{ProgressBar, ProgressStyle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Transfer {
            port,
            mode,
            delay,
            values,
        } => run_transfer(&port, mode, delay, &values),
        Commands::Selftest {
            widths,
            exhaustive,
            delay,
        } => run_selftest(&widths, exhaustive, delay),
        Commands::Trace { mode, value } => run_trace(mode, value),
        Commands::Chips => run_chips(),
    }
}

fn print_exchange(sent: u32, received: u32, width: u8) {
    let w = usize::from(width);
    let hex = w.div_ceil(4);
    println!(
        "sent     b{:0w$b} = x{:0hex$X} = d{}",
        sent,
        sent,
        sent,
        w = w,
        hex = hex
    );
    println!(
        "received b{:0w$b} = x{:0hex$X} = d{}",
        received,
        received,
        received,
        w = w,
        hex = hex
    );
}

fn run_transfer(
    port: &str,
    mode_args: ModeArgs,
    delay: Option<u64>,
    values: &[u32],
) -> Result<(), Box<dyn std::error::Error>> {
    let mode = mode_args.to_mode()?;
    let port = bitspi_linux_gpio::open_from_option_string(port)?;
    let config = EngineConfig {
        delay_ms: delay,
        record_trace: false,
    };
    let mut engine = SpiEngine::with_config(port, config)?;

    for &value in values {
        let received = engine.transfer(value, &mode)?;
        print_exchange(value, received, mode.width());
    }

    engine.release()?;
    Ok(())
}

/// Values worth trying for a given mode when not sweeping exhaustively
fn boundary_values(mode: &Mode) -> Vec<u32> {
    let mask = mode.word_mask();
    let mut values = vec![
        0,
        1,
        mask,
        mask >> 1,
        0x0F & mask,
        0xF0 & mask,
        0xAAAA_AAAA & mask,
        0x5555_5555 & mask,
    ];
    values.sort_unstable();
    values.dedup();
    values
}

fn selftest_values(mode: &Mode, exhaustive: bool) -> Vec<u32> {
    if exhaustive && mode.width() <= 16 {
        (0..=mode.word_mask()).collect()
    } else {
        boundary_values(mode)
    }
}

fn run_selftest(
    widths: &[u8],
    exhaustive: bool,
    delay: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    // validate every width up front; mask arithmetic only happens on
    // constructed modes
    let mut sweeps = Vec::new();
    for &width in widths {
        let modes = [
            Mode::mode0(width)?,
            Mode::mode1(width)?,
            Mode::mode2(width)?,
            Mode::mode3(width)?,
        ];
        let values = selftest_values(&modes[0], exhaustive);
        sweeps.push((modes, values));
    }

    let total: u64 = sweeps
        .iter()
        .map(|(modes, values)| (modes.len() * values.len()) as u64)
        .sum();
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut failures = 0u64;
    let mut transfers = 0u64;
    for (modes, values) in &sweeps {
        for mode in modes {
            let config = EngineConfig {
                delay_ms: delay,
                record_trace: false,
            };
            let mut engine = SpiEngine::with_config(LoopbackPort::new(), config)?;
            for &value in values {
                let received = engine.transfer(value, mode)?;
                transfers += 1;
                if received != value {
                    failures += 1;
                    log::error!(
                        "loopback mismatch: width={} cpol={} cpha={} sent=0x{:X} received=0x{:X}",
                        mode.width(),
                        mode.cpol() as u8,
                        mode.cpha() as u8,
                        value,
                        received
                    );
                }
                pb.inc(1);
            }
            engine.release()?;
        }
    }
    pb.finish_and_clear();

    if failures > 0 {
        eprintln!("self-test FAILED: {} of {} transfers", failures, transfers);
        std::process::exit(1);
    }
    println!("self-test passed: {} loopback transfers", transfers);
    Ok(())
}

fn run_trace(mode_args: ModeArgs, value: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mode = mode_args.to_mode()?;
    let config = EngineConfig {
        delay_ms: None,
        record_trace: true,
    };
    let mut engine = SpiEngine::with_config(LoopbackPort::new(), config)?;
    let received = engine.transfer(value, &mode)?;
    // record_trace was set, so the trace is present after a transfer
    if let Some(trace) = engine.last_trace() {
        print!("{}", waveform::render_transfer(trace, value, received, &mode));
    }
    Ok(())
}

fn run_chips() -> Result<(), Box<dyn std::error::Error>> {
    let chips = bitspi_linux_gpio::available_chips()?;
    if chips.is_empty() {
        println!("no GPIO character devices found");
        return Ok(());
    }
    for chip in chips {
        println!("{}", chip.display());
    }
    Ok(())
}

//! brainwave - binaural beat generator for the terminal
//!
//! Run with: cargo run -- --band alpha

mod app;
mod ui;

use std::fs::File;

use brainwave::BrainwaveBand;
use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::Brainwave;

#[derive(Debug, Parser)]
#[command(name = "brainwave")]
#[command(version, about = "Binaural beat generator", long_about = None)]
pub struct Args {
    /// Brainwave band to start in (delta, theta, alpha, low-beta, mid-beta, high-beta, gamma)
    #[arg(long, default_value_t = BrainwaveBand::Theta)]
    pub band: BrainwaveBand,

    /// Carrier frequency in Hz; anything but 200 or 1000 selects a custom carrier
    #[arg(long)]
    pub carrier: Option<f32>,

    /// Beat frequency in Hz, clamped into the band (defaults to the band midpoint)
    #[arg(long)]
    pub beat: Option<f32>,

    /// Output volume in dB (-40 to 0)
    #[arg(long, default_value_t = -20.0, allow_negative_numbers = true)]
    pub volume: f32,

    /// Play a 1 s 440 Hz test tone each time playback starts
    #[arg(long)]
    pub test_tone: bool,

    /// Play for the given number of seconds without the TUI, then exit
    #[arg(long, value_name = "SECS")]
    pub headless: Option<f32>,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.headless.is_some())?;

    Brainwave::from_args(&args)?.run(args.headless)
}

/// Headless runs log to stderr. The TUI owns the terminal, so there logs go
/// to a file in the temp dir and only when `RUST_LOG` asks for them.
fn init_logging(headless: bool) -> EyreResult<()> {
    if headless {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .init();
        return Ok(());
    }

    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let path = std::env::temp_dir().join("brainwave.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

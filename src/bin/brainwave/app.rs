//! Brainwave - wires the generator to the audio device and picks a front end

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;

use brainwave::io::CpalOutput;
use brainwave::params::DEFAULT_CARRIER_HZ;
use brainwave::{
    BinauralGenerator, CarrierChoice, ControllerConfig, GraphBackend, SessionParameters,
};

use super::ui::UiApp;
use super::Args;

/// Stereo frames buffered between the audio callback and the scope.
const SCOPE_CAPACITY: usize = 8192;

pub type DeviceGenerator = BinauralGenerator<GraphBackend<CpalOutput>>;

/// Application settings gathered from the command line.
pub struct Brainwave {
    params: SessionParameters,
    config: ControllerConfig,
}

impl Brainwave {
    pub fn from_args(args: &Args) -> EyreResult<Self> {
        finite("--carrier", args.carrier)?;
        finite("--beat", args.beat)?;
        finite("--volume", Some(args.volume))?;

        let carrier_hz = args.carrier.unwrap_or(DEFAULT_CARRIER_HZ);
        let is_preset = CarrierChoice::ALL
            .iter()
            .any(|c| c.preset_hz() == Some(carrier_hz));

        let params = SessionParameters {
            carrier_hz,
            beat_hz: args.beat.unwrap_or_else(|| args.band.midpoint()),
            volume_db: args.volume,
            band: args.band,
            custom_carrier: !is_preset,
        };

        Ok(Self {
            params,
            config: ControllerConfig {
                test_tone: args.test_tone,
            },
        })
    }

    /// Run the TUI, or play for `headless` seconds without one.
    pub fn run(self, headless: Option<f32>) -> EyreResult<()> {
        let (producer, consumer) = RingBuffer::<[f32; 2]>::new(SCOPE_CAPACITY);
        let output = CpalOutput::new().with_scope(producer);
        let generator =
            BinauralGenerator::with_config(GraphBackend::new(output), self.params, self.config);

        match headless {
            Some(seconds) => run_headless(generator, seconds),
            None => {
                let mut terminal = ratatui::init();
                let result = UiApp::new(generator, consumer).run(&mut terminal);
                ratatui::restore();
                result
            }
        }
    }
}

fn finite(flag: &str, value: Option<f32>) -> EyreResult<()> {
    match value {
        Some(v) if !v.is_finite() => Err(eyre!("{flag} needs a finite number, got {v}")),
        _ => Ok(()),
    }
}

fn run_headless(mut generator: DeviceGenerator, seconds: f32) -> EyreResult<()> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(eyre!("--headless needs a non-negative duration, got {seconds}"));
    }

    generator
        .start()
        .wrap_err("failed to start binaural session")?;

    let params = generator.parameters();
    println!("=== brainwave ===");
    println!("Band: {} ({})", params.band, params.band.description());
    println!(
        "Left: {} Hz  Right: {} Hz  Beat: {} Hz",
        params.left_hz(),
        params.right_hz(),
        params.clamped_beat_hz()
    );
    println!("Volume: {} dB", params.volume_db);
    println!("Playing for {seconds} s...");

    std::thread::sleep(Duration::from_secs_f32(seconds));
    generator.stop();
    Ok(())
}

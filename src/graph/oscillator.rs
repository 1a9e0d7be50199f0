use std::time::Duration;

use crate::dsp::amplify::{apply_gain, db_to_gain};
use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx, Stereo, StereoMut};

/*
Oscillator Node
===============

A mono tone source with its own transport. It is silent until started and
silent again once stopped; starting rewinds the phase so every run begins at
a zero crossing.

    created ──start()──▶ running ──stop()──▶ stopped
                           │  ▲                 │
                           │  └────start()──────┘
                           └── run length elapsed ──▶ stopped

A run is either open-ended (plays until `stop`) or bounded by a duration.
Binaural tones are open-ended; a bounded run is what a short diagnostic
beep uses.

Frequency and level can change while running. Retuning keeps the phase, so
the only audible change is the new pitch.

Level is the oscillator's own gain in dB. Binaural oscillators stay at 0 dB
and the channel they feed owns the listening level.
*/

/// Highest frequency an oscillator accepts (Hz).
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transport {
    Stopped,
    /// `limit` is the run length in seconds for a bounded run.
    Running { limit: Option<f64>, rendered: u64 },
}

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    volume_db: f32,
    gain: f32,
    transport: Transport,
}

impl OscNode {
    pub fn new(waveform: OscillatorWaveform, frequency: f32) -> Self {
        let mut node = Self {
            osc: OscillatorBlock::new(waveform),
            frequency: 0.0,
            volume_db: 0.0,
            gain: 1.0,
            transport: Transport::Stopped,
        };
        node.set_frequency(frequency);
        node
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, frequency)
    }

    /// Builder form of [`OscNode::set_volume_db`].
    pub fn with_volume_db(mut self, db: f32) -> Self {
        self.set_volume_db(db);
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Retune in place. NaN is ignored; other values are clamped to
    /// `0..=MAX_FREQUENCY_HZ`.
    pub fn set_frequency(&mut self, hz: f32) {
        if hz.is_nan() {
            return;
        }
        self.frequency = hz.clamp(0.0, MAX_FREQUENCY_HZ);
    }

    pub fn volume_db(&self) -> f32 {
        self.volume_db
    }

    pub fn set_volume_db(&mut self, db: f32) {
        if db.is_nan() {
            return;
        }
        self.volume_db = db.min(0.0);
        self.gain = db_to_gain(self.volume_db);
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    /// Start producing sound, open-ended when `duration` is `None`.
    pub fn start(&mut self, duration: Option<Duration>) {
        self.osc.reset();
        self.transport = Transport::Running {
            limit: duration.map(|d| d.as_secs_f64()),
            rendered: 0,
        };
    }

    /// Halt immediately. Stopping a stopped oscillator does nothing.
    pub fn stop(&mut self) {
        self.transport = Transport::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.transport, Transport::Running { .. })
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, _input: Stereo<'_>, out: StereoMut<'_>, ctx: &RenderCtx) {
        let frames = out.len();

        let audible = match &mut self.transport {
            Transport::Stopped => 0,
            Transport::Running {
                limit: None,
                rendered,
            } => {
                *rendered += frames as u64;
                frames
            }
            Transport::Running {
                limit: Some(secs),
                rendered,
            } => {
                let total = (*secs * ctx.sample_rate as f64).round().max(0.0) as u64;
                let audible = total.saturating_sub(*rendered).min(frames as u64) as usize;
                *rendered += frames as u64;
                if *rendered >= total {
                    self.transport = Transport::Stopped;
                }
                audible
            }
        };

        let (sounding, silent) = out.left.split_at_mut(audible);
        self.osc.render(sounding, self.frequency, ctx.sample_rate);
        apply_gain(sounding, self.gain);
        silent.fill(0.0);
        out.right.copy_from_slice(&*out.left);
    }

    fn is_source(&self) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        self.is_running()
    }
}

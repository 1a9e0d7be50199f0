//! Session parameters and the store the front end mutates.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::band::BrainwaveBand;

pub const MIN_CARRIER_HZ: f32 = 100.0;
pub const MAX_CARRIER_HZ: f32 = 2000.0;
pub const MIN_VOLUME_DB: f32 = -40.0;
pub const MAX_VOLUME_DB: f32 = 0.0;

pub const DEFAULT_CARRIER_HZ: f32 = 200.0;
pub const DEFAULT_BEAT_HZ: f32 = 6.0;
pub const DEFAULT_VOLUME_DB: f32 = -20.0;

/// Round to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Everything needed to build or update a playback session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionParameters {
    /// Tone presented to the left ear (Hz)
    pub carrier_hz: f32,
    /// Offset added to the right ear's tone (Hz)
    pub beat_hz: f32,
    /// Per-channel output level (dB)
    pub volume_db: f32,
    pub band: BrainwaveBand,
    /// Carrier slider enabled instead of a preset
    pub custom_carrier: bool,
}

impl SessionParameters {
    /// Beat frequency forced into the active band.
    pub fn clamped_beat_hz(&self) -> f32 {
        self.band.clamp(self.beat_hz)
    }

    /// Left ear frequency.
    pub fn left_hz(&self) -> f32 {
        self.carrier_hz
    }

    /// Right ear frequency, using the band-clamped beat.
    pub fn right_hz(&self) -> f32 {
        self.carrier_hz + self.clamped_beat_hz()
    }
}

impl Default for SessionParameters {
    fn default() -> Self {
        Self {
            carrier_hz: DEFAULT_CARRIER_HZ,
            beat_hz: DEFAULT_BEAT_HZ,
            volume_db: DEFAULT_VOLUME_DB,
            band: BrainwaveBand::Theta,
            custom_carrier: false,
        }
    }
}

/// Carrier selector: two fixed presets or the free slider.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierChoice {
    /// 200 Hz, the traditional carrier
    Preset200,
    /// 1000 Hz, more perceptible for some listeners
    Preset1000,
    Custom,
}

impl CarrierChoice {
    pub const ALL: [CarrierChoice; 3] = [
        CarrierChoice::Preset200,
        CarrierChoice::Preset1000,
        CarrierChoice::Custom,
    ];

    /// Fixed carrier frequency, `None` for the custom slider.
    pub fn preset_hz(self) -> Option<f32> {
        match self {
            CarrierChoice::Preset200 => Some(200.0),
            CarrierChoice::Preset1000 => Some(1000.0),
            CarrierChoice::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CarrierChoice::Preset200 => "200 Hz",
            CarrierChoice::Preset1000 => "1000 Hz",
            CarrierChoice::Custom => "Custom",
        }
    }

    /// Which choice the given parameters currently correspond to.
    pub fn of(params: &SessionParameters) -> Option<Self> {
        if params.custom_carrier {
            return Some(CarrierChoice::Custom);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.preset_hz() == Some(params.carrier_hz))
    }
}

/// Holds the current session configuration.
///
/// Setters clamp into the ranges the controls allow; nothing here fails.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    params: SessionParameters,
}

impl ParameterStore {
    pub fn new(params: SessionParameters) -> Self {
        // Unusable values fall back to the defaults the setters would keep.
        let mut store = Self {
            params: SessionParameters {
                band: params.band,
                custom_carrier: params.custom_carrier,
                ..SessionParameters::default()
            },
        };
        store.set_carrier(params.carrier_hz);
        store.set_beat(params.beat_hz);
        store.set_volume(params.volume_db);
        store
    }

    pub fn parameters(&self) -> SessionParameters {
        self.params
    }

    pub fn set_carrier(&mut self, hz: f32) {
        if hz.is_nan() {
            return;
        }
        self.params.carrier_hz = hz.clamp(MIN_CARRIER_HZ, MAX_CARRIER_HZ);
    }

    pub fn set_beat(&mut self, hz: f32) {
        self.params.beat_hz = self.params.band.clamp(hz);
    }

    pub fn set_volume(&mut self, db: f32) {
        if db.is_nan() {
            return;
        }
        self.params.volume_db = db.clamp(MIN_VOLUME_DB, MAX_VOLUME_DB);
    }

    pub fn set_custom_carrier(&mut self, enabled: bool) {
        self.params.custom_carrier = enabled;
    }

    /// Switch band and reset the beat to the band's midpoint.
    pub fn select_band(&mut self, band: BrainwaveBand) {
        self.params.band = band;
        self.params.beat_hz = band.midpoint();
    }
}

//! Brainwave bands used to bound and preset the beat frequency.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::round_to_tenth;

/// A named range of beat frequencies conventionally tied to a mental state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BrainwaveBand {
    Delta,
    #[default]
    Theta,
    Alpha,
    LowBeta,
    MidBeta,
    HighBeta,
    Gamma,
}

impl BrainwaveBand {
    /// All bands, slowest first.
    pub const ALL: [BrainwaveBand; 7] = [
        BrainwaveBand::Delta,
        BrainwaveBand::Theta,
        BrainwaveBand::Alpha,
        BrainwaveBand::LowBeta,
        BrainwaveBand::MidBeta,
        BrainwaveBand::HighBeta,
        BrainwaveBand::Gamma,
    ];

    /// Lowest beat frequency of the band (Hz).
    pub fn min_hz(self) -> f32 {
        match self {
            BrainwaveBand::Delta => 0.5,
            BrainwaveBand::Theta => 4.0,
            BrainwaveBand::Alpha => 8.0,
            BrainwaveBand::LowBeta => 12.0,
            BrainwaveBand::MidBeta => 15.0,
            BrainwaveBand::HighBeta => 20.0,
            BrainwaveBand::Gamma => 30.0,
        }
    }

    /// Highest beat frequency of the band (Hz).
    pub fn max_hz(self) -> f32 {
        match self {
            BrainwaveBand::Delta => 4.0,
            BrainwaveBand::Theta => 8.0,
            BrainwaveBand::Alpha => 12.0,
            BrainwaveBand::LowBeta => 15.0,
            BrainwaveBand::MidBeta => 20.0,
            BrainwaveBand::HighBeta => 30.0,
            BrainwaveBand::Gamma => 50.0,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BrainwaveBand::Delta => "Deep sleep, healing, dreamless sleep",
            BrainwaveBand::Theta => "Deep meditation, REM sleep, creativity",
            BrainwaveBand::Alpha => "Relaxed alertness, calm focus, flow state",
            BrainwaveBand::LowBeta => "Relaxed focus, calm thinking",
            BrainwaveBand::MidBeta => "Active engagement, learning",
            BrainwaveBand::HighBeta => "Alertness, problem solving",
            BrainwaveBand::Gamma => "Higher cognitive processing, peak concentration",
        }
    }

    /// Color name the front end uses for this band.
    pub fn display_color(self) -> &'static str {
        match self {
            BrainwaveBand::Delta => "indigo",
            BrainwaveBand::Theta => "blue",
            BrainwaveBand::Alpha => "green",
            BrainwaveBand::LowBeta => "yellow",
            BrainwaveBand::MidBeta => "orange",
            BrainwaveBand::HighBeta => "red",
            BrainwaveBand::Gamma => "purple",
        }
    }

    /// Human readable label ("Low Beta").
    pub fn label(self) -> &'static str {
        match self {
            BrainwaveBand::Delta => "Delta",
            BrainwaveBand::Theta => "Theta",
            BrainwaveBand::Alpha => "Alpha",
            BrainwaveBand::LowBeta => "Low Beta",
            BrainwaveBand::MidBeta => "Mid Beta",
            BrainwaveBand::HighBeta => "High Beta",
            BrainwaveBand::Gamma => "Gamma",
        }
    }

    /// Stable identifier ("lowBeta").
    pub fn id(self) -> &'static str {
        match self {
            BrainwaveBand::Delta => "delta",
            BrainwaveBand::Theta => "theta",
            BrainwaveBand::Alpha => "alpha",
            BrainwaveBand::LowBeta => "lowBeta",
            BrainwaveBand::MidBeta => "midBeta",
            BrainwaveBand::HighBeta => "highBeta",
            BrainwaveBand::Gamma => "gamma",
        }
    }

    /// Middle of the band, rounded to one decimal place.
    ///
    /// This is the beat frequency a band switch resets to.
    pub fn midpoint(self) -> f32 {
        round_to_tenth((self.min_hz() + self.max_hz()) / 2.0)
    }

    pub fn contains(self, hz: f32) -> bool {
        hz >= self.min_hz() && hz <= self.max_hz()
    }

    /// Clamp a beat frequency into the band. NaN maps to the midpoint.
    pub fn clamp(self, hz: f32) -> f32 {
        if hz.is_nan() {
            return self.midpoint();
        }
        hz.clamp(self.min_hz(), self.max_hz())
    }

    /// Next band in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous band in `ALL`, wrapping around.
    pub fn previous(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&b| b == self)
            .unwrap_or_default()
    }
}

impl fmt::Display for BrainwaveBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown brainwave band: {0}")]
pub struct ParseBandError(String);

impl FromStr for BrainwaveBand {
    type Err = ParseBandError;

    /// Accepts ids and labels in any case, with or without separators
    /// ("lowBeta", "low-beta", "Low Beta").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|band| band.id().eq_ignore_ascii_case(&key))
            .ok_or_else(|| ParseBandError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midpoints_round_to_one_decimal() {
        assert_eq!(BrainwaveBand::Delta.midpoint(), 2.3);
        assert_eq!(BrainwaveBand::Theta.midpoint(), 6.0);
        assert_eq!(BrainwaveBand::Alpha.midpoint(), 10.0);
        assert_eq!(BrainwaveBand::LowBeta.midpoint(), 13.5);
        assert_eq!(BrainwaveBand::MidBeta.midpoint(), 17.5);
        assert_eq!(BrainwaveBand::HighBeta.midpoint(), 25.0);
        assert_eq!(BrainwaveBand::Gamma.midpoint(), 40.0);
    }

    #[test]
    fn midpoint_lies_inside_band() {
        for band in BrainwaveBand::ALL {
            let mid = band.midpoint();
            assert!(band.contains(mid), "{band}: {mid}");
        }
    }

    #[test]
    fn bands_are_contiguous() {
        for pair in BrainwaveBand::ALL.windows(2) {
            assert_eq!(pair[0].max_hz(), pair[1].min_hz());
        }
    }

    #[test]
    fn clamp_bounds_and_nan() {
        let alpha = BrainwaveBand::Alpha;
        assert_eq!(alpha.clamp(3.0), 8.0);
        assert_eq!(alpha.clamp(99.0), 12.0);
        assert_eq!(alpha.clamp(9.5), 9.5);
        assert_eq!(alpha.clamp(f32::NAN), 10.0);
    }

    #[test]
    fn parses_ids_and_labels() {
        assert_eq!("lowBeta".parse(), Ok(BrainwaveBand::LowBeta));
        assert_eq!("low-beta".parse(), Ok(BrainwaveBand::LowBeta));
        assert_eq!("High Beta".parse(), Ok(BrainwaveBand::HighBeta));
        assert_eq!("GAMMA".parse(), Ok(BrainwaveBand::Gamma));
        assert!("epsilon".parse::<BrainwaveBand>().is_err());
    }

    #[test]
    fn next_and_previous_wrap() {
        assert_eq!(BrainwaveBand::Gamma.next(), BrainwaveBand::Delta);
        assert_eq!(BrainwaveBand::Delta.previous(), BrainwaveBand::Gamma);
        assert_eq!(BrainwaveBand::Theta.next(), BrainwaveBand::Alpha);
    }
}

//! Offline signal measurements for checking rendered output.

use rustfft::{num_complex::Complex, FftPlanner};

/// Hann window of length `len`.
pub fn hann_window(len: usize) -> Vec<f32> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f32;
    (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
        .collect()
}

/// Strongest frequency in `samples` (Hz), `None` for silence or too few
/// samples.
///
/// Hann-windowed FFT, then parabolic interpolation around the peak bin so the
/// estimate lands well inside one bin width.
pub fn dominant_frequency(samples: &[f32], sample_rate: f32) -> Option<f32> {
    let len = samples.len();
    if len < 4 || sample_rate <= 0.0 {
        return None;
    }

    let window = hann_window(len);
    let mut buffer: Vec<Complex<f32>> = samples
        .iter()
        .zip(&window)
        .map(|(&s, &w)| Complex::new(s * w, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(len).process(&mut buffer);

    let half = len / 2;
    let magnitudes: Vec<f32> = buffer[..half].iter().map(|c| c.norm()).collect();

    // Skip DC
    let (peak, &peak_mag) = magnitudes
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|a, b| a.1.total_cmp(b.1))?;
    if peak_mag <= 1e-6 {
        return None;
    }

    let offset = if peak + 1 < half {
        let (a, b, c) = (magnitudes[peak - 1], peak_mag, magnitudes[peak + 1]);
        let denom = a - 2.0 * b + c;
        if denom.abs() > f32::EPSILON {
            0.5 * (a - c) / denom
        } else {
            0.0
        }
    } else {
        0.0
    };

    Some((peak as f32 + offset) * sample_rate / len as f32)
}

/// Root mean square level.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Largest absolute sample.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0, |m, s| m.max(s.abs()))
}

/// Difference between the dominant frequencies of the two ears, i.e. the
/// perceived beat.
pub fn interaural_beat(left: &[f32], right: &[f32], sample_rate: f32) -> Option<f32> {
    let l = dominant_frequency(left, sample_rate)?;
    let r = dominant_frequency(right, sample_rate)?;
    Some(r - l)
}

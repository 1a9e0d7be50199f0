//! Spectrum widget
//!
//! Log-spaced view of the carrier region, where both ear tones sit.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

use brainwave::analysis::hann_window;

const SPECTRUM_BINS: usize = 96;
const MIN_FREQ_HZ: f64 = 50.0;
const MAX_FREQ_HZ: f64 = 4_000.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// (frequency_hz, fft_index) per displayed point
    bins: Vec<(f64, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (frequency_hz, magnitude_db)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let nyquist = sample_rate as f64 / 2.0;
        let max_freq = MAX_FREQ_HZ.min(nyquist).max(MIN_FREQ_HZ);
        let ratio = max_freq / MIN_FREQ_HZ;
        let last = (buffer_len / 2).saturating_sub(1);

        let bins: Vec<(f64, usize)> = (0..SPECTRUM_BINS)
            .map(|i| {
                let t = i as f64 / (SPECTRUM_BINS - 1) as f64;
                let freq = MIN_FREQ_HZ * ratio.powf(t);
                let index = (freq * buffer_len as f64 / sample_rate as f64).round() as usize;
                (freq, index.min(last))
            })
            .collect();

        Self {
            window: hann_window(buffer_len),
            spectrum: bins.iter().map(|&(f, _)| (f, FLOOR_DB)).collect(),
            bins,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
        }
    }

    /// Recompute from the latest `buffer_len` samples; other lengths are
    /// ignored.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 2.0 / self.window.len() as f32;
        for (point, &(freq, index)) in self.spectrum.iter_mut().zip(&self.bins) {
            let magnitude = (self.scratch[index].norm() * scale).max(1e-6);
            *point = (freq, (20.0 * (magnitude as f64).log10()).max(FLOOR_DB));
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let max_freq = spectrum
        .last()
        .map(|&(f, _)| f)
        .unwrap_or(MAX_FREQ_HZ);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([MIN_FREQ_HZ, max_freq])
                .labels(vec![
                    format!("{MIN_FREQ_HZ:.0}"),
                    format!("{max_freq:.0} Hz"),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0 dB"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

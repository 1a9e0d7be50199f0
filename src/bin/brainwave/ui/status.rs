//! Status bar widget - play state, ear frequencies, level and last error

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use brainwave::analysis::{dominant_frequency, peak, rms};
use brainwave::dsp::amplify::gain_to_db;
use brainwave::SessionParameters;

/// Output level and measured ear tones for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
    pub left_hz: Option<f32>,
    pub right_hz: Option<f32>,
}

impl AudioStats {
    /// `sample_rate` of 0 (device not opened yet) skips the tone estimate.
    pub fn from_buffers(left: &[f32], right: &[f32], sample_rate: f32) -> Self {
        Self {
            peak: peak(left).max(peak(right)),
            rms: rms(left).max(rms(right)),
            left_hz: dominant_frequency(left, sample_rate),
            right_hz: dominant_frequency(right, sample_rate),
        }
    }
}

fn measured(hz: Option<f32>) -> String {
    hz.map_or_else(|| "--".to_string(), |hz| format!("{hz:.0}"))
}

/// Level in dBFS, "-inf" for silence.
fn dbfs(level: f32) -> String {
    let db = gain_to_db(level);
    if db.is_finite() {
        format!("{db:.1} dBFS")
    } else {
        "-inf".to_string()
    }
}

pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    params: &SessionParameters,
    playing: bool,
    stats: &AudioStats,
    error: Option<&str>,
) {
    let block = Block::default()
        .title(" brainwave ")
        .borders(Borders::ALL);

    let play_symbol = if playing { "▶" } else { "■" };
    let play_state = if playing { "Playing" } else { "Stopped" };

    let mut spans = vec![
        Span::styled(
            format!(" {play_symbol} {play_state}  "),
            Style::default().fg(if playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(
            format!(
                "L {:.1} Hz | R {:.1} Hz  ",
                params.left_hz(),
                params.right_hz()
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "Measured {} | {} Hz  ",
                measured(stats.left_hz),
                measured(stats.right_hz)
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "Peak: {}  RMS: {}  ",
                dbfs(stats.peak),
                dbfs(stats.rms)
            ),
            Style::default().fg(Color::Magenta),
        ),
    ];

    if let Some(error) = error {
        spans.push(Span::styled(
            format!("⚠ {error}"),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

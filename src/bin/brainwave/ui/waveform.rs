//! Stereo oscilloscope widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

fn points(buffer: &[f32]) -> Vec<(f64, f64)> {
    let len = buffer.len().max(1) as f64;
    buffer
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64 / len, sample as f64))
        .collect()
}

/// Left ear in cyan, right ear in yellow.
pub fn render_waveform(frame: &mut Frame, area: Rect, left: &[f32], right: &[f32]) {
    let block = Block::default()
        .title(" Scope (L/R) ")
        .borders(Borders::ALL);

    let left = points(left);
    let right = points(right);

    let datasets = vec![
        Dataset::default()
            .name("L")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&left),
        Dataset::default()
            .name("R")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&right),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

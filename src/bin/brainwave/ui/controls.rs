//! Session controls - band picker and parameter readout

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use brainwave::params::{MAX_VOLUME_DB, MIN_VOLUME_DB};
use brainwave::{BrainwaveBand, CarrierChoice, SessionParameters};

/// Terminal color for a band's display color name.
fn band_color(band: BrainwaveBand) -> Color {
    match band.display_color() {
        "indigo" => Color::Indexed(54),
        "blue" => Color::Blue,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "orange" => Color::Indexed(208),
        "red" => Color::Red,
        "purple" => Color::Magenta,
        _ => Color::White,
    }
}

pub fn render_controls(
    frame: &mut Frame,
    area: Rect,
    params: &SessionParameters,
    carrier_editable: bool,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(30)])
        .split(area);

    render_bands(frame, columns[0], params.band);
    render_parameters(frame, columns[1], params, carrier_editable);
}

fn render_bands(frame: &mut Frame, area: Rect, selected: BrainwaveBand) {
    let lines: Vec<Line> = BrainwaveBand::ALL
        .iter()
        .map(|&band| {
            let marker = if band == selected { "▸ " } else { "  " };
            let mut style = Style::default().fg(band_color(band));
            if band == selected {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Line::from(Span::styled(
                format!(
                    "{marker}{:<10} {:>4}-{:<4} Hz",
                    band.label(),
                    band.min_hz(),
                    band.max_hz()
                ),
                style,
            ))
        })
        .collect();

    let block = Block::default().title(" Band ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_parameters(
    frame: &mut Frame,
    area: Rect,
    params: &SessionParameters,
    carrier_editable: bool,
) {
    let block = Block::default().title(" Session ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Description
            Constraint::Length(1), // Carrier
            Constraint::Length(1), // Beat
            Constraint::Length(1), // Volume gauge
            Constraint::Min(0),
        ])
        .split(inner);

    let band = params.band;
    let description = Paragraph::new(vec![
        Line::from(Span::styled(
            band.label(),
            Style::default()
                .fg(band_color(band))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            band.description(),
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(description, rows[0]);

    let choices: Vec<Span> = CarrierChoice::ALL
        .iter()
        .map(|&choice| {
            let active = CarrierChoice::of(params) == Some(choice);
            let style = if active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!("[{}] ", choice.label()), style)
        })
        .collect();
    let mut carrier = vec![Span::raw(format!("Carrier {:>6.1} Hz  ", params.carrier_hz))];
    carrier.extend(choices);
    if params.custom_carrier && !carrier_editable {
        carrier.push(Span::styled(
            "(locked while playing)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(carrier)), rows[1]);

    let beat = Line::from(vec![
        Span::raw(format!("Beat    {:>6.1} Hz  ", params.clamped_beat_hz())),
        Span::styled(
            format!("({}-{} Hz)", band.min_hz(), band.max_hz()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(beat), rows[2]);

    let ratio = ((params.volume_db - MIN_VOLUME_DB) / (MAX_VOLUME_DB - MIN_VOLUME_DB))
        .clamp(0.0, 1.0) as f64;
    // Gauge asserts 0..=1
    let ratio = if ratio.is_nan() { 0.0 } else { ratio };
    let volume = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("Volume {:.0} dB", params.volume_db));
    frame.render_widget(volume, rows[3]);
}

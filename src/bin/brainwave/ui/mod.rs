//! TUI module for brainwave
//!
//! Keyboard control of the session plus live scope and spectrum of what the
//! device is playing.

mod controls;
mod spectrum;
mod status;
mod waveform;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use brainwave::io::OutputContext;
use brainwave::{AudioError, CarrierChoice};

use super::app::DeviceGenerator;
use controls::render_controls;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};
use waveform::render_waveform;

/// Frames shown by the scope
const VIS_BUFFER_SIZE: usize = 1024;
/// FFT size for the spectrum
const FFT_SIZE: usize = 4096;

const BEAT_STEP_HZ: f32 = 0.1;
const BEAT_PAGE_HZ: f32 = 1.0;
const VOLUME_STEP_DB: f32 = 1.0;
const CARRIER_STEP_HZ: f32 = 10.0;

/// UI application state
pub struct UiApp {
    generator: DeviceGenerator,
    /// Stereo frames copied out of the audio callback
    scope_rx: Consumer<[f32; 2]>,
    left: Vec<f32>,
    right: Vec<f32>,
    /// Mono history for the spectrum
    history: Vec<f32>,
    analyzer: Option<SpectrumAnalyzer>,
    /// Last start failure, shown until the next successful start
    error: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(generator: DeviceGenerator, scope_rx: Consumer<[f32; 2]>) -> Self {
        Self {
            generator,
            scope_rx,
            left: vec![0.0; VIS_BUFFER_SIZE],
            right: vec![0.0; VIS_BUFFER_SIZE],
            history: vec![0.0; FFT_SIZE],
            analyzer: None,
            error: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.generator.stop();
        Ok(())
    }

    fn poll_scope(&mut self) {
        let mut received = 0;
        while let Ok([l, r]) = self.scope_rx.pop() {
            self.left.push(l);
            self.right.push(r);
            self.history.push(0.5 * (l + r));
            received += 1;
        }
        if received == 0 {
            return;
        }

        trim_front(&mut self.left, VIS_BUFFER_SIZE);
        trim_front(&mut self.right, VIS_BUFFER_SIZE);
        trim_front(&mut self.history, FFT_SIZE);

        if self.analyzer.is_none() {
            let sample_rate = self.generator.backend().output().sample_rate();
            if sample_rate > 0.0 {
                self.analyzer = Some(SpectrumAnalyzer::new(FFT_SIZE, sample_rate));
            }
        }
        if let Some(analyzer) = self.analyzer.as_mut() {
            analyzer.update(&self.history);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let params = self.generator.parameters();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                let result = self.generator.toggle_playback();
                self.record(result);
            }
            KeyCode::Left | KeyCode::Char('b') => self.generator.select_band(params.band.previous()),
            KeyCode::Right | KeyCode::Char('n') => self.generator.select_band(params.band.next()),
            KeyCode::Up => self.generator.set_beat(params.beat_hz + BEAT_STEP_HZ),
            KeyCode::Down => self.generator.set_beat(params.beat_hz - BEAT_STEP_HZ),
            KeyCode::PageUp => self.generator.set_beat(params.beat_hz + BEAT_PAGE_HZ),
            KeyCode::PageDown => self.generator.set_beat(params.beat_hz - BEAT_PAGE_HZ),
            KeyCode::Char(']') | KeyCode::Char('+') => {
                self.generator.set_volume(params.volume_db + VOLUME_STEP_DB)
            }
            KeyCode::Char('[') | KeyCode::Char('-') => {
                self.generator.set_volume(params.volume_db - VOLUME_STEP_DB)
            }
            KeyCode::Char('c') => {
                let next = next_carrier(CarrierChoice::of(&params));
                self.generator.select_carrier(next);
            }
            KeyCode::Char('.') => {
                self.generator.set_carrier(params.carrier_hz + CARRIER_STEP_HZ);
            }
            KeyCode::Char(',') => {
                self.generator.set_carrier(params.carrier_hz - CARRIER_STEP_HZ);
            }
            _ => {}
        }
    }

    fn record(&mut self, result: Result<(), AudioError>) {
        match result {
            Ok(()) => self.error = None,
            Err(err) => {
                log::error!("{}", error_chain(&err));
                self.error = Some(error_chain(&err));
            }
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Length(11), // Controls
                Constraint::Min(6),     // Scope + spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let params = self.generator.parameters();
        let sample_rate = self.generator.backend().output().sample_rate();
        let stats = AudioStats::from_buffers(&self.left, &self.right, sample_rate);
        render_status(
            frame,
            chunks[0],
            &params,
            self.generator.is_playing(),
            &stats,
            self.error.as_deref(),
        );

        render_controls(
            frame,
            chunks[1],
            &params,
            self.generator.carrier_editable(),
        );

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.left, &self.right);
        let spectrum = self.analyzer.as_ref().map(SpectrumAnalyzer::data).unwrap_or(&[]);
        render_spectrum(frame, scopes[1], spectrum);

        let help = Paragraph::new(
            " [Q] Quit  [Space] Play/Stop  [←/→] Band  [↑/↓] Beat  [[/]] Volume  [C] Carrier  [,/.] Custom Hz",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

fn trim_front(buffer: &mut Vec<f32>, len: usize) {
    if buffer.len() > len {
        let excess = buffer.len() - len;
        buffer.drain(0..excess);
    }
}

fn next_carrier(current: Option<CarrierChoice>) -> CarrierChoice {
    match current {
        Some(CarrierChoice::Preset200) => CarrierChoice::Preset1000,
        Some(CarrierChoice::Preset1000) => CarrierChoice::Custom,
        Some(CarrierChoice::Custom) | None => CarrierChoice::Preset200,
    }
}

/// "failed to start playback: audio output context unavailable: ..."
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // Wrapped errors often already print their source
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

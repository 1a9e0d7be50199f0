use std::time::Duration;

use crate::backend::{AudioBackend, BackendError, ContextState, OscillatorOptions, Target};
use crate::dsp::OscillatorWaveform;
use crate::params::SessionParameters;
use crate::session::AudioError;

/*
Session Lifecycle
=================

    stopped ──start()──▶ playing ──stop() / teardown() / drop──▶ stopped
       ▲                   │  │
       │                   │  └─ apply_parameters(): retune + relevel in place
       └── start() failed ─┘      (same nodes, new values)

A session is two mono chains, one per ear:

    sine(carrier)        ──▶ panner(-1) ──▶ channel(volume) ──▶ destination
    sine(carrier + beat) ──▶ panner(+1) ──▶ channel(volume) ──▶ destination

Oscillators run at 0 dB. The channel is the only stage carrying the listening
volume, so a volume change touches the two channels and nothing else.

Everything the controller allocates is tracked from the moment it exists.
A start that fails halfway releases what it already built; stop releases
the lot. Release never gives up early: a node that refuses to stop or
dispose is logged and skipped, and the rest are still released.
*/

/// Diagnostic beep played by `start` when [`ControllerConfig::test_tone`] is on.
pub const TEST_TONE_HZ: f32 = 440.0;
pub const TEST_TONE_DB: f32 = -20.0;
pub const TEST_TONE_DURATION: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Play a short 440 Hz triangle on every start to confirm audio works.
    pub test_tone: bool,
}

/// Placement and level stages behind one oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<N> {
    pub panner: N,
    pub channel: N,
}

/// The live audio nodes of one playing session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession<N> {
    left_oscillator: N,
    right_oscillator: N,
    left_route: Route<N>,
    right_route: Route<N>,
    test_tone: Option<N>,
    carrier_hz: f32,
    beat_hz: f32,
    volume_db: f32,
}

impl<N: Copy> PlaybackSession<N> {
    pub fn left_oscillator(&self) -> N {
        self.left_oscillator
    }

    pub fn right_oscillator(&self) -> N {
        self.right_oscillator
    }

    pub fn left_route(&self) -> Route<N> {
        self.left_route
    }

    pub fn right_route(&self) -> Route<N> {
        self.right_route
    }

    pub fn test_tone(&self) -> Option<N> {
        self.test_tone
    }

    /// Frequency of the left oscillator.
    pub fn left_hz(&self) -> f32 {
        self.carrier_hz
    }

    /// Frequency of the right oscillator.
    ///
    /// `carrier + beat` rounded to f32, so `right_hz() - left_hz()` matches
    /// `beat_hz()` to within `f32::EPSILON * right_hz()` (half an ulp of the
    /// sum; the subtraction itself is exact while beat <= carrier).
    pub fn right_hz(&self) -> f32 {
        self.carrier_hz + self.beat_hz
    }

    pub fn beat_hz(&self) -> f32 {
        self.beat_hz
    }

    pub fn volume_db(&self) -> f32 {
        self.volume_db
    }

    /// Every node the session owns.
    pub fn nodes(&self) -> Vec<N> {
        let mut nodes = vec![
            self.left_oscillator,
            self.right_oscillator,
            self.left_route.panner,
            self.left_route.channel,
            self.right_route.panner,
            self.right_route.channel,
        ];
        nodes.extend(self.test_tone);
        nodes
    }

    fn into_owned(self) -> OwnedNodes<N> {
        let mut oscillators = vec![self.left_oscillator, self.right_oscillator];
        oscillators.extend(self.test_tone);
        OwnedNodes {
            oscillators,
            routing: vec![
                self.left_route.panner,
                self.left_route.channel,
                self.right_route.panner,
                self.right_route.channel,
            ],
        }
    }
}

/// Nodes awaiting release, split so oscillators can be stopped first.
struct OwnedNodes<N> {
    oscillators: Vec<N>,
    routing: Vec<N>,
}

impl<N> Default for OwnedNodes<N> {
    fn default() -> Self {
        Self {
            oscillators: Vec::new(),
            routing: Vec::new(),
        }
    }
}

/// Owns the audio nodes of the current session and keeps them in step with
/// the session parameters.
pub struct SessionController<B: AudioBackend> {
    backend: B,
    config: ControllerConfig,
    playing: bool,
    session: Option<PlaybackSession<B::Node>>,
}

impl<B: AudioBackend> SessionController<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ControllerConfig::default())
    }

    pub fn with_config(backend: B, config: ControllerConfig) -> Self {
        Self {
            backend,
            config,
            playing: false,
            session: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    pub fn session(&self) -> Option<&PlaybackSession<B::Node>> {
        self.session.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access, for driving the output (offline rendering).
    /// Nodes owned by the session must not be touched through it.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Resume the output if needed, build both ear chains and start them.
    ///
    /// On failure nothing stays allocated, `is_playing()` is false and the
    /// cause is returned wrapped in [`AudioError::StartFailed`]. Calling this
    /// while playing replaces the current session with a fresh one.
    pub fn start(&mut self, params: &SessionParameters) -> Result<(), AudioError> {
        if self.session.is_some() || self.playing {
            log::debug!("start while playing, replacing current session");
            self.stop();
        }

        self.ensure_running().map_err(AudioError::start_failed)?;

        let mut owned = OwnedNodes::default();
        let session = match self.build_session(params, &mut owned) {
            Ok(session) => session,
            Err(err) => {
                log::warn!("session setup failed: {err}");
                self.release(owned);
                return Err(AudioError::start_failed(AudioError::NodeAllocationFailed(
                    err,
                )));
            }
        };

        log::info!(
            "session started: left={}Hz right={}Hz volume={}dB",
            session.left_hz(),
            session.right_hz(),
            session.volume_db()
        );
        self.session = Some(session);
        self.playing = true;
        Ok(())
    }

    /// Stop and release every owned node. Safe to call at any time, any
    /// number of times.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            self.release(session.into_owned());
            log::info!("session stopped");
        }
        self.playing = false;
    }

    /// Push new frequencies and volume into the live nodes. Does nothing
    /// while stopped.
    pub fn apply_parameters(&mut self, params: &SessionParameters) {
        if !self.playing {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let beat_hz = params.clamped_beat_hz();
        let left_hz = params.carrier_hz;
        let right_hz = params.carrier_hz + beat_hz;

        let backend = &mut self.backend;
        suppress(
            backend.set_frequency(session.left_oscillator, left_hz),
            "retune left oscillator",
        );
        suppress(
            backend.set_frequency(session.right_oscillator, right_hz),
            "retune right oscillator",
        );
        suppress(
            backend.set_volume(session.left_route.channel, params.volume_db),
            "set left channel volume",
        );
        suppress(
            backend.set_volume(session.right_route.channel, params.volume_db),
            "set right channel volume",
        );

        session.carrier_hz = left_hz;
        session.beat_hz = beat_hz;
        session.volume_db = params.volume_db;
        log::debug!("session updated: left={left_hz}Hz right={right_hz}Hz");
    }

    /// Final release when the owner goes away. Same as [`stop`](Self::stop).
    pub fn teardown(&mut self) {
        self.stop();
    }

    fn ensure_running(&mut self) -> Result<(), AudioError> {
        let state = self.backend.context_state();
        if state == ContextState::Running {
            return Ok(());
        }

        log::debug!("audio context {state}, resuming");
        self.backend
            .resume()
            .map_err(AudioError::ContextUnavailable)?;

        match self.backend.context_state() {
            ContextState::Running => {
                log::info!("audio context resumed");
                Ok(())
            }
            after => Err(AudioError::ContextUnavailable(BackendError::Unavailable(
                format!("context {after} after resume"),
            ))),
        }
    }

    fn build_session(
        &mut self,
        params: &SessionParameters,
        owned: &mut OwnedNodes<B::Node>,
    ) -> Result<PlaybackSession<B::Node>, BackendError> {
        let carrier_hz = params.carrier_hz;
        let beat_hz = params.clamped_beat_hz();
        let volume_db = params.volume_db;

        let (left_oscillator, left_route) =
            self.build_chain(carrier_hz, -1.0, volume_db, owned)?;
        let (right_oscillator, right_route) =
            self.build_chain(carrier_hz + beat_hz, 1.0, volume_db, owned)?;

        let test_tone = if self.config.test_tone {
            let tone = self.backend.create_oscillator(OscillatorOptions {
                waveform: OscillatorWaveform::Triangle,
                frequency_hz: TEST_TONE_HZ,
                volume_db: TEST_TONE_DB,
            })?;
            owned.oscillators.push(tone);
            self.backend.connect(tone, Target::Destination)?;
            Some(tone)
        } else {
            None
        };

        self.backend.start(left_oscillator, None)?;
        self.backend.start(right_oscillator, None)?;
        if let Some(tone) = test_tone {
            self.backend.start(tone, Some(TEST_TONE_DURATION))?;
        }

        Ok(PlaybackSession {
            left_oscillator,
            right_oscillator,
            left_route,
            right_route,
            test_tone,
            carrier_hz,
            beat_hz,
            volume_db,
        })
    }

    /// Build `sine(hz) → panner(pan) → channel(volume) → destination`,
    /// recording each node in `owned` as soon as it exists.
    fn build_chain(
        &mut self,
        hz: f32,
        pan: f32,
        volume_db: f32,
        owned: &mut OwnedNodes<B::Node>,
    ) -> Result<(B::Node, Route<B::Node>), BackendError> {
        let channel = self.backend.create_channel(volume_db)?;
        owned.routing.push(channel);
        self.backend.connect(channel, Target::Destination)?;

        let panner = self.backend.create_panner(pan)?;
        owned.routing.push(panner);
        self.backend.connect(panner, Target::Node(channel))?;

        let oscillator = self.backend.create_oscillator(OscillatorOptions::sine(hz))?;
        owned.oscillators.push(oscillator);
        self.backend.connect(oscillator, Target::Node(panner))?;

        Ok((oscillator, Route { panner, channel }))
    }

    fn release(&mut self, owned: OwnedNodes<B::Node>) {
        for &osc in &owned.oscillators {
            suppress(self.backend.stop(osc), "stop oscillator");
        }
        for node in owned.oscillators.into_iter().chain(owned.routing) {
            suppress(self.backend.dispose(node), "dispose node");
        }
    }
}

impl<B: AudioBackend> Drop for SessionController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn suppress(result: Result<(), BackendError>, action: &str) {
    if let Err(err) = result {
        log::warn!("failed to {action}: {err}");
    }
}

use crate::backend::AudioBackend;
use crate::band::BrainwaveBand;
use crate::params::{CarrierChoice, ParameterStore, SessionParameters};
use crate::session::{AudioError, ControllerConfig, SessionController};

/// Parameter store and session controller kept in lockstep.
///
/// Every edit goes through the store (which clamps it) and, while a session
/// is playing, straight on to the live nodes.
pub struct BinauralGenerator<B: AudioBackend> {
    store: ParameterStore,
    controller: SessionController<B>,
}

impl<B: AudioBackend> BinauralGenerator<B> {
    pub fn new(backend: B, params: SessionParameters) -> Self {
        Self::with_config(backend, params, ControllerConfig::default())
    }

    pub fn with_config(backend: B, params: SessionParameters, config: ControllerConfig) -> Self {
        Self {
            store: ParameterStore::new(params),
            controller: SessionController::with_config(backend, config),
        }
    }

    pub fn parameters(&self) -> SessionParameters {
        self.store.parameters()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn controller(&self) -> &SessionController<B> {
        &self.controller
    }

    pub fn backend(&self) -> &B {
        self.controller.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.controller.backend_mut()
    }

    /// Start playback with the current parameters. No-op while playing.
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.controller.is_playing() {
            return Ok(());
        }
        let params = self.store.parameters();
        self.controller.start(&params)
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    pub fn toggle_playback(&mut self) -> Result<(), AudioError> {
        if self.controller.is_playing() {
            self.stop();
            Ok(())
        } else {
            self.start()
        }
    }

    /// Switch band; the beat jumps to the band's midpoint.
    pub fn select_band(&mut self, band: BrainwaveBand) {
        self.store.select_band(band);
        self.sync();
    }

    pub fn set_beat(&mut self, hz: f32) {
        self.store.set_beat(hz);
        self.sync();
    }

    pub fn set_volume(&mut self, db: f32) {
        self.store.set_volume(db);
        self.sync();
    }

    /// Set a custom carrier. Only honoured while custom carrier is enabled
    /// and nothing is playing; returns whether the value was taken.
    pub fn set_carrier(&mut self, hz: f32) -> bool {
        if !self.carrier_editable() {
            log::debug!("carrier edit ignored");
            return false;
        }
        self.store.set_carrier(hz);
        true
    }

    /// Pick a carrier preset or switch to custom entry. Refused while
    /// playing.
    pub fn select_carrier(&mut self, choice: CarrierChoice) -> bool {
        if self.controller.is_playing() {
            return false;
        }
        match choice.preset_hz() {
            Some(hz) => {
                self.store.set_custom_carrier(false);
                self.store.set_carrier(hz);
            }
            None => self.store.set_custom_carrier(true),
        }
        true
    }

    /// Whether the carrier field currently accepts free entry.
    pub fn carrier_editable(&self) -> bool {
        self.store.parameters().custom_carrier && !self.controller.is_playing()
    }

    fn sync(&mut self) {
        if self.controller.is_playing() {
            let params = self.store.parameters();
            self.controller.apply_parameters(&params);
        }
    }
}

//! Tone bank: the `ToneRenderer` that turns note names into backend tones.
//!
//! Tones are keyed by (note, accompaniment), so the user and the accompaniment
//! can hold the same pitch independently. Frequencies come from the tuning
//! context current at `play` time; retuning never touches sounding tones.

use std::collections::BTreeMap;

use duet_core::config::AudioSettings;
use duet_core::{Note, PitchClass, ToneHandle, ToneRenderer, Tuning, TuningContext};

use crate::backend::SynthBackend;

/// Release applied to a tone cut off by a retrigger of the same key.
pub const RETRIGGER_RELEASE_SECS: f32 = 0.05;
pub const STOP_RELEASE_SECS: f32 = 0.3;
pub const STOP_ALL_RELEASE_SECS: f32 = 0.1;
pub const DEFAULT_VOLUME: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ToneKey {
    pub note: Note,
    pub accompaniment: bool,
}

pub struct ToneBank<B: SynthBackend> {
    backend: B,
    tuning: TuningContext,
    volume: f32,
    accompaniment_gain: f32,
    active: BTreeMap<ToneKey, ToneHandle>,
    next_id: u64,
}

impl<B: SynthBackend> ToneBank<B> {
    pub fn new(backend: B, settings: &AudioSettings) -> Self {
        let mut bank = Self {
            backend,
            tuning: settings.tuning,
            volume: DEFAULT_VOLUME,
            accompaniment_gain: settings.accompaniment_gain.clamp(0.0, 1.0),
            active: BTreeMap::new(),
            next_id: 0,
        };
        bank.set_volume(settings.volume);
        bank
    }

    pub fn tuning(&self) -> &TuningContext {
        &self.tuning
    }

    /// Applies to tones started from now on.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        log::debug!(target: "audio", "tuning {}", tuning.short_name());
        self.tuning.tuning = tuning;
    }

    /// Tonic for just intonation; ignored under equal temperament.
    pub fn set_key_root(&mut self, key_root: PitchClass) {
        log::debug!(target: "audio", "key root {}", key_root);
        self.tuning.key_root = key_root;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Master volume, clamped to [0, 1].
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Err(e) = self.backend.set_master_gain(self.volume) {
            log::warn!(target: "audio", "set_master_gain failed: {}", e);
        }
    }

    /// Release every tone, user and accompaniment alike.
    pub fn stop_all(&mut self) {
        let count = self.active.len();
        for (_, id) in std::mem::take(&mut self.active) {
            self.release(id, STOP_ALL_RELEASE_SECS);
        }
        if count > 0 {
            log::debug!(target: "audio", "stopped all {} tones", count);
        }
    }

    pub fn is_active(&self, note: &Note, accompaniment: bool) -> bool {
        self.active.contains_key(&ToneKey {
            note: *note,
            accompaniment,
        })
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn release(&self, id: ToneHandle, release_secs: f32) {
        if let Err(e) = self.backend.release_tone(id, release_secs) {
            log::warn!(target: "audio", "release_tone {} failed: {}", id, e);
        }
    }
}

impl<B: SynthBackend> ToneRenderer for ToneBank<B> {
    fn play(&mut self, note: &Note, velocity: f32, accompaniment: bool) -> ToneHandle {
        let key = ToneKey {
            note: *note,
            accompaniment,
        };
        if let Some(previous) = self.active.remove(&key) {
            self.release(previous, RETRIGGER_RELEASE_SECS);
        }

        self.next_id += 1;
        let id = ToneHandle::new(self.next_id);
        let frequency = self.tuning.frequency_of(note);
        let gain = if accompaniment {
            self.accompaniment_gain
        } else {
            1.0
        };
        let amplitude = velocity.clamp(0.0, 1.0) * gain;

        if let Err(e) = self.backend.start_tone(id, frequency, amplitude) {
            log::warn!(target: "audio", "start_tone {} failed: {}", note, e);
        }
        self.active.insert(key, id);
        id
    }

    fn stop(&mut self, note: &Note, accompaniment: bool) {
        let key = ToneKey {
            note: *note,
            accompaniment,
        };
        if let Some(id) = self.active.remove(&key) {
            self.release(id, STOP_RELEASE_SECS);
        }
    }
}

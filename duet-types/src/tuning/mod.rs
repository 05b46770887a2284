//! Tuning system: pitch-to-frequency conversion for equal temperament and
//! just intonation relative to a single tonic.
//!
//! Pure functions, no audio dependencies. The just-intoned lattice is anchored
//! to one key root per call and does not track comma drift across
//! modulations; switching the key root retunes every note at once.

pub mod ratios;

use serde::{Deserialize, Serialize};

use crate::music::{PitchClass, Tuning};
use crate::pitch::Note;

/// Reference frequency for A4.
pub const A4_HZ: f64 = 440.0;

/// Everything `frequency_of` needs besides the note itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningContext {
    pub tuning: Tuning,
    /// Tonic for just intonation; ignored under equal temperament.
    pub key_root: PitchClass,
    pub tuning_a4: f64,
}

impl Default for TuningContext {
    fn default() -> Self {
        Self {
            tuning: Tuning::EqualTemperament,
            key_root: PitchClass::C,
            tuning_a4: A4_HZ,
        }
    }
}

impl TuningContext {
    pub fn new(tuning: Tuning, key_root: PitchClass) -> Self {
        Self {
            tuning,
            key_root,
            ..Default::default()
        }
    }

    pub fn frequency_of(&self, note: &Note) -> f64 {
        match self.tuning {
            Tuning::EqualTemperament => et_freq(note, self.tuning_a4),
            Tuning::JustIntonation => just_freq(note, self.key_root, self.tuning_a4),
        }
    }
}

/// Frequency of `note` with A4 = 440 Hz.
pub fn frequency_of(note: &Note, tuning: Tuning, key_root: PitchClass) -> f64 {
    TuningContext::new(tuning, key_root).frequency_of(note)
}

/// Standard 12-TET formula
pub fn et_freq(note: &Note, tuning_a4: f64) -> f64 {
    tuning_a4 * 2.0_f64.powf(note.semitones_from_a4() as f64 / 12.0)
}

/// Just intonation: ratio lookup against the tonic in the note's own octave.
fn just_freq(note: &Note, key_root: PitchClass, tuning_a4: f64) -> f64 {
    let root_freq = et_freq(&Note::new(key_root, note.octave), tuning_a4);

    let raw = note.pitch_class.semitone() as i32 - key_root.semitone() as i32;
    let ratio = ratios::ratio_for(raw.rem_euclid(12) as u8);

    // Below the tonic in pitch-class order: the lattice tone sits an octave up, fold it back.
    if raw < 0 {
        root_freq * ratio / 2.0
    } else {
        root_freq * ratio
    }
}

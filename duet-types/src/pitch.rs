//! Note identity: pitch class plus octave, with the `<Name><octave>` text form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DuetError;
use crate::music::PitchClass;

/// A concrete pitch, e.g. `C#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Note {
    pub octave: i32,
    pub pitch_class: PitchClass,
}

impl Note {
    pub fn new(pitch_class: PitchClass, octave: i32) -> Self {
        Self {
            octave,
            pitch_class,
        }
    }

    /// Parse `[A-G]#?<digit>`. Flats, lowercase and multi-digit octaves are rejected.
    pub fn parse(text: &str) -> Result<Self, DuetError> {
        let invalid = || DuetError::InvalidNoteFormat(text.to_string());
        let bytes = text.as_bytes();
        let (name_len, digit) = match bytes {
            [b'A'..=b'G', d] => (1, *d),
            [b'A'..=b'G', b'#', d] => (2, *d),
            _ => return Err(invalid()),
        };
        if !digit.is_ascii_digit() {
            return Err(invalid());
        }
        let pitch_class = text[..name_len].parse::<PitchClass>().map_err(|_| invalid())?;
        Ok(Self::new(pitch_class, (digit - b'0') as i32))
    }

    /// Shift by `semitones`, carrying into the octave by floor division.
    pub fn transpose(&self, semitones: i32) -> Self {
        let total = self.pitch_class.semitone() as i32 + semitones;
        Self::new(
            PitchClass::from_semitone(total),
            self.octave + total.div_euclid(12),
        )
    }

    /// Semitones above A4 (negative below).
    pub fn semitones_from_a4(&self) -> i32 {
        (self.octave - 4) * 12 + self.pitch_class.semitone() as i32 - 9
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class.name(), self.octave)
    }
}

impl FromStr for Note {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s)
    }
}

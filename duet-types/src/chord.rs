use std::fmt;

use serde::{Deserialize, Serialize};

use crate::music::PitchClass;
use crate::pitch::Note;

/// Interval pattern that gives a chord its harmonic color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 7] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::Dominant7,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            ChordQuality::Major7 => "major7",
            ChordQuality::Minor7 => "minor7",
            ChordQuality::Dominant7 => "dominant7",
        }
    }

    /// Short chord-symbol suffix.
    pub fn label(&self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "min7",
            ChordQuality::Dominant7 => "7",
        }
    }

    /// Semitone offsets from the chord root, ascending.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
        }
    }
}

/// A chord chosen for one played note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
    /// Octave the voicing starts from; never below 2.
    pub base_octave: i32,
}

impl Chord {
    pub const MIN_BASE_OCTAVE: i32 = 2;

    pub fn new(root: PitchClass, quality: ChordQuality, base_octave: i32) -> Self {
        Self {
            root,
            quality,
            base_octave: base_octave.max(Self::MIN_BASE_OCTAVE),
        }
    }

    pub fn intervals(&self) -> &'static [u8] {
        self.quality.intervals()
    }

    /// Chord tone at `interval` above the root, voiced from `base_octave`.
    pub fn tone(&self, interval: u8) -> Note {
        Note::new(self.root, self.base_octave).transpose(interval as i32)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.quality.name())
    }
}

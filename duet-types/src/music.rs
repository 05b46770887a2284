use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chord::ChordQuality;
use crate::error::DuetError;

/// One of the 12 pitch classes, named with sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// Ordered from C, so `ALL[n].semitone() == n`.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Semitones above C, 0..=11.
    pub fn semitone(&self) -> u8 {
        *self as u8
    }

    /// Any integer reduced modulo 12, negative values included.
    pub fn from_semitone(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    /// Upward distance from `self` to `target`, in [0, 12).
    pub fn interval_to(&self, target: PitchClass) -> u8 {
        (target.semitone() + 12 - self.semitone()) % 12
    }

    pub fn transpose(&self, semitones: i32) -> Self {
        Self::from_semitone(self.semitone() as i32 + semitones)
    }

    /// The perfect fifth above this pitch class.
    pub fn fifth(&self) -> Self {
        self.transpose(7)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "C" => Ok(PitchClass::C),
            "C#" | "Cs" => Ok(PitchClass::Cs),
            "D" => Ok(PitchClass::D),
            "D#" | "Ds" => Ok(PitchClass::Ds),
            "E" => Ok(PitchClass::E),
            "F" => Ok(PitchClass::F),
            "F#" | "Fs" => Ok(PitchClass::Fs),
            "G" => Ok(PitchClass::G),
            "G#" | "Gs" => Ok(PitchClass::Gs),
            "A" => Ok(PitchClass::A),
            "A#" | "As" => Ok(PitchClass::As),
            "B" => Ok(PitchClass::B),
            _ => Err(DuetError::UnknownKey(s.to_string())),
        }
    }
}

/// Seven-tone scale definition as intervals from root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    Major,
    Minor,
    Dorian,
    Mixolydian,
}

impl Scale {
    /// Declaration order doubles as the key detector's tie-break order.
    pub const ALL: [Scale; 4] = [Scale::Major, Scale::Minor, Scale::Dorian, Scale::Mixolydian];

    pub fn name(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Dorian => "dorian",
            Scale::Mixolydian => "mixolydian",
        }
    }

    /// Semitone intervals from root for this scale
    pub fn intervals(&self) -> &'static [u8; 7] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Mixolydian => &[0, 2, 4, 5, 7, 9, 10],
        }
    }

    /// Diatonic triad quality for each scale degree.
    ///
    /// Only major and minor carry their own table; the modes borrow major's.
    pub fn degree_chords(&self) -> &'static [ChordQuality; 7] {
        use ChordQuality::*;
        const MAJOR: [ChordQuality; 7] = [Major, Minor, Minor, Major, Major, Minor, Diminished];
        const MINOR: [ChordQuality; 7] = [Minor, Diminished, Major, Minor, Minor, Major, Major];
        match self {
            Scale::Minor => &MINOR,
            Scale::Major | Scale::Dorian | Scale::Mixolydian => &MAJOR,
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scale {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::ALL
            .into_iter()
            .find(|scale| scale.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DuetError::UnknownScale(s.to_string()))
    }
}

/// A tonal center: root pitch class plus scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub root: PitchClass,
    pub scale: Scale,
}

impl Key {
    pub fn new(root: PitchClass, scale: Scale) -> Self {
        Self { root, scale }
    }

    /// Pitch classes of the scale, starting at the root.
    pub fn scale_tones(&self) -> [PitchClass; 7] {
        self.scale.intervals().map(|i| self.root.transpose(i as i32))
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.scale.intervals().contains(&self.root.interval_to(pc))
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::new(PitchClass::C, Scale::Major)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.scale)
    }
}

/// Tuning system for pitch-to-frequency conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tuning {
    /// Standard 12-tone equal temperament
    #[default]
    EqualTemperament,
    /// Just intonation ratios relative to a single configured tonic
    JustIntonation,
}

impl Tuning {
    pub const ALL: [Tuning; 2] = [Tuning::EqualTemperament, Tuning::JustIntonation];

    pub fn name(&self) -> &'static str {
        match self {
            Tuning::EqualTemperament => "equal",
            Tuning::JustIntonation => "just",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Tuning::EqualTemperament => "12-TET",
            Tuning::JustIntonation => "Just",
        }
    }
}

impl FromStr for Tuning {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equal" | "et" | "12-tet" | "12tet" => Ok(Tuning::EqualTemperament),
            "just" | "ji" => Ok(Tuning::JustIntonation),
            _ => Err(DuetError::UnknownTuning(s.to_string())),
        }
    }
}

/// Which style generator answers each played note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccompanimentStyle {
    #[default]
    Chords,
    Arpeggio,
    Bass,
    Counterpoint,
}

impl AccompanimentStyle {
    pub const ALL: [AccompanimentStyle; 4] = [
        AccompanimentStyle::Chords,
        AccompanimentStyle::Arpeggio,
        AccompanimentStyle::Bass,
        AccompanimentStyle::Counterpoint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AccompanimentStyle::Chords => "chords",
            AccompanimentStyle::Arpeggio => "arpeggio",
            AccompanimentStyle::Bass => "bass",
            AccompanimentStyle::Counterpoint => "counterpoint",
        }
    }
}

impl fmt::Display for AccompanimentStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AccompanimentStyle {
    type Err = DuetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chords" | "chord" => Ok(AccompanimentStyle::Chords),
            "arpeggio" | "arpeggios" => Ok(AccompanimentStyle::Arpeggio),
            "bass" => Ok(AccompanimentStyle::Bass),
            "counterpoint" => Ok(AccompanimentStyle::Counterpoint),
            _ => Err(DuetError::UnknownStyle(s.to_string())),
        }
    }
}

//! # duet-types
//!
//! Shared type definitions for the piano-duet accompaniment workspace.
//! Pitch and note identity, scales, chord qualities and tuning math live here;
//! nothing in this crate schedules or renders anything.

pub mod chord;
pub mod error;
pub mod music;
pub mod pitch;
pub mod tuning;

pub use chord::{Chord, ChordQuality};
pub use error::{DuetError, Result};
pub use music::{AccompanimentStyle, Key, PitchClass, Scale, Tuning};
pub use pitch::Note;
pub use tuning::{frequency_of, TuningContext};

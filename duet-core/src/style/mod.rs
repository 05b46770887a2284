//! Style generators: chord (plus played note and key, for counterpoint) →
//! ordered, declarative note events.
//!
//! Generators are pure. Cancelling the previous pass is the engine's job and
//! always happens before a generated pass is handed to the scheduler.

pub mod arpeggio;
pub mod bass;
pub mod chords;
pub mod counterpoint;

use std::time::Duration;

use serde::Serialize;

use duet_types::{AccompanimentStyle, Chord, Key, Note};

/// One note to sound `delay` after the pass starts, for `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduledNoteEvent {
    pub note: Note,
    pub delay: Duration,
    pub duration: Duration,
    pub velocity: f32,
}

impl ScheduledNoteEvent {
    pub fn new(note: Note, delay_ms: u64, duration_ms: u64, velocity: f32) -> Self {
        Self {
            note,
            delay: Duration::from_millis(delay_ms),
            duration: Duration::from_millis(duration_ms),
            velocity,
        }
    }

    /// Offset from pass start at which the note is released.
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }
}

/// Run the generator selected by `style`.
pub fn generate(
    style: AccompanimentStyle,
    chord: &Chord,
    played: &Note,
    key: &Key,
) -> Vec<ScheduledNoteEvent> {
    match style {
        AccompanimentStyle::Chords => chords::generate(chord),
        AccompanimentStyle::Arpeggio => arpeggio::generate(chord),
        AccompanimentStyle::Bass => bass::generate(chord),
        AccompanimentStyle::Counterpoint => counterpoint::generate(played, key),
    }
}

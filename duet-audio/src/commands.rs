//! Messages between a front-end and the engine thread.

use serde::Serialize;

use duet_core::{AccompanimentPass, AccompanimentStyle, PitchClass, Tuning};

/// Commands sent from the front-end to the engine thread.
#[derive(Debug, Clone, PartialEq)]
pub enum DuetCmd {
    /// The player pressed a key. The text is passed through as typed so
    /// malformed input still reaches the note history.
    PlayNote { note: String },
    StopNote { note: String },
    Enable,
    Disable,
    SetStyle(AccompanimentStyle),
    SetTuning(Tuning),
    SetKeyRoot(PitchClass),
    SetVolume(f32),
    /// Silence everything at once: accompaniment timers and every tone.
    Panic,
    Shutdown,
}

/// Feedback sent from the engine thread back to the front-end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DuetFeedback {
    /// An accompaniment note started or stopped sounding.
    Highlight { note: String, active: bool },
    /// The harmony chosen for one played note.
    Harmony {
        played: String,
        key: String,
        chord: String,
        style: AccompanimentStyle,
        events: usize,
    },
    Error { message: String },
}

impl DuetFeedback {
    pub fn harmony(pass: &AccompanimentPass) -> Self {
        DuetFeedback::Harmony {
            played: pass.played.to_string(),
            key: pass.key.key.to_string(),
            chord: pass.chord.to_string(),
            style: pass.style,
            events: pass.events.len(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        DuetFeedback::Error {
            message: message.into(),
        }
    }
}

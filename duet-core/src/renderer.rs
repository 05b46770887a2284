//! Collaborator boundary: the tone renderer that makes sound and the UI
//! highlight callback. The engine compiles against these traits only.

use std::sync::{Arc, Mutex};

use duet_types::Note;

/// Opaque handle to a started tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ToneHandle(u64);

impl ToneHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ToneHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Something that can start and stop audible tones.
///
/// Tones are keyed by (note, accompaniment). Implementations must make `play`
/// idempotent per key, silencing the previous tone first, and treat `stop` on
/// an absent key as a no-op. Neither method may call back into the engine.
pub trait ToneRenderer {
    /// `velocity` is in [0, 1].
    fn play(&mut self, note: &Note, velocity: f32, accompaniment: bool) -> ToneHandle;
    fn stop(&mut self, note: &Note, accompaniment: bool);
}

/// UI notification that an accompaniment note started or stopped sounding.
/// Fire-and-forget: must not block.
pub trait KeyHighlighter {
    fn highlight(&mut self, note: &Note, active: bool);
}

impl<F: FnMut(&Note, bool)> KeyHighlighter for F {
    fn highlight(&mut self, note: &Note, active: bool) {
        self(note, active)
    }
}

/// Highlighter for front-ends without a keyboard display.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl KeyHighlighter for NoHighlight {
    fn highlight(&mut self, _note: &Note, _active: bool) {}
}

// ─── Test Doubles ───────────────────────────────────────────────────

/// A renderer call recorded by `TestRenderer`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToneOp {
    Play {
        note: Note,
        velocity: f32,
        accompaniment: bool,
    },
    Stop {
        note: Note,
        accompaniment: bool,
    },
}

/// A renderer that records every call for assertions. Clones share one log,
/// so a test keeps a clone after handing the renderer to the engine.
#[derive(Debug, Clone, Default)]
pub struct TestRenderer {
    ops: Arc<Mutex<Vec<ToneOp>>>,
    next_handle: Arc<Mutex<u64>>,
}

impl TestRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<ToneOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Clear recorded operations.
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Notes passed to `play`, in call order.
    pub fn played(&self) -> Vec<Note> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                ToneOp::Play { note, .. } => Some(*note),
                ToneOp::Stop { .. } => None,
            })
            .collect()
    }

    /// Notes passed to `stop`, in call order.
    pub fn stopped(&self) -> Vec<Note> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                ToneOp::Stop { note, .. } => Some(*note),
                ToneOp::Play { .. } => None,
            })
            .collect()
    }
}

impl ToneRenderer for TestRenderer {
    fn play(&mut self, note: &Note, velocity: f32, accompaniment: bool) -> ToneHandle {
        self.ops.lock().unwrap().push(ToneOp::Play {
            note: *note,
            velocity,
            accompaniment,
        });
        let mut next = self.next_handle.lock().unwrap();
        *next += 1;
        ToneHandle(*next)
    }

    fn stop(&mut self, note: &Note, accompaniment: bool) {
        self.ops.lock().unwrap().push(ToneOp::Stop {
            note: *note,
            accompaniment,
        });
    }
}

/// Highlighter that records `(note, active)` pairs; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingHighlighter {
    calls: Arc<Mutex<Vec<(Note, bool)>>>,
}

impl RecordingHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(Note, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

impl KeyHighlighter for RecordingHighlighter {
    fn highlight(&mut self, note: &Note, active: bool) {
        self.calls.lock().unwrap().push((*note, active));
    }
}

//! Synth backend trait: the sound-producing side of the tone bank.
//!
//! `SynthBackend` captures what the bank *means* to do (start a tone at a
//! frequency, release it over some time, set the master gain) independently
//! of how it is rendered. This keeps the tone bank testable without an audio
//! device.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use duet_core::ToneHandle;

/// Result type for backend operations.
pub type BackendResult<T = ()> = Result<T, BackendError>;

/// Error from a backend operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendError(pub String);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

pub trait SynthBackend: Send {
    /// Start a tone. `amplitude` already includes velocity and any
    /// accompaniment attenuation; master gain is applied by the backend.
    fn start_tone(&self, id: ToneHandle, frequency: f64, amplitude: f32) -> BackendResult;

    /// Fade a tone out over `release_secs`, then free it.
    fn release_tone(&self, id: ToneHandle, release_secs: f32) -> BackendResult;

    fn set_master_gain(&self, gain: f32) -> BackendResult;
}

impl<B: SynthBackend + Sync + ?Sized> SynthBackend for Arc<B> {
    fn start_tone(&self, id: ToneHandle, frequency: f64, amplitude: f32) -> BackendResult {
        (**self).start_tone(id, frequency, amplitude)
    }

    fn release_tone(&self, id: ToneHandle, release_secs: f32) -> BackendResult {
        (**self).release_tone(id, release_secs)
    }

    fn set_master_gain(&self, gain: f32) -> BackendResult {
        (**self).set_master_gain(gain)
    }
}

// ─── Log Backend ────────────────────────────────────────────────────

/// Backend with no audio device: every call becomes a debug log line.
#[derive(Debug, Default)]
pub struct LogBackend;

impl SynthBackend for LogBackend {
    fn start_tone(&self, id: ToneHandle, frequency: f64, amplitude: f32) -> BackendResult {
        log::debug!(target: "audio", "tone {} on: {:.2} Hz amp {:.3}", id, frequency, amplitude);
        Ok(())
    }

    fn release_tone(&self, id: ToneHandle, release_secs: f32) -> BackendResult {
        log::debug!(target: "audio", "tone {} off: release {:.2}s", id, release_secs);
        Ok(())
    }

    fn set_master_gain(&self, gain: f32) -> BackendResult {
        log::debug!(target: "audio", "master gain {:.2}", gain);
        Ok(())
    }
}

// ─── Test Backend ───────────────────────────────────────────────────

/// An operation recorded by `TestBackend` for assertion in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOp {
    StartTone {
        id: ToneHandle,
        frequency: f64,
        amplitude: f32,
    },
    ReleaseTone {
        id: ToneHandle,
        release_secs: f32,
    },
    SetMasterGain(f32),
}

/// A test backend that records all operations into a vector for assertions.
/// Operations succeed unless `set_failing(true)` was called; failed calls are
/// still recorded. Uses `Mutex` so the backend is `Send + Sync` and can be
/// shared through an `Arc` with the engine thread.
#[derive(Debug, Default)]
pub struct TestBackend {
    ops: Mutex<Vec<TestOp>>,
    failing: AtomicBool,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<TestOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Clear recorded operations.
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }

    /// Count operations matching a predicate.
    pub fn count<F: Fn(&TestOp) -> bool>(&self, f: F) -> usize {
        self.ops.lock().unwrap().iter().filter(|op| f(op)).count()
    }

    /// Find the first operation matching a predicate.
    pub fn find<F: Fn(&TestOp) -> bool>(&self, f: F) -> Option<TestOp> {
        self.ops.lock().unwrap().iter().find(|op| f(op)).cloned()
    }

    /// Return all (id, frequency, amplitude) passed to `start_tone`.
    pub fn tones_started(&self) -> Vec<(ToneHandle, f64, f32)> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                TestOp::StartTone {
                    id,
                    frequency,
                    amplitude,
                } => Some((*id, *frequency, *amplitude)),
                _ => None,
            })
            .collect()
    }

    /// Return all (id, release) passed to `release_tone`.
    pub fn tones_released(&self) -> Vec<(ToneHandle, f32)> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match op {
                TestOp::ReleaseTone { id, release_secs } => Some((*id, *release_secs)),
                _ => None,
            })
            .collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn record(&self, op: TestOp) -> BackendResult {
        self.ops.lock().unwrap().push(op);
        if self.failing.load(Ordering::SeqCst) {
            Err(BackendError("test backend set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SynthBackend for TestBackend {
    fn start_tone(&self, id: ToneHandle, frequency: f64, amplitude: f32) -> BackendResult {
        self.record(TestOp::StartTone {
            id,
            frequency,
            amplitude,
        })
    }

    fn release_tone(&self, id: ToneHandle, release_secs: f32) -> BackendResult {
        self.record(TestOp::ReleaseTone { id, release_secs })
    }

    fn set_master_gain(&self, gain: f32) -> BackendResult {
        self.record(TestOp::SetMasterGain(gain))
    }
}

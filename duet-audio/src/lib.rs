//! # duet-audio
//!
//! Sound side of the duet: a tone bank that renders accompaniment and player
//! notes through a pluggable synth backend, and an engine thread that owns an
//! `AccompanimentEngine` and fires its timers in real time.
//!
//! Front-ends hold a [`DuetHandle`], send [`DuetCmd`]s and drain
//! [`DuetFeedback`].

pub mod backend;
pub mod commands;
pub mod duet_thread;
pub mod handle;
pub mod tone_bank;

pub use backend::{BackendError, BackendResult, LogBackend, SynthBackend};
pub use commands::{DuetCmd, DuetFeedback};
pub use handle::DuetHandle;
pub use tone_bank::ToneBank;

//! # duet-core
//!
//! Accompaniment decision and scheduling engine. Given a live stream of played
//! notes it infers the key, picks a diatonic chord for each note, expands that
//! chord in the selected playing style, and drives note-on/note-off calls on an
//! external tone renderer through a cancellable timer queue.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use duet_core::config::Config;
//! use duet_core::engine::AccompanimentEngine;
//! use duet_core::clock::SystemClock;
//!
//! let settings = Config::load().settings()?;
//! let mut engine = AccompanimentEngine::new(&settings.engine, renderer, SystemClock::new());
//! engine.enable();
//! engine.play_accompaniment("E4")?;
//! // Drive timers from your loop:
//! engine.tick();
//! ```
//!
//! ## Module Overview
//!
//! - [`key_detect`]: scores the 48 root/scale candidates against recent notes
//! - [`chord_select`]: played note + key → diatonic chord
//! - [`style`]: the four style generators producing `ScheduledNoteEvent`s
//! - [`timer`] / [`clock`]: time-ordered cancellable queue and injectable clocks
//! - [`scheduler`]: note event lifecycle, active-note set, total cancellation
//! - [`renderer`]: collaborator traits (`ToneRenderer`, `KeyHighlighter`) and test doubles
//! - [`history`]: bounded window of recently played notes
//! - [`engine`]: `AccompanimentEngine`, the session object tying it together
//! - [`config`]: TOML configuration loading (embedded defaults + user override)

pub mod chord_select;
pub mod clock;
pub mod config;
pub mod engine;
pub mod history;
pub mod key_detect;
pub mod renderer;
pub mod scheduler;
pub mod style;
pub mod timer;

pub use duet_types::{
    AccompanimentStyle, Chord, ChordQuality, DuetError, Key, Note, PitchClass, Result, Scale,
    Tuning, TuningContext,
};
pub use engine::{AccompanimentEngine, AccompanimentPass};
pub use renderer::{KeyHighlighter, ToneHandle, ToneRenderer};

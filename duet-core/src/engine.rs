//! The accompaniment session: history, style, scheduler and collaborators in
//! one owned object.
//!
//! Every public operation returns without touching the renderer except
//! `cancel_all` (and the operations that call it), whose forced stops are
//! synchronous. Onsets and releases happen only from `tick`, which the owner
//! calls from its loop.

use std::time::Duration;

use duet_types::{AccompanimentStyle, Chord, Note, Result};

use crate::chord_select::select_chord;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineSettings;
use crate::history::NoteHistory;
use crate::key_detect::{detect_key, KeyEstimate};
use crate::renderer::{KeyHighlighter, NoHighlight, ToneRenderer};
use crate::scheduler::{EventId, EventPhase, Scheduler};
use crate::style::{self, ScheduledNoteEvent};

/// What one played note turned into.
#[derive(Debug, Clone, PartialEq)]
pub struct AccompanimentPass {
    pub played: Note,
    pub key: KeyEstimate,
    pub chord: Chord,
    pub style: AccompanimentStyle,
    /// Clock time the event delays are measured from.
    pub start: Duration,
    pub events: Vec<ScheduledNoteEvent>,
    pub ids: Vec<EventId>,
}

pub struct AccompanimentEngine<R: ToneRenderer, C: Clock = SystemClock> {
    enabled: bool,
    style: AccompanimentStyle,
    history: NoteHistory,
    scheduler: Scheduler,
    renderer: R,
    highlighter: Box<dyn KeyHighlighter + Send>,
    clock: C,
}

impl<R: ToneRenderer, C: Clock> AccompanimentEngine<R, C> {
    pub fn new(settings: &EngineSettings, renderer: R, clock: C) -> Self {
        Self {
            enabled: settings.enabled,
            style: settings.style,
            history: NoteHistory::with_capacity(settings.history_size),
            scheduler: Scheduler::new(),
            renderer,
            highlighter: Box::new(NoHighlight),
            clock,
        }
    }

    /// Replace the highlight callback.
    pub fn with_highlighter(mut self, highlighter: impl KeyHighlighter + Send + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Start a session. History from any earlier session is discarded.
    pub fn enable(&mut self) {
        if self.enabled {
            return;
        }
        self.enabled = true;
        self.history.clear();
        log::info!(target: "accompaniment", "enabled ({})", self.style);
    }

    /// End the session: stop everything sounding, drop every pending timer,
    /// forget the history.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.cancel_all();
        self.history.clear();
        log::info!(target: "accompaniment", "disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Takes effect from the next played note; a pass already scheduled
    /// keeps its style.
    pub fn set_style(&mut self, style: AccompanimentStyle) {
        if self.style != style {
            log::debug!(target: "accompaniment", "style {} -> {}", self.style, style);
        }
        self.style = style;
    }

    /// Parse and apply a style name. Unknown names fail here rather than at
    /// the next played note, and leave the current style in place.
    pub fn set_style_name(&mut self, name: &str) -> Result<AccompanimentStyle> {
        let style: AccompanimentStyle = name.parse()?;
        self.set_style(style);
        Ok(style)
    }

    pub fn style(&self) -> AccompanimentStyle {
        self.style
    }

    /// Respond to one played note.
    ///
    /// Returns `Ok(None)` while disabled. The note text is recorded even when
    /// it does not parse; in that case the running pass is left alone and
    /// `InvalidNoteFormat` is returned.
    pub fn play_accompaniment(&mut self, text: &str) -> Result<Option<AccompanimentPass>> {
        if !self.enabled {
            return Ok(None);
        }

        self.history.push(text);
        let played = Note::parse(text).map_err(|e| {
            log::warn!(target: "accompaniment", "{}", e);
            e
        })?;

        let key = detect_key(&self.history.notes());
        let chord = select_chord(&played, &key.key);

        self.cancel_all();

        let events = style::generate(self.style, &chord, &played, &key.key);
        let start = self.clock.now();
        let ids = self.scheduler.schedule_pass(start, events.clone());

        log::debug!(
            target: "accompaniment",
            "{} in {} (score {:.1}) -> {} [{}, {} events]",
            played,
            key.key,
            key.points(),
            chord,
            self.style,
            events.len()
        );

        Ok(Some(AccompanimentPass {
            played,
            key,
            chord,
            style: self.style,
            start,
            events,
            ids,
        }))
    }

    /// Fire every timer due by now. Returns the number fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.scheduler
            .run_due(now, &mut self.renderer, &mut *self.highlighter)
    }

    /// Drop every pending timer and force-stop every sounding accompaniment
    /// note.
    pub fn cancel_all(&mut self) {
        self.scheduler
            .cancel_all(&mut self.renderer, &mut *self.highlighter);
    }

    pub fn active_notes(&self) -> Vec<Note> {
        self.scheduler.active_notes().copied().collect()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_timers()
    }

    /// Time of the next timer, for sleeping until it.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduler.next_due()
    }

    pub fn event_phase(&self, id: EventId) -> Option<EventPhase> {
        self.scheduler.phase(id)
    }

    pub fn history(&self) -> &NoteHistory {
        &self.history
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: ToneRenderer, C: Clock> std::fmt::Debug for AccompanimentEngine<R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccompanimentEngine")
            .field("enabled", &self.enabled)
            .field("style", &self.style)
            .field("history", &self.history.len())
            .field("active", &self.scheduler.active_notes().count())
            .field("pending", &self.scheduler.pending_timers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::renderer::{RecordingHighlighter, TestRenderer};
    use duet_types::{DuetError, Key, PitchClass, Scale};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn note(text: &str) -> Note {
        text.parse().unwrap()
    }

    fn setup(
        style: AccompanimentStyle,
    ) -> (AccompanimentEngine<TestRenderer, ManualClock>, TestRenderer, ManualClock) {
        let renderer = TestRenderer::new();
        let clock = ManualClock::new();
        let settings = EngineSettings {
            enabled: true,
            style,
            ..EngineSettings::default()
        };
        let engine = AccompanimentEngine::new(&settings, renderer.clone(), clock.clone());
        (engine, renderer, clock)
    }

    #[test]
    fn disabled_engine_does_nothing() {
        let (mut engine, renderer, _clock) = setup(AccompanimentStyle::Chords);
        engine.disable();
        assert_eq!(engine.play_accompaniment("C4"), Ok(None));
        assert!(engine.history().is_empty());
        assert_eq!(engine.tick(), 0);
        assert!(renderer.operations().is_empty());
    }

    #[test]
    fn pass_reports_key_and_chord() {
        let (mut engine, _renderer, _clock) = setup(AccompanimentStyle::Chords);
        let pass = engine.play_accompaniment("C4").unwrap().unwrap();
        assert_eq!(pass.played, note("C4"));
        assert_eq!(pass.key.key, Key::new(PitchClass::C, Scale::Major));
        assert_eq!(pass.chord.to_string(), "C major");
        assert_eq!(pass.chord.base_octave, 3);
        assert_eq!(pass.events.len(), 3);
        assert_eq!(pass.ids.len(), 3);
        assert_eq!(engine.pending_timers(), 3);
    }

    #[test]
    fn nothing_sounds_until_tick() {
        let (mut engine, renderer, _clock) = setup(AccompanimentStyle::Bass);
        engine.play_accompaniment("C4").unwrap();
        assert!(renderer.operations().is_empty());
        assert_eq!(engine.tick(), 1);
        assert_eq!(renderer.played(), vec![note("C2")]);
    }

    #[test]
    fn bass_timeline_on_c_major() {
        let (mut engine, renderer, clock) = setup(AccompanimentStyle::Bass);
        let highlighter = RecordingHighlighter::new();
        engine = engine.with_highlighter(highlighter.clone());

        let pass = engine.play_accompaniment("C4").unwrap().unwrap();
        assert_eq!(
            pass.events,
            vec![
                ScheduledNoteEvent::new(note("C2"), 0, 300, 0.5),
                ScheduledNoteEvent::new(note("G2"), 200, 250, 0.4),
            ]
        );

        engine.tick();
        assert_eq!(engine.active_notes(), vec![note("C2")]);

        clock.set(ms(200));
        engine.tick();
        assert_eq!(engine.active_notes(), vec![note("C2"), note("G2")]);

        clock.set(ms(300));
        engine.tick();
        assert_eq!(engine.active_notes(), vec![note("G2")]);

        clock.set(ms(450));
        engine.tick();
        assert!(engine.active_notes().is_empty());
        assert_eq!(engine.pending_timers(), 0);

        assert_eq!(renderer.stopped(), vec![note("C2"), note("G2")]);
        assert_eq!(
            highlighter.calls(),
            vec![
                (note("C2"), true),
                (note("G2"), true),
                (note("C2"), false),
                (note("G2"), false),
            ]
        );
    }

    #[test]
    fn retrigger_leaves_only_new_pass_sounding() {
        let (mut engine, renderer, clock) = setup(AccompanimentStyle::Arpeggio);
        let first = engine.play_accompaniment("C4").unwrap().unwrap();
        clock.set(ms(130));
        engine.tick();
        assert_eq!(engine.active_notes().len(), 2);

        let second = engine.play_accompaniment("A4").unwrap().unwrap();
        for id in &first.ids {
            assert!(!matches!(
                engine.event_phase(*id),
                Some(EventPhase::Pending) | Some(EventPhase::Sounding)
            ));
        }
        assert!(engine.active_notes().is_empty());

        let before = renderer.played().len();
        clock.set(ms(130 + 360));
        engine.tick();

        let new_notes: Vec<Note> = second.events.iter().map(|e| e.note).collect();
        for sounding in engine.active_notes() {
            assert!(new_notes.contains(&sounding), "{} is from the old pass", sounding);
        }
        assert_eq!(renderer.played().len() - before, 4);
    }

    #[test]
    fn disable_then_cancel_leaves_nothing() {
        let (mut engine, _renderer, clock) = setup(AccompanimentStyle::Chords);
        engine.play_accompaniment("E4").unwrap();
        clock.set(ms(20));
        engine.tick();
        assert!(!engine.active_notes().is_empty());

        engine.disable();
        engine.cancel_all();
        assert!(engine.active_notes().is_empty());
        assert_eq!(engine.pending_timers(), 0);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn malformed_note_is_recorded_but_keeps_running_pass() {
        let (mut engine, _renderer, _clock) = setup(AccompanimentStyle::Chords);
        engine.play_accompaniment("C4").unwrap();
        let pending = engine.pending_timers();

        let err = engine.play_accompaniment("H9").unwrap_err();
        assert_eq!(err, DuetError::InvalidNoteFormat("H9".into()));
        assert_eq!(engine.pending_timers(), pending);
        assert_eq!(engine.history().entries().collect::<Vec<_>>(), vec!["C4", "H9"]);
    }

    #[test]
    fn enable_starts_with_fresh_history() {
        let (mut engine, _renderer, _clock) = setup(AccompanimentStyle::Chords);
        engine.play_accompaniment("C4").unwrap();
        engine.disable();
        engine.enable();
        assert!(engine.is_enabled());
        assert!(engine.history().is_empty());
    }

    #[test]
    fn unknown_style_name_is_rejected_up_front() {
        let (mut engine, _renderer, _clock) = setup(AccompanimentStyle::Bass);
        assert_eq!(
            engine.set_style_name("polka"),
            Err(DuetError::UnknownStyle("polka".into()))
        );
        assert_eq!(engine.style(), AccompanimentStyle::Bass);
        assert_eq!(engine.set_style_name("arpeggios"), Ok(AccompanimentStyle::Arpeggio));
    }

    #[test]
    fn history_drives_key_detection() {
        let (mut engine, _renderer, _clock) = setup(AccompanimentStyle::Chords);
        engine.play_accompaniment("A3").unwrap();
        engine.play_accompaniment("C4").unwrap();
        let pass = engine.play_accompaniment("E4").unwrap().unwrap();
        assert_eq!(pass.key.key, Key::new(PitchClass::A, Scale::Minor));
        // E is degree 4 of A minor: minor chord
        assert_eq!(pass.chord.to_string(), "E minor");
    }
}

//! Note event lifecycle manager.
//!
//! Each scheduled note event moves `Pending → Sounding → Released`, or to
//! `Cancelled` from either of the first two. The scheduler owns the timer
//! queue and the set of sounding accompaniment notes; `cancel_all` removes
//! every outstanding timer and force-stops every sounding note, so nothing
//! from a superseded pass can sound after it returns.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use duet_types::Note;

use crate::renderer::{KeyHighlighter, ToneRenderer};
use crate::style::ScheduledNoteEvent;
use crate::timer::TimerQueue;

/// Identifier of one scheduled note event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    Pending,
    Sounding,
    Released,
    Cancelled,
}

impl EventPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, EventPhase::Released | EventPhase::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerAction {
    Onset(EventId),
    Release(EventId),
}

#[derive(Debug)]
struct TrackedEvent {
    event: ScheduledNoteEvent,
    phase: EventPhase,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: TimerQueue<TimerAction>,
    events: BTreeMap<EventId, TrackedEvent>,
    active: BTreeSet<Note>,
    next_event: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an onset timer for each event at `start + delay`.
    ///
    /// Finished events from earlier passes are forgotten here; call
    /// `cancel_all` first to supersede a pass that is still running.
    pub fn schedule_pass(&mut self, start: Duration, events: Vec<ScheduledNoteEvent>) -> Vec<EventId> {
        self.events.retain(|_, tracked| !tracked.phase.is_terminal());

        events
            .into_iter()
            .map(|event| {
                let id = EventId(self.next_event);
                self.next_event += 1;
                self.timers.schedule(start + event.delay, TimerAction::Onset(id));
                self.events.insert(
                    id,
                    TrackedEvent {
                        event,
                        phase: EventPhase::Pending,
                    },
                );
                id
            })
            .collect()
    }

    /// Fire every timer due at or before `now`, in due order. Returns the
    /// number of callbacks run.
    pub fn run_due(
        &mut self,
        now: Duration,
        renderer: &mut dyn ToneRenderer,
        highlighter: &mut dyn KeyHighlighter,
    ) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.pop_due(now) {
            fired += 1;
            match due.payload {
                TimerAction::Onset(id) => self.sound(id, due.due, renderer, highlighter),
                TimerAction::Release(id) => self.release(id, renderer, highlighter),
            }
        }
        fired
    }

    fn sound(
        &mut self,
        id: EventId,
        due: Duration,
        renderer: &mut dyn ToneRenderer,
        highlighter: &mut dyn KeyHighlighter,
    ) {
        let Some(tracked) = self.events.get_mut(&id) else {
            return;
        };
        let note = tracked.event.note;
        log::trace!(target: "scheduler", "note on {} (event {})", note, id.0);

        renderer.play(&note, tracked.event.velocity, true);
        self.active.insert(note);
        highlighter.highlight(&note, true);

        // Release is timed from the scheduled onset, not from when we got here.
        self.timers.schedule(due + tracked.event.duration, TimerAction::Release(id));
        tracked.phase = EventPhase::Sounding;
    }

    fn release(
        &mut self,
        id: EventId,
        renderer: &mut dyn ToneRenderer,
        highlighter: &mut dyn KeyHighlighter,
    ) {
        let Some(tracked) = self.events.get_mut(&id) else {
            return;
        };
        let note = tracked.event.note;
        log::trace!(target: "scheduler", "note off {} (event {})", note, id.0);

        renderer.stop(&note, true);
        self.active.remove(&note);
        highlighter.highlight(&note, false);

        tracked.phase = EventPhase::Released;
    }

    /// Cancel every outstanding onset and release timer, stop every sounding
    /// accompaniment note, and clear the active set.
    pub fn cancel_all(&mut self, renderer: &mut dyn ToneRenderer, highlighter: &mut dyn KeyHighlighter) {
        let cancelled = self.timers.cancel_all();

        for tracked in self.events.values_mut() {
            if !tracked.phase.is_terminal() {
                tracked.phase = EventPhase::Cancelled;
            }
        }

        let stopped = self.active.len();
        for note in std::mem::take(&mut self.active) {
            renderer.stop(&note, true);
            highlighter.highlight(&note, false);
        }

        if cancelled > 0 || stopped > 0 {
            log::debug!(
                target: "scheduler",
                "cancelled {} timers, force-stopped {} notes",
                cancelled,
                stopped
            );
        }
    }

    pub fn phase(&self, id: EventId) -> Option<EventPhase> {
        self.events.get(&id).map(|tracked| tracked.phase)
    }

    /// Accompaniment notes currently sounding.
    pub fn active_notes(&self) -> impl Iterator<Item = &Note> {
        self.active.iter()
    }

    pub fn is_sounding(&self, note: &Note) -> bool {
        self.active.contains(note)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// True when no timer is queued and nothing is sounding.
    pub fn is_idle(&self) -> bool {
        self.timers.is_empty() && self.active.is_empty()
    }
}

#![allow(dead_code)]
//! Test harness utilities for duet-core integration tests.

use std::time::Duration;

use duet_core::clock::ManualClock;
use duet_core::config::EngineSettings;
use duet_core::renderer::{RecordingHighlighter, TestRenderer};
use duet_core::{AccompanimentEngine, AccompanimentStyle, Note};

pub type TestEngine = AccompanimentEngine<TestRenderer, ManualClock>;

/// An enabled engine on a virtual clock, plus handles to its recorders.
pub struct Harness {
    pub engine: TestEngine,
    pub renderer: TestRenderer,
    pub highlighter: RecordingHighlighter,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new(style: AccompanimentStyle) -> Self {
        let renderer = TestRenderer::new();
        let highlighter = RecordingHighlighter::new();
        let clock = ManualClock::new();
        let settings = EngineSettings {
            enabled: true,
            style,
            ..EngineSettings::default()
        };
        let engine = AccompanimentEngine::new(&settings, renderer.clone(), clock.clone())
            .with_highlighter(highlighter.clone());
        Self {
            engine,
            renderer,
            highlighter,
            clock,
        }
    }

    /// Step the clock 1ms at a time up to `until` (absolute), ticking each step.
    pub fn run_until(&mut self, until: Duration) -> usize {
        let mut fired = self.engine.tick();
        while self.clock_now() < until {
            self.clock.advance(Duration::from_millis(1));
            fired += self.engine.tick();
        }
        fired
    }

    /// Run until no timer is left, or `limit` of virtual time has passed.
    pub fn drain(&mut self, limit: Duration) -> usize {
        let deadline = self.clock_now() + limit;
        let mut fired = 0;
        while let Some(due) = self.engine.next_due() {
            if due > deadline {
                break;
            }
            if due > self.clock_now() {
                self.clock.set(due);
            }
            fired += self.engine.tick();
        }
        fired
    }

    pub fn clock_now(&self) -> Duration {
        use duet_core::clock::Clock;
        self.clock.now()
    }
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn note(text: &str) -> Note {
    text.parse().unwrap()
}

pub fn names(notes: &[Note]) -> Vec<String> {
    notes.iter().map(|n| n.to_string()).collect()
}

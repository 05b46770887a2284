use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};

use duet_core::clock::SystemClock;
use duet_core::config::Settings;
use duet_core::{AccompanimentEngine, Note, ToneRenderer};

use crate::backend::SynthBackend;
use crate::commands::{DuetCmd, DuetFeedback};
use crate::tone_bank::ToneBank;

/// Timers are checked this often.
pub const TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the engine and its tone bank. Runs on its own thread; everything
/// else talks to it through `DuetCmd` and hears back through `DuetFeedback`.
pub struct DuetThread<B: SynthBackend> {
    cmd_rx: Receiver<DuetCmd>,
    feedback_tx: Sender<DuetFeedback>,
    engine: AccompanimentEngine<ToneBank<B>, SystemClock>,
    user_velocity: f32,
    last_tick: Instant,
}

impl<B: SynthBackend> DuetThread<B> {
    pub fn new(
        cmd_rx: Receiver<DuetCmd>,
        feedback_tx: Sender<DuetFeedback>,
        backend: B,
        settings: &Settings,
    ) -> Self {
        let bank = ToneBank::new(backend, &settings.audio);
        let highlight_tx = feedback_tx.clone();
        let engine = AccompanimentEngine::new(&settings.engine, bank, SystemClock::new())
            .with_highlighter(move |note: &Note, active: bool| {
                let _ = highlight_tx.send(DuetFeedback::Highlight {
                    note: note.to_string(),
                    active,
                });
            });

        Self {
            cmd_rx,
            feedback_tx,
            engine,
            user_velocity: settings.audio.user_velocity,
            last_tick: Instant::now(),
        }
    }

    pub fn run(mut self) {
        loop {
            let remaining = TICK_INTERVAL.saturating_sub(self.last_tick.elapsed());

            crossbeam_channel::select! {
                recv(self.cmd_rx) -> result => {
                    match result {
                        Ok(cmd) => {
                            if self.handle_cmd(cmd) {
                                break;
                            }
                        }
                        Err(_) => break, // Disconnected
                    }
                }
                default(remaining) => {}
            }

            if self.drain_commands() {
                break;
            }

            if self.last_tick.elapsed() >= TICK_INTERVAL {
                self.last_tick = Instant::now();
                self.engine.tick();
            }
        }

        self.engine.cancel_all();
        self.engine.renderer_mut().stop_all();
        log::debug!(target: "audio", "engine thread stopped");
    }

    /// Handle whatever else queued up while the last command ran.
    fn drain_commands(&mut self) -> bool {
        const MAX_COUNT: usize = 64;
        for _ in 0..MAX_COUNT {
            match self.cmd_rx.try_recv() {
                Ok(cmd) => {
                    if self.handle_cmd(cmd) {
                        return true;
                    }
                }
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => return true,
            }
        }
        false
    }

    /// Returns true on shutdown.
    fn handle_cmd(&mut self, cmd: DuetCmd) -> bool {
        match cmd {
            DuetCmd::PlayNote { note } => self.play_note(&note),
            DuetCmd::StopNote { note } => match Note::parse(&note) {
                Ok(played) => self.engine.renderer_mut().stop(&played, false),
                Err(e) => log::warn!(target: "audio", "stop ignored: {}", e),
            },
            DuetCmd::Enable => self.engine.enable(),
            DuetCmd::Disable => self.engine.disable(),
            DuetCmd::SetStyle(style) => self.engine.set_style(style),
            DuetCmd::SetTuning(tuning) => self.engine.renderer_mut().set_tuning(tuning),
            DuetCmd::SetKeyRoot(root) => self.engine.renderer_mut().set_key_root(root),
            DuetCmd::SetVolume(volume) => self.engine.renderer_mut().set_volume(volume),
            DuetCmd::Panic => {
                self.engine.cancel_all();
                self.engine.renderer_mut().stop_all();
            }
            DuetCmd::Shutdown => return true,
        }
        false
    }

    /// The player's own tone first, then the accompaniment response.
    fn play_note(&mut self, text: &str) {
        match Note::parse(text) {
            Ok(played) => {
                let velocity = self.user_velocity;
                self.engine.renderer_mut().play(&played, velocity, false);
            }
            Err(e) => self.send(DuetFeedback::error(e.to_string())),
        }

        match self.engine.play_accompaniment(text) {
            Ok(Some(pass)) => self.send(DuetFeedback::harmony(&pass)),
            Ok(None) => {}
            // Already reported above.
            Err(e) => log::debug!(target: "audio", "no accompaniment: {}", e),
        }
    }

    fn send(&self, feedback: DuetFeedback) {
        if self.feedback_tx.send(feedback).is_err() {
            log::debug!(target: "audio", "feedback receiver gone");
        }
    }
}

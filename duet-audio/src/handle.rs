//! DuetHandle: front-end interface to the engine thread.
//!
//! Owns the command and feedback channels. The engine, its timers and the
//! tone bank live on the engine thread.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::Sender as CrossbeamSender;

use duet_core::config::Settings;
use duet_core::{AccompanimentStyle, PitchClass, Tuning};

use crate::backend::SynthBackend;
use crate::commands::{DuetCmd, DuetFeedback};
use crate::duet_thread::DuetThread;

pub struct DuetHandle {
    cmd_tx: CrossbeamSender<DuetCmd>,
    feedback_rx: Receiver<DuetFeedback>,
    join_handle: Option<JoinHandle<()>>,
}

impl DuetHandle {
    pub fn spawn<B: SynthBackend + 'static>(backend: B, settings: Settings) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (feedback_tx, feedback_rx) = mpsc::channel();

        let join_handle = thread::spawn(move || {
            let thread = DuetThread::new(cmd_rx, feedback_tx, backend, &settings);
            thread.run();
        });

        Self {
            cmd_tx,
            feedback_rx,
            join_handle: Some(join_handle),
        }
    }

    pub fn send_cmd(&self, cmd: DuetCmd) -> Result<(), String> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| "Engine thread disconnected".to_string())
    }

    /// Fire-and-forget: send a command and log if the engine thread is gone.
    fn send(&self, cmd: DuetCmd) {
        if let Err(e) = self.send_cmd(cmd) {
            log::warn!(target: "audio", "command dropped: {}", e);
        }
    }

    pub fn play_note(&self, note: &str) {
        self.send(DuetCmd::PlayNote {
            note: note.to_string(),
        });
    }

    pub fn stop_note(&self, note: &str) {
        self.send(DuetCmd::StopNote {
            note: note.to_string(),
        });
    }

    pub fn enable(&self) {
        self.send(DuetCmd::Enable);
    }

    pub fn disable(&self) {
        self.send(DuetCmd::Disable);
    }

    pub fn set_style(&self, style: AccompanimentStyle) {
        self.send(DuetCmd::SetStyle(style));
    }

    pub fn set_tuning(&self, tuning: Tuning) {
        self.send(DuetCmd::SetTuning(tuning));
    }

    pub fn set_key_root(&self, root: PitchClass) {
        self.send(DuetCmd::SetKeyRoot(root));
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(DuetCmd::SetVolume(volume));
    }

    pub fn panic(&self) {
        self.send(DuetCmd::Panic);
    }

    pub fn drain_feedback(&mut self) -> Vec<DuetFeedback> {
        let mut out = Vec::new();
        while let Ok(msg) = self.feedback_rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Block up to `timeout` for the next feedback message.
    pub fn recv_feedback_timeout(&self, timeout: Duration) -> Option<DuetFeedback> {
        match self.feedback_rx.recv_timeout(timeout) {
            Ok(msg) => Some(msg),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Stop the engine thread and wait for it. Everything sounding is released.
    pub fn shutdown(&mut self) {
        let _ = self.send_cmd(DuetCmd::Shutdown);
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                log::warn!(target: "audio", "engine thread panicked");
            }
        }
    }
}

impl Drop for DuetHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{TestBackend, TestOp};
    use duet_core::config::EngineSettings;
    use std::sync::Arc;
    use std::time::Instant;

    fn settings(style: AccompanimentStyle) -> Settings {
        Settings {
            engine: EngineSettings {
                style,
                ..EngineSettings::default()
            },
            ..Settings::default()
        }
    }

    /// Collect feedback until `done` holds or two seconds pass.
    fn collect_until(
        handle: &DuetHandle,
        mut done: impl FnMut(&[DuetFeedback]) -> bool,
    ) -> Vec<DuetFeedback> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut seen = Vec::new();
        while Instant::now() < deadline && !done(&seen) {
            if let Some(msg) = handle.recv_feedback_timeout(Duration::from_millis(20)) {
                seen.push(msg);
            }
        }
        seen
    }

    #[test]
    fn plays_user_note_and_accompaniment() {
        let backend = Arc::new(TestBackend::new());
        let mut handle = DuetHandle::spawn(Arc::clone(&backend), settings(AccompanimentStyle::Bass));
        handle.enable();
        handle.play_note("C4");

        let seen = collect_until(&handle, |seen| {
            seen.iter().filter(|f| matches!(f, DuetFeedback::Highlight { active: false, .. })).count() >= 2
        });

        assert!(seen.contains(&DuetFeedback::Harmony {
            played: "C4".to_string(),
            key: "C major".to_string(),
            chord: "C major".to_string(),
            style: AccompanimentStyle::Bass,
            events: 2,
        }));
        assert!(seen.contains(&DuetFeedback::Highlight {
            note: "C2".to_string(),
            active: true,
        }));
        assert!(seen.contains(&DuetFeedback::Highlight {
            note: "G2".to_string(),
            active: false,
        }));

        handle.shutdown();
        // User C4 plus C2 and G2.
        assert_eq!(backend.tones_started().len(), 3);
        let user = backend.tones_started()[0];
        assert!((user.2 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn disabled_session_plays_only_user_tone() {
        let backend = Arc::new(TestBackend::new());
        let mut handle = DuetHandle::spawn(Arc::clone(&backend), settings(AccompanimentStyle::Chords));
        handle.play_note("E4");
        handle.stop_note("E4");
        handle.shutdown();

        assert_eq!(backend.tones_started().len(), 1);
        assert_eq!(backend.tones_released().len(), 1);
        assert!(handle.drain_feedback().is_empty());
    }

    #[test]
    fn malformed_note_reports_error() {
        let backend = Arc::new(TestBackend::new());
        let handle = DuetHandle::spawn(Arc::clone(&backend), settings(AccompanimentStyle::Chords));
        handle.enable();
        handle.play_note("X9");

        let seen = collect_until(&handle, |seen| !seen.is_empty());
        assert_eq!(
            seen,
            vec![DuetFeedback::error("invalid note format: \"X9\"")]
        );
        assert_eq!(backend.tones_started().len(), 0);
    }

    #[test]
    fn panic_releases_everything() {
        let backend = Arc::new(TestBackend::new());
        let mut handle = DuetHandle::spawn(Arc::clone(&backend), settings(AccompanimentStyle::Chords));
        handle.enable();
        handle.play_note("G4");
        collect_until(&handle, |seen| {
            seen.iter().filter(|f| matches!(f, DuetFeedback::Highlight { active: true, .. })).count() >= 3
        });
        handle.panic();
        handle.shutdown();

        assert_eq!(backend.tones_started().len(), 4);
        assert_eq!(backend.tones_released().len(), 4);
        assert!(backend
            .count(|op| matches!(op, TestOp::ReleaseTone { release_secs, .. } if *release_secs == 0.1))
            >= 1);
    }

    #[test]
    fn volume_reaches_backend() {
        let backend = Arc::new(TestBackend::new());
        let mut handle = DuetHandle::spawn(Arc::clone(&backend), Settings::default());
        handle.set_volume(0.25);
        handle.shutdown();
        assert_eq!(
            backend.operations(),
            vec![TestOp::SetMasterGain(0.7), TestOp::SetMasterGain(0.25)]
        );
    }
}

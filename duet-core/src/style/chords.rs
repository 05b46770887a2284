//! Block chords with a slight roll.

use duet_types::Chord;

use super::ScheduledNoteEvent;

const ROLL_STEP_MS: u64 = 15;
const DURATION_MS: u64 = 800;
const BASE_VELOCITY: f32 = 0.4;
const VELOCITY_STEP: f32 = 0.05;

pub fn generate(chord: &Chord) -> Vec<ScheduledNoteEvent> {
    chord
        .intervals()
        .iter()
        .enumerate()
        .map(|(i, &interval)| {
            ScheduledNoteEvent::new(
                chord.tone(interval),
                ROLL_STEP_MS * i as u64,
                DURATION_MS,
                BASE_VELOCITY + VELOCITY_STEP * i as f32,
            )
        })
        .collect()
}

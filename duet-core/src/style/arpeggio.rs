//! Up-and-back arpeggio over the first three chord tones.

use duet_types::Chord;

use super::ScheduledNoteEvent;

/// Indices into the chord's interval list, wrapped for short chords.
const PATTERN: [usize; 4] = [0, 1, 2, 1];
const STEP_MS: u64 = 120;
const DURATION_MS: u64 = 200;
const VELOCITY: f32 = 0.35;

pub fn generate(chord: &Chord) -> Vec<ScheduledNoteEvent> {
    let intervals = chord.intervals();
    PATTERN
        .iter()
        .enumerate()
        .map(|(step, &index)| {
            let interval = intervals[index % intervals.len()];
            ScheduledNoteEvent::new(chord.tone(interval), STEP_MS * step as u64, DURATION_MS, VELOCITY)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_types::{ChordQuality, PitchClass};
    use std::time::Duration;

    #[test]
    fn pattern_goes_up_and_back() {
        let events = generate(&Chord::new(PitchClass::D, ChordQuality::Minor, 3));
        let names: Vec<String> = events.iter().map(|e| e.note.to_string()).collect();
        assert_eq!(names, vec!["D3", "F3", "A3", "F3"]);
        assert_eq!(events[3].delay, Duration::from_millis(360));
        assert!(events.iter().all(|e| e.duration == Duration::from_millis(200)));
        assert!(events.iter().all(|e| (e.velocity - 0.35).abs() < 1e-6));
    }

    #[test]
    fn seventh_chords_use_only_the_triad() {
        let events = generate(&Chord::new(PitchClass::G, ChordQuality::Dominant7, 3));
        let names: Vec<String> = events.iter().map(|e| e.note.to_string()).collect();
        assert_eq!(names, vec!["G3", "B3", "D4", "B3"]);
    }
}

//! Short melodic answer to the played note, snapped into the key.

use duet_types::{Key, Note};

use super::ScheduledNoteEvent;

/// Semitone offsets tried in order; negative ones answer an octave lower.
const DIRECTIONS: [i32; 4] = [-3, -5, 3, -2];
const MAX_ANSWER_NOTES: usize = 3;
const MIN_OCTAVE: i32 = 2;
const STEP_MS: u64 = 150;
const DURATION_MS: u64 = 250;
const VELOCITY: f32 = 0.3;

/// Scale interval nearest to `target` around the circle; first wins on ties.
pub fn snap_to_scale(key: &Key, target: u8) -> u8 {
    let intervals = key.scale.intervals();
    let mut closest = intervals[0];
    let mut min_distance = u8::MAX;
    for &interval in intervals {
        let linear = interval.abs_diff(target);
        let distance = linear.min(12 - linear);
        if distance < min_distance {
            min_distance = distance;
            closest = interval;
        }
    }
    closest
}

/// Answer note for one direction.
pub fn answer_note(played: &Note, key: &Key, direction: i32) -> Note {
    let from_root = key.root.interval_to(played.pitch_class) as i32;
    let target = (from_root + direction).rem_euclid(12) as u8;
    let tone = snap_to_scale(key, target);

    let octave = played.octave + if direction < 0 { -1 } else { 0 };
    Note::new(key.root.transpose(tone as i32), octave.max(MIN_OCTAVE))
}

pub fn generate(played: &Note, key: &Key) -> Vec<ScheduledNoteEvent> {
    DIRECTIONS
        .iter()
        .take(MAX_ANSWER_NOTES)
        .enumerate()
        .map(|(i, &direction)| {
            ScheduledNoteEvent::new(
                answer_note(played, key, direction),
                STEP_MS * i as u64,
                DURATION_MS,
                VELOCITY,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_types::{PitchClass, Scale};
    use std::time::Duration;

    fn note(text: &str) -> Note {
        text.parse().unwrap()
    }

    fn names(events: &[ScheduledNoteEvent]) -> Vec<String> {
        events.iter().map(|e| e.note.to_string()).collect()
    }

    #[test]
    fn answers_e4_in_c_major() {
        let key = Key::new(PitchClass::C, Scale::Major);
        let events = generate(&note("E4"), &key);
        assert_eq!(names(&events), vec!["C3", "B3", "G4"]);
        let delays: Vec<Duration> = events.iter().map(|e| e.delay).collect();
        assert_eq!(
            delays,
            vec![Duration::ZERO, Duration::from_millis(150), Duration::from_millis(300)]
        );
        assert!(events.iter().all(|e| e.duration == Duration::from_millis(250)));
        assert!(events.iter().all(|e| (e.velocity - 0.3).abs() < 1e-6));
    }

    #[test]
    fn answers_c4_in_c_major() {
        let key = Key::new(PitchClass::C, Scale::Major);
        // +3 lands on 3, equidistant from D and E; D comes first.
        assert_eq!(names(&generate(&note("C4"), &key)), vec!["A3", "G3", "D4"]);
    }

    #[test]
    fn snapping_is_circular() {
        // B4 in A minor, -3: target 11 is one step from both 10 and 0 (wrapping); 0 is scanned first.
        let key = Key::new(PitchClass::A, Scale::Minor);
        assert_eq!(snap_to_scale(&key, 11), 0);
        assert_eq!(answer_note(&note("B4"), &key, -3), note("A3"));
    }

    #[test]
    fn octave_is_floored() {
        let key = Key::new(PitchClass::C, Scale::Major);
        let events = generate(&note("E2"), &key);
        assert_eq!(names(&events), vec!["C2", "B2", "G2"]);
    }

    #[test]
    fn fourth_direction_is_never_emitted() {
        let key = Key::new(PitchClass::G, Scale::Mixolydian);
        assert_eq!(generate(&note("D5"), &key).len(), 3);
    }
}

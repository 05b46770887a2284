//! Diatonic harmonization: played note + detected key → chord.

use duet_types::{Chord, Key, Note, Scale};

/// Index of the scale degree nearest to `interval` (semitones above the root).
///
/// Distance is plain, not circular; the ascending scan keeps the first degree
/// on ties.
pub fn closest_degree(scale: Scale, interval: u8) -> usize {
    let mut closest = 0;
    let mut min_distance = u8::MAX;
    for (degree, &degree_interval) in scale.intervals().iter().enumerate() {
        let distance = degree_interval.abs_diff(interval);
        if distance < min_distance {
            min_distance = distance;
            closest = degree;
        }
    }
    closest
}

/// Chord built on the scale degree closest to `played`, voiced one octave
/// below it (never under octave 2).
pub fn select_chord(played: &Note, key: &Key) -> Chord {
    let interval = key.root.interval_to(played.pitch_class);
    let degree = closest_degree(key.scale, interval);

    let root = key.root.transpose(key.scale.intervals()[degree] as i32);
    let quality = key.scale.degree_chords()[degree];
    Chord::new(root, quality, played.octave - 1)
}

//! Root-then-fifth bass figure in a fixed low octave.

use duet_types::{Chord, Note};

use super::ScheduledNoteEvent;

const BASS_OCTAVE: i32 = 2;

pub fn generate(chord: &Chord) -> Vec<ScheduledNoteEvent> {
    vec![
        ScheduledNoteEvent::new(Note::new(chord.root, BASS_OCTAVE), 0, 300, 0.5),
        ScheduledNoteEvent::new(Note::new(chord.root.fifth(), BASS_OCTAVE), 200, 250, 0.4),
    ]
}

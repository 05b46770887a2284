//! Key detection from a short window of recently played notes.
//!
//! Every root × scale candidate is scored by how many history notes it
//! contains, with bonuses for hitting the root or its fifth. Scores are not
//! normalized by history length.

use duet_types::{Key, Note, PitchClass, Scale};

/// Scores are kept in tenths so equal totals compare equal.
pub const MEMBER_POINTS: u32 = 10;
/// Added when a note is the candidate's root.
pub const ROOT_BONUS: u32 = 5;
/// Added when a note is the fifth above the candidate's root.
pub const FIFTH_BONUS: u32 = 3;

/// Winning candidate and its score in tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEstimate {
    pub key: Key,
    pub score: u32,
}

impl KeyEstimate {
    /// Score on the 1 / 0.5 / 0.3 scale.
    pub fn points(&self) -> f64 {
        f64::from(self.score) / 10.0
    }
}

/// Score one candidate key against `notes`, in tenths.
pub fn score_key(key: &Key, notes: &[Note]) -> u32 {
    let fifth = key.root.fifth();
    notes
        .iter()
        .map(|note| note.pitch_class)
        .filter(|&pc| key.contains(pc))
        .map(|pc| {
            let mut score = MEMBER_POINTS;
            if pc == key.root {
                score += ROOT_BONUS;
            }
            if pc == fifth {
                score += FIFTH_BONUS;
            }
            score
        })
        .sum()
}

/// All 48 candidates in tie-break order: root C..B outer, `Scale::ALL` inner.
pub fn candidates() -> impl Iterator<Item = Key> {
    PitchClass::ALL
        .into_iter()
        .flat_map(|root| Scale::ALL.into_iter().map(move |scale| Key::new(root, scale)))
}

/// Most likely key for `notes`. An empty slice yields C major with score 0.
///
/// Only a strictly higher score displaces the current best, so ties resolve
/// to the earliest candidate in [`candidates`] order.
pub fn detect_key(notes: &[Note]) -> KeyEstimate {
    let mut best = KeyEstimate {
        key: Key::default(),
        score: 0,
    };
    if notes.is_empty() {
        return best;
    }

    for key in candidates() {
        let score = score_key(&key, notes);
        if score > best.score {
            best = KeyEstimate { key, score };
        }
    }
    best
}

//! Just-intonation ratio table.

/// 12 ratios relative to tonic, indexed by semitone offset (0..12).
pub type RatioTable = [f64; 12];

/// 5-limit ratios used for every just-intoned note.
pub const JUST_RATIOS: RatioTable = [
    1.0,          // Unison      1/1
    16.0 / 15.0,  // Minor 2nd   16/15
    9.0 / 8.0,    // Major 2nd   9/8
    6.0 / 5.0,    // Minor 3rd   6/5
    5.0 / 4.0,    // Major 3rd   5/4
    4.0 / 3.0,    // Perfect 4th 4/3
    45.0 / 32.0,  // Tritone     45/32
    3.0 / 2.0,    // Perfect 5th 3/2
    8.0 / 5.0,    // Minor 6th   8/5
    5.0 / 3.0,    // Major 6th   5/3
    9.0 / 5.0,    // Minor 7th   9/5
    15.0 / 8.0,   // Major 7th   15/8
];

/// Ratio for an interval above the tonic; `offset` is reduced mod 12.
pub fn ratio_for(offset: u8) -> f64 {
    JUST_RATIOS[(offset % 12) as usize]
}

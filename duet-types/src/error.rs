//! Error type shared by every crate in the workspace.
//!
//! The only failure class is malformed input: a note, style, tuning or key
//! name that does not parse. Callers recover locally by skipping or defaulting.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuetError {
    /// Note text did not match `[A-G]#?<digit>`.
    #[error("invalid note format: {0:?}")]
    InvalidNoteFormat(String),

    #[error("unknown accompaniment style: {0:?}")]
    UnknownStyle(String),

    #[error("unknown tuning system: {0:?}")]
    UnknownTuning(String),

    /// Key root that is not one of the 12 pitch-class names.
    #[error("unknown key root: {0:?}")]
    UnknownKey(String),

    #[error("unknown scale: {0:?}")]
    UnknownScale(String),
}

pub type Result<T> = std::result::Result<T, DuetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_quote_the_input() {
        let err = DuetError::InvalidNoteFormat("H4".to_string());
        assert_eq!(err.to_string(), "invalid note format: \"H4\"");

        let err = DuetError::UnknownStyle("polka".to_string());
        assert_eq!(err.to_string(), "unknown accompaniment style: \"polka\"");
    }
}

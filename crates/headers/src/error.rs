//! The single error type raised by every header parser.
//!
//! All grammars report failures through [`HeaderError`]. Messages follow a small set of fixed templates so
//! that every header type words its problems the same way:
//!
//! - `Invalid character 'X' at N in "original text"`
//! - `Missing closing '"' in "original text"`
//! - `Missing charset at N in "original text"`
//! - `Comment present at N in "original text"`
//! - `Failed to convert "q" value "abc", message: invalid float literal`
//!
//! Offsets are 0-based byte positions into the original header value.

use std::error::Error as StdError;
use thiserror::Error;

/// A boxed cause attached to conversion failures.
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Invalid character '{}' at {position} in \"{text}\"", printable(.character))]
    InvalidCharacter { character: char, position: usize, text: String },

    #[error("Missing closing '{}' in \"{text}\"", printable(.delimiter))]
    MissingClosing { delimiter: char, text: String },

    #[error("Missing {label} at {position} in \"{text}\"")]
    Missing { label: &'static str, position: usize, text: String },

    /// Raised by grammars that forbid comments, so callers can single it out.
    #[error("Comment present at {position} in \"{text}\"")]
    CommentPresent { position: usize, text: String },

    #[error("Failed to convert \"{name}\" value \"{value}\", message: {source}")]
    Conversion {
        name: String,
        value: String,
        #[source]
        source: BoxError,
    },

    #[error("{reason}")]
    InvalidValue { reason: String },

    #[error("header value size too large, current: {current_size} exceed the limit {max_size}")]
    TooLarge { current_size: usize, max_size: usize },
}

/// Control characters are shown escaped (`\r`), everything else as is.
fn printable(character: &char) -> String {
    if character.is_control() { character.escape_default().to_string() } else { character.to_string() }
}

impl HeaderError {
    pub fn invalid_character<S: ToString>(character: char, position: usize, text: S) -> Self {
        Self::InvalidCharacter { character, position, text: text.to_string() }
    }

    pub fn missing_closing<S: ToString>(delimiter: char, text: S) -> Self {
        Self::MissingClosing { delimiter, text: text.to_string() }
    }

    pub fn missing<S: ToString>(label: &'static str, position: usize, text: S) -> Self {
        Self::Missing { label, position, text: text.to_string() }
    }

    pub fn comment_present<S: ToString>(position: usize, text: S) -> Self {
        Self::CommentPresent { position, text: text.to_string() }
    }

    pub fn conversion<N: ToString, V: ToString, E: Into<BoxError>>(name: N, value: V, source: E) -> Self {
        Self::Conversion { name: name.to_string(), value: value.to_string(), source: source.into() }
    }

    pub fn invalid_value<S: ToString>(reason: S) -> Self {
        Self::InvalidValue { reason: reason.to_string() }
    }

    pub fn too_large(current_size: usize, max_size: usize) -> Self {
        Self::TooLarge { current_size, max_size }
    }

    /// Returns the byte offset of the offending character, if the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::InvalidCharacter { position, .. } | Self::Missing { position, .. } | Self::CommentPresent { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Moves the reported offset of an error raised on a sub-value by `offset`.
    pub(crate) fn shifted(self, offset: usize) -> Self {
        match self {
            Self::InvalidCharacter { character, position, text } => {
                Self::InvalidCharacter { character, position: position + offset, text }
            }
            Self::Missing { label, position, text } => Self::Missing { label, position: position + offset, text },
            other => other,
        }
    }

    /// Returns true if the header contained a comment where none is allowed.
    pub fn is_comment_present(&self) -> bool {
        matches!(self, Self::CommentPresent { .. })
    }
}

//! Fatal errors raised while decoding a dump.

use vcdscope_source::Location;

/// Token text reported when an error is detected at end of input.
pub const END_OF_INPUT: &str = "<end of input>";

/// An error that stops a parse. No partial store is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VcdError {
    /// The declaration structure is inconsistent: unbalanced scopes, a
    /// declaration after `$enddefinitions`, a conflicting identifier code, or
    /// a missing `$enddefinitions`.
    #[error("{location}: {message} (at `{token}`)")]
    Structural {
        /// What is wrong.
        message: String,
        /// The offending token text.
        token: String,
        /// Where the token starts.
        location: Location,
    },
    /// A token does not fit the grammar: malformed header, bad width, unknown
    /// type, a value that matches neither value-change form, or a value that
    /// does not fit its signal.
    #[error("{location}: {message} (at `{token}`)")]
    Grammar {
        /// What is wrong.
        message: String,
        /// The offending token text.
        token: String,
        /// Where the token starts.
        location: Location,
    },
    /// A time marker went backwards under the strict time policy.
    #[error("{location}: time went backwards from #{previous} to #{time}")]
    NonMonotonicTime {
        /// The time that was active before the marker.
        previous: u64,
        /// The offending marker value.
        time: u64,
        /// Where the marker starts.
        location: Location,
    },
}

impl VcdError {
    /// Creates a [`VcdError::Structural`].
    pub fn structural(message: impl Into<String>, token: &str, location: Location) -> Self {
        VcdError::Structural {
            message: message.into(),
            token: token.to_string(),
            location,
        }
    }

    /// Creates a [`VcdError::Grammar`].
    pub fn grammar(message: impl Into<String>, token: &str, location: Location) -> Self {
        VcdError::Grammar {
            message: message.into(),
            token: token.to_string(),
            location,
        }
    }

    /// Returns where the error was detected.
    pub fn location(&self) -> Location {
        match self {
            VcdError::Structural { location, .. }
            | VcdError::Grammar { location, .. }
            | VcdError::NonMonotonicTime { location, .. } => *location,
        }
    }
}

//! Error types for address parsing and construction.

use crate::rd::Tag;

/// Result type alias for address operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Address error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Nothing at the start of the input matched the grammar.
    #[error("Failed to parse address: {input:?}")]
    ParseFailure {
        /// The (trimmed) input that failed to parse.
        input: String,
    },

    /// A prefix parsed but input remained.
    #[error("Partial parse, unparsed remainder: {remainder:?}")]
    PartialParse {
        /// The unconsumed input.
        remainder: String,
    },

    /// A semantic action was missing a value it needs.
    #[error("Construction error: {0}")]
    Construction(String),

    /// The constructed value cannot become the requested type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested type.
        expected: &'static str,
        /// Kind of value actually constructed.
        found: &'static str,
    },

    /// No value was constructed for a node of this production.
    #[error("No value constructed for {0}")]
    UnknownConstructedType(Tag),

    /// A comment has unbalanced parentheses.
    #[error("Invalid comment: {0:?}")]
    InvalidComment(String),

    /// Input exceeds the configured maximum length.
    #[error("Input too long: {length} bytes (max {max})")]
    InputTooLong {
        /// Input length in bytes.
        length: usize,
        /// Configured limit.
        max: usize,
    },

    /// Comments nest deeper than the configured maximum.
    #[error("Comments nested too deeply: depth {depth} (max {max})")]
    NestingTooDeep {
        /// Deepest nesting found.
        depth: usize,
        /// Configured limit.
        max: usize,
    },

    /// A MIME encoded word could not be decoded.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Base64 decode error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

/// Error returned by the parse entry points.
///
/// A partial parse still carries the value built from the matched prefix,
/// so callers that accept trailing garbage can recover it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError<T> {
    /// The input matched only partially.
    #[error("Partial parse, unparsed remainder: {remainder:?}")]
    Partial {
        /// Value built from the matched prefix.
        parsed: T,
        /// The unconsumed input.
        remainder: String,
    },

    /// Parsing failed outright.
    #[error(transparent)]
    Failed(#[from] Error),
}

impl<T> ParseError<T> {
    /// Returns the partially parsed value, if any.
    #[must_use]
    pub fn into_partial(self) -> Option<(T, String)> {
        match self {
            Self::Partial { parsed, remainder } => Some((parsed, remainder)),
            Self::Failed(_) => None,
        }
    }

    /// Returns the unparsed remainder of a partial parse.
    #[must_use]
    pub fn remainder(&self) -> Option<&str> {
        match self {
            Self::Partial { remainder, .. } => Some(remainder),
            Self::Failed(_) => None,
        }
    }

    /// Returns true for a partial parse.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

impl<T> From<ParseError<T>> for Error {
    fn from(err: ParseError<T>) -> Self {
        match err {
            ParseError::Partial { remainder, .. } => Self::PartialParse { remainder },
            ParseError::Failed(err) => err,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_helpers() {
        let err: ParseError<u32> = ParseError::Partial {
            parsed: 7,
            remainder: "rest".to_string(),
        };
        assert!(err.is_partial());
        assert_eq!(err.remainder(), Some("rest"));
        assert_eq!(err.into_partial(), Some((7, "rest".to_string())));
    }

    #[test]
    fn test_into_error() {
        let err: ParseError<u32> = ParseError::Partial {
            parsed: 7,
            remainder: "rest".to_string(),
        };
        assert_eq!(
            Error::from(err),
            Error::PartialParse {
                remainder: "rest".to_string()
            }
        );

        let err: ParseError<u32> = Error::Construction("x".to_string()).into();
        assert!(!err.is_partial());
        assert!(err.remainder().is_none());
        assert_eq!(Error::from(err), Error::Construction("x".to_string()));
    }

    #[test]
    fn test_display() {
        let err = Error::TypeMismatch {
            expected: "Group",
            found: "Mailbox",
        };
        assert_eq!(err.to_string(), "Type mismatch: expected Group, found Mailbox");
    }
}

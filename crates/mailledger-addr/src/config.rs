//! Parser configuration.

use std::sync::Arc;

use crate::encoding::{Rfc2047Decoder, WordDecoder};
use crate::error::{Error, Result};

/// Default maximum input length in bytes.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 64 * 1024;

/// Default maximum comment nesting depth.
pub const DEFAULT_MAX_COMMENT_DEPTH: usize = 32;

/// Parser configuration.
///
/// Matching backtracks, so its cost grows faster than the input; the
/// limits here bound it for untrusted input.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Inputs longer than this many bytes are rejected.
    pub max_input_length: usize,
    /// Comments nested deeper than this are rejected.
    pub max_comment_depth: usize,
    /// Decoder for MIME encoded words in display names and comments.
    ///
    /// `None` leaves encoded words as they are.
    pub decoder: Option<Arc<dyn WordDecoder>>,
}

impl ParserConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            max_comment_depth: DEFAULT_MAX_COMMENT_DEPTH,
            decoder: Some(Arc::new(Rfc2047Decoder)),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }

    /// Checks `text` against the configured limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InputTooLong`] or [`Error::NestingTooDeep`].
    pub fn check(&self, text: &str) -> Result<()> {
        if text.len() > self.max_input_length {
            tracing::warn!(
                length = text.len(),
                max = self.max_input_length,
                "rejecting oversized address input"
            );
            return Err(Error::InputTooLong {
                length: text.len(),
                max: self.max_input_length,
            });
        }

        let depth = comment_depth(text.as_bytes());
        if depth > self.max_comment_depth {
            tracing::warn!(depth, max = self.max_comment_depth, "rejecting deeply nested comments");
            return Err(Error::NestingTooDeep {
                depth,
                max: self.max_comment_depth,
            });
        }

        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the deepest parenthesis nesting in `input`.
///
/// Parentheses inside quoted strings and domain literals and escaped
/// parentheses do not count. A `"` inside a domain literal is literal text.
fn comment_depth(input: &[u8]) -> usize {
    let mut depth: usize = 0;
    let mut deepest = 0;
    let mut quoted = false;
    let mut literal = false;
    let mut escaping = false;

    for &c in input {
        if escaping {
            escaping = false;
            continue;
        }

        match c {
            b'\\' => escaping = true,
            b'"' if depth == 0 && !literal => quoted = !quoted,
            b'[' if depth == 0 && !quoted => literal = true,
            b']' if literal => literal = false,
            b'(' if !quoted && !literal => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b')' if !quoted && !literal => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

/// Builder for parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfigBuilder {
    max_input_length: usize,
    max_comment_depth: usize,
    decoder: Option<Arc<dyn WordDecoder>>,
}

impl ParserConfigBuilder {
    /// Creates a builder with the default settings.
    #[must_use]
    pub fn new() -> Self {
        let defaults = ParserConfig::new();
        Self {
            max_input_length: defaults.max_input_length,
            max_comment_depth: defaults.max_comment_depth,
            decoder: defaults.decoder,
        }
    }

    /// Sets the maximum input length in bytes.
    #[must_use]
    pub const fn max_input_length(mut self, max: usize) -> Self {
        self.max_input_length = max;
        self
    }

    /// Sets the maximum comment nesting depth.
    #[must_use]
    pub const fn max_comment_depth(mut self, max: usize) -> Self {
        self.max_comment_depth = max;
        self
    }

    /// Sets the MIME word decoder.
    #[must_use]
    pub fn decoder(mut self, decoder: Arc<dyn WordDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Disables MIME word decoding.
    #[must_use]
    pub fn no_decoder(mut self) -> Self {
        self.decoder = None;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ParserConfig {
        ParserConfig {
            max_input_length: self.max_input_length,
            max_comment_depth: self.max_comment_depth,
            decoder: self.decoder,
        }
    }
}

impl Default for ParserConfigBuilder {
    fn default() -> Self {
        Self::new()
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
    fn test_config_new() {
        let config = ParserConfig::new();
        assert_eq!(config.max_input_length, 65536);
        assert_eq!(config.max_comment_depth, 32);
        assert!(config.decoder.is_some());
    }

    #[test]
    fn test_config_builder() {
        let config = ParserConfig::builder()
            .max_input_length(100)
            .max_comment_depth(2)
            .no_decoder()
            .build();

        assert_eq!(config.max_input_length, 100);
        assert_eq!(config.max_comment_depth, 2);
        assert!(config.decoder.is_none());
    }

    #[test]
    fn test_check_length() {
        let config = ParserConfig::builder().max_input_length(5).build();
        assert!(config.check("a@b.c").is_ok());
        assert_eq!(
            config.check("ab@c.d"),
            Err(Error::InputTooLong { length: 6, max: 5 })
        );
    }

    #[test]
    fn test_check_depth() {
        let config = ParserConfig::builder().max_comment_depth(2).build();
        assert!(config.check("a@b (1 (2))").is_ok());
        assert_eq!(
            config.check("a@b (1 (2 (3)))"),
            Err(Error::NestingTooDeep { depth: 3, max: 2 })
        );
    }

    #[test]
    fn test_comment_depth_ignores_quotes_and_escapes() {
        assert_eq!(comment_depth(b"\"(((\" <a@b>"), 0);
        assert_eq!(comment_depth(b"a@b (\\(\\()"), 1);
        assert_eq!(comment_depth(b"a@b (\"(\")"), 2);
    }

    #[test]
    fn test_comment_depth_domain_literal() {
        assert_eq!(comment_depth(b"a@[\"] ((x))"), 2);
        assert_eq!(comment_depth(b"a@[(] (x)"), 1);
        assert_eq!(comment_depth(b"\"[\" (x)"), 1);

        let config = ParserConfig::new();
        let input = format!("a@[\"] {}{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(
            config.check(&input),
            Err(Error::NestingTooDeep { depth: 100, max: 32 })
        );
    }
}

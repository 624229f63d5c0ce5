//! Parse entry points.

use std::sync::LazyLock;

use crate::actions::SemanticActions;
use crate::config::ParserConfig;
use crate::error::{Error, ParseError};
use crate::grammar;
use crate::rd::MatchResult;
use crate::types::{AddrSpec, Address, AddressList, Group, Mailbox, MailboxList};
use crate::value::FromValue;

/// Parser used by the `parse_email_*` functions.
static DEFAULT_PARSER: LazyLock<Parser> = LazyLock::new(Parser::default);

/// Result of a parse entry point.
pub type ParseResult<T> = std::result::Result<T, ParseError<T>>;

/// Address parser.
///
/// Runs the grammar over the trimmed input, then builds the requested type
/// from the match tree. Input left over after a successful match is
/// reported as [`ParseError::Partial`] together with the value built from
/// the matched prefix.
///
/// ```
/// use mailledger_addr::{Parser, ParserConfig};
///
/// let parser = Parser::new(ParserConfig::builder().no_decoder().build());
/// let mailbox = parser.parse_mailbox("=?utf-8?Q?Caf=C3=A9?= <cafe@example.com>")?;
/// assert_eq!(mailbox.display_name(), "=?utf-8?Q?Caf=C3=A9?=");
/// # Ok::<(), mailledger_addr::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    actions: SemanticActions,
}

impl Parser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub fn new(config: ParserConfig) -> Self {
        let actions = SemanticActions::new(config.decoder.clone());
        Self { config, actions }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a single mailbox or group.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_address(&self, text: &str) -> ParseResult<Address> {
        self.parse(text, grammar::match_address)
    }

    /// Parses a comma separated list of mailboxes and groups.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_address_list(&self, text: &str) -> ParseResult<AddressList> {
        self.parse(text, grammar::match_address_list)
    }

    /// Parses a single mailbox.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_mailbox(&self, text: &str) -> ParseResult<Mailbox> {
        self.parse(text, grammar::match_mailbox)
    }

    /// Parses a comma separated list of mailboxes.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_mailbox_list(&self, text: &str) -> ParseResult<MailboxList> {
        self.parse(text, grammar::match_mailbox_list)
    }

    /// Parses a group.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_group(&self, text: &str) -> ParseResult<Group> {
        self.parse(text, grammar::match_group)
    }

    /// Parses a bare `local-part@domain` address.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse_addr_spec(&self, text: &str) -> ParseResult<AddrSpec> {
        self.parse(text, grammar::match_addr_spec)
    }

    fn parse<T>(&self, text: &str, rule: fn(&[u8]) -> MatchResult<'_>) -> ParseResult<T>
    where
        T: FromValue,
    {
        self.config.check(text)?;

        let input = text.trim();
        let matched = grammar::with_comment_limit(self.config.max_comment_depth, || {
            rule(input.as_bytes())
        });
        let Some((mut m, rest)) = matched else {
            tracing::debug!(kind = T::NAME, input, "address parse failed");
            return Err(Error::ParseFailure {
                input: input.to_string(),
            }
            .into());
        };

        let parsed = self.actions.apply_to::<T>(&mut m)?;

        if rest.is_empty() {
            tracing::debug!(kind = T::NAME, "parsed address");
            Ok(parsed)
        } else {
            let remainder = String::from_utf8_lossy(rest).into_owned();
            tracing::debug!(kind = T::NAME, remainder = %remainder, "partial address parse");
            Err(ParseError::Partial { parsed, remainder })
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Parses a single mailbox or group with the default configuration.
///
/// ```
/// use mailledger_addr::{Address, parse_email_address};
///
/// let address = parse_email_address("Group: \"A\" <a@example.com>;")?;
/// let Address::Group(group) = address else { panic!("expected a group") };
/// assert_eq!(group.display_name(), "Group");
/// assert_eq!(group.mailboxes().len(), 1);
/// # Ok::<(), mailledger_addr::Error>(())
/// ```
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_email_address(text: &str) -> ParseResult<Address> {
    DEFAULT_PARSER.parse_address(text)
}

/// Parses an address list with the default configuration.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_email_address_list(text: &str) -> ParseResult<AddressList> {
    DEFAULT_PARSER.parse_address_list(text)
}

/// Parses a mailbox with the default configuration.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_email_mailbox(text: &str) -> ParseResult<Mailbox> {
    DEFAULT_PARSER.parse_mailbox(text)
}

/// Parses a mailbox list with the default configuration.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_email_mailbox_list(text: &str) -> ParseResult<MailboxList> {
    DEFAULT_PARSER.parse_mailbox_list(text)
}

/// Parses a group with the default configuration.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_email_group(text: &str) -> ParseResult<Group> {
    DEFAULT_PARSER.parse_group(text)
}

/// Parses a bare address with the default configuration.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse_email_addr_spec(text: &str) -> ParseResult<AddrSpec> {
    DEFAULT_PARSER.parse_addr_spec(text)
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
    fn test_parse_mailbox() {
        let mailbox = parse_email_mailbox("\"Zip\" <zip@example.com>").unwrap();
        assert_eq!(mailbox.display_name(), "Zip");
        assert_eq!(mailbox.addr_spec().local_part(), "zip");
        assert_eq!(mailbox.addr_spec().domain(), "example.com");
        assert_eq!(mailbox.comment(), "");
    }

    #[test]
    fn test_input_is_trimmed() {
        let spec = parse_email_addr_spec("  \r\n zip@example.com \t").unwrap();
        assert_eq!(spec.to_string(), "zip@example.com");
    }

    #[test]
    fn test_partial_parse() {
        let err = parse_email_mailbox("\"CS\" <charles@example.com> and extra text").unwrap_err();
        assert!(err.is_partial());
        assert_eq!(err.remainder(), Some("and extra text"));

        let (mailbox, _) = err.into_partial().unwrap();
        assert_eq!(mailbox.address(), "charles@example.com");
    }

    #[test]
    fn test_parse_failure() {
        let err = parse_email_mailbox("  <>  ").unwrap_err();
        assert_eq!(
            err,
            ParseError::Failed(Error::ParseFailure {
                input: "<>".to_string()
            })
        );
        assert!(parse_email_addr_spec("").is_err());
    }

    #[test]
    fn test_partial_converts_to_error() {
        let err: Error = parse_email_addr_spec("a@b c").unwrap_err().into();
        assert_eq!(
            err,
            Error::PartialParse {
                remainder: "c".to_string()
            }
        );
    }

    #[test]
    fn test_limits_checked_before_matching() {
        let parser = Parser::new(ParserConfig::builder().max_comment_depth(1).build());
        let err = parser.parse_addr_spec("a@b ((x))").unwrap_err();
        assert_eq!(err, ParseError::Failed(Error::NestingTooDeep { depth: 2, max: 1 }));
        assert!(parser.parse_addr_spec("a@b (x)").is_ok());
    }

    #[test]
    fn test_decoder_follows_config() {
        let input = "=?utf-8?Q?Caf=C3=A9?= <cafe@example.com>";
        assert_eq!(parse_email_mailbox(input).unwrap().display_name(), "Café");

        let parser = Parser::new(ParserConfig::builder().no_decoder().build());
        let mailbox = parser.parse_mailbox(input).unwrap();
        assert_eq!(mailbox.display_name(), "=?utf-8?Q?Caf=C3=A9?=");
        assert!(parser.config().decoder.is_none());
    }
}

//! # mailledger-addr
//!
//! RFC 5322 email address parsing for mail headers.
//!
//! ## Features
//!
//! - **Full grammar**: mailboxes, groups, address lists and bare addresses
//! - **Obsolete syntax**: routes, folded local parts, lists with empty slots
//! - **Round-tripping**: every value keeps the text it was parsed from next
//!   to a clean canonical rendering
//! - **MIME words**: encoded display names and comments are decoded
//! - **Partial parses**: trailing garbage is reported, not silently dropped
//!
//! ## Quick Start
//!
//! ### Parsing a Mailbox
//!
//! ```
//! use mailledger_addr::parse_email_mailbox;
//!
//! let mailbox = parse_email_mailbox("\"Zip\" <zip@example.com>")?;
//! assert_eq!(mailbox.display_name(), "Zip");
//! assert_eq!(mailbox.address(), "zip@example.com");
//! # Ok::<(), mailledger_addr::Error>(())
//! ```
//!
//! ### Parsing an Address List
//!
//! ```
//! use mailledger_addr::parse_email_address_list;
//!
//! let list = parse_email_address_list(
//!     "alice@example.com, Friends: bob@example.com, carol@example.com;",
//! )?;
//! assert_eq!(list.len(), 2);
//! assert_eq!(list.flatten().len(), 3);
//! # Ok::<(), mailledger_addr::Error>(())
//! ```
//!
//! ### Original and Clean Text
//!
//! ```
//! use mailledger_addr::parse_email_mailbox;
//!
//! let mailbox = parse_email_mailbox("ender(weird comment placement)@example.com")?;
//! assert_eq!(mailbox.comment(), "weird comment placement");
//! assert_eq!(
//!     mailbox.original_string(),
//!     "ender(weird comment placement)@example.com"
//! );
//! assert_eq!(
//!     mailbox.clean_string(),
//!     "ender@example.com (weird comment placement)"
//! );
//! # Ok::<(), mailledger_addr::Error>(())
//! ```
//!
//! ### Accepting Partial Input
//!
//! ```
//! use mailledger_addr::parse_email_mailbox;
//!
//! let err = parse_email_mailbox("\"CS\" <charles@example.com> and extra text").unwrap_err();
//! let (mailbox, remainder) = err.into_partial().unwrap();
//! assert_eq!(mailbox.address(), "charles@example.com");
//! assert_eq!(remainder, "and extra text");
//! ```
//!
//! ### Configuration
//!
//! ```
//! use mailledger_addr::{Error, ParseError, Parser, ParserConfig};
//!
//! let parser = Parser::new(ParserConfig::builder().max_input_length(16).build());
//! let err = parser.parse_addr_spec("someone.with.a.long.name@example.com").unwrap_err();
//! assert!(matches!(err, ParseError::Failed(Error::InputTooLong { .. })));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod parse;
mod types;
mod value;

pub mod actions;
pub mod encoding;
pub mod format;
pub mod grammar;
pub mod rd;

pub use config::{
    DEFAULT_MAX_COMMENT_DEPTH, DEFAULT_MAX_INPUT_LENGTH, ParserConfig, ParserConfigBuilder,
};
pub use error::{Error, ParseError, Result};
pub use parse::{
    ParseResult, Parser, parse_email_addr_spec, parse_email_address, parse_email_address_list,
    parse_email_group, parse_email_mailbox, parse_email_mailbox_list,
};
pub use types::{
    AddrSpec, Address, AddressList, EmailAddress, Group, GroupList, Mailbox, MailboxList,
};
pub use value::{FromValue, Value};

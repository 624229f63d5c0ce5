//! Mailbox: an address with optional display name and comment.

use std::fmt;
use std::fmt::Write as _;

use super::{AddrSpec, EmailAddress};
use crate::error::{Error, Result};
use crate::format::{check_comment, escape_display_name};

/// A single mailbox, such as `"Joe Q. Public" <john.q.public@example.com>`.
///
/// The comment collects every parenthesized comment found around the
/// address when parsing; it always has balanced parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    display_name: String,
    addr_spec: AddrSpec,
    comment: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    original: String,
}

impl Mailbox {
    /// Creates a mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComment`] if `comment` has unbalanced
    /// parentheses.
    pub fn new(
        display_name: impl Into<String>,
        addr_spec: AddrSpec,
        comment: impl Into<String>,
    ) -> Result<Self> {
        let comment = comment.into();
        validate_comment(&comment)?;

        Ok(Self {
            display_name: display_name.into(),
            addr_spec,
            comment,
            original: String::new(),
        })
    }

    /// Creates a mailbox, parsing `address` as an addr-spec.
    ///
    /// ```
    /// use mailledger_addr::Mailbox;
    ///
    /// let mailbox = Mailbox::from_parts(
    ///     "Peyton Randalf",
    ///     "peyton.randalf@example.com",
    ///     "Virginia House of Burgesses",
    /// )?;
    /// assert_eq!(
    ///     mailbox.to_string(),
    ///     "\"Peyton Randalf\" <peyton.randalf@example.com> (Virginia House of Burgesses)"
    /// );
    /// # Ok::<(), mailledger_addr::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not a complete addr-spec or the
    /// comment is unbalanced.
    pub fn from_parts(
        display_name: impl Into<String>,
        address: &str,
        comment: impl Into<String>,
    ) -> Result<Self> {
        let addr_spec = crate::parse_email_addr_spec(address)?;
        Self::new(display_name, addr_spec, comment)
    }

    pub(crate) fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = original.into();
        self
    }

    /// Returns the display name, or an empty string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Sets the display name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
        self.original.clear();
    }

    /// Returns the address part.
    #[must_use]
    pub const fn addr_spec(&self) -> &AddrSpec {
        &self.addr_spec
    }

    /// Replaces the address part.
    pub fn set_addr_spec(&mut self, addr_spec: AddrSpec) {
        self.addr_spec = addr_spec;
        self.original.clear();
    }

    /// Replaces the address part by parsing `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is not a complete addr-spec. The
    /// mailbox is left unchanged in that case.
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        let addr_spec = crate::parse_email_addr_spec(address)?;
        self.set_addr_spec(addr_spec);
        Ok(())
    }

    /// Returns the canonical `local-part@domain` text.
    #[must_use]
    pub fn address(&self) -> String {
        self.addr_spec.clean_string()
    }

    /// Returns the local part of the address.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.addr_spec.local_part()
    }

    /// Sets the local part of the address.
    pub fn set_local_part(&mut self, local_part: impl Into<String>) {
        self.addr_spec.set_local_part(local_part);
        self.original.clear();
    }

    /// Returns the domain of the address.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.addr_spec.domain()
    }

    /// Sets the domain of the address.
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.addr_spec.set_domain(domain);
        self.original.clear();
    }

    /// Returns the comment, or an empty string.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Sets the comment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidComment`] if `comment` has unbalanced
    /// parentheses. The mailbox is left unchanged in that case.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<()> {
        let comment = comment.into();
        validate_comment(&comment)?;
        self.comment = comment;
        self.original.clear();
        Ok(())
    }

    /// Returns the best available human readable name.
    ///
    /// That is the display name, else the comment, else the local part.
    #[must_use]
    pub fn guess_name(&self) -> &str {
        if !self.display_name.is_empty() {
            &self.display_name
        } else if !self.comment.is_empty() {
            &self.comment
        } else {
            self.addr_spec.local_part()
        }
    }

    /// Returns the text this mailbox was parsed from, or the canonical form.
    #[must_use]
    pub fn original_string(&self) -> String {
        if self.original.is_empty() {
            self.clean_string()
        } else {
            self.original.clone()
        }
    }

    /// Returns the canonical form.
    ///
    /// The comment, if any, always trails the address.
    #[must_use]
    pub fn clean_string(&self) -> String {
        let mut out = String::new();

        if self.display_name.is_empty() {
            out.push_str(&self.addr_spec.clean_string());
        } else {
            out.push_str(&escape_display_name(&self.display_name));
            let _ = write!(out, " <{}>", self.addr_spec.clean_string());
        }

        if !self.comment.is_empty() {
            let _ = write!(out, " ({})", self.comment);
        }

        out
    }
}

fn validate_comment(comment: &str) -> Result<()> {
    if check_comment(comment) {
        Ok(())
    } else {
        Err(Error::InvalidComment(comment.to_string()))
    }
}

impl From<AddrSpec> for Mailbox {
    fn from(addr_spec: AddrSpec) -> Self {
        let original = addr_spec.original().to_string();
        Self {
            display_name: String::new(),
            addr_spec,
            comment: String::new(),
            original,
        }
    }
}

impl EmailAddress for Mailbox {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn address(&self) -> String {
        Self::address(self)
    }

    fn comment(&self) -> &str {
        &self.comment
    }

    fn original_string(&self) -> String {
        Self::original_string(self)
    }

    fn clean_string(&self) -> String {
        Self::clean_string(self)
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clean_string())
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

    fn spec() -> AddrSpec {
        AddrSpec::new("peyton.randalf", "example.com")
    }

    #[test]
    fn test_new() {
        let mailbox = Mailbox::new("Peyton Randalf", spec(), "").unwrap();
        assert_eq!(mailbox.display_name(), "Peyton Randalf");
        assert_eq!(mailbox.local_part(), "peyton.randalf");
        assert_eq!(mailbox.domain(), "example.com");
        assert_eq!(mailbox.address(), "peyton.randalf@example.com");
        assert_eq!(
            mailbox.clean_string(),
            "\"Peyton Randalf\" <peyton.randalf@example.com>"
        );
    }

    #[test]
    fn test_new_rejects_unbalanced_comment() {
        let err = Mailbox::new("", spec(), "oops (").unwrap_err();
        assert_eq!(err, Error::InvalidComment("oops (".to_string()));
        assert!(Mailbox::new("", spec(), "fine (nested) here").is_ok());
    }

    #[test]
    fn test_from_parts() {
        let mailbox = Mailbox::from_parts(
            "Peyton Randalf",
            "peyton.randalf@example.com",
            "Virginia House of Burgesses",
        )
        .unwrap();
        assert_eq!(
            mailbox.clean_string(),
            "\"Peyton Randalf\" <peyton.randalf@example.com> (Virginia House of Burgesses)"
        );
        assert_eq!(mailbox.original_string(), mailbox.clean_string());
    }

    #[test]
    fn test_from_parts_bad_address() {
        assert!(Mailbox::from_parts("", "not an address", "").is_err());
        assert!(Mailbox::from_parts("", "a@example.com trailing", "").is_err());
    }

    #[test]
    fn test_clean_string_without_name() {
        let mailbox = Mailbox::new("", spec(), "note").unwrap();
        assert_eq!(mailbox.clean_string(), "peyton.randalf@example.com (note)");
    }

    #[test]
    fn test_clean_string_keeps_mime_words() {
        let mailbox = Mailbox::new("=?utf-8?Q?Caf=C3=A9?=", spec(), "").unwrap();
        assert_eq!(
            mailbox.clean_string(),
            "=?utf-8?Q?Caf=C3=A9?= <peyton.randalf@example.com>"
        );
    }

    #[test]
    fn test_mutators_clear_original() {
        let mut mailbox = Mailbox::new("", spec(), "").unwrap().with_original("raw");
        assert_eq!(mailbox.original_string(), "raw");

        mailbox.set_display_name("Peyton");
        assert_eq!(
            mailbox.original_string(),
            "Peyton <peyton.randalf@example.com>"
        );

        let mut mailbox = mailbox.with_original("raw");
        mailbox.set_domain("example.org");
        assert_eq!(mailbox.domain(), "example.org");
        assert_ne!(mailbox.original_string(), "raw");

        let mut mailbox = mailbox.with_original("raw");
        mailbox.set_comment("hi").unwrap();
        assert_ne!(mailbox.original_string(), "raw");
    }

    #[test]
    fn test_set_comment_rejects_unbalanced() {
        let mut mailbox = Mailbox::new("", spec(), "kept").unwrap();
        assert!(mailbox.set_comment(")(").is_err());
        assert_eq!(mailbox.comment(), "kept");
    }

    #[test]
    fn test_set_address() {
        let mut mailbox = Mailbox::new("Peyton", spec(), "").unwrap();
        mailbox.set_address("peyton@example.org").unwrap();
        assert_eq!(mailbox.address(), "peyton@example.org");
        assert!(mailbox.set_address("nope").is_err());
        assert_eq!(mailbox.address(), "peyton@example.org");
    }

    #[test]
    fn test_guess_name() {
        let mut mailbox = Mailbox::new("Name", spec(), "Comment").unwrap();
        assert_eq!(mailbox.guess_name(), "Name");
        mailbox.set_display_name("");
        assert_eq!(mailbox.guess_name(), "Comment");
        mailbox.set_comment("").unwrap();
        assert_eq!(mailbox.guess_name(), "peyton.randalf");
    }

    #[test]
    fn test_from_addr_spec() {
        let mailbox = Mailbox::from(spec());
        assert_eq!(mailbox.display_name(), "");
        assert_eq!(mailbox.comment(), "");
        assert_eq!(mailbox.clean_string(), "peyton.randalf@example.com");
    }
}

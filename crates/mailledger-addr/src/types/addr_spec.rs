//! Bare address (`local-part@domain`).

use std::fmt;

use super::EmailAddress;
use crate::format::maybe_escape;

/// An address without display name or comment.
///
/// Parsed values remember the text they were parsed from. Any mutation
/// forgets it, after which [`original_string`](Self::original_string)
/// returns the canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrSpec {
    local_part: String,
    domain: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    original: String,
}

impl AddrSpec {
    /// Creates an address from its parts.
    ///
    /// ```
    /// use mailledger_addr::AddrSpec;
    ///
    /// let spec = AddrSpec::new("john.q.public", "example.com");
    /// assert_eq!(spec.to_string(), "john.q.public@example.com");
    /// ```
    #[must_use]
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
            original: String::new(),
        }
    }

    pub(crate) fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = original.into();
        self
    }

    pub(crate) fn original(&self) -> &str {
        &self.original
    }

    /// Returns the local part.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Sets the local part.
    pub fn set_local_part(&mut self, local_part: impl Into<String>) {
        self.local_part = local_part.into();
        self.original.clear();
    }

    /// Returns the domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Sets the domain.
    pub fn set_domain(&mut self, domain: impl Into<String>) {
        self.domain = domain.into();
        self.original.clear();
    }

    /// Returns the text this address was parsed from, or the canonical form.
    #[must_use]
    pub fn original_string(&self) -> String {
        if self.original.is_empty() {
            self.clean_string()
        } else {
            self.original.clone()
        }
    }

    /// Returns the canonical form, quoting the local part if needed.
    #[must_use]
    pub fn clean_string(&self) -> String {
        format!("{}@{}", maybe_escape(&self.local_part, false), self.domain)
    }
}

impl EmailAddress for AddrSpec {
    fn display_name(&self) -> &str {
        ""
    }

    fn address(&self) -> String {
        self.clean_string()
    }

    fn comment(&self) -> &str {
        ""
    }

    fn original_string(&self) -> String {
        Self::original_string(self)
    }

    fn clean_string(&self) -> String {
        Self::clean_string(self)
    }
}

impl fmt::Display for AddrSpec {
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

    #[test]
    fn test_new() {
        let spec = AddrSpec::new("user", "example.com");
        assert_eq!(spec.local_part(), "user");
        assert_eq!(spec.domain(), "example.com");
        assert_eq!(spec.clean_string(), "user@example.com");
        assert_eq!(spec.original_string(), "user@example.com");
    }

    #[test]
    fn test_quoted_local_part() {
        let spec = AddrSpec::new("john smith", "example.com");
        assert_eq!(spec.clean_string(), "\"john smith\"@example.com");
    }

    #[test]
    fn test_mutation_clears_original() {
        let mut spec = AddrSpec::new("user", "example.com").with_original("user @ example.com");
        assert_eq!(spec.original_string(), "user @ example.com");

        spec.set_domain("example.org");
        assert_eq!(spec.original_string(), "user@example.org");

        let mut spec = spec.with_original("x");
        spec.set_local_part("other");
        assert_eq!(spec.original_string(), "other@example.org");
    }

    #[test]
    fn test_email_address_trait() {
        let spec = AddrSpec::new("user", "example.com");
        let addr: &dyn EmailAddress = &spec;
        assert_eq!(addr.display_name(), "");
        assert_eq!(addr.address(), "user@example.com");
        assert_eq!(addr.comment(), "");
    }
}

//! Named group of mailboxes.

use std::fmt;

use super::{EmailAddress, MailboxList};
use crate::format::escape_display_name;

/// A group address, such as `Brotherhood: winston@example.com;`.
///
/// Groups carry no comment of their own; comments inside the group belong
/// to its mailboxes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    display_name: String,
    mailboxes: MailboxList,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    original: String,
}

impl Group {
    /// Creates a group.
    #[must_use]
    pub fn new(display_name: impl Into<String>, mailboxes: impl Into<MailboxList>) -> Self {
        Self {
            display_name: display_name.into(),
            mailboxes: mailboxes.into(),
            original: String::new(),
        }
    }

    pub(crate) fn with_original(mut self, original: impl Into<String>) -> Self {
        self.original = original.into();
        self
    }

    /// Returns the group name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Sets the group name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
        self.original.clear();
    }

    /// Returns the members of the group.
    #[must_use]
    pub const fn mailboxes(&self) -> &MailboxList {
        &self.mailboxes
    }

    /// Replaces the members of the group.
    pub fn set_mailboxes(&mut self, mailboxes: impl Into<MailboxList>) {
        self.mailboxes = mailboxes.into();
        self.original.clear();
    }

    /// Returns the canonical text of the members.
    #[must_use]
    pub fn address(&self) -> String {
        self.mailboxes.clean_string()
    }

    /// Returns the text this group was parsed from, or the canonical form.
    #[must_use]
    pub fn original_string(&self) -> String {
        if self.original.is_empty() {
            self.clean_string()
        } else {
            self.original.clone()
        }
    }

    /// Returns the canonical form: `name: member, member;`.
    ///
    /// A group without a name is written as `"": member;`.
    #[must_use]
    pub fn clean_string(&self) -> String {
        let name = if self.display_name.is_empty() {
            "\"\"".to_string()
        } else {
            escape_display_name(&self.display_name)
        };
        format!("{name}: {};", self.mailboxes.clean_string())
    }
}

impl EmailAddress for Group {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn address(&self) -> String {
        Self::address(self)
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

impl fmt::Display for Group {
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
    use crate::types::{AddrSpec, Mailbox};

    fn members() -> MailboxList {
        vec![
            Mailbox::from(AddrSpec::new("winston", "example.com")),
            Mailbox::new("Julia", AddrSpec::new("julia", "example.com"), "").unwrap(),
        ]
        .into()
    }

    #[test]
    fn test_clean_string() {
        let group = Group::new("Brotherhood", members());
        assert_eq!(
            group.clean_string(),
            "Brotherhood: winston@example.com, Julia <julia@example.com>;"
        );
        assert_eq!(group.address(), "winston@example.com, Julia <julia@example.com>");
    }

    #[test]
    fn test_empty_group() {
        let group = Group::new("Undisclosed recipients", MailboxList::default());
        assert_eq!(group.clean_string(), "\"Undisclosed recipients\": ;");
        assert!(group.mailboxes().is_empty());
    }

    #[test]
    fn test_clean_string_names() {
        let group = Group::new("", MailboxList::default());
        assert_eq!(group.clean_string(), "\"\": ;");

        let group = Group::new("=?utf-8?Q?=C3=89quipe?=", members());
        assert!(group.clean_string().starts_with("=?utf-8?Q?=C3=89quipe?=: winston@"));

        let group = Group::new("=?x: y", MailboxList::default());
        assert_eq!(group.clean_string(), "\"=?x: y\": ;");
    }

    #[test]
    fn test_mutators_clear_original() {
        let mut group = Group::new("Team", members()).with_original("Team:a@b;");
        assert_eq!(group.original_string(), "Team:a@b;");

        group.set_mailboxes(MailboxList::default());
        assert_eq!(group.original_string(), "Team: ;");

        let mut group = group.with_original("x");
        group.set_display_name("Crew");
        assert_eq!(group.original_string(), "Crew: ;");
    }

    #[test]
    fn test_email_address_trait() {
        let group = Group::new("Brotherhood", members());
        let addr: &dyn EmailAddress = &group;
        assert_eq!(addr.display_name(), "Brotherhood");
        assert_eq!(addr.comment(), "");
    }
}

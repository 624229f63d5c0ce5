//! Either a mailbox or a group.

use std::fmt;

use super::{EmailAddress, Group, Mailbox};

/// An element of an address list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Address {
    /// A single mailbox.
    Mailbox(Mailbox),
    /// A named group of mailboxes.
    Group(Group),
}

impl Address {
    /// Returns the mailbox, if this is one.
    #[must_use]
    pub const fn as_mailbox(&self) -> Option<&Mailbox> {
        match self {
            Self::Mailbox(mailbox) => Some(mailbox),
            Self::Group(_) => None,
        }
    }

    /// Returns the group, if this is one.
    #[must_use]
    pub const fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Mailbox(_) => None,
        }
    }

    /// Returns true for a group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Returns the display name, or an empty string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Mailbox(mailbox) => mailbox.display_name(),
            Self::Group(group) => group.display_name(),
        }
    }

    /// Returns the canonical address text; for a group, its members.
    #[must_use]
    pub fn address(&self) -> String {
        match self {
            Self::Mailbox(mailbox) => mailbox.address(),
            Self::Group(group) => group.address(),
        }
    }

    /// Returns the comment, or an empty string.
    #[must_use]
    pub fn comment(&self) -> &str {
        match self {
            Self::Mailbox(mailbox) => mailbox.comment(),
            Self::Group(_) => "",
        }
    }

    /// Returns the text this address was parsed from, or the canonical form.
    #[must_use]
    pub fn original_string(&self) -> String {
        match self {
            Self::Mailbox(mailbox) => mailbox.original_string(),
            Self::Group(group) => group.original_string(),
        }
    }

    /// Returns the canonical form.
    #[must_use]
    pub fn clean_string(&self) -> String {
        match self {
            Self::Mailbox(mailbox) => mailbox.clean_string(),
            Self::Group(group) => group.clean_string(),
        }
    }
}

impl From<Mailbox> for Address {
    fn from(mailbox: Mailbox) -> Self {
        Self::Mailbox(mailbox)
    }
}

impl From<Group> for Address {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl EmailAddress for Address {
    fn display_name(&self) -> &str {
        Self::display_name(self)
    }

    fn address(&self) -> String {
        Self::address(self)
    }

    fn comment(&self) -> &str {
        Self::comment(self)
    }

    fn original_string(&self) -> String {
        Self::original_string(self)
    }

    fn clean_string(&self) -> String {
        Self::clean_string(self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mailbox(mailbox) => fmt::Display::fmt(mailbox, f),
            Self::Group(group) => fmt::Display::fmt(group, f),
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
    use crate::types::{AddrSpec, MailboxList};

    fn mailbox() -> Mailbox {
        Mailbox::new("Zip", AddrSpec::new("zip", "example.com"), "work").unwrap()
    }

    #[test]
    fn test_mailbox_variant() {
        let address = Address::from(mailbox());
        assert!(!address.is_group());
        assert!(address.as_group().is_none());
        assert_eq!(address.display_name(), "Zip");
        assert_eq!(address.address(), "zip@example.com");
        assert_eq!(address.comment(), "work");
        assert_eq!(address.to_string(), "Zip <zip@example.com> (work)");
    }

    #[test]
    fn test_group_variant() {
        let group = Group::new("Team", MailboxList::from(vec![mailbox()]));
        let address = Address::from(group);
        assert!(address.is_group());
        assert!(address.as_mailbox().is_none());
        assert_eq!(address.display_name(), "Team");
        assert_eq!(address.comment(), "");
        assert_eq!(address.clean_string(), "Team: Zip <zip@example.com> (work);");
        assert_eq!(address.original_string(), address.clean_string());
    }
}

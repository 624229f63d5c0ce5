//! Ordered lists of addresses.

use std::fmt;
use std::ops::Deref;

use super::{Address, Group, Mailbox};

macro_rules! address_list {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(Vec<$item>);

        impl $name {
            /// Creates an empty list.
            #[must_use]
            pub const fn new() -> Self {
                Self(Vec::new())
            }

            /// Appends an element.
            pub fn push(&mut self, item: $item) {
                self.0.push(item);
            }

            /// Returns the elements as a vector.
            #[must_use]
            pub fn into_vec(self) -> Vec<$item> {
                self.0
            }

            /// Joins the original text of every element with `", "`.
            ///
            /// Text between elements in the parsed input (stray commas,
            /// comments not attached to an element) is not kept.
            #[must_use]
            pub fn original_string(&self) -> String {
                self.0
                    .iter()
                    .map(|item| item.original_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }

            /// Joins the canonical text of every element with `", "`.
            #[must_use]
            pub fn clean_string(&self) -> String {
                self.0
                    .iter()
                    .map(|item| item.clean_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl Deref for $name {
            type Target = [$item];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl FromIterator<$item> for $name {
            fn from_iter<I: IntoIterator<Item = $item>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.clean_string())
            }
        }
    };
}

address_list!(
    /// A list of mailboxes, as found in `From:` or inside a group.
    MailboxList,
    Mailbox
);

address_list!(
    /// A list of mailboxes and groups, as found in `To:` or `Cc:`.
    AddressList,
    Address
);

address_list!(
    /// A list of groups.
    GroupList,
    Group
);

impl AddressList {
    /// Returns every mailbox in the list, expanding groups in place.
    ///
    /// ```
    /// let list = mailledger_addr::parse_email_address_list(
    ///     "a@example.com, Team: b@example.com, c@example.com;, d@example.com",
    /// )?;
    /// let flat: Vec<String> = list.flatten().iter().map(|m| m.address()).collect();
    /// assert_eq!(flat, ["a@example.com", "b@example.com", "c@example.com", "d@example.com"]);
    /// # Ok::<(), mailledger_addr::Error>(())
    /// ```
    #[must_use]
    pub fn flatten(&self) -> MailboxList {
        self.0
            .iter()
            .flat_map(|address| match address {
                Address::Mailbox(mailbox) => std::slice::from_ref(mailbox),
                Address::Group(group) => &group.mailboxes()[..],
            })
            .cloned()
            .collect()
    }

    /// Returns the mailboxes that are direct elements of the list.
    pub fn mailboxes(&self) -> impl Iterator<Item = &Mailbox> {
        self.0.iter().filter_map(Address::as_mailbox)
    }

    /// Returns the groups in the list.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.0.iter().filter_map(Address::as_group)
    }
}

impl From<MailboxList> for AddressList {
    fn from(list: MailboxList) -> Self {
        list.into_iter().map(Address::Mailbox).collect()
    }
}

impl From<GroupList> for AddressList {
    fn from(list: GroupList) -> Self {
        list.into_iter().map(Address::Group).collect()
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
    use crate::types::AddrSpec;

    fn mailbox(local: &str) -> Mailbox {
        Mailbox::from(AddrSpec::new(local, "example.com"))
    }

    fn mixed() -> AddressList {
        let group = Group::new("Team", vec![mailbox("b"), mailbox("c")]);
        vec![
            Address::Mailbox(mailbox("a")),
            Address::Group(group),
            Address::Mailbox(mailbox("d")),
        ]
        .into()
    }

    #[test]
    fn test_clean_string_joins() {
        let list: MailboxList = vec![mailbox("a"), mailbox("b")].into();
        assert_eq!(list.clean_string(), "a@example.com, b@example.com");
        assert_eq!(list.to_string(), list.clean_string());
        assert_eq!(list.original_string(), list.clean_string());
        assert_eq!(MailboxList::new().clean_string(), "");
    }

    #[test]
    fn test_flatten() {
        let flat = mixed().flatten();
        let locals: Vec<&str> = flat.iter().map(Mailbox::local_part).collect();
        assert_eq!(locals, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_views() {
        let list = mixed();
        assert_eq!(list.mailboxes().count(), 2);
        assert_eq!(list.groups().count(), 1);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_upcast() {
        let list = AddressList::from(MailboxList::from(vec![mailbox("a")]));
        assert!(list[0].as_mailbox().is_some());

        let list = AddressList::from(GroupList::from(vec![Group::new("g", MailboxList::new())]));
        assert!(list[0].as_group().is_some());
    }

    #[test]
    fn test_iteration() {
        let mut list = MailboxList::new();
        list.push(mailbox("a"));
        list.push(mailbox("b"));

        let mut seen = Vec::new();
        for m in &list {
            seen.push(m.local_part().to_string());
        }
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(list.into_vec().len(), 2);
    }
}

//! Values constructed by the semantic actions.

use crate::error::{Error, Result};
use crate::types::{AddrSpec, Address, AddressList, Group, GroupList, Mailbox, MailboxList};

/// A value attached to a match tree node.
///
/// Text-like productions (atoms, phrases, quoted strings, domains) produce
/// [`Value::Text`]; address productions produce the corresponding type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Cleaned up text.
    Text(String),
    /// A bare address.
    AddrSpec(AddrSpec),
    /// A mailbox.
    Mailbox(Mailbox),
    /// A group.
    Group(Group),
    /// A list of mailboxes.
    MailboxList(MailboxList),
    /// A list of mailboxes and groups.
    AddressList(AddressList),
    /// A list of groups.
    GroupList(GroupList),
}

impl Value {
    /// Returns the name of the variant, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::AddrSpec(_) => "AddrSpec",
            Self::Mailbox(_) => "Mailbox",
            Self::Group(_) => "Group",
            Self::MailboxList(_) => "MailboxList",
            Self::AddressList(_) => "AddressList",
            Self::GroupList(_) => "GroupList",
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn mismatch<T: FromValue>(&self) -> Error {
        Error::TypeMismatch {
            expected: T::NAME,
            found: self.kind(),
        }
    }
}

/// Conversion from a constructed [`Value`] into a concrete type.
///
/// Besides the identity conversions, a few coercions are allowed: a mailbox
/// yields its addr-spec and an addr-spec becomes a mailbox without name or
/// comment; a mailbox list or group list widens into an address list; an
/// address list narrows into a mailbox list or group list when every
/// element is of that kind.
pub trait FromValue: Sized {
    /// Type name used in [`Error::TypeMismatch`].
    const NAME: &'static str;

    /// Converts `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if `value` cannot become `Self`.
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for String {
    const NAME: &'static str = "Text";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(text) => Ok(text),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for AddrSpec {
    const NAME: &'static str = "AddrSpec";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::AddrSpec(addr_spec) => Ok(addr_spec),
            Value::Mailbox(mailbox) => Ok(mailbox.addr_spec().clone()),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for Mailbox {
    const NAME: &'static str = "Mailbox";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mailbox(mailbox) => Ok(mailbox),
            Value::AddrSpec(addr_spec) => Ok(Self::from(addr_spec)),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for Group {
    const NAME: &'static str = "Group";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Group(group) => Ok(group),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for Address {
    const NAME: &'static str = "Address";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mailbox(mailbox) => Ok(Self::Mailbox(mailbox)),
            Value::Group(group) => Ok(Self::Group(group)),
            Value::AddrSpec(addr_spec) => Ok(Self::Mailbox(Mailbox::from(addr_spec))),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for MailboxList {
    const NAME: &'static str = "MailboxList";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::MailboxList(list) => Ok(list),
            Value::AddressList(list) if list.iter().all(|a| !a.is_group()) => Ok(list
                .into_iter()
                .filter_map(|address| match address {
                    Address::Mailbox(mailbox) => Some(mailbox),
                    Address::Group(_) => None,
                })
                .collect()),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for AddressList {
    const NAME: &'static str = "AddressList";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::AddressList(list) => Ok(list),
            Value::MailboxList(list) => Ok(list.into()),
            Value::GroupList(list) => Ok(list.into()),
            other => Err(other.mismatch::<Self>()),
        }
    }
}

impl FromValue for GroupList {
    const NAME: &'static str = "GroupList";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::GroupList(list) => Ok(list),
            Value::AddressList(list) if list.iter().all(Address::is_group) => Ok(list
                .into_iter()
                .filter_map(|address| match address {
                    Address::Group(group) => Some(group),
                    Address::Mailbox(_) => None,
                })
                .collect()),
            other => Err(other.mismatch::<Self>()),
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

    fn spec() -> AddrSpec {
        AddrSpec::new("zip", "example.com")
    }

    #[test]
    fn test_addr_spec_from_mailbox() {
        let mailbox = Mailbox::new("Zip", spec(), "").unwrap();
        let spec_out = AddrSpec::from_value(Value::Mailbox(mailbox)).unwrap();
        assert_eq!(spec_out, spec());
    }

    #[test]
    fn test_mailbox_from_addr_spec() {
        let mailbox = Mailbox::from_value(Value::AddrSpec(spec())).unwrap();
        assert_eq!(mailbox.display_name(), "");
        assert_eq!(mailbox.comment(), "");
        assert_eq!(mailbox.addr_spec(), &spec());
    }

    #[test]
    fn test_address_from_variants() {
        let address = Address::from_value(Value::AddrSpec(spec())).unwrap();
        assert!(address.as_mailbox().is_some());

        let group = Group::new("g", MailboxList::new());
        let address = Address::from_value(Value::Group(group)).unwrap();
        assert!(address.is_group());
    }

    #[test]
    fn test_list_upcast() {
        let list: MailboxList = vec![Mailbox::from(spec())].into();
        let list = AddressList::from_value(Value::MailboxList(list)).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_list_downcast() {
        let list: AddressList = vec![Address::Mailbox(Mailbox::from(spec()))].into();
        let mailboxes = MailboxList::from_value(Value::AddressList(list.clone())).unwrap();
        assert_eq!(mailboxes.len(), 1);

        let err = GroupList::from_value(Value::AddressList(list)).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "GroupList",
                found: "AddressList"
            }
        );
    }

    #[test]
    fn test_mismatch() {
        let err = Group::from_value(Value::Text("x".to_string())).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "Group",
                found: "Text"
            }
        );
        assert!(String::from_value(Value::AddrSpec(spec())).is_err());
    }
}

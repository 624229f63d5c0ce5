//! Address types.

mod addr_spec;
mod address;
mod group;
mod list;
mod mailbox;

pub use addr_spec::AddrSpec;
pub use address::Address;
pub use group::Group;
pub use list::{AddressList, GroupList, MailboxList};
pub use mailbox::Mailbox;

/// Capabilities shared by every kind of address.
///
/// Implemented by [`AddrSpec`], [`Mailbox`], [`Group`] and [`Address`] so
/// callers can treat them uniformly:
///
/// ```
/// use mailledger_addr::{EmailAddress, parse_email_address_list};
///
/// let list = parse_email_address_list("\"Zip\" <zip@example.com>, Team: a@example.com;")?;
/// let names: Vec<&str> = list.iter().map(EmailAddress::display_name).collect();
/// assert_eq!(names, ["Zip", "Team"]);
/// # Ok::<(), mailledger_addr::Error>(())
/// ```
pub trait EmailAddress {
    /// Returns the display name, or an empty string.
    fn display_name(&self) -> &str;

    /// Returns the canonical address text.
    ///
    /// For a group this is the list of its members.
    fn address(&self) -> String;

    /// Returns the comment, or an empty string.
    fn comment(&self) -> &str;

    /// Returns the text the value was parsed from.
    ///
    /// Falls back to [`clean_string`](Self::clean_string) for values built
    /// programmatically or mutated after parsing.
    fn original_string(&self) -> String;

    /// Returns the canonical form, suitable for new messages.
    fn clean_string(&self) -> String;
}

//! Match tags.

use std::fmt;

/// Identifies the production that produced a [`Match`](super::Match).
///
/// `None` marks glue nodes the semantic actions never look at. `Literal`
/// marks terminal or textual nodes whose constructed value is their raw
/// content. Every other variant names one RFC 5322 production that has a
/// semantic action of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Anonymous node; only its bytes matter.
    None,
    /// Terminal or text node.
    Literal,

    // Address specification (RFC 5322 section 3.4)
    /// `mailbox`
    Mailbox,
    /// `name-addr`
    NameAddr,
    /// `angle-addr`
    AngleAddr,
    /// `group`
    Group,
    /// `display-name`
    DisplayName,
    /// `mailbox-list`
    MailboxList,
    /// `address-list`
    AddressList,
    /// `addr-spec`
    AddrSpec,
    /// `domain-literal`
    DomainLiteral,

    // Lexical tokens (RFC 5322 section 3.2)
    /// `1*word` form of `phrase`
    Words,
    /// `atom`
    Atom,
    /// `dot-atom`
    DotAtom,
    /// The bytes between the parentheses of a comment.
    CContents,
    /// `comment`
    Comment,
    /// `quoted-string`
    QuotedString,

    // Obsolete syntax (RFC 5322 section 4)
    /// `obs-qp`
    ObsQp,
    /// `obs-phrase`
    ObsPhrase,
    /// `obs-angle-addr`
    ObsAngleAddr,
    /// `obs-route`
    ObsRoute,
    /// `obs-domain-list`
    ObsDomainList,
    /// `obs-mbox-list`
    ObsMboxList,
    /// `obs-addr-list`
    ObsAddrList,
    /// `obs-group-list`
    ObsGroupList,
    /// `obs-local-part`
    ObsLocalPart,
    /// `obs-domain`
    ObsDomain,
    /// Tail repetition of `obs-mbox-list`.
    ObsMboxTailList,
    /// One `"," [mailbox / CFWS]` element of `obs-mbox-list`.
    ObsMboxOptional,
    /// Tail repetition of `obs-addr-list`.
    ObsAddrTailList,
    /// One `"," [address / CFWS]` element of `obs-addr-list`.
    ObsAddrOptional,
    /// Tail repetition of `obs-domain`.
    ObsDomainTailList,
    /// One `"." atom` element of `obs-domain`.
    ObsDomainOptional,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

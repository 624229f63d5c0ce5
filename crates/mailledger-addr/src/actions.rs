//! Semantic actions: turning a match tree into address values.
//!
//! [`SemanticActions::apply`] walks the tree post-order and stores a
//! [`Value`] on every node whose tag has a construction rule, so a parent
//! always sees the values of its children. Nodes that already carry a value
//! are skipped, which makes applying twice harmless.

use std::sync::Arc;

use crate::encoding::WordDecoder;
use crate::error::{Error, Result};
use crate::format::{check_comment, has_mime_word};
use crate::rd::{Match, Tag};
use crate::types::{AddrSpec, Address, AddressList, Group, Mailbox, MailboxList};
use crate::value::{FromValue, Value};

/// Characters whose escaping backslash is dropped when unquoting.
///
/// Every other escaped character keeps its backslash, so the result can be
/// quoted again without losing information.
static QUOTABLE: [bool; 128] = quotable_table();

const fn quotable_table() -> [bool; 128] {
    let mut table = [false; 128];
    table[b' ' as usize] = true;
    table[b'\t' as usize] = true;
    table[0x00] = true;
    table[0x01] = true;
    table[0x08] = true;
    table[0x0b] = true;
    table[0x0c] = true;
    table[0x7f] = true;
    table[b'\n' as usize] = true;
    table[b'\r' as usize] = true;

    let mut c = 0x0e;
    while c <= 0x1f {
        table[c] = true;
        c += 1;
    }
    table
}

fn is_quotable(c: char) -> bool {
    usize::try_from(u32::from(c))
        .ok()
        .and_then(|index| QUOTABLE.get(index))
        .copied()
        .unwrap_or(false)
}

/// Removes quoted-pair backslashes from `text`.
///
/// A backslash is kept when the character it escapes would need escaping
/// again in a quoted string or comment.
#[must_use]
pub fn unquote_pairs(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut escaping = false;

    for c in text.chars() {
        if escaping {
            if !is_quotable(c) {
                result.push('\\');
            }
            result.push(c);
            escaping = false;
        } else if c == '\\' {
            escaping = true;
        } else {
            result.push(c);
        }
    }

    if escaping {
        result.push('\\');
    }

    result
}

/// Removes the line breaks of folding whitespace.
#[must_use]
pub fn unfold(text: &str) -> String {
    text.replace("\r\n ", " ").replace("\r\n\t", "\t")
}

/// Builds values for a match tree.
#[derive(Debug, Clone, Default)]
pub struct SemanticActions {
    decoder: Option<Arc<dyn WordDecoder>>,
}

impl SemanticActions {
    /// Creates the actions, decoding MIME words with `decoder` if given.
    #[must_use]
    pub fn new(decoder: Option<Arc<dyn WordDecoder>>) -> Self {
        Self { decoder }
    }

    /// Constructs values for `m` and all of its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Construction`] if a node lacks a child value its
    /// rule requires (only possible for hand-built trees), or
    /// [`Error::InvalidComment`] if a mailbox comment is unbalanced.
    pub fn apply(&self, m: &mut Match) -> Result<()> {
        if m.made().is_some() {
            return Ok(());
        }

        for child in m.children_mut() {
            self.apply(child)?;
        }

        if let Some(value) = self.construct(m)? {
            m.set_made(value);
        }
        Ok(())
    }

    /// Applies the actions and converts the root value into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownConstructedType`] if the root production
    /// builds no value, [`Error::TypeMismatch`] if the value cannot become a
    /// `T`, or any error from [`apply`](Self::apply).
    pub fn apply_to<T: FromValue>(&self, m: &mut Match) -> Result<T> {
        self.apply(m)?;
        let value = m
            .made()
            .cloned()
            .ok_or(Error::UnknownConstructedType(m.tag()))?;
        T::from_value(value)
    }

    fn construct(&self, m: &Match) -> Result<Option<Value>> {
        let value = match m.tag() {
            Tag::None
            | Tag::ObsRoute
            | Tag::ObsDomainList
            | Tag::ObsMboxTailList
            | Tag::ObsAddrTailList
            | Tag::ObsDomainTailList
            | Tag::ObsDomainOptional => return Ok(None),

            Tag::Literal | Tag::ObsQp | Tag::CContents => Value::Text(m.text().into_owned()),

            Tag::Atom => Value::Text(required(m, "atext")?.text().into_owned()),
            Tag::DotAtom => Value::Text(named_text(m, "dot-atom-text")?.to_string()),
            Tag::Words | Tag::ObsPhrase => Value::Text(join_words(phrase_parts(m))?),
            Tag::QuotedString => {
                Value::Text(unquote_pairs(&unfold(&required(m, "qcontent")?.text())))
            }
            Tag::Comment => Value::Text(unquote_pairs(&unfold(
                &required(m, "comment-content")?.text(),
            ))),
            Tag::DisplayName => {
                let phrase = named_text(m, "phrase")?.trim();
                Value::Text(self.decode(phrase))
            }

            Tag::AddrSpec => Value::AddrSpec(
                AddrSpec::new(named_text(m, "local-part")?, named_text(m, "domain")?)
                    .with_original(m.text().trim()),
            ),
            Tag::ObsLocalPart => Value::Text(
                m.children()
                    .iter()
                    .map(made_text)
                    .collect::<Result<Vec<_>>>()?
                    .join("."),
            ),
            Tag::ObsDomain => Value::Text(obs_domain(m)?),
            Tag::DomainLiteral => Value::Text(domain_literal(m)?),

            Tag::AngleAddr | Tag::ObsAngleAddr => {
                Value::AddrSpec(AddrSpec::from_value(required_value(m, "addr-spec")?.clone())?)
            }
            Tag::NameAddr => Value::Mailbox(self.name_addr(m)?),
            Tag::Mailbox => Value::Mailbox(self.mailbox(m)?),
            Tag::Group => Value::Group(group(m)?),

            Tag::MailboxList => Value::MailboxList(
                m.children()
                    .iter()
                    .map(made_mailbox)
                    .collect::<Result<MailboxList>>()?,
            ),
            Tag::AddressList => Value::AddressList(
                m.children()
                    .iter()
                    .map(made_address)
                    .collect::<Result<AddressList>>()?,
            ),
            Tag::ObsMboxList => Value::MailboxList(
                list_parts(m, "mailbox")?
                    .into_iter()
                    .map(|value| Mailbox::from_value(value.clone()))
                    .collect::<Result<MailboxList>>()?,
            ),
            Tag::ObsAddrList => Value::AddressList(
                list_parts(m, "address")?
                    .into_iter()
                    .map(|value| Address::from_value(value.clone()))
                    .collect::<Result<AddressList>>()?,
            ),
            Tag::ObsGroupList => Value::MailboxList(MailboxList::new()),
            Tag::ObsMboxOptional => match m.named_made("mailbox") {
                Some(value) => value.clone(),
                None => return Ok(None),
            },
            Tag::ObsAddrOptional => match m.named_made("address") {
                Some(value) => value.clone(),
                None => return Ok(None),
            },
        };

        Ok(Some(value))
    }

    fn name_addr(&self, m: &Match) -> Result<Mailbox> {
        let display_name = match m.named_made("display-name") {
            Some(value) => String::from_value(value.clone())?,
            None => String::new(),
        };
        let addr_spec = AddrSpec::from_value(required_value(m, "angle-addr")?.clone())?;

        Mailbox::new(display_name, addr_spec, self.accumulate_comments(m))
            .map(|mailbox| mailbox.with_original(m.text().trim()))
    }

    fn mailbox(&self, m: &Match) -> Result<Mailbox> {
        match required_value(m, "mailbox")? {
            Value::Mailbox(mailbox) => Ok(mailbox.clone()),
            Value::AddrSpec(addr_spec) => {
                Mailbox::new("", addr_spec.clone(), self.accumulate_comments(m))
                    .map(|mailbox| mailbox.with_original(m.text().trim()))
            }
            other => Err(Error::TypeMismatch {
                expected: Mailbox::NAME,
                found: other.kind(),
            }),
        }
    }

    /// Collects the comments in the subtree of `m`, in source order.
    ///
    /// Each comment is trimmed; they are joined by a single space. Nested
    /// comments stay part of their enclosing comment.
    fn accumulate_comments(&self, m: &Match) -> String {
        let mut fragments = Vec::new();
        collect_comments(m, &mut fragments);
        let comment = fragments.join(" ");

        if has_mime_word(&comment) {
            let decoded = self.decode(&comment);
            if check_comment(&decoded) {
                return decoded;
            }
        }
        comment
    }

    fn decode(&self, text: &str) -> String {
        let Some(decoder) = &self.decoder else {
            return text.to_string();
        };
        if !has_mime_word(text) {
            return text.to_string();
        }

        decoder.decode(text).unwrap_or_else(|err| {
            tracing::debug!(error = %err, text, "keeping undecoded MIME word");
            text.to_string()
        })
    }
}

fn collect_comments(m: &Match, fragments: &mut Vec<String>) {
    if m.tag() == Tag::CContents {
        let text = unfold(&m.text());
        let text = text.trim();
        if !text.is_empty() {
            fragments.push(text.to_string());
        }
        return;
    }

    for child in m.children() {
        collect_comments(child, fragments);
    }
}

fn required<'m>(m: &'m Match, name: &str) -> Result<&'m Match> {
    m.named(name)
        .ok_or_else(|| Error::Construction(format!("{} without {name}", m.tag())))
}

fn required_value<'m>(m: &'m Match, name: &str) -> Result<&'m Value> {
    required(m, name)?
        .made()
        .ok_or_else(|| Error::Construction(format!("{} has no value for {name}", m.tag())))
}

fn named_text<'m>(m: &'m Match, name: &str) -> Result<&'m str> {
    let value = required_value(m, name)?;
    value.as_text().ok_or(Error::TypeMismatch {
        expected: String::NAME,
        found: value.kind(),
    })
}

fn made_text(m: &Match) -> Result<&str> {
    let value = m
        .made()
        .ok_or_else(|| Error::Construction(format!("{} has no value", m.tag())))?;
    value.as_text().ok_or(Error::TypeMismatch {
        expected: String::NAME,
        found: value.kind(),
    })
}

fn made_mailbox(m: &Match) -> Result<Mailbox> {
    let value = m
        .made()
        .ok_or_else(|| Error::Construction(format!("{} has no value", m.tag())))?;
    Mailbox::from_value(value.clone())
}

fn made_address(m: &Match) -> Result<Address> {
    let value = m
        .made()
        .ok_or_else(|| Error::Construction(format!("{} has no value", m.tag())))?;
    Address::from_value(value.clone())
}

/// One piece of a phrase: a word, a period, or comments and whitespace.
enum PhrasePart<'m> {
    Word(&'m Match),
    Period,
    Space,
}

fn phrase_parts(m: &Match) -> Vec<PhrasePart<'_>> {
    if m.tag() != Tag::ObsPhrase {
        return m.children().iter().map(PhrasePart::Word).collect();
    }

    let mut parts: Vec<PhrasePart<'_>> =
        m.named("head").map(PhrasePart::Word).into_iter().collect();
    if let Some(tail) = m.named("tail") {
        parts.extend(tail.children().iter().map(|part| match part.tag() {
            Tag::Atom | Tag::QuotedString => PhrasePart::Word(part),
            _ if part.content() == b"." => PhrasePart::Period,
            _ => PhrasePart::Space,
        }));
    }
    parts
}

/// Joins the words of a phrase.
///
/// Words are separated by one space wherever the input had whitespace or a
/// comment between them; periods attach to the preceding word.
fn join_words(parts: Vec<PhrasePart<'_>>) -> Result<String> {
    let mut result = String::new();
    let mut pending_space = false;

    for part in parts {
        match part {
            PhrasePart::Space => pending_space = true,
            PhrasePart::Period => {
                result.push('.');
                pending_space = false;
            }
            PhrasePart::Word(word) => {
                let content = word.content();
                let leading = content.first().is_some_and(|&c| opens_gap(c));
                if (pending_space || leading) && !result.is_empty() {
                    result.push(' ');
                }
                result.push_str(made_text(word)?);
                pending_space = content.last().is_some_and(|&c| closes_gap(c));
            }
        }
    }

    Ok(result)
}

const fn opens_gap(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | b'(')
}

const fn closes_gap(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | b')')
}

fn obs_domain(m: &Match) -> Result<String> {
    let mut atoms = vec![named_text(m, "head")?.trim().to_string()];
    if let Some(tail) = m.named("tail") {
        for element in tail.children() {
            atoms.push(named_text(element, "atom")?.trim().to_string());
        }
    }
    Ok(atoms.join("."))
}

/// Builds `[` + literal + `]`.
///
/// Folding whitespace and comments before the opening bracket are not part
/// of the domain, so `a@ (c) [1.2.3.4]` has the domain `[1.2.3.4]`. The
/// comments around the literal are left to the mailbox comment.
fn domain_literal(m: &Match) -> Result<String> {
    let literal = required(m, "literal")?.text();
    Ok(format!("[{}]", unfold(&unquote_pairs(&literal))))
}

fn group(m: &Match) -> Result<Group> {
    let display_name = named_text(m, "display-name")?;
    let mailboxes = match m.named_made("group-list") {
        Some(Value::MailboxList(list)) => list.clone(),
        _ => MailboxList::new(),
    };
    Ok(Group::new(display_name, mailboxes).with_original(m.text().trim()))
}

/// Returns the values of the head and of every tail element of an obsolete
/// list that holds one under `name`.
fn list_parts<'m>(m: &'m Match, name: &str) -> Result<Vec<&'m Value>> {
    let mut values = vec![required_value(m, "head")?];
    if let Some(tail) = m.named("tail") {
        values.extend(
            tail.children()
                .iter()
                .filter_map(|element| element.named_made(name)),
        );
    }
    Ok(values)
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
    use crate::encoding::Rfc2047Decoder;
    use crate::grammar::{
        match_addr_spec, match_display_name, match_group, match_mailbox, match_mailbox_list,
        match_quoted_string,
    };
    use crate::rd::MatchResult;

    fn parse(matcher: fn(&[u8]) -> MatchResult<'_>, input: &str) -> Match {
        let (m, rest) = matcher(input.as_bytes()).unwrap();
        assert!(rest.is_empty(), "unconsumed: {:?}", String::from_utf8_lossy(rest));
        m
    }

    fn construct<T: FromValue>(matcher: fn(&[u8]) -> MatchResult<'_>, input: &str) -> T {
        let mut m = parse(matcher, input);
        SemanticActions::default().apply_to(&mut m).unwrap()
    }

    fn decoding() -> SemanticActions {
        SemanticActions::new(Some(Arc::new(Rfc2047Decoder)))
    }

    #[test]
    fn test_unquote_pairs() {
        assert_eq!(unquote_pairs("plain"), "plain");
        assert_eq!(unquote_pairs("a\\ b"), "a b");
        assert_eq!(unquote_pairs("a\\\tb"), "a\tb");
        assert_eq!(unquote_pairs("a\\\"b"), "a\\\"b");
        assert_eq!(unquote_pairs("a\\\\b"), "a\\\\b");
        assert_eq!(unquote_pairs("end\\"), "end\\");
    }

    #[test]
    fn test_quotable_table() {
        assert!(is_quotable(' '));
        assert!(is_quotable('\x1f'));
        assert!(is_quotable('\x7f'));
        assert!(!is_quotable('"'));
        assert!(!is_quotable('a'));
        assert!(!is_quotable('\u{e9}'));
    }

    #[test]
    fn test_unfold() {
        assert_eq!(unfold("a\r\n b\r\n\tc"), "a b\tc");
    }

    #[test]
    fn test_quoted_string_value() {
        let text: String = construct(match_quoted_string, "\"foo\\ bar\"");
        assert_eq!(text, "foo bar");
    }

    #[test]
    fn test_display_name_words() {
        let text: String = construct(match_display_name, "abc 123 \"foo bar\"");
        assert_eq!(text, "abc 123 foo bar");

        let text: String = construct(match_display_name, "Joe (the man) Smith ");
        assert_eq!(text, "Joe Smith");
    }

    #[test]
    fn test_display_name_obsolete_phrase() {
        let text: String = construct(match_display_name, "J. R. R. Tolkien");
        assert_eq!(text, "J. R. R. Tolkien");
    }

    #[test]
    fn test_obsolete_local_part_and_domain() {
        let spec: AddrSpec = construct(match_addr_spec, "john . smith@example . com");
        assert_eq!(spec.local_part(), "john.smith");
        assert_eq!(spec.domain(), "example.com");
        assert_eq!(spec.original_string(), "john . smith@example . com");
    }

    #[test]
    fn test_domain_literal_value() {
        let spec: AddrSpec = construct(match_addr_spec, "a@[ 1.2.3.4 ]");
        assert_eq!(spec.domain(), "[ 1.2.3.4 ]");
    }

    #[test]
    fn test_domain_literal_leading_comment() {
        let mailbox: Mailbox = construct(match_mailbox, "a@ (c) [1.2.3.4]");
        assert_eq!(mailbox.domain(), "[1.2.3.4]");
        assert_eq!(mailbox.comment(), "c");
        assert_eq!(mailbox.clean_string(), "a@[1.2.3.4] (c)");
    }

    #[test]
    fn test_comment_placement() {
        let mailbox: Mailbox =
            construct(match_mailbox, "ender(weird comment placement)@example.com");
        assert_eq!(mailbox.display_name(), "");
        assert_eq!(mailbox.local_part(), "ender");
        assert_eq!(mailbox.domain(), "example.com");
        assert_eq!(mailbox.comment(), "weird comment placement");
        assert_eq!(mailbox.clean_string(), "ender@example.com (weird comment placement)");
    }

    #[test]
    fn test_comments_accumulate() {
        let mailbox: Mailbox =
            construct(match_mailbox, "Joe ( one ) <joe@example.com> (two (nested))");
        assert_eq!(mailbox.display_name(), "Joe");
        assert_eq!(mailbox.comment(), "one two (nested)");
    }

    #[test]
    fn test_obsolete_mailbox_list_skips_comment_slots() {
        let list: MailboxList = construct(
            match_mailbox_list,
            "\"who\" <ok@example.com>, (obsolete, no address)",
        );
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].display_name(), "who");
    }

    #[test]
    fn test_empty_obsolete_group() {
        let group: Group = construct(match_group, "Undisclosed: , ;");
        assert_eq!(group.display_name(), "Undisclosed");
        assert!(group.mailboxes().is_empty());
    }

    #[test]
    fn test_mime_word_decoding() {
        let mut m = parse(match_mailbox, "=?utf-8?Q?Caf=C3=A9?= <cafe@example.com>");
        let mailbox: Mailbox = decoding().apply_to(&mut m).unwrap();
        assert_eq!(mailbox.display_name(), "Caf\u{e9}");

        let mailbox: Mailbox = construct(match_mailbox, "=?utf-8?Q?Caf=C3=A9?= <cafe@example.com>");
        assert_eq!(mailbox.display_name(), "=?utf-8?Q?Caf=C3=A9?=");
    }

    #[test]
    fn test_mime_word_fallback() {
        let mut m = parse(match_mailbox, "=?bogus?Q?x?= <x@example.com>");
        let mailbox: Mailbox = decoding().apply_to(&mut m).unwrap();
        assert_eq!(mailbox.display_name(), "=?bogus?Q?x?=");
    }

    #[test]
    fn test_mime_word_in_comment() {
        let mut m = parse(match_mailbox, "cafe@example.com (=?utf-8?Q?Caf=C3=A9?=)");
        let mailbox: Mailbox = decoding().apply_to(&mut m).unwrap();
        assert_eq!(mailbox.comment(), "Caf\u{e9}");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let actions = SemanticActions::default();
        let mut m = parse(match_mailbox, "\"Zip\" <zip@example.com> (x)");
        actions.apply(&mut m).unwrap();
        let first = m.made().cloned();
        actions.apply(&mut m).unwrap();
        assert_eq!(m.made().cloned(), first);
        assert!(first.is_some());
    }

    #[test]
    fn test_type_mismatch() {
        let mut m = parse(match_mailbox, "zip@example.com");
        let err = SemanticActions::default().apply_to::<Group>(&mut m).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "Group",
                found: "Mailbox"
            }
        );
    }

    #[test]
    fn test_missing_child_value() {
        let mut m = Match::build(
            Tag::AddrSpec,
            [("local-part", Some(Match::leaf(Tag::Literal, b"user")))],
        );
        let err = SemanticActions::default().apply(&mut m).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }

    #[test]
    fn test_no_value_for_root() {
        let mut m = Match::leaf(Tag::None, b"x");
        let err = SemanticActions::default().apply_to::<String>(&mut m).unwrap_err();
        assert_eq!(err, Error::UnknownConstructedType(Tag::None));
    }
}

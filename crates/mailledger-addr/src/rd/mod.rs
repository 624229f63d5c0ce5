//! Recursive descent parsing helpers.
//!
//! Every grammar production is a plain function from an input byte slice to
//! an optional [`Match`] plus the unconsumed remainder. A failed match is just
//! `None`: during ambiguous productions most alternatives fail, so failure
//! carries no error detail.
//!
//! The combinators in this module compose those functions:
//!
//! - [`match_one`] / [`match_one_rune`] consume a single byte
//! - [`match_longest`] runs every alternative and keeps the longest match
//! - [`match_many`] / [`match_many_with_sep`] repeat a matcher greedily
//! - [`Match::build`] assembles a node from named and positional pieces

mod combinator;
mod tag;

use std::borrow::Cow;
use std::collections::HashMap;

pub use combinator::{
    MatchResult, match_longest, match_many, match_many_with_sep, match_one, match_one_rune,
};
pub use tag::Tag;

use crate::value::Value;

/// A node of the match tree.
///
/// The content of a node is always the concatenation of the content of the
/// pieces it was built from, so the bytes of the original input are kept
/// exactly, whitespace and escapes included.
///
/// Named children are a subset of the ordered children: a name is only an
/// index into `children`, so every node is owned exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    tag: Tag,
    content: Vec<u8>,
    children: Vec<Self>,
    names: HashMap<&'static str, usize>,
    made: Option<Value>,
}

impl Match {
    /// Creates a childless node holding `content`.
    #[must_use]
    pub fn leaf(tag: Tag, content: &[u8]) -> Self {
        Self {
            tag,
            content: content.to_vec(),
            children: Vec::new(),
            names: HashMap::new(),
            made: None,
        }
    }

    /// Builds a node from `(name, child)` pairs.
    ///
    /// An empty name makes the child positional only. A `None` child is an
    /// optional piece that did not match and contributes nothing. Every other
    /// child is appended to the ordered children and its bytes to the
    /// content, in argument order.
    #[must_use]
    pub fn build<I>(tag: Tag, parts: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Option<Self>)>,
    {
        let mut node = Self::leaf(tag, &[]);
        for (name, child) in parts {
            let Some(child) = child else {
                continue;
            };

            if !name.is_empty() {
                let previous = node.names.insert(name, node.children.len());
                debug_assert!(previous.is_none(), "duplicate submatch name {name}");
            }
            node.content.extend_from_slice(&child.content);
            node.children.push(child);
        }
        node
    }

    /// Creates a repetition node; `content` must include any separators.
    pub(crate) fn repetition(tag: Tag, content: Vec<u8>, children: Vec<Self>) -> Self {
        Self {
            tag,
            content,
            children,
            names: HashMap::new(),
            made: None,
        }
    }

    /// Returns this node with `tail` appended to its content.
    ///
    /// Used when a repetition must absorb a trailing optional piece (the
    /// folding whitespace before the closing delimiter of a comment or a
    /// quoted string) that is not itself one of the repeated elements.
    #[must_use]
    pub fn with_trailing(mut self, tail: &[u8]) -> Self {
        self.content.extend_from_slice(tail);
        self
    }

    /// Returns the tag of the production that produced this node.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the matched bytes.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the matched bytes as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Returns the number of bytes matched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true for a zero-width match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the child registered under `name`, if that piece matched.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&Self> {
        self.names.get(name).map(|&index| &self.children[index])
    }

    /// Returns the ordered children.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    /// Returns the value constructed for this node by the semantic actions.
    #[must_use]
    pub const fn made(&self) -> Option<&Value> {
        self.made.as_ref()
    }

    pub(crate) fn set_made(&mut self, value: Value) {
        self.made = Some(value);
    }

    /// Returns the value constructed for the child named `name`.
    #[must_use]
    pub fn named_made(&self, name: &str) -> Option<&Value> {
        self.named(name).and_then(Self::made)
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
    fn test_build_concatenates_in_order() {
        let m = Match::build(
            Tag::AddrSpec,
            [
                ("local-part", Some(Match::leaf(Tag::Literal, b"user"))),
                ("", Some(Match::leaf(Tag::None, b"@"))),
                ("domain", Some(Match::leaf(Tag::Literal, b"example.com"))),
            ],
        );

        assert_eq!(m.tag(), Tag::AddrSpec);
        assert_eq!(m.content(), b"user@example.com");
        assert_eq!(m.children().len(), 3);
        assert_eq!(m.named("local-part").unwrap().content(), b"user");
        assert_eq!(m.named("domain").unwrap().content(), b"example.com");
        assert!(m.named("").is_none());
    }

    #[test]
    fn test_build_skips_absent_pieces() {
        let m = Match::build(
            Tag::NameAddr,
            [
                ("display-name", None),
                ("angle-addr", Some(Match::leaf(Tag::AngleAddr, b"<a@b>"))),
            ],
        );

        assert_eq!(m.content(), b"<a@b>");
        assert_eq!(m.children().len(), 1);
        assert!(m.named("display-name").is_none());
        assert!(m.named("angle-addr").is_some());
    }

    #[test]
    fn test_build_empty_is_zero_width() {
        let m = Match::build(Tag::None, []);
        assert!(m.is_empty());
        assert!(m.children().is_empty());
        assert!(m.made().is_none());
    }

    #[test]
    fn test_with_trailing() {
        let m = Match::leaf(Tag::CContents, b"hello").with_trailing(b" \t");
        assert_eq!(m.content(), b"hello \t");
        assert_eq!(m.len(), 7);
    }

    #[test]
    fn test_text_is_lossy() {
        let m = Match::leaf(Tag::Literal, b"caf\xc3\xa9 \xff");
        assert_eq!(m.text(), "caf\u{e9} \u{fffd}");
    }
}

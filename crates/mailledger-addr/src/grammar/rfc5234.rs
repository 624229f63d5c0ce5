//! Core ABNF rules from RFC 5234 appendix B.1 used by the RFC 5322 grammar.

use crate::rd::{Match, MatchResult, Tag, match_one};

/// `ALPHA = %x41-5A / %x61-7A`
pub fn match_alpha(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c.is_ascii_alphabetic())
}

/// `DIGIT = %x30-39`
pub fn match_digit(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c.is_ascii_digit())
}

/// `CR = %x0D`
pub fn match_cr(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c == b'\r')
}

/// `LF = %x0A`
pub fn match_lf(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c == b'\n')
}

/// `CRLF = CR LF`
pub fn match_crlf(cs: &[u8]) -> MatchResult<'_> {
    let (cr, cs) = match_cr(cs)?;
    let (lf, cs) = match_lf(cs)?;
    Some((Match::build(Tag::Literal, [("", Some(cr)), ("", Some(lf))]), cs))
}

/// `DQUOTE = %x22`
pub fn match_dquote(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c == b'"')
}

/// `HTAB = %x09`
pub fn match_htab(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c == b'\t')
}

/// `SP = %x20`
pub fn match_sp(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c == b' ')
}

/// `WSP = SP / HTAB`
pub fn match_wsp(cs: &[u8]) -> MatchResult<'_> {
    match_sp(cs).or_else(|| match_htab(cs))
}

/// `VCHAR = %x21-7E`
pub fn match_vchar(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c.is_ascii_graphic())
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
    fn test_alpha() {
        let (m, rest) = match_alpha(b"ABCxyz").unwrap();
        assert_eq!(m, Match::leaf(Tag::Literal, b"A"));
        assert_eq!(rest, b"BCxyz");
        assert!(match_alpha(b"1BCxyz").is_none());
    }

    #[test]
    fn test_digit() {
        let (m, rest) = match_digit(b"123456").unwrap();
        assert_eq!(m.content(), b"1");
        assert_eq!(rest, b"23456");
        assert!(match_digit(b"ABCxyz").is_none());
    }

    #[test]
    fn test_crlf() {
        let (m, rest) = match_crlf(b"\r\n ").unwrap();
        assert_eq!(m.content(), b"\r\n");
        assert_eq!(rest, b" ");
        assert!(match_crlf(b"\n\r").is_none());
        assert!(match_crlf(b"\r").is_none());
    }

    #[test]
    fn test_dquote() {
        assert!(match_dquote(b"\"x").is_some());
        assert!(match_dquote(b"'x").is_none());
    }

    #[test]
    fn test_wsp() {
        assert_eq!(match_wsp(b" x").unwrap().0.content(), b" ");
        assert_eq!(match_wsp(b"\tx").unwrap().0.content(), b"\t");
        assert!(match_wsp(b"\r\n").is_none());
        assert!(match_wsp(b"").is_none());
    }

    #[test]
    fn test_vchar() {
        assert!(match_vchar(b"!").is_some());
        assert!(match_vchar(b"~").is_some());
        assert!(match_vchar(b" ").is_none());
        assert!(match_vchar(b"\x7f").is_none());
    }
}

//! Lexical tokens (RFC 5322 section 3.2).
//!
//! Quoted characters, folding whitespace and comments, atoms, quoted
//! strings, and the word/phrase productions built from them.

use std::cell::Cell;

use super::obsolete::{
    match_obs_ctext, match_obs_fws, match_obs_phrase, match_obs_qp, match_obs_qtext,
};
use super::rfc5234::{match_crlf, match_dquote, match_vchar, match_wsp};
use crate::config::DEFAULT_MAX_COMMENT_DEPTH;
use crate::rd::{
    Match, MatchResult, Tag, match_longest, match_many, match_many_with_sep, match_one,
    match_one_rune,
};

thread_local! {
    static COMMENT_DEPTH: Cell<usize> = const { Cell::new(0) };
    static COMMENT_LIMIT: Cell<usize> = const { Cell::new(DEFAULT_MAX_COMMENT_DEPTH) };
}

/// Runs `f` with comment nesting on this thread capped at `limit`.
///
/// [`match_comment`] fails on a comment nested deeper than the cap, which
/// bounds the recursion whatever the input looks like. The default cap is
/// [`DEFAULT_MAX_COMMENT_DEPTH`].
pub fn with_comment_limit<R>(limit: usize, f: impl FnOnce() -> R) -> R {
    let previous = COMMENT_LIMIT.replace(limit);
    let _restore = LimitRestore(previous);
    f()
}

struct LimitRestore(usize);

impl Drop for LimitRestore {
    fn drop(&mut self) {
        COMMENT_LIMIT.set(self.0);
    }
}

/// One level of comment nesting, released on drop.
struct NestingGuard;

impl NestingGuard {
    fn enter() -> Option<Self> {
        let depth = COMMENT_DEPTH.get() + 1;
        if depth > COMMENT_LIMIT.get() {
            tracing::trace!(depth, "comment nesting limit reached");
            return None;
        }
        COMMENT_DEPTH.set(depth);
        Some(Self)
    }
}

impl Drop for NestingGuard {
    fn drop(&mut self) {
        COMMENT_DEPTH.set(COMMENT_DEPTH.get().saturating_sub(1));
    }
}

/// Matches a quoted pair.
///
/// ```text
/// quoted-pair     =   ("\" (VCHAR / WSP)) / obs-qp
/// ```
pub fn match_quoted_pair(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_quoted_pair, &match_obs_qp])
}

fn match_cur_quoted_pair(cs: &[u8]) -> MatchResult<'_> {
    let (bs, cs) = match_one_rune(Tag::Literal, cs, '\\')?;
    let (ch, cs) = match_longest(cs, &[&match_vchar, &match_wsp])?;
    Some((Match::build(Tag::Literal, [("", Some(bs)), ("", Some(ch))]), cs))
}

/// Matches folding whitespace.
///
/// ```text
/// FWS             =   ([*WSP CRLF] 1*WSP) /  obs-FWS
/// ```
pub fn match_fws(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_fws, &match_obs_fws])
}

fn match_cur_fws(cs: &[u8]) -> MatchResult<'_> {
    if let Some((fold, rest)) = match_fws_fold(cs)
        && let Some((wsp, rest)) = match_many(Tag::Literal, rest, 1, match_wsp)
    {
        return Some((Match::build(Tag::Literal, [("", Some(fold)), ("", Some(wsp))]), rest));
    }

    let (wsp, cs) = match_many(Tag::Literal, cs, 1, match_wsp)?;
    Some((Match::build(Tag::Literal, [("", Some(wsp))]), cs))
}

fn match_fws_fold(cs: &[u8]) -> MatchResult<'_> {
    let (wsp, cs) = match_many(Tag::Literal, cs, 0, match_wsp)?;
    let (crlf, cs) = match_crlf(cs)?;
    Some((Match::build(Tag::Literal, [("", Some(wsp)), ("", Some(crlf))]), cs))
}

/// Matches a single comment character.
///
/// ```text
/// ctext           =   %d33-39 /          ; Printable US-ASCII
///                     %d42-91 /          ;  characters not including
///                     %d93-126 /         ;  "(", ")", or "\"
///                     obs-ctext
/// ```
///
/// Bytes above 127 are accepted as opaque UTF-8 text.
pub fn match_ctext(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_ctext, &match_obs_ctext])
}

fn match_cur_ctext(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| {
        matches!(c, 33..=39 | 42..=91 | 93..=126) || c >= 0x80
    })
}

/// Matches the content of a comment.
///
/// ```text
/// ccontent        =   ctext / quoted-pair / comment
/// ```
pub fn match_ccontent(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_ctext, &match_quoted_pair, &match_comment])
}

/// Matches a comment. Comments nest, up to the limit set with
/// [`with_comment_limit`].
///
/// ```text
/// comment         =   "(" *([FWS] ccontent) [FWS] ")"
/// ```
pub fn match_comment(cs: &[u8]) -> MatchResult<'_> {
    let (lp, cs) = match_one_rune(Tag::Literal, cs, '(')?;
    let _nesting = NestingGuard::enter()?;

    let (contents, cs) = match_many(Tag::CContents, cs, 0, |cs| {
        let (fws, cs) = optional(match_fws, cs);
        let (ccontent, cs) = match_ccontent(cs)?;
        Some((
            Match::build(Tag::None, [("", fws), ("ccontent", Some(ccontent))]),
            cs,
        ))
    })?;

    let (contents, cs) = match match_fws(cs) {
        Some((fws, rest)) => (contents.with_trailing(fws.content()), rest),
        None => (contents, cs),
    };

    let (rp, cs) = match_one_rune(Tag::Literal, cs, ')')?;

    Some((
        Match::build(
            Tag::Comment,
            [
                ("", Some(lp)),
                ("comment-content", Some(contents)),
                ("", Some(rp)),
            ],
        ),
        cs,
    ))
}

/// Matches comments and folding whitespace.
///
/// ```text
/// CFWS            =   (1*([FWS] comment) [FWS]) / FWS
/// ```
pub fn match_cfws(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cfws_with_comment, &match_fws])
}

fn match_cfws_with_comment(cs: &[u8]) -> MatchResult<'_> {
    let (comments, cs) = match_many(Tag::Literal, cs, 1, |cs| {
        let (fws, cs) = optional(match_fws, cs);
        let (comment, cs) = match_comment(cs)?;
        Some((
            Match::build(Tag::Literal, [("pre", fws), ("comment", Some(comment))]),
            cs,
        ))
    })?;

    let (post, cs) = optional(match_fws, cs);
    Some((
        Match::build(Tag::Literal, [("comments", Some(comments)), ("post", post)]),
        cs,
    ))
}

/// Returns true for an atom character.
///
/// ```text
/// atext           =   ALPHA / DIGIT /    ; Printable US-ASCII
///                     "!" / "#" /        ;  characters not including
///                     "$" / "%" /        ;  specials.  Used for atoms.
///                     "&" / "'" /
///                     "*" / "+" /
///                     "-" / "/" /
///                     "=" / "?" /
///                     "^" / "_" /
///                     "`" / "{" /
///                     "|" / "}" /
///                     "~"
/// ```
#[must_use]
pub const fn is_atext(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'/'
                | b'='
                | b'?'
                | b'^'
                | b'_'
                | b'`'
                | b'{'
                | b'|'
                | b'}'
                | b'~'
        )
}

/// Matches a single atom character.
pub fn match_atext(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, is_atext)
}

/// Matches an atom.
///
/// ```text
/// atom            =   [CFWS] 1*atext [CFWS]
/// ```
pub fn match_atom(cs: &[u8]) -> MatchResult<'_> {
    let (pre, cs) = optional(match_cfws, cs);
    let (atext, cs) = match_many(Tag::Literal, cs, 1, match_atext)?;
    let (post, cs) = optional(match_cfws, cs);
    Some((
        Match::build(
            Tag::Atom,
            [("pre", pre), ("atext", Some(atext)), ("post", post)],
        ),
        cs,
    ))
}

/// Matches atoms joined by periods.
///
/// ```text
/// dot-atom-text   =   1*atext *("." 1*atext)
/// ```
pub fn match_dot_atom_text(cs: &[u8]) -> MatchResult<'_> {
    match_many_with_sep(
        Tag::Literal,
        cs,
        1,
        |cs| match_many(Tag::None, cs, 1, match_atext),
        |cs| match_one_rune(Tag::None, cs, '.'),
    )
}

/// Matches a dot atom.
///
/// ```text
/// dot-atom        =   [CFWS] dot-atom-text [CFWS]
/// ```
pub fn match_dot_atom(cs: &[u8]) -> MatchResult<'_> {
    let (pre, cs) = optional(match_cfws, cs);
    let (text, cs) = match_dot_atom_text(cs)?;
    let (post, cs) = optional(match_cfws, cs);
    Some((
        Match::build(
            Tag::DotAtom,
            [("pre", pre), ("dot-atom-text", Some(text)), ("post", post)],
        ),
        cs,
    ))
}

/// Matches a single quoted string character.
///
/// ```text
/// qtext           =   %d33 /             ; Printable US-ASCII
///                     %d35-91 /          ;  characters not including
///                     %d93-126 /         ;  "\" or the quote character
///                     obs-qtext
/// ```
///
/// Bytes above 127 are accepted as opaque UTF-8 text.
pub fn match_qtext(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_qtext, &match_obs_qtext])
}

fn match_cur_qtext(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| {
        matches!(c, 33 | 35..=91 | 93..=126) || c >= 0x80
    })
}

/// Matches the content of a quoted string.
///
/// ```text
/// qcontent        =   qtext / quoted-pair
/// ```
pub fn match_qcontent(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_qtext, &match_quoted_pair])
}

/// Matches a quoted string.
///
/// ```text
/// quoted-string   =   [CFWS]
///                     DQUOTE *([FWS] qcontent) [FWS] DQUOTE
///                     [CFWS]
/// ```
pub fn match_quoted_string(cs: &[u8]) -> MatchResult<'_> {
    let (pre, cs) = optional(match_cfws, cs);
    let (ldq, cs) = match_dquote(cs)?;

    let (qcontent, cs) = match_many(Tag::Literal, cs, 0, |cs| {
        let (fws, cs) = optional(match_fws, cs);
        let (qcontent, cs) = match_qcontent(cs)?;
        Some((
            Match::build(Tag::Literal, [("", fws), ("qcontent", Some(qcontent))]),
            cs,
        ))
    })?;

    let (qcontent, cs) = match match_fws(cs) {
        Some((fws, rest)) => (qcontent.with_trailing(fws.content()), rest),
        None => (qcontent, cs),
    };

    let (rdq, cs) = match_dquote(cs)?;
    let (post, cs) = optional(match_cfws, cs);

    Some((
        Match::build(
            Tag::QuotedString,
            [
                ("pre", pre),
                ("", Some(ldq)),
                ("qcontent", Some(qcontent)),
                ("", Some(rdq)),
                ("post", post),
            ],
        ),
        cs,
    ))
}

/// Matches a word.
///
/// ```text
/// word            =   atom / quoted-string
/// ```
pub fn match_word(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_atom, &match_quoted_string])
}

/// Matches a phrase.
///
/// ```text
/// phrase          =   1*word / obs-phrase
/// ```
pub fn match_phrase(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_words, &match_obs_phrase])
}

fn match_words(cs: &[u8]) -> MatchResult<'_> {
    match_many(Tag::Words, cs, 1, match_word)
}

/// Runs an optional piece of a sequence.
///
/// Returns the match, if any, and the input to continue from.
pub(crate) fn optional<'a, M>(matcher: M, cs: &'a [u8]) -> (Option<Match>, &'a [u8])
where
    M: Fn(&'a [u8]) -> MatchResult<'a>,
{
    match matcher(cs) {
        Some((m, rest)) => (Some(m), rest),
        None => (None, cs),
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

    fn full(result: MatchResult<'_>, input: &[u8]) -> Match {
        let (m, rest) = result.unwrap();
        assert!(rest.is_empty(), "unconsumed: {:?}", String::from_utf8_lossy(rest));
        assert_eq!(m.content(), input);
        m
    }

    #[test]
    fn test_quoted_pair() {
        let (m, rest) = match_quoted_pair(b"\\\"x").unwrap();
        assert_eq!(m.content(), b"\\\"");
        assert_eq!(rest, b"x");

        let (m, _) = match_quoted_pair(b"\\\x00").unwrap();
        assert_eq!(m.tag(), Tag::ObsQp);

        assert!(match_quoted_pair(b"x").is_none());
        assert!(match_quoted_pair(b"\\").is_none());
    }

    #[test]
    fn test_fws() {
        full(match_fws(b" \r\n\t"), b" \r\n\t");
        full(match_fws(b"  "), b"  ");

        let (m, rest) = match_fws(b"\t\r\nx").unwrap();
        assert_eq!(m.content(), b"\t");
        assert_eq!(rest, b"\r\nx");

        assert!(match_fws(b"\r\nx").is_none());
        assert!(match_fws(b"x").is_none());
    }

    #[test]
    fn test_ctext() {
        full(match_ctext(b"!"), b"!");

        let (m, rest) = match_ctext("\u{e9}".as_bytes()).unwrap();
        assert_eq!(m.content(), b"\xc3");
        assert_eq!(rest, b"\xa9");

        assert!(match_ctext(b"(").is_none());
        assert!(match_ctext(b")").is_none());
        assert!(match_ctext(b"\\").is_none());
    }

    #[test]
    fn test_comment() {
        let m = full(match_comment(b"(a comment)"), b"(a comment)");
        assert_eq!(m.tag(), Tag::Comment);
        assert_eq!(m.named("comment-content").unwrap().content(), b"a comment");
    }

    #[test]
    fn test_comment_nested_and_escaped() {
        let input = b"(outer (inner \\) still) done)";
        let m = full(match_comment(input), input);
        assert_eq!(
            m.named("comment-content").unwrap().content(),
            b"outer (inner \\) still) done"
        );
    }

    #[test]
    fn test_comment_trailing_fws() {
        let m = full(match_comment(b"( hi  )"), b"( hi  )");
        let contents = m.named("comment-content").unwrap();
        assert_eq!(contents.tag(), Tag::CContents);
        assert_eq!(contents.content(), b" hi  ");
    }

    #[test]
    fn test_comment_unbalanced() {
        assert!(match_comment(b"(open").is_none());
        assert!(match_comment(b"(a (b)").is_none());
    }

    #[test]
    fn test_comment_nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "(".repeat(depth), ")".repeat(depth));

        let shallow = nested(DEFAULT_MAX_COMMENT_DEPTH);
        full(match_comment(shallow.as_bytes()), shallow.as_bytes());

        let deep = nested(DEFAULT_MAX_COMMENT_DEPTH + 1);
        assert!(match_comment(deep.as_bytes()).is_none());

        let input = nested(4);
        assert!(with_comment_limit(3, || match_comment(input.as_bytes())).is_none());
        assert!(with_comment_limit(4, || match_comment(input.as_bytes())).is_some());
        // The cap is restored afterwards.
        full(match_comment(shallow.as_bytes()), shallow.as_bytes());
    }

    #[test]
    fn test_cfws() {
        full(match_cfws(b" "), b" ");
        full(match_cfws(b" (one) (two) "), b" (one) (two) ");
        full(match_cfws(b"(x)"), b"(x)");
        assert!(match_cfws(b"x").is_none());
    }

    #[test]
    fn test_atom() {
        let m = full(match_atom(b"abc!#$"), b"abc!#$");
        assert_eq!(m.tag(), Tag::Atom);

        let m = full(match_atom(b" (c) abc "), b" (c) abc ");
        assert_eq!(m.named("atext").unwrap().content(), b"abc");
        assert!(m.named("pre").is_some());
        assert!(m.named("post").is_some());

        assert!(match_atom(b" (c) ").is_none());
    }

    #[test]
    fn test_dot_atom_text() {
        full(match_dot_atom_text(b"abc!#$.def&'*.123=?_"), b"abc!#$.def&'*.123=?_");

        let (m, rest) = match_dot_atom_text(b"a..b").unwrap();
        assert_eq!(m.content(), b"a");
        assert_eq!(rest, b"..b");

        let (m, rest) = match_dot_atom_text(b"a.").unwrap();
        assert_eq!(m.content(), b"a");
        assert_eq!(rest, b".");
    }

    #[test]
    fn test_dot_atom() {
        let input = b"ender(weird comment placement)";
        let m = full(match_dot_atom(input), input);
        assert_eq!(m.tag(), Tag::DotAtom);
        assert_eq!(m.named("dot-atom-text").unwrap().content(), b"ender");
    }

    #[test]
    fn test_quoted_string() {
        let m = full(match_quoted_string(b"\"foo bar baz\""), b"\"foo bar baz\"");
        assert_eq!(m.tag(), Tag::QuotedString);
        assert_eq!(m.named("qcontent").unwrap().content(), b"foo bar baz");

        let m = full(match_quoted_string(b" \"\" "), b" \"\" ");
        assert!(m.named("qcontent").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_string_trailing_fws_counted_once() {
        let input = b"\"foo  \" ";
        let m = full(match_quoted_string(input), input);
        assert_eq!(m.named("qcontent").unwrap().content(), b"foo  ");
        assert_eq!(m.len(), input.len());
    }

    #[test]
    fn test_quoted_string_escapes() {
        let input = b"\"a\\\"b\"";
        let m = full(match_quoted_string(input), input);
        assert_eq!(m.named("qcontent").unwrap().content(), b"a\\\"b");
        assert!(match_quoted_string(b"\"open").is_none());
    }

    #[test]
    fn test_word() {
        assert_eq!(full(match_word(b"abc!#$"), b"abc!#$").tag(), Tag::Atom);
        assert_eq!(full(match_word(b"\"a b\""), b"\"a b\"").tag(), Tag::QuotedString);
    }

    #[test]
    fn test_phrase_words() {
        let input = b"abc 123 !#$ \"foo bar baz\"";
        let m = full(match_phrase(input), input);
        assert_eq!(m.tag(), Tag::Words);
        assert_eq!(m.children().len(), 4);
    }

    #[test]
    fn test_phrase_obsolete_periods() {
        let input = b"J. R. R. Tolkien";
        let m = full(match_phrase(input), input);
        assert_eq!(m.tag(), Tag::ObsPhrase);
    }
}

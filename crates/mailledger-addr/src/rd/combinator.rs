//! Matching combinators.

use super::{Match, Tag};

/// Result of a matcher: the match and the remaining input, or `None`.
pub type MatchResult<'a> = Option<(Match, &'a [u8])>;

/// Matches exactly one byte satisfying `pred`.
///
/// Fails without calling `pred` when the input is empty.
pub fn match_one<P>(tag: Tag, input: &[u8], pred: P) -> MatchResult<'_>
where
    P: Fn(u8) -> bool,
{
    let (&first, rest) = input.split_first()?;
    pred(first).then(|| (Match::leaf(tag, &input[..1]), rest))
}

/// Matches one byte equal to `rune`.
///
/// The grammar is ASCII-structural, so this is a single byte comparison.
pub fn match_one_rune(tag: Tag, input: &[u8], rune: char) -> MatchResult<'_> {
    match_one(tag, input, |c| char::from(c) == rune)
}

/// Tries every alternative against the same input and keeps the longest.
///
/// Ties go to the alternative listed first. Several RFC 5322 productions
/// overlap with their obsolete forms, so the order of `alternatives` is part
/// of the grammar.
pub fn match_longest<'a>(
    input: &'a [u8],
    alternatives: &[&dyn Fn(&'a [u8]) -> MatchResult<'a>],
) -> MatchResult<'a> {
    let mut best: MatchResult<'a> = None;
    let mut winner = 0;

    for (index, alternative) in alternatives.iter().enumerate() {
        let Some((m, rest)) = alternative(input) else {
            continue;
        };

        if best.as_ref().is_none_or(|(current, _)| m.len() > current.len()) {
            winner = index;
            best = Some((m, rest));
        }
    }

    if let Some((m, _)) = &best {
        tracing::trace!(winner, tag = %m.tag(), len = m.len(), "longest alternative");
    }

    best
}

/// Applies `matcher` as many times as it succeeds.
///
/// Each success becomes an ordered child. Succeeds when at least `min`
/// repetitions matched; with `min == 0` it always succeeds, possibly with an
/// empty match.
pub fn match_many<'a, M>(tag: Tag, mut input: &'a [u8], min: usize, matcher: M) -> MatchResult<'a>
where
    M: Fn(&'a [u8]) -> MatchResult<'a>,
{
    let mut content = Vec::new();
    let mut children = Vec::new();

    while let Some((m, rest)) = matcher(input) {
        let consumed = input.len() - rest.len();
        debug_assert!(consumed > 0, "zero-width repetition in {tag}");
        if consumed == 0 {
            break;
        }

        content.extend_from_slice(m.content());
        children.push(m);
        input = rest;
    }

    (children.len() >= min).then(|| (Match::repetition(tag, content, children), input))
}

/// Like [`match_many`] but requires `sep` between consecutive matches.
///
/// Separators contribute their bytes to the content but are not children. A
/// separator that is not followed by another match is left unconsumed.
pub fn match_many_with_sep<'a, M, S>(
    tag: Tag,
    mut input: &'a [u8],
    min: usize,
    matcher: M,
    sep: S,
) -> MatchResult<'a>
where
    M: Fn(&'a [u8]) -> MatchResult<'a>,
    S: Fn(&'a [u8]) -> MatchResult<'a>,
{
    let mut content = Vec::new();
    let mut children: Vec<Match> = Vec::new();

    loop {
        let mut next = input;
        let mut separator = None;

        if !children.is_empty() {
            let Some((s, rest)) = sep(next) else {
                break;
            };
            separator = Some(s);
            next = rest;
        }

        let Some((m, rest)) = matcher(next) else {
            break;
        };

        let consumed = input.len() - rest.len();
        debug_assert!(consumed > 0, "zero-width repetition in {tag}");
        if consumed == 0 {
            break;
        }

        if let Some(s) = separator {
            content.extend_from_slice(s.content());
        }
        content.extend_from_slice(m.content());
        children.push(m);
        input = rest;
    }

    (children.len() >= min).then(|| (Match::repetition(tag, content, children), input))
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

    fn digit(cs: &[u8]) -> MatchResult<'_> {
        match_one(Tag::Literal, cs, |c| c.is_ascii_digit())
    }

    fn comma(cs: &[u8]) -> MatchResult<'_> {
        match_one_rune(Tag::None, cs, ',')
    }

    fn two_digits(cs: &[u8]) -> MatchResult<'_> {
        let (a, cs) = digit(cs)?;
        let (b, cs) = digit(cs)?;
        Some((Match::build(Tag::Words, [("", Some(a)), ("", Some(b))]), cs))
    }

    fn two_digits_again(cs: &[u8]) -> MatchResult<'_> {
        two_digits(cs).map(|(m, rest)| (Match::build(Tag::Atom, [("", Some(m))]), rest))
    }

    #[test]
    fn test_match_one_happy() {
        let (m, rest) = digit(b"12a").unwrap();
        assert_eq!(m.content(), b"1");
        assert_eq!(m.tag(), Tag::Literal);
        assert_eq!(rest, b"2a");
    }

    #[test]
    fn test_match_one_sad() {
        assert!(digit(b"a12").is_none());
    }

    #[test]
    fn test_match_one_empty_skips_predicate() {
        let called = std::cell::Cell::new(false);
        let result = match_one(Tag::Literal, b"", |_| {
            called.set(true);
            true
        });
        assert!(result.is_none());
        assert!(!called.get());
    }

    #[test]
    fn test_match_one_rune() {
        let (m, rest) = match_one_rune(Tag::None, b"<x", '<').unwrap();
        assert_eq!(m.content(), b"<");
        assert_eq!(rest, b"x");
        assert!(match_one_rune(Tag::None, b"x<", '<').is_none());
    }

    #[test]
    fn test_match_longest_picks_longest() {
        let (m, rest) = match_longest(b"123", &[&digit, &two_digits]).unwrap();
        assert_eq!(m.content(), b"12");
        assert_eq!(rest, b"3");
    }

    #[test]
    fn test_match_longest_tie_goes_to_first() {
        let (m, _) = match_longest(b"12", &[&two_digits, &two_digits_again]).unwrap();
        assert_eq!(m.tag(), Tag::Words);

        let (m, _) = match_longest(b"12", &[&two_digits_again, &two_digits]).unwrap();
        assert_eq!(m.tag(), Tag::Atom);
    }

    #[test]
    fn test_match_longest_skips_failures() {
        let (m, _) = match_longest(b"1,", &[&comma, &digit]).unwrap();
        assert_eq!(m.content(), b"1");
        assert!(match_longest(b"x", &[&comma, &digit]).is_none());
    }

    #[test]
    fn test_match_many_collects_children() {
        let (m, rest) = match_many(Tag::Literal, b"123x", 1, digit).unwrap();
        assert_eq!(m.content(), b"123");
        assert_eq!(m.children().len(), 3);
        assert_eq!(rest, b"x");
    }

    #[test]
    fn test_match_many_min() {
        assert!(match_many(Tag::Literal, b"x", 1, digit).is_none());
        assert!(match_many(Tag::Literal, b"", 1, digit).is_none());
        assert!(match_many(Tag::Literal, b"12", 3, digit).is_none());

        let (m, rest) = match_many(Tag::Literal, b"", 0, digit).unwrap();
        assert!(m.is_empty());
        assert!(m.children().is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_match_many_with_sep() {
        let (m, rest) = match_many_with_sep(Tag::Literal, b"1,2,3;", 1, digit, comma).unwrap();
        assert_eq!(m.content(), b"1,2,3");
        assert_eq!(m.children().len(), 3);
        assert_eq!(rest, b";");
    }

    #[test]
    fn test_match_many_with_sep_leaves_dangling_separator() {
        let (m, rest) = match_many_with_sep(Tag::Literal, b"1,2,x", 1, digit, comma).unwrap();
        assert_eq!(m.content(), b"1,2");
        assert_eq!(rest, b",x");
    }

    #[test]
    fn test_match_many_with_sep_min() {
        assert!(match_many_with_sep(Tag::Literal, b"", 1, digit, comma).is_none());
        assert!(match_many_with_sep(Tag::Literal, b",1", 1, digit, comma).is_none());
        assert!(match_many_with_sep(Tag::Literal, b"1,2", 3, digit, comma).is_none());

        let (m, rest) = match_many_with_sep(Tag::Literal, b",1", 0, digit, comma).unwrap();
        assert!(m.is_empty());
        assert_eq!(rest, b",1");
    }
}

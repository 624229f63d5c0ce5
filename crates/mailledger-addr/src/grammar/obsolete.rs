//! Obsolete syntax (RFC 5322 section 4).
//!
//! Parsers must accept these forms even though generators must not emit
//! them. Most of them relax where whitespace, comments and periods may
//! appear, or allow empty list elements.

use super::address::{match_address, match_addr_spec, match_domain, match_mailbox};
use super::lexical::{match_atom, match_cfws, match_quoted_pair, match_word, optional};
use super::rfc5234::{match_cr, match_crlf, match_lf, match_wsp};
use crate::rd::{
    Match, MatchResult, Tag, match_longest, match_many, match_many_with_sep, match_one,
    match_one_rune,
};

/// Returns true for the control characters RFC 5322 still tolerates.
///
/// ```text
/// obs-NO-WS-CTL   =   %d1-8 /            ; US-ASCII control
///                     %d11 /             ;  characters that do not
///                     %d12 /             ;  include the carriage
///                     %d14-31 /          ;  return, line feed, and
///                     %d127              ;  white space characters
/// ```
const fn is_obs_no_ws_ctl(c: u8) -> bool {
    matches!(c, 1..=8 | 11 | 12 | 14..=31 | 127)
}

/// Matches `obs-NO-WS-CTL`.
pub fn match_obs_no_ws_ctl(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, is_obs_no_ws_ctl)
}

/// `obs-ctext = obs-NO-WS-CTL`
pub fn match_obs_ctext(cs: &[u8]) -> MatchResult<'_> {
    match_obs_no_ws_ctl(cs)
}

/// `obs-qtext = obs-NO-WS-CTL`
pub fn match_obs_qtext(cs: &[u8]) -> MatchResult<'_> {
    match_obs_no_ws_ctl(cs)
}

/// `obs-qp = "\" (%d0 / obs-NO-WS-CTL / LF / CR)`
pub fn match_obs_qp(cs: &[u8]) -> MatchResult<'_> {
    let (bs, cs) = match_one_rune(Tag::Literal, cs, '\\')?;
    let (ch, cs) = match_longest(
        cs,
        &[&match_nul, &match_obs_no_ws_ctl, &match_lf, &match_cr],
    )?;
    Some((Match::build(Tag::ObsQp, [("", Some(bs)), ("", Some(ch))]), cs))
}

fn match_nul(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| c == 0)
}

/// Matches obsolete folding whitespace.
///
/// ```text
/// obs-FWS         =   1*WSP *(CRLF 1*WSP)
/// ```
pub fn match_obs_fws(cs: &[u8]) -> MatchResult<'_> {
    let (head, cs) = match_many(Tag::Literal, cs, 1, match_wsp)?;
    let (tail, cs) = match_many(Tag::Literal, cs, 0, |cs| {
        let (crlf, cs) = match_crlf(cs)?;
        let (wsp, cs) = match_many(Tag::Literal, cs, 1, match_wsp)?;
        Some((Match::build(Tag::Literal, [("", Some(crlf)), ("", Some(wsp))]), cs))
    })?;
    Some((Match::build(Tag::Literal, [("", Some(head)), ("", Some(tail))]), cs))
}

/// Matches a phrase that may contain periods and bare comments.
///
/// ```text
/// obs-phrase      =   word *(word / "." / CFWS)
/// ```
pub fn match_obs_phrase(cs: &[u8]) -> MatchResult<'_> {
    let (head, cs) = match_word(cs)?;
    let (tail, cs) = match_many(Tag::Literal, cs, 0, |cs| {
        match_longest(cs, &[&match_word, &match_period, &match_cfws])
    })?;
    Some((
        Match::build(Tag::ObsPhrase, [("head", Some(head)), ("tail", Some(tail))]),
        cs,
    ))
}

fn match_period(cs: &[u8]) -> MatchResult<'_> {
    match_one_rune(Tag::Literal, cs, '.')
}

fn match_comma(cs: &[u8]) -> MatchResult<'_> {
    match_one_rune(Tag::Literal, cs, ',')
}

/// Matches an angle address carrying a source route.
///
/// ```text
/// obs-angle-addr  =   [CFWS] "<" obs-route addr-spec ">" [CFWS]
/// ```
pub fn match_obs_angle_addr(cs: &[u8]) -> MatchResult<'_> {
    let (pre, cs) = optional(match_cfws, cs);
    let (la, cs) = match_one_rune(Tag::Literal, cs, '<')?;
    let (route, cs) = match_obs_route(cs)?;
    let (addr_spec, cs) = match_addr_spec(cs)?;
    let (ra, cs) = match_one_rune(Tag::Literal, cs, '>')?;
    let (post, cs) = optional(match_cfws, cs);
    Some((
        Match::build(
            Tag::ObsAngleAddr,
            [
                ("pre", pre),
                ("", Some(la)),
                ("obs-route", Some(route)),
                ("addr-spec", Some(addr_spec)),
                ("", Some(ra)),
                ("post", post),
            ],
        ),
        cs,
    ))
}

/// `obs-route = obs-domain-list ":"`
pub fn match_obs_route(cs: &[u8]) -> MatchResult<'_> {
    let (domains, cs) = match_obs_domain_list(cs)?;
    let (colon, cs) = match_one_rune(Tag::Literal, cs, ':')?;
    Some((
        Match::build(
            Tag::ObsRoute,
            [("obs-domain-list", Some(domains)), ("", Some(colon))],
        ),
        cs,
    ))
}

/// Matches the list of domains of a source route.
///
/// ```text
/// obs-domain-list =   *(CFWS / ",") "@" domain
///                     *("," [CFWS] ["@" domain])
/// ```
pub fn match_obs_domain_list(cs: &[u8]) -> MatchResult<'_> {
    let (before, cs) = match_many(Tag::Literal, cs, 0, |cs| {
        match_longest(cs, &[&match_cfws, &match_comma])
    })?;
    let (at, cs) = match_one_rune(Tag::Literal, cs, '@')?;
    let (domain, cs) = match_domain(cs)?;

    let (tail, cs) = match_many(Tag::Literal, cs, 0, |cs| {
        let (comma, cs) = match_comma(cs)?;
        let (cfws, cs) = optional(match_cfws, cs);
        let (route, cs) = optional(match_route_domain, cs);
        Some((
            Match::build(
                Tag::Literal,
                [("", Some(comma)), ("cfws", cfws), ("domain", route)],
            ),
            cs,
        ))
    })?;

    Some((
        Match::build(
            Tag::ObsDomainList,
            [
                ("", Some(before)),
                ("", Some(at)),
                ("domain", Some(domain)),
                ("tail", Some(tail)),
            ],
        ),
        cs,
    ))
}

fn match_route_domain(cs: &[u8]) -> MatchResult<'_> {
    let (at, cs) = match_one_rune(Tag::Literal, cs, '@')?;
    let (domain, cs) = match_domain(cs)?;
    Some((
        Match::build(Tag::Literal, [("", Some(at)), ("domain", Some(domain))]),
        cs,
    ))
}

/// Matches a mailbox list that tolerates empty elements.
///
/// ```text
/// obs-mbox-list   =   *([CFWS] ",") mailbox *("," [mailbox / CFWS])
/// ```
pub fn match_obs_mbox_list(cs: &[u8]) -> MatchResult<'_> {
    let (before, cs) = match_many(Tag::None, cs, 0, match_empty_element)?;
    let (head, cs) = match_mailbox(cs)?;

    let (tail, cs) = match_many(Tag::ObsMboxTailList, cs, 0, |cs| {
        let (comma, cs) = match_comma(cs)?;
        let (element, cs) = optional(
            |cs| match_longest(cs, &[&match_mailbox, &match_cfws]),
            cs,
        );
        let name = match element.as_ref().map(Match::tag) {
            Some(Tag::Mailbox) => "mailbox",
            _ => "cfws",
        };
        Some((
            Match::build(Tag::ObsMboxOptional, [("", Some(comma)), (name, element)]),
            cs,
        ))
    })?;

    Some((
        Match::build(
            Tag::ObsMboxList,
            [("", Some(before)), ("head", Some(head)), ("tail", Some(tail))],
        ),
        cs,
    ))
}

/// Matches an address list that tolerates empty elements.
///
/// ```text
/// obs-addr-list   =   *([CFWS] ",") address *("," [address / CFWS])
/// ```
pub fn match_obs_addr_list(cs: &[u8]) -> MatchResult<'_> {
    let (before, cs) = match_many(Tag::None, cs, 0, match_empty_element)?;
    let (head, cs) = match_address(cs)?;

    let (tail, cs) = match_many(Tag::ObsAddrTailList, cs, 0, |cs| {
        let (comma, cs) = match_comma(cs)?;
        let (element, cs) = optional(
            |cs| match_longest(cs, &[&match_address, &match_cfws]),
            cs,
        );
        let name = match element.as_ref().map(Match::tag) {
            Some(Tag::Mailbox | Tag::Group) => "address",
            _ => "cfws",
        };
        Some((
            Match::build(Tag::ObsAddrOptional, [("", Some(comma)), (name, element)]),
            cs,
        ))
    })?;

    Some((
        Match::build(
            Tag::ObsAddrList,
            [("", Some(before)), ("head", Some(head)), ("tail", Some(tail))],
        ),
        cs,
    ))
}

fn match_empty_element(cs: &[u8]) -> MatchResult<'_> {
    let (cfws, cs) = optional(match_cfws, cs);
    let (comma, cs) = match_comma(cs)?;
    Some((Match::build(Tag::None, [("", cfws), ("", Some(comma))]), cs))
}

/// Matches a group list with no members.
///
/// ```text
/// obs-group-list  =   1*([CFWS] ",") [CFWS]
/// ```
pub fn match_obs_group_list(cs: &[u8]) -> MatchResult<'_> {
    let (commas, cs) = match_many(Tag::None, cs, 1, match_empty_element)?;
    let (post, cs) = optional(match_cfws, cs);
    Some((
        Match::build(Tag::ObsGroupList, [("", Some(commas)), ("post", post)]),
        cs,
    ))
}

/// Matches a local part whose words may be quoted or surrounded by comments.
///
/// ```text
/// obs-local-part  =   word *("." word)
/// ```
pub fn match_obs_local_part(cs: &[u8]) -> MatchResult<'_> {
    match_many_with_sep(Tag::ObsLocalPart, cs, 1, match_word, match_period)
}

/// Matches a domain whose atoms may be surrounded by comments.
///
/// ```text
/// obs-domain      =   atom *("." atom)
/// ```
pub fn match_obs_domain(cs: &[u8]) -> MatchResult<'_> {
    let (head, cs) = match_atom(cs)?;
    let (tail, cs) = match_many(Tag::ObsDomainTailList, cs, 0, |cs| {
        let (period, cs) = match_period(cs)?;
        let (atom, cs) = match_atom(cs)?;
        Some((
            Match::build(
                Tag::ObsDomainOptional,
                [("", Some(period)), ("atom", Some(atom))],
            ),
            cs,
        ))
    })?;
    Some((
        Match::build(Tag::ObsDomain, [("head", Some(head)), ("tail", Some(tail))]),
        cs,
    ))
}

/// `obs-dtext = obs-NO-WS-CTL / quoted-pair`
pub fn match_obs_dtext(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_obs_no_ws_ctl, &match_quoted_pair])
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
    fn test_obs_no_ws_ctl() {
        assert!(match_obs_no_ws_ctl(b"\x01").is_some());
        assert!(match_obs_no_ws_ctl(b"\x7f").is_some());
        assert!(match_obs_no_ws_ctl(b"\x00").is_none());
        assert!(match_obs_no_ws_ctl(b"\t").is_none());
        assert!(match_obs_no_ws_ctl(b"\r").is_none());
        assert!(match_obs_no_ws_ctl(b"a").is_none());
    }

    #[test]
    fn test_obs_qp() {
        for input in [&b"\\\x00"[..], b"\\\x01", b"\\\n", b"\\\r", b"\\\x7f"] {
            let m = full(match_obs_qp(input), input);
            assert_eq!(m.tag(), Tag::ObsQp);
        }
        assert!(match_obs_qp(b"\\a").is_none());
    }

    #[test]
    fn test_obs_fws() {
        full(match_obs_fws(b" \r\n \r\n\t"), b" \r\n \r\n\t");

        let (m, rest) = match_obs_fws(b" \r\nx").unwrap();
        assert_eq!(m.content(), b" ");
        assert_eq!(rest, b"\r\nx");
    }

    #[test]
    fn test_obs_phrase() {
        let input = b"Joe Q. Public";
        let m = full(match_obs_phrase(input), input);
        assert_eq!(m.named("head").unwrap().content(), b"Joe ");
        assert!(match_obs_phrase(b".Joe").is_none());
    }

    #[test]
    fn test_obs_route() {
        let input = b"@obs1.example.com,@obs2.example.com,@obs3.example.com:";
        let m = full(match_obs_route(input), input);
        assert_eq!(m.tag(), Tag::ObsRoute);
    }

    #[test]
    fn test_obs_domain_list_empty_elements() {
        let input = b", ,@a.example,,@b.example";
        let m = full(match_obs_domain_list(input), input);
        assert_eq!(m.named("domain").unwrap().content(), b"a.example");
    }

    #[test]
    fn test_obs_angle_addr() {
        let input = b"<@obs1.example.com,@obs2.example.com:cur@example.com>";
        let m = full(match_obs_angle_addr(input), input);
        assert_eq!(m.named("addr-spec").unwrap().content(), b"cur@example.com");
    }

    #[test]
    fn test_obs_mbox_list_names_elements() {
        let input = b", a@example.com, (skipped), b@example.com,";
        let m = full(match_obs_mbox_list(input), input);
        let tail = m.named("tail").unwrap();
        let names: Vec<bool> = tail
            .children()
            .iter()
            .map(|element| element.named("mailbox").is_some())
            .collect();
        assert_eq!(names, vec![false, true, false]);
    }

    #[test]
    fn test_obs_addr_list() {
        let input = b"a@example.com,, Team: b@example.com;";
        let m = full(match_obs_addr_list(input), input);
        assert_eq!(m.tag(), Tag::ObsAddrList);
        let tail = m.named("tail").unwrap();
        assert_eq!(tail.children().len(), 2);
        assert!(tail.children()[1].named("address").is_some());
    }

    #[test]
    fn test_obs_group_list() {
        let m = full(match_obs_group_list(b" , (nobody) ,"), b" , (nobody) ,");
        assert_eq!(m.tag(), Tag::ObsGroupList);
        assert!(match_obs_group_list(b" ").is_none());
    }

    #[test]
    fn test_obs_local_part() {
        let input = b"\"john\" . smith";
        let m = full(match_obs_local_part(input), input);
        assert_eq!(m.children().len(), 2);
    }

    #[test]
    fn test_obs_domain() {
        let input = b"example (x) . com";
        let m = full(match_obs_domain(input), input);
        assert_eq!(m.named("tail").unwrap().children().len(), 1);
    }

    #[test]
    fn test_obs_dtext() {
        assert!(match_obs_dtext(b"\x01").is_some());
        assert_eq!(match_obs_dtext(b"\\]").unwrap().0.content(), b"\\]");
        assert!(match_obs_dtext(b"a").is_none());
    }
}

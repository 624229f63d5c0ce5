//! Address specification (RFC 5322 section 3.4).

use super::lexical::{
    match_cfws, match_dot_atom, match_fws, match_phrase, match_quoted_string, optional,
};
use super::obsolete::{
    match_obs_addr_list, match_obs_angle_addr, match_obs_domain, match_obs_dtext,
    match_obs_group_list, match_obs_local_part, match_obs_mbox_list,
};
use crate::rd::{
    Match, MatchResult, Tag, match_longest, match_many, match_many_with_sep, match_one,
    match_one_rune,
};

/// `address = mailbox / group`
pub fn match_address(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_mailbox, &match_group])
}

/// Matches a mailbox.
///
/// ```text
/// mailbox         =   name-addr / addr-spec
/// ```
///
/// Whichever alternative wins is wrapped in a [`Tag::Mailbox`] node so that
/// list productions can tell mailboxes apart from comments.
pub fn match_mailbox(cs: &[u8]) -> MatchResult<'_> {
    let (inner, cs) = match_longest(cs, &[&match_name_addr, &match_addr_spec])?;
    Some((Match::build(Tag::Mailbox, [("mailbox", Some(inner))]), cs))
}

/// `name-addr = [display-name] angle-addr`
pub fn match_name_addr(cs: &[u8]) -> MatchResult<'_> {
    let (display_name, cs) = optional(match_display_name, cs);
    let (angle_addr, cs) = match_angle_addr(cs)?;
    Some((
        Match::build(
            Tag::NameAddr,
            [("display-name", display_name), ("angle-addr", Some(angle_addr))],
        ),
        cs,
    ))
}

/// Matches an angle address.
///
/// ```text
/// angle-addr      =   [CFWS] "<" addr-spec ">" [CFWS] /
///                     obs-angle-addr
/// ```
pub fn match_angle_addr(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_angle_addr, &match_obs_angle_addr])
}

fn match_cur_angle_addr(cs: &[u8]) -> MatchResult<'_> {
    let (pre, cs) = optional(match_cfws, cs);
    let (la, cs) = match_one_rune(Tag::Literal, cs, '<')?;
    let (addr_spec, cs) = match_addr_spec(cs)?;
    let (ra, cs) = match_one_rune(Tag::Literal, cs, '>')?;
    let (post, cs) = optional(match_cfws, cs);
    Some((
        Match::build(
            Tag::AngleAddr,
            [
                ("pre", pre),
                ("", Some(la)),
                ("addr-spec", Some(addr_spec)),
                ("", Some(ra)),
                ("post", post),
            ],
        ),
        cs,
    ))
}

/// Matches a named group of mailboxes.
///
/// ```text
/// group           =   display-name ":" [group-list] ";" [CFWS]
/// ```
pub fn match_group(cs: &[u8]) -> MatchResult<'_> {
    let (display_name, cs) = match_display_name(cs)?;
    let (colon, cs) = match_one_rune(Tag::Literal, cs, ':')?;
    let (list, cs) = optional(match_group_list, cs);
    let (semicolon, cs) = match_one_rune(Tag::Literal, cs, ';')?;
    let (post, cs) = optional(match_cfws, cs);
    Some((
        Match::build(
            Tag::Group,
            [
                ("display-name", Some(display_name)),
                ("", Some(colon)),
                ("group-list", list),
                ("", Some(semicolon)),
                ("post", post),
            ],
        ),
        cs,
    ))
}

/// `display-name = phrase`
pub fn match_display_name(cs: &[u8]) -> MatchResult<'_> {
    let (phrase, cs) = match_phrase(cs)?;
    Some((Match::build(Tag::DisplayName, [("phrase", Some(phrase))]), cs))
}

/// Matches a comma separated list of mailboxes.
///
/// ```text
/// mailbox-list    =   (mailbox *("," mailbox)) / obs-mbox-list
/// ```
pub fn match_mailbox_list(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_mailbox_list, &match_obs_mbox_list])
}

fn match_cur_mailbox_list(cs: &[u8]) -> MatchResult<'_> {
    match_many_with_sep(Tag::MailboxList, cs, 1, match_mailbox, match_comma)
}

/// Matches a comma separated list of addresses.
///
/// ```text
/// address-list    =   (address *("," address)) / obs-addr-list
/// ```
pub fn match_address_list(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_address_list, &match_obs_addr_list])
}

fn match_cur_address_list(cs: &[u8]) -> MatchResult<'_> {
    match_many_with_sep(Tag::AddressList, cs, 1, match_address, match_comma)
}

fn match_comma(cs: &[u8]) -> MatchResult<'_> {
    match_one_rune(Tag::Literal, cs, ',')
}

/// `group-list = mailbox-list / CFWS / obs-group-list`
pub fn match_group_list(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_mailbox_list, &match_cfws, &match_obs_group_list])
}

/// Matches a bare address.
///
/// ```text
/// addr-spec       =   local-part "@" domain
/// ```
pub fn match_addr_spec(cs: &[u8]) -> MatchResult<'_> {
    let (local_part, cs) = match_local_part(cs)?;
    let (at, cs) = match_one_rune(Tag::Literal, cs, '@')?;
    let (domain, cs) = match_domain(cs)?;
    Some((
        Match::build(
            Tag::AddrSpec,
            [
                ("local-part", Some(local_part)),
                ("", Some(at)),
                ("domain", Some(domain)),
            ],
        ),
        cs,
    ))
}

/// `local-part = dot-atom / quoted-string / obs-local-part`
pub fn match_local_part(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_dot_atom, &match_quoted_string, &match_obs_local_part])
}

/// `domain = dot-atom / domain-literal / obs-domain`
pub fn match_domain(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_dot_atom, &match_domain_literal, &match_obs_domain])
}

/// Matches a bracketed domain literal.
///
/// ```text
/// domain-literal  =   [CFWS] "[" *([FWS] dtext) [FWS] "]" [CFWS]
/// ```
pub fn match_domain_literal(cs: &[u8]) -> MatchResult<'_> {
    let (pre, cs) = optional(match_cfws, cs);
    let (lb, cs) = match_one_rune(Tag::Literal, cs, '[')?;

    let (literal, cs) = match_many(Tag::None, cs, 0, |cs| {
        let (fws, cs) = optional(match_fws, cs);
        let (dtext, cs) = match_dtext(cs)?;
        Some((Match::build(Tag::None, [("", fws), ("dtext", Some(dtext))]), cs))
    })?;

    let (literal, cs) = match match_fws(cs) {
        Some((fws, rest)) => (literal.with_trailing(fws.content()), rest),
        None => (literal, cs),
    };

    let (rb, cs) = match_one_rune(Tag::Literal, cs, ']')?;
    let (post, cs) = optional(match_cfws, cs);

    Some((
        Match::build(
            Tag::DomainLiteral,
            [
                ("pre-literal", pre),
                ("", Some(lb)),
                ("literal", Some(literal)),
                ("", Some(rb)),
                ("post-literal", post),
            ],
        ),
        cs,
    ))
}

/// Matches a single domain literal character.
///
/// ```text
/// dtext           =   %d33-90 /          ; Printable US-ASCII
///                     %d94-126 /         ;  characters not including
///                     obs-dtext          ;  "[", "]", or "\"
/// ```
pub fn match_dtext(cs: &[u8]) -> MatchResult<'_> {
    match_longest(cs, &[&match_cur_dtext, &match_obs_dtext])
}

fn match_cur_dtext(cs: &[u8]) -> MatchResult<'_> {
    match_one(Tag::Literal, cs, |c| matches!(c, 33..=90 | 94..=126))
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
    fn test_addr_spec() {
        let m = full(match_addr_spec(b"sterling@example.com"), b"sterling@example.com");
        assert_eq!(m.tag(), Tag::AddrSpec);
        assert_eq!(m.named("local-part").unwrap().content(), b"sterling");
        assert_eq!(m.named("domain").unwrap().content(), b"example.com");
    }

    #[test]
    fn test_addr_spec_needs_at() {
        assert!(match_addr_spec(b"sterling").is_none());
        assert!(match_addr_spec(b"@example.com").is_none());
        assert!(match_addr_spec(b"sterling@").is_none());
    }

    #[test]
    fn test_local_part_forms() {
        assert_eq!(full(match_local_part(b"a.b"), b"a.b").tag(), Tag::DotAtom);
        assert_eq!(full(match_local_part(b"\"a b\""), b"\"a b\"").tag(), Tag::QuotedString);
        assert_eq!(full(match_local_part(b"a . b"), b"a . b").tag(), Tag::ObsLocalPart);
    }

    #[test]
    fn test_domain_literal() {
        let input = b"[192.168.0.1]";
        let m = full(match_domain(input), input);
        assert_eq!(m.tag(), Tag::DomainLiteral);
        assert_eq!(m.named("literal").unwrap().content(), b"192.168.0.1");
    }

    #[test]
    fn test_domain_literal_folded() {
        let input = b" [ a\r\n b ] ";
        let m = full(match_domain_literal(input), input);
        assert_eq!(m.named("literal").unwrap().content(), b" a\r\n b ");
        assert!(match_domain_literal(b"[a[b]").is_none());
    }

    #[test]
    fn test_angle_addr() {
        let m = full(match_angle_addr(b" <a@example.com> "), b" <a@example.com> ");
        assert_eq!(m.tag(), Tag::AngleAddr);
        assert!(match_angle_addr(b"<a@example.com").is_none());
    }

    #[test]
    fn test_name_addr() {
        let input = b"\"Zip\" <zip@example.com>";
        let m = full(match_name_addr(input), input);
        assert_eq!(m.named("display-name").unwrap().content(), b"\"Zip\" ");

        let m = full(match_name_addr(b"<zip@example.com>"), b"<zip@example.com>");
        assert!(m.named("display-name").is_none());
    }

    #[test]
    fn test_mailbox_wraps_winner() {
        let m = full(match_mailbox(b"zip@example.com"), b"zip@example.com");
        assert_eq!(m.tag(), Tag::Mailbox);
        assert_eq!(m.named("mailbox").unwrap().tag(), Tag::AddrSpec);

        let m = full(match_mailbox(b"Zip <zip@example.com>"), b"Zip <zip@example.com>");
        assert_eq!(m.named("mailbox").unwrap().tag(), Tag::NameAddr);
    }

    #[test]
    fn test_group() {
        let input = b"Brotherhood: winston@example.com, julia@example.com;";
        let m = full(match_group(input), input);
        assert_eq!(m.tag(), Tag::Group);
        assert_eq!(m.named("group-list").unwrap().tag(), Tag::MailboxList);
    }

    #[test]
    fn test_group_empty() {
        let m = full(match_group(b"Undisclosed recipients:;"), b"Undisclosed recipients:;");
        assert!(m.named("group-list").is_none());
        assert!(match_group(b"Team: a@example.com").is_none());
    }

    #[test]
    fn test_address_prefers_group() {
        let m = full(match_address(b"Team: a@example.com;"), b"Team: a@example.com;");
        assert_eq!(m.tag(), Tag::Group);
    }

    #[test]
    fn test_mailbox_list() {
        let input = b"a@example.com, B <b@example.com>";
        let m = full(match_mailbox_list(input), input);
        assert_eq!(m.tag(), Tag::MailboxList);
        assert_eq!(m.children().len(), 2);
    }

    #[test]
    fn test_mailbox_list_obsolete() {
        let input = b"a@example.com,,b@example.com";
        let m = full(match_mailbox_list(input), input);
        assert_eq!(m.tag(), Tag::ObsMboxList);
    }

    #[test]
    fn test_address_list_stops_at_garbage() {
        let (m, rest) = match_address_list(b"a@example.com and extra text").unwrap();
        assert_eq!(m.content(), b"a@example.com ");
        assert_eq!(rest, b"and extra text");
    }
}

//! Property tests for canonical rendering and the matching engine.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use mailledger_addr::actions::SemanticActions;
use mailledger_addr::grammar::{
    match_address_list, match_dot_atom, match_obs_local_part, match_quoted_string,
};
use mailledger_addr::rd::{MatchResult, match_longest};
use mailledger_addr::{
    AddrSpec, Group, Mailbox, MailboxList, parse_email_group, parse_email_mailbox,
};

fn display_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z0-9'!#]{1,8}( [A-Za-z0-9'!#]{1,8}){0,2}",
        "[A-Za-z]{1,4}(\\.[A-Za-z]{1,4}){1,2}",
        "[A-Za-z0-9.,;:@<>()\"]{1,10}",
        "=\\?[A-Za-z<>,;:@]{1,6}",
    ]
}

fn local_part() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,8}(\\.[a-z0-9]{1,8}){0,2}",
        "[a-z]{1,5} [a-z]{1,5}",
        "\\.[a-z]{1,5}",
    ]
}

fn domain() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\.[a-z]{2,6}){1,2}"
}

fn comment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,6}( [a-z]{1,6}){0,2}",
        "[a-z]{1,4} \\([a-z]{1,4}\\)",
    ]
}

fn mailbox() -> impl Strategy<Value = Mailbox> {
    (display_name(), local_part(), domain(), comment()).prop_map(|(name, local, domain, comment)| {
        Mailbox::new(name, AddrSpec::new(local, domain), comment).unwrap()
    })
}

fn balanced(comment: &str) -> bool {
    let mut depth = 0_i32;
    for c in comment.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn local_part_alternatives(input: &[u8]) -> MatchResult<'_> {
    match_longest(
        input,
        &[&match_dot_atom, &match_quoted_string, &match_obs_local_part],
    )
}

#[test]
fn test_mime_lookalike_name_reparses() {
    let mailbox = parse_email_mailbox("\"=?x <y\" <a@b.c>").unwrap();
    assert_eq!(mailbox.display_name(), "=?x <y");

    let clean = mailbox.clean_string();
    assert_eq!(clean, "\"=?x <y\" <a@b.c>");
    assert_eq!(parse_email_mailbox(&clean).unwrap().display_name(), "=?x <y");
}

#[test]
fn test_group_names_reparse() {
    let members: MailboxList = vec![Mailbox::from(AddrSpec::new("a", "example.com"))].into();

    for name in ["", "=?x: y", "Team", "Brothers and Sisters"] {
        let group = Group::new(name, members.clone());
        let parsed = parse_email_group(&group.clean_string()).unwrap();
        assert_eq!(parsed.display_name(), name);
        assert_eq!(parsed.clean_string(), group.clean_string());
    }
}

proptest! {
    #[test]
    fn test_clean_string_reparses(mailbox in mailbox()) {
        let clean = mailbox.clean_string();
        let parsed = parse_email_mailbox(&clean).unwrap();

        prop_assert_eq!(parsed.display_name(), mailbox.display_name());
        prop_assert_eq!(parsed.addr_spec().local_part(), mailbox.addr_spec().local_part());
        prop_assert_eq!(parsed.addr_spec().domain(), mailbox.addr_spec().domain());
        prop_assert_eq!(parsed.comment(), mailbox.comment());
        prop_assert_eq!(parsed.clean_string(), clean);
    }

    #[test]
    fn test_comment_balance(comment in "[a-z ()]{0,12}") {
        let result = Mailbox::new("", AddrSpec::new("a", "example.com"), comment.clone());
        prop_assert_eq!(result.is_ok(), balanced(&comment));
    }

    #[test]
    fn test_longest_match_is_deterministic(input in "[a-z .\"()\\\\@]{0,16}") {
        let bytes = input.as_bytes();
        let alternatives: [fn(&[u8]) -> MatchResult<'_>; 3] =
            [match_dot_atom, match_quoted_string, match_obs_local_part];

        let first = local_part_alternatives(bytes);
        prop_assert_eq!(&first, &local_part_alternatives(bytes));

        let lengths: Vec<Option<usize>> = alternatives
            .iter()
            .map(|alternative| alternative(bytes).map(|(m, _)| m.len()))
            .collect();
        let longest = lengths.iter().flatten().max().copied();

        match first {
            None => prop_assert!(longest.is_none()),
            Some((m, _)) => {
                prop_assert_eq!(Some(m.len()), longest);
                let winner = lengths.iter().position(|len| *len == longest).unwrap();
                let expected = alternatives[winner](bytes).map(|(m, _)| m);
                prop_assert_eq!(Some(m), expected);
            }
        }
    }

    #[test]
    fn test_actions_are_idempotent(mailboxes in prop::collection::vec(mailbox(), 1..4)) {
        let text = mailboxes
            .iter()
            .map(Mailbox::clean_string)
            .collect::<Vec<_>>()
            .join(", ");
        let (mut m, _) = match_address_list(text.as_bytes()).unwrap();

        let actions = SemanticActions::default();
        actions.apply(&mut m).unwrap();
        let once = m.made().cloned();
        actions.apply(&mut m).unwrap();

        prop_assert!(once.is_some());
        prop_assert_eq!(m.made().cloned(), once);
    }
}

//! Integration tests for the address parse entry points.
//!
//! These run the whole pipeline: grammar, semantic actions and the
//! partial parse classification.

#![allow(clippy::unwrap_used)]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailledger_addr::{
    Address, EmailAddress, Error, ParseError, Parser, ParserConfig, parse_email_addr_spec,
    parse_email_address, parse_email_address_list, parse_email_group, parse_email_mailbox,
    parse_email_mailbox_list,
};

const BROTHERHOOD: &str = "Brotherhood: \"Winston Smith\" <winston.smith@recdep.minitrue> \
                           (Records Department), Julia <julia@ficdep.minitrue>;, \
                           user <user@oceania>";

/// Routes parser logs to the test output; `RUST_LOG` overrides the filter.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailledger_addr=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

#[test]
fn test_simple_mailbox() {
    init_tracing();
    let mailbox = parse_email_mailbox("\"Zip\" <zip@example.com>").unwrap();
    assert_eq!(mailbox.display_name(), "Zip");
    assert_eq!(mailbox.addr_spec().local_part(), "zip");
    assert_eq!(mailbox.addr_spec().domain(), "example.com");
    assert_eq!(mailbox.comment(), "");
}

#[test]
fn test_plain_address_list() {
    let list = parse_email_address_list("foo@example.com, bar@example.com").unwrap();
    assert_eq!(list.len(), 2);
    for address in &list {
        let mailbox = address.as_mailbox().unwrap();
        assert_eq!(mailbox.display_name(), "");
    }
    assert_eq!(list[0].address(), "foo@example.com");
    assert_eq!(list[1].address(), "bar@example.com");
}

#[test]
fn test_group_as_address() {
    let address = parse_email_address("Group: \"A\" <a@example.com>;").unwrap();
    let group = address.as_group().unwrap();
    assert_eq!(group.display_name(), "Group");
    assert_eq!(group.mailboxes().len(), 1);
    assert_eq!(group.mailboxes()[0].display_name(), "A");
}

#[test]
fn test_mailbox_with_trailing_text() {
    init_tracing();
    let err = parse_email_mailbox("\"CS\" <charles@example.com> and extra text").unwrap_err();
    assert_eq!(err.remainder(), Some("and extra text"));

    let (mailbox, remainder) = err.into_partial().unwrap();
    assert_eq!(mailbox.address(), "charles@example.com");
    assert_eq!(mailbox.to_string(), "CS <charles@example.com>");
    assert_eq!(remainder, "and extra text");
}

#[test]
fn test_comment_inside_addr_spec() {
    let mailbox = parse_email_mailbox("ender(weird comment placement)@example.com").unwrap();
    assert_eq!(mailbox.display_name(), "");
    assert_eq!(mailbox.addr_spec().local_part(), "ender");
    assert_eq!(mailbox.addr_spec().domain(), "example.com");
    assert_eq!(mailbox.comment(), "weird comment placement");
    assert_eq!(
        mailbox.clean_string(),
        "ender@example.com (weird comment placement)"
    );
}

#[test]
fn test_mailbox_list_with_comment_slot() {
    let list =
        parse_email_mailbox_list("\"who\" <ok@example.com>, (obsolete, no address)").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].display_name(), "who");
    assert_eq!(list[0].address(), "ok@example.com");
    assert_eq!(list[0].original_string(), "\"who\" <ok@example.com>");
}

#[test]
fn test_group_followed_by_mailbox() {
    let list = parse_email_address_list(BROTHERHOOD).unwrap();
    assert_eq!(list.len(), 2);

    let Address::Group(group) = &list[0] else {
        panic!("expected a group, got {:?}", list[0]);
    };
    assert_eq!(group.display_name(), "Brotherhood");

    let members = group.mailboxes();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].display_name(), "Winston Smith");
    assert_eq!(members[0].addr_spec().local_part(), "winston.smith");
    assert_eq!(members[0].addr_spec().domain(), "recdep.minitrue");
    assert_eq!(members[0].comment(), "Records Department");
    assert_eq!(members[1].display_name(), "Julia");
    assert_eq!(members[1].addr_spec().domain(), "ficdep.minitrue");
    assert_eq!(members[1].comment(), "");

    let Address::Mailbox(user) = &list[1] else {
        panic!("expected a mailbox, got {:?}", list[1]);
    };
    assert_eq!(user.display_name(), "user");
    assert_eq!(user.addr_spec().local_part(), "user");
    assert_eq!(user.addr_spec().domain(), "oceania");
}

#[test]
fn test_flatten_expands_groups() {
    let list = parse_email_address_list(BROTHERHOOD).unwrap();
    let flat = list.flatten();
    let addresses: Vec<String> = flat.iter().map(|mailbox| mailbox.address()).collect();
    assert_eq!(
        addresses,
        [
            "winston.smith@recdep.minitrue",
            "julia@ficdep.minitrue",
            "user@oceania"
        ]
    );
    assert_eq!(list.groups().count(), 1);
    assert_eq!(list.mailboxes().count(), 1);
}

#[test]
fn test_flatten_single_mailbox() {
    let list = parse_email_address_list("Some Email <email@example.com>").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].address(), "email@example.com");

    let flat = list.flatten();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].address(), "email@example.com");
}

#[test]
fn test_obsolete_route() {
    let address = parse_email_address(
        "\"display name\" <@obs1.example.com,@obs2.example.com,@obs3.example.com:cur@example.com>",
    )
    .unwrap();
    assert_eq!(address.display_name(), "display name");
    assert_eq!(address.address(), "cur@example.com");
}

#[test]
fn test_mailbox_round_trip() {
    let input = "\"Orson Scott Card\" <ender(weird comment placement)@example.com>";
    let mailbox = parse_email_mailbox(input).unwrap();
    assert_eq!(
        mailbox.to_string(),
        "\"Orson Scott Card\" <ender@example.com> (weird comment placement)"
    );
    assert_eq!(mailbox.original_string(), input);
}

#[test]
fn test_mailbox_list_drops_empty_slots() {
    let input = ", (weird stuff), \"J.R.R. Tolkein\" <j.r.r.tolkein@example.com>, \
                 \"C.S. Lewis\" <jack@example.com>, (wacky)";
    let list = parse_email_mailbox_list(input).unwrap();
    let expected =
        "\"J.R.R. Tolkein\" <j.r.r.tolkein@example.com>, \"C.S. Lewis\" <jack@example.com>";
    assert_eq!(list.to_string(), expected);
    assert_eq!(list.original_string(), expected);
}

#[test]
fn test_names_and_addresses() {
    let list = parse_email_address_list(
        "\"J.R.R. Tolkein\" <j.r.r.tolkein@example.com>, \"C.S. Lewis\" <jack@example.com>",
    )
    .unwrap();
    let pairs: Vec<(&str, String)> = list
        .iter()
        .map(|address| (EmailAddress::display_name(address), EmailAddress::address(address)))
        .collect();
    assert_eq!(
        pairs,
        [
            ("J.R.R. Tolkein", "j.r.r.tolkein@example.com".to_string()),
            ("C.S. Lewis", "jack@example.com".to_string()),
        ]
    );
}

#[test]
fn test_parse_group_entry_point() {
    let group = parse_email_group("Undisclosed recipients:;").unwrap();
    assert_eq!(group.display_name(), "Undisclosed recipients");
    assert!(group.mailboxes().is_empty());
    assert_eq!(group.to_string(), "\"Undisclosed recipients\": ;");

    assert!(parse_email_group("plain@example.com").is_err());
}

#[test]
fn test_parse_addr_spec_entry_point() {
    let spec = parse_email_addr_spec("\"john smith\"@example.com").unwrap();
    assert_eq!(spec.local_part(), "john smith");
    assert_eq!(spec.to_string(), "\"john smith\"@example.com");

    let spec = parse_email_addr_spec("postmaster@[192.0.2.1]").unwrap();
    assert_eq!(spec.domain(), "[192.0.2.1]");
}

#[test]
fn test_failure_and_conversion() {
    init_tracing();
    let err = parse_email_address("not an address").unwrap_err();
    assert!(!err.is_partial());

    let err: Error = parse_email_addr_spec("@example.com").unwrap_err().into();
    assert!(matches!(err, Error::ParseFailure { .. }));
}

#[test]
fn test_mime_encoded_display_name() {
    init_tracing();
    let mailbox =
        parse_email_mailbox("=?iso-8859-1?Q?Andr=E9?= Pirard <pirard@example.com>").unwrap();
    assert_eq!(mailbox.display_name(), "André Pirard");
}

#[test]
fn test_configured_limits() {
    init_tracing();
    let parser = Parser::new(
        ParserConfig::builder()
            .max_input_length(32)
            .max_comment_depth(1)
            .build(),
    );

    let err = parser
        .parse_address_list("a@example.com, b@example.com, c@example.com")
        .unwrap_err();
    assert!(matches!(err, ParseError::Failed(Error::InputTooLong { max: 32, .. })));

    let err = parser.parse_mailbox("a@example.com ((x))").unwrap_err();
    assert!(matches!(err, ParseError::Failed(Error::NestingTooDeep { depth: 2, max: 1 })));

    assert!(parser.parse_mailbox("a@example.com (x)").is_ok());
}

#[test]
fn test_nested_comments_after_domain_literal() {
    init_tracing();
    let input = format!("a@[\"] {}{}", "(".repeat(20_000), ")".repeat(20_000));
    let err = parse_email_mailbox(&input).unwrap_err();
    assert!(matches!(err, ParseError::Failed(Error::NestingTooDeep { depth: 20_000, max: 32 })));

    let spec = parse_email_addr_spec("a@[\"] ((x))").unwrap();
    assert_eq!(spec.domain(), "[\"]");
}

#[test]
fn test_mutation_clears_original() {
    let mut mailbox = parse_email_mailbox("Zip <zip(home)@example.com>").unwrap();
    assert_eq!(mailbox.original_string(), "Zip <zip(home)@example.com>");

    mailbox.set_display_name("Zip Zap");
    assert_eq!(
        mailbox.original_string(),
        "\"Zip Zap\" <zip@example.com> (home)"
    );
}

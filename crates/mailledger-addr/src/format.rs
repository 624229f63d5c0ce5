//! Helpers for rendering canonical address text.

use crate::encoding::is_encoded_word;
use crate::grammar;

/// Returns true if `c` may appear in an atom without quoting.
#[must_use]
pub fn is_atext(c: char) -> bool {
    u8::try_from(c).is_ok_and(grammar::is_atext)
}

/// Returns true if `c` must be backslash-escaped inside a quoted string.
#[must_use]
pub const fn char_needs_escape(c: char) -> bool {
    matches!(c, '"' | '\\' | '\0' | '\t' | '\n' | '\r')
}

/// Returns true if `s` appears to contain an RFC 2047 encoded word.
#[must_use]
pub fn has_mime_word(s: &str) -> bool {
    s.contains("=?")
}

/// Quotes `s` if it cannot be written as a bare atom or dot-atom.
///
/// Periods are allowed unquoted unless `quote_dot` is set; a leading or
/// trailing period, or two in a row, always force quoting. Backslash pairs
/// already present in `s` are copied as they are, a lone trailing backslash
/// is escaped, and any other character that cannot appear bare in a quoted
/// string gets a backslash.
///
/// ```
/// use mailledger_addr::format::maybe_escape;
///
/// assert_eq!(maybe_escape("john.smith", false), "john.smith");
/// assert_eq!(maybe_escape("john smith", false), "\"john smith\"");
/// assert_eq!(maybe_escape("john.", false), "\"john.\"");
/// assert_eq!(maybe_escape("say \"hi\"", false), "\"say \\\"hi\\\"\"");
/// ```
#[must_use]
pub fn maybe_escape(s: &str, quote_dot: bool) -> String {
    if s.is_empty() {
        return String::new();
    }

    let quote_dot = quote_dot || s.starts_with('.') || s.ends_with('.') || s.contains("..");

    let mut quote = false;
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');

    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            quote = true;
            quoted.push('\\');
            quoted.push(chars.next().unwrap_or('\\'));
            continue;
        }

        if !is_atext(c) && (quote_dot || c != '.') {
            quote = true;
        }

        if char_needs_escape(c) {
            quote = true;
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');

    if quote { quoted } else { s.to_string() }
}

/// Renders a display name so that it parses back to the same phrase.
///
/// A name made of encoded words and atoms separated by single spaces is
/// written bare so the encoded words stay decodable. Anything else goes
/// through [`maybe_escape`].
///
/// ```
/// use mailledger_addr::format::escape_display_name;
///
/// assert_eq!(escape_display_name("=?utf-8?Q?Caf=C3=A9?= Bar"), "=?utf-8?Q?Caf=C3=A9?= Bar");
/// assert_eq!(escape_display_name("=?x <y"), "\"=?x <y\"");
/// ```
#[must_use]
pub fn escape_display_name(name: &str) -> String {
    if is_encoded_phrase(name) {
        name.to_string()
    } else {
        maybe_escape(name, false)
    }
}

fn is_encoded_phrase(name: &str) -> bool {
    let mut encoded = false;
    for word in name.split(' ') {
        if word.is_empty() || !word.chars().all(is_atext) {
            return false;
        }
        encoded |= is_encoded_word(word);
    }
    encoded
}

/// Returns true if every parenthesis in `comment` is balanced.
///
/// Backslash-escaped parentheses are ignored.
#[must_use]
pub fn check_comment(comment: &str) -> bool {
    let mut depth: usize = 0;
    let mut escaping = false;

    for c in comment.chars() {
        if escaping {
            escaping = false;
            continue;
        }

        match c {
            '\\' => escaping = true,
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }

    depth == 0
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
    fn test_is_atext() {
        assert!(is_atext('a'));
        assert!(is_atext('~'));
        assert!(!is_atext('.'));
        assert!(!is_atext(' '));
        assert!(!is_atext('\u{e9}'));
    }

    #[test]
    fn test_has_mime_word() {
        assert!(has_mime_word("=?utf-8?Q?caf=C3=A9?="));
        assert!(!has_mime_word("plain = text ?"));
    }

    #[test]
    fn test_escape_display_name() {
        assert_eq!(escape_display_name("=?utf-8?B?w6k=?="), "=?utf-8?B?w6k=?=");
        assert_eq!(escape_display_name("Zip =?utf-8?B?w6k=?="), "Zip =?utf-8?B?w6k=?=");
        assert_eq!(escape_display_name("=?x <y"), "\"=?x <y\"");
        assert_eq!(escape_display_name("=?utf-8?B?w6k=?=, x"), "\"=?utf-8?B?w6k=?=, x\"");
        assert_eq!(escape_display_name("=?utf-8?B?w6k=?=  x"), "\"=?utf-8?B?w6k=?=  x\"");
        assert_eq!(escape_display_name("Peyton Randalf"), "\"Peyton Randalf\"");
        assert_eq!(escape_display_name(""), "");
    }

    #[test]
    fn test_maybe_escape_atoms() {
        assert_eq!(maybe_escape("", false), "");
        assert_eq!(maybe_escape("abc", false), "abc");
        assert_eq!(maybe_escape("a.b.c", false), "a.b.c");
        assert_eq!(maybe_escape("a.b", true), "\"a.b\"");
    }

    #[test]
    fn test_maybe_escape_dots() {
        assert_eq!(maybe_escape(".abc", false), "\".abc\"");
        assert_eq!(maybe_escape("abc.", false), "\"abc.\"");
        assert_eq!(maybe_escape("a..b", false), "\"a..b\"");
    }

    #[test]
    fn test_maybe_escape_specials() {
        assert_eq!(maybe_escape("Peyton Randalf", false), "\"Peyton Randalf\"");
        assert_eq!(maybe_escape("a\tb", false), "\"a\\\tb\"");
        assert_eq!(maybe_escape("caf\u{e9}", false), "\"caf\u{e9}\"");
    }

    #[test]
    fn test_maybe_escape_keeps_backslash_pairs() {
        assert_eq!(maybe_escape("a\\\"b", false), "\"a\\\"b\"");
        assert_eq!(maybe_escape("a\\\\b", false), "\"a\\\\b\"");
        assert_eq!(maybe_escape("trailing\\", false), "\"trailing\\\\\"");
    }

    #[test]
    fn test_check_comment() {
        assert!(check_comment(""));
        assert!(check_comment("plain"));
        assert!(check_comment("outer (inner) outer"));
        assert!(check_comment("escaped \\("));
        assert!(!check_comment("open ("));
        assert!(!check_comment(") backwards ("));
    }
}

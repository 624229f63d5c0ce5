//! MIME encoded-word decoding (RFC 2047).
//!
//! Display names and comments may carry encoded words of the form
//! `=?charset?encoding?encoded-text?=`. The parser hands such text to a
//! [`WordDecoder`]; the default is [`Rfc2047Decoder`].

use std::fmt::Debug;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use charset::Charset;

use crate::error::{Error, Result};

/// Decodes MIME encoded words found in display names and comments.
///
/// Implementations must be shareable across threads since a
/// [`Parser`](crate::Parser) may be used from several at once.
pub trait WordDecoder: Send + Sync + Debug {
    /// Decodes every encoded word in `text`, leaving the rest as is.
    ///
    /// # Errors
    ///
    /// Returns an error if an encoded word cannot be decoded. The parser
    /// then keeps the undecoded text.
    fn decode(&self, text: &str) -> Result<String>;
}

/// RFC 2047 decoder supporting the `B` and `Q` encodings.
///
/// Charsets are resolved by label through the WHATWG encoding registry.
/// Whitespace separating two adjacent encoded words is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc2047Decoder;

impl WordDecoder for Rfc2047Decoder {
    fn decode(&self, text: &str) -> Result<String> {
        decode_rfc2047(text)
    }
}

/// Decodes RFC 2047 encoded words in a header value.
///
/// Text that merely looks like the start of an encoded word is copied
/// through unchanged.
///
/// # Errors
///
/// Returns an error for an unknown encoding or charset, or for malformed
/// encoded text.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);

        let Some((word, consumed)) = EncodedWord::split(candidate) else {
            result.push_str(before);
            result.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
            continue;
        };

        if !(after_word && before.chars().all(char::is_whitespace)) {
            result.push_str(before);
        }
        result.push_str(&word.decode()?);
        rest = &candidate[consumed..];
        after_word = true;
    }

    result.push_str(rest);
    Ok(result)
}

/// The pieces of one `=?charset?encoding?text?=` word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: &'a str,
    text: &'a str,
}

impl<'a> EncodedWord<'a> {
    /// Splits an encoded word off the front of `s`.
    ///
    /// Returns the word and the number of bytes it spans.
    fn split(s: &'a str) -> Option<(Self, usize)> {
        let inner = s.strip_prefix("=?")?;
        let (charset, inner) = inner.split_once('?')?;
        let (encoding, inner) = inner.split_once('?')?;
        let end = inner.find("?=")?;
        let text = &inner[..end];

        if charset.is_empty()
            || charset.contains(char::is_whitespace)
            || encoding.len() != 1
            || text.contains(char::is_whitespace)
        {
            return None;
        }

        let consumed = "=?".len() + charset.len() + 1 + encoding.len() + 1 + end + "?=".len();
        Some((
            Self {
                charset,
                encoding,
                text,
            },
            consumed,
        ))
    }

    fn decode(&self) -> Result<String> {
        let bytes = match self.encoding {
            "B" | "b" => decode_base64(self.text)?,
            "Q" | "q" => decode_q(self.text)?,
            other => return Err(Error::InvalidEncoding(format!("Unknown encoding: {other}"))),
        };

        // RFC 2231 allows a language suffix: charset*language
        let label = self.charset.split('*').next().unwrap_or(self.charset);
        let charset = Charset::for_label_no_replacement(label.as_bytes())
            .ok_or_else(|| Error::InvalidEncoding(format!("Unsupported charset: {label}")))?;

        let (decoded, _malformed) = charset.decode_without_bom_handling(&bytes);
        Ok(decoded.into_owned())
    }
}

/// Returns true if `s` is exactly one well-formed encoded word.
pub(crate) fn is_encoded_word(s: &str) -> bool {
    EncodedWord::split(s).is_some_and(|(_, consumed)| consumed == s.len())
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes the RFC 2047 `Q` encoding: quoted-printable with `_` for space.
fn decode_q(text: &str) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(text.len());
    let mut bytes = text.bytes();

    while let Some(byte) = bytes.next() {
        match byte {
            b'_' => result.push(b' '),
            b'=' => {
                let hex = [bytes.next(), bytes.next()];
                let [Some(hi), Some(lo)] = hex else {
                    return Err(Error::InvalidEncoding(
                        "Incomplete escape sequence".to_string(),
                    ));
                };
                let digits = [hi, lo];
                let hex = std::str::from_utf8(&digits)
                    .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
                let byte = u8::from_str_radix(hex, 16)
                    .map_err(|e| Error::InvalidEncoding(format!("Invalid hex: {e}")))?;
                result.push(byte);
            }
            _ => result.push(byte),
        }
    }

    Ok(result)
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
    fn test_base64_decode() {
        assert_eq!(decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap(), b"Hello, World!");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn test_q_decode() {
        assert_eq!(decode_q("H=C3=A9llo_World").unwrap(), "H\u{e9}llo World".as_bytes());
        assert!(decode_q("bad=4").is_err());
        assert!(decode_q("bad=ZZ").is_err());
    }

    #[test]
    fn test_is_encoded_word() {
        assert!(is_encoded_word("=?utf-8?Q?Caf=C3=A9?="));
        assert!(!is_encoded_word("=?utf-8?Q?Caf=C3=A9?= tail"));
        assert!(!is_encoded_word("=?x <y"));
    }

    #[test]
    fn test_rfc2047_plain_text() {
        assert_eq!(decode_rfc2047("Hello").unwrap(), "Hello");
        assert_eq!(decode_rfc2047("a =? b").unwrap(), "a =? b");
    }

    #[test]
    fn test_rfc2047_base64() {
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?=").unwrap(), "H\u{e9}llo");
    }

    #[test]
    fn test_rfc2047_quoted_printable() {
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo?=").unwrap(), "H\u{e9}llo");
    }

    #[test]
    fn test_rfc2047_latin1() {
        assert_eq!(decode_rfc2047("=?ISO-8859-1?Q?Andr=E9?= Pirard").unwrap(), "Andr\u{e9} Pirard");
    }

    #[test]
    fn test_rfc2047_adjacent_words_join() {
        let decoded = decode_rfc2047("=?utf-8?Q?a?= =?utf-8?Q?b?=").unwrap();
        assert_eq!(decoded, "ab");

        let decoded = decode_rfc2047("=?utf-8?Q?a?= and =?utf-8?Q?b?=").unwrap();
        assert_eq!(decoded, "a and b");
    }

    #[test]
    fn test_rfc2047_language_suffix() {
        assert_eq!(decode_rfc2047("=?utf-8*en?Q?hi?=").unwrap(), "hi");
    }

    #[test]
    fn test_rfc2047_errors() {
        assert!(decode_rfc2047("=?utf-8?X?abc?=").is_err());
        assert!(decode_rfc2047("=?no-such-charset?Q?abc?=").is_err());
    }

    #[test]
    fn test_decoder_trait() {
        let decoder = Rfc2047Decoder;
        assert_eq!(decoder.decode("=?utf-8?Q?Caf=C3=A9?=").unwrap(), "Caf\u{e9}");
    }
}

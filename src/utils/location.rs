//! Redirect target encoding
//!
//! Stored URLs are kept byte-for-byte as submitted. Before one goes into a
//! `Location` header, anything that is not legal in a URL (control
//! characters, spaces, non-ASCII) is percent-encoded. Reserved characters
//! and existing `%XX` escapes pass through untouched.

use std::borrow::Cow;

/// 除 unreserved 之外，URL 中可以原样出现的字符
const PASSTHROUGH: &[u8] = b"!#$&'()*+,/:;=?@[]-._~";

fn passes_through(c: char) -> bool {
    c.is_ascii_alphanumeric() || (c.is_ascii() && PASSTHROUGH.contains(&(c as u8)))
}

fn is_escape(rest: &[u8]) -> bool {
    rest.len() >= 2 && rest[0].is_ascii_hexdigit() && rest[1].is_ascii_hexdigit()
}

/// Percent-encode `raw` so it is always a valid header value.
///
/// Returns the input unchanged (no allocation) when nothing needs encoding.
pub fn encode_location(raw: &str) -> Cow<'_, str> {
    let needs_encoding = raw
        .char_indices()
        .any(|(i, c)| !(passes_through(c) || (c == '%' && is_escape(&raw.as_bytes()[i + 1..]))));
    if !needs_encoding {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 8);
    let mut buf = [0u8; 4];
    for (i, c) in raw.char_indices() {
        if passes_through(c) || (c == '%' && is_escape(&raw.as_bytes()[i + 1..])) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    Cow::Owned(out)
}

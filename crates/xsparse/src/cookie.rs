//! Cookie header decoding.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

/// Decode a `cookie` header value into a name → value map.
///
/// Pairs are separated by `;` and split at the first `=`. Names and values are
/// trimmed, a double-quoted value loses its quotes, and values are
/// percent-decoded (kept verbatim when the escape is not valid UTF-8).
/// The first occurrence of a name wins; pairs without `=` are ignored.
pub fn parse_cookie_header(header: &str) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();

    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || cookies.contains_key(name) {
            continue;
        }
        cookies.insert(name.to_string(), decode_value(value.trim()));
    }

    cookies
}

fn decode_value(raw: &str) -> String {
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);

    match percent_decode_str(unquoted).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => unquoted.to_string(),
    }
}

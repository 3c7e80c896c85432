//! URL-encoded form and query-string codec.

use url::form_urlencoded;

use crate::types::ParamMap;

/// Content type whose bodies are decoded into form fields.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Decode `application/x-www-form-urlencoded` text into an ordered map.
///
/// `+` decodes to a space, percent escapes are decoded lossily, a key without
/// `=` maps to the empty string, and repeated keys collect into a list.
pub fn decode(input: &str) -> ParamMap {
    form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}

/// Encode a map back into query-string form, one pair per value.
pub fn encode(params: &ParamMap) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.pairs() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

impl ParamMap {
    /// Re-encode as a query string, preserving key order and multiplicity.
    pub fn to_query_string(&self) -> String {
        encode(self)
    }
}

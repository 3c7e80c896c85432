//! Core data types for parsed requests, markup attributes, and parse errors.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A structured view of a raw HTTP/1.x request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRequest {
    pub method: String,
    pub path: String,
    pub query: ParamMap,
    /// Raw text after the first `?` of the request target, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
    pub protocol: String,
    pub headers: BTreeMap<String, String>,
    /// Present only when the request carries a `cookie` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<BTreeMap<String, String>>,
    pub body: String,
    /// Present only for `application/x-www-form-urlencoded` bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_fields: Option<ParamMap>,
}

impl ParsedRequest {
    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Rebuild the request target from `path` and the raw query string.
    pub fn target(&self) -> String {
        match &self.query_string {
            Some(qs) => format!("{}?{qs}", self.path),
            None => self.path.clone(),
        }
    }

    /// Flat list of request parameters: query parameters first, then form fields.
    ///
    /// Repeated keys contribute one tuple per value, in the order they appeared.
    pub fn parameters(&self) -> Vec<(&str, &str)> {
        let mut params: Vec<(&str, &str)> = self.query.pairs().collect();
        if let Some(form) = &self.form_fields {
            params.extend(form.pairs());
        }
        params
    }
}

/// A decoded parameter value: a single string, or a list for repeated keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Multiple(Vec<String>),
}

impl ParamValue {
    /// The first (or only) value.
    pub fn first(&self) -> &str {
        match self {
            ParamValue::Single(v) => v,
            ParamValue::Multiple(vs) => vs.first().map(String::as_str).unwrap_or_default(),
        }
    }

    /// All values in order of appearance.
    pub fn values(&self) -> Vec<&str> {
        match self {
            ParamValue::Single(v) => vec![v.as_str()],
            ParamValue::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            ParamValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = ParamValue::Multiple(vec![first, value]);
            }
            ParamValue::Multiple(vs) => vs.push(value),
        }
    }
}

/// Insertion-ordered mapping of parameter names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParamMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; a repeated key turns its entry into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.push(value),
            None => self.entries.push((key, ParamValue::Single(value))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// First value for `key`, if present.
    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.get(key).map(ParamValue::first)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Flattened `(key, value)` pairs, one per value.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, v)| v.values().into_iter().map(move |value| (k.as_str(), value)))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.append(k, v);
        }
        map
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Attributes of a start tag, in document order, reduced to scalar values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Errors raised while parsing request messages or driving the SAX façade.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Encoding {0} not supported")]
    UnsupportedEncoding(String),

    #[error("Unsupported input type: {0} (xml must be String, ArrayBuffer or WebBody)")]
    UnsupportedInputType(String),

    #[error("Expected \"{handler}\" to be a function with {arity} arguments")]
    InvalidHandler { handler: String, arity: usize },

    #[error("{0} not supported")]
    NotSupported(String),

    #[error("SAXParser.parse already started")]
    AlreadyStarted,

    #[error("Unknown parser member: {0}")]
    UnknownMember(String),

    #[error("XML error: {message}")]
    Xml { message: String },
}

/// Convenience result type.
pub type ParseResult<T> = Result<T, ParseError>;

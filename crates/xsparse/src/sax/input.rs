//! Markup input normalization and text-encoding resolution.

use std::borrow::Cow;

use crate::types::{ParseError, ParseResult};

/// Raw or textual content held by a request/response body abstraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyContent {
    Text(String),
    Bytes(Vec<u8>),
}

/// A request/response payload that can hand out its content regardless of
/// how it is stored.
pub trait WebBody {
    fn retrieve_content(&self) -> BodyContent;
}

/// Values accepted by [`SaxParser::parse`](super::SaxParser::parse).
pub enum XmlInput<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    WebBody(&'a dyn WebBody),
    /// A value of some other type handed over by a dynamic caller.
    Other(&'a str),
}

impl<'a> From<&'a str> for XmlInput<'a> {
    fn from(s: &'a str) -> Self {
        XmlInput::Text(s)
    }
}

impl<'a> From<&'a String> for XmlInput<'a> {
    fn from(s: &'a String) -> Self {
        XmlInput::Text(s)
    }
}

impl<'a> From<&'a [u8]> for XmlInput<'a> {
    fn from(b: &'a [u8]) -> Self {
        XmlInput::Bytes(b)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for XmlInput<'a> {
    fn from(b: &'a [u8; N]) -> Self {
        XmlInput::Bytes(b)
    }
}

impl<'a> From<&'a Vec<u8>> for XmlInput<'a> {
    fn from(b: &'a Vec<u8>) -> Self {
        XmlInput::Bytes(b)
    }
}

impl<'a> XmlInput<'a> {
    pub fn web_body(body: &'a dyn WebBody) -> Self {
        XmlInput::WebBody(body)
    }
}

/// Named buffer encodings accepted for byte input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferEncoding {
    Utf8,
    Ascii,
    Latin1,
    Utf16Le,
}

impl BufferEncoding {
    /// Encoding used when the caller does not name one.
    pub const DEFAULT: BufferEncoding = BufferEncoding::Utf8;

    /// Recognised names, case-insensitive.
    pub const NAMES: &'static [&'static str] = &[
        "utf8", "utf-8", "ascii", "latin1", "binary", "ucs2", "ucs-2", "utf16le", "utf-16le",
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(BufferEncoding::Utf8),
            "ascii" => Some(BufferEncoding::Ascii),
            "latin1" | "binary" => Some(BufferEncoding::Latin1),
            "ucs2" | "ucs-2" | "utf16le" | "utf-16le" => Some(BufferEncoding::Utf16Le),
            _ => None,
        }
    }

    /// Resolve an optional encoding name, defaulting to UTF-8.
    pub fn resolve(name: Option<&str>) -> ParseResult<Self> {
        match name {
            None | Some("") => Ok(Self::DEFAULT),
            Some(name) => {
                Self::from_name(name).ok_or_else(|| ParseError::UnsupportedEncoding(name.to_string()))
            }
        }
    }

    /// Decode bytes; malformed sequences become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            BufferEncoding::Utf8 => encoding_rs::UTF_8
                .decode_without_bom_handling(bytes)
                .0
                .into_owned(),
            BufferEncoding::Utf16Le => encoding_rs::UTF_16LE
                .decode_without_bom_handling(bytes)
                .0
                .into_owned(),
            BufferEncoding::Ascii => bytes.iter().map(|b| (b & 0x7f) as char).collect(),
            BufferEncoding::Latin1 => bytes.iter().map(|b| *b as char).collect(),
        }
    }
}

/// Turn any accepted input into document text.
///
/// Text passes through untouched; only byte content consults `encoding`.
pub fn resolve_text<'a>(input: XmlInput<'a>, encoding: Option<&str>) -> ParseResult<Cow<'a, str>> {
    let bytes: Cow<'a, [u8]> = match input {
        XmlInput::Text(s) => return Ok(Cow::Borrowed(s)),
        XmlInput::Bytes(b) => Cow::Borrowed(b),
        XmlInput::WebBody(body) => match body.retrieve_content() {
            BodyContent::Text(s) => return Ok(Cow::Owned(s)),
            BodyContent::Bytes(b) => Cow::Owned(b),
        },
        XmlInput::Other(type_name) => {
            return Err(ParseError::UnsupportedInputType(type_name.to_string()))
        }
    };

    let encoding = BufferEncoding::resolve(encoding)?;
    tracing::trace!(?encoding, len = bytes.len(), "Decoding markup bytes");
    Ok(Cow::Owned(encoding.decode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StoredBody(BodyContent);

    impl WebBody for StoredBody {
        fn retrieve_content(&self) -> BodyContent {
            self.0.clone()
        }
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!(BufferEncoding::from_name("UTF-8"), Some(BufferEncoding::Utf8));
        assert_eq!(BufferEncoding::from_name("binary"), Some(BufferEncoding::Latin1));
        assert_eq!(BufferEncoding::from_name("ucs2"), Some(BufferEncoding::Utf16Le));
        assert_eq!(BufferEncoding::from_name("ebcdic"), None);
        for name in BufferEncoding::NAMES {
            assert!(BufferEncoding::from_name(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_resolve_defaults_to_utf8() {
        assert_eq!(BufferEncoding::resolve(None).unwrap(), BufferEncoding::Utf8);
        assert_eq!(
            BufferEncoding::resolve(Some("shift-jis")).unwrap_err(),
            ParseError::UnsupportedEncoding("shift-jis".into())
        );
    }

    #[test]
    fn test_decode_variants() {
        assert_eq!(BufferEncoding::Utf8.decode("<ä/>".as_bytes()), "<ä/>");
        assert_eq!(BufferEncoding::Latin1.decode(&[0x3c, 0xe4, 0x3e]), "<ä>");
        assert_eq!(BufferEncoding::Ascii.decode(&[0x41, 0xc1]), "AA");
        assert_eq!(BufferEncoding::Utf16Le.decode(&[0x3c, 0x00, 0x61, 0x00]), "<a");
    }

    #[test]
    fn test_text_ignores_encoding() {
        let text = resolve_text(XmlInput::Text("<a/>"), Some("nonsense")).unwrap();
        assert_eq!(text, "<a/>");
    }

    #[test]
    fn test_bytes_validate_encoding() {
        let err = resolve_text(XmlInput::Bytes(b"<a/>"), Some("nonsense")).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedEncoding("nonsense".into()));
    }

    #[test]
    fn test_web_body_content() {
        let text_body = StoredBody(BodyContent::Text("<t/>".into()));
        assert_eq!(resolve_text(XmlInput::web_body(&text_body), None).unwrap(), "<t/>");

        let latin = StoredBody(BodyContent::Bytes(vec![0x3c, 0xe9, 0x2f, 0x3e]));
        assert_eq!(
            resolve_text(XmlInput::web_body(&latin), Some("latin1")).unwrap(),
            "<é/>"
        );
    }

    #[test]
    fn test_other_input_rejected() {
        let err = resolve_text(XmlInput::Other("number"), None).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedInputType("number".into()));
    }
}

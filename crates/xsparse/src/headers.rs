//! Header-section parsing.

use std::collections::BTreeMap;

use crate::request::CRLF;

/// Turns the header section of a request (the text between the request line
/// and the blank line) into a map keyed by lower-cased header name.
///
/// Implementations must not look past the section they are given.
pub trait HeaderSectionParser {
    fn parse(&self, section: &str) -> BTreeMap<String, String>;
}

/// Line-oriented `name: value` parser.
///
/// Repeated headers are joined with `", "`, except `cookie`, which is joined
/// with `"; "` so the cookie decoder sees one list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHeaderParser;

impl HeaderSectionParser for DefaultHeaderParser {
    fn parse(&self, section: &str) -> BTreeMap<String, String> {
        let mut headers: BTreeMap<String, String> = BTreeMap::new();

        for line in section.split(CRLF) {
            if line.is_empty() {
                continue;
            }
            let Some((name, value)) = line.split_once(':') else {
                tracing::warn!(line, "Skipping header line without ':'");
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            if name.is_empty() {
                tracing::warn!(line, "Skipping header line with empty name");
                continue;
            }
            let value = value.trim();

            match headers.get_mut(&name) {
                Some(existing) => {
                    existing.push_str(if name == "cookie" { "; " } else { ", " });
                    existing.push_str(value);
                }
                None => {
                    headers.insert(name, value.to_string());
                }
            }
        }

        headers
    }
}

impl<F> HeaderSectionParser for F
where
    F: Fn(&str) -> BTreeMap<String, String>,
{
    fn parse(&self, section: &str) -> BTreeMap<String, String> {
        self(section)
    }
}

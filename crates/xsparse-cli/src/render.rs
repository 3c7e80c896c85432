//! Event capture and JSON rendering for the CLI.

use std::cell::RefCell;

use serde::Serialize;
use serde_json::{json, Value};

use xsparse::sax::{UNSUPPORTED_HANDLERS, UNSUPPORTED_PROPERTIES};
use xsparse::{Attributes, BufferEncoding, HandlerSlot, ParseResult, SaxParser, XmlInput};

/// One SAX callback, as emitted on a JSON line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SaxEvent {
    StartElement { name: String, attributes: Attributes },
    EndElement { name: String },
    CharacterData { text: String },
    Comment { text: String },
    StartCdata,
    EndCdata,
}

/// Parse a document with every handler registered and return the events.
pub fn collect_events(xml: XmlInput<'_>, encoding: Option<&str>) -> ParseResult<Vec<SaxEvent>> {
    let events = RefCell::new(Vec::new());
    {
        let mut parser = SaxParser::new();
        parser.on_start_element(|name, attributes| {
            events.borrow_mut().push(SaxEvent::StartElement {
                name: name.to_string(),
                attributes: attributes.clone(),
            })
        });
        parser.on_end_element(|name| {
            events.borrow_mut().push(SaxEvent::EndElement {
                name: name.to_string(),
            })
        });
        parser.on_character_data(|text| {
            events.borrow_mut().push(SaxEvent::CharacterData {
                text: text.to_string(),
            })
        });
        parser.on_comment(|text| {
            events.borrow_mut().push(SaxEvent::Comment {
                text: text.to_string(),
            })
        });
        parser.on_start_cdata(|| events.borrow_mut().push(SaxEvent::StartCdata));
        parser.on_end_cdata(|| events.borrow_mut().push(SaxEvent::EndCdata));
        parser.parse(xml, encoding)?;
    }
    Ok(events.into_inner())
}

/// Serialize events as newline-delimited JSON.
pub fn to_json_lines(events: &[SaxEvent]) -> serde_json::Result<String> {
    let mut out = String::new();
    for event in events {
        out.push_str(&serde_json::to_string(event)?);
        out.push('\n');
    }
    Ok(out)
}

/// Turn bare `\n` line endings into `\r\n`, leaving existing CRLF alone.
///
/// Hand-written request files usually lack carriage returns.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 16);
    let mut prev = '\0';
    for c in text.chars() {
        if c == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(c);
        prev = c;
    }
    out
}

/// Description of the supported SAX surface.
pub fn info() -> Value {
    let slots: Vec<Value> = HandlerSlot::ALL
        .iter()
        .map(|slot| json!({ "name": slot.name(), "arity": slot.arity() }))
        .collect();

    json!({
        "handlers": slots,
        "unsupported_handlers": UNSUPPORTED_HANDLERS,
        "unsupported_properties": UNSUPPORTED_PROPERTIES,
        "encodings": BufferEncoding::NAMES,
        "default_encoding": "utf8",
    })
}

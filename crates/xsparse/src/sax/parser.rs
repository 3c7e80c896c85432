//! Synchronous SAX-style driver over the quick-xml tokenizer.

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::handlers::{Handler, HandlerRegistry, HandlerSlot, Member};
use super::input::{resolve_text, XmlInput};
use crate::types::{Attributes, ParseError, ParseResult};

/// Event-driven XML parser with a fixed, validated set of handler slots.
///
/// Each instance parses one complete document. Call [`reset`](Self::reset)
/// to reuse it; that also drops every registered handler.
#[derive(Debug, Default)]
pub struct SaxParser<'h> {
    handlers: HandlerRegistry<'h>,
    started: bool,
}

impl<'h> SaxParser<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a handler by its script-facing name.
    pub fn set_handler(&mut self, name: &str, handler: Handler<'h>) -> ParseResult<()> {
        match Member::lookup(name) {
            Some(Member::Slot(slot)) => self.register(slot, handler),
            Some(Member::UnsupportedHandler(n)) | Some(Member::UnsupportedProperty(n)) => {
                Err(ParseError::NotSupported(n.to_string()))
            }
            None => Err(ParseError::UnknownMember(name.to_string())),
        }
    }

    /// Assign a handler to a slot, checking its arity.
    pub fn register(&mut self, slot: HandlerSlot, handler: Handler<'h>) -> ParseResult<()> {
        self.handlers.register(slot, handler)
    }

    /// Whether a handler is registered under `name`.
    ///
    /// Disabled handlers and properties fail here just as they do on write.
    pub fn get(&self, name: &str) -> ParseResult<bool> {
        match Member::lookup(name) {
            Some(Member::Slot(slot)) => Ok(self.handlers.is_registered(slot)),
            Some(Member::UnsupportedHandler(n)) | Some(Member::UnsupportedProperty(n)) => {
                Err(ParseError::NotSupported(n.to_string()))
            }
            None => Err(ParseError::UnknownMember(name.to_string())),
        }
    }

    /// Read a parser property. No property is supported.
    pub fn property(&self, name: &str) -> ParseResult<u64> {
        Err(property_error(name))
    }

    /// Write a parser property. No property is supported.
    pub fn set_property(&mut self, name: &str, _value: u64) -> ParseResult<()> {
        Err(property_error(name))
    }

    pub fn on_start_element(&mut self, f: impl FnMut(&str, &Attributes) + 'h) {
        self.install(HandlerSlot::StartElement, Handler::binary(f));
    }

    pub fn on_end_element(&mut self, f: impl FnMut(&str) + 'h) {
        self.install(HandlerSlot::EndElement, Handler::unary(f));
    }

    pub fn on_character_data(&mut self, f: impl FnMut(&str) + 'h) {
        self.install(HandlerSlot::CharacterData, Handler::unary(f));
    }

    pub fn on_comment(&mut self, f: impl FnMut(&str) + 'h) {
        self.install(HandlerSlot::Comment, Handler::unary(f));
    }

    pub fn on_start_cdata(&mut self, f: impl FnMut() + 'h) {
        self.install(HandlerSlot::StartCDataSection, Handler::nullary(f));
    }

    pub fn on_end_cdata(&mut self, f: impl FnMut() + 'h) {
        self.install(HandlerSlot::EndCDataSection, Handler::nullary(f));
    }

    /// Parse a complete document, invoking handlers in document order.
    ///
    /// `encoding` is only consulted when the input has to be decoded from
    /// bytes. Fails with [`ParseError::AlreadyStarted`] on a second call
    /// without an intervening [`reset`](Self::reset).
    pub fn parse<'i>(
        &mut self,
        xml: impl Into<XmlInput<'i>>,
        encoding: Option<&str>,
    ) -> ParseResult<()> {
        if self.started {
            return Err(ParseError::AlreadyStarted);
        }
        self.started = true;

        let text = resolve_text(xml.into(), encoding)?;
        let document = text.strip_prefix('\u{feff}').unwrap_or(&text);
        tracing::debug!(len = document.len(), "SAX parse started");
        self.drive(document)?;
        tracing::debug!("SAX parse finished");
        Ok(())
    }

    /// Discard the tokenizer state and all handlers so the parser can be reused.
    pub fn reset(&mut self) {
        self.handlers.clear();
        self.started = false;
    }

    pub fn resume(&mut self) -> ParseResult<()> {
        Err(ParseError::NotSupported("resume".to_string()))
    }

    pub fn stop(&mut self, _resumable: bool) -> ParseResult<()> {
        Err(ParseError::NotSupported("stop".to_string()))
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    fn install(&mut self, slot: HandlerSlot, handler: Handler<'h>) {
        self.handlers.install(slot, handler);
    }

    fn drive(&mut self, xml: &str) -> ParseResult<()> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(false);
        reader.config_mut().expand_empty_elements = true;

        let mut depth: usize = 0;

        loop {
            let (ns, event) = match reader.read_resolved_event() {
                Ok(resolved) => resolved,
                Err(e) => {
                    return Err(xml_error(format!(
                        "{e} at position {}",
                        reader.error_position()
                    )))
                }
            };
            let unbound = unbound_prefix(ns);

            match event {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if let Some(prefix) = unbound {
                        return Err(xml_error(format!(
                            "Unbound namespace prefix: \"{prefix}\" on element {name}"
                        )));
                    }
                    let attributes = collect_attributes(&reader, &e)?;
                    depth += 1;
                    self.handlers.start_element(&name, &attributes);
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    depth = depth.saturating_sub(1);
                    self.handlers.end_element(&name);
                }
                Event::Text(e) => {
                    let text = e
                        .unescape_with(resolve_entity)
                        .map_err(|err| xml_error(format!("invalid character data: {err}")))?;
                    if depth == 0 {
                        if !text.trim().is_empty() {
                            return Err(xml_error("Text data outside of root node"));
                        }
                        continue;
                    }
                    self.handlers.character_data(&text);
                }
                Event::CData(e) => {
                    if depth == 0 {
                        return Err(xml_error("CDATA section outside of root node"));
                    }
                    // Section content has no handler slot.
                    self.handlers.start_cdata();
                    self.handlers.end_cdata();
                }
                Event::Comment(e) => {
                    self.handlers.comment(&String::from_utf8_lossy(&e));
                }
                Event::Eof => break,
                // Declarations, processing instructions and DOCTYPE have no
                // handler slot.
                _ => {}
            }
        }

        if depth > 0 {
            return Err(xml_error("Unclosed root tag"));
        }
        Ok(())
    }
}

/// Retained attributes of a start tag: namespace declarations are dropped,
/// everything else keeps its qualified name and unescaped value.
///
/// A prefix with no declaration in scope is an error.
fn collect_attributes(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> ParseResult<Attributes> {
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| xml_error(format!("invalid attribute: {e}")))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let (ns, _) = reader.resolve_attribute(attr.key);
        if let Some(prefix) = unbound_prefix(ns) {
            return Err(xml_error(format!(
                "Unbound namespace prefix: \"{prefix}\" on attribute {name}"
            )));
        }
        let value = attr
            .unescape_value_with(resolve_entity)
            .map_err(|e| xml_error(format!("invalid value for attribute {name}: {e}")))?;
        attributes.insert(name, value.into_owned());
    }
    Ok(attributes)
}

/// The undeclared prefix of a resolved name, if any. `xml` is always bound.
fn unbound_prefix(ns: ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Unknown(prefix) if prefix != b"xml" => {
            Some(String::from_utf8_lossy(&prefix).into_owned())
        }
        _ => None,
    }
}

/// Predefined XML entities, then the HTML5 named entities.
fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or_else(|| resolve_html5_entity(entity))
}

fn property_error(name: &str) -> ParseError {
    match Member::lookup(name) {
        Some(Member::UnsupportedProperty(n)) | Some(Member::UnsupportedHandler(n)) => {
            ParseError::NotSupported(n.to_string())
        }
        _ => ParseError::UnknownMember(name.to_string()),
    }
}

fn xml_error(message: impl Into<String>) -> ParseError {
    ParseError::Xml {
        message: message.into(),
    }
}

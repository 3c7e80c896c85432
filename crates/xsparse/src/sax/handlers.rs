//! Handler slots, the unsupported-member tables, and the handler registry.

use std::fmt;

use crate::types::{Attributes, ParseError, ParseResult};

/// Handler names that are recognised but permanently disabled.
pub const UNSUPPORTED_HANDLERS: &[&str] = &[
    "attlistDeclHandler",
    "endDoctypeDeclHandler",
    "endNameSpaceDeclHandler",
    "entityDeclHandler",
    "externalEntityRefHandler",
    "notationDeclHandler",
    "processingInstructionHandler",
    "startDoctypeDeclHandler",
    "startNameSpaceDeclHandler",
    "xmlDeclHandler",
];

/// Parser properties that fail on both read and write.
pub const UNSUPPORTED_PROPERTIES: &[&str] =
    &["currentByteIndex", "currentColumnNumber", "currentLineNumber"];

/// An event slot that accepts exactly one handler of a fixed arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerSlot {
    StartElement,
    EndElement,
    CharacterData,
    Comment,
    StartCDataSection,
    EndCDataSection,
}

impl HandlerSlot {
    pub const ALL: [HandlerSlot; 6] = [
        HandlerSlot::StartElement,
        HandlerSlot::EndElement,
        HandlerSlot::CharacterData,
        HandlerSlot::Comment,
        HandlerSlot::StartCDataSection,
        HandlerSlot::EndCDataSection,
    ];

    /// Script-facing property name of the slot.
    pub fn name(self) -> &'static str {
        match self {
            HandlerSlot::StartElement => "startElementHandler",
            HandlerSlot::EndElement => "endElementHandler",
            HandlerSlot::CharacterData => "characterDataHandler",
            HandlerSlot::Comment => "commentHandler",
            HandlerSlot::StartCDataSection => "startCDataSectionHandler",
            HandlerSlot::EndCDataSection => "endCDataSectionHandler",
        }
    }

    /// Number of parameters a handler for this slot must declare.
    pub fn arity(self) -> usize {
        match self {
            HandlerSlot::StartElement => 2,
            HandlerSlot::EndElement | HandlerSlot::CharacterData | HandlerSlot::Comment => 1,
            HandlerSlot::StartCDataSection | HandlerSlot::EndCDataSection => 0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HandlerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a member name refers to on the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Slot(HandlerSlot),
    UnsupportedHandler(&'static str),
    UnsupportedProperty(&'static str),
}

impl Member {
    /// Resolve a member name against the slot table and both blocklists.
    pub fn lookup(name: &str) -> Option<Member> {
        if let Some(slot) = HandlerSlot::from_name(name) {
            return Some(Member::Slot(slot));
        }
        if let Some(h) = UNSUPPORTED_HANDLERS.iter().copied().find(|h| *h == name) {
            return Some(Member::UnsupportedHandler(h));
        }
        UNSUPPORTED_PROPERTIES
            .iter()
            .copied()
            .find(|p| *p == name)
            .map(Member::UnsupportedProperty)
    }
}

/// A value offered for a handler slot.
///
/// The variant carries the callable's arity; `Uncallable` stands for values
/// from dynamic callers that cannot be invoked at all.
pub enum Handler<'h> {
    Nullary(Box<dyn FnMut() + 'h>),
    Unary(Box<dyn FnMut(&str) + 'h>),
    Binary(Box<dyn FnMut(&str, &Attributes) + 'h>),
    Uncallable(String),
}

impl<'h> Handler<'h> {
    pub fn nullary(f: impl FnMut() + 'h) -> Self {
        Handler::Nullary(Box::new(f))
    }

    pub fn unary(f: impl FnMut(&str) + 'h) -> Self {
        Handler::Unary(Box::new(f))
    }

    pub fn binary(f: impl FnMut(&str, &Attributes) + 'h) -> Self {
        Handler::Binary(Box::new(f))
    }

    /// Declared parameter count, or `None` if the value is not callable.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Handler::Nullary(_) => Some(0),
            Handler::Unary(_) => Some(1),
            Handler::Binary(_) => Some(2),
            Handler::Uncallable(_) => None,
        }
    }
}

impl fmt::Debug for Handler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Nullary(_) => f.write_str("Handler::Nullary"),
            Handler::Unary(_) => f.write_str("Handler::Unary"),
            Handler::Binary(_) => f.write_str("Handler::Binary"),
            Handler::Uncallable(kind) => write!(f, "Handler::Uncallable({kind})"),
        }
    }
}

/// One optional handler per slot.
#[derive(Debug, Default)]
pub struct HandlerRegistry<'h> {
    slots: [Option<Handler<'h>>; 6],
}

impl<'h> HandlerRegistry<'h> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `handler` in `slot` after checking its arity.
    pub fn register(&mut self, slot: HandlerSlot, handler: Handler<'h>) -> ParseResult<()> {
        if handler.arity() != Some(slot.arity()) {
            return Err(ParseError::InvalidHandler {
                handler: slot.name().to_string(),
                arity: slot.arity(),
            });
        }
        self.slots[slot.index()] = Some(handler);
        Ok(())
    }

    /// Store a handler built by a typed helper, skipping the arity check.
    pub(crate) fn install(&mut self, slot: HandlerSlot, handler: Handler<'h>) {
        debug_assert_eq!(handler.arity(), Some(slot.arity()), "{slot}");
        self.slots[slot.index()] = Some(handler);
    }

    pub fn is_registered(&self, slot: HandlerSlot) -> bool {
        self.slots[slot.index()].is_some()
    }

    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    pub(crate) fn start_element(&mut self, name: &str, attributes: &Attributes) {
        if let Some(Handler::Binary(f)) = &mut self.slots[HandlerSlot::StartElement.index()] {
            f(name, attributes);
        }
    }

    pub(crate) fn end_element(&mut self, name: &str) {
        self.call_unary(HandlerSlot::EndElement, name);
    }

    pub(crate) fn character_data(&mut self, text: &str) {
        self.call_unary(HandlerSlot::CharacterData, text);
    }

    pub(crate) fn comment(&mut self, text: &str) {
        self.call_unary(HandlerSlot::Comment, text);
    }

    pub(crate) fn start_cdata(&mut self) {
        self.call_nullary(HandlerSlot::StartCDataSection);
    }

    pub(crate) fn end_cdata(&mut self) {
        self.call_nullary(HandlerSlot::EndCDataSection);
    }

    fn call_unary(&mut self, slot: HandlerSlot, arg: &str) {
        if let Some(Handler::Unary(f)) = &mut self.slots[slot.index()] {
            f(arg);
        }
    }

    fn call_nullary(&mut self, slot: HandlerSlot) {
        if let Some(Handler::Nullary(f)) = &mut self.slots[slot.index()] {
            f();
        }
    }
}

//! Restricted SAX-style XML parsing for script code.
//!
//! Only a fixed set of handler slots is available; the remaining handlers and
//! position properties of the classic expat-style API are permanently
//! disabled and fail with [`ParseError::NotSupported`](crate::ParseError::NotSupported).

pub mod handlers;
pub mod input;
pub mod parser;

pub use handlers::{Handler, HandlerSlot, Member, UNSUPPORTED_HANDLERS, UNSUPPORTED_PROPERTIES};
pub use input::{BodyContent, BufferEncoding, WebBody, XmlInput};
pub use parser::SaxParser;

//! xsparse: request-message parsing and a restricted SAX façade for XS scripts.

pub mod cookie;
pub mod form;
pub mod headers;
pub mod request;
pub mod sax;
pub mod types;

pub use headers::{DefaultHeaderParser, HeaderSectionParser};
pub use request::{parse_request, RequestMessageParser};
pub use sax::{BodyContent, BufferEncoding, Handler, HandlerSlot, SaxParser, WebBody, XmlInput};
pub use types::*;

//! Raw HTTP/1.x request message parsing.

use crate::cookie::parse_cookie_header;
use crate::form::{self, FORM_URLENCODED};
use crate::headers::{DefaultHeaderParser, HeaderSectionParser};
use crate::types::{ParseError, ParseResult, ParsedRequest};

/// Line terminator between request line, header lines and sections.
pub const CRLF: &str = "\r\n";

/// Separator between the header section and the body.
const BLANK_LINE: &str = "\r\n\r\n";

/// Parses complete request strings into [`ParsedRequest`] values.
#[derive(Debug, Clone, Default)]
pub struct RequestMessageParser<H = DefaultHeaderParser> {
    header_parser: H,
}

impl RequestMessageParser {
    /// Parser backed by [`DefaultHeaderParser`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<H: HeaderSectionParser> RequestMessageParser<H> {
    /// Parser delegating the header section to `header_parser`.
    pub fn with_header_parser(header_parser: H) -> Self {
        Self { header_parser }
    }

    /// Parse a complete request message.
    pub fn parse(&self, request: &str) -> ParseResult<ParsedRequest> {
        let line_end = request.find(CRLF).unwrap_or(request.len());
        let request_line = &request[..line_end];
        let (method, target, protocol) = split_request_line(request_line)?;
        let (path, query_string) = split_target(target);

        let blank_line = request[line_end..].find(BLANK_LINE).map(|pos| line_end + pos);
        let Some(blank_line) = blank_line else {
            return Err(ParseError::MalformedRequest(
                "message is not valid - there should be a blank line after the headers"
                    .to_string(),
            ));
        };

        // The blank line may start right at the request-line terminator.
        let section_start = (line_end + CRLF.len()).min(blank_line);
        let header_section = &request[section_start..blank_line];
        let headers = self.header_parser.parse(header_section);

        let cookies = headers
            .get("cookie")
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_cookie_header(raw));
        let body = request[blank_line + BLANK_LINE.len()..].to_string();
        let form_fields = match headers.get("content-type") {
            Some(ct) if ct == FORM_URLENCODED => Some(form::decode(&body)),
            _ => None,
        };

        tracing::debug!(
            method,
            path,
            headers = headers.len(),
            body_len = body.len(),
            "Parsed request message"
        );

        Ok(ParsedRequest {
            method: method.to_string(),
            path: path.to_string(),
            query: query_string.map(form::decode).unwrap_or_default(),
            query_string: query_string.map(str::to_string),
            protocol: protocol.to_string(),
            headers,
            cookies,
            body,
            form_fields,
        })
    }
}

/// Parse a request message with the default header parser.
pub fn parse_request(request: &str) -> ParseResult<ParsedRequest> {
    RequestMessageParser::new().parse(request)
}

fn split_request_line(line: &str) -> ParseResult<(&str, &str, &str)> {
    let parts: Vec<&str> = line.split(' ').collect();
    match parts.as_slice() {
        [method, target, protocol] => Ok((*method, *target, *protocol)),
        _ => Err(ParseError::MalformedRequest(format!(
            "request line should contain 3 components: Method, URI and protocol version. Actual: \"{line}\""
        ))),
    }
}

fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (target, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_request_line() {
        let (m, t, p) = split_request_line("GET /a?b=1 HTTP/1.1").unwrap();
        assert_eq!((m, t, p), ("GET", "/a?b=1", "HTTP/1.1"));
    }

    #[test]
    fn test_split_request_line_rejects_double_space() {
        let err = split_request_line("GET  / HTTP/1.1").unwrap_err();
        assert!(matches!(err, ParseError::MalformedRequest(_)));
    }

    #[test]
    fn test_split_target() {
        assert_eq!(split_target("/p"), ("/p", None));
        assert_eq!(split_target("/p?"), ("/p", Some("")));
        assert_eq!(split_target("/p?a=1?b"), ("/p", Some("a=1?b")));
    }

    #[test]
    fn test_blank_line_directly_after_request_line() {
        let req = parse_request("GET / HTTP/1.1\r\n\r\nbody").unwrap();
        assert!(req.headers.is_empty());
        assert_eq!(req.body, "body");
    }

    #[test]
    fn test_missing_terminator_uses_whole_input_as_request_line() {
        let err = parse_request("GET /").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedRequest(
                "request line should contain 3 components: Method, URI and protocol version. Actual: \"GET /\""
                    .to_string()
            )
        );
    }
}

//! Integration tests for request-message parsing.

use std::collections::BTreeMap;

use xsparse::{parse_request, ParamMap, ParamValue, ParseError, RequestMessageParser};

// ─────────────────────── helpers ───────────────────────

/// Join a request line, header lines and a body into a CRLF message.
fn message(request_line: &str, headers: &[&str], body: &str) -> String {
    let mut msg = format!("{request_line}\r\n");
    for h in headers {
        msg.push_str(h);
        msg.push_str("\r\n");
    }
    msg.push_str("\r\n");
    msg.push_str(body);
    msg
}

// ═══════════════════════════════════════════════════════
// REQUEST LINE
// ═══════════════════════════════════════════════════════

#[test]
fn test_basic_get() {
    let req = parse_request(&message("GET /index.html HTTP/1.1", &["Host: example.com"], "")).unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/index.html");
    assert_eq!(req.protocol, "HTTP/1.1");
    assert!(req.query.is_empty());
    assert_eq!(req.query_string, None);
    assert_eq!(req.headers["host"], "example.com");
    assert_eq!(req.body, "");
}

#[test]
fn test_request_line_with_two_tokens_is_rejected() {
    let err = parse_request(&message("GET /only-two", &[], "")).unwrap_err();
    match err {
        ParseError::MalformedRequest(msg) => assert!(msg.contains("\"GET /only-two\""), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_request_line_with_four_tokens_is_rejected() {
    let line = "GET /a b HTTP/1.1";
    let err = parse_request(&message(line, &[], "")).unwrap_err();
    assert!(err.to_string().contains(line));
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(matches!(
        parse_request("").unwrap_err(),
        ParseError::MalformedRequest(_)
    ));
}

// ═══════════════════════════════════════════════════════
// TARGET AND QUERY
// ═══════════════════════════════════════════════════════

#[test]
fn test_query_is_decoded() {
    let req = parse_request(&message("GET /search?q=rust+lang&page=2 HTTP/1.1", &[], "")).unwrap();
    assert_eq!(req.path, "/search");
    assert_eq!(req.query.get_first("q"), Some("rust lang"));
    assert_eq!(req.query.get_first("page"), Some("2"));
}

#[test]
fn test_repeated_query_keys_become_lists() {
    let req = parse_request(&message("GET /p?id=1&id=2&x=y HTTP/1.1", &[], "")).unwrap();
    assert_eq!(
        req.query.get("id"),
        Some(&ParamValue::Multiple(vec!["1".into(), "2".into()]))
    );
    assert_eq!(req.query.get("x"), Some(&ParamValue::Single("y".into())));
}

#[test]
fn test_path_never_contains_question_mark() {
    for target in ["/a", "/a?", "/a?b", "/a?b=1?c=2", "?x=1", "/"] {
        let req = parse_request(&message(&format!("GET {target} HTTP/1.0"), &[], "")).unwrap();
        assert!(!req.path.contains('?'), "{target}");
        assert_eq!(req.target(), target);
    }
}

#[test]
fn test_path_and_query_string_reconstruct_target() {
    let target = "/api/items?filter=a%20b&sort=desc&sort=asc";
    let req = parse_request(&message(&format!("GET {target} HTTP/1.1"), &[], "")).unwrap();
    let rebuilt = format!("{}?{}", req.path, req.query_string.as_deref().unwrap());
    assert_eq!(rebuilt, target);
}

#[test]
fn test_query_reencode_keeps_order_and_multiplicity() {
    let req = parse_request(&message("GET /p?b=2&a=1&b=3 HTTP/1.1", &[], "")).unwrap();
    assert_eq!(req.query.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(req.query.to_query_string(), "b=2&b=3&a=1");
}

// ═══════════════════════════════════════════════════════
// HEADERS AND BODY
// ═══════════════════════════════════════════════════════

#[test]
fn test_missing_blank_line_is_rejected() {
    let err = parse_request("GET / HTTP/1.1\r\nHost: h\r\n").unwrap_err();
    match err {
        ParseError::MalformedRequest(msg) => assert!(msg.contains("blank line"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_header_names_are_lowercased() {
    let req = parse_request(&message(
        "POST /x HTTP/1.1",
        &["Content-Length: 4", "X-Trace-ID: abc"],
        "data",
    ))
    .unwrap();
    assert_eq!(req.headers["content-length"], "4");
    assert_eq!(req.header("X-TRACE-ID"), Some("abc"));
}

#[test]
fn test_body_is_taken_verbatim() {
    let body = "line one\r\n\r\nline two after another blank line";
    let req = parse_request(&message("PUT /doc HTTP/1.1", &["Host: h"], body)).unwrap();
    assert_eq!(req.body, body);
}

#[test]
fn test_custom_header_parser_receives_section_only() {
    let parser = RequestMessageParser::with_header_parser(|section: &str| {
        assert_eq!(section, "A: 1\r\nB: 2");
        BTreeMap::from([("seen".to_string(), section.len().to_string())])
    });
    let req = parser
        .parse(&message("GET / HTTP/1.1", &["A: 1", "B: 2"], "body"))
        .unwrap();
    assert_eq!(req.headers["seen"], "10");
    assert_eq!(req.body, "body");
}

// ═══════════════════════════════════════════════════════
// COOKIES
// ═══════════════════════════════════════════════════════

#[test]
fn test_cookie_header_is_decoded() {
    let req = parse_request(&message("GET / HTTP/1.1", &["Cookie: a=1; b=2"], "")).unwrap();
    let expected = BTreeMap::from([
        ("a".to_string(), "1".to_string()),
        ("b".to_string(), "2".to_string()),
    ]);
    assert_eq!(req.cookies, Some(expected));
}

#[test]
fn test_cookies_absent_without_header() {
    let req = parse_request(&message("GET / HTTP/1.1", &["Host: h"], "")).unwrap();
    assert_eq!(req.cookies, None);
}

#[test]
fn test_empty_cookie_header_counts_as_absent() {
    let req = parse_request(&message("GET / HTTP/1.1", &["Cookie: "], "")).unwrap();
    assert_eq!(req.cookies, None);
}

// ═══════════════════════════════════════════════════════
// FORM FIELDS
// ═══════════════════════════════════════════════════════

#[test]
fn test_form_fields_for_urlencoded_body() {
    let req = parse_request(&message(
        "POST /submit HTTP/1.1",
        &["Content-Type: application/x-www-form-urlencoded"],
        "x=1&y=2",
    ))
    .unwrap();
    let expected: ParamMap = [("x", "1"), ("y", "2")].into_iter().collect();
    assert_eq!(req.form_fields, Some(expected));
}

#[test]
fn test_form_fields_absent_for_other_content_types() {
    for headers in [
        vec!["Content-Type: application/json"],
        vec!["Content-Type: application/x-www-form-urlencoded; charset=utf-8"],
        vec![],
    ] {
        let req = parse_request(&message("POST /submit HTTP/1.1", &headers, "x=1&y=2")).unwrap();
        assert_eq!(req.form_fields, None, "{headers:?}");
    }
}

#[test]
fn test_parameters_merge_query_then_form() {
    let req = parse_request(&message(
        "POST /submit?a=1&b=2 HTTP/1.1",
        &["Content-Type: application/x-www-form-urlencoded"],
        "a=3&c=4",
    ))
    .unwrap();
    assert_eq!(
        req.parameters(),
        vec![("a", "1"), ("b", "2"), ("a", "3"), ("c", "4")]
    );
}

// ═══════════════════════════════════════════════════════
// SERIALIZATION
// ═══════════════════════════════════════════════════════

#[test]
fn test_json_skips_absent_fields() {
    let req = parse_request(&message("GET /p?k=v HTTP/1.1", &["Host: h"], "")).unwrap();
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["query"]["k"], "v");
    assert_eq!(json["query_string"], "k=v");
    assert!(json.get("cookies").is_none());
    assert!(json.get("form_fields").is_none());
}

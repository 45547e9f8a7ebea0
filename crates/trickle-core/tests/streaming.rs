//! Buffer-boundary behaviour: however the input is cut, the same messages
//! come out the other side.

use trickle_core::{Collector, Error, Event, Flow, Handler, Message, Method, Parser, ParserConfig, ABORT, CONTINUE};

const REQUESTS: &[u8] = b"GET /search?q=rust&page=2#results HTTP/1.1\r\n\
Host: example.com\r\n\
User-Agent: trickle-test\r\n\
X-Folded: first\r\n  second\r\n\
Accept:\r\n\
\r\n\
POST /upload HTTP/1.1\r\n\
Content-Length: 11\r\n\
Content-Type: text/plain\r\n\
\r\n\
hello world\
PUT /items/42 HTTP/1.1\r\n\
Transfer-Encoding: chunked\r\n\
\r\n\
4\r\nWiki\r\n5;name=value\r\npedia\r\n0\r\nExpires: never\r\n\r\n\
DELETE http://example.com/items/42 HTTP/1.0\r\n\
Connection: keep-alive\r\n\
\r\n";

const RESPONSES: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Length: 5\r\n\
\r\n\
first\
HTTP/1.1 204 No Content\r\n\
\r\n\
HTTP/1.1 200 OK\r\n\
Transfer-Encoding: chunked\r\n\
\r\n\
3\r\nabc\r\n0\r\n\r\n\
HTTP/1.0 200 OK\r\n\
Content-Type: text/plain\r\n\
\r\n\
until the connection closes";

/// Feed `input` in pieces of `size` bytes, asserting each is fully consumed
fn feed(parser: &mut Parser<Collector>, input: &[u8], size: usize, responses: bool) {
    for chunk in input.chunks(size) {
        let consumed = if responses {
            parser.parse_responses(chunk)
        } else {
            parser.parse_requests(chunk)
        };
        assert_eq!(consumed, chunk.len(), "chunk size {size}: {:?}", parser.error());
    }
}

fn collect(input: &[u8], size: usize, responses: bool) -> Vec<Message> {
    let mut parser = Parser::new(Collector::new());
    feed(&mut parser, input, size, responses);
    if responses {
        parser.finish().unwrap();
    }
    parser.into_handler().drain()
}

#[test]
fn test_requests_survive_any_split() {
    let whole = collect(REQUESTS, REQUESTS.len(), false);
    assert_eq!(whole.len(), 4);

    for size in [1, 2, 3, 7, 16, 64] {
        assert_eq!(collect(REQUESTS, size, false), whole, "chunk size {size}");
    }
}

#[test]
fn test_responses_survive_any_split() {
    let whole = collect(RESPONSES, RESPONSES.len(), true);
    assert_eq!(whole.len(), 4);

    for size in [1, 2, 5, 13, 128] {
        assert_eq!(collect(RESPONSES, size, true), whole, "chunk size {size}");
    }
}

#[test]
fn test_request_contents() {
    let messages = collect(REQUESTS, 1, false);

    let search = &messages[0];
    assert_eq!(search.method, Some(Method::Get));
    assert_eq!(search.url, "/search?q=rust&page=2#results");
    assert_eq!(search.path, "/search");
    assert_eq!(search.query.as_deref(), Some(&b"q=rust&page=2"[..]));
    assert_eq!(search.fragment.as_deref(), Some(&b"results"[..]));
    assert_eq!(search.header("x-folded"), Some(&b"first second"[..]));
    assert_eq!(search.header("accept"), Some(&b""[..]));
    assert_eq!(search.headers.len(), 4);
    assert!(search.keep_alive);

    let upload = &messages[1];
    assert_eq!(upload.method, Some(Method::Post));
    assert_eq!(upload.body, "hello world");

    let put = &messages[2];
    assert_eq!(put.body, "Wikipedia");
    assert_eq!(put.header("transfer-encoding"), Some(&b"chunked"[..]));

    let delete = &messages[3];
    assert_eq!(delete.method, Some(Method::Delete));
    assert_eq!(delete.url, "http://example.com/items/42");
    assert_eq!(delete.path, "/items/42");
    assert_eq!((delete.http_major, delete.http_minor), (1, 0));
    assert!(delete.keep_alive);
}

#[test]
fn test_response_contents() {
    let messages = collect(RESPONSES, 3, true);

    assert_eq!(messages[0].status_code, 200);
    assert_eq!(messages[0].body, "first");
    assert!(messages[0].keep_alive);

    assert_eq!(messages[1].status_code, 204);
    assert!(messages[1].body.is_empty());

    assert_eq!(messages[2].body, "abc");

    assert_eq!(messages[3].body, "until the connection closes");
    assert!(!messages[3].keep_alive);
}

#[test]
fn test_http_interop() {
    let messages = collect(REQUESTS, 5, false);

    let request = messages[1].to_request().unwrap();
    assert_eq!(*request.method(), http::Method::POST);
    assert_eq!(request.uri().path(), "/upload");
    assert_eq!(request.headers()["content-type"], "text/plain");
    assert_eq!(request.body().as_ref(), b"hello world");

    let absolute = messages[3].to_request().unwrap();
    assert_eq!(absolute.uri().host(), Some("example.com"));
}

/// Counts events and optionally aborts on one of them
#[derive(Default)]
struct Tally {
    begins: usize,
    completes: usize,
    body: Vec<u8>,
    seen: Vec<Event>,
    abort_on: Option<Event>,
}

impl Tally {
    fn event(&mut self, event: Event) -> Flow {
        self.seen.push(event);
        if self.abort_on == Some(event) {
            ABORT
        } else {
            CONTINUE
        }
    }
}

impl Handler for Tally {
    fn on_message_begin(&mut self) -> Flow {
        self.begins += 1;
        self.event(Event::MessageBegin)
    }

    fn on_header_field(&mut self, _data: &[u8]) -> Flow {
        self.event(Event::HeaderField)
    }

    fn on_header_value(&mut self, _data: &[u8]) -> Flow {
        self.event(Event::HeaderValue)
    }

    fn on_body(&mut self, data: &[u8]) -> Flow {
        self.body.extend_from_slice(data);
        self.event(Event::Body)
    }

    fn on_message_complete(&mut self, _head: &trickle_core::MessageHead) -> Flow {
        self.completes += 1;
        self.event(Event::MessageComplete)
    }
}

#[test]
fn test_one_begin_and_complete_per_message() {
    for size in [1, 4, REQUESTS.len()] {
        let mut tally = Tally::default();
        let mut parser = Parser::new(&mut tally);
        for chunk in REQUESTS.chunks(size) {
            assert_eq!(parser.parse_requests(chunk), chunk.len());
        }
        drop(parser);
        assert_eq!((tally.begins, tally.completes), (4, 4));
        assert_eq!(tally.body, b"hello worldWikipedia");
    }
}

#[test]
fn test_abort_stops_delivery() {
    let mut parser = Parser::new(Tally {
        abort_on: Some(Event::HeaderField),
        ..Tally::default()
    });
    let req = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";

    assert_eq!(parser.parse_requests(req), 20);
    assert_eq!(parser.error(), Some(Error::Aborted(Event::HeaderField)));
    assert_eq!(parser.handler().seen, vec![Event::MessageBegin, Event::HeaderField]);

    // Faulted: later input is refused without reaching the handler
    assert_eq!(parser.parse_requests(b"GET / HTTP/1.1\r\n\r\n"), 0);
    assert_eq!(parser.handler().seen.len(), 2);
}

#[test]
fn test_abort_mid_body_across_buffers() {
    let mut parser = Parser::new(Tally {
        abort_on: Some(Event::Body),
        ..Tally::default()
    });
    let head = b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\n";
    assert_eq!(parser.parse_requests(head), head.len());
    assert_eq!(parser.parse_requests(b"ab"), 0);
    assert_eq!(parser.handler().completes, 0);
}

#[test]
fn test_content_length_is_enforced() {
    let mut parser = Parser::new(Tally::default());
    let req = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello!";

    assert_eq!(parser.parse_requests(req), req.len() - 1);
    assert_eq!(parser.handler().body, b"hello");
    assert_eq!(parser.handler().completes, 1);
}

#[test]
fn test_strict_and_lenient_sessions() {
    let req = b"FOO / HTTP/1.1\r\n\r\n";

    let mut strict = Parser::new(Collector::new());
    assert_eq!(strict.parse_requests(req), 0);
    assert_eq!(strict.error(), Some(Error::InvalidMethod));

    let mut lenient = Parser::with_config(Collector::new(), ParserConfig::new().lenient());
    assert_eq!(lenient.parse_requests(req), req.len());
    let message = &lenient.handler().messages()[0];
    assert_eq!(message.method, None);
    assert!(message.to_request().is_none());
}

#[test]
fn test_reuse_after_init() {
    let mut parser = Parser::new(Collector::new());
    assert_eq!(parser.parse_requests(b"GET / HTTP/1.1\r\nBad\x01: x\r\n\r\n"), 19);
    assert!(parser.is_faulted());

    parser.init();
    let req = b"HEAD /ok HTTP/1.1\r\n\r\n";
    assert_eq!(parser.parse_requests(req), req.len());
    assert_eq!(parser.handler().messages()[0].method, Some(Method::Head));
}

#[test]
fn test_truncated_response_at_eof() {
    let mut parser = Parser::new(Collector::new());
    let res = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nshort";
    assert_eq!(parser.parse_responses(res), res.len());
    assert_eq!(parser.finish(), Err(Error::UnexpectedEof));
    assert!(parser.handler().messages().is_empty());
}

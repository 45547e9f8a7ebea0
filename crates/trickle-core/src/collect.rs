//! Owned message assembly
//!
//! [`Collector`] is a ready-made [`Handler`] for callers that want whole
//! messages rather than events. It stitches partial spans back together and
//! keeps every completed message as an owned [`Message`].

use bytes::{Bytes, BytesMut};
use smallvec::SmallVec;

use crate::parser::{Flow, Handler, MessageHead, Method, ABORT, CONTINUE};

/// A fully parsed HTTP message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Request method (requests only)
    pub method: Option<Method>,
    /// Status code (responses only)
    pub status_code: u16,
    pub http_major: u16,
    pub http_minor: u16,
    /// Raw request target
    pub url: Bytes,
    pub path: Bytes,
    /// Query string without the leading '?'
    pub query: Option<Bytes>,
    /// Fragment without the leading '#'
    pub fragment: Option<Bytes>,
    /// Header pairs in arrival order (stack-allocated for small counts)
    pub headers: SmallVec<[(Bytes, Bytes); 16]>,
    pub body: Bytes,
    pub keep_alive: bool,
}

impl Message {
    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name.as_bytes()))
            .map(|(_, v)| v.as_ref())
    }

    pub fn version(&self) -> http::Version {
        match (self.http_major, self.http_minor) {
            (0, 9) => http::Version::HTTP_09,
            (1, 0) => http::Version::HTTP_10,
            (2, _) => http::Version::HTTP_2,
            _ => http::Version::HTTP_11,
        }
    }

    /// Convert to an `http::Request`. `None` for unknown methods or targets
    /// and headers the `http` crate rejects.
    pub fn to_request(&self) -> Option<http::Request<Bytes>> {
        let method = http::Method::from(self.method?);
        let mut builder = http::Request::builder()
            .method(method)
            .uri(&self.url[..])
            .version(self.version());
        for (name, value) in &self.headers {
            builder = builder.header(&name[..], &value[..]);
        }
        builder.body(self.body.clone()).ok()
    }

    /// Convert to an `http::Response`
    pub fn to_response(&self) -> Option<http::Response<Bytes>> {
        let mut builder = http::Response::builder()
            .status(self.status_code)
            .version(self.version());
        for (name, value) in &self.headers {
            builder = builder.header(&name[..], &value[..]);
        }
        builder.body(self.body.clone()).ok()
    }
}

/// Handler that assembles owned messages
#[derive(Debug, Default)]
pub struct Collector {
    url: BytesMut,
    path: BytesMut,
    query: Option<BytesMut>,
    fragment: Option<BytesMut>,
    field: BytesMut,
    value: BytesMut,
    in_value: bool,
    headers: SmallVec<[(Bytes, Bytes); 16]>,
    body: BytesMut,
    body_limit: Option<usize>,
    messages: Vec<Message>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort parsing once a single message body exceeds `limit` bytes
    pub fn with_body_limit(limit: usize) -> Self {
        Self {
            body_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Completed messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Take completed messages, leaving the collector empty
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages)
    }

    fn push_header(&mut self) {
        if self.in_value {
            let field = self.field.split().freeze();
            let value = self.value.split().freeze();
            self.headers.push((field, value));
            self.in_value = false;
        }
    }
}

impl Handler for Collector {
    fn on_message_begin(&mut self) -> Flow {
        self.url.clear();
        self.path.clear();
        self.query = None;
        self.fragment = None;
        self.field.clear();
        self.value.clear();
        self.in_value = false;
        self.headers = SmallVec::new();
        self.body.clear();
        CONTINUE
    }

    fn on_path(&mut self, data: &[u8]) -> Flow {
        self.path.extend_from_slice(data);
        CONTINUE
    }

    fn on_query_string(&mut self, data: &[u8]) -> Flow {
        self.query.get_or_insert_with(BytesMut::new).extend_from_slice(data);
        CONTINUE
    }

    fn on_url(&mut self, data: &[u8]) -> Flow {
        self.url.extend_from_slice(data);
        CONTINUE
    }

    fn on_fragment(&mut self, data: &[u8]) -> Flow {
        self.fragment.get_or_insert_with(BytesMut::new).extend_from_slice(data);
        CONTINUE
    }

    fn on_header_field(&mut self, data: &[u8]) -> Flow {
        self.push_header();
        self.field.extend_from_slice(data);
        CONTINUE
    }

    fn on_header_value(&mut self, data: &[u8]) -> Flow {
        self.in_value = true;
        self.value.extend_from_slice(data);
        CONTINUE
    }

    fn on_headers_complete(&mut self, _head: &MessageHead) -> Flow {
        self.push_header();
        CONTINUE
    }

    fn on_body(&mut self, data: &[u8]) -> Flow {
        if let Some(limit) = self.body_limit {
            if self.body.len() + data.len() > limit {
                return ABORT;
            }
        }
        self.body.extend_from_slice(data);
        CONTINUE
    }

    fn on_message_complete(&mut self, head: &MessageHead) -> Flow {
        let message = Message {
            method: head.method,
            status_code: head.status_code,
            http_major: head.http_major,
            http_minor: head.http_minor,
            url: self.url.split().freeze(),
            path: self.path.split().freeze(),
            query: self.query.take().map(BytesMut::freeze),
            fragment: self.fragment.take().map(BytesMut::freeze),
            headers: std::mem::take(&mut self.headers),
            body: self.body.split().freeze(),
            keep_alive: head.should_keep_alive(),
        };
        self.messages.push(message);
        CONTINUE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Parser};

    #[test]
    fn test_collect_request() {
        let mut parser = Parser::new(Collector::new());
        let req = b"POST /items?sort=asc#top HTTP/1.1\r\nHost: example.com\r\nContent-Length: 5\r\n\r\nhello";
        assert_eq!(parser.parse_requests(req), req.len());

        let msg = &parser.handler().messages()[0];
        assert_eq!(msg.method, Some(Method::Post));
        assert_eq!(msg.url, "/items?sort=asc#top");
        assert_eq!(msg.path, "/items");
        assert_eq!(msg.query.as_deref(), Some(&b"sort=asc"[..]));
        assert_eq!(msg.fragment.as_deref(), Some(&b"top"[..]));
        assert_eq!(msg.header("host"), Some(&b"example.com"[..]));
        assert_eq!(msg.header("content-length"), Some(&b"5"[..]));
        assert_eq!(msg.body, "hello");
        assert!(msg.keep_alive);
    }

    #[test]
    fn test_to_request() {
        let mut parser = Parser::new(Collector::new());
        let req = b"PUT /a HTTP/1.0\r\nX-Id: 7\r\nContent-Length: 2\r\n\r\nok";
        parser.parse_requests(req);

        let request = parser.handler().messages()[0].to_request().unwrap();
        assert_eq!(*request.method(), http::Method::PUT);
        assert_eq!(request.uri().path(), "/a");
        assert_eq!(request.version(), http::Version::HTTP_10);
        assert_eq!(request.headers()["x-id"], "7");
        assert_eq!(request.body().as_ref(), b"ok");
    }

    #[test]
    fn test_to_response() {
        let mut parser = Parser::new(Collector::new());
        let res = b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n";
        assert_eq!(parser.parse_responses(res), res.len());

        let msg = &parser.handler().messages()[0];
        assert_eq!(msg.method, None);
        assert!(msg.to_request().is_none());
        let response = msg.to_response().unwrap();
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_body_limit_aborts() {
        let mut parser = Parser::new(Collector::with_body_limit(4));
        let req = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let consumed = parser.parse_requests(req);

        assert_eq!(consumed, req.len() - 5);
        assert_eq!(parser.error(), Some(Error::Aborted(crate::Event::Body)));
        assert!(parser.handler().messages().is_empty());
    }

    #[test]
    fn test_drain() {
        let mut parser = Parser::new(Collector::new());
        let reqs = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";
        assert_eq!(parser.parse_requests(reqs), reqs.len());

        let messages = parser.handler_mut().drain();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].path, "/b");
        assert!(parser.handler().messages().is_empty());
    }
}

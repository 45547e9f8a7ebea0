//! Incremental HTTP/1.x parser
//!
//! A [`Parser`] is one session bound to one connection. Feed it bytes as they
//! arrive with [`Parser::parse_requests`] or [`Parser::parse_responses`]; it
//! advances a byte-level state machine, fires [`Handler`] events, and returns
//! how many bytes it consumed. Nothing is buffered: tokens cut by a buffer
//! boundary are delivered in pieces.
//!
//! A return value smaller than the buffer length means the session failed,
//! either on malformed input or because a hook returned [`ABORT`]. The
//! session then stays faulted until [`Parser::init`].
//!
//! ```
//! use trickle_core::{Flow, Handler, Parser, CONTINUE};
//!
//! #[derive(Default)]
//! struct Paths(Vec<u8>);
//!
//! impl Handler for Paths {
//!     fn on_path(&mut self, data: &[u8]) -> Flow {
//!         self.0.extend_from_slice(data);
//!         CONTINUE
//!     }
//! }
//!
//! let mut parser = Parser::new(Paths::default());
//! let req = b"GET /users?page=2 HTTP/1.1\r\nHost: example.com\r\n\r\n";
//!
//! assert_eq!(parser.parse_requests(&req[..10]), 10);
//! assert_eq!(parser.parse_requests(&req[10..]), req.len() - 10);
//! assert_eq!(parser.handler().0, b"/users");
//! assert!(parser.should_keep_alive());
//! ```

mod handler;
mod header;
mod mark;
mod method;
mod state;

pub use handler::{Event, Flow, Handler, MessageHead, ABORT, CONTINUE};
pub use method::Method;
pub use state::Flags;

use crate::{Error, ParserConfig, Result};
use header::HeaderState;
use mark::{Marks, Span};
use state::State;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const HTTP: &[u8] = b"HTTP/";

/// Which start-line grammar a drive call uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Request,
    Response,
}

/// Where and why a drive call stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stop {
    pub(crate) at: usize,
    pub(crate) error: Error,
}

impl Stop {
    pub(crate) fn new(at: usize, error: Error) -> Self {
        Self { at, error }
    }
}

type Step<T> = std::result::Result<T, Stop>;

/// Parser session for one connection
#[derive(Debug)]
pub struct Parser<H> {
    config: ParserConfig,
    state: State,
    header_state: HeaderState,
    /// Literal cursor shared by method, version, and header matching
    index: usize,
    flags: Flags,
    body_read: u64,
    content_length: Option<u64>,
    chunk_remaining: u64,
    head_bytes: usize,
    marks: Marks,

    method: Option<Method>,
    status_code: u16,
    http_major: u16,
    http_minor: u16,

    error: Option<Error>,
    handler: H,
}

impl<H: Handler> Parser<H> {
    /// Create a strict-mode session
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, ParserConfig::default())
    }

    pub fn with_config(handler: H, config: ParserConfig) -> Self {
        let mut parser = Self {
            config,
            state: State::Start,
            header_state: HeaderState::General,
            index: 0,
            flags: Flags::empty(),
            body_read: 0,
            content_length: None,
            chunk_remaining: 0,
            head_bytes: 0,
            marks: Marks::default(),
            method: None,
            status_code: 0,
            http_major: 0,
            http_minor: 0,
            error: None,
            handler,
        };
        parser.init();
        parser
    }

    /// Reset to the start state, clearing any failure. The handler and
    /// configuration are kept.
    pub fn init(&mut self) {
        self.reset_message();
        self.state = State::Start;
        self.error = None;
    }

    /// Drive the request grammar over `data`
    pub fn parse_requests(&mut self, data: &[u8]) -> usize {
        self.execute(Mode::Request, data)
    }

    /// Drive the response grammar over `data`
    pub fn parse_responses(&mut self, data: &[u8]) -> usize {
        self.execute(Mode::Response, data)
    }

    /// Signal that the transport reached end of stream.
    ///
    /// Completes a response whose body runs until close. Between messages
    /// this does nothing; anywhere else the message is truncated and the
    /// session faults.
    pub fn finish(&mut self) -> Result<()> {
        match self.state {
            State::Dead => Err(Error::Faulted),
            State::Start => Ok(()),
            State::BodyIdentityEof => match self.complete(0) {
                Ok(()) => Ok(()),
                Err(stop) => {
                    self.fault(stop);
                    Err(stop.error)
                }
            },
            _ => {
                self.fault(Stop::new(0, Error::UnexpectedEof));
                Err(Error::UnexpectedEof)
            }
        }
    }

    /// Whether the connection may be reused after the current message.
    /// Meaningful once headers are complete.
    pub fn should_keep_alive(&self) -> bool {
        self.head().should_keep_alive()
    }

    /// Snapshot of the current message's start line and flags
    pub fn head(&self) -> MessageHead {
        MessageHead {
            method: self.method,
            status_code: self.status_code,
            http_major: self.http_major,
            http_minor: self.http_minor,
            flags: self.flags,
        }
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn http_major(&self) -> u16 {
        self.http_major
    }

    pub fn http_minor(&self) -> u16 {
        self.http_minor
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Declared body length, if a Content-Length header was parsed
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Body bytes delivered so far for the current message
    pub fn body_read(&self) -> u64 {
        self.body_read
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn is_faulted(&self) -> bool {
        self.state == State::Dead
    }

    /// Cause of the most recent failure
    pub fn error(&self) -> Option<Error> {
        self.error
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    fn reset_message(&mut self) {
        self.header_state = HeaderState::General;
        self.index = 0;
        self.flags = Flags::empty();
        self.body_read = 0;
        self.content_length = None;
        self.chunk_remaining = 0;
        self.head_bytes = 0;
        self.marks.clear();
        self.method = None;
        self.status_code = 0;
        self.http_major = 0;
        self.http_minor = 0;
    }

    fn execute(&mut self, mode: Mode, data: &[u8]) -> usize {
        if self.state == State::Dead {
            return 0;
        }
        self.marks.rebase();

        match self.run(mode, data).and_then(|()| self.flush(data)) {
            Ok(()) => data.len(),
            Err(stop) => self.fault(stop),
        }
    }

    fn fault(&mut self, stop: Stop) -> usize {
        tracing::debug!(error = %stop.error, offset = stop.at, "http parse failed");
        self.state = State::Dead;
        self.error = Some(stop.error);
        self.marks.clear();
        stop.at
    }

    /// Deliver the partial bytes of every open token before returning
    fn flush(&mut self, data: &[u8]) -> Step<()> {
        for span in Span::ALL {
            if let Some(start) = self.marks.get(span) {
                if start < data.len() {
                    self.emit(span, &data[start..], start)?;
                }
            }
        }
        Ok(())
    }

    fn emit(&mut self, span: Span, data: &[u8], at: usize) -> Step<()> {
        let flow = match span {
            Span::Path => self.handler.on_path(data),
            Span::QueryString => self.handler.on_query_string(data),
            Span::Fragment => self.handler.on_fragment(data),
            Span::Url => self.handler.on_url(data),
            Span::HeaderField => self.handler.on_header_field(data),
            Span::HeaderValue => self.handler.on_header_value(data),
        };
        if flow.is_break() {
            return Err(Stop::new(at, Error::Aborted(span.event())));
        }
        Ok(())
    }

    /// Close a mark at `end` and deliver the token's final piece
    fn deliver(&mut self, span: Span, data: &[u8], end: usize) -> Step<()> {
        let start = self.marks.take(span).unwrap_or(end);
        self.emit(span, &data[start..end], end)
    }

    fn begin(&mut self, at: usize) -> Step<()> {
        self.reset_message();
        tracing::trace!(offset = at, "http message begin");
        if self.handler.on_message_begin().is_break() {
            return Err(Stop::new(at, Error::Aborted(Event::MessageBegin)));
        }
        Ok(())
    }

    fn complete(&mut self, at: usize) -> Step<()> {
        self.state = State::Start;
        let head = self.head();
        tracing::trace!(
            method = ?head.method,
            status = head.status_code,
            body_read = self.body_read,
            "http message complete"
        );
        if self.handler.on_message_complete(&head).is_break() {
            return Err(Stop::new(at, Error::Aborted(Event::MessageComplete)));
        }
        Ok(())
    }

    /// Blank line after the headers: pick body framing, notify, move on
    fn headers_done(&mut self, mode: Mode, at: usize) -> Step<()> {
        if self.flags.chunked() && self.flags.content_length() {
            if self.config.strict {
                return Err(Stop::new(at, Error::ConflictingFraming));
            }
            self.content_length = None;
        }

        let bodiless = mode == Mode::Response
            && (self.status_code / 100 == 1 || self.status_code == 204 || self.status_code == 304);
        let next = if bodiless {
            State::Start
        } else if self.flags.chunked() {
            State::ChunkSizeStart
        } else {
            match self.content_length {
                Some(0) => State::Start,
                Some(_) => State::BodyIdentity,
                None if mode == Mode::Request => State::Start,
                None => {
                    self.flags.insert(Flags::UNTIL_EOF);
                    State::BodyIdentityEof
                }
            }
        };

        self.head_bytes = 0;
        let head = self.head();
        if self.handler.on_headers_complete(&head).is_break() {
            return Err(Stop::new(at, Error::Aborted(Event::HeadersComplete)));
        }

        if next == State::Start {
            self.complete(at)
        } else {
            self.state = next;
            Ok(())
        }
    }

    /// Pass `len` body bytes starting at `at` to the handler
    fn body(&mut self, data: &[u8], at: usize, len: usize) -> Step<()> {
        if self.handler.on_body(&data[at..at + len]).is_break() {
            return Err(Stop::new(at, Error::Aborted(Event::Body)));
        }
        self.body_read += len as u64;
        Ok(())
    }

    /// Strict mode needs CR before LF
    fn bare_lf(&self, at: usize) -> Step<()> {
        if self.config.strict {
            Err(Stop::new(at, Error::LineEnding))
        } else {
            Ok(())
        }
    }

    fn run(&mut self, mode: Mode, data: &[u8]) -> Step<()> {
        let strict = self.config.strict;
        let limit = self.config.max_header_size;
        let mut p = 0;

        while p < data.len() {
            let byte = data[p];

            if self.state.in_head() {
                self.head_bytes += 1;
                if self.head_bytes > limit {
                    return Err(Stop::new(p, Error::HeaderOverflow { limit }));
                }
            }

            match self.state {
                State::Dead => return Err(Stop::new(p, Error::Faulted)),

                State::Start => {
                    if byte == CR || byte == LF {
                        p += 1;
                        continue;
                    }
                    self.begin(p)?;
                    self.state = match mode {
                        Mode::Request => State::Method,
                        Mode::Response => State::ResHttp,
                    };
                    // Reprocess this byte in the new state
                    continue;
                }

                // ---------------------------------------------------------
                // Request line
                // ---------------------------------------------------------
                State::Method => {
                    if byte == b' ' && self.index > 0 {
                        let matched = self.method.is_some_and(|m| m.as_bytes().len() == self.index);
                        if !matched {
                            if strict {
                                return Err(Stop::new(p.saturating_sub(self.index), Error::InvalidMethod));
                            }
                            self.method = None;
                        }
                        self.state = State::UrlStart;
                    } else {
                        let next = match self.method {
                            Some(m) if self.index > 0 => m.advance(self.index, byte),
                            _ => Method::candidate(byte),
                        };
                        match next {
                            Some(m) => {
                                self.method = Some(m);
                                self.index += 1;
                            }
                            None if !strict && is_method_char(byte) => {
                                self.method = None;
                                self.state = State::MethodToken;
                            }
                            None => {
                                return Err(Stop::new(p.saturating_sub(self.index), Error::InvalidMethod));
                            }
                        }
                    }
                }

                State::MethodToken => match byte {
                    b' ' => self.state = State::UrlStart,
                    _ if is_method_char(byte) => {}
                    _ => return Err(Stop::new(p, Error::InvalidMethod)),
                },

                State::UrlStart => match byte {
                    b'/' => {
                        self.marks.set(Span::Url, p);
                        self.marks.set(Span::Path, p);
                        self.state = State::Path;
                    }
                    b'*' => {
                        self.marks.set(Span::Url, p);
                        self.state = State::UrlEnd;
                    }
                    b' ' if !strict => {}
                    _ if byte.is_ascii_alphabetic() => {
                        self.marks.set(Span::Url, p);
                        self.state = State::UrlSchema;
                    }
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::UrlSchema => match byte {
                    b':' => self.state = State::UrlSchemaSlash,
                    b'+' | b'-' | b'.' => {}
                    _ if byte.is_ascii_alphanumeric() => {}
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::UrlSchemaSlash => match byte {
                    b'/' => self.state = State::UrlSchemaSlashSlash,
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::UrlSchemaSlashSlash => match byte {
                    b'/' => self.state = State::UrlHost,
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::UrlHost => match byte {
                    b'/' => {
                        self.marks.set(Span::Path, p);
                        self.state = State::Path;
                    }
                    b'?' => {
                        self.marks.set(Span::QueryString, p + 1);
                        self.state = State::QueryString;
                    }
                    b'#' => {
                        self.marks.set(Span::Fragment, p + 1);
                        self.state = State::Fragment;
                    }
                    b' ' => self.url_done(data, p)?,
                    _ if self.is_url_char(byte) => {}
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::Path => match byte {
                    b'?' => {
                        self.deliver(Span::Path, data, p)?;
                        self.marks.set(Span::QueryString, p + 1);
                        self.state = State::QueryString;
                    }
                    b'#' => {
                        self.deliver(Span::Path, data, p)?;
                        self.marks.set(Span::Fragment, p + 1);
                        self.state = State::Fragment;
                    }
                    b' ' => {
                        self.deliver(Span::Path, data, p)?;
                        self.url_done(data, p)?;
                    }
                    _ if self.is_url_char(byte) => {}
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::QueryString => match byte {
                    b'#' => {
                        self.deliver(Span::QueryString, data, p)?;
                        self.marks.set(Span::Fragment, p + 1);
                        self.state = State::Fragment;
                    }
                    b' ' => {
                        self.deliver(Span::QueryString, data, p)?;
                        self.url_done(data, p)?;
                    }
                    _ if self.is_url_char(byte) => {}
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::Fragment => match byte {
                    b' ' => {
                        self.deliver(Span::Fragment, data, p)?;
                        self.url_done(data, p)?;
                    }
                    _ if self.is_url_char(byte) => {}
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::UrlEnd => match byte {
                    b' ' => self.url_done(data, p)?,
                    _ => return Err(Stop::new(p, Error::InvalidUrl)),
                },

                State::ReqHttp | State::ResHttp => {
                    if byte == b' ' && self.index == 0 && !strict && self.state == State::ReqHttp {
                        p += 1;
                        continue;
                    }
                    if HTTP.get(self.index) != Some(&byte) {
                        return Err(Stop::new(p, Error::InvalidVersion));
                    }
                    self.index += 1;
                    if self.index == HTTP.len() {
                        self.index = 0;
                        self.state = if self.state == State::ReqHttp {
                            State::ReqHttpMajor
                        } else {
                            State::ResHttpMajor
                        };
                    }
                }

                State::ReqHttpMajor | State::ResHttpMajor => {
                    if byte == b'.' && self.index > 0 {
                        self.index = 0;
                        self.state = if self.state == State::ReqHttpMajor {
                            State::ReqHttpMinor
                        } else {
                            State::ResHttpMinor
                        };
                    } else {
                        self.http_major = self.version_digit(self.http_major, byte, p)?;
                    }
                }

                State::ReqHttpMinor => match byte {
                    CR if self.index > 0 => self.state = State::StartLineLf,
                    LF if self.index > 0 => {
                        self.bare_lf(p)?;
                        self.state = State::HeaderFieldStart;
                    }
                    _ => self.http_minor = self.version_digit(self.http_minor, byte, p)?,
                },

                State::ResHttpMinor => match byte {
                    b' ' if self.index > 0 => {
                        self.index = 0;
                        self.state = State::ResStatus;
                    }
                    _ => self.http_minor = self.version_digit(self.http_minor, byte, p)?,
                },

                // ---------------------------------------------------------
                // Status line
                // ---------------------------------------------------------
                State::ResStatus => {
                    if byte.is_ascii_digit() && self.index < 3 {
                        self.status_code = self.status_code * 10 + u16::from(byte - b'0');
                        self.index += 1;
                    } else {
                        let complete = self.index == 3 || (!strict && self.index > 0);
                        match byte {
                            b' ' if complete => self.state = State::ResReason,
                            CR if complete => self.state = State::StartLineLf,
                            LF if complete => {
                                self.bare_lf(p)?;
                                self.state = State::HeaderFieldStart;
                            }
                            _ => return Err(Stop::new(p, Error::InvalidStatus)),
                        }
                    }
                }

                State::ResReason => match byte {
                    CR => self.state = State::StartLineLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.state = State::HeaderFieldStart;
                    }
                    b'\t' => {}
                    _ if strict && (byte < 0x20 || byte == 0x7f) => {
                        return Err(Stop::new(p, Error::InvalidStatus));
                    }
                    _ => {}
                },

                State::StartLineLf => match byte {
                    LF => self.state = State::HeaderFieldStart,
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                // ---------------------------------------------------------
                // Header section
                // ---------------------------------------------------------
                State::HeaderFieldStart => match byte {
                    CR => self.state = State::HeadersLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.headers_done(mode, p)?;
                    }
                    b' ' | b'\t' => {
                        // Continuation of the previous value
                        if !self.flags.contains(Flags::HEADER_SEEN) {
                            return Err(Stop::new(p, Error::InvalidHeaderToken));
                        }
                        self.emit(Span::HeaderValue, b" ", p)?;
                        self.header_value_byte(b' ', p)?;
                        self.state = State::HeaderValueStart;
                    }
                    _ if self.is_header_char(byte) => {
                        self.flags.insert(Flags::HEADER_SEEN);
                        self.marks.set(Span::HeaderField, p);
                        self.header_name_start(byte);
                        self.state = State::HeaderField;
                    }
                    _ => return Err(Stop::new(p, Error::InvalidHeaderToken)),
                },

                State::HeaderField => match byte {
                    b':' => {
                        self.deliver(Span::HeaderField, data, p)?;
                        self.header_name_end(p)?;
                        self.state = State::HeaderValueStart;
                    }
                    _ if self.is_header_char(byte) => self.header_name_byte(byte),
                    _ => return Err(Stop::new(p, Error::InvalidHeaderToken)),
                },

                State::HeaderValueStart => match byte {
                    b' ' | b'\t' => {}
                    CR | LF => {
                        if byte == LF {
                            self.bare_lf(p)?;
                        }
                        self.marks.set(Span::HeaderValue, p);
                        self.value_done(data, p)?;
                        self.state = if byte == CR {
                            State::HeaderValueLf
                        } else {
                            State::HeaderFieldStart
                        };
                    }
                    _ => {
                        self.check_value_char(byte, p)?;
                        self.marks.set(Span::HeaderValue, p);
                        self.header_value_byte(byte, p)?;
                        self.state = State::HeaderValue;
                    }
                },

                State::HeaderValue => match byte {
                    CR => {
                        self.value_done(data, p)?;
                        self.state = State::HeaderValueLf;
                    }
                    LF => {
                        self.bare_lf(p)?;
                        self.value_done(data, p)?;
                        self.state = State::HeaderFieldStart;
                    }
                    _ => {
                        self.check_value_char(byte, p)?;
                        self.header_value_byte(byte, p)?;
                    }
                },

                State::HeaderValueLf => match byte {
                    LF => self.state = State::HeaderFieldStart,
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                State::HeadersLf => match byte {
                    LF => self.headers_done(mode, p)?,
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                // ---------------------------------------------------------
                // Body
                // ---------------------------------------------------------
                State::BodyIdentity => {
                    let remaining = self.content_length.unwrap_or(0) - self.body_read;
                    let len = clamp(remaining, data.len() - p);
                    self.body(data, p, len)?;
                    p += len;
                    if self.body_read == self.content_length.unwrap_or(0) {
                        self.complete(p - 1)?;
                    }
                    continue;
                }

                State::BodyIdentityEof => {
                    let len = data.len() - p;
                    self.body(data, p, len)?;
                    p += len;
                    continue;
                }

                State::ChunkSizeStart => match hex_value(byte) {
                    Some(digit) => {
                        self.chunk_remaining = digit;
                        self.state = State::ChunkSize;
                    }
                    None => return Err(Stop::new(p, Error::InvalidChunkSize)),
                },

                State::ChunkSize => match byte {
                    CR => self.state = State::ChunkSizeLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.chunk_size_done();
                    }
                    b';' | b' ' | b'\t' => self.state = State::ChunkExtension,
                    _ => {
                        let digit = hex_value(byte).ok_or_else(|| Stop::new(p, Error::InvalidChunkSize))?;
                        self.chunk_remaining = self
                            .chunk_remaining
                            .checked_mul(16)
                            .map(|n| n + digit)
                            .ok_or_else(|| Stop::new(p, Error::InvalidChunkSize))?;
                    }
                },

                State::ChunkExtension => match byte {
                    CR => self.state = State::ChunkSizeLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.chunk_size_done();
                    }
                    _ => {}
                },

                State::ChunkSizeLf => match byte {
                    LF => self.chunk_size_done(),
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                State::ChunkData => {
                    let len = clamp(self.chunk_remaining, data.len() - p);
                    self.body(data, p, len)?;
                    self.chunk_remaining -= len as u64;
                    p += len;
                    if self.chunk_remaining == 0 {
                        self.state = State::ChunkDataCr;
                    }
                    continue;
                }

                State::ChunkDataCr => match byte {
                    CR => self.state = State::ChunkDataLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.state = State::ChunkSizeStart;
                    }
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                State::ChunkDataLf => match byte {
                    LF => self.state = State::ChunkSizeStart,
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                State::TrailerStart => match byte {
                    CR => self.state = State::TrailersLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.complete(p)?;
                    }
                    _ => self.state = State::Trailer,
                },

                State::Trailer => match byte {
                    CR => self.state = State::TrailerLf,
                    LF => {
                        self.bare_lf(p)?;
                        self.state = State::TrailerStart;
                    }
                    _ => {}
                },

                State::TrailerLf => match byte {
                    LF => self.state = State::TrailerStart,
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },

                State::TrailersLf => match byte {
                    LF => self.complete(p)?,
                    _ => return Err(Stop::new(p, Error::LineEnding)),
                },
            }

            p += 1;
        }

        Ok(())
    }

    /// Space after the request target
    fn url_done(&mut self, data: &[u8], at: usize) -> Step<()> {
        self.deliver(Span::Url, data, at)?;
        self.index = 0;
        self.state = State::ReqHttp;
        Ok(())
    }

    /// Line end of a header value
    fn value_done(&mut self, data: &[u8], at: usize) -> Step<()> {
        self.deliver(Span::HeaderValue, data, at)?;
        self.header_value_end(at)
    }

    /// Zero-size chunk ends the body; trailers follow
    fn chunk_size_done(&mut self) {
        self.state = if self.chunk_remaining == 0 {
            State::TrailerStart
        } else {
            State::ChunkData
        };
    }

    /// One to three decimal digits of a version number
    fn version_digit(&mut self, current: u16, byte: u8, at: usize) -> Step<u16> {
        if !byte.is_ascii_digit() || self.index >= 3 {
            return Err(Stop::new(at, Error::InvalidVersion));
        }
        self.index += 1;
        Ok(current * 10 + u16::from(byte - b'0'))
    }

    fn is_url_char(&self, byte: u8) -> bool {
        (0x21..=0x7e).contains(&byte) || (!self.config.strict && byte >= 0x80)
    }

    fn is_header_char(&self, byte: u8) -> bool {
        if self.config.strict {
            is_token_char(byte)
        } else {
            !matches!(byte, CR | LF | b':') && byte >= 0x20 && byte != 0x7f
        }
    }

    fn check_value_char(&self, byte: u8, at: usize) -> Step<()> {
        let valid = if self.config.strict {
            byte == b'\t' || (byte >= 0x20 && byte != 0x7f)
        } else {
            byte != 0
        };
        if valid {
            Ok(())
        } else {
            Err(Stop::new(at, Error::InvalidHeaderValue))
        }
    }
}

/// RFC 7230 `tchar`
#[inline]
fn is_token_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
        )
}

#[inline]
fn is_method_char(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte == b'-' || byte == b'_'
}

#[inline]
fn hex_value(byte: u8) -> Option<u64> {
    (byte as char).to_digit(16).map(u64::from)
}

/// Smaller of a 64-bit remainder and an in-memory length
#[inline]
fn clamp(remaining: u64, available: usize) -> usize {
    usize::try_from(remaining).map_or(available, |r| r.min(available))
}

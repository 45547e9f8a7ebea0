//! Parser event hooks
//!
//! A [`Handler`] is the caller's context: the parser owns it and invokes one
//! method per structural event. Data hooks receive a slice borrowed from the
//! buffer passed to the current drive call; it cannot outlive that call, so a
//! logical token (URL, header value, body) may arrive as several consecutive
//! invocations that the handler has to concatenate itself.

use std::ops::ControlFlow;

use super::method::Method;
use super::state::Flags;

/// Hook return value. `Break` aborts parsing.
pub type Flow = ControlFlow<()>;

/// Continue parsing
pub const CONTINUE: Flow = ControlFlow::Continue(());

/// Abort parsing; the session faults with [`Error::Aborted`](crate::Error::Aborted)
pub const ABORT: Flow = ControlFlow::Break(());

/// Structural events, one per hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    MessageBegin,
    Path,
    QueryString,
    Url,
    Fragment,
    HeaderField,
    HeaderValue,
    HeadersComplete,
    Body,
    MessageComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::MessageBegin => "on_message_begin",
            Event::Path => "on_path",
            Event::QueryString => "on_query_string",
            Event::Url => "on_url",
            Event::Fragment => "on_fragment",
            Event::HeaderField => "on_header_field",
            Event::HeaderValue => "on_header_value",
            Event::HeadersComplete => "on_headers_complete",
            Event::Body => "on_body",
            Event::MessageComplete => "on_message_complete",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start-line facts and framing flags of the message being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHead {
    /// Request method (requests only; `None` for lenient unknown tokens)
    pub method: Option<Method>,
    /// Status code (responses only)
    pub status_code: u16,
    pub http_major: u16,
    pub http_minor: u16,
    pub flags: Flags,
}

impl MessageHead {
    /// Whether the connection may carry another message after this one.
    ///
    /// HTTP/1.1 is persistent unless `Connection: close` was seen; HTTP/1.0
    /// and earlier only with `Connection: keep-alive`. A body delimited by
    /// connection close is never persistent.
    pub fn should_keep_alive(&self) -> bool {
        if self.flags.until_eof() {
            return false;
        }
        if self.http_major > 1 || (self.http_major == 1 && self.http_minor >= 1) {
            !self.flags.connection_close()
        } else {
            self.flags.connection_keep_alive()
        }
    }
}

/// Event sink for a parser session.
///
/// Every method defaults to continuing, so implementors override only the
/// events they care about.
#[allow(unused_variables)]
pub trait Handler {
    fn on_message_begin(&mut self) -> Flow {
        CONTINUE
    }

    fn on_path(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    fn on_query_string(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    fn on_url(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    fn on_fragment(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    fn on_header_field(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    fn on_header_value(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    /// Fires once, after the blank line ending the header section
    fn on_headers_complete(&mut self, head: &MessageHead) -> Flow {
        CONTINUE
    }

    fn on_body(&mut self, data: &[u8]) -> Flow {
        CONTINUE
    }

    fn on_message_complete(&mut self, head: &MessageHead) -> Flow {
        CONTINUE
    }
}

/// Discards every event
impl Handler for () {}

impl<H: Handler + ?Sized> Handler for &mut H {
    fn on_message_begin(&mut self) -> Flow {
        (**self).on_message_begin()
    }

    fn on_path(&mut self, data: &[u8]) -> Flow {
        (**self).on_path(data)
    }

    fn on_query_string(&mut self, data: &[u8]) -> Flow {
        (**self).on_query_string(data)
    }

    fn on_url(&mut self, data: &[u8]) -> Flow {
        (**self).on_url(data)
    }

    fn on_fragment(&mut self, data: &[u8]) -> Flow {
        (**self).on_fragment(data)
    }

    fn on_header_field(&mut self, data: &[u8]) -> Flow {
        (**self).on_header_field(data)
    }

    fn on_header_value(&mut self, data: &[u8]) -> Flow {
        (**self).on_header_value(data)
    }

    fn on_headers_complete(&mut self, head: &MessageHead) -> Flow {
        (**self).on_headers_complete(head)
    }

    fn on_body(&mut self, data: &[u8]) -> Flow {
        (**self).on_body(data)
    }

    fn on_message_complete(&mut self, head: &MessageHead) -> Flow {
        (**self).on_message_complete(head)
    }
}

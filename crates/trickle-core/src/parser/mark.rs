//! Span bookkeeping for tokens that may straddle buffer boundaries

use super::handler::Event;

/// Tokens the parser delivers as data events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Span {
    Path = 0,
    QueryString = 1,
    Fragment = 2,
    Url = 3,
    HeaderField = 4,
    HeaderValue = 5,
}

impl Span {
    /// Flush order at the end of a buffer. URL components precede the URL
    /// itself, the same order they complete in.
    pub(crate) const ALL: [Span; 6] = [
        Span::Path,
        Span::QueryString,
        Span::Fragment,
        Span::Url,
        Span::HeaderField,
        Span::HeaderValue,
    ];

    pub(crate) fn event(self) -> Event {
        match self {
            Span::Path => Event::Path,
            Span::QueryString => Event::QueryString,
            Span::Fragment => Event::Fragment,
            Span::Url => Event::Url,
            Span::HeaderField => Event::HeaderField,
            Span::HeaderValue => Event::HeaderValue,
        }
    }
}

/// Start offsets into the buffer of the current drive call, one per span.
///
/// An open mark survives the end of a call: the partial bytes are delivered
/// and the mark is rebased to offset 0 of the next buffer.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Marks([Option<usize>; 6]);

impl Marks {
    pub(crate) fn set(&mut self, span: Span, at: usize) {
        self.0[span as usize] = Some(at);
    }

    pub(crate) fn get(&self, span: Span) -> Option<usize> {
        self.0[span as usize]
    }

    /// Close the mark, returning where the token started in this buffer
    pub(crate) fn take(&mut self, span: Span) -> Option<usize> {
        self.0[span as usize].take()
    }

    /// Continue open tokens at the head of a fresh buffer
    pub(crate) fn rebase(&mut self) {
        for mark in self.0.iter_mut().flatten() {
            *mark = 0;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.0 = [None; 6];
    }
}

//! Header recognition submachine
//!
//! Runs alongside ordinary field/value delivery and matches the handful of
//! headers that decide framing and persistence, one byte at a time and
//! case-insensitively, without materializing the name. `header_state` holds
//! what is being matched and `index` is the cursor into the literal.

use super::handler::Handler;
use super::state::Flags;
use super::{Parser, Stop};
use crate::Error;

/// Headers the parser itself needs to understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KnownHeader {
    Connection,
    ContentLength,
    TransferEncoding,
}

const KNOWN: [KnownHeader; 3] = [
    KnownHeader::Connection,
    KnownHeader::ContentLength,
    KnownHeader::TransferEncoding,
];

impl KnownHeader {
    /// Lower-case name
    fn name(self) -> &'static [u8] {
        match self {
            KnownHeader::Connection => b"connection",
            KnownHeader::ContentLength => b"content-length",
            KnownHeader::TransferEncoding => b"transfer-encoding",
        }
    }
}

/// Leading value tokens with framing or persistence meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueToken {
    Close,
    KeepAlive,
    Chunked,
}

impl ValueToken {
    fn literal(self) -> &'static [u8] {
        match self {
            ValueToken::Close => b"close",
            ValueToken::KeepAlive => b"keep-alive",
            ValueToken::Chunked => b"chunked",
        }
    }

    fn flag(self) -> Flags {
        match self {
            ValueToken::Close => Flags::CONNECTION_CLOSE,
            ValueToken::KeepAlive => Flags::CONNECTION_KEEP_ALIVE,
            ValueToken::Chunked => Flags::CHUNKED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderState {
    /// Uninteresting header, or recognition gave up
    General,
    /// Name is still a prefix of this known header
    Name(KnownHeader),
    /// Content-Length value; `index` counts digits
    ContentLength,
    /// Whitespace after Content-Length digits
    ContentLengthWs,
    /// Connection value, before its first token byte
    Connection,
    /// Transfer-Encoding value, before its first token byte
    TransferEncoding,
    /// Matching a value token; `index` is the cursor
    Token(ValueToken),
}

#[inline]
fn is_ws(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

impl<H: Handler> Parser<H> {
    /// First byte of a header field name
    pub(super) fn header_name_start(&mut self, byte: u8) {
        let lower = byte.to_ascii_lowercase();
        match KNOWN.iter().find(|h| h.name()[0] == lower) {
            Some(&known) => {
                self.header_state = HeaderState::Name(known);
                self.index = 1;
            }
            None => self.header_state = HeaderState::General,
        }
    }

    /// Subsequent header name bytes
    pub(super) fn header_name_byte(&mut self, byte: u8) {
        let HeaderState::Name(current) = self.header_state else {
            return;
        };
        let lower = byte.to_ascii_lowercase();
        let index = self.index;
        let prefix = &current.name()[..index.min(current.name().len())];

        let next = KNOWN.iter().copied().find(|h| {
            let name = h.name();
            name.len() > index && name[..index] == *prefix && name[index] == lower
        });
        match next {
            Some(known) => {
                self.header_state = HeaderState::Name(known);
                self.index += 1;
            }
            None => self.header_state = HeaderState::General,
        }
    }

    /// The ':' ending a header name
    pub(super) fn header_name_end(&mut self, at: usize) -> Result<(), Stop> {
        let known = match self.header_state {
            HeaderState::Name(known) if self.index == known.name().len() => known,
            _ => {
                self.header_state = HeaderState::General;
                return Ok(());
            }
        };

        self.index = 0;
        self.header_state = match known {
            KnownHeader::Connection => HeaderState::Connection,
            KnownHeader::TransferEncoding => HeaderState::TransferEncoding,
            KnownHeader::ContentLength => {
                if self.config.strict && self.flags.content_length() {
                    return Err(Stop::new(at, Error::InvalidContentLength));
                }
                self.flags.insert(Flags::CONTENT_LENGTH);
                self.content_length = None;
                HeaderState::ContentLength
            }
        };
        Ok(())
    }

    /// One byte of a header value, fed after leading whitespace is skipped.
    /// Continuation lines feed a single space first.
    pub(super) fn header_value_byte(&mut self, byte: u8, at: usize) -> Result<(), Stop> {
        let strict = self.config.strict;
        match self.header_state {
            HeaderState::General | HeaderState::Name(_) => {}

            HeaderState::ContentLength => {
                if byte.is_ascii_digit() {
                    let digit = u64::from(byte - b'0');
                    let length = self
                        .content_length
                        .unwrap_or(0)
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                        .ok_or_else(|| Stop::new(at, Error::InvalidContentLength))?;
                    self.content_length = Some(length);
                    self.index += 1;
                } else if is_ws(byte) {
                    if self.index > 0 {
                        self.header_state = HeaderState::ContentLengthWs;
                    }
                } else if strict {
                    return Err(Stop::new(at, Error::InvalidContentLength));
                } else {
                    self.header_state = HeaderState::General;
                }
            }

            HeaderState::ContentLengthWs => {
                if !is_ws(byte) {
                    if strict {
                        return Err(Stop::new(at, Error::InvalidContentLength));
                    }
                    self.header_state = HeaderState::General;
                }
            }

            HeaderState::Connection => match byte.to_ascii_lowercase() {
                b'c' => self.start_token(ValueToken::Close),
                b'k' => self.start_token(ValueToken::KeepAlive),
                _ if is_ws(byte) => {}
                _ => self.header_state = HeaderState::General,
            },

            HeaderState::TransferEncoding => match byte.to_ascii_lowercase() {
                b'c' => self.start_token(ValueToken::Chunked),
                _ if is_ws(byte) => {}
                _ => self.header_state = HeaderState::General,
            },

            HeaderState::Token(token) => {
                let literal = token.literal();
                if self.index < literal.len() && byte.to_ascii_lowercase() == literal[self.index] {
                    self.index += 1;
                } else {
                    if self.index == literal.len() && (is_ws(byte) || byte == b',') {
                        self.flags.insert(token.flag());
                    }
                    self.header_state = HeaderState::General;
                }
            }
        }
        Ok(())
    }

    /// Line end of a header value
    pub(super) fn header_value_end(&mut self, at: usize) -> Result<(), Stop> {
        match self.header_state {
            HeaderState::ContentLength if self.index == 0 && self.config.strict => {
                return Err(Stop::new(at, Error::InvalidContentLength));
            }
            HeaderState::Token(token) => {
                if self.index == token.literal().len() {
                    self.flags.insert(token.flag());
                }
                self.header_state = HeaderState::General;
            }
            _ => {}
        }
        Ok(())
    }

    fn start_token(&mut self, token: ValueToken) {
        self.header_state = HeaderState::Token(token);
        self.index = 1;
    }
}

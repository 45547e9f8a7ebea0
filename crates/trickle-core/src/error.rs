//! Error types for trickle-core

use crate::parser::Event;
use thiserror::Error;

/// Result type alias for trickle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a parser session stops before consuming its whole input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Method token is not one the active policy accepts
    #[error("Invalid HTTP method")]
    InvalidMethod,

    /// Malformed request target
    #[error("Invalid request target")]
    InvalidUrl,

    /// Malformed `HTTP/x.y` version
    #[error("Invalid HTTP version")]
    InvalidVersion,

    /// Malformed response status code
    #[error("Invalid status code")]
    InvalidStatus,

    /// Byte not allowed in a header field name
    #[error("Invalid header field token")]
    InvalidHeaderToken,

    /// Byte not allowed in a header field value
    #[error("Invalid header value")]
    InvalidHeaderValue,

    /// Content-Length is not a base-10 integer, overflows, or repeats
    #[error("Invalid Content-Length")]
    InvalidContentLength,

    /// Both Content-Length and chunked transfer coding present
    #[error("Content-Length conflicts with chunked Transfer-Encoding")]
    ConflictingFraming,

    /// Malformed chunk-size line
    #[error("Invalid chunk size")]
    InvalidChunkSize,

    /// Missing or bare line terminator
    #[error("Expected CRLF line ending")]
    LineEnding,

    /// Start line plus headers exceeded the configured limit
    #[error("Header section exceeds {limit} bytes")]
    HeaderOverflow { limit: usize },

    /// An event hook asked to stop
    #[error("Parsing aborted by {0} callback")]
    Aborted(Event),

    /// End of stream signalled in the middle of a message
    #[error("Connection closed before message was complete")]
    UnexpectedEof,

    /// Session used again after a failure without `init()`
    #[error("Parser is faulted; call init() before reuse")]
    Faulted,
}

impl Error {
    /// Whether the failure came from an event hook rather than the input bytes
    pub fn is_abort(&self) -> bool {
        matches!(self, Error::Aborted(_))
    }
}

//! trickle-core: Incremental HTTP/1.x message parser
//!
//! A resumable, allocation-free state machine that consumes bytes in
//! arbitrarily sized chunks and reports what it finds through a
//! caller-supplied [`Handler`]. It never performs I/O and never owns the
//! buffers it is given.
//!
//! ## Modules
//! - `parser` - Byte-level state machine, header recognition, body framing
//! - `config` - Strict/lenient policy and header size limit
//! - `collect` - Handler that assembles owned messages
//!
//! One [`Parser`] serves one connection. Sessions share nothing, so
//! separate connections can be parsed on separate threads freely.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod collect;
pub mod config;
pub mod error;
pub mod parser;

// Re-exports
pub use collect::{Collector, Message};
pub use config::{ParserConfig, DEFAULT_MAX_HEADER_SIZE};
pub use error::{Error, Result};
pub use parser::{Event, Flags, Flow, Handler, MessageHead, Method, Parser, ABORT, CONTINUE};

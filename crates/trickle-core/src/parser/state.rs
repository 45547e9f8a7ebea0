//! Parser states and per-message flags

/// Position in the grammar. Variants are ordered by phase; within one
/// message the parser only ever moves to the same or a later phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum State {
    /// Failed; nothing is accepted until `init()`
    Dead,
    /// Between messages
    Start,

    // Request line
    Method,
    /// Lenient mode: unrecognized method token
    MethodToken,
    UrlStart,
    UrlSchema,
    UrlSchemaSlash,
    UrlSchemaSlashSlash,
    UrlHost,
    Path,
    QueryString,
    Fragment,
    /// Asterisk-form target, only a space may follow
    UrlEnd,
    ReqHttp,
    ReqHttpMajor,
    ReqHttpMinor,

    // Status line
    ResHttp,
    ResHttpMajor,
    ResHttpMinor,
    ResStatus,
    ResReason,

    /// Expecting LF after the start line's CR
    StartLineLf,

    // Header section
    HeaderFieldStart,
    HeaderField,
    HeaderValueStart,
    HeaderValue,
    HeaderValueLf,
    HeadersLf,

    // Body
    BodyIdentity,
    BodyIdentityEof,
    ChunkSizeStart,
    ChunkSize,
    ChunkExtension,
    ChunkSizeLf,
    ChunkData,
    ChunkDataCr,
    ChunkDataLf,
    TrailerStart,
    Trailer,
    TrailerLf,
    TrailersLf,
}

impl State {
    /// Start line or header section, where the size limit applies
    pub(crate) fn in_head(self) -> bool {
        !matches!(self, State::Dead | State::Start) && (self as u8) < (State::BodyIdentity as u8)
    }
}

/// Transient facts discovered while parsing one message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const CHUNKED: Flags = Flags(1);
    pub const CONNECTION_KEEP_ALIVE: Flags = Flags(1 << 1);
    pub const CONNECTION_CLOSE: Flags = Flags(1 << 2);
    /// A Content-Length header was recognized
    pub const CONTENT_LENGTH: Flags = Flags(1 << 3);
    /// Body runs until the caller signals end of stream
    pub const UNTIL_EOF: Flags = Flags(1 << 4);
    /// At least one header line seen; allows continuation lines
    pub(crate) const HEADER_SEEN: Flags = Flags(1 << 5);

    pub fn empty() -> Self {
        Flags(0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    pub fn chunked(&self) -> bool {
        self.contains(Flags::CHUNKED)
    }

    pub fn connection_close(&self) -> bool {
        self.contains(Flags::CONNECTION_CLOSE)
    }

    pub fn connection_keep_alive(&self) -> bool {
        self.contains(Flags::CONNECTION_KEEP_ALIVE)
    }

    pub fn content_length(&self) -> bool {
        self.contains(Flags::CONTENT_LENGTH)
    }

    pub fn until_eof(&self) -> bool {
        self.contains(Flags::UNTIL_EOF)
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

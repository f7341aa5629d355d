//! Error and reason-code types shared across the frame, HPACK, and
//! session layers.
//!
//! The split mirrors the teacher crate's `ConnectionError` /
//! `frame::Error` / `hpack::DecoderError` separation: a connection-fatal
//! `Reason` (an HTTP/2 error code), a stream-fatal variant carrying the
//! same code plus the offending stream id, and parse-level errors that
//! get folded into one of the two above before they ever reach a caller.

use crate::frame::StreamId;

/// HTTP/2 error codes (RFC 7540 §7), reused verbatim as QUIC/HTTP-3
/// application error codes when this session runs over a QUIC
/// transport (the numeric values differ there, see [`Reason::to_h3`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Reason {
    NoError = 0x0,
    ProtocolError = 0x1,
    InternalError = 0x2,
    FlowControlError = 0x3,
    SettingsTimeout = 0x4,
    StreamClosed = 0x5,
    FrameSizeError = 0x6,
    RefusedStream = 0x7,
    Cancel = 0x8,
    CompressionError = 0x9,
    ConnectError = 0xa,
    EnhanceYourCalm = 0xb,
    InadequateSecurity = 0xc,
    Http11Required = 0xd,
}

impl Reason {
    pub fn new(code: u32) -> Reason {
        match code {
            0x0 => Reason::NoError,
            0x1 => Reason::ProtocolError,
            0x2 => Reason::InternalError,
            0x3 => Reason::FlowControlError,
            0x4 => Reason::SettingsTimeout,
            0x5 => Reason::StreamClosed,
            0x6 => Reason::FrameSizeError,
            0x7 => Reason::RefusedStream,
            0x8 => Reason::Cancel,
            0x9 => Reason::CompressionError,
            0xa => Reason::ConnectError,
            0xb => Reason::EnhanceYourCalm,
            0xc => Reason::InadequateSecurity,
            0xd => Reason::Http11Required,
            // Unknown codes fold to INTERNAL_ERROR rather than panicking;
            // the wire value is preserved in `Reason::Unknown` territory
            // is not modeled to keep the enum exhaustive and table-driven.
            _ => Reason::InternalError,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Maps an HTTP/2 error code to the corresponding HTTP/3 application
    /// error code (RFC 9114 §8.1), used when the same session logic is
    /// driven from the QUIC adapter instead of a TCP transport.
    pub fn to_h3(self) -> u64 {
        match self {
            Reason::NoError => 0x100,
            Reason::InternalError => 0x102,
            Reason::RefusedStream => 0x103,
            Reason::FlowControlError => 0x107,
            Reason::SettingsTimeout => 0x109,
            Reason::StreamClosed => 0x10a,
            Reason::FrameSizeError => 0x106,
            Reason::CompressionError => 0x200,
            Reason::ConnectError => 0x10f,
            Reason::EnhanceYourCalm => 0x10c,
            Reason::ProtocolError | Reason::Cancel | Reason::InadequateSecurity | Reason::Http11Required => 0x101,
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A connection-fatal error: the session must send GOAWAY (or close
/// outright for transport-fatal cases) and stop processing frames.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("connection error: {0}")]
    Connection(Reason),

    #[error("transport-fatal: {0}")]
    TransportFatal(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn reason(&self) -> Option<Reason> {
        match self {
            Error::Connection(r) => Some(*r),
            _ => None,
        }
    }
}

/// Outcome of attempting to process an inbound frame: either the
/// connection as a whole is doomed, or only one stream is affected.
#[derive(Debug, thiserror::Error)]
pub enum RecvError {
    #[error("connection error: {0}")]
    Connection(Reason),

    #[error("stream {id:?} error: {reason}")]
    Stream { id: StreamId, reason: Reason },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors a caller can make while driving the send path (as opposed to
/// protocol violations observed on the wire).
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum UserError {
    #[error("the stream ID is no longer valid")]
    InactiveStreamId,

    #[error("the stream is not currently in a state that permits this action")]
    UnexpectedFrameType,

    #[error("the payload is too big for the configured max frame size")]
    PayloadTooBig,

    #[error("the application attempted to send a header twice")]
    DuplicatePseudoHeader,

    #[error("the application attempted to send a malformed header")]
    MalformedHeaders,

    #[error("a non-pseudo header was sent before a pseudo header")]
    MisorderedHeaders,

    #[error("the application attempted to send an invalid stream dependency ID")]
    InvalidDependencyId,

    #[error("send-end-stream has already been set; no more frames may be sent")]
    StreamClosed,
}

impl From<UserError> for RecvError {
    fn from(_: UserError) -> Self {
        RecvError::Connection(Reason::InternalError)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Connection(#[from] Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

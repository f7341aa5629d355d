//! HTTP/2 frame types (RFC 7540 §4, §6) plus the wire-level parse/encode
//! routines shared by the read and write halves of the codec.
//!
//! Module layout mirrors the teacher crate's `frame/` directory
//! (`head`, `data`, `headers`, `ping`, `reset`, `settings`, `util`), with
//! `priority`, `goaway`, and `window_update` split out as their own
//! files the way modern descendants of the teacher do.

mod data;
mod goaway;
mod head;
mod headers;
mod ping;
mod priority;
mod reset;
mod settings;
mod util;
mod window_update;

pub use self::data::Data;
pub use self::goaway::GoAway;
pub use self::head::{Head, Kind, StreamId};
pub use self::headers::{Continuation, Headers, HeadersFlag, Pseudo, PushPromise};
pub use self::ping::Ping;
pub use self::priority::{Priority, StreamDependency};
pub use self::reset::Reset;
pub use self::settings::{Settings, SettingsParameter};
pub use self::window_update::WindowUpdate;

pub use crate::error::Reason;

pub const HEADER_LEN: usize = 9;

pub const DEFAULT_SETTINGS_HEADER_TABLE_SIZE: usize = 4_096;
pub const DEFAULT_INITIAL_WINDOW_SIZE: u32 = 65_535;
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 16_384;
pub const MAX_MAX_FRAME_SIZE: u32 = (1 << 24) - 1;
pub const MAX_WINDOW_SIZE: u32 = (1 << 31) - 1;

/// Any parsed frame, tagged with its `Kind`.
///
/// `B` is the outbound payload buffer type; inbound frames always carry
/// `bytes::Bytes`.
#[derive(Debug)]
pub enum Frame<B = bytes::Bytes> {
    Data(Data<B>),
    Headers(Headers),
    Priority(Priority),
    Reset(Reset),
    Settings(Settings),
    PushPromise(PushPromise),
    Ping(Ping),
    GoAway(GoAway),
    WindowUpdate(WindowUpdate),
}

impl<B> Frame<B> {
    pub fn stream_id(&self) -> StreamId {
        match self {
            Frame::Data(f) => f.stream_id(),
            Frame::Headers(f) => f.stream_id(),
            Frame::Priority(f) => f.stream_id(),
            Frame::Reset(f) => f.stream_id(),
            Frame::Settings(_) => StreamId::ZERO,
            Frame::PushPromise(f) => f.stream_id(),
            Frame::Ping(_) => StreamId::ZERO,
            Frame::GoAway(_) => StreamId::ZERO,
            Frame::WindowUpdate(f) => f.stream_id(),
        }
    }
}

/// Errors while parsing a single frame out of an already length-delimited
/// buffer. These never escape the codec: every variant is folded into a
/// connection- or stream-level [`crate::error::RecvError`] by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("frame header was truncated")]
    Short,

    #[error("unsupported flag bits set")]
    BadFlag,

    #[error("unrecognized frame kind")]
    BadKind,

    #[error("PING payload must be exactly 8 octets")]
    BadFrameSize,

    #[error("padding length exceeds the frame payload length")]
    TooMuchPadding,

    #[error("frame payload shorter than the flags imply")]
    PayloadLengthTooShort,

    #[error("SETTINGS payload length is not a multiple of 6")]
    PartialSettingLength,

    #[error("frame payload length invalid for this frame kind")]
    InvalidPayloadLength,

    #[error("ACK SETTINGS frame carried a non-empty payload")]
    InvalidPayloadAckSettings,

    #[error("frame carried a stream id where zero was required, or vice versa")]
    InvalidStreamId,

    #[error("a stream cannot depend on itself")]
    InvalidDependencyId,

    #[error("header block was malformed")]
    MalformedMessage,

    #[error("HPACK decoding failed: {0}")]
    Hpack(#[from] crate::hpack::DecoderError),
}

impl From<Error> for Reason {
    fn from(src: Error) -> Reason {
        match src {
            Error::BadFrameSize | Error::InvalidPayloadLength | Error::PartialSettingLength
            | Error::InvalidPayloadAckSettings | Error::TooMuchPadding | Error::PayloadLengthTooShort => {
                Reason::FrameSizeError
            }
            Error::Hpack(_) | Error::MalformedMessage => Reason::CompressionError,
            _ => Reason::ProtocolError,
        }
    }
}

//! HPACK header compression (RFC 7541): the static and dynamic tables,
//! integer/string primitives, Huffman coding, and the stateful
//! [`Encoder`]/[`Decoder`] pair that a connection keeps one of per
//! direction.

mod decoder;
mod encoder;
mod huffman;
mod primitive;
mod static_table;
mod table;

pub use decoder::Decoder;
pub use encoder::Encoder;

use bytes::Bytes;

/// A single decoded or to-be-encoded header field.
///
/// Pseudo-headers (`:method`, `:path`, ...) are represented the same way
/// as regular fields here; `crate::frame::headers::Pseudo` is what
/// interprets them into typed fields once a full header block has been
/// reassembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: Bytes,
    pub value: Bytes,
    /// "Literal Header Field Never Indexed" (RFC 7541 §6.2.3): the field
    /// carries sensitive data and must be re-encoded the same way on
    /// every hop, never inserted into a dynamic table.
    pub sensitive: bool,
}

impl Header {
    pub fn new(name: Bytes, value: Bytes) -> Header {
        Header { name, value, sensitive: false }
    }

    pub fn sensitive(name: Bytes, value: Bytes) -> Header {
        Header { name, value, sensitive: true }
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum DecoderError {
    #[error("incomplete header block")]
    NeedMore,
    #[error("integer overflowed representable range")]
    IntegerOverflow,
    #[error("invalid Huffman code")]
    InvalidHuffmanCode,
    #[error("invalid representation type")]
    InvalidRepresentation,
    #[error("index out of range of the static and dynamic tables")]
    InvalidIndex,
    #[error("dynamic table size update must precede any header fields in the block")]
    TableSizeUpdateNotAtHead,
    #[error("dynamic table size update exceeds the negotiated maximum")]
    TableSizeUpdateTooLarge,
}

use bytes::BufMut;

use super::util::unpack_octets_4;
use super::{Error, Head, Kind, StreamId};

/// WINDOW_UPDATE (RFC 7540 §6.9): a 31-bit increment, connection-level
/// when `stream_id == 0`, stream-level otherwise.
#[derive(Debug)]
pub struct WindowUpdate {
    stream_id: StreamId,
    increment: u32,
}

impl WindowUpdate {
    pub fn new(stream_id: StreamId, increment: u32) -> Self {
        WindowUpdate { stream_id, increment }
    }

    pub fn load(head: Head, payload: &[u8]) -> Result<Self, Error> {
        if payload.len() != 4 {
            return Err(Error::InvalidPayloadLength);
        }
        let increment = unpack_octets_4(payload) & !(1 << 31);
        if increment == 0 {
            // A zero increment is a PROTOCOL_ERROR (connection- or
            // stream-level depending on `stream_id`); the caller
            // distinguishes the two using `stream_id()`.
            return Err(Error::InvalidPayloadLength);
        }
        Ok(WindowUpdate { stream_id: head.stream_id(), increment })
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn size_increment(&self) -> u32 {
        self.increment
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let head = Head::new(Kind::WindowUpdate, 0, self.stream_id);
        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(4, &mut hdr);
        dst.put_slice(&hdr);
        dst.put_u32(self.increment);
    }
}

impl<B> From<WindowUpdate> for super::Frame<B> {
    fn from(src: WindowUpdate) -> Self {
        super::Frame::WindowUpdate(src)
    }
}

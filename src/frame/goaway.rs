use bytes::{BufMut, Bytes};

use crate::error::Reason;

use super::util::unpack_octets_4;
use super::{Error, Head, Kind, StreamId};

/// GOAWAY (RFC 7540 §6.8): signals connection shutdown and the highest
/// peer-initiated stream id the sender will process.
#[derive(Debug)]
pub struct GoAway {
    last_stream_id: StreamId,
    error_code: Reason,
    debug_data: Bytes,
}

impl GoAway {
    pub fn new(last_stream_id: StreamId, error_code: Reason) -> Self {
        GoAway { last_stream_id, error_code, debug_data: Bytes::new() }
    }

    pub fn with_debug_data(mut self, data: Bytes) -> Self {
        self.debug_data = data;
        self
    }

    pub fn load(payload: &[u8]) -> Result<Self, Error> {
        if payload.len() < 8 {
            return Err(Error::InvalidPayloadLength);
        }
        let last_stream_id = StreamId::new(unpack_octets_4(&payload[0..4]));
        let error_code = Reason::new(unpack_octets_4(&payload[4..8]));
        let debug_data = Bytes::copy_from_slice(&payload[8..]);
        Ok(GoAway { last_stream_id, error_code, debug_data })
    }

    pub fn last_stream_id(&self) -> StreamId {
        self.last_stream_id
    }

    pub fn reason(&self) -> Reason {
        self.error_code
    }

    pub fn debug_data(&self) -> &Bytes {
        &self.debug_data
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let head = Head::new(Kind::GoAway, 0, StreamId::ZERO);
        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(8 + self.debug_data.len(), &mut hdr);
        dst.put_slice(&hdr);
        dst.put_u32(u32::from(self.last_stream_id));
        dst.put_u32(self.error_code.as_u32());
        dst.put_slice(&self.debug_data);
    }
}

impl<B> From<GoAway> for super::Frame<B> {
    fn from(src: GoAway) -> Self {
        super::Frame::GoAway(src)
    }
}

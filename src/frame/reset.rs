use bytes::BufMut;

use crate::error::Reason;

use super::util::unpack_octets_4;
use super::{Error, Head, Kind, StreamId};

/// RST_STREAM (RFC 7540 §6.4): carries a 4-octet error code.
#[derive(Debug)]
pub struct Reset {
    stream_id: StreamId,
    error_code: Reason,
}

impl Reset {
    pub fn new(stream_id: StreamId, error_code: Reason) -> Self {
        Reset { stream_id, error_code }
    }

    pub fn load(head: Head, payload: &[u8]) -> Result<Self, Error> {
        if payload.len() != 4 {
            return Err(Error::InvalidPayloadLength);
        }
        if head.stream_id().is_zero() {
            return Err(Error::InvalidStreamId);
        }
        let error_code = Reason::new(unpack_octets_4(payload));
        Ok(Reset { stream_id: head.stream_id(), error_code })
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn reason(&self) -> Reason {
        self.error_code
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let head = Head::new(Kind::Reset, 0, self.stream_id);
        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(4, &mut hdr);
        dst.put_slice(&hdr);
        dst.put_u32(self.error_code.as_u32());
    }
}

impl<B> From<Reset> for super::Frame<B> {
    fn from(src: Reset) -> Self {
        super::Frame::Reset(src)
    }
}

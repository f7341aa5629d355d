use bytes::{BufMut, Bytes};

use super::{Error, Head, Kind, StreamId};

const ACK_FLAG: u8 = 0x1;

pub type PingPayload = [u8; 8];

/// PING (RFC 7540 §6.7): 8 octets of opaque data, echoed back with the
/// ACK flag set.
#[derive(Debug)]
pub struct Ping {
    ack: bool,
    payload: PingPayload,
}

impl Ping {
    pub fn ping(payload: PingPayload) -> Ping {
        Ping { ack: false, payload }
    }

    pub fn pong(payload: PingPayload) -> Ping {
        Ping { ack: true, payload }
    }

    pub fn is_ack(&self) -> bool {
        self.ack
    }

    pub fn payload(&self) -> &PingPayload {
        &self.payload
    }

    pub fn into_payload(self) -> PingPayload {
        self.payload
    }

    pub fn load(head: Head, payload: Bytes) -> Result<Ping, Error> {
        if !head.stream_id().is_zero() {
            return Err(Error::InvalidStreamId);
        }
        if payload.len() != 8 {
            return Err(Error::BadFrameSize);
        }
        let ack = head.flag() & ACK_FLAG != 0;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&payload);
        Ok(Ping { ack, payload: buf })
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let flags = if self.ack { ACK_FLAG } else { 0 };
        let head = Head::new(Kind::Ping, flags, StreamId::ZERO);

        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(8, &mut hdr);
        dst.put_slice(&hdr);
        dst.put_slice(&self.payload);
    }
}

impl<B> From<Ping> for super::Frame<B> {
    fn from(src: Ping) -> super::Frame<B> {
        super::Frame::Ping(src)
    }
}

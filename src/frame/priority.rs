use bytes::BufMut;

use super::util::unpack_octets_4;
use super::{Error, Head, Kind, StreamId};

/// The 5-octet stream-dependency structure shared by HEADERS (when the
/// PRIORITY flag is set) and standalone PRIORITY frames.
#[derive(Debug, Clone, Copy)]
pub struct StreamDependency {
    dependency_id: StreamId,
    /// Exposed in `[0, 255]`; the wire value is `weight - 1` per RFC
    /// 7540 §5.3.2, the actual weight used for weighted-fair queuing is
    /// `[1, 256]`.
    weight: u8,
    is_exclusive: bool,
}

impl StreamDependency {
    pub fn new(dependency_id: StreamId, weight: u8, is_exclusive: bool) -> Self {
        StreamDependency { dependency_id, weight, is_exclusive }
    }

    pub fn load(buf: &[u8]) -> Result<Self, Error> {
        if buf.len() < 5 {
            return Err(Error::PayloadLengthTooShort);
        }
        let raw = unpack_octets_4(&buf[0..4]);
        let is_exclusive = raw & (1 << 31) != 0;
        let dependency_id = StreamId::new(raw);
        let weight = buf[4];
        Ok(StreamDependency { dependency_id, weight, is_exclusive })
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let mut raw = u32::from(self.dependency_id);
        if self.is_exclusive {
            raw |= 1 << 31;
        }
        dst.put_u32(raw);
        dst.put_u8(self.weight);
    }

    pub fn dependency_id(&self) -> StreamId {
        self.dependency_id
    }

    /// Weight in `[1, 256]`, per the priority-tree weighted-fair-queuing
    /// model in spec §4.2.
    pub fn weight(&self) -> u16 {
        self.weight as u16 + 1
    }

    pub fn is_exclusive(&self) -> bool {
        self.is_exclusive
    }
}

#[derive(Debug)]
pub struct Priority {
    stream_id: StreamId,
    dependency: StreamDependency,
}

impl Priority {
    pub fn new(stream_id: StreamId, dependency: StreamDependency) -> Self {
        Priority { stream_id, dependency }
    }

    pub fn load(head: Head, payload: &[u8]) -> Result<Self, Error> {
        let dependency = StreamDependency::load(payload)?;
        if dependency.dependency_id() == head.stream_id() {
            return Err(Error::InvalidDependencyId);
        }
        Ok(Priority { stream_id: head.stream_id(), dependency })
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn dependency(&self) -> StreamDependency {
        self.dependency
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let head = Head::new(Kind::Priority, 0, self.stream_id);
        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(5, &mut hdr);
        dst.put_slice(&hdr);
        self.dependency.encode(dst);
    }
}

impl<B> From<Priority> for super::Frame<B> {
    fn from(src: Priority) -> Self {
        super::Frame::Priority(src)
    }
}

use bytes::{Buf, BufMut, Bytes};

use super::{Error, Head, Kind, StreamId};

const END_STREAM: u8 = 0x1;
const PADDED: u8 = 0x8;

/// A DATA frame (RFC 7540 §6.1). `B` is `Bytes` for received frames and
/// the caller-chosen outbound buffer type for frames about to be sent.
#[derive(Debug)]
pub struct Data<B = Bytes> {
    stream_id: StreamId,
    data: B,
    flags: DataFlags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DataFlags(u8);

impl Data<Bytes> {
    pub fn load(head: Head, payload: Bytes) -> Result<Self, Error> {
        let flags = DataFlags(head.flag() & (END_STREAM | PADDED));
        let mut payload = payload;

        if flags.is_padded() {
            if payload.is_empty() {
                return Err(Error::TooMuchPadding);
            }
            let pad_len = payload[0] as usize;
            payload.advance(1);
            if pad_len > payload.len() {
                return Err(Error::TooMuchPadding);
            }
            payload.truncate(payload.len() - pad_len);
        }

        Ok(Data {
            stream_id: head.stream_id(),
            data: payload,
            flags,
        })
    }
}

impl<B> Data<B> {
    pub fn new(stream_id: StreamId, data: B, end_of_stream: bool) -> Data<B> {
        let mut flags = DataFlags::default();
        if end_of_stream {
            flags.set_end_stream();
        }
        Data { stream_id, data, flags }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags.is_end_stream()
    }

    pub fn payload(&self) -> &B {
        &self.data
    }

    pub fn into_payload(self) -> B {
        self.data
    }
}

impl<B: Buf> Data<B> {
    /// Encodes the frame header and payload to `dst`. The caller is
    /// responsible for having already sliced `data` down to at most
    /// `peer.MAX_FRAME_SIZE` bytes (flow-control slicing happens above
    /// this layer, in the write scheduler).
    pub fn encode(&mut self, dst: &mut impl BufMut) {
        let len = self.data.remaining();
        let flag = if self.flags.is_end_stream() { END_STREAM } else { 0 };
        let head = Head::new(Kind::Data, flag, self.stream_id);

        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(len, &mut hdr);
        dst.put_slice(&hdr);
        dst.put(&mut self.data);
    }
}

impl DataFlags {
    fn is_end_stream(self) -> bool {
        self.0 & END_STREAM == END_STREAM
    }

    fn set_end_stream(&mut self) {
        self.0 |= END_STREAM;
    }

    fn is_padded(self) -> bool {
        self.0 & PADDED == PADDED
    }
}

impl<B> From<Data<B>> for super::Frame<B> {
    fn from(src: Data<B>) -> Self {
        super::Frame::Data(src)
    }
}

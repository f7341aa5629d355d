//! Encodes outbound [`Frame`]s to wire bytes, splitting HEADERS and
//! PUSH_PROMISE blocks larger than `max_frame_size` into CONTINUATION
//! frames (RFC 7540 §6.2, §6.10).

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::Encoder;

use crate::frame::{self, Frame, Head, Kind};
use crate::hpack;

#[derive(Debug)]
pub struct FramedWrite {
    hpack: hpack::Encoder,
    max_frame_size: usize,
}

impl FramedWrite {
    pub fn new(max_frame_size: usize, header_table_size: usize) -> FramedWrite {
        FramedWrite { hpack: hpack::Encoder::new(header_table_size), max_frame_size }
    }

    pub fn set_max_frame_size(&mut self, val: usize) {
        self.max_frame_size = val;
    }

    pub fn hpack_encoder_mut(&mut self) -> &mut hpack::Encoder {
        &mut self.hpack
    }

    fn encode_headers(&mut self, headers: &frame::Headers, dst: &mut BytesMut) {
        let mut block = BytesMut::new();
        headers.encode(&mut self.hpack, &mut block);
        split_and_append(&block, self.max_frame_size, Kind::Headers, headers.stream_id(), dst);
    }

    fn encode_push_promise(&mut self, push: &frame::PushPromise, dst: &mut BytesMut) {
        let mut block = BytesMut::new();
        push.encode(&mut self.hpack, &mut block);
        split_and_append(&block, self.max_frame_size, Kind::PushPromise, push.stream_id(), dst);
    }
}

/// `block` already contains one fully-encoded HEADERS/PUSH_PROMISE frame
/// (header + payload). If its payload exceeds `max_frame_size`, re-chunk
/// it into that frame (truncated to `max_frame_size` of payload) plus
/// as many CONTINUATION frames as needed, preserving the original
/// flags except for `END_HEADERS`, which only the final frame carries.
fn split_and_append(block: &BytesMut, max_frame_size: usize, kind: Kind, stream_id: frame::StreamId, dst: &mut BytesMut) {
    let payload = &block[frame::HEADER_LEN..];
    if payload.len() <= max_frame_size {
        dst.extend_from_slice(block);
        return;
    }

    let original_flags = block[4];
    let fixed_prefix_len = if kind == Kind::PushPromise { 4 } else { 0 };

    let (first_chunk, rest) = payload.split_at(max_frame_size.max(fixed_prefix_len));
    let first_flags = original_flags & !0x4; // clear END_HEADERS
    write_frame_header(dst, kind, first_flags, stream_id, first_chunk.len());
    dst.extend_from_slice(first_chunk);

    let mut remaining = rest;
    while remaining.len() > max_frame_size {
        let (chunk, tail) = remaining.split_at(max_frame_size);
        write_frame_header(dst, Kind::Continuation, 0, stream_id, chunk.len());
        dst.extend_from_slice(chunk);
        remaining = tail;
    }
    write_frame_header(dst, Kind::Continuation, 0x4, stream_id, remaining.len());
    dst.extend_from_slice(remaining);
}

fn write_frame_header(dst: &mut BytesMut, kind: Kind, flags: u8, stream_id: frame::StreamId, len: usize) {
    let head = Head::new(kind, flags, stream_id);
    let mut hdr = [0u8; frame::HEADER_LEN];
    head.encode(len, &mut hdr);
    dst.extend_from_slice(&hdr);
}

impl Encoder<Frame<Bytes>> for FramedWrite {
    type Error = std::io::Error;

    fn encode(&mut self, item: Frame<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Frame::Data(mut f) => f.encode(dst),
            Frame::Headers(f) => self.encode_headers(&f, dst),
            Frame::PushPromise(f) => self.encode_push_promise(&f, dst),
            Frame::Priority(f) => f.encode(dst),
            Frame::Reset(f) => f.encode(dst),
            Frame::Settings(f) => f.encode(dst),
            Frame::Ping(f) => f.encode(dst),
            Frame::GoAway(f) => f.encode(dst),
            Frame::WindowUpdate(f) => f.encode(dst),
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::Bytes as B;
    use http::Method;

    #[test]
    fn large_header_block_splits_into_continuation() {
        let mut writer = FramedWrite::new(16, 4096);
        let mut fields = http::HeaderMap::new();
        fields.insert("x-long", "a-value-longer-than-sixteen-bytes".parse().unwrap());

        let pseudo = frame::Pseudo::request(Method::GET, None, None, B::from_static(b"/"));
        let headers = frame::Headers::new(frame::StreamId::from(1), pseudo, fields);

        let mut dst = BytesMut::new();
        writer.encode(Frame::Headers(headers), &mut dst).unwrap();

        let head = Head::parse(&dst[..frame::HEADER_LEN]);
        assert_eq!(head.kind(), Kind::Headers);
        assert_eq!(head.flag() & 0x4, 0);

        let len = frame::Head::parse_len(&dst[..frame::HEADER_LEN], u32::MAX).unwrap() as usize;
        let next = &dst[frame::HEADER_LEN + len..];
        let cont_head = Head::parse(&next[..frame::HEADER_LEN]);
        assert_eq!(cont_head.kind(), Kind::Continuation);
    }
}

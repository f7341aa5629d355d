//! The `tokio_util::codec` pair that turns an async byte stream into a
//! stream of [`crate::frame::Frame`]s and back.

mod framed_read;
mod framed_write;

pub use framed_read::FramedRead;
pub use framed_write::FramedWrite;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::RecvError;
use crate::frame::Frame;

/// Combines [`FramedRead`] and [`FramedWrite`] into the single
/// `Decoder + Encoder` pair `tokio_util::codec::Framed` wants, so the
/// session event loop drives one `Framed<T, Codec>` instead of juggling
/// a read half and a write half itself.
#[derive(Debug)]
pub struct Codec {
    read: FramedRead,
    write: FramedWrite,
}

impl Codec {
    pub fn new(max_frame_size: usize, header_table_size: usize) -> Codec {
        Codec { read: FramedRead::new(max_frame_size, header_table_size), write: FramedWrite::new(max_frame_size, header_table_size) }
    }

    pub fn set_max_recv_frame_size(&mut self, val: usize) {
        self.read.set_max_frame_size(val);
    }

    pub fn set_max_header_list_size(&mut self, val: usize) {
        self.read.set_max_header_list_size(val);
    }

    pub fn set_max_send_frame_size(&mut self, val: usize) {
        self.write.set_max_frame_size(val);
    }

    pub fn hpack_decoder_mut(&mut self) -> &mut crate::hpack::Decoder {
        self.read.hpack_decoder_mut()
    }

    pub fn hpack_encoder_mut(&mut self) -> &mut crate::hpack::Encoder {
        self.write.hpack_encoder_mut()
    }
}

impl Decoder for Codec {
    type Item = Frame;
    type Error = RecvError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, RecvError> {
        self.read.decode(src)
    }
}

impl Encoder<Frame<Bytes>> for Codec {
    type Error = std::io::Error;

    fn encode(&mut self, item: Frame<Bytes>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.write.encode(item, dst)
    }
}

//! Decodes a byte stream into [`Frame`]s: a 9-octet header, followed by
//! up to `max_frame_size` octets of payload (RFC 7540 §4.1), with
//! CONTINUATION frames transparently reassembled into their owning
//! HEADERS/PUSH_PROMISE block before a [`Frame`] is emitted.

use bytes::BytesMut;
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::error::RecvError;
use crate::frame::{self, Frame, Kind, StreamId};
use crate::hpack;

const DEFAULT_SETTINGS_MAX_HEADER_LIST_SIZE: usize = 16 << 20;

#[derive(Debug)]
pub struct FramedRead {
    hpack: hpack::Decoder,
    max_frame_size: usize,
    max_header_list_size: usize,
    partial: Option<Partial>,
}

#[derive(Debug)]
enum Continuable {
    Headers { stream_id: StreamId, flags: frame::HeadersFlag, stream_dep: Option<frame::StreamDependency> },
    PushPromise { stream_id: StreamId, promised_id: StreamId, flags: frame::HeadersFlag },
}

impl Continuable {
    fn stream_id(&self) -> StreamId {
        match *self {
            Continuable::Headers { stream_id, .. } => stream_id,
            Continuable::PushPromise { stream_id, .. } => stream_id,
        }
    }
}

#[derive(Debug)]
struct Partial {
    frame: Continuable,
    buf: BytesMut,
}

impl FramedRead {
    pub fn new(max_frame_size: usize, header_table_size: usize) -> FramedRead {
        FramedRead {
            hpack: hpack::Decoder::new(header_table_size),
            max_frame_size,
            max_header_list_size: DEFAULT_SETTINGS_MAX_HEADER_LIST_SIZE,
            partial: None,
        }
    }

    pub fn set_max_frame_size(&mut self, val: usize) {
        self.max_frame_size = val;
    }

    pub fn set_max_header_list_size(&mut self, val: usize) {
        self.max_header_list_size = val;
    }

    pub fn hpack_decoder_mut(&mut self) -> &mut hpack::Decoder {
        &mut self.hpack
    }

    fn decode_frame(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, RecvError> {
        use RecvError::*;

        if src.len() < frame::HEADER_LEN {
            return Ok(None);
        }

        let head = frame::Head::parse(&src[..frame::HEADER_LEN]);
        let payload_len = frame::Head::parse_len(&src[..frame::HEADER_LEN], self.max_frame_size as u32)
            .map_err(|e| Connection(e.into()))? as usize;

        if src.len() < frame::HEADER_LEN + payload_len {
            src.reserve(frame::HEADER_LEN + payload_len - src.len());
            return Ok(None);
        }

        if self.partial.is_some() && head.kind() != Kind::Continuation {
            debug!(?head, "expected CONTINUATION frame");
            return Err(Connection(crate::error::Reason::ProtocolError));
        }

        let mut frame_bytes = src.split_to(frame::HEADER_LEN + payload_len);
        let _ = frame_bytes.split_to(frame::HEADER_LEN);
        let payload = frame_bytes.freeze();

        trace!(kind = ?head.kind(), len = payload.len(), "decoded frame");

        let frame = match head.kind() {
            Kind::Settings => frame::Settings::load(head, &payload)
                .map_err(|e| Connection(e.into()))?
                .into(),
            Kind::Ping => frame::Ping::load(head, payload).map_err(|e| Connection(e.into()))?.into(),
            Kind::WindowUpdate => frame::WindowUpdate::load(head, &payload).map_err(|e| Connection(e.into()))?.into(),
            Kind::Data => frame::Data::load(head, payload).map_err(|e| Connection(e.into()))?.into(),
            Kind::Reset => frame::Reset::load(head, &payload).map_err(|e| Connection(e.into()))?.into(),
            Kind::GoAway => frame::GoAway::load(&payload).map_err(|e| Connection(e.into()))?.into(),
            Kind::Priority => match frame::Priority::load(head, &payload) {
                Ok(f) => f.into(),
                Err(frame::Error::InvalidDependencyId) => {
                    return Err(Stream { id: head.stream_id(), reason: crate::error::Reason::ProtocolError });
                }
                Err(e) => return Err(Connection(e.into())),
            },
            Kind::Headers => {
                if head.flag() & 0x4 != 0 {
                    match frame::Headers::load(head, payload, &mut self.hpack) {
                        Ok(f) => f.into(),
                        Err(frame::Error::InvalidDependencyId) => {
                            return Err(Stream { id: head.stream_id(), reason: crate::error::Reason::ProtocolError })
                        }
                        Err(e) => return Err(Connection(e.into())),
                    }
                } else {
                    let (flags, stream_dep, block) = frame::Headers::load_initial_fragment(head, payload)
                        .map_err(|e| Connection(e.into()))?;
                    self.partial = Some(Partial {
                        frame: Continuable::Headers { stream_id: head.stream_id(), flags, stream_dep },
                        buf: BytesMut::from(&block[..]),
                    });
                    return Ok(None);
                }
            }
            Kind::PushPromise => {
                if head.flag() & 0x4 != 0 {
                    frame::PushPromise::load(head, payload, &mut self.hpack).map_err(|e| Connection(e.into()))?.into()
                } else {
                    let (promised_id, flags, block) = frame::PushPromise::load_initial_fragment(head, payload)
                        .map_err(|e| Connection(e.into()))?;
                    self.partial = Some(Partial {
                        frame: Continuable::PushPromise { stream_id: head.stream_id(), promised_id, flags },
                        buf: BytesMut::from(&block[..]),
                    });
                    return Ok(None);
                }
            }
            Kind::Continuation => {
                let end_headers = head.flag() & 0x4 != 0;
                let mut partial = self.partial.take().ok_or_else(|| {
                    debug!("unexpected CONTINUATION frame");
                    Connection(crate::error::Reason::ProtocolError)
                })?;

                if partial.frame.stream_id() != head.stream_id() {
                    debug!(expected = ?partial.frame.stream_id(), got = ?head.stream_id(), "CONTINUATION on the wrong stream");
                    return Err(Connection(crate::error::Reason::ProtocolError));
                }

                partial.buf.extend_from_slice(&payload);
                if partial.buf.len() > self.max_header_list_size {
                    return Err(Connection(crate::error::Reason::EnhanceYourCalm));
                }

                if !end_headers {
                    self.partial = Some(partial);
                    return Ok(None);
                }

                let block = partial.buf.freeze();
                match partial.frame {
                    Continuable::Headers { stream_id, mut flags, stream_dep } => {
                        flags.set_end_headers();
                        frame::Headers::from_block(stream_id, flags, stream_dep, block, &mut self.hpack)
                            .map_err(|e| Connection(e.into()))?
                            .into()
                    }
                    Continuable::PushPromise { stream_id, promised_id, mut flags } => {
                        flags.set_end_headers();
                        frame::PushPromise::from_block(stream_id, promised_id, flags, block, &mut self.hpack)
                            .map_err(|e| Connection(e.into()))?
                            .into()
                    }
                }
            }
            Kind::Unknown => return Ok(None),
        };

        Ok(Some(frame))
    }
}

impl Decoder for FramedRead {
    type Item = Frame;
    type Error = RecvError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, RecvError> {
        loop {
            let before = src.len();
            match self.decode_frame(src)? {
                Some(frame) => return Ok(Some(frame)),
                None if src.len() == before => return Ok(None),
                None => continue,
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codec::FramedWrite;
    use bytes::Bytes as B;
    use http::Method;
    use tokio_util::codec::Encoder;

    #[test]
    fn continuation_on_a_different_stream_is_a_protocol_error() {
        let mut writer = FramedWrite::new(16, 4096);
        let mut fields = http::HeaderMap::new();
        fields.insert("x-long", "a-value-longer-than-sixteen-bytes".parse().unwrap());
        let pseudo = frame::Pseudo::request(Method::GET, None, None, B::from_static(b"/"));
        let headers = frame::Headers::new(StreamId::from(1), pseudo, fields);

        let mut dst = BytesMut::new();
        writer.encode(Frame::Headers(headers), &mut dst).unwrap();

        // the CONTINUATION frame's stream id lives at the same offset as
        // any other frame header's: bytes 5..9 of its own 9-octet header.
        let headers_len = frame::Head::parse_len(&dst[..frame::HEADER_LEN], u32::MAX).unwrap() as usize;
        let cont_header_start = frame::HEADER_LEN + headers_len;
        dst[cont_header_start + 5..cont_header_start + 9].copy_from_slice(&3u32.to_be_bytes());

        let mut reader = FramedRead::new(4096, 4096);
        let err = reader.decode(&mut dst).unwrap_err();
        assert!(matches!(err, RecvError::Connection(crate::error::Reason::ProtocolError)));
    }
}

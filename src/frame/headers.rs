use std::convert::TryFrom;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};

use crate::hpack;

use super::priority::StreamDependency;
use super::util::{pack_octets_3, unpack_octets_3};
use super::{Error, Head, Kind, StreamId};

const END_STREAM: u8 = 0x1;
const END_HEADERS: u8 = 0x4;
const PADDED: u8 = 0x8;
const PRIORITY: u8 = 0x20;
const ALL: u8 = END_STREAM | END_HEADERS | PADDED | PRIORITY;

/// Header names that carry hop-by-hop or connection-specific semantics
/// and must never appear in an HTTP/2 header block (RFC 7540 §8.1.2.2).
/// `transfer-encoding` is the single exception: it may appear with the
/// literal value `trailers`.
const DISALLOWED_CONNECTION_HEADERS: &[&str] =
    &["connection", "keep-alive", "proxy-connection", "upgrade"];

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub struct HeadersFlag(u8);

impl HeadersFlag {
    pub fn load(bits: u8) -> HeadersFlag {
        HeadersFlag(bits & ALL)
    }

    pub fn with_end_headers() -> HeadersFlag {
        HeadersFlag(END_HEADERS)
    }

    pub fn is_end_stream(self) -> bool {
        self.0 & END_STREAM == END_STREAM
    }

    pub fn set_end_stream(&mut self) {
        self.0 |= END_STREAM;
    }

    pub fn is_end_headers(self) -> bool {
        self.0 & END_HEADERS == END_HEADERS
    }

    pub fn set_end_headers(&mut self) {
        self.0 |= END_HEADERS;
    }

    pub fn is_padded(self) -> bool {
        self.0 & PADDED == PADDED
    }

    pub fn is_priority(self) -> bool {
        self.0 & PRIORITY == PRIORITY
    }
}

impl From<HeadersFlag> for u8 {
    fn from(src: HeadersFlag) -> u8 {
        src.0
    }
}

/// Request and response pseudo-headers, broken out of the header map
/// because they must precede regular fields in wire order and have
/// typed representations (RFC 7540 §8.1.2.1).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pseudo {
    pub method: Option<Method>,
    pub scheme: Option<Bytes>,
    pub authority: Option<Bytes>,
    pub path: Option<Bytes>,
    pub status: Option<StatusCode>,
}

impl Pseudo {
    pub fn request(method: Method, scheme: Option<Bytes>, authority: Option<Bytes>, path: Bytes) -> Pseudo {
        Pseudo { method: Some(method), scheme, authority, path: Some(path), status: None }
    }

    pub fn response(status: StatusCode) -> Pseudo {
        Pseudo { status: Some(status), ..Default::default() }
    }

    /// Trailers carry neither a request nor a response pseudo-header.
    pub fn is_trailers(&self) -> bool {
        self.method.is_none() && self.status.is_none()
    }
}

#[derive(Debug)]
pub struct Headers {
    stream_id: StreamId,
    stream_dep: Option<StreamDependency>,
    pseudo: Pseudo,
    fields: HeaderMap,
    flags: HeadersFlag,
}

impl Headers {
    pub fn new(stream_id: StreamId, pseudo: Pseudo, fields: HeaderMap) -> Headers {
        Headers { stream_id, stream_dep: None, pseudo, fields, flags: HeadersFlag::with_end_headers() }
    }

    pub fn trailers(stream_id: StreamId, fields: HeaderMap) -> Headers {
        let mut flags = HeadersFlag::with_end_headers();
        flags.set_end_stream();
        Headers { stream_id, stream_dep: None, pseudo: Pseudo::default(), fields, flags }
    }

    pub fn load(head: Head, payload: Bytes, decoder: &mut hpack::Decoder) -> Result<Headers, Error> {
        if head.stream_id().is_zero() {
            return Err(Error::InvalidStreamId);
        }
        let flags = HeadersFlag::load(head.flag());
        let (stream_dep, mut block) = strip_padding_and_priority(flags, payload)?;

        let decoded = decoder.decode(&mut block).map_err(Error::Hpack)?;
        let (pseudo, fields) = classify_decoded(decoded)?;

        Ok(Headers { stream_id: head.stream_id(), stream_dep, pseudo, fields, flags })
    }

    /// Parses only the padding/priority prefix of an initial HEADERS
    /// frame that does not carry `END_HEADERS`, returning the remaining
    /// (still HPACK-encoded) header-block fragment. Used by the frame
    /// decoder to buffer a block split across CONTINUATION frames.
    pub fn load_initial_fragment(head: Head, payload: Bytes) -> Result<(HeadersFlag, Option<StreamDependency>, Bytes), Error> {
        if head.stream_id().is_zero() {
            return Err(Error::InvalidStreamId);
        }
        let flags = HeadersFlag::load(head.flag());
        let (stream_dep, block) = strip_padding_and_priority(flags, payload)?;
        Ok((flags, stream_dep, block))
    }

    /// Completes a Headers frame from an accumulated (possibly
    /// CONTINUATION-joined) header block.
    pub fn from_block(
        stream_id: StreamId,
        flags: HeadersFlag,
        stream_dep: Option<StreamDependency>,
        mut block: Bytes,
        decoder: &mut hpack::Decoder,
    ) -> Result<Headers, Error> {
        let decoded = decoder.decode(&mut block).map_err(Error::Hpack)?;
        let (pseudo, fields) = classify_decoded(decoded)?;
        Ok(Headers { stream_id, stream_dep, pseudo, fields, flags })
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn stream_dependency(&self) -> Option<&StreamDependency> {
        self.stream_dep.as_ref()
    }

    pub fn is_end_headers(&self) -> bool {
        self.flags.is_end_headers()
    }

    pub fn is_end_stream(&self) -> bool {
        self.flags.is_end_stream()
    }

    pub fn set_end_stream(&mut self) {
        self.flags.set_end_stream();
    }

    pub fn is_trailers(&self) -> bool {
        self.pseudo.is_trailers()
    }

    pub fn pseudo(&self) -> &Pseudo {
        &self.pseudo
    }

    pub fn fields(&self) -> &HeaderMap {
        &self.fields
    }

    pub fn into_parts(self) -> (Pseudo, HeaderMap) {
        (self.pseudo, self.fields)
    }

    /// HPACK-encodes the full header block (pseudo-headers first, in the
    /// canonical order, then regular fields) into `dst`, without
    /// splitting across `max_frame_size` — callers that need
    /// CONTINUATION framing slice the result themselves.
    pub fn encode(&self, encoder: &mut hpack::Encoder, dst: &mut BytesMut) {
        let head = Head::new(Kind::Headers, self.flags.into(), self.stream_id);
        let pos = dst.len();
        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(0, &mut hdr);
        dst.extend_from_slice(&hdr);

        let headers = pseudo_then_fields(&self.pseudo, &self.fields);
        encoder.encode(headers.iter(), dst);

        let len = (dst.len() - pos) - super::HEADER_LEN;
        pack_octets_3(&mut dst[pos..pos + 3], len as u32);
    }
}

impl<B> From<Headers> for super::Frame<B> {
    fn from(src: Headers) -> Self {
        super::Frame::Headers(src)
    }
}

fn pseudo_then_fields(pseudo: &Pseudo, fields: &HeaderMap) -> Vec<hpack::Header> {
    let mut out = Vec::with_capacity(5 + fields.len());
    if let Some(method) = &pseudo.method {
        out.push(hpack::Header::new(Bytes::from_static(b":method"), Bytes::copy_from_slice(method.as_str().as_bytes())));
    }
    if let Some(scheme) = &pseudo.scheme {
        out.push(hpack::Header::new(Bytes::from_static(b":scheme"), scheme.clone()));
    }
    if let Some(authority) = &pseudo.authority {
        out.push(hpack::Header::new(Bytes::from_static(b":authority"), authority.clone()));
    }
    if let Some(path) = &pseudo.path {
        out.push(hpack::Header::new(Bytes::from_static(b":path"), path.clone()));
    }
    if let Some(status) = &pseudo.status {
        out.push(hpack::Header::new(
            Bytes::from_static(b":status"),
            Bytes::copy_from_slice(status.as_str().as_bytes()),
        ));
    }
    for (name, value) in fields {
        out.push(hpack::Header::new(Bytes::copy_from_slice(name.as_str().as_bytes()), Bytes::copy_from_slice(value.as_bytes())));
    }
    out
}

fn strip_padding_and_priority(flags: HeadersFlag, mut payload: Bytes) -> Result<(Option<StreamDependency>, Bytes), Error> {
    if flags.is_padded() {
        if payload.is_empty() {
            return Err(Error::PayloadLengthTooShort);
        }
        let pad_len = payload.get_u8() as usize;
        if pad_len > payload.len() {
            return Err(Error::TooMuchPadding);
        }
        payload.truncate(payload.len() - pad_len);
    }

    let stream_dep = if flags.is_priority() {
        if payload.len() < 5 {
            return Err(Error::PayloadLengthTooShort);
        }
        let mut raw = [0u8; 5];
        payload.copy_to_slice(&mut raw);
        Some(StreamDependency::load(&raw)?)
    } else {
        None
    };

    Ok((stream_dep, payload))
}

fn classify_decoded(decoded: Vec<hpack::Header>) -> Result<(Pseudo, HeaderMap), Error> {
    let mut pseudo = Pseudo::default();
    let mut fields = HeaderMap::new();
    let mut seen_regular_field = false;
    let mut content_length: Option<Bytes> = None;

    for header in decoded {
        if header.name.starts_with(b":") {
            if seen_regular_field {
                return Err(Error::MalformedMessage);
            }
            set_pseudo(&mut pseudo, &header.name, &header.value)?;
            continue;
        }

        seen_regular_field = true;
        validate_regular_field(&header.name, &header.value)?;

        if header.name == b"content-length".as_slice() {
            match &content_length {
                Some(existing) if existing != &header.value => return Err(Error::MalformedMessage),
                _ => content_length = Some(header.value.clone()),
            }
        }

        let name = HeaderName::from_bytes(&header.name).map_err(|_| Error::MalformedMessage)?;
        let value = HeaderValue::from_bytes(&header.value).map_err(|_| Error::MalformedMessage)?;
        fields.append(name, value);
    }

    Ok((pseudo, fields))
}

fn set_pseudo(pseudo: &mut Pseudo, name: &[u8], value: &Bytes) -> Result<(), Error> {
    match name {
        b":method" => {
            if pseudo.method.is_some() {
                return Err(Error::MalformedMessage);
            }
            let method = Method::from_bytes(value).map_err(|_| Error::MalformedMessage)?;
            pseudo.method = Some(method);
        }
        b":scheme" => {
            if pseudo.scheme.is_some() {
                return Err(Error::MalformedMessage);
            }
            pseudo.scheme = Some(value.clone());
        }
        b":authority" => {
            if pseudo.authority.is_some() {
                return Err(Error::MalformedMessage);
            }
            pseudo.authority = Some(value.clone());
        }
        b":path" => {
            if pseudo.path.is_some() {
                return Err(Error::MalformedMessage);
            }
            pseudo.path = Some(value.clone());
        }
        b":status" => {
            if pseudo.status.is_some() {
                return Err(Error::MalformedMessage);
            }
            let code = std::str::from_utf8(value)
                .ok()
                .and_then(|s| s.parse::<u16>().ok())
                .and_then(|n| StatusCode::try_from(n).ok())
                .ok_or(Error::MalformedMessage)?;
            pseudo.status = Some(code);
        }
        _ => return Err(Error::MalformedMessage),
    }
    Ok(())
}

fn validate_regular_field(name: &[u8], value: &Bytes) -> Result<(), Error> {
    if name.iter().any(u8::is_ascii_uppercase) {
        return Err(Error::MalformedMessage);
    }

    if name == b"transfer-encoding" {
        if value.as_ref() != b"trailers" {
            return Err(Error::MalformedMessage);
        }
        return Ok(());
    }

    if DISALLOWED_CONNECTION_HEADERS.iter().any(|&h| h.as_bytes() == name) {
        return Err(Error::MalformedMessage);
    }

    Ok(())
}

#[derive(Debug)]
pub struct PushPromise {
    stream_id: StreamId,
    promised_id: StreamId,
    pseudo: Pseudo,
    fields: HeaderMap,
    flags: HeadersFlag,
}

impl PushPromise {
    pub fn new(stream_id: StreamId, promised_id: StreamId, pseudo: Pseudo, fields: HeaderMap) -> PushPromise {
        PushPromise { stream_id, promised_id, pseudo, fields, flags: HeadersFlag::with_end_headers() }
    }

    pub fn load(head: Head, payload: Bytes, decoder: &mut hpack::Decoder) -> Result<PushPromise, Error> {
        let (promised_id, flags, mut block) = Self::load_initial_fragment(head, payload)?;
        let decoded = decoder.decode(&mut block).map_err(Error::Hpack)?;
        let (pseudo, fields) = classify_decoded(decoded)?;
        Ok(PushPromise { stream_id: head.stream_id(), promised_id, pseudo, fields, flags })
    }

    /// Parses the padding prefix and promised stream id of an initial
    /// PUSH_PROMISE frame that does not carry `END_HEADERS`, returning
    /// the remaining header-block fragment.
    pub fn load_initial_fragment(head: Head, mut payload: Bytes) -> Result<(StreamId, HeadersFlag, Bytes), Error> {
        let flags = HeadersFlag::load(head.flag());

        if flags.is_padded() {
            if payload.is_empty() {
                return Err(Error::PayloadLengthTooShort);
            }
            let pad_len = payload.get_u8() as usize;
            if pad_len > payload.len() {
                return Err(Error::TooMuchPadding);
            }
            payload.truncate(payload.len() - pad_len);
        }

        if payload.len() < 4 {
            return Err(Error::PayloadLengthTooShort);
        }
        let promised_id = StreamId::from(unpack_promised_id(&payload));
        payload.advance(4);

        Ok((promised_id, flags, payload))
    }

    pub fn from_block(
        stream_id: StreamId,
        promised_id: StreamId,
        flags: HeadersFlag,
        mut block: Bytes,
        decoder: &mut hpack::Decoder,
    ) -> Result<PushPromise, Error> {
        let decoded = decoder.decode(&mut block).map_err(Error::Hpack)?;
        let (pseudo, fields) = classify_decoded(decoded)?;
        Ok(PushPromise { stream_id, promised_id, pseudo, fields, flags })
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn promised_id(&self) -> StreamId {
        self.promised_id
    }

    pub fn pseudo(&self) -> &Pseudo {
        &self.pseudo
    }

    pub fn fields(&self) -> &HeaderMap {
        &self.fields
    }

    pub fn is_end_headers(&self) -> bool {
        self.flags.is_end_headers()
    }

    pub fn encode(&self, encoder: &mut hpack::Encoder, dst: &mut BytesMut) {
        let head = Head::new(Kind::PushPromise, self.flags.into(), self.stream_id);
        let pos = dst.len();
        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(0, &mut hdr);
        dst.extend_from_slice(&hdr);
        dst.put_u32(self.promised_id.into());

        let headers = pseudo_then_fields(&self.pseudo, &self.fields);
        encoder.encode(headers.iter(), dst);

        let len = (dst.len() - pos) - super::HEADER_LEN;
        pack_octets_3(&mut dst[pos..pos + 3], len as u32);
    }
}

impl<B> From<PushPromise> for super::Frame<B> {
    fn from(src: PushPromise) -> Self {
        super::Frame::PushPromise(src)
    }
}

fn unpack_promised_id(buf: &[u8]) -> u32 {
    unpack_octets_3(&buf[1..4]) | ((buf[0] as u32 & 0x7f) << 24)
}

/// A HEADERS or PUSH_PROMISE block that did not fit in a single frame
/// and continues via one or more CONTINUATION frames.
#[derive(Debug)]
pub struct Continuation {
    stream_id: StreamId,
    remainder: Bytes,
}

impl Continuation {
    pub fn new(stream_id: StreamId, remainder: Bytes) -> Continuation {
        Continuation { stream_id, remainder }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Splits off up to `max_frame_size` bytes of the remaining header
    /// block, returning the frame payload and whether this was the
    /// final CONTINUATION frame.
    pub fn next_frame(&mut self, max_frame_size: usize) -> (Bytes, bool) {
        if self.remainder.len() <= max_frame_size {
            (self.remainder.split_off(0), true)
        } else {
            (self.remainder.split_to(max_frame_size), false)
        }
    }

    pub fn load(head: Head, payload: Bytes) -> Result<Continuation, Error> {
        if head.stream_id().is_zero() {
            return Err(Error::InvalidStreamId);
        }
        Ok(Continuation { stream_id: head.stream_id(), remainder: payload })
    }

    pub fn into_payload(self) -> Bytes {
        self.remainder
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn rejects_uppercase_header_name() {
        let err = validate_regular_field(b"Content-Type", &Bytes::from_static(b"text/plain"));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_connection_header() {
        let err = validate_regular_field(b"connection", &Bytes::from_static(b"keep-alive"));
        assert!(err.is_err());
    }

    #[test]
    fn allows_transfer_encoding_trailers() {
        assert!(validate_regular_field(b"transfer-encoding", &Bytes::from_static(b"trailers")).is_ok());
        assert!(validate_regular_field(b"transfer-encoding", &Bytes::from_static(b"chunked")).is_err());
    }

    #[test]
    fn request_headers_round_trip() {
        let mut encoder = hpack::Encoder::new(4096);
        let mut decoder = hpack::Decoder::new(4096);

        let pseudo = Pseudo::request(Method::GET, Some(Bytes::from_static(b"https")), Some(Bytes::from_static(b"example.com")), Bytes::from_static(b"/"));
        let mut fields = HeaderMap::new();
        fields.insert("x-request-id", "abc-123".parse().unwrap());

        let headers = Headers::new(StreamId::from(1), pseudo, fields);
        let mut buf = BytesMut::new();
        headers.encode(&mut encoder, &mut buf);

        let head = Head::parse(&buf);
        let payload = Bytes::copy_from_slice(&buf[super::super::HEADER_LEN..]);
        let decoded = Headers::load(head, payload, &mut decoder).unwrap();

        assert_eq!(decoded.pseudo().method, Some(Method::GET));
        assert_eq!(decoded.pseudo().path.as_deref(), Some(&b"/"[..]));
        assert_eq!(decoded.fields().get("x-request-id").unwrap(), "abc-123");
    }
}

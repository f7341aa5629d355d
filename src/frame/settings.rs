use bytes::BufMut;

use super::util::unpack_octets_4;
use super::{Error, Head, Kind, StreamId};

const ACK_FLAG: u8 = 0x1;

/// One SETTINGS identifier (RFC 7540 §6.5.2), plus the two HTTP/3
/// extension-flavored settings used when the session runs over QUIC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsParameter {
    HeaderTableSize,
    EnablePush,
    MaxConcurrentStreams,
    InitialWindowSize,
    MaxFrameSize,
    MaxHeaderListSize,
}

impl SettingsParameter {
    fn from_id(id: u16) -> Option<Self> {
        match id {
            0x1 => Some(Self::HeaderTableSize),
            0x2 => Some(Self::EnablePush),
            0x3 => Some(Self::MaxConcurrentStreams),
            0x4 => Some(Self::InitialWindowSize),
            0x5 => Some(Self::MaxFrameSize),
            0x6 => Some(Self::MaxHeaderListSize),
            _ => None,
        }
    }

    fn id(self) -> u16 {
        match self {
            Self::HeaderTableSize => 0x1,
            Self::EnablePush => 0x2,
            Self::MaxConcurrentStreams => 0x3,
            Self::InitialWindowSize => 0x4,
            Self::MaxFrameSize => 0x5,
            Self::MaxHeaderListSize => 0x6,
        }
    }
}

/// SETTINGS (RFC 7540 §6.5): a set of parameter/value pairs, or an empty
/// ACK.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    ack: bool,
    header_table_size: Option<u32>,
    enable_push: Option<u32>,
    max_concurrent_streams: Option<u32>,
    initial_window_size: Option<u32>,
    max_frame_size: Option<u32>,
    max_header_list_size: Option<u32>,
}

impl Settings {
    pub fn ack() -> Settings {
        Settings { ack: true, ..Default::default() }
    }

    pub fn is_ack(&self) -> bool {
        self.ack
    }

    pub fn load(head: Head, payload: &[u8]) -> Result<Settings, Error> {
        if !head.stream_id().is_zero() {
            return Err(Error::InvalidStreamId);
        }

        let ack = head.flag() & ACK_FLAG != 0;
        if ack {
            if !payload.is_empty() {
                return Err(Error::InvalidPayloadAckSettings);
            }
            return Ok(Settings::ack());
        }

        if payload.len() % 6 != 0 {
            return Err(Error::PartialSettingLength);
        }

        let mut settings = Settings::default();
        for chunk in payload.chunks_exact(6) {
            let id = u16::from_be_bytes([chunk[0], chunk[1]]);
            let value = unpack_octets_4(&chunk[2..6]);
            if let Some(param) = SettingsParameter::from_id(id) {
                settings.set(param, value);
            }
            // Unknown settings parameters are ignored per RFC 7540 §6.5.2.
        }
        Ok(settings)
    }

    pub fn set(&mut self, param: SettingsParameter, value: u32) {
        match param {
            SettingsParameter::HeaderTableSize => self.header_table_size = Some(value),
            SettingsParameter::EnablePush => self.enable_push = Some(value),
            SettingsParameter::MaxConcurrentStreams => self.max_concurrent_streams = Some(value),
            SettingsParameter::InitialWindowSize => self.initial_window_size = Some(value),
            SettingsParameter::MaxFrameSize => self.max_frame_size = Some(value),
            SettingsParameter::MaxHeaderListSize => self.max_header_list_size = Some(value),
        }
    }

    pub fn header_table_size(&self) -> Option<u32> {
        self.header_table_size
    }

    pub fn is_push_enabled(&self) -> Option<bool> {
        self.enable_push.map(|v| v != 0)
    }

    pub fn max_concurrent_streams(&self) -> Option<u32> {
        self.max_concurrent_streams
    }

    pub fn initial_window_size(&self) -> Option<u32> {
        self.initial_window_size
    }

    pub fn max_frame_size(&self) -> Option<u32> {
        self.max_frame_size
    }

    pub fn max_header_list_size(&self) -> Option<u32> {
        self.max_header_list_size
    }

    fn pairs(&self) -> Vec<(SettingsParameter, u32)> {
        let mut out = Vec::with_capacity(6);
        macro_rules! push {
            ($field:ident, $param:expr) => {
                if let Some(v) = self.$field {
                    out.push(($param, v));
                }
            };
        }
        push!(header_table_size, SettingsParameter::HeaderTableSize);
        push!(enable_push, SettingsParameter::EnablePush);
        push!(max_concurrent_streams, SettingsParameter::MaxConcurrentStreams);
        push!(initial_window_size, SettingsParameter::InitialWindowSize);
        push!(max_frame_size, SettingsParameter::MaxFrameSize);
        push!(max_header_list_size, SettingsParameter::MaxHeaderListSize);
        out
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        let flag = if self.ack { ACK_FLAG } else { 0 };
        let pairs = if self.ack { Vec::new() } else { self.pairs() };
        let head = Head::new(Kind::Settings, flag, StreamId::ZERO);

        let mut hdr = [0u8; super::HEADER_LEN];
        head.encode(pairs.len() * 6, &mut hdr);
        dst.put_slice(&hdr);

        for (param, value) in pairs {
            dst.put_u16(param.id());
            dst.put_u32(value);
        }
    }
}

impl<B> From<Settings> for super::Frame<B> {
    fn from(src: Settings) -> Self {
        super::Frame::Settings(src)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_wire_bytes() {
        let mut settings = Settings::default();
        settings.set(SettingsParameter::HeaderTableSize, 4096);
        settings.set(SettingsParameter::InitialWindowSize, 1 << 20);
        settings.set(SettingsParameter::MaxConcurrentStreams, 100);

        let mut buf = Vec::new();
        settings.encode(&mut buf);

        let head = Head::parse(&buf);
        let decoded = Settings::load(head, &buf[super::super::HEADER_LEN..]).unwrap();

        assert_eq!(decoded.header_table_size(), Some(4096));
        assert_eq!(decoded.initial_window_size(), Some(1 << 20));
        assert_eq!(decoded.max_concurrent_streams(), Some(100));
        assert!(!decoded.is_ack());
    }

    #[test]
    fn ack_has_no_payload() {
        let mut buf = Vec::new();
        Settings::ack().encode(&mut buf);
        assert_eq!(buf.len(), super::super::HEADER_LEN);
    }
}

//! Tracks this session's advertised (local) and learned (peer) SETTINGS
//! values, and applies an inbound SETTINGS frame to the write-side
//! codec and the stream registry.

use crate::codec::Codec;
use crate::frame::{self, Settings, SettingsParameter};
use crate::proto::streams::Streams;

#[derive(Debug, Clone)]
pub struct LocalSettings {
    pub header_table_size: u32,
    pub enable_push: bool,
    pub max_concurrent_streams: Option<u32>,
    pub initial_window_size: u32,
    pub max_frame_size: u32,
    pub max_header_list_size: Option<u32>,
}

impl Default for LocalSettings {
    fn default() -> LocalSettings {
        LocalSettings {
            header_table_size: frame::DEFAULT_SETTINGS_HEADER_TABLE_SIZE as u32,
            enable_push: false,
            max_concurrent_streams: None,
            initial_window_size: frame::DEFAULT_INITIAL_WINDOW_SIZE,
            max_frame_size: frame::DEFAULT_MAX_FRAME_SIZE,
            max_header_list_size: None,
        }
    }
}

impl LocalSettings {
    pub fn to_frame(&self) -> Settings {
        let mut s = Settings::default();
        s.set(SettingsParameter::HeaderTableSize, self.header_table_size);
        s.set(SettingsParameter::EnablePush, self.enable_push as u32);
        if let Some(v) = self.max_concurrent_streams {
            s.set(SettingsParameter::MaxConcurrentStreams, v);
        }
        s.set(SettingsParameter::InitialWindowSize, self.initial_window_size);
        s.set(SettingsParameter::MaxFrameSize, self.max_frame_size);
        if let Some(v) = self.max_header_list_size {
            s.set(SettingsParameter::MaxHeaderListSize, v);
        }
        s
    }
}

#[derive(Debug, Clone)]
pub struct PeerSettings {
    pub header_table_size: u32,
    pub enable_push: bool,
    pub max_concurrent_streams: Option<u32>,
    pub initial_window_size: u32,
    pub max_frame_size: u32,
    pub max_header_list_size: Option<u32>,
}

impl Default for PeerSettings {
    fn default() -> PeerSettings {
        PeerSettings {
            header_table_size: frame::DEFAULT_SETTINGS_HEADER_TABLE_SIZE as u32,
            enable_push: true,
            max_concurrent_streams: None,
            initial_window_size: frame::DEFAULT_INITIAL_WINDOW_SIZE,
            max_frame_size: frame::DEFAULT_MAX_FRAME_SIZE,
            max_header_list_size: None,
        }
    }
}

impl PeerSettings {
    /// Applies a non-ACK inbound SETTINGS frame: records the new
    /// values and propagates the ones with a side effect outside this
    /// struct (HPACK table size, outbound max frame size, every open
    /// stream's send window).
    pub fn apply(&mut self, settings: &Settings, codec: &mut Codec, streams: &Streams) {
        if let Some(v) = settings.header_table_size() {
            self.header_table_size = v;
            codec.hpack_encoder_mut().set_max_size(v as usize);
        }
        if let Some(v) = settings.is_push_enabled() {
            self.enable_push = v;
        }
        if let Some(v) = settings.max_concurrent_streams() {
            self.max_concurrent_streams = Some(v);
        }
        if let Some(v) = settings.initial_window_size() {
            self.initial_window_size = v;
            streams.apply_remote_initial_window(v);
        }
        if let Some(v) = settings.max_frame_size() {
            self.max_frame_size = v;
            codec.set_max_send_frame_size(v as usize);
        }
        if let Some(v) = settings.max_header_list_size() {
            self.max_header_list_size = Some(v);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn local_settings_round_trip_into_frame() {
        let local = LocalSettings { max_concurrent_streams: Some(50), ..LocalSettings::default() };
        let frame = local.to_frame();
        assert_eq!(frame.max_concurrent_streams(), Some(50));
        assert_eq!(frame.initial_window_size(), Some(frame::DEFAULT_INITIAL_WINDOW_SIZE));
    }

    #[test]
    fn applying_initial_window_size_propagates_to_streams() {
        let mut peer = PeerSettings::default();
        let mut codec = Codec::new(frame::DEFAULT_MAX_FRAME_SIZE as usize, frame::DEFAULT_SETTINGS_HEADER_TABLE_SIZE);
        let streams = Streams::new(65_535, 65_535, 1, Default::default());
        let stream_ref = streams.open_local();

        let mut incoming = Settings::default();
        incoming.set(SettingsParameter::InitialWindowSize, 1 << 20);
        peer.apply(&incoming, &mut codec, &streams);

        assert_eq!(peer.initial_window_size, 1 << 20);
        assert_eq!(stream_ref.available_send_capacity(), 1 << 20);
    }
}

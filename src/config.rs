//! Every tunable named in the external-interfaces option list, typed
//! and validated in the style of `quinn-proto`'s `TransportConfig`:
//! each setter takes `&mut self`, validates, and returns `&mut Self` so
//! calls chain, with a plain struct underneath instead of a type-state
//! builder.

use std::time::Duration;

use crate::frame::{DEFAULT_INITIAL_WINDOW_SIZE, DEFAULT_MAX_FRAME_SIZE, DEFAULT_SETTINGS_HEADER_TABLE_SIZE, MAX_MAX_FRAME_SIZE, MAX_WINDOW_SIZE};
use crate::proto::streams::AbuseLimits;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigError(&'static str);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    header_table_size: u32,
    initial_window_size: u32,
    max_frame_size: u32,
    max_concurrent_streams: Option<u32>,
    max_header_list_size: Option<u32>,
    enable_push: bool,
    enable_priority: bool,
    reset_stream_duration: Duration,
    reset_stream_max: usize,
    write_size_threshold: usize,
    write_time_threshold: Duration,
    keepalive_interval: Option<Duration>,
    keepalive_timeout: Duration,
    abuse: AbuseLimits,
    cc_max_datagram_size: u32,
    cc_initial_window: u32,
    cc_minimum_window: u32,
    cc_loss_reduction_factor: f32,
    cc_persistent_congestion_threshold: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            header_table_size: DEFAULT_SETTINGS_HEADER_TABLE_SIZE as u32,
            initial_window_size: DEFAULT_INITIAL_WINDOW_SIZE,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            max_concurrent_streams: None,
            max_header_list_size: None,
            enable_push: false,
            // Resolves the priority Open Question: carried, disabled by default.
            enable_priority: false,
            reset_stream_duration: Duration::from_secs(30),
            reset_stream_max: 20,
            write_size_threshold: 16 << 10,
            write_time_threshold: Duration::from_millis(1),
            keepalive_interval: None,
            keepalive_timeout: Duration::from_secs(20),
            abuse: AbuseLimits::default(),
            // QUIC congestion defaults (RFC 9002 §7), scaled by the
            // default max datagram size the same way the original
            // QUICConfig expresses them (a scale factor times the MSS).
            cc_max_datagram_size: 1200,
            cc_initial_window: 10 * 1200,
            cc_minimum_window: 2 * 1200,
            cc_loss_reduction_factor: 0.5,
            cc_persistent_congestion_threshold: 2,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    pub fn set_header_table_size(&mut self, size: u32) -> &mut Self {
        self.header_table_size = size;
        self
    }

    pub fn set_initial_window_size(&mut self, size: u32) -> Result<&mut Self, ConfigError> {
        if size > MAX_WINDOW_SIZE {
            return Err(ConfigError("initial_window_size exceeds 2^31 - 1"));
        }
        self.initial_window_size = size;
        Ok(self)
    }

    pub fn set_max_frame_size(&mut self, size: u32) -> Result<&mut Self, ConfigError> {
        if !(DEFAULT_MAX_FRAME_SIZE..=MAX_MAX_FRAME_SIZE).contains(&size) {
            return Err(ConfigError("max_frame_size out of the RFC 7540 §6.5.2 range"));
        }
        self.max_frame_size = size;
        Ok(self)
    }

    pub fn set_max_concurrent_streams(&mut self, max: Option<u32>) -> &mut Self {
        self.max_concurrent_streams = max;
        self
    }

    pub fn set_max_header_list_size(&mut self, max: Option<u32>) -> &mut Self {
        self.max_header_list_size = max;
        self
    }

    pub fn set_enable_push(&mut self, enabled: bool) -> &mut Self {
        self.enable_push = enabled;
        self
    }

    pub fn set_enable_priority(&mut self, enabled: bool) -> &mut Self {
        self.enable_priority = enabled;
        self
    }

    pub fn set_reset_stream_limit(&mut self, max: usize, within: Duration) -> &mut Self {
        self.reset_stream_max = max;
        self.reset_stream_duration = within;
        self
    }

    pub fn set_write_batching(&mut self, size_threshold: usize, time_threshold: Duration) -> &mut Self {
        self.write_size_threshold = size_threshold;
        self.write_time_threshold = time_threshold;
        self
    }

    pub fn set_keepalive(&mut self, interval: Option<Duration>, timeout: Duration) -> &mut Self {
        self.keepalive_interval = interval;
        self.keepalive_timeout = timeout;
        self
    }

    pub fn set_abuse_limits(&mut self, limits: AbuseLimits) -> &mut Self {
        self.abuse = limits;
        self
    }

    pub fn set_congestion_params(&mut self, params: CongestionParams) -> Result<&mut Self, ConfigError> {
        if !(0.0..1.0).contains(&params.loss_reduction_factor) {
            return Err(ConfigError("cc_loss_reduction_factor must be in (0, 1)"));
        }
        self.cc_max_datagram_size = params.max_datagram_size;
        self.cc_initial_window = params.initial_window;
        self.cc_minimum_window = params.minimum_window;
        self.cc_loss_reduction_factor = params.loss_reduction_factor;
        self.cc_persistent_congestion_threshold = params.persistent_congestion_threshold;
        Ok(self)
    }

    pub fn header_table_size(&self) -> u32 {
        self.header_table_size
    }

    pub fn initial_window_size(&self) -> u32 {
        self.initial_window_size
    }

    pub fn max_frame_size(&self) -> u32 {
        self.max_frame_size
    }

    pub fn max_concurrent_streams(&self) -> Option<u32> {
        self.max_concurrent_streams
    }

    pub fn max_header_list_size(&self) -> Option<u32> {
        self.max_header_list_size
    }

    pub fn enable_push(&self) -> bool {
        self.enable_push
    }

    pub fn enable_priority(&self) -> bool {
        self.enable_priority
    }

    pub fn reset_stream_limit(&self) -> (usize, Duration) {
        (self.reset_stream_max, self.reset_stream_duration)
    }

    pub fn write_batching(&self) -> (usize, Duration) {
        (self.write_size_threshold, self.write_time_threshold)
    }

    pub fn keepalive(&self) -> (Option<Duration>, Duration) {
        (self.keepalive_interval, self.keepalive_timeout)
    }

    pub fn abuse_limits(&self) -> AbuseLimits {
        self.abuse
    }

    pub fn congestion_params(&self) -> CongestionParams {
        CongestionParams {
            max_datagram_size: self.cc_max_datagram_size,
            initial_window: self.cc_initial_window,
            minimum_window: self.cc_minimum_window,
            loss_reduction_factor: self.cc_loss_reduction_factor,
            persistent_congestion_threshold: self.cc_persistent_congestion_threshold,
        }
    }
}

/// The tunables a [`crate::quic::congestion::CongestionController`] is
/// constructed from; broken out of [`Config`] so it can be passed
/// straight into the controller without borrowing the whole config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CongestionParams {
    pub max_datagram_size: u32,
    pub initial_window: u32,
    pub minimum_window: u32,
    pub loss_reduction_factor: f32,
    pub persistent_congestion_threshold: u32,
}

impl Default for CongestionParams {
    fn default() -> Self {
        Config::default().congestion_params()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_rfc_7540_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.initial_window_size(), DEFAULT_INITIAL_WINDOW_SIZE);
        assert_eq!(cfg.max_frame_size(), DEFAULT_MAX_FRAME_SIZE);
        assert!(!cfg.enable_priority());
    }

    #[test]
    fn congestion_defaults_match_quic_config() {
        let cfg = Config::default();
        let cc = cfg.congestion_params();
        assert_eq!(cc.max_datagram_size, 1200);
        assert_eq!(cc.initial_window, 12_000);
        assert_eq!(cc.minimum_window, 2_400);
        assert_eq!(cc.persistent_congestion_threshold, 2);
    }

    #[test]
    fn rejects_out_of_range_loss_reduction_factor() {
        let mut cfg = Config::new();
        let mut bad = cfg.congestion_params();
        bad.loss_reduction_factor = 1.5;
        assert!(cfg.set_congestion_params(bad).is_err());
    }

    #[test]
    fn rejects_out_of_range_max_frame_size() {
        let mut cfg = Config::new();
        assert!(cfg.set_max_frame_size(1).is_err());
        assert!(cfg.set_max_frame_size(MAX_MAX_FRAME_SIZE + 1).is_err());
        assert!(cfg.set_max_frame_size(1 << 20).is_ok());
    }

    #[test]
    fn builder_methods_chain() {
        let mut cfg = Config::new();
        cfg.set_header_table_size(8192).set_enable_push(true).set_max_concurrent_streams(Some(100));
        assert_eq!(cfg.header_table_size(), 8192);
        assert!(cfg.enable_push());
        assert_eq!(cfg.max_concurrent_streams(), Some(100));
    }
}

//! Loss-based congestion controller: bounds bytes in flight to a
//! window that shrinks on loss or ECN-CE and re-expands through slow
//! start then congestion avoidance.
//!
//! State and formulas are transcribed from the original
//! `QUICCongestionController` (itself draft-ietf-quic-recovery-17,
//! now RFC 9002 §7) rather than reinvented: `on_packet_acked`'s slow
//! start / avoidance split, and `congestion_event`'s recovery-epoch
//! gating, match that file line for line.

use std::time::Instant;

use crate::config::CongestionParams;
use crate::quic::packet::PacketInfo;

#[derive(Debug, Clone)]
pub struct CongestionController {
    bytes_in_flight: u64,
    congestion_window: u64,
    ssthresh: u64,
    recovery_start_time: Option<Instant>,
    ecn_ce_counter: u64,

    k_max_datagram_size: u64,
    k_minimum_window: u64,
    k_loss_reduction_factor: f32,
    k_persistent_congestion_threshold: u32,
}

impl CongestionController {
    pub fn new(params: CongestionParams) -> CongestionController {
        CongestionController {
            bytes_in_flight: 0,
            congestion_window: params.initial_window as u64,
            ssthresh: u64::MAX,
            recovery_start_time: None,
            ecn_ce_counter: 0,
            k_max_datagram_size: params.max_datagram_size as u64,
            k_minimum_window: params.minimum_window as u64,
            k_loss_reduction_factor: params.loss_reduction_factor,
            k_persistent_congestion_threshold: params.persistent_congestion_threshold,
        }
    }

    pub fn bytes_in_flight(&self) -> u64 {
        self.bytes_in_flight
    }

    pub fn congestion_window(&self) -> u64 {
        self.congestion_window
    }

    pub fn ssthresh(&self) -> u64 {
        self.ssthresh
    }

    fn in_recovery(&self, sent_time: Instant) -> bool {
        match self.recovery_start_time {
            Some(start) => sent_time <= start,
            None => false,
        }
    }

    pub fn on_packet_sent(&mut self, bytes: u32) {
        self.bytes_in_flight += bytes as u64;
    }

    pub fn on_packet_acked(&mut self, packet: &PacketInfo) {
        self.bytes_in_flight = self.bytes_in_flight.saturating_sub(packet.sent_bytes as u64);

        if self.in_recovery(packet.sent_time) {
            return;
        }

        if self.congestion_window < self.ssthresh {
            self.congestion_window += packet.sent_bytes as u64;
        } else {
            self.congestion_window += self.k_max_datagram_size * packet.sent_bytes as u64 / self.congestion_window;
        }
    }

    pub fn on_packets_lost(&mut self, lost_packets: &[PacketInfo], pto_count: u32) {
        let Some(largest) = lost_packets.iter().max_by_key(|p| p.packet_number) else {
            return;
        };
        for packet in lost_packets {
            self.bytes_in_flight = self.bytes_in_flight.saturating_sub(packet.sent_bytes as u64);
        }
        self.congestion_event(largest.sent_time, pto_count, Instant::now());
    }

    pub fn process_ecn(&mut self, largest_acked: &PacketInfo, ecn_ce_count: u64, pto_count: u32) {
        if ecn_ce_count > self.ecn_ce_counter {
            self.ecn_ce_counter = ecn_ce_count;
            self.congestion_event(largest_acked.sent_time, pto_count, Instant::now());
        }
    }

    /// `now` is threaded in by the caller (rather than read here via
    /// `Instant::now()`) so the recovery-epoch gate can be driven
    /// deterministically in tests.
    pub fn congestion_event(&mut self, sent_time: Instant, pto_count: u32, now: Instant) {
        if self.in_recovery(sent_time) {
            return;
        }
        self.recovery_start_time = Some(now);
        let shrunk = (self.congestion_window as f64 * self.k_loss_reduction_factor as f64) as u64;
        self.congestion_window = shrunk.max(self.k_minimum_window);
        self.ssthresh = self.congestion_window;
        if pto_count > self.k_persistent_congestion_threshold {
            self.congestion_window = self.k_minimum_window;
        }
    }

    /// Bytes the caller may still send without exceeding the window.
    pub fn open_window(&self) -> u64 {
        self.congestion_window.saturating_sub(self.bytes_in_flight)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    fn params() -> CongestionParams {
        CongestionParams { max_datagram_size: 1200, initial_window: 12_000, minimum_window: 2_400, loss_reduction_factor: 0.5, persistent_congestion_threshold: 2 }
    }

    #[test]
    fn starts_in_slow_start_with_the_initial_window() {
        let cc = CongestionController::new(params());
        assert_eq!(cc.congestion_window(), 12_000);
        assert_eq!(cc.ssthresh(), u64::MAX);
        assert_eq!(cc.open_window(), 12_000);
    }

    #[test]
    fn slow_start_grows_window_by_full_acked_bytes() {
        let mut cc = CongestionController::new(params());
        let now = Instant::now();
        let packet = PacketInfo::new(1, 1000, now, true);
        cc.on_packet_sent(1000);
        cc.on_packet_acked(&packet);
        assert_eq!(cc.congestion_window(), 13_000);
        assert_eq!(cc.bytes_in_flight(), 0);
    }

    #[test]
    fn congestion_avoidance_grows_by_mss_fraction_once_past_ssthresh() {
        let mut cc = CongestionController::new(params());
        cc.ssthresh = 10_000;
        cc.congestion_window = 10_000;
        let now = Instant::now();
        let packet = PacketInfo::new(1, 1000, now, true);
        cc.on_packet_sent(1000);
        cc.on_packet_acked(&packet);
        // cwnd += k_max_datagram_size * sent_bytes / cwnd = 1200*1000/10000 = 120
        assert_eq!(cc.congestion_window(), 10_120);
    }

    #[test]
    fn never_shrinks_below_minimum_window() {
        let mut cc = CongestionController::new(params());
        cc.congestion_window = 3_000;
        let sent = Instant::now();
        cc.congestion_event(sent, 0, sent + Duration::from_millis(1));
        assert_eq!(cc.congestion_window(), 2_400);
        assert_eq!(cc.ssthresh(), 2_400);
    }

    #[test]
    fn persistent_congestion_collapses_straight_to_minimum_window() {
        let mut cc = CongestionController::new(params());
        let sent = Instant::now();
        cc.congestion_event(sent, 5, sent + Duration::from_millis(1));
        assert_eq!(cc.congestion_window(), cc.k_minimum_window);
    }

    #[test]
    fn a_second_loss_in_the_same_recovery_epoch_does_not_shrink_again() {
        let mut cc = CongestionController::new(params());
        let t0 = Instant::now();
        let recovery_started_at = t0 + Duration::from_millis(5);
        cc.congestion_event(t0, 0, recovery_started_at);
        let shrunk_once = cc.congestion_window();

        // A packet sent before recovery began losing again should not
        // shrink the window a second time.
        cc.congestion_event(t0, 0, recovery_started_at + Duration::from_millis(5));
        assert_eq!(cc.congestion_window(), shrunk_once);
    }

    #[test]
    fn ecn_ce_increase_triggers_a_congestion_event() {
        let mut cc = CongestionController::new(params());
        let now = Instant::now();
        let largest = PacketInfo::new(1, 1000, now, true);
        cc.process_ecn(&largest, 1, 0);
        assert_eq!(cc.congestion_window(), 6_000);

        // No further increase in the reported count, no further event.
        let cwnd_after_first = cc.congestion_window();
        cc.process_ecn(&largest, 1, 0);
        assert_eq!(cc.congestion_window(), cwnd_after_first);
    }

    #[test]
    fn open_window_never_goes_negative_when_bytes_in_flight_exceeds_cwnd() {
        let mut cc = CongestionController::new(params());
        cc.on_packet_sent(20_000);
        assert_eq!(cc.open_window(), 0);
    }
}

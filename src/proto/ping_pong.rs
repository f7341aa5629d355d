//! Handles the mandatory ping/pong exchange (RFC 7540 §6.7): any inbound
//! PING without the ACK flag must be answered with an identical-payload
//! PING carrying ACK, and pongs are meant to jump the queue ahead of
//! other pending writes.

use std::collections::VecDeque;

use crate::frame::{Frame, Ping};

#[derive(Debug, Default)]
pub struct PingPong {
    pending_pongs: VecDeque<Ping>,
}

impl PingPong {
    pub fn new() -> PingPong {
        PingPong::default()
    }

    /// Feeds an inbound PING through the responder. An ACK'd ping (the
    /// answer to one of ours, e.g. for RTT measurement or a liveness
    /// check) is handed back to the caller instead of being consumed
    /// here. An unacked ping is queued for an immediate pong and
    /// swallowed.
    pub fn recv_ping(&mut self, ping: Ping) -> Option<Ping> {
        if ping.is_ack() {
            return Some(ping);
        }
        self.pending_pongs.push_back(Ping::pong(ping.into_payload()));
        None
    }

    pub fn has_pending_pong(&self) -> bool {
        !self.pending_pongs.is_empty()
    }

    pub fn pop_pending_pong(&mut self) -> Option<Frame> {
        self.pending_pongs.pop_front().map(Into::into)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unacked_ping_queues_a_pong() {
        let mut pp = PingPong::new();
        assert!(pp.recv_ping(Ping::ping(*b"buoyant_")).is_none());
        assert!(pp.has_pending_pong());
        match pp.pop_pending_pong() {
            Some(Frame::Ping(pong)) => {
                assert!(pong.is_ack());
                assert_eq!(&pong.into_payload(), b"buoyant_");
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!pp.has_pending_pong());
    }

    #[test]
    fn acked_ping_passes_through() {
        let mut pp = PingPong::new();
        let pong = Ping::pong(*b"buoyant!");
        let passed = pp.recv_ping(pong).expect("ack should pass through");
        assert!(passed.is_ack());
        assert!(!pp.has_pending_pong());
    }
}

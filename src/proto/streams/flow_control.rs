//! Per-stream and per-connection flow-control windows (RFC 7540 §5.2,
//! §6.9). A window is a signed quantity: it starts at
//! `DEFAULT_INITIAL_WINDOW_SIZE` and a peer lowering
//! `SETTINGS_INITIAL_WINDOW_SIZE` can drive already-open streams
//! negative, at which point no more data may be sent until enough
//! WINDOW_UPDATEs arrive to bring it non-negative again.

use crate::error::Reason;
use crate::frame::MAX_WINDOW_SIZE;

#[derive(Copy, Clone, Debug)]
pub struct FlowControl {
    /// Window size as known by the peer; can go negative.
    window_size: i64,
    /// The portion of `window_size` the owner has claimed for buffered
    /// but not-yet-sent (or not-yet-released-to-application) data.
    available: i64,
}

impl FlowControl {
    pub fn new(initial_window_size: u32) -> FlowControl {
        FlowControl { window_size: initial_window_size as i64, available: initial_window_size as i64 }
    }

    pub fn window_size(&self) -> u32 {
        self.window_size.max(0) as u32
    }

    pub fn available(&self) -> u32 {
        self.available.max(0) as u32
    }

    pub fn is_exhausted(&self) -> bool {
        self.available <= 0
    }

    /// Applies a WINDOW_UPDATE increment. Per RFC 7540 §6.9.1, the
    /// resulting window must not exceed `2^31 - 1`.
    pub fn increment(&mut self, increment: u32) -> Result<(), Reason> {
        let next = self.window_size + increment as i64;
        if next > MAX_WINDOW_SIZE as i64 {
            return Err(Reason::FlowControlError);
        }
        self.window_size = next;
        self.available += increment as i64;
        Ok(())
    }

    /// Applies a `SETTINGS_INITIAL_WINDOW_SIZE` change to an already
    /// open stream: the delta (positive or negative) is applied to both
    /// fields, which may drive the window negative (RFC 7540 §6.9.2).
    pub fn apply_initial_window_delta(&mut self, delta: i64) {
        self.window_size += delta;
        self.available += delta;
    }

    /// Accounts for `len` octets of DATA sent or received against the
    /// window, without touching `available` (that happens separately
    /// via `claim`/`release`).
    pub fn send_data(&mut self, len: u32) {
        self.window_size -= len as i64;
    }

    /// Claims `len` octets of `available` capacity for data about to be
    /// written into the send queue.
    pub fn claim_capacity(&mut self, len: u32) -> Result<(), Reason> {
        if (len as i64) > self.available {
            return Err(Reason::FlowControlError);
        }
        self.available -= len as i64;
        Ok(())
    }

    /// Returns `len` octets of claimed-but-unsent capacity, e.g. after a
    /// stream is reset before its queued data went out.
    pub fn release_capacity(&mut self, len: u32) {
        self.available += len as i64;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn increment_caps_at_max_window_size() {
        let mut fc = FlowControl::new(MAX_WINDOW_SIZE);
        assert!(fc.increment(1).is_err());
    }

    #[test]
    fn settings_decrease_can_go_negative() {
        let mut fc = FlowControl::new(65_535);
        fc.apply_initial_window_delta(-(70_000i64));
        assert_eq!(fc.window_size(), 0);
    }

    #[test]
    fn claim_respects_available() {
        let mut fc = FlowControl::new(10);
        assert!(fc.claim_capacity(10).is_ok());
        assert!(fc.claim_capacity(1).is_err());
        fc.release_capacity(5);
        assert!(fc.claim_capacity(5).is_ok());
    }
}

//! A fixed-capacity ring of timestamped events plus the named
//! connection milestones, grounded on `lib/ts/History.h`'s ring of
//! source-location-tagged entries. Each entry is `serde`-serializable
//! in the style of `qlog-rs`'s event records so a ring can be dumped
//! for post-mortem without this crate taking on qlog's JSON schema.

use std::time::{Duration, Instant};

use serde::Serialize;

const DEFAULT_CAPACITY: usize = 64;

/// A single entry in the ring: a monotonic instant, the event id, and
/// the call site that recorded it.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    #[serde(skip)]
    pub at: Option<Instant>,
    pub id: &'static str,
    pub file: &'static str,
    pub line: u32,
}

/// Instants the session cares about for the "slow to first byte" /
/// "short-lived connection" logging rules: accept, first application
/// byte written, and close.
#[derive(Debug, Default, Clone, Copy)]
pub struct Milestones {
    pub accept: Option<Instant>,
    pub first_byte: Option<Instant>,
    pub close: Option<Instant>,
}

impl Milestones {
    pub fn accept_to_first_byte(&self) -> Option<Duration> {
        Some(self.first_byte?.saturating_duration_since(self.accept?))
    }

    pub fn open_to_close(&self) -> Option<Duration> {
        Some(self.close?.saturating_duration_since(self.accept?))
    }
}

#[derive(Debug)]
pub struct History {
    ring: std::collections::VecDeque<Event>,
    capacity: usize,
    milestones: Milestones,
}

impl History {
    pub fn new() -> History {
        History::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> History {
        History { ring: std::collections::VecDeque::with_capacity(capacity), capacity, milestones: Milestones::default() }
    }

    pub fn record(&mut self, id: &'static str, file: &'static str, line: u32) {
        if self.ring.len() == self.capacity {
            self.ring.pop_front();
        }
        self.ring.push_back(Event { at: Some(Instant::now()), id, file, line });
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.ring.iter()
    }

    pub fn milestones(&self) -> Milestones {
        self.milestones
    }

    pub fn mark_accept(&mut self) {
        self.milestones.accept = Some(Instant::now());
    }

    pub fn mark_first_byte(&mut self) {
        if self.milestones.first_byte.is_none() {
            self.milestones.first_byte = Some(Instant::now());
        }
    }

    pub fn mark_close(&mut self) {
        self.milestones.close = Some(Instant::now());
    }
}

impl Default for History {
    fn default() -> History {
        History::new()
    }
}

/// Records an event at the call site, mirroring `TS_HISTORY()`'s
/// file/line capture.
#[macro_export]
macro_rules! history_event {
    ($history:expr, $id:expr) => {
        $history.record($id, file!(), line!())
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ring_evicts_oldest_past_capacity() {
        let mut h = History::with_capacity(2);
        h.record("a", file!(), line!());
        h.record("b", file!(), line!());
        h.record("c", file!(), line!());
        let ids: Vec<_> = h.events().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn milestones_compute_durations_once_both_sides_present() {
        let mut h = History::new();
        assert!(h.milestones().accept_to_first_byte().is_none());
        h.mark_accept();
        h.mark_first_byte();
        assert!(h.milestones().accept_to_first_byte().is_some());
    }
}

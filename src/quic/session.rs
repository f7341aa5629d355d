//! The QUIC session adapter: translates UDP datagrams to/from a QUIC
//! implementation handle and routes decrypted application streams up
//! to the HTTP/3 (or HTTP/0.9) layer above.
//!
//! Grounded on `original_source/src/iocore/net/QUICNetProcessor_quiche.cc`,
//! itself a thin wrapper over the `quiche` C API. Rather than link a
//! specific QUIC implementation, [`QuicConnectionHandle`] abstracts the
//! same small surface `quiche::Connection` exposes (`recv`/`send`,
//! readable-stream iteration, per-stream read/write, a next-timeout
//! hint, and a close/established query) so `quiche`, `quinn-proto`, or
//! a test double can all drive this adapter.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::error::Error;
use crate::frame::StreamId;

/// One UDP datagram read off (or about to be written to) the socket,
/// with the pacing/segmentation hints spec.md's write pass names.
#[derive(Debug, Clone)]
pub struct Datagram {
    pub payload: Bytes,
    /// A hint for when this datagram should leave the NIC, used for
    /// pacing; `None` means "as soon as possible".
    pub send_at: Option<Instant>,
    /// The UDP GSO segmentation size, if the payload is a batch of
    /// same-sized datagrams coalesced into one syscall.
    pub segment_size: Option<usize>,
}

/// The small surface a concrete QUIC implementation must offer for
/// this adapter to drive it. Named after `quiche::Connection`'s
/// equivalent methods.
pub trait QuicConnectionHandle {
    /// Feeds one received, already address-validated datagram into the
    /// connection. Returns the number of bytes consumed.
    fn recv(&mut self, datagram: &[u8]) -> Result<usize, Error>;

    /// Writes up to `send_quantum` bytes of the next outgoing
    /// datagram into `out`, returning its length, or `None` once there
    /// is nothing left to send this pass.
    fn send(&mut self, out: &mut [u8]) -> Result<Option<usize>, Error>;

    /// Stream ids that became readable since the last call.
    fn readable_streams(&mut self) -> Vec<StreamId>;

    /// Reads buffered application data for `id`; `true` in the second
    /// element means the stream's FIN has been reached.
    fn stream_recv(&mut self, id: StreamId, buf: &mut [u8]) -> Result<(usize, bool), Error>;

    fn is_established(&self) -> bool;
    fn is_closed(&self) -> bool;

    /// The library-computed deadline for the next timer-driven action
    /// (loss recovery, idle timeout, key update).
    fn next_timeout(&self) -> Option<Instant>;

    /// Drives the timer-expiry side effects (retransmission, idle
    /// closure) when `next_timeout` has passed without new I/O.
    fn on_timeout(&mut self);
}

/// How many bytes a single write pass may drain from the library's
/// send queue before yielding back to the event loop, letting other
/// connections on the same worker thread make progress.
pub const DEFAULT_SEND_QUANTUM: usize = 64 * 1024;

/// Owns one QUIC connection's handle plus the stream id → readable
/// routing table the session layer above consumes. One instance lives
/// on the worker thread its connection id hashed to (§5's "affinity
/// thread"); this type itself is not `Sync` and isn't meant to be
/// shared across threads.
pub struct QuicSession<H> {
    handle: H,
    send_quantum: usize,
    newly_readable: HashMap<StreamId, ()>,
}

impl<H: QuicConnectionHandle> QuicSession<H> {
    pub fn new(handle: H) -> QuicSession<H> {
        QuicSession { handle, send_quantum: DEFAULT_SEND_QUANTUM, newly_readable: HashMap::new() }
    }

    pub fn is_established(&self) -> bool {
        self.handle.is_established()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Step 3 of the adapter's lifecycle: consume one inbound datagram,
    /// then poll for streams that became readable as a result.
    pub fn on_datagram_received(&mut self, datagram: &[u8]) -> Result<Vec<StreamId>, Error> {
        let consumed = self.handle.recv(datagram)?;
        trace!(consumed, "quic datagram consumed");

        let readable = self.handle.readable_streams();
        for id in &readable {
            self.newly_readable.insert(*id, ());
        }
        Ok(readable)
    }

    pub fn read_stream(&mut self, id: StreamId, max_len: usize) -> Result<(Bytes, bool), Error> {
        let mut buf = BytesMut::zeroed(max_len);
        let (n, fin) = self.handle.stream_recv(id, &mut buf)?;
        buf.truncate(n);
        if fin {
            self.newly_readable.remove(&id);
        }
        Ok((buf.freeze(), fin))
    }

    /// Step 4 of the adapter's lifecycle: drains the library's send
    /// queue up to `send_quantum` bytes, yielding one [`Datagram`] per
    /// iteration.
    pub fn drain_outbound(&mut self) -> Result<Vec<Datagram>, Error> {
        let mut datagrams = Vec::new();
        let mut drained = 0usize;
        let mut buf = vec![0u8; 1500];

        while drained < self.send_quantum {
            match self.handle.send(&mut buf)? {
                Some(len) => {
                    drained += len;
                    datagrams.push(Datagram { payload: Bytes::copy_from_slice(&buf[..len]), send_at: None, segment_size: None });
                }
                None => break,
            }
        }

        Ok(datagrams)
    }

    /// Step 5: if the library's next-timeout deadline has passed,
    /// drive its timeout side effects.
    pub fn poll_timeout(&mut self, now: Instant) -> Option<Duration> {
        match self.handle.next_timeout() {
            Some(deadline) if deadline <= now => {
                debug!("quic timer fired, driving on_timeout");
                self.handle.on_timeout();
                None
            }
            Some(deadline) => Some(deadline.saturating_duration_since(now)),
            None => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeHandle {
        recv_calls: RefCell<usize>,
        readable: Vec<StreamId>,
        to_send: RefCell<Vec<Vec<u8>>>,
        established: bool,
        closed: bool,
        timeout: Option<Instant>,
    }

    impl QuicConnectionHandle for FakeHandle {
        fn recv(&mut self, datagram: &[u8]) -> Result<usize, Error> {
            *self.recv_calls.borrow_mut() += 1;
            Ok(datagram.len())
        }

        fn send(&mut self, out: &mut [u8]) -> Result<Option<usize>, Error> {
            let mut queue = self.to_send.borrow_mut();
            match queue.pop() {
                Some(bytes) => {
                    out[..bytes.len()].copy_from_slice(&bytes);
                    Ok(Some(bytes.len()))
                }
                None => Ok(None),
            }
        }

        fn readable_streams(&mut self) -> Vec<StreamId> {
            self.readable.clone()
        }

        fn stream_recv(&mut self, _id: StreamId, buf: &mut [u8]) -> Result<(usize, bool), Error> {
            let data = b"hello";
            buf[..data.len()].copy_from_slice(data);
            Ok((data.len(), true))
        }

        fn is_established(&self) -> bool {
            self.established
        }

        fn is_closed(&self) -> bool {
            self.closed
        }

        fn next_timeout(&self) -> Option<Instant> {
            self.timeout
        }

        fn on_timeout(&mut self) {}
    }

    #[test]
    fn on_datagram_received_surfaces_newly_readable_streams() {
        let handle = FakeHandle { readable: vec![StreamId::from(4)], ..Default::default() };
        let mut session = QuicSession::new(handle);
        let readable = session.on_datagram_received(b"datagram").unwrap();
        assert_eq!(readable, vec![StreamId::from(4)]);
    }

    #[test]
    fn read_stream_returns_data_and_fin() {
        let handle = FakeHandle::default();
        let mut session = QuicSession::new(handle);
        let (data, fin) = session.read_stream(StreamId::from(4), 16).unwrap();
        assert_eq!(&data[..], b"hello");
        assert!(fin);
    }

    #[test]
    fn drain_outbound_stops_once_the_handle_has_nothing_left() {
        let handle = FakeHandle { to_send: RefCell::new(vec![vec![1, 2, 3]]), ..Default::default() };
        let mut session = QuicSession::new(handle);
        let datagrams = session.drain_outbound().unwrap();
        assert_eq!(datagrams.len(), 1);
        assert_eq!(&datagrams[0].payload[..], &[1, 2, 3]);
    }

    #[test]
    fn poll_timeout_drives_on_timeout_once_the_deadline_passes() {
        let now = Instant::now();
        let handle = FakeHandle { timeout: Some(now - Duration::from_millis(1)), ..Default::default() };
        let mut session = QuicSession::new(handle);
        assert_eq!(session.poll_timeout(now), None);
    }
}

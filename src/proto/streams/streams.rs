//! The stream registry: owns every [`Stream`] in a connection, applies
//! inbound frames to the right one, enforces HTTP/2's flow-control and
//! lifecycle invariants, and hands out [`StreamRef`] handles the
//! session event loop and the application share.
//!
//! The teacher crate split this across `Recv`/`Send`/`Actions`/`Counts`
//! actors behind a `Peer` trait specializing client vs. server. That
//! split existed to let futures-0.1's `poll()`-driven task model share
//! state across the read half and write half of a connection without
//! re-entrant locking. Under `std::task::Waker` that problem doesn't
//! exist in the same shape, so this crate collapses it to one `Inner`
//! guarded by a `Mutex`, matching how the teacher's own later
//! descendants simplified the same module.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::HeaderMap;
use tokio::sync::Notify;

use crate::error::{Reason, RecvError, UserError};
use crate::frame::{self, StreamId};
use crate::proto::streams::flow_control::FlowControl;
use crate::proto::streams::state::State;
use crate::proto::streams::store::{Key, Store};
use crate::proto::streams::stream::Stream;

/// Thresholds for the rolling abuse-detection counters described in the
/// stream-state-machine design notes: too many client-reset streams, or
/// WINDOW_UPDATEs that trickle in far below the configured initial
/// window, both indicate a client that is spending connection resources
/// without making progress.
#[derive(Debug, Clone, Copy)]
pub struct AbuseLimits {
    pub max_resets_per_minute: u32,
    pub min_avg_window_update: u32,
}

impl Default for AbuseLimits {
    fn default() -> AbuseLimits {
        AbuseLimits { max_resets_per_minute: 20, min_avg_window_update: 1024 }
    }
}

#[derive(Debug)]
struct Inner {
    store: Store,
    local_initial_window: u32,
    remote_initial_window: u32,
    next_local_id: u32,
    conn_send_flow: FlowControl,
    conn_recv_flow: FlowControl,
    /// Streams the application hasn't yet been handed via `next_incoming`.
    pending_accept: VecDeque<StreamId>,
    accept_task: Option<Waker>,
    /// Streams with a queued-but-unsent local HEADERS block, in the
    /// order `send_headers` was called; the session event loop drains
    /// this once per iteration, ahead of buffered DATA.
    pending_header_frames: VecDeque<StreamId>,
    /// Streams with a queued-but-unsent trailer HEADERS block; drained
    /// once that stream's buffered outbound DATA is empty, so trailers
    /// never jump ahead of the body they're attached to.
    pending_trailer_frames: VecDeque<StreamId>,
    abuse: AbuseLimits,
    reset_history: VecDeque<Instant>,
    window_update_total: u64,
    window_update_count: u64,
    conn_error: Option<Reason>,
    /// Wakes a connection event loop parked on `io.next()` when the
    /// application queues outbound work from another task, since the
    /// loop otherwise has no reason to notice until the next inbound
    /// frame arrives.
    write_notify: Arc<Notify>,
}

#[derive(Debug)]
pub struct Streams {
    inner: Arc<Mutex<Inner>>,
}

impl Clone for Streams {
    fn clone(&self) -> Streams {
        Streams { inner: self.inner.clone() }
    }
}

/// A cloneable handle to a single stream's state, shared between the
/// session event loop and whatever application code is driving that
/// stream's request or response body.
#[derive(Debug, Clone)]
pub struct StreamRef {
    inner: Arc<Mutex<Inner>>,
    key: Key,
}

impl Streams {
    pub fn new(
        local_initial_window: u32,
        remote_initial_window: u32,
        first_local_id: u32,
        abuse: AbuseLimits,
    ) -> Streams {
        Streams {
            inner: Arc::new(Mutex::new(Inner {
                store: Store::new(),
                local_initial_window,
                remote_initial_window,
                next_local_id: first_local_id,
                conn_send_flow: FlowControl::new(remote_initial_window),
                conn_recv_flow: FlowControl::new(local_initial_window),
                pending_accept: VecDeque::new(),
                accept_task: None,
                pending_header_frames: VecDeque::new(),
                pending_trailer_frames: VecDeque::new(),
                abuse,
                reset_history: VecDeque::new(),
                window_update_total: 0,
                window_update_count: 0,
                conn_error: None,
                write_notify: Arc::new(Notify::new()),
            })),
        }
    }

    /// A handle the session event loop awaits alongside the transport
    /// read so it wakes promptly when another task queues outbound work.
    pub fn write_notify(&self) -> Arc<Notify> {
        self.lock().write_notify.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Allocates a fresh locally-initiated stream (client request, or
    /// server push) and returns a handle to it.
    pub fn open_local(&self) -> StreamRef {
        let mut me = self.lock();
        let id = StreamId::from(me.next_local_id);
        me.next_local_id += 2;
        let stream = Stream::new(id, me.local_initial_window, me.remote_initial_window);
        let key = me.store.insert(id, stream);
        drop(me);
        StreamRef { inner: self.inner.clone(), key }
    }

    /// Handles an inbound HEADERS frame: creates the stream if this is
    /// the first HEADERS on a remotely-initiated id, otherwise applies
    /// it as the response/trailers for an existing locally-initiated
    /// stream.
    pub fn recv_headers(
        &self,
        id: StreamId,
        pseudo: frame::Pseudo,
        fields: HeaderMap,
        end_stream: bool,
    ) -> Result<StreamRef, RecvError> {
        let mut me = self.lock();

        let (key, is_new) = match me.store.find_key(&id) {
            Some(key) => {
                let stream = me.store.get_mut(key).unwrap();
                if stream.recv_trailers.is_some() || stream.state.is_recv_closed() {
                    return Err(RecvError::Stream { id, reason: Reason::StreamClosed });
                }
                if stream.remote_opened {
                    // A second HEADERS frame from the remote is trailers,
                    // regardless of what the local side's own send_open
                    // already did to `state`.
                    stream.recv_trailers = Some(fields);
                    stream.state.recv_close().map_err(|_| RecvError::Stream { id, reason: Reason::ProtocolError })?;
                    stream.notify_recv();
                    return Ok(StreamRef { inner: self.inner.clone(), key });
                }
                (key, false)
            }
            None => {
                let stream = Stream::new(id, me.local_initial_window, me.remote_initial_window);
                (me.store.insert(id, stream), true)
            }
        };

        let stream = me.store.get_mut(key).unwrap();
        stream.state.recv_open(end_stream).map_err(|_| RecvError::Stream { id, reason: Reason::ProtocolError })?;
        stream.recv_pseudo = Some(pseudo);
        stream.recv_fields = Some(fields);
        stream.remote_opened = true;
        stream.notify_recv();
        if is_new {
            me.pending_accept.push_back(id);
            if let Some(w) = me.accept_task.take() {
                w.wake();
            }
        }

        Ok(StreamRef { inner: self.inner.clone(), key })
    }

    pub fn recv_data(&self, id: StreamId, data: Bytes, end_stream: bool) -> Result<(), RecvError> {
        let mut me = self.lock();
        let len = data.len() as u32;

        me.conn_recv_flow.send_data(len);

        let stream = me
            .store
            .find_mut(&id)
            .ok_or(RecvError::Stream { id, reason: Reason::StreamClosed })?;

        if stream.recv_flow.window_size() < len {
            return Err(RecvError::Stream { id, reason: Reason::FlowControlError });
        }
        stream.recv_flow.send_data(len);
        stream.recv_buffer.push_back(data);

        if end_stream {
            stream
                .state
                .recv_close()
                .map_err(|_| RecvError::Stream { id, reason: Reason::ProtocolError })?;
        }
        stream.notify_recv();
        Ok(())
    }

    pub fn recv_reset(&self, id: StreamId, reason: Reason) -> Result<(), RecvError> {
        let mut me = self.lock();
        me.reset_history.push_back(Instant::now());
        prune_reset_history(&mut me.reset_history);
        let abuse = me.abuse;
        let too_many_resets = me.reset_history.len() as u32 > abuse.max_resets_per_minute;

        if let Some(stream) = me.store.find_mut(&id) {
            stream.state.set_reset(reason);
            stream.reset_reason = Some(reason);
            stream.notify_recv();
            stream.notify_send();
        }

        if too_many_resets {
            return Err(RecvError::Connection(Reason::EnhanceYourCalm));
        }
        Ok(())
    }

    /// `id = None` means the connection-level window (stream id 0).
    pub fn recv_window_update(&self, id: Option<StreamId>, increment: u32) -> Result<(), RecvError> {
        let mut me = self.lock();
        me.window_update_total += increment as u64;
        me.window_update_count += 1;
        let abusing = avg_window_update_locked(&me).is_some_and(|avg| avg < me.abuse.min_avg_window_update);

        match id {
            None => me
                .conn_send_flow
                .increment(increment)
                .map_err(RecvError::Connection)?,
            Some(id) => {
                let stream = me
                    .store
                    .find_mut(&id)
                    .ok_or(RecvError::Stream { id, reason: Reason::StreamClosed })?;
                stream.send_flow.increment(increment).map_err(|reason| RecvError::Stream { id, reason })?;
                stream.notify_send();
            }
        }

        if abusing {
            return Err(RecvError::Connection(Reason::EnhanceYourCalm));
        }
        Ok(())
    }

    pub fn recv_goaway(&self) {
        let mut me = self.lock();
        me.conn_error = Some(Reason::NoError);
        me.store.for_each_mut(|s| s.notify_send());
    }

    /// Applies a peer `SETTINGS_INITIAL_WINDOW_SIZE` change to every
    /// open stream (RFC 7540 §6.9.2).
    pub fn apply_remote_initial_window(&self, new_value: u32) {
        let mut me = self.lock();
        let delta = new_value as i64 - me.remote_initial_window as i64;
        me.remote_initial_window = new_value;
        me.store.for_each_mut(|s| {
            s.send_flow.apply_initial_window_delta(delta);
            s.notify_send();
        });
    }

    /// Pops the next remotely-initiated stream the application hasn't
    /// seen yet, or registers the waker to be notified when one arrives.
    pub fn poll_accept(&self, cx: &mut Context<'_>) -> Poll<Option<StreamRef>> {
        let mut me = self.lock();
        if let Some(id) = me.pending_accept.pop_front() {
            let key = me.store.find_key(&id).expect("accepted stream missing from store");
            return Poll::Ready(Some(StreamRef { inner: self.inner.clone(), key }));
        }
        if me.conn_error.is_some() {
            return Poll::Ready(None);
        }
        me.accept_task = Some(cx.waker().clone());
        Poll::Pending
    }

    pub fn num_active_streams(&self) -> usize {
        self.lock().store.len()
    }

    /// Pops the next queued local HEADERS block, in the order
    /// `send_headers` was called.
    pub fn pop_pending_headers(&self) -> Option<(StreamId, frame::Pseudo, HeaderMap, bool)> {
        let mut me = self.lock();
        loop {
            let id = me.pending_header_frames.pop_front()?;
            if let Some(stream) = me.store.find_mut(&id) {
                if let Some((pseudo, fields, end_stream)) = stream.send_header_block.take() {
                    return Some((id, pseudo, fields, end_stream));
                }
            }
        }
    }

    /// Pops the next stream whose queued trailer block is ready to send
    /// (its buffered outbound DATA has fully drained), skipping over and
    /// re-queuing any stream whose DATA hasn't drained yet.
    pub fn pop_pending_trailers(&self) -> Option<(StreamId, HeaderMap)> {
        let mut me = self.lock();
        for _ in 0..me.pending_trailer_frames.len() {
            let id = me.pending_trailer_frames.pop_front()?;
            let ready = me.store.find_mut(&id).is_some_and(|s| s.send_buffer.is_empty());
            if !ready {
                me.pending_trailer_frames.push_back(id);
                continue;
            }
            if let Some(stream) = me.store.find_mut(&id) {
                if let Some(fields) = stream.send_trailer_block.take() {
                    return Some((id, fields));
                }
            }
        }
        None
    }

    /// Snapshot of every stream id currently in the registry, in
    /// insertion order; used by the write path to sweep for buffered
    /// outbound data once per event-loop iteration.
    pub fn active_ids(&self) -> Vec<StreamId> {
        self.lock().store.ids().copied().collect()
    }

    /// Pops the next chunk of `id`'s buffered outbound DATA, capped by
    /// `max_len` and by whichever of the connection or stream send
    /// window is tighter. Returns `None` if there is nothing buffered or
    /// no window to send it in. The returned flag is `true` iff the
    /// buffer is now empty and the local side has already closed, i.e.
    /// this chunk must carry END_STREAM.
    pub fn pop_send_chunk(&self, id: StreamId, max_len: u32) -> Option<(Bytes, bool)> {
        let mut me = self.lock();
        let conn_window = me.conn_send_flow.window_size();

        let stream = me.store.find_mut(&id)?;
        if stream.send_buffer.is_empty() {
            return None;
        }
        let cap = max_len.min(conn_window).min(stream.send_flow.window_size());
        if cap == 0 {
            return None;
        }

        let front_len = stream.send_buffer.front().unwrap().len() as u32;
        let take = front_len.min(cap);
        let mut chunk = stream.send_buffer.pop_front().unwrap();
        if take < chunk.len() as u32 {
            let rest = chunk.split_off(take as usize);
            stream.send_buffer.push_front(rest);
        }
        stream.send_flow.send_data(take);
        // If trailers are queued behind this data, END_STREAM belongs on
        // the trailing HEADERS frame, not this DATA frame.
        let end_stream =
            stream.send_buffer.is_empty() && stream.state.is_send_closed() && stream.send_trailer_block.is_none();

        me.conn_send_flow.send_data(take);

        Some((chunk, end_stream))
    }

    /// Average increment size received, used by abuse detection; `None`
    /// if no WINDOW_UPDATEs have arrived yet.
    pub fn avg_window_update(&self) -> Option<u32> {
        avg_window_update_locked(&self.lock())
    }

    /// Whether the rolling average WINDOW_UPDATE increment has fallen
    /// below `min_avg_window_update`, the same check `recv_window_update`
    /// already enforces live as each update arrives.
    pub fn is_abusing_window_updates(&self) -> bool {
        let me = self.lock();
        avg_window_update_locked(&me).is_some_and(|avg| avg < me.abuse.min_avg_window_update)
    }
}

fn avg_window_update_locked(me: &Inner) -> Option<u32> {
    if me.window_update_count == 0 {
        None
    } else {
        Some((me.window_update_total / me.window_update_count) as u32)
    }
}

fn prune_reset_history(history: &mut VecDeque<Instant>) {
    let cutoff = Instant::now() - Duration::from_secs(60);
    while matches!(history.front(), Some(t) if *t < cutoff) {
        history.pop_front();
    }
}

impl StreamRef {
    pub fn stream_id(&self) -> StreamId {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).store[self.key].id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Marks the stream as permitted to receive trailers even while its
    /// request/response body is still conceptually open; the upstream
    /// handler calls this once it knows no more DATA is coming but
    /// wants to attach trailers rather than close immediately.
    pub fn arm_trailers(&self) {
        self.lock().store[self.key].arm_trailers();
    }

    /// Validates and queues this stream's local HEADERS (request or
    /// response pseudo-headers plus regular fields) for the session
    /// event loop to encode and send.
    pub fn send_headers(&self, pseudo: frame::Pseudo, fields: HeaderMap, end_stream: bool) -> Result<(), UserError> {
        let mut me = self.lock();
        let stream = &mut me.store[self.key];
        stream.state.send_open(end_stream)?;
        stream.send_header_block = Some((pseudo, fields, end_stream));
        stream.notify_send();
        let id = stream.id;
        me.pending_header_frames.push_back(id);
        me.write_notify.notify_one();
        Ok(())
    }

    pub fn send_data(&self, data: Bytes, end_stream: bool) -> Result<(), UserError> {
        let mut me = self.lock();
        let len = data.len() as u32;
        let stream = &mut me.store[self.key];

        if stream.state.is_send_closed() {
            return Err(UserError::StreamClosed);
        }
        stream.send_flow.claim_capacity(len).map_err(|_| UserError::PayloadTooBig)?;
        stream.send_buffer.push_back(data);
        if end_stream {
            stream.state.send_close()?;
        }
        stream.notify_send();
        me.write_notify.notify_one();
        Ok(())
    }

    pub fn send_trailers(&self, fields: HeaderMap) -> Result<(), UserError> {
        let mut me = self.lock();
        let stream = &mut me.store[self.key];
        stream.can_send_trailers()?;
        stream.state.send_close()?;
        stream.send_trailer_block = Some(fields);
        let id = stream.id;
        stream.notify_send();
        me.pending_trailer_frames.push_back(id);
        me.write_notify.notify_one();
        Ok(())
    }

    pub fn send_reset(&self, reason: Reason) {
        let mut me = self.lock();
        let stream = &mut me.store[self.key];
        stream.state.set_reset(reason);
        stream.reset_reason = Some(reason);
        stream.notify_recv();
        stream.notify_send();
        me.write_notify.notify_one();
    }

    /// Pops the next buffered DATA chunk delivered from the peer, or
    /// registers for a wakeup when one (or end-of-stream) arrives.
    pub fn poll_data(&self, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        let mut me = self.lock();
        let stream = &mut me.store[self.key];
        if let Some(chunk) = stream.recv_buffer.pop_front() {
            return Poll::Ready(Some(chunk));
        }
        if stream.state.is_recv_closed() {
            return Poll::Ready(None);
        }
        stream.recv_task = Some(cx.waker().clone());
        Poll::Pending
    }

    /// Pops this stream's inbound pseudo-headers and regular fields once
    /// the HEADERS that opened (or answered) it has arrived: the
    /// request for a server-accepted stream, the response for a
    /// client-opened one. Consumes them, so poll only once per stream.
    pub fn poll_headers(&self, cx: &mut Context<'_>) -> Poll<Option<(frame::Pseudo, HeaderMap)>> {
        let mut me = self.lock();
        let stream = &mut me.store[self.key];
        if let Some(pseudo) = stream.recv_pseudo.take() {
            let fields = stream.recv_fields.take().unwrap_or_default();
            return Poll::Ready(Some((pseudo, fields)));
        }
        if stream.reset_reason.is_some() {
            return Poll::Ready(None);
        }
        stream.recv_task = Some(cx.waker().clone());
        Poll::Pending
    }

    pub fn poll_trailers(&self, cx: &mut Context<'_>) -> Poll<Option<HeaderMap>> {
        let mut me = self.lock();
        let stream = &mut me.store[self.key];
        if let Some(trailers) = stream.recv_trailers.take() {
            return Poll::Ready(Some(trailers));
        }
        if stream.state.is_recv_closed() {
            return Poll::Ready(None);
        }
        stream.recv_task = Some(cx.waker().clone());
        Poll::Pending
    }

    pub fn available_send_capacity(&self) -> u32 {
        self.lock().store[self.key].send_flow.available()
    }

    pub fn reset_reason(&self) -> Option<Reason> {
        self.lock().store[self.key].reset_reason
    }

    pub fn pseudo(&self) -> Option<frame::Pseudo> {
        self.lock().store[self.key].recv_pseudo.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixture() -> Streams {
        Streams::new(65_535, 65_535, 1, AbuseLimits::default())
    }

    #[test]
    fn recv_headers_creates_stream_and_queues_accept() {
        let streams = fixture();
        let id = StreamId::from(1);
        let ref1 = streams.recv_headers(id, frame::Pseudo::default(), HeaderMap::new(), false).unwrap();
        assert_eq!(ref1.stream_id(), id);
        assert_eq!(streams.num_active_streams(), 1);
    }

    #[test]
    fn recv_data_respects_stream_window() {
        let streams = fixture();
        let id = StreamId::from(1);
        streams.recv_headers(id, frame::Pseudo::default(), HeaderMap::new(), false).unwrap();
        let big = Bytes::from(vec![0u8; 70_000]);
        let err = streams.recv_data(id, big, false).unwrap_err();
        assert!(matches!(err, RecvError::Stream { reason: Reason::FlowControlError, .. }));
    }

    #[test]
    fn send_data_claims_and_releases_capacity() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        stream_ref.send_data(Bytes::from_static(b"hello"), false).unwrap();
        assert_eq!(stream_ref.available_send_capacity(), 65_535 - 5);
    }

    #[test]
    fn pop_send_chunk_splits_on_window_and_marks_end_stream() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        let id = stream_ref.stream_id();
        stream_ref.send_headers(frame::Pseudo::default(), HeaderMap::new(), false).unwrap();
        stream_ref.send_data(Bytes::from_static(b"hello world"), true).unwrap();

        let (chunk, end_stream) = streams.pop_send_chunk(id, 5).unwrap();
        assert_eq!(&chunk[..], b"hello");
        assert!(!end_stream);

        let (chunk, end_stream) = streams.pop_send_chunk(id, 64).unwrap();
        assert_eq!(&chunk[..], b" world");
        assert!(end_stream);
    }

    #[test]
    fn send_headers_is_queued_for_the_event_loop_to_drain() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        let id = stream_ref.stream_id();
        let pseudo = frame::Pseudo::request(http::Method::GET, None, None, Bytes::from_static(b"/"));
        stream_ref.send_headers(pseudo, HeaderMap::new(), true).unwrap();

        let (popped_id, popped_pseudo, _, end_stream) = streams.pop_pending_headers().unwrap();
        assert_eq!(popped_id, id);
        assert_eq!(popped_pseudo.method, Some(http::Method::GET));
        assert!(end_stream);
        assert!(streams.pop_pending_headers().is_none());
    }

    #[test]
    fn a_locally_opened_streams_first_inbound_headers_are_the_response_not_trailers() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        let id = stream_ref.stream_id();
        let request = frame::Pseudo::request(http::Method::GET, None, None, Bytes::from_static(b"/"));
        stream_ref.send_headers(request, HeaderMap::new(), true).unwrap();

        let response = frame::Pseudo::response(http::StatusCode::OK);
        streams.recv_headers(id, response, HeaderMap::new(), true).unwrap();

        let pseudo = stream_ref.pseudo().expect("response headers, not trailers");
        assert_eq!(pseudo.status, Some(http::StatusCode::OK));
    }

    #[test]
    fn window_update_increments_stream_and_connection() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        let id = stream_ref.stream_id();
        streams.recv_window_update(Some(id), 2_000).unwrap();
        streams.recv_window_update(None, 2_000).unwrap();
        assert_eq!(streams.avg_window_update(), Some(2_000));
    }

    #[test]
    fn a_window_update_smaller_than_the_abuse_floor_closes_the_connection() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        let id = stream_ref.stream_id();
        let err = streams.recv_window_update(Some(id), 1).unwrap_err();
        assert!(matches!(err, RecvError::Connection(Reason::EnhanceYourCalm)));
        assert!(streams.is_abusing_window_updates());
    }

    #[test]
    fn send_trailers_is_queued_once_buffered_data_drains() {
        let streams = fixture();
        let stream_ref = streams.open_local();
        let id = stream_ref.stream_id();
        stream_ref.send_headers(frame::Pseudo::default(), HeaderMap::new(), false).unwrap();
        stream_ref.send_data(Bytes::from_static(b"body"), false).unwrap();
        stream_ref.arm_trailers();
        let mut trailers = HeaderMap::new();
        trailers.insert("grpc-status", "0".parse().unwrap());
        stream_ref.send_trailers(trailers).unwrap();

        // trailers aren't ready yet: the DATA chunk hasn't drained
        assert!(streams.pop_pending_trailers().is_none());

        let (chunk, end_stream) = streams.pop_send_chunk(id, 64).unwrap();
        assert_eq!(&chunk[..], b"body");
        assert!(!end_stream, "END_STREAM belongs on the trailers, not the last DATA frame");

        let (popped_id, fields) = streams.pop_pending_trailers().expect("trailers now ready");
        assert_eq!(popped_id, id);
        assert_eq!(fields.get("grpc-status").unwrap(), "0");
    }
}

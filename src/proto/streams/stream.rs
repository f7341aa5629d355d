//! A single stream's mutable state: lifecycle, both flow-control
//! windows, buffered inbound data awaiting the application, and
//! buffered outbound data awaiting send-capacity.

use std::collections::VecDeque;
use std::task::Waker;

use bytes::Bytes;
use http::HeaderMap;

use crate::error::{Reason, UserError};
use crate::frame::{Pseudo, StreamId};
use crate::proto::streams::flow_control::FlowControl;
use crate::proto::streams::state::State;

#[derive(Debug)]
pub struct Stream {
    pub id: StreamId,
    pub state: State,

    pub send_flow: FlowControl,
    pub recv_flow: FlowControl,

    /// Set via `StreamRef::arm_trailers()`; once armed, the next
    /// `send_trailers` call is accepted even though a body is still
    /// open (resolves spec Open Question #3).
    pub trailers_armed: bool,

    /// Inbound DATA payloads not yet delivered to the application via
    /// `poll_data`.
    pub recv_buffer: VecDeque<Bytes>,
    pub recv_trailers: Option<HeaderMap>,

    /// Outbound DATA payloads queued behind insufficient send-window.
    pub send_buffer: VecDeque<Bytes>,

    /// The `:method`/`:path`/`:authority`/`:scheme` (request side) or
    /// `:status` (response side) pseudo-headers from the HEADERS frame
    /// that opened this stream.
    pub recv_pseudo: Option<Pseudo>,
    /// The regular (non-pseudo) fields from the same HEADERS frame as
    /// `recv_pseudo`; kept separate from `recv_trailers` so a second
    /// HEADERS block is unambiguously trailers.
    pub recv_fields: Option<HeaderMap>,

    /// Set once the remote's initial HEADERS has been processed, so a
    /// later HEADERS frame is recognized as trailers even after the
    /// application has drained `recv_pseudo`/`recv_fields` via
    /// `poll_headers`. Distinct from `state.is_idle()`: on a
    /// locally-opened stream the local side's own `send_open` already
    /// moves `state` off `Idle` before the remote's headers arrive.
    pub remote_opened: bool,

    /// Queued by `StreamRef::send_headers`, drained by the session event
    /// loop into a wire `frame::Headers`.
    pub send_header_block: Option<(Pseudo, HeaderMap, bool)>,

    /// Queued by `StreamRef::send_trailers`, drained once `send_buffer`
    /// is empty into a trailing, no-pseudo-headers, END_STREAM
    /// `frame::Headers`.
    pub send_trailer_block: Option<HeaderMap>,

    /// Woken once more recv data, recv trailers, or a reset arrives.
    pub recv_task: Option<Waker>,
    /// Woken once more send capacity becomes available.
    pub send_task: Option<Waker>,

    pub reset_reason: Option<Reason>,
}

impl Stream {
    pub fn new(id: StreamId, local_initial_window: u32, remote_initial_window: u32) -> Stream {
        Stream {
            id,
            state: State::default(),
            send_flow: FlowControl::new(remote_initial_window),
            recv_flow: FlowControl::new(local_initial_window),
            trailers_armed: false,
            recv_buffer: VecDeque::new(),
            recv_trailers: None,
            send_buffer: VecDeque::new(),
            recv_pseudo: None,
            recv_fields: None,
            remote_opened: false,
            send_header_block: None,
            send_trailer_block: None,
            recv_task: None,
            send_task: None,
            reset_reason: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    pub fn arm_trailers(&mut self) {
        self.trailers_armed = true;
    }

    pub fn can_send_trailers(&self) -> Result<(), UserError> {
        if self.state.is_send_closed() {
            return Err(UserError::StreamClosed);
        }
        if !self.trailers_armed {
            return Err(UserError::UnexpectedFrameType);
        }
        Ok(())
    }

    pub fn notify_recv(&mut self) {
        if let Some(w) = self.recv_task.take() {
            w.wake();
        }
    }

    pub fn notify_send(&mut self) {
        if let Some(w) = self.send_task.take() {
            w.wake();
        }
    }
}

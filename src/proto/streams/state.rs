//! Per-stream lifecycle state machine (RFC 7540 §5.1).

use crate::error::{Reason, UserError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    ReservedLocal,
    ReservedRemote,
    Open { local: Peer, remote: Peer },
    HalfClosedLocal(Peer),
    HalfClosedRemote(Peer),
    Closed(Cause),
}

/// Which side still has frames to send on a half-open stream, tracked
/// per direction so `poll_send`/`poll_recv` can tell whether END_STREAM
/// has already gone out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peer {
    AwaitingHeaders,
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
    EndStream,
    Error(Reason),
    Canceled,
}

impl State {
    pub fn is_closed(&self) -> bool {
        matches!(self, State::Closed(_))
    }

    pub fn is_recv_closed(&self) -> bool {
        matches!(self, State::HalfClosedRemote(_) | State::Closed(_))
    }

    pub fn is_send_closed(&self) -> bool {
        matches!(self, State::HalfClosedLocal(_) | State::Closed(_))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// Transitions on receiving the HEADERS frame that opens the remote
    /// side: the first HEADERS on a server-initiated (from the client's
    /// point of view) stream, or the response HEADERS on a stream the
    /// local side already opened with its own `send_open`.
    pub fn recv_open(&mut self, end_stream: bool) -> Result<(), UserError> {
        *self = match *self {
            State::Idle if end_stream => State::HalfClosedRemote(Peer::AwaitingHeaders),
            State::Idle => State::Open { local: Peer::AwaitingHeaders, remote: Peer::Streaming },
            State::ReservedRemote if end_stream => State::Closed(Cause::EndStream),
            State::ReservedRemote => State::HalfClosedLocal(Peer::Streaming),
            State::Open { local, remote: Peer::AwaitingHeaders } if end_stream => State::HalfClosedRemote(local),
            State::Open { local, remote: Peer::AwaitingHeaders } => State::Open { local, remote: Peer::Streaming },
            _ => return Err(UserError::UnexpectedFrameType),
        };
        Ok(())
    }

    /// Transitions on sending the local HEADERS that open the stream, or
    /// (for an already-`Open` stream whose local side hasn't sent
    /// headers yet, e.g. a server's response on a stream the client
    /// already opened) that answer it.
    pub fn send_open(&mut self, end_stream: bool) -> Result<(), UserError> {
        *self = match *self {
            State::Idle if end_stream => State::HalfClosedLocal(Peer::AwaitingHeaders),
            State::Idle => State::Open { local: Peer::Streaming, remote: Peer::AwaitingHeaders },
            State::ReservedLocal if end_stream => State::Closed(Cause::EndStream),
            State::ReservedLocal => State::HalfClosedRemote(Peer::Streaming),
            State::Open { local: Peer::AwaitingHeaders, remote } if end_stream => State::HalfClosedLocal(remote),
            State::Open { local: Peer::AwaitingHeaders, remote } => State::Open { local: Peer::Streaming, remote },
            _ => return Err(UserError::UnexpectedFrameType),
        };
        Ok(())
    }

    pub fn reserve_local(&mut self) -> Result<(), UserError> {
        match self {
            State::Idle => {
                *self = State::ReservedLocal;
                Ok(())
            }
            _ => Err(UserError::UnexpectedFrameType),
        }
    }

    pub fn reserve_remote(&mut self) -> Result<(), UserError> {
        match self {
            State::Idle => {
                *self = State::ReservedRemote;
                Ok(())
            }
            _ => Err(UserError::UnexpectedFrameType),
        }
    }

    /// Marks the remote-to-local direction closed, e.g. on receiving a
    /// DATA or trailers frame carrying END_STREAM.
    pub fn recv_close(&mut self) -> Result<(), UserError> {
        *self = match *self {
            State::Open { local, .. } => State::HalfClosedRemote(local),
            State::HalfClosedLocal(_) => State::Closed(Cause::EndStream),
            _ => return Err(UserError::UnexpectedFrameType),
        };
        Ok(())
    }

    /// Marks the local-to-remote direction closed, e.g. after sending
    /// our own END_STREAM.
    pub fn send_close(&mut self) -> Result<(), UserError> {
        *self = match *self {
            State::Open { remote, .. } => State::HalfClosedLocal(remote),
            State::HalfClosedRemote(_) => State::Closed(Cause::EndStream),
            _ => return Err(UserError::UnexpectedFrameType),
        };
        Ok(())
    }

    /// Abrupt closure on RST_STREAM, a connection-fatal error, or the
    /// local application dropping its handle early.
    pub fn set_reset(&mut self, reason: Reason) {
        *self = State::Closed(Cause::Error(reason));
    }

    pub fn set_canceled(&mut self) {
        if !self.is_closed() {
            *self = State::Closed(Cause::Canceled);
        }
    }
}

impl Default for State {
    fn default() -> State {
        State::Idle
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn client_request_without_body_half_closes_local_immediately() {
        let mut s = State::default();
        s.send_open(true).unwrap();
        assert!(s.is_send_closed());
        assert!(!s.is_recv_closed());
    }

    #[test]
    fn full_request_response_cycle_closes() {
        let mut s = State::default();
        s.send_open(false).unwrap();
        s.send_close().unwrap();
        assert!(s.is_send_closed());
        assert!(!s.is_recv_closed());
        s.recv_open(false).unwrap_err(); // local side already half-closed, not awaiting remote headers
    }

    #[test]
    fn reset_closes_from_any_state() {
        let mut s = State::default();
        s.send_open(false).unwrap();
        s.set_reset(Reason::Cancel);
        assert!(s.is_closed());
    }

    #[test]
    fn server_response_answers_an_already_open_stream() {
        let mut s = State::default();
        s.recv_open(false).unwrap(); // client request headers arrive
        s.send_open(true).unwrap(); // server sends a response with END_STREAM
        assert!(s.is_send_closed());
        assert!(!s.is_recv_closed());
    }

    #[test]
    fn client_stream_accepts_response_headers_after_sending_its_request() {
        // mirrors a client's own open_local + send_headers, which moves
        // the state off Idle before the server's response ever arrives
        let mut s = State::default();
        s.send_open(true).unwrap(); // request sent, no body
        assert!(!s.is_idle());
        s.recv_open(true).unwrap(); // response headers, END_STREAM
        assert!(s.is_closed());
    }

    #[test]
    fn client_stream_with_body_accepts_a_response_while_still_sending() {
        let mut s = State::default();
        s.send_open(false).unwrap(); // request headers, body still coming
        s.recv_open(false).unwrap(); // response headers arrive before the client finishes its body
        assert!(!s.is_send_closed());
        assert!(!s.is_recv_closed());
        s.send_close().unwrap();
        assert!(s.is_send_closed());
    }
}

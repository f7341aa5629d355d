//! The trait surface an upstream transport (a TCP socket, a QUIC
//! stream, or a test double) must offer the session layer. Kept
//! separate from `tokio::io::{AsyncRead, AsyncWrite}` so the session
//! event loop can also ask for timeout/flow-control/header hints
//! without downcasting, matching the adapter boundary the teacher draws
//! between its `proto` layer and the raw `T: AsyncRead + AsyncWrite`.

use std::time::Duration;

use http::HeaderMap;
use tokio::io::{AsyncRead, AsyncWrite};

/// Any transport the session can frame bytes over.
pub trait ReadWriteable: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> ReadWriteable for T {}

/// A transport that can report (and have set) idle/handshake timeouts,
/// e.g. a QUIC connection whose max_idle_timeout is a transport
/// parameter rather than an application-level timer.
pub trait TimeoutAware {
    fn idle_timeout(&self) -> Option<Duration>;
    fn set_idle_timeout(&mut self, timeout: Option<Duration>);
}

/// A transport with its own, lower-layer flow control (QUIC stream and
/// connection credit) that the HTTP/2-shaped session layer should defer
/// to rather than reimplementing.
pub trait FlowControlled {
    fn send_window(&self) -> u64;
    fn recv_window(&self) -> u64;
}

/// A transport or message type that can hand back a pre-parsed header
/// collection without this crate re-implementing header parsing (the
/// Non-goal of "general URL/MIME header representation" is satisfied by
/// always going through `http::HeaderMap`).
pub trait HeaderBearing {
    fn headers(&self) -> &HeaderMap;
}

impl HeaderBearing for HeaderMap {
    fn headers(&self) -> &HeaderMap {
        self
    }
}

//! Server side of the HTTP/2 session.
//!
//! [`handshake`] reads the client connection preface and returns a
//! [`Connection`] whose [`Connection::accept`] yields one
//! [`Accept`]/[`Respond`] pair per inbound request. As with the client
//! side, the returned `Connection` must be driven (via
//! [`Connection::drive`], typically on its own task) for any response
//! written through a `Respond` to actually reach the wire.
//!
//! ```no_run
//! # async fn example(io: tokio::net::TcpStream) -> Result<(), h2core::Error> {
//! let mut connection = h2core::server::handshake(io).await?;
//! while let Some((request, mut respond)) = connection.accept().await {
//!     let request = request?;
//!     let response = http::Response::builder().status(200).body(()).unwrap();
//!     respond.send_response(response, true)?;
//! }
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use http::{HeaderMap, Request, Response};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::Config;
use crate::error::{Error, SendError, UserError};
use crate::frame;
use crate::proto::{self, Role, StreamRef, CLIENT_PREFACE};
use crate::upstream::ReadWriteable;

/// A server-bound connection. Call [`accept`](Connection::accept) in a
/// loop to receive requests, and drive the connection (via
/// [`drive`](Connection::drive)) on whatever task should own the
/// transport's I/O.
pub struct Connection<T> {
    inner: proto::Connection<T>,
}

/// A single inbound request's response handle.
#[derive(Debug, Clone)]
pub struct Respond {
    stream: StreamRef,
}

/// Reads the client preface off `io`, then builds the connection with
/// default [`Config`] values.
pub async fn handshake<T>(io: T) -> Result<Connection<T>, Error>
where
    T: ReadWriteable,
{
    handshake_with_config(io, Config::default()).await
}

pub async fn handshake_with_config<T>(mut io: T, config: Config) -> Result<Connection<T>, Error>
where
    T: ReadWriteable,
{
    read_preface(&mut io).await?;

    let mut inner = proto::Connection::new(io, Role::Server, &config);
    inner.handshake().await?;
    Ok(Connection { inner })
}

/// Reads and validates the fixed 24-byte client connection preface
/// before any framing begins; RFC 7540 §3.5 requires this to precede
/// the first SETTINGS frame on every server-side connection.
async fn read_preface<T: AsyncRead + Unpin>(io: &mut T) -> Result<(), Error> {
    let mut buf = [0u8; CLIENT_PREFACE.len()];
    io.read_exact(&mut buf).await.map_err(Error::Io)?;
    if buf != CLIENT_PREFACE {
        return Err(Error::TransportFatal("invalid client connection preface"));
    }
    Ok(())
}

impl<T: ReadWriteable> Connection<T> {
    /// Waits for the next remotely-initiated stream and returns the
    /// request it opened with, paired with a handle for writing the
    /// response. Returns `None` once the peer has gone away and no
    /// further streams will arrive.
    pub async fn accept(&mut self) -> Option<(Result<Request<()>, SendError>, Respond)> {
        let stream = std::future::poll_fn(|cx| self.inner.streams().poll_accept(cx)).await?;

        let request = std::future::poll_fn(|cx| stream.poll_headers(cx))
            .await
            .map(|(pseudo, fields)| build_request(pseudo, fields))
            .unwrap_or_else(|| Err(SendError::User(UserError::StreamClosed)));

        let respond = Respond { stream };
        Some((request, respond))
    }

    /// Runs the frame-dispatch loop. Returns once the transport closes
    /// cleanly or a connection-fatal error occurs.
    pub async fn drive(mut self) -> Result<(), Error> {
        self.inner.drive().await
    }

    pub fn history(&self) -> &crate::History {
        self.inner.history()
    }
}

fn build_request(pseudo: frame::Pseudo, fields: HeaderMap) -> Result<Request<()>, SendError> {
    let method = pseudo.method.ok_or(SendError::User(UserError::MalformedHeaders))?;
    let path = pseudo.path.unwrap_or_else(|| Bytes::from_static(b"/"));

    let mut uri = String::new();
    if let Some(authority) = &pseudo.authority {
        uri.push_str(&String::from_utf8_lossy(authority));
    }
    uri.push_str(&String::from_utf8_lossy(&path));

    let mut builder = Request::builder().method(method);
    builder = builder.uri(if uri.is_empty() { "/".to_string() } else { uri });
    if let Some(headers) = builder.headers_mut() {
        *headers = fields;
    }
    builder.body(()).map_err(|_| SendError::User(UserError::MalformedHeaders))
}

impl Respond {
    /// Sends the response HEADERS. `end_of_stream` should be `true` for
    /// a response with no body.
    pub fn send_response(&mut self, response: Response<()>, end_of_stream: bool) -> Result<(), UserError> {
        let (parts, _) = response.into_parts();
        let pseudo = frame::Pseudo::response(parts.status);
        self.stream.send_headers(pseudo, parts.headers, end_of_stream)
    }

    pub fn send_data(&mut self, data: Bytes, end_of_stream: bool) -> Result<(), UserError> {
        self.stream.send_data(data, end_of_stream)
    }

    pub fn send_trailers(&mut self, trailers: HeaderMap) -> Result<(), UserError> {
        self.stream.arm_trailers();
        self.stream.send_trailers(trailers)
    }

    pub fn reset(&mut self, reason: crate::Reason) {
        self.stream.send_reset(reason);
    }

    pub fn capacity(&self) -> u32 {
        self.stream.available_send_capacity()
    }
}

//! Client side of the HTTP/2 session.
//!
//! Running a client means establishing the underlying connection (a
//! `TcpStream`, a TLS stream, a QUIC stream — anything implementing
//! [`ReadWriteable`]) and passing it to [`handshake`]. That returns a
//! [`SendRequest`] handle used to initiate requests and a [`Connection`]
//! that must be polled (or `await`ed via [`Connection::drive`]) to
//! actually move bytes; nothing [`SendRequest`] does takes effect until
//! the connection is being driven, typically on its own spawned task.
//!
//! ```no_run
//! # async fn example(io: tokio::net::TcpStream) -> Result<(), h2core::Error> {
//! let (send_request, connection) = h2core::client::handshake(io).await?;
//! tokio::spawn(async move {
//!     if let Err(e) = connection.drive().await {
//!         eprintln!("connection error: {e}");
//!     }
//! });
//!
//! let request = http::Request::builder()
//!     .uri("https://example.com/")
//!     .body(())
//!     .unwrap();
//! let (response, mut body) = send_request.send_request(request, true)?;
//! let response = response.await?;
//! assert_eq!(response.status(), http::StatusCode::OK);
//! # let _ = &mut body;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http::{HeaderMap, Request, Response};
use tokio::io::AsyncWriteExt;

use crate::config::Config;
use crate::error::{Error, SendError, UserError};
use crate::frame;
use crate::proto::{self, Role, StreamRef, CLIENT_PREFACE};
use crate::upstream::ReadWriteable;

/// A cloneable handle used to initiate new requests. Cheap to clone: it
/// only holds the shared stream registry, the same one the driving
/// [`Connection`] owns.
#[derive(Clone, Debug)]
pub struct SendRequest {
    streams: proto::Streams,
}

/// Drives the connection's frame dispatch loop. Must be polled (via
/// [`Connection::drive`]) for any queued request or response body to
/// actually reach the wire.
pub struct Connection<T> {
    inner: proto::Connection<T>,
}

/// A future that resolves to the peer's response once its headers
/// arrive; the response body streams through the attached
/// [`RecvStream`].
#[derive(Debug)]
#[must_use = "a ResponseFuture does nothing unless polled"]
pub struct ResponseFuture {
    stream: StreamRef,
}

/// The write half of a request: used to stream a request body (and
/// optional trailers) after `send_request` has already sent the
/// request HEADERS.
#[derive(Debug, Clone)]
pub struct SendStream {
    stream: StreamRef,
}

/// The read half of a response body, embedded in the `Response<T>`
/// the [`ResponseFuture`] resolves to.
#[derive(Debug)]
pub struct RecvStream {
    stream: StreamRef,
}

impl RecvStream {
    /// Waits for the next chunk of body data, or `None` once the
    /// stream has ended (with or without trailers).
    pub async fn data(&mut self) -> Option<Bytes> {
        std::future::poll_fn(|cx| self.stream.poll_data(cx)).await
    }

    /// Waits for trailers; only meaningful after `data()` has returned
    /// `None`.
    pub async fn trailers(&mut self) -> Option<HeaderMap> {
        std::future::poll_fn(|cx| self.stream.poll_trailers(cx)).await
    }
}

/// Performs the handshake (client preface, initial SETTINGS) with
/// default [`Config`] values. Use [`handshake_with_config`] to customize
/// window sizes, frame size limits, or priority.
pub async fn handshake<T>(io: T) -> Result<(SendRequest, Connection<T>), Error>
where
    T: ReadWriteable,
{
    handshake_with_config(io, Config::default()).await
}

pub async fn handshake_with_config<T>(mut io: T, config: Config) -> Result<(SendRequest, Connection<T>), Error>
where
    T: ReadWriteable,
{
    io.write_all(CLIENT_PREFACE).await.map_err(Error::Io)?;

    let mut inner = proto::Connection::new(io, Role::Client, &config);
    inner.handshake().await?;

    let send_request = SendRequest { streams: inner.streams().clone() };
    Ok((send_request, Connection { inner }))
}

impl SendRequest {
    /// Initiates a new stream carrying `request`'s method, scheme,
    /// authority, path, and regular headers. `end_of_stream` should be
    /// `true` for a request with no body (GET, HEAD, ...).
    pub fn send_request(&self, request: Request<()>, end_of_stream: bool) -> Result<(ResponseFuture, SendStream), SendError> {
        let stream = self.streams.open_local();
        let (parts, _) = request.into_parts();

        let scheme = parts.uri.scheme_str().map(|s| Bytes::copy_from_slice(s.as_bytes()));
        let authority = parts.uri.authority().map(|a| Bytes::copy_from_slice(a.as_str().as_bytes()));
        let path = parts
            .uri
            .path_and_query()
            .map(|p| Bytes::copy_from_slice(p.as_str().as_bytes()))
            .unwrap_or_else(|| Bytes::from_static(b"/"));

        let pseudo = frame::Pseudo::request(parts.method, scheme, authority, path);
        stream.send_headers(pseudo, parts.headers, end_of_stream)?;

        let response = ResponseFuture { stream: stream.clone() };
        let send_stream = SendStream { stream };
        Ok((response, send_stream))
    }

    pub fn num_active_streams(&self) -> usize {
        self.streams.num_active_streams()
    }
}

impl Future for ResponseFuture {
    type Output = Result<Response<RecvStream>, SendError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.stream.poll_headers(cx) {
            Poll::Ready(Some((pseudo, fields))) => {
                let status = pseudo.status.unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);
                let mut builder = Response::builder().status(status);
                if let Some(headers) = builder.headers_mut() {
                    *headers = fields;
                }
                let body = RecvStream { stream: self.stream.clone() };
                Poll::Ready(builder.body(body).map_err(|_| SendError::User(UserError::MalformedHeaders)))
            }
            Poll::Ready(None) => match self.stream.reset_reason() {
                Some(reason) => Poll::Ready(Err(SendError::Connection(Error::Connection(reason)))),
                None => Poll::Ready(Err(SendError::User(UserError::StreamClosed))),
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

impl SendStream {
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

    /// Bytes this stream could send right now without exceeding either
    /// the connection or the stream's peer flow-control window.
    pub fn capacity(&self) -> u32 {
        self.stream.available_send_capacity()
    }
}

impl<T: ReadWriteable> Connection<T> {
    /// Runs the frame-dispatch loop. Returns once the transport closes
    /// cleanly or a connection-fatal error occurs.
    pub async fn drive(mut self) -> Result<(), Error> {
        self.inner.drive().await
    }

    pub fn history(&self) -> &crate::History {
        self.inner.history()
    }
}

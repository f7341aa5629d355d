//! The per-connection session event loop: preface handling, frame
//! dispatch, and the write-scheduling / shutdown state machine
//! described in the session-layer design notes.
//!
//! Grounded on the teacher's `proto/connection.rs` shape (one `Codec`,
//! one `PingPong`, one `Settings` tracker, one `Streams` registry owned
//! by a single connection object) but driven with `async`/`await` over
//! `tokio_util::codec::Framed` instead of a hand-rolled futures-0.1
//! `Stream`/`Sink` pair.

use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio_util::codec::Framed;
use tracing::{debug, trace, warn};

use crate::codec::Codec;
use crate::config::Config;
use crate::error::{Error, Reason, RecvError};
use crate::frame::{self, Frame, StreamId};
use crate::history::History;
use crate::proto::ping_pong::PingPong;
use crate::proto::settings::{LocalSettings, PeerSettings};
use crate::proto::streams::{StreamRef, Streams, WriteScheduler};
use crate::upstream::ReadWriteable;

pub const CLIENT_PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

/// The connection-level shutdown state machine named in the session
/// design notes: `NONE` while healthy, then progressing one-way as
/// GOAWAY is decided on, sent, and finally all streams drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    None,
    NotInitiated,
    Initiated,
    InProgress,
}

pub struct Connection<T> {
    io: Framed<T, Codec>,
    role: Role,
    local_settings: LocalSettings,
    peer_settings: PeerSettings,
    local_settings_acked: bool,
    ping_pong: PingPong,
    streams: Streams,
    scheduler: WriteScheduler,
    history: History,
    shutdown: Shutdown,
}

impl<T: ReadWriteable> Connection<T> {
    pub fn new(io: T, role: Role, config: &Config) -> Connection<T> {
        let codec = Codec::new(config.max_frame_size() as usize, config.header_table_size() as usize);

        let local_settings = LocalSettings {
            header_table_size: config.header_table_size(),
            enable_push: config.enable_push(),
            max_concurrent_streams: config.max_concurrent_streams(),
            initial_window_size: config.initial_window_size(),
            max_frame_size: config.max_frame_size(),
            max_header_list_size: config.max_header_list_size(),
        };

        let first_local_id = match role {
            Role::Client => 1,
            Role::Server => 2,
        };

        let streams = Streams::new(
            config.initial_window_size(),
            frame::DEFAULT_INITIAL_WINDOW_SIZE,
            first_local_id,
            config.abuse_limits(),
        );

        let mut history = History::new();
        history.mark_accept();

        Connection {
            io: Framed::new(io, codec),
            role,
            local_settings,
            peer_settings: PeerSettings::default(),
            local_settings_acked: false,
            ping_pong: PingPong::new(),
            streams,
            scheduler: WriteScheduler::new(config.enable_priority()),
            history,
            shutdown: Shutdown::None,
        }
    }

    pub fn streams(&self) -> &Streams {
        &self.streams
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Opens a new locally-initiated stream, for a client request or a
    /// server push (push is accepted by the registry but never offered
    /// unless the peer's SETTINGS_ENABLE_PUSH says it will accept one).
    pub fn open_stream(&self) -> StreamRef {
        self.streams.open_local()
    }

    /// Sends the connection preface (server side only; a client's
    /// preface byte string is written by the handshake helper in
    /// `client.rs` before a `Connection` is constructed) and the
    /// initial local SETTINGS frame.
    pub async fn handshake(&mut self) -> Result<(), Error> {
        self.io.send(Frame::Settings(self.local_settings.to_frame())).await?;
        Ok(())
    }

    /// Runs the frame-dispatch loop until the peer's GOAWAY has been
    /// processed and every stream it still allowed to finish has
    /// closed, or until a connection-fatal error occurs.
    ///
    /// `SendRequest`/`SendStream`/`StreamRef` calls happen from whatever
    /// task is driving the application, not this one, so each iteration
    /// races the transport read against a `Notify` those calls ping;
    /// without it a request queued while this loop is parked on
    /// `io.next()` wouldn't go out until the next inbound frame woke it.
    pub async fn drive(&mut self) -> Result<(), Error> {
        let write_notify = self.streams.write_notify();
        loop {
            self.flush_pongs().await?;
            self.flush_pending_headers().await?;
            self.flush_stream_data().await?;
            self.flush_pending_trailers().await?;

            tokio::select! {
                frame = self.io.next() => {
                    match frame {
                        Some(Ok(frame)) => {
                            trace!(stream_id = ?frame.stream_id(), "dispatching inbound frame");
                            if let Err(err) = self.dispatch(frame).await {
                                self.handle_recv_error(err).await?;
                            }
                        }
                        Some(Err(err)) => {
                            self.handle_recv_error(err).await?;
                        }
                        None => {
                            self.history.mark_close();
                            return Ok(());
                        }
                    }
                }
                _ = write_notify.notified() => {}
            }

            if self.shutdown == Shutdown::InProgress && self.streams.num_active_streams() == 0 {
                self.history.mark_close();
                return Ok(());
            }
        }
    }

    async fn dispatch(&mut self, frame: Frame) -> Result<(), RecvError> {
        match frame {
            Frame::Settings(settings) => self.recv_settings(settings).await?,
            Frame::Ping(ping) => {
                if let Some(ack) = self.ping_pong.recv_ping(ping) {
                    debug!(payload = ?ack.payload(), "received ping ack");
                }
            }
            Frame::WindowUpdate(wu) => {
                let id = wu.stream_id();
                let target = if id.is_zero() { None } else { Some(id) };
                self.streams.recv_window_update(target, wu.size_increment())?;
            }
            Frame::Headers(headers) => {
                let id = headers.stream_id();
                let end_stream = headers.is_end_stream();
                let (pseudo, fields) = headers.into_parts();
                self.streams.recv_headers(id, pseudo, fields, end_stream)?;
            }
            Frame::Data(data) => {
                let id = data.stream_id();
                let end_stream = data.is_end_stream();
                self.streams.recv_data(id, data.into_payload(), end_stream)?;
            }
            Frame::Reset(reset) => {
                self.streams.recv_reset(reset.stream_id(), reset.reason())?;
                self.scheduler.remove(reset.stream_id());
            }
            Frame::Priority(priority) => {
                self.scheduler.reprioritize(priority.stream_id(), priority.dependency());
            }
            Frame::GoAway(goaway) => {
                warn!(reason = ?goaway.reason(), "peer sent GOAWAY");
                self.streams.recv_goaway();
                self.shutdown = Shutdown::InProgress;
            }
            Frame::PushPromise(_) => {
                return Err(RecvError::Connection(Reason::RefusedStream));
            }
        }
        Ok(())
    }

    async fn recv_settings(&mut self, settings: frame::Settings) -> Result<(), RecvError> {
        if settings.is_ack() {
            self.local_settings_acked = true;
            return Ok(());
        }
        self.peer_settings.apply(&settings, self.io.codec_mut(), &self.streams);
        self.io
            .send(Frame::Settings(frame::Settings::ack()))
            .await
            .map_err(RecvError::Io)
    }

    /// Sweeps every active stream once for buffered outbound DATA and
    /// writes what the connection and stream send windows allow. Streams
    /// are visited in registry order; with priority disabled (the
    /// default) this is round-robin enough, since every stream gets a
    /// turn each loop iteration regardless of how much of its buffer it
    /// drained last time.
    async fn flush_stream_data(&mut self) -> Result<(), Error> {
        let max_frame_size = self.peer_settings.max_frame_size;
        for id in self.streams.active_ids() {
            while let Some((chunk, end_stream)) = self.streams.pop_send_chunk(id, max_frame_size) {
                let is_end = end_stream;
                self.io.send(Frame::Data(frame::Data::new(id, chunk, is_end))).await?;
                if is_end {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Drains every local HEADERS block the application queued via
    /// `StreamRef::send_headers` and encodes/sends each as a wire frame.
    async fn flush_pending_headers(&mut self) -> Result<(), Error> {
        while let Some((id, pseudo, fields, end_stream)) = self.streams.pop_pending_headers() {
            let mut headers = frame::Headers::new(id, pseudo, fields);
            if end_stream {
                headers.set_end_stream();
            }
            self.io.send(Frame::Headers(headers)).await?;
        }
        Ok(())
    }

    /// Drains every stream whose trailers are ready (its buffered
    /// outbound DATA has fully drained) and sends each as a trailing
    /// HEADERS frame carrying END_STREAM and no pseudo-headers.
    async fn flush_pending_trailers(&mut self) -> Result<(), Error> {
        while let Some((id, fields)) = self.streams.pop_pending_trailers() {
            self.io.send(Frame::Headers(frame::Headers::trailers(id, fields))).await?;
        }
        Ok(())
    }

    async fn flush_pongs(&mut self) -> Result<(), Error> {
        while self.ping_pong.has_pending_pong() {
            if let Some(pong) = self.ping_pong.pop_pending_pong() {
                self.io.send(pong).await?;
            }
        }
        Ok(())
    }

    /// Converts a recv-time error into the appropriate action: a
    /// stream-scoped error sends RST_STREAM and keeps the connection
    /// alive, a connection-scoped error sends GOAWAY and begins
    /// shutdown.
    async fn handle_recv_error(&mut self, err: RecvError) -> Result<(), Error> {
        match err {
            RecvError::Stream { id, reason } => {
                debug!(?id, ?reason, "resetting stream after recv error");
                self.io.send(Frame::Reset(frame::Reset::new(id, reason))).await?;
                self.scheduler.remove(id);
                Ok(())
            }
            RecvError::Connection(reason) => {
                warn!(?reason, "connection error, sending GOAWAY");
                self.io
                    .send(Frame::GoAway(frame::GoAway::new(StreamId::ZERO, reason)))
                    .await?;
                self.shutdown = Shutdown::InProgress;
                Err(Error::Connection(reason))
            }
            RecvError::Io(io_err) => Err(Error::Io(io_err)),
        }
    }

    pub async fn send_frame(&mut self, frame: Frame<Bytes>) -> Result<(), Error> {
        self.io.send(frame).await?;
        Ok(())
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

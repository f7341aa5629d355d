//! The session layer: frame dispatch, SETTINGS/ping bookkeeping, and
//! the stream registry that spec.md's stream-state-machine module
//! describes.

mod connection;
mod ping_pong;
pub(crate) mod settings;
pub(crate) mod streams;

pub use self::connection::{Connection, Role, CLIENT_PREFACE};
pub(crate) use self::ping_pong::PingPong;
pub(crate) use self::settings::{LocalSettings, PeerSettings};
pub(crate) use self::streams::{AbuseLimits, StreamRef, Streams, WriteScheduler};

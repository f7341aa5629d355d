//! An HTTP/2 session and stream engine: frame codec, HPACK dynamic
//! table, stream-lifecycle/flow-control state machine, and a QUIC/TLS
//! 1.3 session bootstrap layer (certificate resolution, key schedule,
//! stateless retry, congestion control) for running the same session
//! core over either transport.
//!
//! [`client`] and [`server`] are the two entry points; both build on
//! [`proto::Connection`], which owns the frame codec, the HPACK tables,
//! and the [`proto::Streams`] registry. [`quic`] is the QUIC-specific
//! transport adapter layered underneath the same session core for
//! HTTP/3.

pub mod client;
mod codec;
pub mod config;
mod error;
mod frame;
pub mod history;
mod hpack;
mod proto;
pub mod quic;
pub mod server;
mod upstream;

pub use config::Config;
pub use error::{Error, Reason};
pub use frame::StreamId;
pub use history::History;
pub use proto::Role;

//! QUIC/TLS 1.3 session bootstrap: a transport-agnostic adapter over a
//! QUIC implementation handle ([`session`]), the TLS key schedule that
//! feeds it packet-protection keys ([`tls`]), server certificate
//! resolution ([`cert`]), stateless retry ([`retry`]), and the loss-based
//! congestion controller that bounds how much the adapter may send
//! ([`congestion`]).
//!
//! This module does not itself decode HTTP/3 framing — spec.md scopes
//! that to "the HTTP/3 or HTTP/0.9 pseudo-stream above" the transport
//! adapter, so it is out of scope here. What lives here is the part
//! that is genuinely shared infrastructure regardless of which
//! application protocol rides on top: datagram plumbing, key
//! derivation, cert switching, and congestion control.

pub mod cert;
pub mod congestion;
pub mod packet;
pub mod retry;
pub mod session;
pub mod tls;

pub use cert::{MultiCertResolver, ResolvesCert};
pub use congestion::CongestionController;
pub use packet::{Direction, EncryptionLevel, PacketInfo};
pub use retry::RetrySecret;
pub use session::{Datagram, QuicConnectionHandle, QuicSession};
pub use tls::{AeadAlgorithm, KeyStore};

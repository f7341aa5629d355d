//! Certificate resolution for the QUIC-TLS `cert` callback: SNI exact
//! match, then SNI wildcard match, then an IP-address fallback keyed
//! on the local endpoint the connection was accepted on — the three
//! steps `QUICMultiCertConfigLoader`'s `ssl_servername_cb` runs in
//! order.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// A loaded certificate chain and private key, opaque to this crate;
/// callers hand back whatever their TLS stack's certified-key type is
/// (e.g. `rustls::sign::CertifiedKey`).
pub trait CertifiedKey: Send + Sync + std::fmt::Debug {}
impl<T: Send + Sync + std::fmt::Debug> CertifiedKey for T {}

/// Models `rustls::server::ResolvesServerCert`, generalized so this
/// crate need not depend on a specific TLS stack's `ClientHello` type.
pub trait ResolvesCert: Send + Sync {
    type Key: CertifiedKey;

    fn resolve(&self, server_name: Option<&str>, local_addr: IpAddr) -> Option<Arc<Self::Key>>;
}

/// The map-based resolver configured at startup: exact SNI names,
/// wildcard SNI suffixes (`*.example.com`), and an IP-address fallback,
/// consulted in that order.
#[derive(Debug)]
pub struct MultiCertResolver<K> {
    exact: HashMap<String, Arc<K>>,
    wildcard: HashMap<String, Arc<K>>,
    by_address: HashMap<IpAddr, Arc<K>>,
}

impl<K> Default for MultiCertResolver<K> {
    fn default() -> Self {
        MultiCertResolver { exact: HashMap::new(), wildcard: HashMap::new(), by_address: HashMap::new() }
    }
}

impl<K: CertifiedKey> MultiCertResolver<K> {
    pub fn new() -> MultiCertResolver<K> {
        MultiCertResolver::default()
    }

    /// Registers `key` for `name`, which may be an exact hostname or a
    /// `*.`-prefixed wildcard.
    pub fn add_sni(&mut self, name: &str, key: Arc<K>) {
        if let Some(suffix) = name.strip_prefix("*.") {
            self.wildcard.insert(suffix.to_ascii_lowercase(), key);
        } else {
            self.exact.insert(name.to_ascii_lowercase(), key);
        }
    }

    pub fn add_address(&mut self, addr: IpAddr, key: Arc<K>) {
        self.by_address.insert(addr, key);
    }

    fn wildcard_match(&self, server_name: &str) -> Option<&Arc<K>> {
        let (_, suffix) = server_name.split_once('.')?;
        self.wildcard.get(suffix)
    }
}

impl<K: CertifiedKey> ResolvesCert for MultiCertResolver<K> {
    type Key = K;

    fn resolve(&self, server_name: Option<&str>, local_addr: IpAddr) -> Option<Arc<K>> {
        if let Some(name) = server_name {
            let name = name.to_ascii_lowercase();
            if let Some(key) = self.exact.get(&name) {
                return Some(key.clone());
            }
            if let Some(key) = self.wildcard_match(&name) {
                return Some(key.clone());
            }
        }
        self.by_address.get(&local_addr).cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::Ipv4Addr;

    fn addr() -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
    }

    #[test]
    fn exact_sni_wins_over_wildcard_and_address() {
        let mut resolver = MultiCertResolver::new();
        resolver.add_sni("*.example.com", Arc::new("wildcard"));
        resolver.add_sni("api.example.com", Arc::new("exact"));
        resolver.add_address(addr(), Arc::new("by-ip"));

        let resolved = resolver.resolve(Some("api.example.com"), addr()).unwrap();
        assert_eq!(*resolved, "exact");
    }

    #[test]
    fn falls_back_to_wildcard_when_no_exact_match() {
        let mut resolver = MultiCertResolver::new();
        resolver.add_sni("*.example.com", Arc::new("wildcard"));

        let resolved = resolver.resolve(Some("sub.example.com"), addr()).unwrap();
        assert_eq!(*resolved, "wildcard");
    }

    #[test]
    fn falls_back_to_address_when_sni_is_absent_or_unmatched() {
        let mut resolver = MultiCertResolver::new();
        resolver.add_address(addr(), Arc::new("by-ip"));

        assert_eq!(*resolver.resolve(None, addr()).unwrap(), "by-ip");
        assert_eq!(*resolver.resolve(Some("unknown.example.org"), addr()).unwrap(), "by-ip");
    }

    #[test]
    fn no_match_anywhere_fails_the_handshake() {
        let resolver: MultiCertResolver<&str> = MultiCertResolver::new();
        assert!(resolver.resolve(Some("example.com"), addr()).is_none());
    }
}

//! QUIC-TLS key schedule: derives packet-protection material from a
//! TLS 1.3 secret using `HKDF-Expand-Label`, the way the original
//! `QUICTLS_legacy` callback does on every secret the TLS stack hands
//! it, once per (encryption level, direction).
//!
//! `ring` doesn't expose `HKDF-Expand-Label` directly (only bare
//! HKDF-Expand), so the label is hand-assembled the way `rustls`' own
//! QUIC support and `quinn-proto` do: a 2-byte length, a 1-byte
//! `"tls13 " + label` length-prefixed string, and a zero-length
//! context octet.

use ring::hkdf::{Prk, HKDF_SHA256, HKDF_SHA384};

use crate::quic::packet::{Direction, EncryptionLevel};

/// The negotiated AEAD, mirroring the cipher-suite switch in the
/// original `QUICTLS_legacy::_get_aead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadAlgorithm {
    Aes128Gcm,
    Aes256Gcm,
    Chacha20Poly1305,
    Aes128Ccm,
    Aes128Ccm8,
}

impl AeadAlgorithm {
    pub fn key_len(self) -> usize {
        match self {
            AeadAlgorithm::Aes128Gcm | AeadAlgorithm::Chacha20Poly1305 | AeadAlgorithm::Aes128Ccm | AeadAlgorithm::Aes128Ccm8 => 16,
            AeadAlgorithm::Aes256Gcm => 32,
        }
    }

    /// Header-protection keys are always this many bytes for the AEADs
    /// QUIC allows (AES-based HP uses the same length as the AEAD key;
    /// ChaCha20-based HP always uses a 32-byte key).
    pub fn hp_key_len(self) -> usize {
        match self {
            AeadAlgorithm::Chacha20Poly1305 => 32,
            other => other.key_len(),
        }
    }
}

/// Derived packet-protection material for one (level, direction) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketProtectionKeys {
    pub key: Vec<u8>,
    pub iv: [u8; 12],
    pub header_protection_key: Vec<u8>,
}

/// Installed into a store indexed by (level, direction), matching the
/// original adapter's "packet protection key store".
#[derive(Debug, Default)]
pub struct KeyStore {
    entries: Vec<((EncryptionLevel, Direction), PacketProtectionKeys)>,
}

impl KeyStore {
    pub fn new() -> KeyStore {
        KeyStore::default()
    }

    pub fn install(&mut self, level: EncryptionLevel, direction: Direction, keys: PacketProtectionKeys) {
        self.entries.retain(|(k, _)| *k != (level, direction));
        self.entries.push(((level, direction), keys));
    }

    pub fn get(&self, level: EncryptionLevel, direction: Direction) -> Option<&PacketProtectionKeys> {
        self.entries.iter().find(|(k, _)| *k == (level, direction)).map(|(_, v)| v)
    }
}

/// Runs the per-secret callback: derive key/iv/hp from `secret` and
/// install them into `store` for `(level, direction)`. `secret` is the
/// per-level, per-direction TLS 1.3 exporter secret the handshake
/// library hands over as each encryption level comes up.
pub fn on_secret_available(store: &mut KeyStore, level: EncryptionLevel, direction: Direction, secret: &[u8], aead: AeadAlgorithm, use_sha384: bool) {
    // RFC 9001 §5.1 derives key/iv/hp straight from the already-final
    // per-level TLS secret via HKDF-Expand-Label, with no separate
    // HKDF-Extract step; `new_less_safe` treats `secret` itself as the
    // PRK rather than re-extracting it.
    let hkdf_alg = if use_sha384 { HKDF_SHA384 } else { HKDF_SHA256 };
    let prk = Prk::new_less_safe(hkdf_alg, secret);

    let key = hkdf_expand_label(&prk, b"quic key", aead.key_len());
    let iv_bytes = hkdf_expand_label(&prk, b"quic iv", 12);
    let header_protection_key = hkdf_expand_label(&prk, b"quic hp", aead.hp_key_len());

    let mut iv = [0u8; 12];
    iv.copy_from_slice(&iv_bytes);

    store.install(level, direction, PacketProtectionKeys { key, iv, header_protection_key });
}

/// `HKDF-Expand-Label(secret, label, "", length)` per RFC 8446 §7.1,
/// used by QUIC-TLS (RFC 9001 §5.1) with the `"tls13 "` prefix baked
/// into `label`.
fn hkdf_expand_label(prk: &Prk, label: &[u8], length: usize) -> Vec<u8> {
    let mut info = Vec::with_capacity(2 + 1 + 6 + label.len() + 1);
    info.extend_from_slice(&(length as u16).to_be_bytes());
    info.push((6 + label.len()) as u8);
    info.extend_from_slice(b"tls13 ");
    info.extend_from_slice(label);
    info.push(0); // zero-length context

    let mut out = vec![0u8; length];
    let info_refs = [info.as_slice()];
    let okm = prk.expand(&info_refs, ExpandLen(length)).expect("hkdf-expand-label length within algorithm limits");
    okm.fill(&mut out).expect("hkdf fill matches requested length");
    out
}

#[derive(Debug, Clone, Copy)]
struct ExpandLen(usize);

impl ring::hkdf::KeyType for ExpandLen {
    fn len(&self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn derives_distinct_material_per_level_and_direction() {
        let mut store = KeyStore::new();
        on_secret_available(&mut store, EncryptionLevel::Handshake, Direction::Read, b"client handshake secret", AeadAlgorithm::Aes128Gcm, false);
        on_secret_available(&mut store, EncryptionLevel::Handshake, Direction::Write, b"server handshake secret", AeadAlgorithm::Aes128Gcm, false);

        let read = store.get(EncryptionLevel::Handshake, Direction::Read).unwrap();
        let write = store.get(EncryptionLevel::Handshake, Direction::Write).unwrap();
        assert_ne!(read.key, write.key);
        assert_eq!(read.key.len(), AeadAlgorithm::Aes128Gcm.key_len());
    }

    #[test]
    fn reinstalling_the_same_level_and_direction_replaces_the_entry() {
        let mut store = KeyStore::new();
        on_secret_available(&mut store, EncryptionLevel::OneRtt, Direction::Write, b"first secret", AeadAlgorithm::Aes256Gcm, false);
        let first = store.get(EncryptionLevel::OneRtt, Direction::Write).unwrap().clone();
        on_secret_available(&mut store, EncryptionLevel::OneRtt, Direction::Write, b"updated secret", AeadAlgorithm::Aes256Gcm, false);
        let second = store.get(EncryptionLevel::OneRtt, Direction::Write).unwrap();
        assert_ne!(first.key, second.key);
        assert_eq!(store.entries.len(), 1);
    }

    #[test]
    fn aes_256_gcm_key_is_32_bytes() {
        let mut store = KeyStore::new();
        on_secret_available(&mut store, EncryptionLevel::Initial, Direction::Read, b"secret", AeadAlgorithm::Aes256Gcm, false);
        assert_eq!(store.get(EncryptionLevel::Initial, Direction::Read).unwrap().key.len(), 32);
    }
}

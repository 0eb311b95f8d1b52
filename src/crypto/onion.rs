//! Tor v3 onion address representation and derivation.

use std::fmt;
use std::str::FromStr;

use sha3::{Digest, Sha3_256};
use thiserror::Error;

use super::base32;

/// Version byte appended to every v3 address.
pub const ONION_VERSION: u8 = 0x03;

/// Domain separator hashed in front of the public key for the checksum.
const CHECKSUM_PREFIX: &[u8] = b".onion checksum";

/// Hostname suffix (not part of the matched identifier).
pub const ONION_SUFFIX: &str = ".onion";

/// Decoded length: 32-byte key, 2-byte checksum, 1-byte version.
const DECODED_LEN: usize = 35;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("address is not valid base32")]
    InvalidEncoding,
    #[error("address decodes to {0} bytes, expected 35")]
    InvalidLength(usize),
    #[error("unsupported address version {0:#04x}")]
    UnsupportedVersion(u8),
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A v3 onion identifier (56 lowercase base32 characters, no `.onion`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OnionAddress {
    public_key: [u8; 32],
    encoded: String,
}

impl OnionAddress {
    /// Derives the identifier for an ed25519 public key.
    ///
    /// `base32(pubkey || H(".onion checksum" || pubkey || 0x03)[..2] || 0x03)`,
    /// lowercased.
    pub fn from_public_key(public_key: &[u8; 32]) -> Self {
        let checksum = checksum(public_key);

        let mut raw = [0u8; DECODED_LEN];
        raw[..32].copy_from_slice(public_key);
        raw[32..34].copy_from_slice(&checksum);
        raw[34] = ONION_VERSION;

        Self {
            public_key: *public_key,
            encoded: base32::encode(&raw).to_ascii_lowercase(),
        }
    }

    /// Parses an identifier, with or without the `.onion` suffix, and
    /// verifies its version and checksum.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let bare = s.strip_suffix(ONION_SUFFIX).unwrap_or(s);
        let raw = base32::decode(bare).ok_or(AddressError::InvalidEncoding)?;
        if raw.len() != DECODED_LEN {
            return Err(AddressError::InvalidLength(raw.len()));
        }
        if raw[34] != ONION_VERSION {
            return Err(AddressError::UnsupportedVersion(raw[34]));
        }

        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&raw[..32]);
        if checksum(&public_key) != raw[32..34] {
            return Err(AddressError::ChecksumMismatch);
        }

        Ok(Self::from_public_key(&public_key))
    }

    /// Returns the identifier text used for pattern matching.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Returns the ed25519 public key embedded in the address.
    #[inline]
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Returns the full hostname, `<identifier>.onion`.
    pub fn hostname(&self) -> String {
        format!("{}{}", self.encoded, ONION_SUFFIX)
    }
}

fn checksum(public_key: &[u8; 32]) -> [u8; 2] {
    let digest = Sha3_256::new()
        .chain_update(CHECKSUM_PREFIX)
        .chain_update(public_key)
        .chain_update([ONION_VERSION])
        .finalize();
    [digest[0], digest[1]]
}

impl FromStr for OnionAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for OnionAddress {
    fn as_ref(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Debug for OnionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OnionAddress({})", self.encoded)
    }
}

impl fmt::Display for OnionAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_KEY_ADDRESS: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaam2dqd";

    #[test]
    fn test_zero_key_address() {
        let addr = OnionAddress::from_public_key(&[0u8; 32]);
        assert_eq!(addr.as_str(), ZERO_KEY_ADDRESS);
        assert_eq!(addr.as_str().len(), 56);
    }

    #[test]
    fn test_deterministic() {
        let key = [0x5au8; 32];
        let a = OnionAddress::from_public_key(&key);
        let b = OnionAddress::from_public_key(&key);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_decodes_to_key_checksum_version() {
        let key: [u8; 32] = core::array::from_fn(|i| i as u8);
        let addr = OnionAddress::from_public_key(&key);
        let raw = base32::decode(addr.as_str()).unwrap();

        assert_eq!(raw.len(), 35);
        assert_eq!(&raw[..32], &key);
        assert_eq!(raw[32..34], checksum(&key));
        assert_eq!(raw[34], ONION_VERSION);
    }

    #[test]
    fn test_zero_key_checksum() {
        assert_eq!(checksum(&[0u8; 32]), [0xcd, 0x0e]);
    }

    #[test]
    fn test_hostname() {
        let addr = OnionAddress::from_public_key(&[0u8; 32]);
        assert_eq!(addr.hostname(), format!("{}.onion", ZERO_KEY_ADDRESS));
    }

    #[test]
    fn test_parse_roundtrip() {
        let parsed: OnionAddress = format!("{}.onion", ZERO_KEY_ADDRESS).parse().unwrap();
        assert_eq!(parsed.public_key(), &[0u8; 32]);

        let upper = OnionAddress::parse(&ZERO_KEY_ADDRESS.to_uppercase()).unwrap();
        assert_eq!(upper.as_str(), ZERO_KEY_ADDRESS);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        // Flip the checksum characters
        let tampered = ZERO_KEY_ADDRESS.replace("m2dqd", "m3dqd");
        assert_eq!(
            OnionAddress::parse(&tampered),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        assert_eq!(
            OnionAddress::parse("aaaaaaaa"),
            Err(AddressError::InvalidLength(5))
        );
        assert_eq!(
            OnionAddress::parse("not-base32"),
            Err(AddressError::InvalidEncoding)
        );
    }
}

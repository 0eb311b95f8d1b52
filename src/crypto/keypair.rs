//! Ed25519 keypair generation and secret expansion.

use std::fmt;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use thiserror::Error;

use super::OnionAddress;

#[derive(Error, Debug)]
pub enum KeyError {
    #[error("failed to obtain secure randomness: {0}")]
    Randomness(#[from] rand::Error),
}

/// The 64-byte expanded form of an ed25519 seed, as stored by Tor.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ExpandedSecret([u8; 64]);

impl ExpandedSecret {
    /// Returns the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// Never print secret material.
impl fmt::Debug for ExpandedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ExpandedSecret(..)")
    }
}

/// Expands a 32-byte seed: `SHA-512(seed)` with the scalar clamped.
pub fn expand_secret(seed: &[u8; 32]) -> ExpandedSecret {
    let mut hash = [0u8; 64];
    hash.copy_from_slice(&Sha512::digest(seed));
    hash[0] &= 248;
    hash[31] &= 127;
    hash[31] |= 64;
    ExpandedSecret(hash)
}

/// A freshly generated ed25519 keypair and its derived onion address.
#[derive(Clone)]
pub struct Keypair {
    /// The private seed (32 bytes)
    seed: [u8; 32],
    /// The public key (32 bytes)
    public_key: [u8; 32],
    /// The derived onion address
    address: OnionAddress,
}

impl Keypair {
    /// Generates a new random keypair from the operating system CSPRNG.
    #[inline]
    pub fn generate() -> Result<Self, KeyError> {
        Self::generate_with(&mut OsRng)
    }

    /// Generates a keypair from the given cryptographically secure RNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, KeyError> {
        let mut seed = [0u8; 32];
        rng.try_fill_bytes(&mut seed)?;
        Ok(Self::from_seed(seed))
    }

    /// Builds the keypair for an existing seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let public_key = SigningKey::from_bytes(&seed).verifying_key().to_bytes();
        let address = OnionAddress::from_public_key(&public_key);

        Self {
            seed,
            public_key,
            address,
        }
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public_key
    }

    /// Returns the public key as hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }

    /// Returns a reference to the derived address.
    #[inline]
    pub fn address(&self) -> &OnionAddress {
        &self.address
    }

    /// Returns the expanded secret for persistence.
    pub fn expanded_secret(&self) -> ExpandedSecret {
        expand_secret(&self.seed)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key_hex())
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_SEED_EXPANDED: &str = "5046adc1dba838867b2bbbfdd0c3423e58b57970b5267a90f57960924a87f156\
                                      0a6a85eaa642dac835424b5d7c8d637c00408c7a73da672b7f498521420b6dd3";

    #[test]
    fn test_keypair_generation() {
        let keypair = Keypair::generate().unwrap();
        assert_eq!(keypair.address().as_str().len(), 56);
        assert_eq!(
            OnionAddress::from_public_key(keypair.public_key()),
            *keypair.address()
        );
    }

    #[test]
    fn test_zero_seed_public_key() {
        let keypair = Keypair::from_seed([0u8; 32]);
        assert_eq!(
            keypair.public_key_hex(),
            "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29"
        );
        assert_eq!(
            keypair.address().as_str(),
            "hnvcppgow2sc2yvdvdicu3ynonsteflxdxrehjr2ybekdc2z3iu63yid"
        );
    }

    #[test]
    fn test_zero_seed_expansion() {
        let expanded = expand_secret(&[0u8; 32]);
        assert_eq!(hex::encode(expanded.as_bytes()), ZERO_SEED_EXPANDED);
    }

    #[test]
    fn test_expansion_deterministic_and_clamped() {
        for fill in [0x00u8, 0x01, 0x7f, 0xff] {
            let seed = [fill; 32];
            let a = expand_secret(&seed);
            let b = expand_secret(&seed);
            assert_eq!(a, b);

            let bytes = a.as_bytes();
            assert_eq!(bytes[0] & 0b0000_0111, 0);
            assert_eq!(bytes[31] & 0b1000_0000, 0);
            assert_eq!(bytes[31] & 0b0100_0000, 0b0100_0000);
        }
    }

    #[test]
    fn test_ones_seed_expansion() {
        let keypair = Keypair::from_seed([1u8; 32]);
        assert_eq!(
            hex::encode(keypair.expanded_secret().as_bytes()),
            "58e86efb75fa4e2c410f46e16de9f6acae1a1703528651b69bc176c088bef36e\
             b17a2a2cf3d4a41a8e4e18cc45c8656d558eceddb0adb46bfa088a5f53bed252"
        );
        assert_eq!(
            keypair.address().as_str(),
            "rkeohxlubhyzl7ks3mwtzos5olfgocn7dwkbeg7toseadnapn5optfad"
        );
    }

    #[test]
    fn test_randomness_failure_is_reported() {
        struct FailingRng;

        impl RngCore for FailingRng {
            fn next_u32(&mut self) -> u32 {
                0
            }
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn fill_bytes(&mut self, _dest: &mut [u8]) {}
            fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
                Err(rand::Error::new("entropy source unavailable"))
            }
        }

        impl CryptoRng for FailingRng {}

        let err = Keypair::generate_with(&mut FailingRng).unwrap_err();
        assert!(matches!(err, KeyError::Randomness(_)));
    }
}

//! Cryptographic operations for onion key and address generation.
//!
//! This module provides:
//! - Secure random ed25519 key generation
//! - Tor v3 address derivation (SHA3-256 checksum, base32)
//! - Secret key expansion for the hidden service key file format

pub mod base32;
mod keypair;
mod onion;

pub use keypair::{expand_secret, ExpandedSecret, KeyError, Keypair};
pub use onion::{AddressError, OnionAddress, ONION_SUFFIX, ONION_VERSION};

//! Tor hidden service directory writer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ResultSink, SinkError};
use crate::crypto::ExpandedSecret;
use crate::worker::VanityResult;

/// Secret key file header (29-byte tag plus three NUL bytes).
pub const SECRET_KEY_HEADER: &[u8; 32] = b"== ed25519v1-secret: type0 ==\0\0\0";
/// Public key file header (29-byte tag plus three NUL bytes).
pub const PUBLIC_KEY_HEADER: &[u8; 32] = b"== ed25519v1-public: type0 ==\0\0\0";

pub const SECRET_KEY_FILE: &str = "hs_ed25519_secret_key";
pub const PUBLIC_KEY_FILE: &str = "hs_ed25519_public_key";
pub const HOSTNAME_FILE: &str = "hostname";

/// Builds the contents of `hs_ed25519_secret_key`.
pub fn secret_key_file(secret: &ExpandedSecret) -> [u8; 96] {
    let mut out = [0u8; 96];
    out[..32].copy_from_slice(SECRET_KEY_HEADER);
    out[32..].copy_from_slice(secret.as_bytes());
    out
}

/// Builds the contents of `hs_ed25519_public_key`.
pub fn public_key_file(public_key: &[u8; 32]) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(PUBLIC_KEY_HEADER);
    out[32..].copy_from_slice(public_key);
    out
}

/// Writes each match into `<root>/<identifier>/` in the layout Tor reads
/// for a v3 hidden service.
#[derive(Debug, Clone)]
pub struct HiddenServiceDir {
    root: PathBuf,
}

impl HiddenServiceDir {
    /// Creates a sink rooted at `root`. Nothing is touched until a match.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory a given identifier is written to.
    pub fn service_dir(&self, identifier: &str) -> PathBuf {
        self.root.join(identifier)
    }
}

impl ResultSink for HiddenServiceDir {
    fn persist(&self, result: &VanityResult) -> Result<(), SinkError> {
        let dir = self.service_dir(result.address.as_str());
        create_private_dir(&dir)?;

        write_private_file(
            &dir.join(SECRET_KEY_FILE),
            &secret_key_file(&result.expanded_secret),
        )?;
        write_private_file(
            &dir.join(PUBLIC_KEY_FILE),
            &public_key_file(&result.public_key),
        )?;
        write_private_file(
            &dir.join(HOSTNAME_FILE),
            result.address.hostname().as_bytes(),
        )?;

        debug!(dir = %dir.display(), "wrote hidden service keys");
        Ok(())
    }
}

fn create_private_dir(dir: &Path) -> Result<(), SinkError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|source| SinkError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_private_file(path: &Path, contents: &[u8]) -> Result<(), SinkError> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
        .open(path)
        .and_then(|mut file| file.write_all(contents))
        .map_err(|source| SinkError::Io {
            path: path.to_path_buf(),
            source,
        })
}

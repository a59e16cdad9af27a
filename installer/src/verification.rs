//! Integrity verification for downloaded release assets.
//!
//! [`verify`] is the only way to obtain a [`VerifiedArtefact`], and the
//! installer only accepts a [`VerifiedArtefact`], so unverified bytes cannot
//! reach the filesystem.

use crate::release::sha256_digest::Sha256Digest;
use log::debug;

/// The downloaded content did not hash to the expected digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("checksum mismatch: expected {expected}, got {actual}")]
pub struct ChecksumMismatch {
    /// The digest the asset was published with.
    pub expected: Sha256Digest,
    /// The digest of the content received.
    pub actual: Sha256Digest,
}

/// Content whose SHA-256 digest matched the published value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedArtefact {
    bytes: Vec<u8>,
    sha256: Sha256Digest,
}

impl VerifiedArtefact {
    /// Return the verified content.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return the digest the content was verified against.
    #[must_use]
    pub const fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// Return the content length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the verified content is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Check that `bytes` hash to `expected`.
///
/// # Errors
///
/// Returns [`ChecksumMismatch`] when the digests differ. A placeholder
/// digest never matches real content.
///
/// # Examples
///
/// ```
/// use basecut_installer::release::sha256_digest::Sha256Digest;
/// use basecut_installer::verification::verify;
///
/// let expected = Sha256Digest::of_bytes(b"basecut");
/// assert!(verify(b"basecut".to_vec(), &expected).is_ok());
/// assert!(verify(b"tampered".to_vec(), &expected).is_err());
/// ```
pub fn verify(bytes: Vec<u8>, expected: &Sha256Digest) -> Result<VerifiedArtefact, ChecksumMismatch> {
    let actual = Sha256Digest::of_bytes(&bytes);
    if &actual != expected {
        return Err(ChecksumMismatch {
            expected: expected.clone(),
            actual,
        });
    }
    debug!("verified {} bytes against {expected}", bytes.len());
    Ok(VerifiedArtefact {
        bytes,
        sha256: actual,
    })
}

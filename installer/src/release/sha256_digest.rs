//! SHA-256 digest newtype for release asset verification.
//!
//! Validates that the value is a 64-character lowercase hexadecimal string.
//! Digests read from manifests go through [`TryFrom`]; digests of downloaded
//! content come from [`Sha256Digest::of_bytes`].

use super::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Expected length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use basecut_installer::release::sha256_digest::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest: Sha256Digest = hex.as_str().try_into().unwrap();
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Compute the digest of `bytes`.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::release::sha256_digest::Sha256Digest;
    ///
    /// let digest = Sha256Digest::of_bytes(b"");
    /// assert_eq!(
    ///     digest.as_str(),
    ///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    /// );
    /// ```
    #[must_use]
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// The all-zero digest release recipes carry before the release
    /// workflow injects real values.
    #[must_use]
    pub fn placeholder() -> Self {
        Self("0".repeat(DIGEST_HEX_LEN))
    }

    /// Whether this digest is the all-zero placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.0.bytes().all(|b| b == b'0')
    }

    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ReleaseError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ReleaseError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha256(&value)?;
        Ok(Self(value))
    }
}

impl From<Sha256Digest> for String {
    fn from(value: Sha256Digest) -> Self {
        value.0
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ReleaseError::InvalidSha256Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ReleaseError::InvalidSha256Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ReleaseError::InvalidSha256Digest {
            reason: "digest must be lowercase".to_owned(),
        });
    }
    Ok(())
}

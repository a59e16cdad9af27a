//! Error types for release metadata: platforms, versions, digests, and the
//! checksum manifest.
//!
//! Each variant names the rejected input and the constraint it violated.

use thiserror::Error;

/// Errors arising from invalid release metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReleaseError {
    /// No release asset exists for the requested operating system and
    /// architecture pair.
    #[error("unsupported platform {os}/{arch}; expected one of: {expected}")]
    UnsupportedPlatform {
        /// The rejected operating system name.
        os: String,
        /// The rejected architecture name.
        arch: String,
        /// Comma-separated list of supported pairs.
        expected: String,
    },

    /// A release version string is empty or syntactically invalid.
    #[error("invalid release version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// The same platform appears twice in an asset table.
    #[error("duplicate release asset for {platform}")]
    DuplicateAsset {
        /// The platform key that was repeated.
        platform: String,
    },

    /// An asset's version disagrees with the table it was placed in.
    #[error("asset version {asset} does not match release version {table}")]
    AssetVersionMismatch {
        /// Version carried by the asset.
        asset: String,
        /// Version carried by the table.
        table: String,
    },

    /// A checksum manifest could not be parsed.
    #[error("invalid checksum manifest: {reason}")]
    InvalidManifest {
        /// Description of the parse failure.
        reason: String,
    },

    /// A checksum manifest names a platform key that is not recognised.
    #[error("unknown platform key \"{key}\" in checksum manifest")]
    UnknownManifestKey {
        /// The unrecognised key.
        key: String,
    },

    /// A checksum manifest was published for a different release.
    #[error("checksum manifest is for release {manifest}, expected {expected}")]
    ManifestVersionMismatch {
        /// Version recorded in the manifest.
        manifest: String,
        /// Version being installed.
        expected: String,
    },
}

/// Result type alias using [`ReleaseError`].
pub type Result<T> = std::result::Result<T, ReleaseError>;

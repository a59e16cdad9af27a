//! Error types for the basecut installer.
//!
//! Every step of the install sequence has its own variant so callers can
//! tell an unsupported host from a failed download, a tampered artefact, a
//! filesystem problem, or a binary that does not run. All of them are fatal;
//! the installer never retries.

use crate::download::DownloadError;
use crate::receipt::ReceiptError;
use crate::release::error::ReleaseError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during installation.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// No release asset is published for the host platform.
    #[error("unsupported platform {os}/{arch}; basecut is published for: {expected}")]
    UnsupportedPlatform {
        /// Operating system that was requested or detected.
        os: String,
        /// Architecture that was requested or detected.
        arch: String,
        /// Comma-separated list of published platforms.
        expected: String,
    },

    /// Fetching the release asset failed.
    #[error("{0}")]
    Download(#[from] DownloadError),

    /// The downloaded content does not hash to the published digest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// URL the content was fetched from.
        url: String,
        /// Digest published for the asset.
        expected: String,
        /// Digest of the content actually received.
        actual: String,
    },

    /// Writing the executable into the bin directory failed.
    #[error("failed to install {path}: {reason}")]
    Install {
        /// Destination path of the executable.
        path: Utf8PathBuf,
        /// Description of the filesystem failure.
        reason: String,
    },

    /// The installed executable did not pass its post-install self-check.
    #[error("self-check of {path} failed: {reason}")]
    VerificationFailed {
        /// Path of the installed executable.
        path: Utf8PathBuf,
        /// Description of what the check observed.
        reason: String,
    },

    /// A version, digest, or manifest value was rejected.
    #[error("{0}")]
    InvalidRelease(ReleaseError),

    /// The checksum manifest file could not be read.
    #[error("failed to read checksum manifest {path}: {source}")]
    ManifestRead {
        /// Path of the manifest file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No bin directory was given and none could be determined.
    #[error("could not determine a bin directory; pass --bin-dir")]
    BinDirUnavailable,

    /// The install receipt could not be read.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl From<ReleaseError> for InstallerError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::UnsupportedPlatform { os, arch, expected } => {
                Self::UnsupportedPlatform { os, arch, expected }
            }
            other => Self::InvalidRelease(other),
        }
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;

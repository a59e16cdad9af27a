//! Install receipt recording the last successful installation.
//!
//! The receipt lives in the installer's data directory at
//! `<data_dir>/basecut/receipt.json`. It is informational: a failure to
//! write it never undoes an install, and only `status` reads it back.

use crate::dirs::BaseDirs;
use crate::install::InstallTarget;
use crate::release::asset::ReleaseAsset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

const RECEIPT_FILENAME: &str = "receipt.json";

/// What was installed, from where, and when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallReceipt {
    version: String,
    platform: String,
    url: String,
    sha256: String,
    path: String,
    installed_at_secs: u64,
}

impl InstallReceipt {
    /// Build a receipt for `asset` installed at `target`, stamped now.
    #[must_use]
    pub fn new(asset: &ReleaseAsset, target: &InstallTarget) -> Self {
        Self::at(asset, target, now_secs())
    }

    /// Build a receipt with an explicit timestamp.
    #[must_use]
    pub fn at(asset: &ReleaseAsset, target: &InstallTarget, installed_at_secs: u64) -> Self {
        Self {
            version: asset.version().as_str().to_owned(),
            platform: asset.platform().to_string(),
            url: asset.url().to_owned(),
            sha256: target.sha256().as_str().to_owned(),
            path: target.path().to_string(),
            installed_at_secs,
        }
    }

    /// Returns the installed release version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the platform, e.g. `linux/amd64`.
    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Returns the URL the executable was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the verified SHA-256 of the installed content.
    #[must_use]
    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    /// Returns the installed executable path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the install time in seconds since the Unix epoch.
    #[must_use]
    pub fn installed_at_secs(&self) -> u64 {
        self.installed_at_secs
    }

    /// Returns a human-readable multi-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            concat!(
                "basecut {} ({})\n",
                "  path:      {}\n",
                "  source:    {}\n",
                "  sha256:    {}\n",
                "  installed: {} (unix time)\n"
            ),
            self.version, self.platform, self.path, self.url, self.sha256, self.installed_at_secs,
        )
    }
}

/// Errors that prevent receipt persistence or retrieval.
#[derive(Debug, thiserror::Error)]
pub enum ReceiptError {
    /// The installer data directory could not be resolved.
    #[error("could not determine the basecut data directory")]
    MissingDataDirectory,

    /// No receipt has been written yet.
    #[error("no install receipt at {path}; basecut has not been installed by this tool")]
    NotInstalled {
        /// Where the receipt was expected.
        path: PathBuf,
    },

    /// Creating the receipt directory failed.
    #[error("failed to create receipt directory {path}: {source}")]
    CreateDirectory {
        /// Directory path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading the receipt file failed.
    #[error("failed to read receipt {path}: {source}")]
    Read {
        /// File path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The receipt file is not valid JSON for a receipt.
    #[error("malformed receipt {path}: {source}")]
    Malformed {
        /// File path that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Serializing the receipt failed.
    #[error("failed to serialize receipt: {source}")]
    Serialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the receipt file failed.
    #[error("failed to write receipt {path}: {source}")]
    Write {
        /// File path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns where the receipt is stored.
///
/// # Errors
///
/// Returns [`ReceiptError::MissingDataDirectory`] if no data directory is
/// available.
pub fn receipt_path(dirs: &dyn BaseDirs) -> Result<PathBuf, ReceiptError> {
    let data_dir = dirs
        .basecut_data_dir()
        .ok_or(ReceiptError::MissingDataDirectory)?;
    Ok(data_dir.join(RECEIPT_FILENAME))
}

/// Writes `receipt` to the installer data directory.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the path cannot be resolved or written.
pub fn write_receipt(dirs: &dyn BaseDirs, receipt: &InstallReceipt) -> Result<PathBuf, ReceiptError> {
    let path = receipt_path(dirs)?;
    write_receipt_at_path(&path, receipt)?;
    Ok(path)
}

/// Writes `receipt` to an explicit path, creating parent directories.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the directory or file cannot be written.
pub fn write_receipt_at_path(path: &Path, receipt: &InstallReceipt) -> Result<(), ReceiptError> {
    let parent = path.parent().ok_or_else(|| ReceiptError::CreateDirectory {
        path: PathBuf::new(),
        source: std::io::Error::other("receipt path has no parent"),
    })?;

    std::fs::create_dir_all(parent).map_err(|source| ReceiptError::CreateDirectory {
        path: parent.to_path_buf(),
        source,
    })?;

    let json = serde_json::to_string_pretty(receipt)
        .map_err(|source| ReceiptError::Serialize { source })?;
    std::fs::write(path, json).map_err(|source| ReceiptError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the receipt from the installer data directory.
///
/// # Errors
///
/// Returns [`ReceiptError::NotInstalled`] when no receipt exists, or another
/// [`ReceiptError`] if it cannot be read or parsed.
pub fn read_receipt(dirs: &dyn BaseDirs) -> Result<InstallReceipt, ReceiptError> {
    read_receipt_at_path(&receipt_path(dirs)?)
}

/// Reads a receipt from an explicit path.
///
/// # Errors
///
/// See [`read_receipt`].
pub fn read_receipt_at_path(path: &Path) -> Result<InstallReceipt, ReceiptError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ReceiptError::NotInstalled {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ReceiptError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&content).map_err(|source| ReceiptError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

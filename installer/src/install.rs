//! Placement of the verified executable in the bin directory.
//!
//! The content is written to a temporary file beside the destination, made
//! executable, and renamed over `basecut`. Repeated installs therefore
//! replace the previous binary in one step and a failed write never leaves a
//! truncated executable behind.

use crate::error::{InstallerError, Result};
use crate::release::asset::BINARY_NAME;
use crate::release::sha256_digest::Sha256Digest;
use crate::verification::VerifiedArtefact;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs;
use std::io::Write;

/// Permission bits applied to the installed executable (rwxr-xr-x).
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// The executable as placed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    path: Utf8PathBuf,
    sha256: Sha256Digest,
}

impl InstallTarget {
    /// Return the path of the installed executable.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Return the digest of the installed content.
    #[must_use]
    pub const fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }
}

/// Writes verified artefacts into a bin directory under the canonical name.
#[derive(Debug, Clone)]
pub struct Installer {
    bin_dir: Utf8PathBuf,
}

impl Installer {
    /// Create an installer targeting `bin_dir`.
    #[must_use]
    pub const fn new(bin_dir: Utf8PathBuf) -> Self {
        Self { bin_dir }
    }

    /// Return the bin directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Utf8Path {
        &self.bin_dir
    }

    /// Return the path the executable is installed to.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::install::Installer;
    /// use camino::Utf8PathBuf;
    ///
    /// let installer = Installer::new(Utf8PathBuf::from("/opt/bin"));
    /// assert_eq!(installer.target_path(), Utf8PathBuf::from("/opt/bin/basecut"));
    /// ```
    #[must_use]
    pub fn target_path(&self) -> Utf8PathBuf {
        self.bin_dir.join(BINARY_NAME)
    }

    /// Install `artefact` as the `basecut` executable.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Install`] if the bin directory cannot be
    /// created, the content cannot be written, permissions cannot be set, or
    /// the final rename fails.
    pub fn install(&self, artefact: &VerifiedArtefact) -> Result<InstallTarget> {
        let destination = self.target_path();
        let fail = |reason: String| InstallerError::Install {
            path: destination.clone(),
            reason,
        };

        fs::create_dir_all(&self.bin_dir)
            .map_err(|e| fail(format!("failed to create {}: {e}", self.bin_dir)))?;

        let mut staged = tempfile::Builder::new()
            .prefix(".basecut-")
            .tempfile_in(&self.bin_dir)
            .map_err(|e| fail(format!("failed to create temporary file: {e}")))?;
        debug!("staging {} bytes at {}", artefact.len(), staged.path().display());

        staged
            .write_all(artefact.bytes())
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| fail(format!("failed to write executable: {e}")))?;
        make_executable(staged.as_file())
            .map_err(|e| fail(format!("failed to set permissions: {e}")))?;

        staged
            .persist(&destination)
            .map_err(|e| fail(format!("failed to move executable into place: {}", e.error)))?;

        info!("installed {destination}");
        Ok(InstallTarget {
            path: destination,
            sha256: artefact.sha256().clone(),
        })
    }
}

#[cfg(unix)]
fn make_executable(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn make_executable(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

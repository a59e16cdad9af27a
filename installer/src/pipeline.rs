//! Install pipeline orchestration.
//!
//! The install is a strict sequence: resolve the asset for the requested
//! platform, fetch it, verify its SHA-256, write it into the bin directory,
//! and run the installed binary's self-check. Every step is terminal on
//! failure and nothing is retried. Resolution touches neither the network
//! nor the filesystem, and the artefact is only written once verified.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::io::Write;

use crate::download::{ArtefactDownloader, HttpDownloader, fetch};
use crate::error::{InstallerError, Result};
use crate::install::{InstallTarget, Installer};
use crate::output::write_stderr_line;
use crate::release::asset::{AssetTable, ReleaseAsset};
use crate::release::manifest::{ChecksumManifest, parse_manifest};
use crate::release::version::ReleaseVersion;
use crate::self_check::{CommandExecutor, SystemCommandExecutor, self_check};
use crate::verification::verify;

/// Everything needed to perform one install.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Operating system name, e.g. `linux` or `macos`.
    pub os: String,
    /// CPU architecture name, e.g. `amd64` or `x86_64`.
    pub arch: String,
    /// Release to install.
    pub version: ReleaseVersion,
    /// Published checksums overriding the built-in placeholders.
    pub manifest: Option<ChecksumManifest>,
    /// Directory the `basecut` executable is written to.
    pub bin_dir: Utf8PathBuf,
    /// Skip running `basecut --help` after installing.
    pub skip_self_check: bool,
    /// When true, suppress progress output.
    pub quiet: bool,
}

impl InstallRequest {
    /// Build a request for the current host and the built-in release.
    #[must_use]
    pub fn for_host(bin_dir: Utf8PathBuf) -> Self {
        let (os, arch) = host_names();
        Self {
            os: os.to_owned(),
            arch: arch.to_owned(),
            version: ReleaseVersion::current(),
            manifest: None,
            bin_dir,
            skip_self_check: false,
            quiet: false,
        }
    }
}

/// What a successful install produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    asset: ReleaseAsset,
    target: InstallTarget,
    self_checked: bool,
}

impl InstallReport {
    /// Returns the asset that was installed.
    #[must_use]
    pub const fn asset(&self) -> &ReleaseAsset {
        &self.asset
    }

    /// Returns the installed executable.
    #[must_use]
    pub const fn target(&self) -> &InstallTarget {
        &self.target
    }

    /// Returns whether the self-check ran and passed.
    #[must_use]
    pub const fn self_checked(&self) -> bool {
        self.self_checked
    }
}

/// Returns the OS and architecture names reported by the standard library.
#[must_use]
pub const fn host_names() -> (&'static str, &'static str) {
    (std::env::consts::OS, std::env::consts::ARCH)
}

/// Reads and parses a checksum manifest file.
///
/// # Errors
///
/// Returns [`InstallerError::ManifestRead`] if the file cannot be read, or
/// [`InstallerError::InvalidRelease`] if its contents are rejected.
pub fn load_manifest(path: &Utf8Path) -> Result<ChecksumManifest> {
    let contents = std::fs::read_to_string(path).map_err(|source| InstallerError::ManifestRead {
        path: path.to_owned(),
        source,
    })?;
    let manifest = parse_manifest(&contents)?;
    debug!("loaded {} checksums from {path}", manifest.len());
    Ok(manifest)
}

/// Builds the asset table for `version`, applying `manifest` if given.
///
/// # Errors
///
/// Returns [`InstallerError::InvalidRelease`] if the manifest is for a
/// different release.
pub fn asset_table(
    version: &ReleaseVersion,
    manifest: Option<&ChecksumManifest>,
) -> Result<AssetTable> {
    let table = AssetTable::builtin(version.clone());
    match manifest {
        Some(manifest) => Ok(table.with_manifest(manifest)?),
        None => Ok(table),
    }
}

/// Resolves the asset `request` would install without side effects.
///
/// # Errors
///
/// Returns [`InstallerError::UnsupportedPlatform`] if no asset is published
/// for the requested OS and architecture.
pub fn resolve_asset(request: &InstallRequest) -> Result<ReleaseAsset> {
    let table = asset_table(&request.version, request.manifest.as_ref())?;
    let asset = table.resolve_names(&request.os, &request.arch)?;
    Ok(asset.clone())
}

/// Runs the install pipeline with the production HTTP downloader and
/// process executor.
///
/// # Errors
///
/// See [`run_install_with`].
pub fn run_install(request: &InstallRequest, stderr: &mut dyn Write) -> Result<InstallReport> {
    run_install_with(request, &HttpDownloader, &SystemCommandExecutor, stderr)
}

/// Testable inner function with injected dependencies.
///
/// The production entry point [`run_install`] delegates here with real
/// implementations; tests inject stubs.
///
/// # Errors
///
/// Returns the error of the first step that fails:
/// [`InstallerError::UnsupportedPlatform`], [`InstallerError::Download`],
/// [`InstallerError::ChecksumMismatch`], [`InstallerError::Install`], or
/// [`InstallerError::VerificationFailed`].
pub fn run_install_with(
    request: &InstallRequest,
    downloader: &dyn ArtefactDownloader,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    // Step 1: Resolve the asset.
    let asset = resolve_asset(request)?;
    if asset.sha256().is_placeholder() {
        warn!("asset for {} carries a placeholder checksum", asset.platform());
        if !request.quiet {
            write_stderr_line(
                stderr,
                format!(
                    "Warning: no published checksum for {}; pass --manifest with the release checksums",
                    asset.platform()
                ),
            );
        }
    }

    // Step 2: Fetch into memory.
    if !request.quiet {
        write_stderr_line(
            stderr,
            format!("Downloading basecut {} for {}...", asset.version(), asset.platform()),
        );
    }
    let bytes = fetch(downloader, &asset)?;

    // Step 3: Verify before anything touches the filesystem.
    if !request.quiet {
        write_stderr_line(stderr, "Verifying SHA-256 checksum...");
    }
    let artefact = verify(bytes, asset.sha256()).map_err(|e| InstallerError::ChecksumMismatch {
        url: asset.url().to_owned(),
        expected: e.expected.into_inner(),
        actual: e.actual.into_inner(),
    })?;

    // Step 4: Install under the canonical name.
    let installer = Installer::new(request.bin_dir.clone());
    if !request.quiet {
        write_stderr_line(stderr, format!("Installing to {}...", installer.target_path()));
    }
    let target = installer.install(&artefact)?;

    // Step 5: Self-check.
    let self_checked = if request.skip_self_check {
        debug!("self-check skipped");
        false
    } else {
        if !request.quiet {
            write_stderr_line(stderr, "Running basecut --help...");
        }
        self_check(executor, &target)?;
        true
    };

    Ok(InstallReport {
        asset,
        target,
        self_checked,
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

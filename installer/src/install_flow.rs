//! Install-flow helpers for the installer binary.
//!
//! This module keeps bin directory selection, receipt recording, and the
//! post-install report separate from CLI orchestration in `main.rs`.

use camino::{Utf8Path, Utf8PathBuf};
use log::warn;
use std::io::Write;
use std::path::PathBuf;

use crate::dirs::{BaseDirs, default_bin_dir, is_directory_in_path};
use crate::error::{InstallerError, Result};
use crate::output::{path_instructions, success_message, write_stderr_line};
use crate::pipeline::InstallReport;
use crate::receipt::{InstallReceipt, ReceiptError, write_receipt};

/// Picks the bin directory: the explicit one, else the platform default.
///
/// # Errors
///
/// Returns [`InstallerError::BinDirUnavailable`] when neither is available.
pub fn resolve_bin_dir(
    explicit: Option<&Utf8Path>,
    dirs: Option<&dyn BaseDirs>,
) -> Result<Utf8PathBuf> {
    explicit
        .map(Utf8Path::to_owned)
        .or_else(|| dirs.and_then(default_bin_dir))
        .ok_or(InstallerError::BinDirUnavailable)
}

/// Best-effort receipt recording for a successful install.
///
/// The executable is already in place, so failures only produce a warning.
pub fn record_receipt(
    report: &InstallReport,
    dirs: Option<&dyn BaseDirs>,
    quiet: bool,
    stderr: &mut dyn Write,
) -> Option<PathBuf> {
    let receipt = InstallReceipt::new(report.asset(), report.target());
    let result = match dirs {
        Some(dirs) => write_receipt(dirs, &receipt),
        None => Err(ReceiptError::MissingDataDirectory),
    };

    match result {
        Ok(path) => Some(path),
        Err(error) => {
            warn!("receipt not written: {error}");
            if !quiet {
                write_stderr_line(
                    stderr,
                    format!("Warning: could not record install receipt: {error}"),
                );
            }
            None
        }
    }
}

/// Writes the success summary and, when needed, `PATH` instructions.
pub fn report_install(
    report: &InstallReport,
    verbosity: u8,
    quiet: bool,
    stderr: &mut dyn Write,
) {
    if quiet {
        return;
    }

    let target = report.target();
    write_stderr_line(stderr, "");
    write_stderr_line(stderr, success_message(report.asset(), target.path()));

    if verbosity > 0 {
        write_stderr_line(stderr, format!("  source: {}", report.asset().url()));
        write_stderr_line(stderr, format!("  sha256: {}", target.sha256()));
        if !report.self_checked() {
            write_stderr_line(stderr, "  self-check: skipped");
        }
    }

    let Some(bin_dir) = target.path().parent() else {
        return;
    };
    if is_directory_in_path(bin_dir.as_std_path()) {
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, "You can now run: basecut --help");
    } else {
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, path_instructions(bin_dir));
    }
}

//! basecut installer library.
//!
//! This crate installs the prebuilt `basecut` database subsetting CLI. It
//! resolves the release asset for the host platform, downloads it, verifies
//! its SHA-256 digest, installs it as `basecut`, and runs a `--help` smoke
//! test. It is used by the `basecut-installer` CLI binary and can be
//! consumed programmatically for testing or custom installation workflows.
//!
//! # Modules
//!
//! - [`assets_output`] - Output formatting for the release asset listing
//! - [`cli`] - Command-line argument definitions
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`download`] - Release asset download
//! - [`error`] - Error types for each install step
//! - [`install`] - Atomic placement of the verified executable
//! - [`install_flow`] - Bin directory selection, receipts, and reporting
//! - [`output`] - Progress lines, `PATH` snippets, and dry-run output
//! - [`pipeline`] - The resolve, fetch, verify, install, self-check sequence
//! - [`receipt`] - JSON record of the last successful install
//! - [`release`] - Release metadata: platforms, versions, digests, assets
//! - [`self_check`] - Post-install smoke test of the executable
//! - [`verification`] - SHA-256 verification of downloaded content

pub mod assets_output;
pub mod cli;
pub mod dirs;
pub mod download;
pub mod error;
pub mod install;
pub mod install_flow;
pub mod output;
pub mod pipeline;
pub mod receipt;
pub mod release;
pub mod self_check;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod verification;

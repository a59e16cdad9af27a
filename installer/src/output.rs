//! Output formatting for the installer CLI.
//!
//! This module renders the user-facing progress and summary lines: shell
//! snippets for adding the bin directory to `PATH`, the success message, and
//! dry-run information.

use crate::release::asset::{BINARY_NAME, ReleaseAsset};
use camino::Utf8Path;
use std::io::Write;

/// Writes a progress line to the given stderr stream.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Shell configuration snippets that put a directory on `PATH`.
#[derive(Debug, Clone)]
pub struct ShellSnippet {
    /// Export line for bash/zsh.
    pub bash: String,
    /// Path line for fish shell.
    pub fish: String,
}

impl ShellSnippet {
    /// Create shell snippets for the given bin directory.
    ///
    /// # Example
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use basecut_installer::output::ShellSnippet;
    ///
    /// let snippet = ShellSnippet::new(&Utf8PathBuf::from("/home/user/.local/bin"));
    /// assert!(snippet.bash.contains("PATH"));
    /// ```
    #[must_use]
    pub fn new(bin_dir: &Utf8Path) -> Self {
        Self {
            bash: format!("export PATH=\"{bin_dir}:$PATH\""),
            fish: format!("fish_add_path \"{bin_dir}\""),
        }
    }

    /// Format the snippet for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(
            concat!(
                "Add the following to your shell configuration:\n\n",
                "  # bash/zsh (~/.bashrc, ~/.zshrc)\n",
                "  {}\n\n",
                "  # fish (~/.config/fish/config.fish)\n",
                "  {}"
            ),
            self.bash, self.fish
        )
    }
}

/// Instructions printed when `bin_dir` is not on `PATH`.
#[must_use]
pub fn path_instructions(bin_dir: &Utf8Path) -> String {
    format!(
        "{bin_dir} is not on your PATH.\n{}",
        ShellSnippet::new(bin_dir).display_text()
    )
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(asset: &ReleaseAsset, path: &Utf8Path) -> String {
    format!(
        "Installed basecut {} ({}) to {path}",
        asset.version(),
        asset.platform()
    )
}

/// Configuration information for dry-run output.
///
/// # Example
///
/// ```
/// use basecut_installer::output::DryRunInfo;
/// use basecut_installer::release::asset::AssetTable;
/// use basecut_installer::release::platform::{Arch, Os, Platform};
/// use basecut_installer::release::version::ReleaseVersion;
/// use camino::Utf8PathBuf;
///
/// let table = AssetTable::builtin(ReleaseVersion::current());
/// let asset = table.resolve(Platform::new(Os::Linux, Arch::Amd64))?;
/// let bin_dir = Utf8PathBuf::from("/home/user/.local/bin");
///
/// let info = DryRunInfo {
///     asset,
///     bin_dir: &bin_dir,
///     manifest: None,
///     skip_self_check: false,
/// };
///
/// let output = info.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("basecut-0.1.0-linux-amd64"));
/// # Ok::<(), basecut_installer::release::error::ReleaseError>(())
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The asset that would be installed.
    pub asset: &'a ReleaseAsset,
    /// Directory the executable would be written to.
    pub bin_dir: &'a Utf8Path,
    /// Checksum manifest in use, if any.
    pub manifest: Option<&'a Utf8Path>,
    /// Whether the post-install self-check is skipped.
    pub skip_self_check: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let checksum = if self.asset.sha256().is_placeholder() {
            format!("{} (placeholder)", self.asset.sha256())
        } else {
            self.asset.sha256().to_string()
        };
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Platform: {}", self.asset.platform()),
            format!("Version: {}", self.asset.version()),
            format!("URL: {}", self.asset.url()),
            format!("SHA-256: {checksum}"),
            format!("Install path: {}", self.bin_dir.join(BINARY_NAME)),
            format!(
                "Self-check: {}",
                if self.skip_self_check {
                    "skipped"
                } else {
                    "basecut --help"
                }
            ),
        ];

        if let Some(manifest) = self.manifest {
            lines.push(format!("Checksum manifest: {manifest}"));
        }

        lines.join("\n")
    }
}

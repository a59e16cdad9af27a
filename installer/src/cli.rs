//! CLI argument definitions for the basecut installer.
//!
//! Running the binary without a subcommand installs basecut, so the install
//! flags are accepted both at the top level and under `install`. The
//! `assets` and `status` subcommands only read state.

use crate::pipeline::{InstallRequest, host_names};
use crate::release::error::ReleaseError;
use crate::release::manifest::ChecksumManifest;
use crate::release::version::ReleaseVersion;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install the basecut database subsetting CLI.
#[derive(Parser, Debug)]
#[command(name = "basecut-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install the basecut CLI.\n\n",
    "basecut provides database subsetting and sanitization for realistic dev ",
    "environments. This installer downloads the prebuilt executable for the ",
    "current platform from GitHub releases, verifies its SHA-256 checksum, ",
    "installs it as `basecut`, and runs `basecut --help` to confirm it works.\n\n",
    "Published checksums are supplied with --manifest; without one the built-in ",
    "placeholder checksums cannot be matched and the install stops before ",
    "anything is written.",
))]
#[command(after_help = concat!(
    "SUPPORTED PLATFORMS:\n",
    "  macos/amd64, macos/arm64, linux/amd64, linux/arm64\n\n",
    "EXAMPLES:\n",
    "  Install for this machine:\n",
    "    $ basecut-installer --manifest checksums.toml\n\n",
    "  Install into a specific directory:\n",
    "    $ basecut-installer --bin-dir /usr/local/bin --manifest checksums.toml\n\n",
    "  Show the release assets and their checksums:\n",
    "    $ basecut-installer assets\n\n",
    "  Show what was last installed:\n",
    "    $ basecut-installer status\n\n",
    "  Preview without downloading:\n",
    "    $ basecut-installer --dry-run\n\n",
    "For more information, see: https://docs.basecut.dev",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install basecut (default when no subcommand given).
    Install(InstallArgs),

    /// List the release assets for each platform.
    Assets(AssetsArgs),

    /// Show the last install receipt.
    Status(StatusArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Directory to install basecut into [default: platform-specific].
    #[arg(short, long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Release version to install [default: the bundled release].
    #[arg(long, value_name = "VERSION", value_parser = parse_release_version)]
    pub release: Option<ReleaseVersion>,

    /// Override the detected operating system (macos, linux).
    #[arg(long, value_name = "OS")]
    pub os: Option<String>,

    /// Override the detected CPU architecture (amd64, arm64).
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// TOML file with the published SHA-256 checksums.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Do not run `basecut --help` after installing.
    #[arg(long)]
    pub skip_self_check: bool,

    /// Show what would be installed and exit without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Print more detail about the installed artefact (repeatable).
    #[arg(
        short,
        long = "verbose",
        alias = "verbosity",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Arguments for the assets command.
#[derive(Parser, Debug, Clone)]
pub struct AssetsArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,

    /// Release version to list [default: the bundled release].
    #[arg(long, value_name = "VERSION", value_parser = parse_release_version)]
    pub release: Option<ReleaseVersion>,

    /// TOML file with the published SHA-256 checksums.
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,
}

/// Arguments for the status command.
#[derive(Parser, Debug, Clone)]
pub struct StatusArgs {
    /// Output the receipt as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_release_version(value: &str) -> Result<ReleaseVersion, ReleaseError> {
    ReleaseVersion::try_from(value)
}

impl InstallArgs {
    /// Returns the release to install, defaulting to the bundled one.
    #[must_use]
    pub fn release_version(&self) -> ReleaseVersion {
        self.release.clone().unwrap_or_default()
    }

    /// Returns the requested OS and architecture names, defaulting to the
    /// host's.
    #[must_use]
    pub fn platform_names(&self) -> (String, String) {
        let (host_os, host_arch) = host_names();
        (
            self.os.clone().unwrap_or_else(|| host_os.to_owned()),
            self.arch.clone().unwrap_or_else(|| host_arch.to_owned()),
        )
    }

    /// Build an [`InstallRequest`] from these arguments.
    ///
    /// OS and architecture fall back to the host's when not overridden.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::cli::InstallArgs;
    /// use camino::Utf8PathBuf;
    ///
    /// let args = InstallArgs {
    ///     os: Some("linux".to_owned()),
    ///     arch: Some("arm64".to_owned()),
    ///     ..InstallArgs::default()
    /// };
    /// let request = args.install_request(Utf8PathBuf::from("/opt/bin"), None);
    /// assert_eq!(request.os, "linux");
    /// assert_eq!(request.version.as_str(), "0.1.0");
    /// ```
    #[must_use]
    pub fn install_request(
        &self,
        bin_dir: Utf8PathBuf,
        manifest: Option<ChecksumManifest>,
    ) -> InstallRequest {
        let (os, arch) = self.platform_names();
        InstallRequest {
            os,
            arch,
            version: self.release_version(),
            manifest,
            bin_dir,
            skip_self_check: self.skip_self_check,
            quiet: self.quiet,
        }
    }
}

impl Default for InstallArgs {
    /// Creates an `InstallArgs` instance with all flags disabled and nothing
    /// overridden.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::cli::InstallArgs;
    ///
    /// let args = InstallArgs::default();
    /// assert!(args.bin_dir.is_none());
    /// assert!(!args.skip_self_check);
    /// ```
    fn default() -> Self {
        Self {
            bin_dir: None,
            release: None,
            os: None,
            arch: None,
            manifest: None,
            skip_self_check: false,
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

impl Default for AssetsArgs {
    /// Creates an `AssetsArgs` instance with default settings.
    fn default() -> Self {
        Self {
            json: false,
            release: None,
            manifest: None,
        }
    }
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    ///
    /// # Note
    ///
    /// When `Command::Assets` or `Command::Status` is active, this returns
    /// the default flattened install arguments. Callers should check
    /// `self.command` first.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Assets(_) | Command::Status(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

//! Directory resolution abstraction for platform-specific paths.
//!
//! [`BaseDirs`] hides `directories-next` behind a trait so tests can point
//! the installer at temporary directories.

use camino::Utf8PathBuf;
use std::path::{Path, PathBuf};

/// Platform directories used by the installer.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Directory for user executables (e.g. `~/.local/bin`).
    fn bin_dir(&self) -> Option<PathBuf>;

    /// Directory for installer state such as the install receipt.
    fn basecut_data_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the host platform conventions.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    dirs: directories_next::BaseDirs,
}

impl SystemBaseDirs {
    /// Resolve the host directories, or `None` when no home directory can
    /// be found.
    #[must_use]
    pub fn new() -> Option<Self> {
        directories_next::BaseDirs::new().map(|dirs| Self { dirs })
    }
}

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        Some(self.dirs.home_dir().to_path_buf())
    }

    /// `directories-next` only reports an executable dir on Linux; other
    /// platforms fall back to `~/.local/bin`.
    fn bin_dir(&self) -> Option<PathBuf> {
        self.dirs
            .executable_dir()
            .map(Path::to_path_buf)
            .or_else(|| self.home_dir().map(|home| home.join(".local").join("bin")))
    }

    fn basecut_data_dir(&self) -> Option<PathBuf> {
        Some(self.dirs.data_local_dir().join("basecut"))
    }
}

/// Return the default bin directory as a UTF-8 path.
#[must_use]
pub fn default_bin_dir(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    dirs.bin_dir().and_then(|p| Utf8PathBuf::try_from(p).ok())
}

/// Checks if a directory is in the `PATH` environment variable.
#[must_use]
pub fn is_directory_in_path(dir: &Path) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|p| p == dir))
        .unwrap_or(false)
}

//! Operating system and CPU architecture selection for release assets.
//!
//! Only macOS and Linux on amd64 and arm64 are published. Host names from
//! [`std::env::consts`] and the spellings used in release asset filenames
//! are both accepted when parsing.

use super::error::{ReleaseError, Result};
use serde::Serialize;
use std::fmt;

/// A supported operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Apple macOS (`darwin` in asset filenames).
    MacOs,
    /// Linux.
    Linux,
}

impl Os {
    /// Every supported operating system.
    pub const ALL: [Self; 2] = [Self::MacOs, Self::Linux];

    /// Parse a host or asset spelling of an operating system.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::release::platform::Os;
    ///
    /// assert_eq!(Os::from_name("darwin"), Some(Os::MacOs));
    /// assert_eq!(Os::from_name("windows"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Some(Self::MacOs),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Return the canonical display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Linux => "linux",
        }
    }

    /// Return the spelling used in release asset filenames.
    #[must_use]
    pub const fn asset_segment(self) -> &'static str {
        match self {
            Self::MacOs => "darwin",
            Self::Linux => "linux",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit x86 (`x86_64`).
    Amd64,
    /// 64-bit ARM (`aarch64`).
    Arm64,
}

impl Arch {
    /// Every supported architecture.
    pub const ALL: [Self; 2] = [Self::Amd64, Self::Arm64];

    /// Parse a host or asset spelling of an architecture.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::release::platform::Arch;
    ///
    /// assert_eq!(Arch::from_name("x86_64"), Some(Arch::Amd64));
    /// assert_eq!(Arch::from_name("aarch64"), Some(Arch::Arm64));
    /// assert_eq!(Arch::from_name("riscv64"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => Some(Self::Amd64),
            "arm64" | "aarch64" => Some(Self::Arm64),
            _ => None,
        }
    }

    /// Return the canonical name, which is also the asset filename spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operating system and architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Platform {
    /// The operating system.
    pub os: Os,
    /// The CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a platform from typed components.
    #[must_use]
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform this installer is running on.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::UnsupportedPlatform`] when the host is not
    /// one of the published platforms.
    pub fn detect() -> Result<Self> {
        Self::from_names(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Parse a platform from operating system and architecture names.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::UnsupportedPlatform`] naming both inputs when
    /// either one is not recognised.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::release::platform::{Arch, Os, Platform};
    ///
    /// let platform = Platform::from_names("linux", "x86_64").expect("supported");
    /// assert_eq!(platform, Platform::new(Os::Linux, Arch::Amd64));
    /// assert!(Platform::from_names("windows", "x86_64").is_err());
    /// ```
    pub fn from_names(os: &str, arch: &str) -> Result<Self> {
        match (Os::from_name(os), Arch::from_name(arch)) {
            (Some(parsed_os), Some(parsed_arch)) => Ok(Self::new(parsed_os, parsed_arch)),
            _ => Err(unsupported(os, arch)),
        }
    }

    /// Return every supported platform in a stable order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Os::ALL
            .iter()
            .flat_map(|os| Arch::ALL.iter().map(|arch| Self::new(*os, *arch)))
            .collect()
    }

    /// Return the `{os}-{arch}` key used in asset filenames and manifests,
    /// e.g. `darwin-arm64`.
    #[must_use]
    pub fn asset_key(&self) -> String {
        format!("{}-{}", self.os.asset_segment(), self.arch.as_str())
    }

    /// Parse an asset key such as `linux-amd64`.
    #[must_use]
    pub fn from_asset_key(key: &str) -> Option<Self> {
        let (os, arch) = key.split_once('-')?;
        Some(Self::new(Os::from_name(os)?, Arch::from_name(arch)?))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Build the error reported for an unrecognised host pair.
pub(crate) fn unsupported(os: &str, arch: &str) -> ReleaseError {
    let expected = Platform::all()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ReleaseError::UnsupportedPlatform {
        os: os.to_owned(),
        arch: arch.to_owned(),
        expected,
    }
}

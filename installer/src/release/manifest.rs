//! Checksum manifest published alongside a release.
//!
//! The built-in asset table only knows placeholder digests. The release
//! workflow publishes the real ones as TOML:
//!
//! ```toml
//! version = "0.1.0"
//!
//! [checksums]
//! darwin-amd64 = "…64 hex characters…"
//! linux-amd64 = "…64 hex characters…"
//! ```
//!
//! Keys use the asset filename spelling (`darwin`, not `macos`). Every value
//! is validated while parsing.

use super::error::{ReleaseError, Result};
use super::platform::Platform;
use super::sha256_digest::Sha256Digest;
use super::version::ReleaseVersion;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Validated per-platform checksums for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumManifest {
    version: ReleaseVersion,
    checksums: BTreeMap<Platform, Sha256Digest>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    version: ReleaseVersion,
    #[serde(default)]
    checksums: BTreeMap<String, Sha256Digest>,
}

impl ChecksumManifest {
    /// Return the release the manifest describes.
    #[must_use]
    pub const fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Return the published digest for `platform`, if any.
    #[must_use]
    pub fn checksum(&self, platform: Platform) -> Option<&Sha256Digest> {
        self.checksums.get(&platform)
    }

    /// Return the number of platforms with a published digest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checksums.len()
    }

    /// Whether the manifest publishes no digests at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checksums.is_empty()
    }
}

/// Parse a TOML checksum manifest.
///
/// # Errors
///
/// Returns [`ReleaseError::InvalidManifest`] for malformed TOML, unknown
/// fields, or invalid versions and digests, and
/// [`ReleaseError::UnknownManifestKey`] for an unrecognised platform key.
///
/// # Examples
///
/// ```
/// use basecut_installer::release::manifest::parse_manifest;
/// use basecut_installer::release::platform::{Arch, Os, Platform};
///
/// let toml = format!(
///     "version = \"0.1.0\"\n[checksums]\nlinux-amd64 = \"{}\"\n",
///     "ab".repeat(32),
/// );
/// let manifest = parse_manifest(&toml).expect("valid manifest");
/// assert!(manifest.checksum(Platform::new(Os::Linux, Arch::Amd64)).is_some());
/// assert!(manifest.checksum(Platform::new(Os::MacOs, Arch::Amd64)).is_none());
/// ```
pub fn parse_manifest(contents: &str) -> Result<ChecksumManifest> {
    let raw: RawManifest =
        toml::from_str(contents).map_err(|e| ReleaseError::InvalidManifest {
            reason: e.message().to_owned(),
        })?;

    let checksums = raw
        .checksums
        .into_iter()
        .map(|(key, digest)| {
            Platform::from_asset_key(&key)
                .map(|platform| (platform, digest))
                .ok_or(ReleaseError::UnknownManifestKey { key })
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(ChecksumManifest {
        version: raw.version,
        checksums,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::asset::AssetTable;
    use crate::release::platform::{Arch, Os};

    fn digest(fill: char) -> String {
        std::iter::repeat_n(fill, 64).collect()
    }

    fn manifest_toml(version: &str, entries: &[(&str, String)]) -> String {
        let mut toml = format!("version = \"{version}\"\n\n[checksums]\n");
        for (key, value) in entries {
            toml.push_str(&format!("{key} = \"{value}\"\n"));
        }
        toml
    }

    #[test]
    fn parses_all_four_platforms() {
        let toml = manifest_toml(
            "0.1.0",
            &[
                ("darwin-amd64", digest('1')),
                ("darwin-arm64", digest('2')),
                ("linux-amd64", digest('3')),
                ("linux-arm64", digest('4')),
            ],
        );
        let manifest = parse_manifest(&toml).expect("valid");
        assert_eq!(manifest.len(), 4);
        let linux_arm = manifest
            .checksum(Platform::new(Os::Linux, Arch::Arm64))
            .expect("present");
        assert_eq!(linux_arm.as_str(), digest('4'));
    }

    #[test]
    fn accepts_tagged_version() {
        let manifest = parse_manifest(&manifest_toml("v0.1.0", &[])).expect("valid");
        assert_eq!(manifest.version().as_str(), "0.1.0");
        assert!(manifest.is_empty());
    }

    #[test]
    fn rejects_unknown_platform_key() {
        let toml = manifest_toml("0.1.0", &[("windows-amd64", digest('a'))]);
        let err = parse_manifest(&toml).expect_err("unknown key");
        assert_eq!(
            err,
            ReleaseError::UnknownManifestKey {
                key: "windows-amd64".to_owned()
            }
        );
    }

    #[test]
    fn rejects_malformed_digest() {
        let toml = manifest_toml("0.1.0", &[("linux-amd64", "abc".to_owned())]);
        let err = parse_manifest(&toml).expect_err("bad digest");
        assert!(matches!(err, ReleaseError::InvalidManifest { .. }));
    }

    #[test]
    fn rejects_unknown_top_level_fields() {
        let toml = "version = \"0.1.0\"\nmirror = \"https://example.test\"\n";
        assert!(parse_manifest(toml).is_err());
    }

    #[test]
    fn rejects_missing_version() {
        assert!(parse_manifest("[checksums]\n").is_err());
    }

    #[test]
    fn applying_manifest_replaces_only_listed_platforms() {
        let toml = manifest_toml("0.1.0", &[("linux-amd64", digest('c'))]);
        let manifest = parse_manifest(&toml).expect("valid");
        let table = AssetTable::builtin(ReleaseVersion::current())
            .with_manifest(&manifest)
            .expect("matching version");

        let linux = table
            .resolve(Platform::new(Os::Linux, Arch::Amd64))
            .expect("present");
        assert_eq!(linux.sha256().as_str(), digest('c'));

        let darwin = table
            .resolve(Platform::new(Os::MacOs, Arch::Amd64))
            .expect("present");
        assert!(darwin.sha256().is_placeholder());
    }

    #[test]
    fn applying_manifest_for_other_release_fails() {
        let manifest = parse_manifest(&manifest_toml("0.2.0", &[])).expect("valid");
        let err = AssetTable::builtin(ReleaseVersion::current())
            .with_manifest(&manifest)
            .expect_err("mismatch");
        assert!(matches!(err, ReleaseError::ManifestVersionMismatch { .. }));
    }
}

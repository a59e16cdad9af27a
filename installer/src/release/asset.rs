//! Release asset table and platform resolution.
//!
//! Each published release has exactly one raw executable per supported
//! platform, named `basecut-{version}-{os}-{arch}` and attached to the
//! GitHub release tagged `v{version}`. [`AssetTable`] holds that mapping
//! and [`AssetTable::resolve`] is a pure lookup into it.

use super::error::{ReleaseError, Result};
use super::manifest::ChecksumManifest;
use super::platform::{Platform, unsupported};
use super::sha256_digest::Sha256Digest;
use super::version::ReleaseVersion;
use log::debug;

/// Base URL for release downloads.
pub const RELEASE_BASE_URL: &str = "https://github.com/basecuthq/cli/releases/download";

/// Canonical name of the installed executable.
pub const BINARY_NAME: &str = "basecut";

/// Return the asset filename for `version` on `platform`.
///
/// # Examples
///
/// ```
/// use basecut_installer::release::asset::asset_filename;
/// use basecut_installer::release::platform::{Arch, Os, Platform};
/// use basecut_installer::release::version::ReleaseVersion;
///
/// let name = asset_filename(
///     &ReleaseVersion::current(),
///     Platform::new(Os::MacOs, Arch::Arm64),
/// );
/// assert_eq!(name, "basecut-0.1.0-darwin-arm64");
/// ```
#[must_use]
pub fn asset_filename(version: &ReleaseVersion, platform: Platform) -> String {
    format!("{BINARY_NAME}-{version}-{}", platform.asset_key())
}

/// Return the download URL for `version` on `platform`.
#[must_use]
pub fn asset_url(version: &ReleaseVersion, platform: Platform) -> String {
    format!(
        "{RELEASE_BASE_URL}/{}/{}",
        version.tag(),
        asset_filename(version, platform)
    )
}

/// One downloadable executable for one platform and release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    platform: Platform,
    version: ReleaseVersion,
    url: String,
    sha256: Sha256Digest,
}

impl ReleaseAsset {
    /// Create the published asset for `platform`, deriving its URL.
    #[must_use]
    pub fn new(platform: Platform, version: ReleaseVersion, sha256: Sha256Digest) -> Self {
        let url = asset_url(&version, platform);
        Self::with_url(platform, version, url, sha256)
    }

    /// Create an asset served from an explicit URL, such as a mirror.
    #[must_use]
    pub const fn with_url(
        platform: Platform,
        version: ReleaseVersion,
        url: String,
        sha256: Sha256Digest,
    ) -> Self {
        Self {
            platform,
            version,
            url,
            sha256,
        }
    }

    /// Return the platform this asset runs on.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Return the release this asset belongs to.
    #[must_use]
    pub const fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Return the download URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Return the expected SHA-256 digest of the downloaded content.
    #[must_use]
    pub const fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// Return the published filename.
    #[must_use]
    pub fn filename(&self) -> String {
        asset_filename(&self.version, self.platform)
    }
}

/// The per-platform assets of a single release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTable {
    version: ReleaseVersion,
    assets: Vec<ReleaseAsset>,
}

impl AssetTable {
    /// Return the table as published, with placeholder checksums for every
    /// supported platform.
    ///
    /// Real digests are injected by the release workflow; apply them with
    /// [`AssetTable::with_manifest`].
    #[must_use]
    pub fn builtin(version: ReleaseVersion) -> Self {
        let assets = Platform::all()
            .into_iter()
            .map(|platform| {
                ReleaseAsset::new(platform, version.clone(), Sha256Digest::placeholder())
            })
            .collect();
        Self { version, assets }
    }

    /// Build a table from explicit assets.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::DuplicateAsset`] when a platform appears more
    /// than once and [`ReleaseError::AssetVersionMismatch`] when an asset
    /// belongs to another release.
    pub fn new(version: ReleaseVersion, assets: Vec<ReleaseAsset>) -> Result<Self> {
        for (index, asset) in assets.iter().enumerate() {
            if asset.version != version {
                return Err(ReleaseError::AssetVersionMismatch {
                    asset: asset.version.to_string(),
                    table: version.to_string(),
                });
            }
            let repeated = assets
                .iter()
                .skip(index + 1)
                .any(|other| other.platform == asset.platform);
            if repeated {
                return Err(ReleaseError::DuplicateAsset {
                    platform: asset.platform.to_string(),
                });
            }
        }
        Ok(Self { version, assets })
    }

    /// Replace checksums with those published in `manifest`.
    ///
    /// Platforms the manifest omits keep their current digest.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::ManifestVersionMismatch`] when the manifest
    /// describes a different release.
    pub fn with_manifest(mut self, manifest: &ChecksumManifest) -> Result<Self> {
        if manifest.version() != &self.version {
            return Err(ReleaseError::ManifestVersionMismatch {
                manifest: manifest.version().to_string(),
                expected: self.version.to_string(),
            });
        }
        for asset in &mut self.assets {
            if let Some(digest) = manifest.checksum(asset.platform) {
                debug!("using manifest checksum for {}", asset.platform);
                asset.sha256 = digest.clone();
            }
        }
        Ok(self)
    }

    /// Look up the asset for `platform`.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::UnsupportedPlatform`] when the table has no
    /// asset for `platform`.
    ///
    /// # Examples
    ///
    /// ```
    /// use basecut_installer::release::asset::AssetTable;
    /// use basecut_installer::release::platform::{Arch, Os, Platform};
    /// use basecut_installer::release::version::ReleaseVersion;
    ///
    /// let table = AssetTable::builtin(ReleaseVersion::current());
    /// let asset = table
    ///     .resolve(Platform::new(Os::Linux, Arch::Amd64))
    ///     .expect("published platform");
    /// assert_eq!(
    ///     asset.url(),
    ///     "https://github.com/basecuthq/cli/releases/download/v0.1.0/basecut-0.1.0-linux-amd64"
    /// );
    /// ```
    pub fn resolve(&self, platform: Platform) -> Result<&ReleaseAsset> {
        self.assets
            .iter()
            .find(|asset| asset.platform == platform)
            .ok_or_else(|| unsupported(platform.os.as_str(), platform.arch.as_str()))
    }

    /// Look up the asset for an operating system and architecture given by
    /// name, as reported by the host or typed by a user.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::UnsupportedPlatform`] when either name is not
    /// recognised or the table has no matching asset.
    pub fn resolve_names(&self, os: &str, arch: &str) -> Result<&ReleaseAsset> {
        self.resolve(Platform::from_names(os, arch)?)
    }

    /// Return the release version.
    #[must_use]
    pub const fn version(&self) -> &ReleaseVersion {
        &self.version
    }

    /// Return the assets in table order.
    #[must_use]
    pub fn assets(&self) -> &[ReleaseAsset] {
        &self.assets
    }
}

/// Resolve the published asset for `os`/`arch` in `version`.
///
/// # Errors
///
/// Returns [`ReleaseError::UnsupportedPlatform`] when the pair is not
/// published.
pub fn resolve(os: &str, arch: &str, version: &ReleaseVersion) -> Result<ReleaseAsset> {
    AssetTable::builtin(version.clone())
        .resolve_names(os, arch)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::platform::{Arch, Os};
    use rstest::rstest;

    fn current_table() -> AssetTable {
        AssetTable::builtin(ReleaseVersion::current())
    }

    #[rstest]
    #[case::darwin_amd64(Os::MacOs, Arch::Amd64, "basecut-0.1.0-darwin-amd64")]
    #[case::darwin_arm64(Os::MacOs, Arch::Arm64, "basecut-0.1.0-darwin-arm64")]
    #[case::linux_amd64(Os::Linux, Arch::Amd64, "basecut-0.1.0-linux-amd64")]
    #[case::linux_arm64(Os::Linux, Arch::Arm64, "basecut-0.1.0-linux-arm64")]
    fn resolves_every_published_platform(
        #[case] os: Os,
        #[case] arch: Arch,
        #[case] filename: &str,
    ) {
        let table = current_table();
        let asset = table
            .resolve(Platform::new(os, arch))
            .expect("published platform");
        assert_eq!(asset.filename(), filename);
        assert_eq!(
            asset.url(),
            format!("{RELEASE_BASE_URL}/v0.1.0/{filename}")
        );
        assert_eq!(asset.sha256().as_str().len(), 64);
    }

    #[test]
    fn urls_are_unique_across_platforms() {
        let table = current_table();
        let mut urls: Vec<&str> = table.assets().iter().map(ReleaseAsset::url).collect();
        urls.sort_unstable();
        urls.dedup();
        assert_eq!(urls.len(), Platform::all().len());
    }

    #[test]
    fn resolve_is_deterministic() {
        let table = current_table();
        let first = table.resolve_names("linux", "x86_64").expect("supported");
        let second = table.resolve_names("linux", "amd64").expect("supported");
        assert_eq!(first, second);
    }

    #[test]
    fn free_resolve_matches_end_to_end_url() {
        let asset = resolve("linux", "amd64", &ReleaseVersion::current()).expect("supported");
        assert_eq!(
            asset.url(),
            "https://github.com/basecuthq/cli/releases/download/v0.1.0/basecut-0.1.0-linux-amd64"
        );
    }

    #[rstest]
    #[case::windows("windows", "amd64")]
    #[case::bad_arch("linux", "ppc64le")]
    fn resolve_rejects_unpublished_pairs(#[case] os: &str, #[case] arch: &str) {
        let err = resolve(os, arch, &ReleaseVersion::current()).expect_err("unsupported");
        assert!(matches!(err, ReleaseError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn partial_table_reports_missing_platform_as_unsupported() {
        let version = ReleaseVersion::current();
        let linux = Platform::new(Os::Linux, Arch::Amd64);
        let table = AssetTable::new(
            version.clone(),
            vec![ReleaseAsset::new(linux, version, Sha256Digest::placeholder())],
        )
        .expect("valid table");

        let err = table
            .resolve(Platform::new(Os::MacOs, Arch::Arm64))
            .expect_err("missing entry");
        assert!(matches!(err, ReleaseError::UnsupportedPlatform { .. }));
    }

    #[test]
    fn new_rejects_duplicate_platforms() {
        let version = ReleaseVersion::current();
        let linux = Platform::new(Os::Linux, Arch::Amd64);
        let asset = ReleaseAsset::new(linux, version.clone(), Sha256Digest::placeholder());
        let err = AssetTable::new(version, vec![asset.clone(), asset]).expect_err("duplicate");
        assert!(matches!(err, ReleaseError::DuplicateAsset { .. }));
    }

    #[test]
    fn new_rejects_foreign_versions() {
        let other = ReleaseVersion::try_from("9.9.9").expect("valid");
        let asset = ReleaseAsset::new(
            Platform::new(Os::Linux, Arch::Arm64),
            other,
            Sha256Digest::placeholder(),
        );
        let err = AssetTable::new(ReleaseVersion::current(), vec![asset]).expect_err("mismatch");
        assert!(matches!(err, ReleaseError::AssetVersionMismatch { .. }));
    }

    #[test]
    fn builtin_table_uses_placeholders() {
        assert!(
            current_table()
                .assets()
                .iter()
                .all(|asset| asset.sha256().is_placeholder())
        );
    }
}

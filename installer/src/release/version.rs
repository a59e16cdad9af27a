//! Release version newtype.
//!
//! Release tags carry a `v` prefix (`v0.1.0`) while asset filenames use the
//! bare version (`basecut-0.1.0-linux-amd64`). The newtype stores the bare
//! form and accepts either spelling on input.

use super::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The release installed when no version is requested.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// A validated release version without the `v` prefix.
///
/// # Examples
///
/// ```
/// use basecut_installer::release::version::ReleaseVersion;
///
/// let version = ReleaseVersion::try_from("v0.1.0").expect("valid version");
/// assert_eq!(version.as_str(), "0.1.0");
/// assert_eq!(version.tag(), "v0.1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// Return the release this installer ships by default.
    #[must_use]
    pub fn current() -> Self {
        Self(DEFAULT_VERSION.to_owned())
    }

    /// Return the bare version string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the git tag naming this release.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

impl Default for ReleaseVersion {
    fn default() -> Self {
        Self::current()
    }
}

impl TryFrom<&str> for ReleaseVersion {
    type Error = ReleaseError;

    fn try_from(value: &str) -> Result<Self> {
        let bare = value.trim().strip_prefix('v').unwrap_or(value.trim());
        validate_version(value, bare)?;
        Ok(Self(bare.to_owned()))
    }
}

impl TryFrom<String> for ReleaseVersion {
    type Error = ReleaseError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<ReleaseVersion> for String {
    fn from(value: ReleaseVersion) -> Self {
        value.0
    }
}

impl AsRef<str> for ReleaseVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Versions end up in URLs and filenames, so only a conservative
/// semver-like alphabet is accepted.
fn validate_version(original: &str, bare: &str) -> Result<()> {
    let invalid = |reason: &str| ReleaseError::InvalidVersion {
        value: original.to_owned(),
        reason: reason.to_owned(),
    };

    if bare.is_empty() {
        return Err(invalid("version must not be empty"));
    }
    if !bare.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("version must start with a digit"));
    }
    if let Some(bad) = bare
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')))
    {
        return Err(invalid(&format!("unexpected character '{bad}'")));
    }
    if bare.split('.').any(str::is_empty) {
        return Err(invalid("version components must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bare("0.1.0", "0.1.0")]
    #[case::tagged("v0.1.0", "0.1.0")]
    #[case::prerelease("1.2.3-rc.1", "1.2.3-rc.1")]
    #[case::padded(" 0.2.0 ", "0.2.0")]
    fn accepts_valid_versions(#[case] input: &str, #[case] expected: &str) {
        let version = ReleaseVersion::try_from(input).expect("valid");
        assert_eq!(version.as_str(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::only_prefix("v")]
    #[case::leading_letter("latest")]
    #[case::slash("0.1.0/../../etc")]
    #[case::space("0.1 .0")]
    #[case::empty_component("0..1")]
    #[case::trailing_dot("0.1.")]
    fn rejects_invalid_versions(#[case] input: &str) {
        let err = ReleaseVersion::try_from(input).expect_err("invalid");
        assert!(matches!(err, ReleaseError::InvalidVersion { .. }));
    }

    #[test]
    fn default_is_current_release() {
        assert_eq!(ReleaseVersion::default().as_str(), DEFAULT_VERSION);
    }

    #[test]
    fn tag_adds_prefix() {
        let version = ReleaseVersion::try_from("0.3.1").expect("valid");
        assert_eq!(version.tag(), "v0.3.1");
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: ReleaseVersion = serde_json::from_str("\"v0.1.0\"").expect("valid");
        assert_eq!(ok.as_str(), "0.1.0");
        assert!(serde_json::from_str::<ReleaseVersion>("\"nope\"").is_err());
    }
}

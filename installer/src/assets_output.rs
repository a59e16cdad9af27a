//! Output formatting for the release asset listing.
//!
//! Renders an [`AssetTable`] for the `assets` subcommand, either as aligned
//! text or as JSON.

use crate::release::asset::{AssetTable, ReleaseAsset};
use crate::release::platform::Platform;
use serde::Serialize;

/// Format the asset table for human-readable output.
///
/// # Examples
///
/// ```
/// use basecut_installer::assets_output::format_human;
/// use basecut_installer::release::asset::AssetTable;
/// use basecut_installer::release::version::ReleaseVersion;
///
/// let table = AssetTable::builtin(ReleaseVersion::current());
/// let output = format_human(&table, None);
/// assert!(output.contains("basecut 0.1.0"));
/// ```
#[must_use]
pub fn format_human(table: &AssetTable, host: Option<Platform>) -> String {
    let mut output = format!("Release assets for basecut {}:\n", table.version());

    for asset in table.assets() {
        let marker = host
            .filter(|host| *host == asset.platform())
            .map_or("", |_| " (this host)");
        output.push('\n');
        output.push_str(&format!("{}{marker}\n", asset.platform()));
        output.push_str(&format!("  url:    {}\n", asset.url()));
        output.push_str(&format!("  sha256: {}{}\n", asset.sha256(), placeholder_note(asset)));
    }

    output
}

/// Format the asset table as JSON.
///
/// # Examples
///
/// ```
/// use basecut_installer::assets_output::format_json;
/// use basecut_installer::release::asset::AssetTable;
/// use basecut_installer::release::version::ReleaseVersion;
///
/// let table = AssetTable::builtin(ReleaseVersion::current());
/// let json = format_json(&table, None);
/// assert!(json.contains("\"assets\""));
/// ```
#[must_use]
pub fn format_json(table: &AssetTable, host: Option<Platform>) -> String {
    let json_data = AssetTableJson::from_table(table, host);

    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

fn placeholder_note(asset: &ReleaseAsset) -> &'static str {
    if asset.sha256().is_placeholder() {
        " (placeholder)"
    } else {
        ""
    }
}

/// JSON-serializable representation of an asset table.
#[derive(Debug, Serialize)]
pub struct AssetTableJson {
    /// Release version without the `v` prefix.
    pub version: String,
    /// One entry per published platform.
    pub assets: Vec<AssetEntry>,
}

impl AssetTableJson {
    fn from_table(table: &AssetTable, host: Option<Platform>) -> Self {
        let assets = table
            .assets()
            .iter()
            .map(|asset| AssetEntry {
                os: asset.platform().os.as_str().to_owned(),
                arch: asset.platform().arch.as_str().to_owned(),
                url: asset.url().to_owned(),
                sha256: asset.sha256().as_str().to_owned(),
                placeholder: asset.sha256().is_placeholder(),
                host: host.is_some_and(|host| host == asset.platform()),
            })
            .collect();

        Self {
            version: table.version().as_str().to_owned(),
            assets,
        }
    }
}

/// One platform's asset in JSON output.
#[derive(Debug, Serialize)]
pub struct AssetEntry {
    /// Operating system, e.g. `macos`.
    pub os: String,
    /// CPU architecture, e.g. `arm64`.
    pub arch: String,
    /// Download URL.
    pub url: String,
    /// Expected SHA-256 digest.
    pub sha256: String,
    /// Whether the digest is the built-in placeholder.
    pub placeholder: bool,
    /// Whether this asset matches the current host.
    pub host: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::manifest::parse_manifest;
    use crate::release::platform::{Arch, Os};
    use crate::release::version::ReleaseVersion;
    use rstest::{fixture, rstest};

    #[fixture]
    fn table() -> AssetTable {
        AssetTable::builtin(ReleaseVersion::current())
    }

    #[rstest]
    fn human_lists_every_platform(table: AssetTable) {
        let output = format_human(&table, None);
        for platform in ["macos/amd64", "macos/arm64", "linux/amd64", "linux/arm64"] {
            assert!(output.contains(platform), "missing {platform}");
        }
        assert!(output.contains("basecut-0.1.0-darwin-arm64"));
        assert!(!output.contains("(this host)"));
    }

    #[rstest]
    fn human_marks_host_platform(table: AssetTable) {
        let host = Platform::new(Os::Linux, Arch::Arm64);
        let output = format_human(&table, Some(host));
        assert!(output.contains("linux/arm64 (this host)"));
        assert_eq!(output.matches("(this host)").count(), 1);
    }

    #[rstest]
    fn human_flags_placeholder_digests(table: AssetTable) {
        let output = format_human(&table, None);
        assert_eq!(output.matches("(placeholder)").count(), 4);
    }

    #[rstest]
    fn json_reports_manifest_digests(table: AssetTable) {
        let digest = "a".repeat(64);
        let manifest = parse_manifest(&format!(
            "version = \"0.1.0\"\n[checksums]\nlinux-amd64 = \"{digest}\"\n"
        ))
        .expect("valid manifest");
        let table = table.with_manifest(&manifest).expect("versions agree");

        let json = format_json(&table, Some(Platform::new(Os::Linux, Arch::Amd64)));
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["version"], "0.1.0");
        let assets = value["assets"].as_array().expect("assets array");
        assert_eq!(assets.len(), 4);
        let linux = assets
            .iter()
            .find(|a| a["os"] == "linux" && a["arch"] == "amd64")
            .expect("linux/amd64 entry");
        assert_eq!(linux["sha256"], digest.as_str());
        assert_eq!(linux["placeholder"], false);
        assert_eq!(linux["host"], true);
    }
}

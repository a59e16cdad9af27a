//! Release asset download.
//!
//! Provides a trait-based abstraction for fetching a release asset into
//! memory, enabling dependency injection for testing. Content is held in
//! memory so that nothing touches the filesystem before it is verified.

use crate::release::asset::ReleaseAsset;
use log::{debug, info};
use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for a single asset download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest asset the installer will hold in memory.
pub const MAX_ARTEFACT_BYTES: u64 = 512 * 1024 * 1024;

/// Trait for fetching release assets.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```no_run
/// use basecut_installer::download::{ArtefactDownloader, HttpDownloader};
///
/// let bytes = HttpDownloader.fetch(
///     "https://github.com/basecuthq/cli/releases/download/v0.1.0/basecut-0.1.0-linux-amd64",
/// )?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), basecut_installer::download::DownloadError>(())
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Fetch the body at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the asset is not found, or
    /// the body exceeds [`MAX_ARTEFACT_BYTES`].
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from asset downloads.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested asset was not found (HTTP 404).
    #[error("release asset not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The response body exceeded the size ceiling.
    #[error("download of {url} exceeded {limit} bytes")]
    TooLarge {
        /// The URL being downloaded.
        url: String,
        /// The ceiling that was exceeded.
        limit: u64,
    },

    /// I/O error while reading the response.
    #[error("I/O error during download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ArtefactDownloader for HttpDownloader {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        download_bytes(url)
    }
}

/// Fetch the content of `asset` with `downloader`.
///
/// # Errors
///
/// Propagates any [`DownloadError`] from the downloader.
pub fn fetch(
    downloader: &dyn ArtefactDownloader,
    asset: &ReleaseAsset,
) -> Result<Vec<u8>, DownloadError> {
    info!("fetching {}", asset.url());
    let bytes = downloader.fetch(asset.url())?;
    debug!("fetched {} bytes from {}", bytes.len(), asset.url());
    Ok(bytes)
}

/// Download a URL and return the body, refusing bodies over the ceiling.
fn download_bytes(url: &str) -> Result<Vec<u8>, DownloadError> {
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut body = response.into_body();
    let mut bytes = Vec::new();
    body.as_reader()
        .take(MAX_ARTEFACT_BYTES.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| DownloadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
    if exceeds_ceiling(bytes.len()) {
        return Err(DownloadError::TooLarge {
            url: url.to_owned(),
            limit: MAX_ARTEFACT_BYTES,
        });
    }
    Ok(bytes)
}

fn exceeds_ceiling(len: usize) -> bool {
    u64::try_from(len).map_or(true, |len| len > MAX_ARTEFACT_BYTES)
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::asset::AssetTable;
    use crate::release::platform::{Arch, Os, Platform};
    use crate::release::version::ReleaseVersion;

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/basecut", &err);
        assert!(matches!(mapped, DownloadError::NotFound { .. }));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(500);
        let mapped = map_ureq_error("https://example.test/basecut", &err);
        assert!(matches!(mapped, DownloadError::HttpError { .. }));
    }

    #[test]
    fn ceiling_allows_exact_limit() {
        let limit = usize::try_from(MAX_ARTEFACT_BYTES).expect("fits on 64-bit hosts");
        assert!(!exceeds_ceiling(limit));
        assert!(exceeds_ceiling(limit + 1));
    }

    #[test]
    fn fetch_requests_the_asset_url() {
        let table = AssetTable::builtin(ReleaseVersion::current());
        let asset = table
            .resolve(Platform::new(Os::Linux, Arch::Amd64))
            .expect("published");
        let expected_url = asset.url().to_owned();

        let mut downloader = MockArtefactDownloader::new();
        downloader
            .expect_fetch()
            .withf(move |url| url == expected_url)
            .times(1)
            .returning(|_| Ok(b"binary".to_vec()));

        let bytes = fetch(&downloader, asset).expect("fetch succeeds");
        assert_eq!(bytes, b"binary");
    }
}

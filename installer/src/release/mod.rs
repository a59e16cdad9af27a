//! Release metadata for the prebuilt `basecut` executable.
//!
//! # Sub-modules
//!
//! - [`asset`] - Release assets, the per-release asset table, and lookup.
//! - [`error`] - Validation errors for release metadata.
//! - [`manifest`] - TOML checksum manifest parsing.
//! - [`platform`] - Operating system and architecture types.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`version`] - Release version newtype (`ReleaseVersion`).

pub mod asset;
pub mod error;
pub mod manifest;
pub mod platform;
pub mod sha256_digest;
pub mod version;

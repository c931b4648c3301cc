//! # Configuration State
//!
//! Runtime configuration of the register process. Shop-facing settings
//! (shop name, admin code, receipt text) live in the store instead.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`main.rs`)
//! 2. Environment variables (`TALLY_*`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use tally_receipt::MIN_RENDER_SCALE;
use tally_store::DEFAULT_MAX_DOCUMENT_BYTES;
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Where documents are written before opening the system viewer
    pub spool_dir: PathBuf,

    /// Fallback location when the viewer can't be opened
    pub downloads_dir: PathBuf,

    /// Receipt raster scale factor, at least 2
    pub render_scale: u32,

    /// Largest document the store accepts; `None` disables the check
    pub store_quota_bytes: Option<usize>,

    /// Open printed documents in the system viewer
    pub open_viewer: bool,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Database: `<data dir>/tally.db`
    /// - Spool: `<cache dir>/spool`
    /// - Downloads: the user's download directory
    /// - Scale: 2, quota: 5 MiB, viewer: on
    fn default() -> Self {
        let dirs = ProjectDirs::from("com", "tally", "pos");

        let data_dir = dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let spool_dir = dirs
            .as_ref()
            .map(|d| d.cache_dir().join("spool"))
            .unwrap_or_else(|| PathBuf::from("spool"));
        let downloads_dir = UserDirs::new()
            .and_then(|u| u.download_dir().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| data_dir.join("receipts"));

        ConfigState {
            db_path: data_dir.join("tally.db"),
            spool_dir,
            downloads_dir,
            render_scale: MIN_RENDER_SCALE,
            store_quota_bytes: Some(DEFAULT_MAX_DOCUMENT_BYTES),
            open_viewer: true,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_DB_PATH`: database file
    /// - `TALLY_SPOOL_DIR`: spool directory
    /// - `TALLY_RENDER_SCALE`: raster scale, clamped to at least 2
    /// - `TALLY_STORE_QUOTA_BYTES`: per-document limit, `0` disables it
    /// - `TALLY_OPEN_VIEWER`: `false`/`0` saves documents without opening them
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("TALLY_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Some(dir) = lookup("TALLY_SPOOL_DIR") {
            config.spool_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("TALLY_RENDER_SCALE") {
            match raw.parse::<u32>() {
                Ok(scale) => config.render_scale = scale.max(MIN_RENDER_SCALE),
                Err(_) => warn!(value = %raw, "Ignoring invalid TALLY_RENDER_SCALE"),
            }
        }

        if let Some(raw) = lookup("TALLY_STORE_QUOTA_BYTES") {
            match raw.parse::<usize>() {
                Ok(0) => config.store_quota_bytes = None,
                Ok(bytes) => config.store_quota_bytes = Some(bytes),
                Err(_) => warn!(value = %raw, "Ignoring invalid TALLY_STORE_QUOTA_BYTES"),
            }
        }

        if let Some(raw) = lookup("TALLY_OPEN_VIEWER") {
            let raw = raw.trim().to_ascii_lowercase();
            config.open_viewer = !matches!(raw.as_str(), "0" | "false" | "no" | "off");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[]));
        assert_eq!(config.render_scale, 2);
        assert_eq!(config.store_quota_bytes, Some(DEFAULT_MAX_DOCUMENT_BYTES));
        assert!(config.open_viewer);
        assert!(config.db_path.ends_with("tally.db"));
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("TALLY_DB_PATH", "/tmp/shop.db"),
            ("TALLY_SPOOL_DIR", "/tmp/spool"),
            ("TALLY_RENDER_SCALE", "1"),
            ("TALLY_STORE_QUOTA_BYTES", "0"),
            ("TALLY_OPEN_VIEWER", "false"),
        ]));

        assert_eq!(config.db_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.spool_dir, PathBuf::from("/tmp/spool"));
        assert_eq!(config.render_scale, 2);
        assert_eq!(config.store_quota_bytes, None);
        assert!(!config.open_viewer);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ConfigState::from_lookup(lookup(&[
            ("TALLY_RENDER_SCALE", "big"),
            ("TALLY_STORE_QUOTA_BYTES", "-1"),
        ]));
        assert_eq!(config.render_scale, 2);
        assert_eq!(config.store_quota_bytes, Some(DEFAULT_MAX_DOCUMENT_BYTES));
    }
}

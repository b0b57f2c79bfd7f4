use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::DEFAULT_TTL;
use crate::error::{DashError, Result};
use crate::models::{CreditProfile, SignConvention, Source};

/// One crore: the default unit amounts are rendered in.
pub const CRORE: f64 = 10_000_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub pnl_file_path: String,
    #[serde(default = "default_limits")]
    pub limits: BTreeMap<Source, f64>,
    #[serde(default = "default_sign_convention")]
    pub sign_convention: BTreeMap<Source, SignConvention>,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_display_unit")]
    pub display_unit: f64,
    #[serde(default = "default_ytd_fallback")]
    pub ytd_fallback: bool,
}

fn default_limits() -> BTreeMap<Source, f64> {
    Source::ALL.iter().map(|s| (*s, s.default_limit())).collect()
}

fn default_sign_convention() -> BTreeMap<Source, SignConvention> {
    Source::ALL.iter().map(|s| (*s, s.default_convention())).collect()
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_display_unit() -> f64 {
    CRORE
}

fn default_ytd_fallback() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            pnl_file_path: String::new(),
            limits: default_limits(),
            sign_convention: default_sign_convention(),
            cache_ttl_secs: default_cache_ttl_secs(),
            display_unit: default_display_unit(),
            ytd_fallback: default_ytd_fallback(),
        }
    }
}

impl Settings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Credit profiles for every source with a configured limit. A source
    /// without an explicit convention uses its default one.
    pub fn profiles(&self) -> BTreeMap<Source, CreditProfile> {
        self.limits
            .iter()
            .map(|(source, limit)| {
                let convention = self
                    .sign_convention
                    .get(source)
                    .copied()
                    .unwrap_or_else(|| source.default_convention());
                (
                    *source,
                    CreditProfile {
                        limit: *limit,
                        convention,
                    },
                )
            })
            .collect()
    }

    pub fn workbook_path(&self) -> Result<PathBuf> {
        configured_path(&self.file_path, "file_path")
    }

    pub fn pnl_workbook_path(&self) -> Result<PathBuf> {
        configured_path(&self.pnl_file_path, "pnl_file_path")
    }
}

fn configured_path(raw: &str, key: &str) -> Result<PathBuf> {
    if raw.trim().is_empty() {
        return Err(DashError::Settings(format!(
            "{key} is not set. Run `cfs init` to configure it."
        )));
    }
    Ok(PathBuf::from(shellexpand_path(raw)))
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("cfs")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(settings, &settings_path())
}

/// Missing or unparseable files fall back to defaults.
fn load_settings_from(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| DashError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_creates_config_dir_and_load_reads_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".config").join("cfs").join("settings.json");
        let mut settings = Settings {
            file_path: "/tmp/OPL CFS.xlsx".to_string(),
            cache_ttl_secs: 60,
            ytd_fallback: false,
            ..Settings::default()
        };
        settings.limits.insert(Source::Axis, 7_500_000.0);
        settings
            .sign_convention
            .insert(Source::Sbi, SignConvention::DrawnPositive);

        save_settings_to(&settings, &path).unwrap();
        let loaded = load_settings_from(&path);
        assert_eq!(loaded.file_path, "/tmp/OPL CFS.xlsx");
        assert_eq!(loaded.cache_ttl(), Duration::from_secs(60));
        assert!(!loaded.ytd_fallback);
        assert_eq!(loaded.limits[&Source::Axis], 7_500_000.0);
        assert_eq!(loaded.profiles()[&Source::Sbi].convention, SignConvention::DrawnPositive);
    }

    #[test]
    fn test_load_missing_or_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = load_settings_from(&dir.path().join("nope.json"));
        assert!(missing.file_path.is_empty());

        let corrupt = dir.path().join("settings.json");
        std::fs::write(&corrupt, "{ not json").unwrap();
        let loaded = load_settings_from(&corrupt);
        assert_eq!(loaded.cache_ttl_secs, 300);
        assert!(loaded.file_path.is_empty());
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.file_path.is_empty());
        assert_eq!(s.cache_ttl_secs, 300);
        assert_eq!(s.display_unit, CRORE);
        assert!(s.ytd_fallback);
        assert_eq!(s.limits.len(), 6);
        assert_eq!(s.limits[&Source::Sbi], 69_000_000.0);
        assert_eq!(s.sign_convention[&Source::Federal], SignConvention::DrawnPositive);
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{
            "file_path": "/data/cfs.xlsx",
            "limits": {"SBI": 100.0, "Axis": 50.0},
            "sign_convention": {"Axis": "drawn-positive"}
        }"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.cache_ttl_secs, 300);
        let profiles = s.profiles();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[&Source::Sbi].convention, SignConvention::PositiveAvailable);
        assert_eq!(profiles[&Source::Axis].convention, SignConvention::DrawnPositive);
        assert_eq!(profiles[&Source::Axis].limit, 50.0);
    }

    #[test]
    fn test_unset_workbook_path_is_an_error() {
        let s = Settings::default();
        assert!(s.workbook_path().is_err());
        assert!(s.pnl_workbook_path().is_err());
    }
}

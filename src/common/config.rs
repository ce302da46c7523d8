//! User configuration (`~/.config/armory/config.toml`).
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Environment variables win over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths;

pub const SCRATCH_ENV: &str = "ARMORY_SCRATCH_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArmoryConfig {
    /// Root for the per-run scratch directory. Falls back to the system temp dir.
    pub scratch_root: Option<PathBuf>,
    /// Timeout for GitHub API requests.
    pub http_timeout_secs: u64,
    /// Timeout for release asset downloads.
    pub download_timeout_secs: u64,
    /// Bearer token for the GitHub API, raises the anonymous rate limit.
    pub github_token: Option<String>,
    /// GitHub REST API root (GitHub Enterprise or a mirror).
    pub github_api_url: String,
    /// Root of `<owner>/<repo>/releases/download/...` asset URLs.
    pub github_download_url: String,
    /// Record and print per-attempt failure reasons for exhausted tools.
    pub diagnostics: bool,
    /// Skip confirmation prompts.
    pub assume_yes: bool,
}

impl Default for ArmoryConfig {
    fn default() -> Self {
        Self {
            scratch_root: None,
            http_timeout_secs: 30,
            download_timeout_secs: 300,
            github_token: None,
            github_api_url: "https://api.github.com".to_string(),
            github_download_url: "https://github.com".to_string(),
            diagnostics: false,
            assume_yes: false,
        }
    }
}

impl ArmoryConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(paths::armory_config_dir()?.join("config.toml"))
    }

    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup(SCRATCH_ENV).filter(|v| !v.is_empty()) {
            self.scratch_root = Some(PathBuf::from(root));
        }
        if let Some(token) = lookup("GITHUB_TOKEN")
            .or_else(|| lookup("GH_TOKEN"))
            .filter(|v| !v.is_empty())
        {
            self.github_token = Some(token);
        }
    }

    /// Directory the per-run scratch dir is created in.
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_root
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArmoryConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ArmoryConfig::default());
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "diagnostics = true\nhttp_timeout_secs = 5\n").unwrap();

        let config = ArmoryConfig::load_from(&path).unwrap();
        assert!(config.diagnostics);
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.download_timeout_secs, 300);
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert!(config.scratch_root.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "diagnostics = \"maybe\"").unwrap();
        assert!(ArmoryConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = ArmoryConfig {
            scratch_root: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        config.apply_env(|key| match key {
            SCRATCH_ENV => Some("/from/env".to_string()),
            "GH_TOKEN" => Some("token".to_string()),
            _ => None,
        });
        assert_eq!(config.scratch_root(), PathBuf::from("/from/env"));
        assert_eq!(config.github_token.as_deref(), Some("token"));
    }

    #[test]
    #[serial]
    fn test_load_reads_xdg_config_and_token() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("armory");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.toml"), "assume_yes = true\n").unwrap();

        let saved: Vec<_> = ["XDG_CONFIG_HOME", "GITHUB_TOKEN", "GH_TOKEN", SCRATCH_ENV]
            .into_iter()
            .map(|key| (key, std::env::var_os(key)))
            .collect();
        // SAFETY: serialized with every other test that touches the environment
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", dir.path());
            std::env::set_var("GITHUB_TOKEN", "ghp_test");
            std::env::remove_var("GH_TOKEN");
            std::env::remove_var(SCRATCH_ENV);
        }

        let config = ArmoryConfig::load();

        unsafe {
            for (key, value) in saved {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }

        let config = config.unwrap();
        assert!(config.assume_yes);
        assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
        assert!(config.scratch_root.is_none());
    }

    #[test]
    fn test_scratch_root_falls_back_to_temp_dir() {
        assert_eq!(ArmoryConfig::default().scratch_root(), std::env::temp_dir());
    }
}

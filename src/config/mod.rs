//! Configuration management for gitsh
//!
//! The repository profile is a YAML mapping loaded once at startup. Figment
//! layers it: serialized defaults first, then a discovered (or explicitly
//! given) profile file, then `GITSH_`-prefixed environment variables with
//! `__` as the section separator.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// File names probed when no explicit profile path is given
const CONFIG_FILE_NAMES: &[&str] = &["gitsh.yml", ".gitsh.yml"];

/// Main configuration structure for gitsh
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// The repository this shell session operates on
    pub repository: RepositoryProfile,
}

/// Repository profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryProfile {
    /// Where the working copy lives; created by clone and init
    pub local_path: PathBuf,

    /// Remote URL used by clone and push
    #[serde(default)]
    pub url: String,

    /// Message offered when committing without one
    #[serde(default = "default_commit_message")]
    pub default_commit_message: String,
}

fn default_commit_message() -> String {
    "Default commit message".to_string()
}

impl Default for RepositoryProfile {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from("my_repo"),
            url: String::new(),
            default_commit_message: default_commit_message(),
        }
    }
}

impl Config {
    /// Load configuration, layering defaults, the profile file, and environment
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = explicit {
            let path = Path::new(path);
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        } else if let Some(found) = Self::find_config_file() {
            figment = figment.merge(Yaml::file(found));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("GITSH_").split("__"));

        figment.extract().context("failed to load configuration")
    }

    /// Find a profile file in the current directory or parent directories
    pub fn find_config_file() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            for name in CONFIG_FILE_NAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.repository.local_path.as_os_str().is_empty() {
            anyhow::bail!("repository.local_path cannot be empty");
        }

        Ok(())
    }

    /// Render the effective configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).context("failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_match_the_documented_profile() {
        let config = Config::default();
        assert_eq!(config.repository.local_path, PathBuf::from("my_repo"));
        assert_eq!(config.repository.url, "");
        assert_eq!(
            config.repository.default_commit_message,
            "Default commit message"
        );
    }

    #[test]
    fn explicit_profile_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.yml");
        fs::write(
            &path,
            "repository:\n  local_path: checkout\n  url: https://example.com/demo.git\n",
        )
        .unwrap();

        let config = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.repository.local_path, PathBuf::from("checkout"));
        assert_eq!(config.repository.url, "https://example.com/demo.git");
        // Keys absent from the file keep their defaults
        assert_eq!(
            config.repository.default_commit_message,
            "Default commit message"
        );
    }

    #[test]
    fn missing_explicit_profile_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.yml");
        let err = Config::load(Some(path.to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn empty_local_path_fails_validation() {
        let mut config = Config::default();
        config.repository.local_path = PathBuf::new();
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn yaml_rendering_lists_the_profile_keys() {
        let rendered = Config::default().to_yaml().unwrap();
        assert!(rendered.contains("repository:"));
        assert!(rendered.contains("local_path:"));
        assert!(rendered.contains("default_commit_message:"));
    }
}

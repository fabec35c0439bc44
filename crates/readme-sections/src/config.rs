//! Source configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const GITHUB_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("No document source configured: set `url` or `github_user`")]
    MissingSource,
}

/// Where the document comes from and how long a fetched copy stays fresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Explicit document URL, takes precedence over `github_user`
    pub url: Option<String>,
    /// GitHub account whose profile README is fetched
    pub github_user: Option<String>,
    /// Branch of the profile repository
    pub branch: String,
    pub timeout_secs: u64,
    /// Age after which the cached document is fetched again
    pub revalidate_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            github_user: None,
            branch: "main".to_string(),
            timeout_secs: 30,
            revalidate_secs: None,
        }
    }
}

impl SourceConfig {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/readme-sections");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// URL of the document: `url` if set, otherwise the raw profile README
    /// of `github_user` on `branch`.
    pub fn document_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        let user = self
            .github_user
            .as_deref()
            .ok_or(ConfigError::MissingSource)?;
        Ok(format!(
            "{GITHUB_RAW_BASE_URL}/{user}/{user}/{}/README.md",
            self.branch
        ))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn revalidate_after(&self) -> Option<Duration> {
        self.revalidate_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = SourceConfig::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/readme-sections/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config: SourceConfig = toml::from_str("").unwrap();
        assert_eq!(config, SourceConfig::default());
        assert_eq!(config.branch, "main");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.revalidate_after(), None);
    }

    #[test]
    fn test_profile_readme_url() {
        let config = SourceConfig {
            github_user: Some("octocat".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.document_url().unwrap(),
            "https://raw.githubusercontent.com/octocat/octocat/main/README.md"
        );
    }

    #[test]
    fn test_explicit_url_wins() {
        let config = SourceConfig {
            url: Some("https://example.com/doc.md".to_string()),
            github_user: Some("octocat".to_string()),
            ..Default::default()
        };
        assert_eq!(config.document_url().unwrap(), "https://example.com/doc.md");
    }

    #[test]
    fn test_missing_source() {
        let result = SourceConfig::default().document_url();
        assert!(matches!(result, Err(ConfigError::MissingSource)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = SourceConfig::load_from_path(temp_dir.path().join("nope.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "github_user = \"octocat\"\nbranch = \"trunk\"\nrevalidate_secs = 3600\n",
        )
        .unwrap();

        let config = SourceConfig::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.github_user.as_deref(), Some("octocat"));
        assert_eq!(config.branch, "trunk");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.revalidate_after(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_load_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "timeout_secs = \"soon\"\n").unwrap();

        let result = SourceConfig::load_from_path(&config_file);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}

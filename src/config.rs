//! Configuration loading and management.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::OmniboxResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmniboxConfig {
    pub general: GeneralConfig,
    pub search: SearchConfig,
    pub providers: ProvidersConfig,
    pub index: IndexConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Result rows shown in the dropdown.
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Destination template for search matches; `{query}` is replaced with
    /// the URL-encoded query text.
    pub url_template: String,
}

/// Per-provider enable flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub open_tabs: bool,
    pub shortcuts: bool,
    pub history_quick: bool,
    pub history_url: bool,
    pub search: bool,
    pub zero_suggest: bool,
    pub pedals: bool,
    pub bookmarks: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Visit-count floor for never-typed history entries to enter the
    /// in-memory index.
    pub min_visit_count: u32,
}

impl Default for OmniboxConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            search: SearchConfig::default(),
            providers: ProvidersConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { max_results: 8 }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url_template: "https://duckduckgo.com/?q={query}".to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            open_tabs: true,
            shortcuts: true,
            history_quick: true,
            history_url: true,
            search: true,
            zero_suggest: true,
            pedals: true,
            bookmarks: true,
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { min_visit_count: 2 }
    }
}

impl OmniboxConfig {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|h| h.join(".config"))
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
            })
            .join("omnibox")
            .join("config.toml")
    }

    /// Load config from the default path, falling back to defaults when the
    /// file is missing or malformed.
    pub fn load() -> Self {
        let path = Self::config_path();

        let mut config = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(%e, "failed to parse config, using defaults");
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!(%e, "failed to read config, using defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.validate();
        config
    }

    /// Validate and clamp config values to acceptable ranges
    fn validate(&mut self) {
        self.general.max_results = self.general.max_results.clamp(1, 20);
        if !self.search.url_template.contains("{query}") {
            tracing::warn!("search url template lacks {{query}} placeholder, using default");
            self.search.url_template = SearchConfig::default().url_template;
        }
    }

    /// Save config to file
    pub fn save(&self) -> OmniboxResult<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::OmniboxError::Config(e.to_string()))?;
        fs::write(&path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OmniboxConfig::default();
        assert_eq!(config.general.max_results, 8);
        assert!(config.search.url_template.contains("{query}"));
        assert!(config.providers.zero_suggest);
        assert_eq!(config.index.min_visit_count, 2);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: OmniboxConfig = toml::from_str(
            r#"
            [general]
            max_results = 5

            [providers]
            pedals = false
            "#,
        )
        .unwrap();
        assert_eq!(config.general.max_results, 5);
        assert!(!config.providers.pedals);
        assert!(config.providers.search, "unset flags keep defaults");
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = OmniboxConfig::default();
        config.general.max_results = 500;
        config.search.url_template = "https://broken.example.com".to_string();
        config.validate();
        assert_eq!(config.general.max_results, 20);
        assert!(config.search.url_template.contains("{query}"));
    }
}

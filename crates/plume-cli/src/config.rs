// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Plume project configuration.
//!
//! Configuration is loaded from `plume.toml` at the project root. Every
//! section is optional; command-line flags override file values.
//!
//! # Example Configuration
//!
//! ```toml
//! [theme]
//! dir = "themes/casper"
//!
//! [assets]
//! base_url = "https://cdn.example.com/casper/"
//!
//! [render]
//! max_depth = 32
//! cache_capacity = 100
//! ```

use anyhow::Context;
use plume::{EngineConfig, DEFAULT_MAX_DEPTH};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file.
pub const CONFIG_FILE: &str = "plume.toml";

/// Main configuration structure loaded from `plume.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// Theme location.
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Asset URL settings.
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Rendering limits.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Where the theme lives.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeConfig {
    /// Theme directory (default: "theme").
    #[serde(default = "default_theme_dir")]
    pub dir: PathBuf,
}

/// Asset URL settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetsConfig {
    /// Public URL prefix of theme assets (default: "/assets/").
    #[serde(default = "default_asset_base")]
    pub base_url: String,
}

/// Rendering limits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    /// Maximum partial nesting depth and layout chain length (default: 32).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Compiled template cache size (default: 100).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_theme_dir() -> PathBuf {
    PathBuf::from("theme")
}

fn default_asset_base() -> String {
    "/assets/".to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_cache_capacity() -> usize {
    100
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dir: default_theme_dir(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_asset_base(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Config {
    /// Loads configuration from `plume.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(dir) = &overrides.theme_dir {
            self.theme.dir = dir.clone();
        }
        if let Some(base_url) = &overrides.asset_base {
            self.assets.base_url = base_url.clone();
        }
        if let Some(max_depth) = overrides.max_depth {
            self.render.max_depth = max_depth;
        }
        self
    }

    /// Engine settings described by this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new()
            .with_asset_base(self.assets.base_url.clone())
            .with_max_depth(self.render.max_depth)
            .with_cache_capacity(self.render.cache_capacity)
    }
}

/// Values given on the command line that take precedence over `plume.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--theme`
    pub theme_dir: Option<PathBuf>,
    /// `--asset-base`
    pub asset_base: Option<String>,
    /// `--max-depth`
    pub max_depth: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.max_depth, 32);
        assert_eq!(config.assets.base_url, "/assets/");
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[theme]\ndir = \"themes/casper\"\n\n[render]\nmax_depth = 8\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.theme.dir, PathBuf::from("themes/casper"));
        assert_eq!(config.render.max_depth, 8);
        assert_eq!(config.render.cache_capacity, 100);
        assert_eq!(config.assets.base_url, "/assets/");
    }

    #[test]
    fn test_flags_override_file_values() {
        let config = Config::default().with_overrides(&Overrides {
            theme_dir: Some(PathBuf::from("other")),
            asset_base: Some("/static/".to_string()),
            max_depth: None,
        });
        assert_eq!(config.theme.dir, PathBuf::from("other"));

        let engine = config.engine_config();
        assert_eq!(engine.asset_base, "/static/");
        assert_eq!(engine.max_depth, 32);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[render]\nmax_depth = \"deep\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}

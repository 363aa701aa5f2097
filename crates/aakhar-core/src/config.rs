//! Application configuration management.
//!
//! Configuration covers where the app is served from, how its assets are laid
//! out, which files make up the offline shell and the cache version token.
//!
//! Configuration is stored at `~/.config/aakhar/config.json`. Missing fields
//! take their defaults, and `AAKHAR_BASE_URL` / `AAKHAR_CACHE_VERSION` override
//! the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::api::AssetPaths;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "aakhar";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const ENV_BASE_URL: &str = "AAKHAR_BASE_URL";
const ENV_CACHE_VERSION: &str = "AAKHAR_CACHE_VERSION";

/// Files the app needs to boot offline. Data and images are cached on demand
/// and must not be listed here.
const DEFAULT_SHELL_FILES: &[&str] = &[
    "/",
    "index.html",
    "manifest.webmanifest",
    "src/js/main.js",
    "src/js/api.js",
    "src/js/router.js",
    "src/js/components/about.js",
    "src/js/components/learn.js",
    "src/js/components/recall.js",
    "src/js/components/quiz.js",
    "src/css/style.css",
    "src/css/responsive.css",
    "assets/icons/icon-192x192.png",
    "assets/icons/icon-512x512.png",
];

/// The one image format used for vocabulary pictures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageExtension {
    #[default]
    Jpg,
    Png,
}

impl ImageExtension {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Jpg => "jpg",
            ImageExtension::Png => "png",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub cache_prefix: String,
    /// Bump on every deploy that changes the shell.
    pub cache_version: String,
    pub data_path: String,
    pub image_path: String,
    pub categories_manifest: String,
    pub image_extension: ImageExtension,
    pub shell_files: Vec<String>,
    pub request_timeout_secs: u64,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let paths = AssetPaths::default();
        Self {
            base_url: "http://localhost:8080/".to_string(),
            cache_prefix: APP_NAME.to_string(),
            cache_version: "v2".to_string(),
            data_path: paths.data_path,
            image_path: paths.image_path,
            categories_manifest: paths.categories_manifest,
            image_extension: paths.image_extension,
            shell_files: DEFAULT_SHELL_FILES.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: 30,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Ok(Self::load_from(&path)?.with_env_overrides())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Ok(version) = std::env::var(ENV_CACHE_VERSION) {
            self.cache_version = version;
        }
        self
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base URL, with a trailing slash so relative asset paths join under it.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).with_context(|| format!("Invalid base URL: {}", self.base_url))
    }

    pub fn static_cache_name(&self) -> String {
        format!("{}-static-{}", self.cache_prefix, self.cache_version)
    }

    pub fn dynamic_cache_name(&self) -> String {
        format!("{}-dynamic-{}", self.cache_prefix, self.cache_version)
    }

    pub fn shell_urls(&self) -> Result<Vec<Url>> {
        let base = self.base_url()?;
        self.shell_files
            .iter()
            .map(|file| {
                base.join(file)
                    .with_context(|| format!("Invalid shell file path: {}", file))
            })
            .collect()
    }

    /// URL path prefixes served network-first: the data and image directories.
    pub fn network_first_prefixes(&self) -> Result<Vec<String>> {
        let base = self.base_url()?;
        [&self.data_path, &self.image_path]
            .into_iter()
            .map(|path| {
                base.join(path)
                    .map(|url| url.path().to_string())
                    .with_context(|| format!("Invalid asset path: {}", path))
            })
            .collect()
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            data_path: self.data_path.clone(),
            image_path: self.image_path.clone(),
            categories_manifest: self.categories_manifest.clone(),
            image_extension: self.image_extension,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

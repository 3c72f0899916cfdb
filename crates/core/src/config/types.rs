use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::{DEFAULT_MAX_IMAGES, DEFAULT_MAX_IMAGE_BYTES};
use crate::controller::DEFAULT_DEBOUNCE;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub favorites: FavoritesConfig,
    #[serde(default)]
    pub artwork: ArtworkConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Copy of the configuration with the API key masked, safe to log.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        copy.api.api_key = "***".to_string();
        copy
    }
}

/// Remote catalog API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API key (required).
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout_secs() -> u32 {
    30
}

/// Favorites database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FavoritesConfig {
    #[serde(default = "default_favorites_path")]
    pub path: PathBuf,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            path: default_favorites_path(),
        }
    }
}

fn default_favorites_path() -> PathBuf {
    PathBuf::from("favorites.db")
}

/// Artwork cache limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtworkConfig {
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

/// Search behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiescence window before a typed query fires, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str(
            r#"
[api]
api_key = "k"
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.favorites.path, PathBuf::from("favorites.db"));
        assert_eq!(config.artwork.max_images, 100);
        assert_eq!(config.artwork.max_image_bytes, 50 * 1024 * 1024);
        assert_eq!(config.search.debounce_ms, 500);
    }

    #[test]
    fn test_redacted_masks_api_key() {
        let config: Config = toml::from_str(
            r#"
[api]
api_key = "secret"
"#,
        )
        .unwrap();

        let redacted = config.redacted();
        assert_eq!(redacted.api.api_key, "***");
        assert_eq!(config.api.api_key, "secret");
    }
}

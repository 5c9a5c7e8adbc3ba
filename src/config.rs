//! Application configuration.
//!
//! Read from `<config dir>/story-capture/config.json`. Every field has a
//! default, so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::capture::config::CaptureConfig;
use crate::error::ConfigError;
use crate::location::LatLng;

pub const API_URL_ENV: &str = "STORY_CAPTURE_API_URL";
pub const DEFAULT_API_URL: &str = "https://story-api.dicoding.dev/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub default_center: LatLng,
    pub picker_zoom: u8,
    pub user_position_zoom: u8,
    pub stories_zoom: u8,
    pub fit_padding: u32,
    pub fit_max_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: LatLng::new(-6.2088, 106.8456), // Jakarta
            picker_zoom: 13,
            user_position_zoom: 15,
            stories_zoom: 10,
            fit_padding: 20,
            fit_max_zoom: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            maximum_age_ms: 300_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub capture: CaptureConfig,
    pub map: MapConfig,
    pub geolocation: GeolocationConfig,
    pub redirect_delay_ms: u64,
    pub banner_dismiss_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            capture: CaptureConfig::default(),
            map: MapConfig::default(),
            geolocation: GeolocationConfig::default(),
            redirect_delay_ms: 2_000,
            banner_dismiss_ms: 5_000,
        }
    }
}

impl AppConfig {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("story-capture")
            .join("config.json")
    }

    /// Load from the default path, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::default_path())?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.api_base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.geolocation.timeout_ms == 0 {
            return Err(ConfigError::Invalid("geolocation.timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn banner_ttl(&self) -> Duration {
        Duration::from_millis(self.banner_dismiss_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

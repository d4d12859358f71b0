use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::global_constants;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Dark => write!(f, "Dark"),
            ThemeMode::Light => write!(f, "Light"),
        }
    }
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Dark
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub smart_cropping: bool,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub max_poll_wait_secs: u64,
    pub request_timeout_secs: u64,
    pub theme_mode: ThemeMode,
}

impl fmt::Debug for VisionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted_key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };

        f.debug_struct("VisionSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redacted_key)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("thumbnail_height", &self.thumbnail_height)
            .field("smart_cropping", &self.smart_cropping)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("max_poll_attempts", &self.max_poll_attempts)
            .field("max_poll_wait_secs", &self.max_poll_wait_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("theme_mode", &self.theme_mode)
            .finish()
    }
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            thumbnail_width: global_constants::DEFAULT_THUMBNAIL_WIDTH,
            thumbnail_height: global_constants::DEFAULT_THUMBNAIL_HEIGHT,
            smart_cropping: true,
            poll_interval_ms: global_constants::DEFAULT_POLL_INTERVAL_MS,
            max_poll_attempts: global_constants::DEFAULT_MAX_POLL_ATTEMPTS,
            max_poll_wait_secs: global_constants::DEFAULT_MAX_POLL_WAIT_SECS,
            request_timeout_secs: global_constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            theme_mode: ThemeMode::default(),
        }
    }
}

impl VisionSettings {
    pub fn load() -> anyhow::Result<Self> {
        let mut settings = match Self::read_stored()? {
            Some(settings) => settings,
            None => {
                log::info!("[SETTINGS] No settings file found, using defaults");
                let default_settings = Self::default();
                default_settings.save()?;
                default_settings
            }
        };

        settings.apply_overrides(|name| std::env::var(name).ok());

        log::debug!("[SETTINGS] Effective settings: {:?}", settings);
        Ok(settings)
    }

    fn read_stored() -> anyhow::Result<Option<Self>> {
        let settings_path = Self::get_settings_file_path()?;
        if !settings_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&settings_path)?;
        let settings: VisionSettings = serde_json::from_str(&contents)?;
        log::info!("[SETTINGS] Loaded settings from {:?}", settings_path);
        Ok(Some(settings))
    }

    /// Persists the theme choice alone, so secrets taken from the environment never reach disk.
    pub fn save_theme_mode(&self) -> anyhow::Result<()> {
        let mut stored = Self::read_stored()?.unwrap_or_default();
        stored.theme_mode = self.theme_mode.clone();
        stored.save()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let settings_path = Self::get_settings_file_path()?;

        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&settings_path, contents)?;

        log::info!("[SETTINGS] Saved settings to {:?}", settings_path);
        Ok(())
    }

    /// Secrets live outside the settings file; the environment wins when set.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(global_constants::ENV_AI_SERVICE_ENDPOINT)
            .filter(|value| !value.trim().is_empty())
        {
            log::debug!("[SETTINGS] Endpoint taken from environment");
            self.endpoint = endpoint.trim().to_string();
        }

        if let Some(api_key) = lookup(global_constants::ENV_AI_SERVICE_KEY)
            .filter(|value| !value.trim().is_empty())
        {
            log::debug!("[SETTINGS] API key taken from environment");
            self.api_key = api_key.trim().to_string();
        }
    }

    pub fn is_service_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    /// Clamped to `MIN_POLL_INTERVAL_MS` so a zero in the file cannot flood the service.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(global_constants::MIN_POLL_INTERVAL_MS))
    }

    pub fn max_poll_wait(&self) -> Option<Duration> {
        (self.max_poll_wait_secs > 0).then(|| Duration::from_secs(self.max_poll_wait_secs))
    }

    pub fn max_poll_attempts(&self) -> Option<u32> {
        (self.max_poll_attempts > 0).then_some(self.max_poll_attempts)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    fn get_settings_file_path() -> anyhow::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join(global_constants::CONFIG_DIRECTORY_NAME);

        Ok(config_dir.join(global_constants::SETTINGS_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mode_default_is_dark() {
        let default_theme = ThemeMode::default();
        assert_eq!(default_theme, ThemeMode::Dark);
    }

    #[test]
    fn test_theme_mode_deserialization() {
        let json = "\"Light\"";
        let theme: ThemeMode = serde_json::from_str(json).unwrap();
        assert_eq!(theme, ThemeMode::Light);
    }

    #[test]
    fn test_vision_settings_default_values() {
        let settings = VisionSettings::default();

        assert!(settings.endpoint.is_empty());
        assert!(settings.api_key.is_empty());
        assert_eq!(settings.thumbnail_width, 100);
        assert_eq!(settings.thumbnail_height, 100);
        assert!(settings.smart_cropping);
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert!(!settings.is_service_configured());
    }

    #[test]
    fn test_default_settings_file_omits_secrets() {
        let serialized = serde_json::to_string(&VisionSettings::default()).unwrap();

        assert!(!serialized.contains("endpoint"));
        assert!(!serialized.contains("api_key"));
    }

    #[test]
    fn test_vision_settings_deserialization_fills_missing_fields() {
        let json = r#"{
            "endpoint": "https://example.cognitiveservices.azure.com/",
            "thumbnail_width": 64
        }"#;

        let settings: VisionSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.thumbnail_width, 64);
        assert_eq!(settings.thumbnail_height, 100);
        assert!(settings.api_key.is_empty());
        assert_eq!(
            settings.max_poll_attempts,
            global_constants::DEFAULT_MAX_POLL_ATTEMPTS
        );
    }

    #[test]
    fn test_environment_overrides_file_values() {
        let mut settings = VisionSettings {
            endpoint: "https://from-file.example.com".to_string(),
            api_key: "file-key".to_string(),
            ..VisionSettings::default()
        };

        settings.apply_overrides(|name| match name {
            "AI_SERVICE_ENDPOINT" => Some(" https://from-env.example.com ".to_string()),
            "AI_SERVICE_KEY" => Some("env-key".to_string()),
            _ => None,
        });

        assert_eq!(settings.endpoint, "https://from-env.example.com");
        assert_eq!(settings.api_key, "env-key");
        assert!(settings.is_service_configured());
    }

    #[test]
    fn test_blank_environment_values_are_ignored() {
        let mut settings = VisionSettings {
            api_key: "file-key".to_string(),
            ..VisionSettings::default()
        };

        settings.apply_overrides(|_| Some("   ".to_string()));

        assert_eq!(settings.api_key, "file-key");
        assert!(settings.endpoint.is_empty());
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let settings = VisionSettings {
            api_key: "super-secret".to_string(),
            ..VisionSettings::default()
        };

        let debug_output = format!("{:?}", settings);

        assert!(!debug_output.contains("super-secret"));
        assert!(debug_output.contains("<redacted>"));
    }

    #[test]
    fn test_zero_bounds_disable_poll_limits() {
        let settings = VisionSettings {
            max_poll_attempts: 0,
            max_poll_wait_secs: 0,
            ..VisionSettings::default()
        };

        assert!(settings.max_poll_attempts().is_none());
        assert!(settings.max_poll_wait().is_none());
    }

    #[test]
    fn test_zero_request_timeout_means_no_timeout() {
        let settings = VisionSettings {
            request_timeout_secs: 0,
            ..VisionSettings::default()
        };

        assert!(settings.request_timeout().is_none());
        assert_eq!(
            VisionSettings::default().request_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_poll_interval_has_a_floor() {
        let settings = VisionSettings {
            poll_interval_ms: 0,
            ..VisionSettings::default()
        };

        assert_eq!(
            settings.poll_interval(),
            Duration::from_millis(global_constants::MIN_POLL_INTERVAL_MS)
        );
    }
}

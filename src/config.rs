use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings exposed to the chat frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server_host: String,
    pub server_port: u16,
    pub intra_threads: i32,
    pub max_upload_mb: u32,
}

/// Internal configuration, persisted as JSON under the config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,
    pub server_host: String,
    pub server_port: u16,
    /// Override for the text model directory; defaults to the models dir
    pub model_dir: Option<PathBuf>,
    /// Threads for ONNX inference
    pub intra_threads: i32,
    /// Upload size limit for audio files
    pub max_upload_mb: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 7860,
            model_dir: None,
            intra_threads: 2,
            max_upload_mb: 32,
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".emoverse"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the default models directory
    pub fn models_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("models"))
    }

    /// Load config from file or return default
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                debug!("Failed to load config, using default: {}", e);
                Self::default()
            }
        }
    }

    /// Load config from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Directory holding the text model artifacts
    pub fn text_model_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.model_dir {
            Ok(dir.clone())
        } else {
            Ok(Self::models_dir()?.join("text-emotion"))
        }
    }

    /// Convert to frontend Settings
    pub fn to_settings(&self) -> Settings {
        Settings {
            server_host: self.server_host.clone(),
            server_port: self.server_port,
            intra_threads: self.intra_threads,
            max_upload_mb: self.max_upload_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema_version, 1);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 7860);
        assert_eq!(config.intra_threads, 2);
        assert!(config.model_dir.is_none());
    }

    #[test]
    fn test_config_dir() {
        let path = Config::config_dir().unwrap();
        assert!(path.to_string_lossy().contains(".emoverse"));
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path().unwrap();
        assert!(path.to_string_lossy().ends_with("config.json"));
    }

    #[test]
    fn test_models_dir() {
        let path = Config::models_dir().unwrap();
        assert!(path.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_text_model_dir_default() {
        let config = Config::default();
        let path = config.text_model_dir().unwrap();
        assert!(path.to_string_lossy().ends_with("text-emotion"));
    }

    #[test]
    fn test_text_model_dir_override() {
        let mut config = Config::default();
        config.model_dir = Some(PathBuf::from("/custom/models"));
        let path = config.text_model_dir().unwrap();
        assert_eq!(path, PathBuf::from("/custom/models"));
    }

    #[test]
    fn test_to_settings() {
        let mut config = Config::default();
        config.server_port = 9000;
        config.max_upload_mb = 64;

        let settings = config.to_settings();
        assert_eq!(settings.server_port, 9000);
        assert_eq!(settings.max_upload_mb, 64);
        assert_eq!(settings.server_host, config.server_host);
    }

    #[test]
    fn test_load_or_default_returns_default() {
        let config = Config::load_or_default();
        assert_eq!(config.schema_version, 1);
    }
}

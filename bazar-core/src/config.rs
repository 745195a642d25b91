//! Configuration management
//!
//! Settings live in settings.json inside the bazar directory:
//! ```json
//! {
//!   "app": { "localMode": false, ... },
//!   "remote": { "baseUrl": "https://api.example.com", "apiKey": "..." }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    remote: Option<RemoteSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    local_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Remote backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    pub base_url: String,
    pub api_key: String,
}

/// Bazar configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub local_mode: bool,
    pub remote: Option<RemoteSettings>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the bazar directory
    ///
    /// Local mode can be enabled via:
    /// 1. Settings file
    /// 2. Environment variable BAZAR_LOCAL_MODE (for CI/testing)
    pub fn load(bazar_dir: &Path) -> Result<Self> {
        let settings_path = bazar_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Check env var for local mode override (for CI/testing)
        let local_mode = match std::env::var("BAZAR_LOCAL_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.local_mode,
        };

        Ok(Self {
            local_mode,
            remote: raw.remote.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the bazar directory.
    /// Preserves other settings that the CLI doesn't manage.
    pub fn save(&self, bazar_dir: &Path) -> Result<()> {
        let settings_path = bazar_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Update only the fields we manage
        settings.app.local_mode = self.local_mode;
        settings.remote = self.remote.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Whether the local adapters should be used. True when local mode
    /// is forced or no remote backend is configured.
    pub fn is_local(&self) -> bool {
        self.local_mode || self.remote.is_none()
    }
}

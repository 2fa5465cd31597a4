// src/config.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: [f32; 4],
    /// Extra scale applied on top of the window's DPI factor
    pub ui_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// HTTP(S) base URL or local directory holding `<note>.<extension>` files
    pub sample_base: String,
    pub sample_extension: String,
    pub initial_volume: f32,
    /// Slider and arrow-key increment
    pub volume_step: f32,
    pub fetch_timeout_secs: u64,
}

/// Key sizes in logical pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    pub natural_width: f32,
    pub natural_height: f32,
    pub accidental_width: f32,
    pub accidental_height: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub audio: AudioConfig,
    pub keyboard: KeyboardConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 960,
            height: 600,
            // gray-100
            background_color: [0.953, 0.957, 0.965, 1.0],
            ui_scale: 1.0,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sample_base: "https://assets.codepen.io/1075148".to_string(),
            sample_extension: "mp3".to_string(),
            initial_volume: 0.5,
            volume_step: 0.1,
            fetch_timeout_secs: 10,
        }
    }
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        KeyboardConfig {
            natural_width: 64.0,
            natural_height: 192.0,
            accidental_width: 40.0,
            accidental_height: 128.0,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults.
    ///
    /// Only a missing file is replaced by a freshly written default; a file
    /// that fails to read or parse is left alone.
    pub fn load_or_create(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) if is_not_found(&*e) => {
                log::info!("No config file at {}, writing defaults", path);
                let default = AppConfig::default();
                if let Err(e) = default.save_to_file(path) {
                    log::warn!("Failed to save default config: {}", e);
                }
                default
            }
            Err(e) => {
                log::warn!("Ignoring unreadable config {}: {}", path, e);
                AppConfig::default()
            }
        }
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_not_found(error: &(dyn std::error::Error + 'static)) -> bool {
    error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}

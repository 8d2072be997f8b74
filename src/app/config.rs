//! Configuration for the hex view

use serde::{Deserialize, Serialize};

use crate::core::Format;

/// Process-wide defaults, captured into each entry at first open
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Hex digits per group: 2, 4, 8 or 16
    pub nibbles: u8,
    /// Radix of the group numerals: 2, 8, 10 or 16
    pub radix: u8,
    /// Byte order within a group
    pub little_endian: bool,
    /// Bytes per rendered line
    pub width: usize,
    /// Render digits in upper case
    pub uppercase: bool,
    /// Render the column-index header line
    pub show_offset: bool,
    /// Render the left address gutter
    pub show_address: bool,
    /// Render the trailing ASCII column
    pub show_ascii: bool,
    /// Cap on rendered content, in bytes
    pub size_display: usize,
    /// Coalescing window for external change notifications, in milliseconds
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nibbles: 2,
            radix: 16,
            little_endian: false,
            width: 16,
            uppercase: false,
            show_offset: true,
            show_address: true,
            show_ascii: true,
            size_display: 1024 * 1024,
            debounce_ms: 100,
        }
    }
}

impl Settings {
    /// The display format these settings describe
    pub fn format(&self) -> Format {
        Format {
            nibbles: self.nibbles,
            radix: self.radix,
            little_endian: self.little_endian,
            width: self.width,
            uppercase: self.uppercase,
            show_offset: self.show_offset,
            show_address: self.show_address,
            show_ascii: self.show_ascii,
            size_display: self.size_display,
        }
    }

    /// Load settings from a file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load settings from the default location or return defaults
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/hexview/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                if let Ok(settings) = Self::load(&config_path) {
                    return settings;
                }
            }
        }
        Self::default()
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<std::path::PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| std::path::PathBuf::from(home).join(".config").join("hexview"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

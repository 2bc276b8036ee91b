//! Gallery defaults loaded from `juicebox.toml`.
//!
//! Stock defaults are overridden by a user `juicebox.toml` in the config
//! directory. The file is sparse: specify only what you want to change.
//!
//! ```toml
//! [embed]
//! width = "100%"            # galleryWidth passed to the widget
//! height = "100%"           # galleryHeight passed to the widget
//! xml_base_url = ""         # Prefix for configuration URLs ("" = site-relative)
//!
//! [library]
//! name = "Juicebox-Lite"
//! version = ""              # e.g. "Pro 1.4"; visible to class selectors
//!
//! [options]
//! # Default gallery options, applied to every gallery.
//! # textColor = "rgba(255,255,255,1)"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::connector::OPTION_PREFIX;
use crate::types::{LibraryInfo, Settings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "juicebox.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JuiceboxConfig {
    /// Embed dimensions and configuration URL base.
    pub embed: EmbedConfig,
    /// Client widget library metadata.
    pub library: LibraryInfo,
    /// Default gallery options.
    pub options: BTreeMap<String, String>,
}

/// Embed markup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbedConfig {
    pub width: String,
    pub height: String,
    /// Prefix for configuration URLs. Empty means site-relative.
    pub xml_base_url: String,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            width: "100%".to_string(),
            height: "100%".to_string(),
            xml_base_url: String::new(),
        }
    }
}

impl JuiceboxConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embed.width.trim().is_empty() {
            return Err(ConfigError::Validation(
                "embed.width must not be empty".into(),
            ));
        }
        if self.embed.height.trim().is_empty() {
            return Err(ConfigError::Validation(
                "embed.height must not be empty".into(),
            ));
        }
        if self.options.keys().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "options names must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Settings bag for assembly: default options as `jlib_*` entries plus
    /// the embed dimensions.
    pub fn settings(&self) -> Settings {
        let mut settings: Settings = self
            .options
            .iter()
            .map(|(name, value)| (format!("{OPTION_PREFIX}{name}"), value.clone()))
            .collect();
        settings.insert("width".to_string(), self.embed.width.clone());
        settings.insert("height".to_string(), self.embed.height.clone());
        settings
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(JuiceboxConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `juicebox.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<JuiceboxConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: JuiceboxConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `juicebox.toml` in the given directory, on top of stock
/// defaults.
pub fn load_config(dir: &Path) -> Result<JuiceboxConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `juicebox.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Juicebox Configuration
# ======================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Embed markup
# ---------------------------------------------------------------------------
[embed]
# Gallery dimensions handed to the widget (any CSS length).
width = "100%"
height = "100%"

# Prefix for gallery configuration URLs, e.g. "https://example.org".
# Empty means site-relative ("/juicebox/xml/...").
xml_base_url = ""

# ---------------------------------------------------------------------------
# Client library
# ---------------------------------------------------------------------------
[library]
name = "Juicebox-Lite"
# Version string as reported by the library, e.g. "Pro 1.4".
version = ""

# ---------------------------------------------------------------------------
# Default gallery options
# ---------------------------------------------------------------------------
# Applied to every gallery. Source data, per-gallery settings and manual
# config override these. Names are case-insensitive.
[options]
# textColor = "rgba(255,255,255,1)"
# thumbFrameColor = "rgba(255,255,255,.5)"
# showOpenButton = "TRUE"
"##
}

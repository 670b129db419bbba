//! Read-only settings for the switch.
//!
//! Settings live in a TOML file split into sections. A section only has to
//! contain the keys that differ from the defaults: the serialized defaults
//! are merged with the file content recursively (tables merge, everything
//! else, including arrays, is replaced) before deserializing.

use crate::keys::KeyBindings;
use crate::mode::ModeState;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use toml::{Table, Value};
use tracing::debug;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(toml::de::Error),

    #[error("serialize defaults: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value in section `{section}`: {source}")]
    Deserialize {
        section: &'static str,
        source: toml::de::Error,
    },

    #[error("section `{0}` must be a table")]
    InvalidSection(&'static str),
}

/// A typed section of the settings file.
pub trait Settings: Default + Serialize + DeserializeOwned {
    /// Table name inside the settings file.
    const SECTION: &'static str;

    /// Load this section from `path`. A missing or empty file yields the
    /// defaults.
    fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut file: Table = content.parse().map_err(SettingsError::Parse)?;
        let delta = match file.remove(Self::SECTION) {
            None => return Ok(Self::default()),
            Some(Value::Table(table)) => table,
            Some(_) => return Err(SettingsError::InvalidSection(Self::SECTION)),
        };

        let defaults = match Value::try_from(Self::default())? {
            Value::Table(table) => table,
            _ => return Err(SettingsError::InvalidSection(Self::SECTION)),
        };
        let merged = merge_tables(&defaults, &delta);
        Value::Table(merged)
            .try_into()
            .map_err(|source| SettingsError::Deserialize {
                section: Self::SECTION,
                source,
            })
    }
}

/// Merge `delta` over `defaults` recursively (tables only).
fn merge_tables(defaults: &Table, delta: &Table) -> Table {
    let mut merged = defaults.clone();
    for (key, delta_value) in delta {
        match (merged.get(key), delta_value) {
            (Some(Value::Table(def)), Value::Table(delta_table)) => {
                let nested = merge_tables(def, delta_table);
                merged.insert(key.clone(), Value::Table(nested));
            }
            _ => {
                merged.insert(key.clone(), delta_value.clone());
            }
        }
    }
    merged
}

/// Section `style_switch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchSettings {
    /// Mode the switch resolves to on its first resolution.
    pub initial_mode: ModeState,
    pub clipping_auto_adjust: bool,
    /// Observer priority on the event source.
    pub priority: f32,
    pub bindings: KeyBindings,
}

impl Default for SwitchSettings {
    fn default() -> Self {
        Self {
            initial_mode: ModeState::default(),
            clipping_auto_adjust: true,
            priority: 0.0,
            bindings: KeyBindings::default(),
        }
    }
}

impl Settings for SwitchSettings {
    const SECTION: &'static str = "style_switch";
}

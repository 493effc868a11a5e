//! Read-only settings snapshot
//!
//! The HP-rolling and display-projection logic take the snapshot as an
//! explicit parameter rather than reading process-wide state, so the core
//! stays testable without a configuration singleton.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error reading '{path}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
}

/// Tracker settings snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rules: RulesSettings,
    pub player_view: PlayerViewSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            error: e,
            path: path.to_path_buf(),
        })?;
        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            error: e,
            path: path.to_path_buf(),
        })
    }
}

/// Rules-variant toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSettings {
    /// Roll monster max HP from the template's dice notes instead of
    /// using the static value
    pub roll_monster_hp: bool,
    /// Let damage drive current HP below zero instead of clamping
    pub allow_negative_hp: bool,
}

/// Spectator-view options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerViewSettings {
    pub monster_hp_verbosity: HpVerbosity,
}

/// How much monster HP detail the spectator view exposes
///
/// Wire values match the historical settings format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HpVerbosity {
    #[serde(rename = "Actual HP")]
    ActualHp,
    #[serde(rename = "Hide All")]
    HideAll,
    #[serde(rename = "Damage Taken")]
    DamageTaken,
    #[serde(rename = "Monochrome Label")]
    MonochromeLabel,
    #[default]
    #[serde(rename = "Colored Label")]
    ColoredLabel,
}

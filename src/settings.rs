//! Game settings and gameplay tuning
//!
//! Persisted as pretty JSON. Missing files fall back to defaults; partial
//! files fill the gaps from defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode settings for {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_hp: u32,
    /// Horizontal speed while a move key is held (units per frame)
    pub player_speed: f32,
    pub invader_hp: u32,
    /// Fall speed (units per frame)
    pub invader_speed: f32,
    pub projectile_radius: f32,
    pub damage_projectile_speed: f32,
    pub mark_projectile_speed: f32,
    pub spawn_interval_ms: u64,
    pub reject_delay_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_hp: PLAYER_HP,
            player_speed: PLAYER_SPEED,
            invader_hp: INVADER_HP,
            invader_speed: INVADER_SPEED,
            projectile_radius: PROJECTILE_RADIUS,
            damage_projectile_speed: DAMAGE_PROJECTILE_SPEED,
            mark_projectile_speed: MARK_PROJECTILE_SPEED,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            reject_delay_ms: REJECT_DELAY_MS,
        }
    }
}

/// Host settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Target frame rate of the host loop
    pub fps: u32,
    /// Playfield units covered by one terminal column
    pub cell_width: f32,
    /// Playfield units covered by one terminal row
    pub cell_height: f32,
    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_width: 8.0,
            cell_height: 16.0,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Default location: `$HOME/.vocab_invaders.json`
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".vocab_invaders.json")
    }

    /// Frame duration in milliseconds (at least 1)
    pub fn frame_ms(&self) -> u64 {
        (1000 / u64::from(self.fps.max(1))).max(1)
    }

    /// Load settings from disk; a missing file yields defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let settings = serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| SettingsError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

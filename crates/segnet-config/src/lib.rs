//! Shared configuration for segnet.
//!
//! TOML defaults merged with `SEGNET_` environment variables, and the
//! translation into `segnet_core` options. The CLI layers its own
//! `GlobalOpts` overrides on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use segnet_core::{ImportDefaults, SimulationOptions, TieBreak};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Topology document used when `--file` is not given.
    pub default_file: Option<PathBuf>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// How equally specific rules are ranked.
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Zone given to imported nodes that have none.
    #[serde(default = "default_zone")]
    pub zone: String,

    /// Type given to imported nodes that have none.
    #[serde(default = "default_node_type")]
    pub node_type: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            tie_break: TieBreak::default(),
            zone: default_zone(),
            node_type: default_node_type(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_zone() -> String {
    ImportDefaults::default().zone
}
fn default_node_type() -> String {
    ImportDefaults::default().node_type
}

impl Config {
    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            tie_break: self.defaults.tie_break,
        }
    }

    /// Node defaults applied when importing a topology document.
    pub fn import_defaults(&self) -> Result<ImportDefaults, ConfigError> {
        let zone = self.defaults.zone.trim();
        if zone.is_empty() {
            return Err(ConfigError::Validation {
                field: "defaults.zone".into(),
                reason: "must not be blank".into(),
            });
        }
        Ok(ImportDefaults {
            zone: zone.into(),
            node_type: self.defaults.node_type.trim().into(),
            ..ImportDefaults::default()
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "segnet", "segnet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("segnet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SEGNET_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

//! CLI configuration: thin wrapper around `segnet_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--file, --output, --color, --tie-break).

use std::path::PathBuf;

use clap::ValueEnum;

use segnet_core::{SimulationOptions, TieBreak};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat, TieBreakArg};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use segnet_config::{Config, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Topology document to operate on (flag > env > config `default_file`).
pub fn topology_file(global: &GlobalOpts, cfg: &Config) -> Result<PathBuf, CliError> {
    global
        .file
        .clone()
        .or_else(|| cfg.default_file.clone())
        .ok_or_else(|| CliError::NoTopology {
            config_path: config_path().display().to_string(),
        })
}

pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    match global.output {
        Some(format) => Ok(format),
        None => parse_value("defaults.output", &cfg.defaults.output),
    }
}

pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> Result<ColorMode, CliError> {
    match global.color {
        Some(mode) => Ok(mode),
        None => parse_value("defaults.color", &cfg.defaults.color),
    }
}

/// Simulation options from config, with `--tie-break` taking priority.
pub fn simulation_options(global: &GlobalOpts, cfg: &Config) -> SimulationOptions {
    let mut options = cfg.simulation_options();
    if let Some(arg) = global.tie_break {
        options.tie_break = match arg {
            TieBreakArg::StoreOrder => TieBreak::StoreOrder,
            TieBreakArg::LowestId => TieBreak::LowestId,
        };
    }
    options
}

fn parse_value<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}

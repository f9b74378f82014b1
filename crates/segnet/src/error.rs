//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use segnet_config::ConfigError;
use segnet_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const STORE: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Topology document ────────────────────────────────────────────
    #[error("No topology document given")]
    #[diagnostic(
        code(segnet::no_topology),
        help(
            "Pass one with --file, set SEGNET_FILE, or set default_file in\n\
             {config_path}"
        )
    )]
    NoTopology { config_path: String },

    #[error("Could not read topology document {path}")]
    #[diagnostic(
        code(segnet::document),
        help("Supported formats: .json, .yaml/.yml, .toml")
    )]
    Document {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unsupported document format '{extension}'")]
    #[diagnostic(
        code(segnet::document_format),
        help("Use a .json, .yaml/.yml or .toml file")
    )]
    UnsupportedFormat { extension: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(segnet::not_found),
        help("Run: segnet {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{reason}")]
    #[diagnostic(code(segnet::conflict))]
    Conflict { reason: String },

    // ── Store ────────────────────────────────────────────────────────
    #[error("Topology store unavailable: {reason}")]
    #[diagnostic(code(segnet::store))]
    Store { reason: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(segnet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file already exists at {path}")]
    #[diagnostic(
        code(segnet::config_exists),
        help("Use --force to overwrite it")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(
        code(segnet::config),
        help("Check the config file (segnet config path) and SEGNET_* variables")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(segnet::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::Store { .. } => exit_code::STORE,
            Self::NoTopology { .. }
            | Self::UnsupportedFormat { .. }
            | Self::Validation { .. } => exit_code::USAGE,
            Self::Document { .. } | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput { field, reason } => {
                if reason.contains("already in use") {
                    CliError::Conflict {
                        reason: format!("{field}: {reason}"),
                    }
                } else {
                    CliError::Validation { field, reason }
                }
            }

            CoreError::TopologyNotFound { identifier } => CliError::NotFound {
                resource_type: "topology".into(),
                identifier,
                list_command: "topology show".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            CoreError::StoreUnavailable { reason } => CliError::Store { reason },
        }
    }
}

impl From<segnet_core::StoreError> for CliError {
    fn from(err: segnet_core::StoreError) -> Self {
        CoreError::from(err).into()
    }
}

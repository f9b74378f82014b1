//! Shared helpers for command handlers.

use std::path::{Path, PathBuf};

use segnet_core::{Endpoint, EntityId, MemoryStore, Node, Simulator, TopologyDocument};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Document formats ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(CliError::UnsupportedFormat { extension }),
        }
    }
}

fn document_error(path: &Path, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> CliError {
    CliError::Document {
        path: path.display().to_string(),
        source: source.into(),
    }
}

/// Read a topology document, picking the parser by file extension.
pub fn read_document(path: &Path) -> Result<TopologyDocument, CliError> {
    let format = DocumentFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(|e| document_error(path, e))?;
    match format {
        DocumentFormat::Json => serde_json::from_str(&contents).map_err(|e| document_error(path, e)),
        DocumentFormat::Yaml => serde_yaml::from_str(&contents).map_err(|e| document_error(path, e)),
        DocumentFormat::Toml => toml::from_str(&contents).map_err(|e| document_error(path, e)),
    }
}

/// Write a topology document in the format its extension names.
pub fn write_document(path: &Path, doc: &TopologyDocument) -> Result<(), CliError> {
    let rendered = match DocumentFormat::from_path(path)? {
        DocumentFormat::Json => serde_json::to_string_pretty(doc).map_err(|e| document_error(path, e))?,
        DocumentFormat::Yaml => serde_yaml::to_string(doc).map_err(|e| document_error(path, e))?,
        DocumentFormat::Toml => toml::to_string_pretty(doc).map_err(|e| document_error(path, e))?,
    };
    std::fs::write(path, rendered)?;
    Ok(())
}

// ── Session ─────────────────────────────────────────────────────────

/// One loaded topology document plus resolved output settings.
pub struct Session {
    pub path: PathBuf,
    pub topology: EntityId,
    pub simulator: Simulator<MemoryStore>,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Session {
    /// Load the topology document named by flags/config into a fresh store.
    pub fn open(global: &GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let path = config::topology_file(global, cfg)?;
        let format = config::output_format(global, cfg)?;
        let color = output::should_color(config::color_mode(global, cfg)?);

        let doc = read_document(&path)?;
        let store = MemoryStore::new();
        let topology = store.import(doc, &cfg.import_defaults()?)?;
        tracing::debug!(path = %path.display(), %topology, "loaded topology document");

        Ok(Self {
            path,
            topology,
            simulator: Simulator::with_options(store, config::simulation_options(global, cfg)),
            format,
            color,
            quiet: global.quiet,
        })
    }

    pub fn store(&self) -> &MemoryStore {
        self.simulator.store()
    }

    /// Export the in-memory topology back to its document file.
    pub fn save(&self) -> Result<(), CliError> {
        let doc = self.store().export(&self.topology)?;
        write_document(&self.path, &doc)?;
        tracing::debug!(path = %self.path.display(), "wrote topology document");
        Ok(())
    }

    pub fn print(&self, rendered: &str) {
        output::print_output(rendered, self.quiet);
    }

    /// Status line on stderr, suppressed by `--quiet`.
    pub fn note(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

// ── Lookups ─────────────────────────────────────────────────────────

/// Parse a `kind:value` endpoint argument.
pub fn parse_endpoint(field: &str, raw: &str) -> Result<Endpoint, CliError> {
    raw.parse().map_err(|e: segnet_core::CoreError| CliError::Validation {
        field: field.into(),
        reason: e.to_string(),
    })
}

/// Resolve a firewall node by name.
pub fn resolve_firewall<'a>(nodes: &'a [Node], name: &str) -> Result<&'a Node, CliError> {
    nodes
        .iter()
        .find(|n| n.is_firewall() && n.name == name)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "firewall".into(),
            identifier: name.into(),
            list_command: "nodes list".into(),
        })
}

/// `-` placeholder for absent values in tables and detail views.
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

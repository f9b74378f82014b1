//! Clap derive structures for the `segnet` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled by `build.rs` for man page generation, so it must
//! only depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// segnet -- firewall policy flow simulator
#[derive(Debug, Parser)]
#[command(
    name = "segnet",
    version,
    about = "Simulate firewall policy decisions for modeled network topologies",
    long_about = "Evaluates flow scenarios against the firewall rules of a topology\n\
        document and checks its subnet/VLAN segmentation.\n\n\
        The most specific matching rule decides each flow; traffic no rule\n\
        covers is allowed by default.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Topology document (.json, .yaml/.yml or .toml)
    #[arg(long, short = 'f', env = "SEGNET_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "SEGNET_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Ranking of equally specific rules (overrides config)
    #[arg(long, env = "SEGNET_TIE_BREAK", global = true)]
    pub tie_break: Option<TieBreakArg>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TieBreakArg {
    /// First rule in document order wins
    StoreOrder,
    /// Rule with the lowest id wins
    LowestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Allow,
    Deny,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the loaded topology
    #[command(alias = "topo")]
    Topology(TopologyArgs),

    /// List topology nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// List links between nodes
    Links(LinksArgs),

    /// Manage firewall rules
    #[command(alias = "r")]
    Rules(RulesArgs),

    /// Manage flow scenarios
    #[command(alias = "sc")]
    Scenarios(ScenariosArgs),

    /// Evaluate every scenario against the rules
    #[command(alias = "sim")]
    Simulate(SimulateArgs),

    /// Check subnet and VLAN segmentation
    #[command(alias = "seg")]
    Segmentation,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOPOLOGY / NODES / LINKS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TopologyArgs {
    #[command(subcommand)]
    pub command: TopologyCommand,
}

#[derive(Debug, Subcommand)]
pub enum TopologyCommand {
    /// Name, description and entity counts
    Show,
}

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List all nodes
    #[command(alias = "ls")]
    List {
        /// Only nodes in this zone
        #[arg(long, short = 'z')]
        zone: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct LinksArgs {
    #[command(subcommand)]
    pub command: LinksCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinksCommand {
    /// List all links
    #[command(alias = "ls")]
    List,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// List rules
    #[command(alias = "ls")]
    List {
        /// Only rules owned by the firewall node with this name
        #[arg(long)]
        firewall: Option<String>,
    },

    /// Add a rule and write it back to the topology document
    Add(RuleAddArgs),
}

#[derive(Debug, Args)]
pub struct RuleAddArgs {
    /// Source endpoint: `zone:NAME`, `node:NAME`, or a bare zone name
    #[arg(long, short = 's')]
    pub source: String,

    /// Destination endpoint: `zone:NAME`, `node:NAME`, or a bare zone name
    #[arg(long, short = 'd')]
    pub destination: String,

    /// Service name (e.g. http, ssh)
    #[arg(long)]
    pub service: String,

    /// Protocol constraint (e.g. tcp)
    #[arg(long)]
    pub protocol: Option<String>,

    /// Port constraint
    #[arg(long)]
    pub port: Option<u16>,

    /// Rule action
    #[arg(long, short = 'a', value_enum)]
    pub action: ActionArg,

    /// Name of the owning firewall node
    #[arg(long)]
    pub firewall: Option<String>,

    /// Explicit numeric rule id
    #[arg(long)]
    pub id: Option<u64>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SCENARIOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ScenariosArgs {
    #[command(subcommand)]
    pub command: ScenariosCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScenariosCommand {
    /// List scenarios with their last recorded result
    #[command(alias = "ls")]
    List,

    /// Add a pending scenario and write it back to the topology document
    Add(ScenarioAddArgs),
}

#[derive(Debug, Args)]
pub struct ScenarioAddArgs {
    /// Source endpoint: `zone:NAME`, `node:NAME`, or a bare zone name
    #[arg(long, short = 's')]
    pub source: String,

    /// Destination endpoint: `zone:NAME`, `node:NAME`, or a bare zone name
    #[arg(long, short = 'd')]
    pub destination: String,

    /// Service name (e.g. http, ssh)
    #[arg(long)]
    pub service: String,

    /// Protocol used by the flow
    #[arg(long)]
    pub protocol: Option<String>,

    /// Destination port used by the flow
    #[arg(long)]
    pub port: Option<u16>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SIMULATE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Store results and details back into the topology document
    #[arg(long, short = 'w')]
    pub write: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

//! Policy-matching flow simulation for modeled network topologies.
//!
//! This crate owns the domain model and decision logic behind the `segnet`
//! CLI:
//!
//! - **[`Simulator`]**: Facade over a [`TopologyStore`]. [`simulate()`](Simulator::simulate)
//!   loads nodes, rules and scenarios, evaluates every scenario and persists
//!   the verdicts as one unit. [`analyze_segmentation()`](Simulator::analyze_segmentation)
//!   reports addressing problems without touching the store.
//!
//! - **Decision logic** ([`sim`]): Pure functions for zone resolution, best
//!   rule selection by specificity, fail-open flow evaluation and
//!   subnet/VLAN segmentation analysis.
//!
//! - **[`MemoryStore`]**: In-process store populated from a
//!   [`TopologyDocument`] and exported back to one.
//!
//! - **Domain model** ([`model`]): Nodes, links, rules, scenarios and
//!   findings, keyed by [`EntityId`] (numeric or named identifiers).

pub mod error;
pub mod model;
pub mod sim;
pub mod simulator;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use sim::TieBreak;
pub use simulator::{SimulationOptions, SimulationReport, Simulator};
pub use store::{ImportDefaults, MemoryStore, StoreError, TopologyStore};

pub use model::{
    Endpoint, EndpointKind, EntityId, FlowResult, FlowScenario, IssueKind, Link, LinkSpec, Node,
    NodeSpec, Position, Rule, RuleAction, RuleSpec, ScenarioSpec, ScenarioVerdict,
    SegmentationIssue, Severity, Topology, TopologyDocument, TopologySummary, Traffic,
};

// ── Domain model ──
//
// Canonical types shared by the simulator, the stores and the CLI.

pub mod document;
pub mod entity_id;
pub mod policy;
pub mod scenario;
pub mod segmentation;
pub mod topology;

pub use document::{LinkSpec, NodeSpec, RuleSpec, ScenarioSpec, TopologyDocument};
pub use entity_id::EntityId;
pub use policy::{Endpoint, EndpointKind, Rule, RuleAction, Traffic};
pub use scenario::{FlowResult, FlowScenario, ScenarioVerdict};
pub use segmentation::{IssueKind, SegmentationIssue, Severity};
pub use topology::{FIREWALL_NODE_TYPE, Link, Node, Position, Topology, TopologySummary};

// ── Topology domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// Node type that marks a node as a firewall able to own rules.
pub const FIREWALL_NODE_TYPE: &str = "firewall";

/// A modeled network topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Listing view of a topology (no owned collections).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySummary {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub node_count: usize,
    pub rule_count: usize,
    pub scenario_count: usize,
}

/// Canvas position. Layout only, never read by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node of the topology: router, firewall, server, workstation...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    /// Unique within a topology; rules and scenarios refer to nodes by name.
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub zone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i64>,
    #[serde(default)]
    pub position: Position,
}

impl Node {
    pub fn is_firewall(&self) -> bool {
        self.node_type.eq_ignore_ascii_case(FIREWALL_NODE_TYPE)
    }

    /// Subnet with surrounding whitespace removed; blank counts as undefined.
    pub fn trimmed_subnet(&self) -> Option<&str> {
        self.subnet
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Physical or logical link between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: EntityId,
    pub source: EntityId,
    pub target: EntityId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(node_type: &str, subnet: Option<&str>) -> Node {
        Node {
            id: EntityId::from(1),
            name: "n".into(),
            node_type: node_type.into(),
            zone: "interna".into(),
            subnet: subnet.map(Into::into),
            vlan: None,
            position: Position::default(),
        }
    }

    #[test]
    fn firewall_type_is_case_insensitive() {
        assert!(node("Firewall", None).is_firewall());
        assert!(!node("router", None).is_firewall());
    }

    #[test]
    fn blank_subnet_is_undefined() {
        assert_eq!(node("server", Some("   ")).trimmed_subnet(), None);
        assert_eq!(
            node("server", Some(" 10.0.0.0/24 ")).trimmed_subnet(),
            Some("10.0.0.0/24")
        );
    }
}

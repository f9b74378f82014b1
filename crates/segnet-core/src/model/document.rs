// ── Topology documents ──
//
// Serialized form of a whole topology as an editor exports it. Node ids
// in a document are client-side ids: links and rule firewall references
// point at them, and import translates them into store ids.

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::policy::{Endpoint, RuleAction, Traffic};
use super::scenario::FlowResult;
use super::topology::Position;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyDocument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub scenarios: Vec<ScenarioSpec>,
}

/// Node as drawn in an editor. Every field except the position may be left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<i64>,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: EntityId,
    pub target: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(flatten)]
    pub traffic: Traffic,
    pub action: RuleAction,
    /// Client-side id of the owning firewall node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(flatten)]
    pub traffic: Traffic,
    #[serde(default)]
    pub result: FlowResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::EndpointKind;

    #[test]
    fn minimal_document_deserializes() {
        let doc: TopologyDocument = serde_json::from_str(
            r#"{
                "name": "lab",
                "nodes": [{"id": "a", "name": "R1", "type": "router", "zone": "interna"}],
                "links": [{"source": "a", "target": "b"}],
                "scenarios": [{
                    "source": {"kind": "node", "value": "R1"},
                    "destination": {"kind": "zone", "value": "dmz"},
                    "service": "http"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(doc.nodes[0].node_type.as_deref(), Some("router"));
        assert_eq!(doc.nodes[0].position, Position::default());
        assert_eq!(doc.links[0].target, EntityId::from("b"));
        assert!(doc.rules.is_empty());
        assert_eq!(doc.scenarios[0].result, FlowResult::Pending);
        assert_eq!(doc.scenarios[0].source.kind, EndpointKind::Node);
    }
}

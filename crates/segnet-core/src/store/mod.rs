// ── Topology store boundary ──
//
// The core never owns persistence. Everything it reads or writes goes
// through `TopologyStore`; `MemoryStore` is the bundled implementation.

mod memory;

pub use memory::{ImportDefaults, MemoryStore};

use thiserror::Error;

use crate::model::{EntityId, FlowScenario, Node, Rule, ScenarioVerdict};

/// Failure reported by a store implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("topology {id} does not exist")]
    TopologyNotFound { id: EntityId },

    #[error("{entity_type} {id} does not exist")]
    UnknownEntity {
        entity_type: &'static str,
        id: EntityId,
    },

    #[error("{entity_type} id {id} is already taken")]
    DuplicateId {
        entity_type: &'static str,
        id: EntityId,
    },

    #[error("{reason}")]
    Unavailable { reason: String },
}

/// Entity store consumed by the simulator.
///
/// Listings must come back in a stable order: the default tie-break
/// between equally specific rules is "first returned wins".
pub trait TopologyStore: Send + Sync {
    fn list_nodes(&self, topology: &EntityId) -> Result<Vec<Node>, StoreError>;

    /// Rules of a topology, optionally restricted to one owning firewall node.
    fn list_rules(
        &self,
        topology: &EntityId,
        firewall: Option<&EntityId>,
    ) -> Result<Vec<Rule>, StoreError>;

    fn list_scenarios(&self, topology: &EntityId) -> Result<Vec<FlowScenario>, StoreError>;

    /// Persist a whole run. Either every verdict is stored or none is.
    fn save_scenario_results(
        &self,
        topology: &EntityId,
        verdicts: &[ScenarioVerdict],
    ) -> Result<(), StoreError>;
}

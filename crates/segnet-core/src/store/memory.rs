// ── In-memory topology store ──
//
// Concurrent storage for whole topologies. Each topology lives in one
// `DashMap` entry, so every mutation of a topology (including saving a
// simulation run) happens under that entry's shard lock and is atomic
// with respect to readers of the same topology.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use super::{StoreError, TopologyStore};
use crate::model::{
    EntityId, FlowResult, FlowScenario, Link, LinkSpec, Node, NodeSpec, Rule, RuleSpec,
    ScenarioSpec, ScenarioVerdict, Topology, TopologyDocument, TopologySummary,
};

/// Values used for node fields a document leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDefaults {
    pub node_name: String,
    pub node_type: String,
    pub zone: String,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            node_name: "unnamed node".into(),
            node_type: "unknown".into(),
            zone: "interna".into(),
        }
    }
}

#[derive(Debug, Clone)]
struct TopologyRecord {
    topology: Topology,
    nodes: Vec<Node>,
    links: Vec<Link>,
    rules: Vec<Rule>,
    scenarios: Vec<FlowScenario>,
}

impl TopologyRecord {
    fn summary(&self) -> TopologySummary {
        TopologySummary {
            id: self.topology.id.clone(),
            name: self.topology.name.clone(),
            description: self.topology.description.clone(),
            created_at: self.topology.created_at,
            node_count: self.nodes.len(),
            rule_count: self.rules.len(),
            scenario_count: self.scenarios.len(),
        }
    }

    fn has_node(&self, id: &EntityId) -> bool {
        self.nodes.iter().any(|n| n.id == *id)
    }
}

/// Auto-increment counter for one entity table.
#[derive(Debug, Default)]
struct Sequence(AtomicU64);

impl Sequence {
    fn next(&self) -> EntityId {
        EntityId::Numeric(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Make sure later `next()` calls never hand out `id` again.
    fn reserve(&self, id: Option<&EntityId>) {
        if let Some(n) = id.and_then(EntityId::as_numeric) {
            self.0.fetch_max(n, Ordering::Relaxed);
        }
    }
}

#[derive(Debug, Default)]
struct Sequences {
    topology: Sequence,
    node: Sequence,
    link: Sequence,
    rule: Sequence,
    scenario: Sequence,
}

/// Thread-safe topology store backed by `DashMap`.
///
/// Listings keep insertion order. Rule and scenario ids given explicitly
/// (numeric only) are kept; everything else gets the next id of its table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    topologies: DashMap<EntityId, TopologyRecord>,
    seq: Sequences,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Import / export ──────────────────────────────────────────────

    /// Create a topology from a document and return its id.
    ///
    /// Document node ids are translated to store ids. Links naming an
    /// unknown node are skipped; so are firewall references that do not
    /// name a node of the document.
    pub fn import(
        &self,
        doc: TopologyDocument,
        defaults: &ImportDefaults,
    ) -> Result<EntityId, StoreError> {
        let topology_id = self.seq.topology.next();
        let mut client_to_store: HashMap<EntityId, EntityId> = HashMap::new();

        let mut nodes = Vec::with_capacity(doc.nodes.len());
        for spec in doc.nodes {
            let id = self.seq.node.next();
            if let Some(client_id) = spec.id.clone() {
                client_to_store.insert(client_id, id.clone());
            }
            nodes.push(node_from_spec(id, spec, defaults));
        }
        warn_duplicate_names(&topology_id, &nodes);

        let mut links = Vec::with_capacity(doc.links.len());
        for LinkSpec { source, target } in doc.links {
            match (client_to_store.get(&source), client_to_store.get(&target)) {
                (Some(s), Some(t)) => links.push(Link {
                    id: self.seq.link.next(),
                    source: s.clone(),
                    target: t.clone(),
                }),
                _ => debug!(%source, %target, "skipping link to unknown node"),
            }
        }

        let rules = doc
            .rules
            .into_iter()
            .map(|mut spec| {
                spec.firewall = spec.firewall.and_then(|client_id| {
                    let mapped = client_to_store.get(&client_id).cloned();
                    if mapped.is_none() {
                        warn!(firewall = %client_id, "rule firewall does not name a node; dropping it");
                    }
                    mapped
                });
                spec
            })
            .collect::<Vec<_>>();

        let mut record = TopologyRecord {
            topology: Topology {
                id: topology_id.clone(),
                name: doc.name,
                description: doc.description,
                author: doc.author,
                created_at: Utc::now(),
            },
            nodes,
            links,
            rules: Vec::new(),
            scenarios: Vec::new(),
        };

        for spec in &rules {
            self.seq.rule.reserve(spec.id.as_ref());
        }
        for spec in &doc.scenarios {
            self.seq.scenario.reserve(spec.id.as_ref());
        }
        for spec in rules {
            self.push_rule(&mut record, spec)?;
        }
        for spec in doc.scenarios {
            self.push_scenario(&mut record, spec)?;
        }

        debug!(
            topology = %topology_id,
            nodes = record.nodes.len(),
            links = record.links.len(),
            rules = record.rules.len(),
            scenarios = record.scenarios.len(),
            "imported topology"
        );
        self.topologies.insert(topology_id.clone(), record);
        Ok(topology_id)
    }

    /// Serialize a stored topology back into a document (store ids as client ids).
    pub fn export(&self, topology: &EntityId) -> Result<TopologyDocument, StoreError> {
        let record = self.record(topology)?;
        Ok(TopologyDocument {
            name: record.topology.name.clone(),
            description: record.topology.description.clone(),
            author: record.topology.author.clone(),
            nodes: record
                .nodes
                .iter()
                .map(|n| NodeSpec {
                    id: Some(n.id.clone()),
                    name: Some(n.name.clone()),
                    node_type: Some(n.node_type.clone()),
                    zone: Some(n.zone.clone()),
                    subnet: n.subnet.clone(),
                    vlan: n.vlan,
                    position: n.position,
                })
                .collect(),
            links: record
                .links
                .iter()
                .map(|l| LinkSpec {
                    source: l.source.clone(),
                    target: l.target.clone(),
                })
                .collect(),
            rules: record
                .rules
                .iter()
                .map(|r| RuleSpec {
                    id: Some(r.id.clone()),
                    source: r.source.clone(),
                    destination: r.destination.clone(),
                    traffic: r.traffic.clone(),
                    action: r.action,
                    firewall: r.firewall_id.clone(),
                    description: r.description.clone(),
                })
                .collect(),
            scenarios: record
                .scenarios
                .iter()
                .map(|s| ScenarioSpec {
                    id: Some(s.id.clone()),
                    source: s.source.clone(),
                    destination: s.destination.clone(),
                    traffic: s.traffic.clone(),
                    result: s.result,
                    detail: s.detail.clone(),
                })
                .collect(),
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn topology(&self, id: &EntityId) -> Result<Topology, StoreError> {
        Ok(self.record(id)?.topology.clone())
    }

    /// All topologies, newest first.
    pub fn list_topologies(&self) -> Vec<TopologySummary> {
        let mut summaries: Vec<TopologySummary> =
            self.topologies.iter().map(|r| r.value().summary()).collect();
        summaries.sort_by(|a, b| b.id.cmp(&a.id));
        summaries
    }

    pub fn list_links(&self, topology: &EntityId) -> Result<Vec<Link>, StoreError> {
        Ok(self.record(topology)?.links.clone())
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Add a rule. `spec.firewall` must be a node id of this topology.
    pub fn add_rule(&self, topology: &EntityId, spec: RuleSpec) -> Result<EntityId, StoreError> {
        let mut record = self.record_mut(topology)?;
        if let Some(firewall) = &spec.firewall {
            if !record.has_node(firewall) {
                return Err(StoreError::UnknownEntity {
                    entity_type: "node",
                    id: firewall.clone(),
                });
            }
        }
        self.seq.rule.reserve(spec.id.as_ref());
        self.push_rule(&mut record, spec)
    }

    /// Add a scenario. It always starts out pending.
    pub fn add_scenario(
        &self,
        topology: &EntityId,
        spec: ScenarioSpec,
    ) -> Result<EntityId, StoreError> {
        let mut record = self.record_mut(topology)?;
        self.seq.scenario.reserve(spec.id.as_ref());
        self.push_scenario(
            &mut record,
            ScenarioSpec {
                result: FlowResult::Pending,
                detail: None,
                ..spec
            },
        )
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn record(
        &self,
        id: &EntityId,
    ) -> Result<dashmap::mapref::one::Ref<'_, EntityId, TopologyRecord>, StoreError> {
        self.topologies
            .get(id)
            .ok_or_else(|| StoreError::TopologyNotFound { id: id.clone() })
    }

    fn record_mut(
        &self,
        id: &EntityId,
    ) -> Result<dashmap::mapref::one::RefMut<'_, EntityId, TopologyRecord>, StoreError> {
        self.topologies
            .get_mut(id)
            .ok_or_else(|| StoreError::TopologyNotFound { id: id.clone() })
    }

    fn push_rule(
        &self,
        record: &mut TopologyRecord,
        spec: RuleSpec,
    ) -> Result<EntityId, StoreError> {
        let id = assign(&self.seq.rule, spec.id, "rule", |id| {
            record.rules.iter().any(|r| r.id == *id)
        })?;
        record.rules.push(Rule {
            id: id.clone(),
            source: spec.source,
            destination: spec.destination,
            traffic: spec.traffic,
            action: spec.action,
            firewall_id: spec.firewall,
            description: spec.description,
        });
        Ok(id)
    }

    fn push_scenario(
        &self,
        record: &mut TopologyRecord,
        spec: ScenarioSpec,
    ) -> Result<EntityId, StoreError> {
        let id = assign(&self.seq.scenario, spec.id, "scenario", |id| {
            record.scenarios.iter().any(|s| s.id == *id)
        })?;
        record.scenarios.push(FlowScenario {
            id: id.clone(),
            source: spec.source,
            destination: spec.destination,
            traffic: spec.traffic,
            result: spec.result,
            detail: spec.detail,
        });
        Ok(id)
    }
}

/// Keep an explicit numeric id unless taken; otherwise draw from `seq`.
fn assign(
    seq: &Sequence,
    requested: Option<EntityId>,
    entity_type: &'static str,
    taken: impl Fn(&EntityId) -> bool,
) -> Result<EntityId, StoreError> {
    match requested {
        Some(id @ EntityId::Numeric(_)) => {
            if taken(&id) {
                return Err(StoreError::DuplicateId { entity_type, id });
            }
            Ok(id)
        }
        Some(EntityId::Named(name)) => {
            debug!(entity_type, %name, "ignoring non-numeric id");
            Ok(seq.next())
        }
        None => Ok(seq.next()),
    }
}

fn node_from_spec(id: EntityId, spec: NodeSpec, defaults: &ImportDefaults) -> Node {
    fn or_default(value: Option<String>, default: &str) -> String {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_owned())
    }

    Node {
        id,
        name: or_default(spec.name, &defaults.node_name),
        node_type: or_default(spec.node_type, &defaults.node_type),
        zone: or_default(spec.zone, &defaults.zone),
        subnet: spec.subnet,
        vlan: spec.vlan,
        position: spec.position,
    }
}

fn warn_duplicate_names(topology: &EntityId, nodes: &[Node]) {
    let mut seen = HashSet::new();
    for node in nodes {
        if !seen.insert(node.name.as_str()) {
            warn!(
                %topology,
                name = %node.name,
                "duplicate node name; zone lookups use the first node with this name"
            );
        }
    }
}

impl TopologyStore for MemoryStore {
    fn list_nodes(&self, topology: &EntityId) -> Result<Vec<Node>, StoreError> {
        Ok(self.record(topology)?.nodes.clone())
    }

    fn list_rules(
        &self,
        topology: &EntityId,
        firewall: Option<&EntityId>,
    ) -> Result<Vec<Rule>, StoreError> {
        let record = self.record(topology)?;
        Ok(record
            .rules
            .iter()
            .filter(|r| firewall.is_none_or(|f| r.firewall_id.as_ref() == Some(f)))
            .cloned()
            .collect())
    }

    fn list_scenarios(&self, topology: &EntityId) -> Result<Vec<FlowScenario>, StoreError> {
        Ok(self.record(topology)?.scenarios.clone())
    }

    fn save_scenario_results(
        &self,
        topology: &EntityId,
        verdicts: &[ScenarioVerdict],
    ) -> Result<(), StoreError> {
        let mut record = self.record_mut(topology)?;

        let known: HashSet<&EntityId> = record.scenarios.iter().map(|s| &s.id).collect();
        if let Some(missing) = verdicts.iter().find(|v| !known.contains(&v.scenario_id)) {
            return Err(StoreError::UnknownEntity {
                entity_type: "scenario",
                id: missing.scenario_id.clone(),
            });
        }

        let by_id: HashMap<&EntityId, &ScenarioVerdict> =
            verdicts.iter().map(|v| (&v.scenario_id, v)).collect();
        for scenario in &mut record.scenarios {
            if let Some(verdict) = by_id.get(&scenario.id) {
                scenario.apply(verdict);
            }
        }
        Ok(())
    }
}

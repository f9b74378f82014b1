// ── Simulator facade ──
//
// Connects the pure decision logic to a `TopologyStore`: load, validate,
// evaluate, then persist in one explicit call. Runs on the same topology
// are serialized; runs on different topologies proceed independently.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{EntityId, FlowResult, ScenarioVerdict, SegmentationIssue};
use crate::sim::{TieBreak, analyze, evaluate};
use crate::store::TopologyStore;

/// Knobs for a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOptions {
    pub tie_break: TieBreak,
}

/// Outcome of one `simulate` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub topology_id: EntityId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub verdicts: Vec<ScenarioVerdict>,
}

impl SimulationReport {
    pub fn count(&self, result: FlowResult) -> usize {
        self.verdicts.iter().filter(|v| v.result == result).count()
    }
}

/// Runs simulations and segmentation analysis against a store.
pub struct Simulator<S> {
    store: S,
    options: SimulationOptions,
    run_locks: DashMap<EntityId, Arc<Mutex<()>>>,
}

impl<S: TopologyStore> Simulator<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, SimulationOptions::default())
    }

    pub fn with_options(store: S, options: SimulationOptions) -> Self {
        Self {
            store,
            options,
            run_locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> SimulationOptions {
        self.options
    }

    /// Evaluate every scenario of `topology` and persist the verdicts.
    ///
    /// Nothing is written unless every scenario was evaluated; a failing
    /// save leaves the stored results as they were.
    pub fn simulate(&self, topology: &EntityId) -> Result<SimulationReport, CoreError> {
        let lock = self.run_lock(topology);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let run_id = Uuid::new_v4();
        let span = info_span!("simulate", %run_id, %topology);
        let _entered = span.enter();
        let started_at = Utc::now();

        let nodes = self.store.list_nodes(topology)?;
        let rules = self.store.list_rules(topology, None)?;
        let scenarios = self.store.list_scenarios(topology)?;
        debug!(
            nodes = nodes.len(),
            rules = rules.len(),
            scenarios = scenarios.len(),
            tie_break = %self.options.tie_break,
            "loaded topology"
        );

        for rule in &rules {
            rule.validate()?;
        }
        for scenario in &scenarios {
            scenario.validate()?;
        }

        let verdicts = evaluate(&scenarios, &rules, &nodes, self.options.tie_break);
        self.store.save_scenario_results(topology, &verdicts)?;

        let report = SimulationReport {
            run_id,
            topology_id: topology.clone(),
            started_at,
            finished_at: Utc::now(),
            verdicts,
        };
        info!(
            scenarios = report.verdicts.len(),
            allowed = report.count(FlowResult::Allowed),
            blocked = report.count(FlowResult::Blocked),
            "simulation complete"
        );
        Ok(report)
    }

    /// Segmentation findings for the nodes of `topology`.
    pub fn analyze_segmentation(
        &self,
        topology: &EntityId,
    ) -> Result<Vec<SegmentationIssue>, CoreError> {
        let nodes = self.store.list_nodes(topology)?;
        let issues = analyze(&nodes);
        debug!(%topology, nodes = nodes.len(), issues = issues.len(), "analyzed segmentation");
        Ok(issues)
    }

    fn run_lock(&self, topology: &EntityId) -> Arc<Mutex<()>> {
        Arc::clone(&self.run_locks.entry(topology.clone()).or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{
        Endpoint, FlowScenario, IssueKind, Node, NodeSpec, Rule, RuleAction, RuleSpec,
        ScenarioSpec, TopologyDocument, Traffic,
    };
    use crate::store::{ImportDefaults, MemoryStore, StoreError};

    fn traffic(service: &str) -> Traffic {
        Traffic {
            service: service.into(),
            ..Traffic::default()
        }
    }

    fn node(name: &str, zone: &str, subnet: &str) -> NodeSpec {
        NodeSpec {
            id: Some(EntityId::from(name)),
            name: Some(name.into()),
            node_type: Some("server".into()),
            zone: Some(zone.into()),
            subnet: Some(subnet.into()),
            vlan: Some(10),
            ..NodeSpec::default()
        }
    }

    fn scenario(source: Endpoint, destination: Endpoint, service: &str) -> ScenarioSpec {
        ScenarioSpec {
            id: None,
            source,
            destination,
            traffic: traffic(service),
            result: FlowResult::Pending,
            detail: None,
        }
    }

    fn lab() -> TopologyDocument {
        TopologyDocument {
            name: "lab".into(),
            nodes: vec![
                node("A", "interna", "10.0.0.0/24"),
                node("B", "dmz", "10.0.0.0/24"),
            ],
            rules: vec![RuleSpec {
                id: None,
                source: Endpoint::node("A"),
                destination: Endpoint::node("B"),
                traffic: traffic("http"),
                action: RuleAction::Deny,
                firewall: None,
                description: None,
            }],
            scenarios: vec![
                scenario(Endpoint::node("A"), Endpoint::node("B"), "http"),
                scenario(Endpoint::zone("interna"), Endpoint::zone("dmz"), "custom-proto"),
            ],
            ..TopologyDocument::default()
        }
    }

    fn simulator() -> (Simulator<MemoryStore>, EntityId) {
        let store = MemoryStore::new();
        let topo = store.import(lab(), &ImportDefaults::default()).unwrap();
        (Simulator::new(store), topo)
    }

    #[test]
    fn simulate_persists_verdicts() {
        let (sim, topo) = simulator();
        let report = sim.simulate(&topo).unwrap();

        assert_eq!(report.count(FlowResult::Blocked), 1);
        assert_eq!(report.count(FlowResult::Allowed), 1);

        let stored = sim.store().list_scenarios(&topo).unwrap();
        assert_eq!(stored[0].result, FlowResult::Blocked);
        assert_eq!(stored[1].result, FlowResult::Allowed);
        assert!(stored[1].detail.as_deref().unwrap().contains("default"));
    }

    #[test]
    fn simulate_is_idempotent() {
        let (sim, topo) = simulator();
        let first = sim.simulate(&topo).unwrap();
        let second = sim.simulate(&topo).unwrap();

        assert_eq!(first.verdicts, second.verdicts);
        assert_ne!(first.run_id, second.run_id);
    }

    #[test]
    fn concurrent_runs_on_one_topology_agree() {
        let (sim, topo) = simulator();
        let reports: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| sim.simulate(&topo).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        for report in &reports {
            assert_eq!(report.verdicts, reports[0].verdicts);
        }
    }

    #[test]
    fn analyze_segmentation_reads_nodes_only() {
        let (sim, topo) = simulator();
        let issues = sim.analyze_segmentation(&topo).unwrap();

        let kinds: Vec<_> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![IssueKind::SubnetSharedAcrossZones, IssueKind::VlanSharedAcrossZones]
        );
    }

    #[test]
    fn unknown_topology_is_not_found() {
        let (sim, _) = simulator();
        let err = sim.simulate(&EntityId::from(99)).unwrap_err();
        assert!(matches!(err, CoreError::TopologyNotFound { .. }));
    }

    #[test]
    fn blank_service_is_invalid_input_and_nothing_is_saved() {
        let (sim, topo) = simulator();
        sim.store()
            .add_scenario(&topo, scenario(Endpoint::zone("dmz"), Endpoint::zone("interna"), " "))
            .unwrap();

        let err = sim.simulate(&topo).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
        let stored = sim.store().list_scenarios(&topo).unwrap();
        assert!(stored.iter().all(|s| s.result == FlowResult::Pending));
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore(MemoryStore);

    impl TopologyStore for ReadOnlyStore {
        fn list_nodes(&self, topology: &EntityId) -> Result<Vec<Node>, StoreError> {
            self.0.list_nodes(topology)
        }

        fn list_rules(
            &self,
            topology: &EntityId,
            firewall: Option<&EntityId>,
        ) -> Result<Vec<Rule>, StoreError> {
            self.0.list_rules(topology, firewall)
        }

        fn list_scenarios(&self, topology: &EntityId) -> Result<Vec<FlowScenario>, StoreError> {
            self.0.list_scenarios(topology)
        }

        fn save_scenario_results(
            &self,
            _topology: &EntityId,
            _verdicts: &[ScenarioVerdict],
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable {
                reason: "database is read-only".into(),
            })
        }
    }

    #[test]
    fn store_failures_surface_as_store_unavailable() {
        let store = MemoryStore::new();
        let topo = store.import(lab(), &ImportDefaults::default()).unwrap();
        let sim = Simulator::new(ReadOnlyStore(store));

        let err = sim.simulate(&topo).unwrap_err();
        assert!(matches!(err, CoreError::StoreUnavailable { .. }));
        assert!(err.to_string().contains("read-only"));

        let stored = sim.store().0.list_scenarios(&topo).unwrap();
        assert!(stored.iter().all(|s| s.result == FlowResult::Pending));
    }

    fn ties() -> TopologyDocument {
        let rule = |id: u64, action| RuleSpec {
            id: Some(EntityId::from(id)),
            source: Endpoint::zone("interna"),
            destination: Endpoint::zone("dmz"),
            traffic: traffic("ftp"),
            action,
            firewall: None,
            description: None,
        };
        TopologyDocument {
            name: "ties".into(),
            rules: vec![rule(9, RuleAction::Allow), rule(4, RuleAction::Deny)],
            scenarios: vec![scenario(Endpoint::zone("interna"), Endpoint::zone("dmz"), "ftp")],
            ..TopologyDocument::default()
        }
    }

    #[test]
    fn lowest_id_option_changes_tie_break() {
        let store = MemoryStore::new();
        let topo = store.import(ties(), &ImportDefaults::default()).unwrap();
        let sim = Simulator::new(store);
        assert_eq!(sim.simulate(&topo).unwrap().verdicts[0].result, FlowResult::Allowed);

        let store = MemoryStore::new();
        let topo = store.import(ties(), &ImportDefaults::default()).unwrap();
        let sim = Simulator::with_options(
            store,
            SimulationOptions {
                tie_break: TieBreak::LowestId,
            },
        );
        assert_eq!(sim.simulate(&topo).unwrap().verdicts[0].result, FlowResult::Blocked);
    }
}

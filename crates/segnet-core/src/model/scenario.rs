// ── Flow scenario domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::EntityId;
use super::policy::{Endpoint, Traffic, validate_selector};
use crate::error::CoreError;

/// Outcome of the last simulation run for a scenario.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FlowResult {
    #[default]
    Pending,
    Allowed,
    Blocked,
}

/// A hypothetical traffic flow to classify as allowed or blocked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowScenario {
    pub id: EntityId,
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(flatten)]
    pub traffic: Traffic,
    #[serde(default)]
    pub result: FlowResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FlowScenario {
    /// New scenario in the `pending` state.
    pub fn pending(id: EntityId, source: Endpoint, destination: Endpoint, traffic: Traffic) -> Self {
        Self {
            id,
            source,
            destination,
            traffic,
            result: FlowResult::Pending,
            detail: None,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_selector(
            &format!("scenario #{}", self.id),
            &self.source,
            &self.destination,
            &self.traffic,
        )
    }

    /// Record the verdict of a simulation run.
    pub fn apply(&mut self, verdict: &ScenarioVerdict) {
        self.result = verdict.result;
        self.detail = Some(verdict.detail.clone());
    }
}

/// Immutable result of evaluating one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioVerdict {
    pub scenario_id: EntityId,
    pub result: FlowResult,
    pub detail: String,
    /// Rule that decided the verdict; `None` for the default allow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<EntityId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scenarios_are_pending() {
        let s = FlowScenario::pending(
            EntityId::from(1),
            Endpoint::zone("externa"),
            Endpoint::node("web"),
            Traffic {
                service: "https".into(),
                ..Traffic::default()
            },
        );
        assert_eq!(s.result, FlowResult::Pending);
        assert!(s.detail.is_none());
    }

    #[test]
    fn apply_records_result_and_detail() {
        let mut s = FlowScenario::pending(
            EntityId::from(1),
            Endpoint::zone("externa"),
            Endpoint::node("web"),
            Traffic {
                service: "https".into(),
                ..Traffic::default()
            },
        );
        s.apply(&ScenarioVerdict {
            scenario_id: EntityId::from(1),
            result: FlowResult::Blocked,
            detail: "blocked".into(),
            rule_id: Some(EntityId::from(9)),
        });
        assert_eq!(s.result, FlowResult::Blocked);
        assert_eq!(s.detail.as_deref(), Some("blocked"));
    }

    #[test]
    fn result_renders_lowercase() {
        assert_eq!(FlowResult::Allowed.to_string(), "allowed");
        assert_eq!(FlowResult::Pending.as_ref(), "pending");
    }
}

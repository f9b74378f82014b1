// ── Flow evaluation ──
//
// Turns every scenario of a topology into a verdict. Scenarios are
// independent of each other: each one is judged only against the shared
// rule and node sets, so evaluation order never changes an outcome.

use tracing::{debug, warn};

use super::matcher::{TieBreak, match_best_rule, order_rules};
use crate::model::{
    EntityId, FlowResult, FlowScenario, Node, Rule, RuleAction, ScenarioVerdict,
};

/// Detail recorded when no rule applies. Unmatched traffic is allowed.
pub const DEFAULT_ALLOW_DETAIL: &str = "no applicable rule found: allowed by default";

/// Firewall phrase used when a rule's owning firewall is not in the topology.
const LOGICAL_FIREWALL: &str = "the logical firewall of the topology";

/// Evaluate all `scenarios` against `rules` and `nodes`.
///
/// Verdicts come back in scenario order. Inputs are not modified.
pub fn evaluate(
    scenarios: &[FlowScenario],
    rules: &[Rule],
    nodes: &[Node],
    tie_break: TieBreak,
) -> Vec<ScenarioVerdict> {
    let ordered = order_rules(rules, tie_break);
    scenarios
        .iter()
        .map(|scenario| {
            let verdict = evaluate_scenario(scenario, &ordered, nodes);
            debug!(
                scenario = %scenario.id,
                result = %verdict.result,
                rule = ?verdict.rule_id,
                "evaluated scenario"
            );
            verdict
        })
        .collect()
}

/// Verdict for a single scenario; `rules` are already in tie-break order.
pub fn evaluate_scenario(
    scenario: &FlowScenario,
    rules: &[&Rule],
    nodes: &[Node],
) -> ScenarioVerdict {
    let Some(rule) = match_best_rule(scenario, rules.iter().copied(), nodes) else {
        return ScenarioVerdict {
            scenario_id: scenario.id.clone(),
            result: FlowResult::Allowed,
            detail: DEFAULT_ALLOW_DETAIL.into(),
            rule_id: None,
        };
    };

    let result = match rule.action {
        RuleAction::Deny => FlowResult::Blocked,
        RuleAction::Allow => FlowResult::Allowed,
    };

    ScenarioVerdict {
        scenario_id: scenario.id.clone(),
        result,
        detail: describe_match(rule, result, nodes),
        rule_id: Some(rule.id.clone()),
    }
}

/// `blocked by rule #3 on firewall FW1 (zone interna -> node web)`
fn describe_match(rule: &Rule, result: FlowResult, nodes: &[Node]) -> String {
    let firewall = match &rule.firewall_id {
        None => String::new(),
        Some(id) => match firewall_name(id, nodes) {
            Some(name) => format!(" on firewall {name}"),
            None => {
                warn!(rule = %rule.id, firewall = %id, "rule references a firewall outside the topology");
                format!(" on {LOGICAL_FIREWALL}")
            }
        },
    };
    format!(
        "{result} by rule #{}{firewall} ({} -> {})",
        rule.id, rule.source, rule.destination
    )
}

fn firewall_name<'a>(id: &EntityId, nodes: &'a [Node]) -> Option<&'a str> {
    nodes
        .iter()
        .find(|n| n.is_firewall() && n.id == *id)
        .map(|n| n.name.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Endpoint;
    use crate::sim::fixtures::{node, node_of_type, rule, scenario};

    fn nodes() -> Vec<Node> {
        vec![
            node(1, "pc1", "interna"),
            node(2, "web", "dmz"),
            node_of_type(3, "FW1", "dmz", "firewall"),
            node_of_type(4, "R1", "interna", "router"),
        ]
    }

    #[test]
    fn exact_deny_rule_blocks() {
        let rules = [rule(5, Endpoint::node("pc1"), Endpoint::node("web"), "http", RuleAction::Deny)];
        let scenarios = [scenario(1, Endpoint::node("pc1"), Endpoint::node("web"), "http")];

        let verdicts = evaluate(&scenarios, &rules, &nodes(), TieBreak::StoreOrder);
        assert_eq!(verdicts[0].result, FlowResult::Blocked);
        assert_eq!(verdicts[0].rule_id, Some(EntityId::from(5)));
        assert_snapshot!(verdicts[0].detail.as_str(), @"blocked by rule #5 (node pc1 -> node web)");
    }

    #[test]
    fn allow_rule_allows_with_rule_detail() {
        let rules = [rule(2, Endpoint::zone("interna"), Endpoint::zone("dmz"), "https", RuleAction::Allow)];
        let scenarios = [scenario(1, Endpoint::node("pc1"), Endpoint::node("web"), "https")];

        let verdicts = evaluate(&scenarios, &rules, &nodes(), TieBreak::StoreOrder);
        assert_eq!(verdicts[0].result, FlowResult::Allowed);
        assert_snapshot!(verdicts[0].detail.as_str(), @"allowed by rule #2 (zone interna -> zone dmz)");
    }

    #[test]
    fn unmatched_traffic_fails_open() {
        let rules = [rule(2, Endpoint::zone("interna"), Endpoint::zone("dmz"), "https", RuleAction::Deny)];
        let scenarios = [scenario(1, Endpoint::zone("interna"), Endpoint::zone("dmz"), "custom-proto")];

        let verdicts = evaluate(&scenarios, &rules, &nodes(), TieBreak::StoreOrder);
        assert_eq!(
            verdicts,
            vec![ScenarioVerdict {
                scenario_id: EntityId::from(1),
                result: FlowResult::Allowed,
                detail: DEFAULT_ALLOW_DETAIL.into(),
                rule_id: None,
            }]
        );
        assert!(verdicts[0].detail.contains("default"));
    }

    #[test]
    fn owning_firewall_is_named() {
        let mut r = rule(8, Endpoint::zone("externa"), Endpoint::zone("dmz"), "ssh", RuleAction::Deny);
        r.firewall_id = Some(EntityId::from(3));
        let scenarios = [scenario(1, Endpoint::zone("externa"), Endpoint::node("web"), "ssh")];

        let verdicts = evaluate(&scenarios, &[r], &nodes(), TieBreak::StoreOrder);
        assert_snapshot!(verdicts[0].detail.as_str(), @"blocked by rule #8 on firewall FW1 (zone externa -> zone dmz)");
    }

    #[test]
    fn non_firewall_owner_falls_back_to_logical_firewall() {
        let mut r = rule(8, Endpoint::zone("externa"), Endpoint::zone("dmz"), "ssh", RuleAction::Allow);
        // R1 is a router, not a firewall.
        r.firewall_id = Some(EntityId::from(4));
        let scenarios = [scenario(1, Endpoint::zone("externa"), Endpoint::zone("dmz"), "ssh")];

        let verdicts = evaluate(&scenarios, &[r], &nodes(), TieBreak::StoreOrder);
        assert_snapshot!(
            verdicts[0].detail.as_str(),
            @"allowed by rule #8 on the logical firewall of the topology (zone externa -> zone dmz)"
        );
    }

    #[test]
    fn verdicts_follow_scenario_order_and_are_independent() {
        let rules = [
            rule(1, Endpoint::zone("interna"), Endpoint::zone("dmz"), "http", RuleAction::Deny),
            rule(2, Endpoint::node("pc1"), Endpoint::node("web"), "http", RuleAction::Allow),
        ];
        let a = scenario(10, Endpoint::node("pc1"), Endpoint::node("web"), "http");
        let b = scenario(11, Endpoint::node("R1"), Endpoint::node("web"), "http");

        let forward = evaluate(&[a.clone(), b.clone()], &rules, &nodes(), TieBreak::StoreOrder);
        let backward = evaluate(&[b, a], &rules, &nodes(), TieBreak::StoreOrder);

        assert_eq!(forward[0].result, FlowResult::Allowed);
        assert_eq!(forward[1].result, FlowResult::Blocked);
        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);
    }

    #[test]
    fn lowest_id_tie_break_is_order_independent() {
        let deny = rule(4, Endpoint::zone("interna"), Endpoint::zone("dmz"), "ftp", RuleAction::Deny);
        let allow = rule(9, Endpoint::zone("interna"), Endpoint::zone("dmz"), "ftp", RuleAction::Allow);
        let scenarios = [scenario(1, Endpoint::zone("interna"), Endpoint::zone("dmz"), "ftp")];

        let store_order = evaluate(&scenarios, &[allow.clone(), deny.clone()], &nodes(), TieBreak::StoreOrder);
        assert_eq!(store_order[0].result, FlowResult::Allowed);

        for rules in [[allow.clone(), deny.clone()], [deny.clone(), allow.clone()]] {
            let v = evaluate(&scenarios, &rules, &nodes(), TieBreak::LowestId);
            assert_eq!(v[0].result, FlowResult::Blocked);
        }
    }

    #[test]
    fn evaluation_is_repeatable() {
        let rules = [rule(1, Endpoint::zone("interna"), Endpoint::zone("dmz"), "http", RuleAction::Deny)];
        let scenarios = [
            scenario(1, Endpoint::node("pc1"), Endpoint::node("web"), "http"),
            scenario(2, Endpoint::node("pc1"), Endpoint::node("web"), "smtp"),
        ];
        let first = evaluate(&scenarios, &rules, &nodes(), TieBreak::StoreOrder);
        let second = evaluate(&scenarios, &rules, &nodes(), TieBreak::StoreOrder);
        assert_eq!(first, second);
    }
}

// ── Policy matching ──
//
// Picks the single rule that governs a scenario. A rule is eligible when
// its service matches exactly, its protocol/port agree where both sides
// set them, and both of its endpoints appear in the scenario's candidate
// sets. The most specific eligible rule wins.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::zone::resolve_zone;
use crate::model::{Endpoint, EndpointKind, FlowScenario, Node, Rule, Traffic};

/// How to choose between eligible rules with the same specificity.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TieBreak {
    /// First rule in the order the store returned them.
    #[default]
    StoreOrder,
    /// Rule with the lowest id.
    LowestId,
}

/// Rule keys one side of a scenario can match.
///
/// Always holds the scenario's own `(kind, value)`. A node endpoint also
/// carries the node's zone so zone-level rules apply to it. Inheritance
/// only runs this way: a zone endpoint never matches node-level rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidates<'a> {
    literal: (EndpointKind, &'a str),
    inherited_zone: Option<&'a str>,
}

impl<'a> Candidates<'a> {
    pub(crate) fn for_endpoint(endpoint: &'a Endpoint, nodes: &'a [Node]) -> Self {
        let inherited_zone = match endpoint.kind {
            EndpointKind::Node => resolve_zone(&endpoint.value, nodes),
            EndpointKind::Zone => None,
        };
        Self {
            literal: endpoint.key(),
            inherited_zone,
        }
    }

    pub(crate) fn contains(&self, rule_endpoint: &Endpoint) -> bool {
        if rule_endpoint.key() == self.literal {
            return true;
        }
        rule_endpoint.kind == EndpointKind::Zone
            && self.inherited_zone == Some(rule_endpoint.value.as_str())
    }
}

fn traffic_matches(rule: &Traffic, scenario: &Traffic) -> bool {
    if rule.service != scenario.service {
        return false;
    }
    if let (Some(a), Some(b)) = (rule.protocol_filter(), scenario.protocol_filter()) {
        if a != b {
            return false;
        }
    }
    if let (Some(a), Some(b)) = (rule.port_filter(), scenario.port_filter()) {
        if a != b {
            return false;
        }
    }
    true
}

/// Best rule for `scenario` among `rules`, or `None` when nothing applies.
///
/// Eligible rules are ranked by [`Rule::specificity`]. On equal scores the
/// first one yielded by `rules` wins, so the caller's ordering decides ties.
pub fn match_best_rule<'r>(
    scenario: &FlowScenario,
    rules: impl IntoIterator<Item = &'r Rule>,
    nodes: &[Node],
) -> Option<&'r Rule> {
    let origin = Candidates::for_endpoint(&scenario.source, nodes);
    let destination = Candidates::for_endpoint(&scenario.destination, nodes);

    let mut best: Option<(&'r Rule, u8)> = None;
    for rule in rules {
        if !traffic_matches(&rule.traffic, &scenario.traffic)
            || !origin.contains(&rule.source)
            || !destination.contains(&rule.destination)
        {
            continue;
        }
        let score = rule.specificity();
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((rule, score));
        }
    }
    best.map(|(rule, _)| rule)
}

/// Arrange `rules` so that iteration order implements `tie_break`.
pub fn order_rules(rules: &[Rule], tie_break: TieBreak) -> Vec<&Rule> {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    if tie_break == TieBreak::LowestId {
        // Stable: rules sharing an id keep store order.
        ordered.sort_by(|a, b| a.id.cmp(&b.id));
    }
    ordered
}

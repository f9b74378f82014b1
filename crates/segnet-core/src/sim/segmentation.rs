// ── Segmentation analysis ──
//
// Flags nodes missing subnet/VLAN data and any subnet or VLAN whose
// members sit in more than one security zone. Works on nodes only.

use std::fmt::Display;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use crate::model::{IssueKind, Node, SegmentationIssue};

/// Analyze `nodes` and return every finding, freshly built.
///
/// Order: per-node hygiene findings in node order (subnet before VLAN),
/// then shared subnets, then shared VLANs, each group in order of first
/// appearance.
pub fn analyze(nodes: &[Node]) -> Vec<SegmentationIssue> {
    let mut issues = Vec::new();

    for node in nodes {
        if node.trimmed_subnet().is_none() {
            issues.push(SegmentationIssue::new(
                IssueKind::UndefinedSubnet,
                format!("node '{}' has no subnet defined", node.name),
            ));
        }
        if node.vlan.is_none() {
            issues.push(SegmentationIssue::new(
                IssueKind::UndefinedVlan,
                format!("node '{}' has no VLAN defined", node.name),
            ));
        }
    }

    issues.extend(shared_across_zones(
        nodes,
        Node::trimmed_subnet,
        IssueKind::SubnetSharedAcrossZones,
        "subnet",
    ));
    issues.extend(shared_across_zones(
        nodes,
        |n| n.vlan,
        IssueKind::VlanSharedAcrossZones,
        "VLAN",
    ));

    issues
}

/// Group `nodes` by `key` and report each group spanning several zones.
fn shared_across_zones<'a, K>(
    nodes: &'a [Node],
    key: impl Fn(&'a Node) -> Option<K>,
    kind: IssueKind,
    label: &str,
) -> Vec<SegmentationIssue>
where
    K: Eq + Hash + Display,
{
    let mut groups: IndexMap<K, Vec<&Node>> = IndexMap::new();
    for node in nodes {
        if let Some(k) = key(node) {
            groups.entry(k).or_default().push(node);
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| {
            members
                .iter()
                .map(|n| n.zone.as_str())
                .collect::<IndexSet<_>>()
                .len()
                > 1
        })
        .map(|(k, members)| {
            let listing = members
                .iter()
                .map(|n| format!("{} ({})", n.name, n.zone))
                .collect::<Vec<_>>()
                .join(", ");
            SegmentationIssue::new(
                kind,
                format!("{label} {k} is shared across zones: {listing}"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Severity;
    use crate::sim::fixtures::segmented_node;

    fn of_kind(issues: &[SegmentationIssue], kind: IssueKind) -> Vec<&SegmentationIssue> {
        issues.iter().filter(|i| i.kind == kind).collect()
    }

    #[test]
    fn subnet_shared_across_zones_is_reported_once() {
        let nodes = [
            segmented_node(1, "A", "interna", Some("10.0.0.0/24"), Some(10)),
            segmented_node(2, "B", "dmz", Some("10.0.0.0/24"), Some(20)),
        ];
        let issues = analyze(&nodes);

        let shared = of_kind(&issues, IssueKind::SubnetSharedAcrossZones);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].severity, Severity::High);
        assert_snapshot!(
            shared[0].message.as_str(),
            @"subnet 10.0.0.0/24 is shared across zones: A (interna), B (dmz)"
        );
        assert!(issues.iter().all(|i| i.kind == IssueKind::SubnetSharedAcrossZones));
    }

    #[test]
    fn same_zone_sharing_is_not_reported() {
        let nodes = [
            segmented_node(1, "A", "interna", Some("10.0.0.0/24"), Some(10)),
            segmented_node(2, "B", "interna", Some("10.0.0.0/24"), Some(10)),
        ];
        assert!(analyze(&nodes).is_empty());
    }

    #[test]
    fn subnets_are_compared_trimmed() {
        let nodes = [
            segmented_node(1, "A", "interna", Some(" 10.0.0.0/24"), Some(10)),
            segmented_node(2, "B", "dmz", Some("10.0.0.0/24 "), Some(20)),
        ];
        let issues = analyze(&nodes);
        assert_eq!(of_kind(&issues, IssueKind::SubnetSharedAcrossZones).len(), 1);
    }

    #[test]
    fn vlan_shared_across_zones_lists_every_member() {
        let nodes = [
            segmented_node(1, "A", "interna", Some("10.0.1.0/24"), Some(30)),
            segmented_node(2, "B", "dmz", Some("10.0.2.0/24"), Some(30)),
            segmented_node(3, "C", "dmz", Some("10.0.3.0/24"), Some(30)),
        ];
        let issues = analyze(&nodes);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::VlanSharedAcrossZones);
        assert_eq!(issues[0].severity, Severity::High);
        assert_snapshot!(
            issues[0].message.as_str(),
            @"VLAN 30 is shared across zones: A (interna), B (dmz), C (dmz)"
        );
    }

    #[test]
    fn missing_fields_are_medium_findings_in_node_order() {
        let nodes = [
            segmented_node(1, "A", "interna", None, None),
            segmented_node(2, "B", "dmz", Some("  "), Some(5)),
        ];
        let issues = analyze(&nodes);

        let kinds: Vec<_> = issues.iter().map(|i| (i.kind, i.severity)).collect();
        assert_eq!(
            kinds,
            vec![
                (IssueKind::UndefinedSubnet, Severity::Medium),
                (IssueKind::UndefinedVlan, Severity::Medium),
                (IssueKind::UndefinedSubnet, Severity::Medium),
            ]
        );
        assert_snapshot!(issues[1].message.as_str(), @"node 'A' has no VLAN defined");
    }

    #[test]
    fn nodes_without_subnet_or_vlan_are_not_grouped() {
        let nodes = [
            segmented_node(1, "A", "interna", None, None),
            segmented_node(2, "B", "dmz", None, None),
        ];
        let issues = analyze(&nodes);
        assert!(of_kind(&issues, IssueKind::SubnetSharedAcrossZones).is_empty());
        assert!(of_kind(&issues, IssueKind::VlanSharedAcrossZones).is_empty());
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn groups_are_reported_in_first_seen_order() {
        let nodes = [
            segmented_node(1, "A", "interna", Some("192.168.1.0/24"), Some(1)),
            segmented_node(2, "B", "interna", Some("10.0.0.0/24"), Some(2)),
            segmented_node(3, "C", "dmz", Some("10.0.0.0/24"), Some(2)),
            segmented_node(4, "D", "dmz", Some("192.168.1.0/24"), Some(1)),
        ];
        let issues = analyze(&nodes);
        let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();

        assert_eq!(
            messages,
            vec![
                "subnet 192.168.1.0/24 is shared across zones: A (interna), D (dmz)",
                "subnet 10.0.0.0/24 is shared across zones: B (interna), C (dmz)",
                "VLAN 1 is shared across zones: A (interna), D (dmz)",
                "VLAN 2 is shared across zones: B (interna), C (dmz)",
            ]
        );
    }

    #[test]
    fn input_is_untouched_and_reports_are_fresh() {
        let nodes = vec![
            segmented_node(1, "A", "interna", Some("10.0.0.0/24"), None),
            segmented_node(2, "B", "dmz", Some("10.0.0.0/24"), None),
        ];
        let before = nodes.clone();
        let first = analyze(&nodes);
        let second = analyze(&nodes);
        assert_eq!(nodes, before);
        assert_eq!(first, second);
    }
}

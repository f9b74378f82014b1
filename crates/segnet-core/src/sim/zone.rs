// ── Zone resolution ──

use crate::model::Node;

/// Security zone of the node called `node_name`, if any.
///
/// Node names are expected to be unique. When they are not, the first
/// node in `nodes` order wins.
pub fn resolve_zone<'a>(node_name: &str, nodes: &'a [Node]) -> Option<&'a str> {
    nodes
        .iter()
        .find(|n| n.name == node_name)
        .map(|n| n.zone.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fixtures::node;

    #[test]
    fn resolves_by_exact_name() {
        let nodes = [node(1, "web", "dmz"), node(2, "db", "interna")];
        assert_eq!(resolve_zone("db", &nodes), Some("interna"));
    }

    #[test]
    fn unknown_or_differently_cased_names_resolve_to_none() {
        let nodes = [node(1, "web", "dmz")];
        assert_eq!(resolve_zone("WEB", &nodes), None);
        assert_eq!(resolve_zone("mail", &nodes), None);
    }

    #[test]
    fn first_duplicate_wins() {
        let nodes = [node(1, "web", "dmz"), node(2, "web", "interna")];
        assert_eq!(resolve_zone("web", &nodes), Some("dmz"));
    }
}

//! Node and link command handlers.

use tabled::Tabled;

use segnet_core::{EntityId, Link, Node, TopologyStore};

use crate::cli::{LinksArgs, LinksCommand, NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

// ── Node table row ──────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    node_type: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
}

impl From<&Node> for NodeRow {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id.to_string(),
            name: n.name.clone(),
            node_type: n.node_type.clone(),
            zone: n.zone.clone(),
            subnet: util::or_dash(n.trimmed_subnet()),
            vlan: util::or_dash(n.vlan),
        }
    }
}

// ── Link table row ──────────────────────────────────────────────────

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Target")]
    target: String,
}

fn node_name(nodes: &[Node], id: &EntityId) -> String {
    nodes
        .iter()
        .find(|n| n.id == *id)
        .map_or_else(|| id.to_string(), |n| n.name.clone())
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn handle(session: &Session, args: NodesArgs) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List { zone } => {
            let mut nodes = session.store().list_nodes(&session.topology)?;
            if let Some(zone) = zone {
                nodes.retain(|n| n.zone == zone);
            }
            let out = output::render_list(session.format, &nodes, |n| NodeRow::from(n), |n| {
                n.name.clone()
            })?;
            session.print(&out);
            Ok(())
        }
    }
}

pub fn handle_links(session: &Session, args: LinksArgs) -> Result<(), CliError> {
    match args.command {
        LinksCommand::List => {
            let nodes = session.store().list_nodes(&session.topology)?;
            let links = session.store().list_links(&session.topology)?;
            let row = |l: &Link| LinkRow {
                id: l.id.to_string(),
                source: node_name(&nodes, &l.source),
                target: node_name(&nodes, &l.target),
            };
            let out = output::render_list(session.format, &links, row, |l| {
                format!("{} {}", node_name(&nodes, &l.source), node_name(&nodes, &l.target))
            })?;
            session.print(&out);
            Ok(())
        }
    }
}

//! Rule command handlers.

use tabled::Tabled;

use segnet_core::{EntityId, Node, Rule, RuleAction, RuleSpec, TopologyStore, Traffic};

use crate::cli::{ActionArg, RuleAddArgs, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

// ── Rule table row ──────────────────────────────────────────────────

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Proto")]
    protocol: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Firewall")]
    firewall: String,
}

fn rule_row(r: &Rule, nodes: &[Node]) -> RuleRow {
    RuleRow {
        id: r.id.to_string(),
        source: r.source.to_string(),
        destination: r.destination.to_string(),
        service: r.traffic.service.clone(),
        protocol: util::or_dash(r.traffic.protocol_filter()),
        port: util::or_dash(r.traffic.port_filter()),
        action: r.action.to_string(),
        firewall: util::or_dash(r.firewall_id.as_ref().map(|id| firewall_label(id, nodes))),
    }
}

fn firewall_label(id: &EntityId, nodes: &[Node]) -> String {
    nodes
        .iter()
        .find(|n| n.id == *id)
        .map_or_else(|| id.to_string(), |n| n.name.clone())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(session: &Session, args: RulesArgs) -> Result<(), CliError> {
    match args.command {
        RulesCommand::List { firewall } => {
            let nodes = session.store().list_nodes(&session.topology)?;
            let owner = firewall
                .as_deref()
                .map(|name| util::resolve_firewall(&nodes, name).map(|n| n.id.clone()))
                .transpose()?;
            let rules = session.store().list_rules(&session.topology, owner.as_ref())?;

            let out = output::render_list(
                session.format,
                &rules,
                |r| rule_row(r, &nodes),
                |r| format!("{} {} {} -> {}", r.id, r.action, r.source, r.destination),
            )?;
            session.print(&out);
            Ok(())
        }

        RulesCommand::Add(add) => {
            let spec = rule_spec(session, add)?;
            let id = session.store().add_rule(&session.topology, spec)?;
            session.save()?;
            session.note(&format!("Rule #{id} added"));
            Ok(())
        }
    }
}

fn rule_spec(session: &Session, args: RuleAddArgs) -> Result<RuleSpec, CliError> {
    if args.service.trim().is_empty() {
        return Err(CliError::Validation {
            field: "service".into(),
            reason: "must not be blank".into(),
        });
    }

    let firewall = match args.firewall.as_deref() {
        Some(name) => {
            let nodes = session.store().list_nodes(&session.topology)?;
            Some(util::resolve_firewall(&nodes, name)?.id.clone())
        }
        None => None,
    };

    Ok(RuleSpec {
        id: args.id.map(EntityId::from),
        source: util::parse_endpoint("source", &args.source)?,
        destination: util::parse_endpoint("destination", &args.destination)?,
        traffic: Traffic {
            service: args.service,
            protocol: args.protocol,
            port: args.port.map(i64::from),
        },
        action: match args.action {
            ActionArg::Allow => RuleAction::Allow,
            ActionArg::Deny => RuleAction::Deny,
        },
        firewall,
        description: args.description,
    })
}

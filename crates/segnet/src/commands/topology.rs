//! Topology command handlers.

use segnet_core::TopologySummary;

use crate::cli::{TopologyArgs, TopologyCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

fn summary_detail(t: &TopologySummary) -> String {
    [
        format!("ID:          {}", t.id),
        format!("Name:        {}", t.name),
        format!("Description: {}", util::or_dash(t.description.as_deref())),
        format!("Loaded:      {}", t.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Nodes:       {}", t.node_count),
        format!("Rules:       {}", t.rule_count),
        format!("Scenarios:   {}", t.scenario_count),
    ]
    .join("\n")
}

pub fn handle(session: &Session, args: TopologyArgs) -> Result<(), CliError> {
    match args.command {
        TopologyCommand::Show => {
            let summary = session
                .store()
                .list_topologies()
                .into_iter()
                .find(|t| t.id == session.topology)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "topology".into(),
                    identifier: session.topology.to_string(),
                    list_command: "topology show".into(),
                })?;
            let out = output::render_single(session.format, &summary, summary_detail, |t| {
                t.name.clone()
            })?;
            session.print(&out);
            Ok(())
        }
    }
}

//! Scenario command handlers.

use tabled::Tabled;

use segnet_core::{FlowScenario, ScenarioSpec, TopologyStore, Traffic};

use crate::cli::{ScenarioAddArgs, ScenariosArgs, ScenariosCommand};
use crate::error::CliError;
use crate::output;

use super::util::{self, Session};

#[derive(Tabled)]
struct ScenarioRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Destination")]
    destination: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

pub fn handle(session: &Session, args: ScenariosArgs) -> Result<(), CliError> {
    match args.command {
        ScenariosCommand::List => {
            let scenarios = session.store().list_scenarios(&session.topology)?;
            let row = |s: &FlowScenario| ScenarioRow {
                id: s.id.to_string(),
                source: s.source.to_string(),
                destination: s.destination.to_string(),
                service: s.traffic.service.clone(),
                result: output::paint_result(s.result, session.color),
                detail: util::or_dash(s.detail.as_deref()),
            };
            let out = output::render_list(session.format, &scenarios, row, |s| {
                format!("{} {}", s.id, s.result)
            })?;
            session.print(&out);
            Ok(())
        }

        ScenariosCommand::Add(add) => {
            let spec = scenario_spec(add)?;
            let id = session.store().add_scenario(&session.topology, spec)?;
            session.save()?;
            session.note(&format!("Scenario #{id} added (pending)"));
            Ok(())
        }
    }
}

fn scenario_spec(args: ScenarioAddArgs) -> Result<ScenarioSpec, CliError> {
    if args.service.trim().is_empty() {
        return Err(CliError::Validation {
            field: "service".into(),
            reason: "must not be blank".into(),
        });
    }
    Ok(ScenarioSpec {
        id: None,
        source: util::parse_endpoint("source", &args.source)?,
        destination: util::parse_endpoint("destination", &args.destination)?,
        traffic: Traffic {
            service: args.service,
            protocol: args.protocol,
            port: args.port.map(i64::from),
        },
        result: segnet_core::FlowResult::Pending,
        detail: None,
    })
}

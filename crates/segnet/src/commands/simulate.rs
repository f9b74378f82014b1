//! Simulation command handler.

use std::collections::HashMap;

use tabled::Tabled;

use segnet_core::{EntityId, FlowResult, FlowScenario, ScenarioVerdict, SimulationReport, TopologyStore};

use crate::cli::SimulateArgs;
use crate::error::CliError;
use crate::output;

use super::util::Session;

#[derive(Tabled)]
struct VerdictRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Flow")]
    flow: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

fn verdict_row(
    v: &ScenarioVerdict,
    scenarios: &HashMap<EntityId, FlowScenario>,
    color: bool,
) -> VerdictRow {
    let scenario = scenarios.get(&v.scenario_id);
    VerdictRow {
        id: v.scenario_id.to_string(),
        flow: scenario.map_or_else(String::new, |s| format!("{} -> {}", s.source, s.destination)),
        service: scenario.map_or_else(String::new, |s| s.traffic.service.clone()),
        result: output::paint_result(v.result, color),
        detail: v.detail.clone(),
    }
}

pub fn handle(session: &Session, args: &SimulateArgs) -> Result<(), CliError> {
    let report = session.simulator.simulate(&session.topology)?;

    if args.write {
        session.save()?;
    }

    let scenarios: HashMap<EntityId, FlowScenario> = session
        .store()
        .list_scenarios(&session.topology)?
        .into_iter()
        .map(|s| (s.id.clone(), s))
        .collect();

    let out = output::render_single(
        session.format,
        &report,
        |r| {
            let rows: Vec<VerdictRow> = r
                .verdicts
                .iter()
                .map(|v| verdict_row(v, &scenarios, session.color))
                .collect();
            output::render_table(&rows)
        },
        plain_lines,
    )?;
    session.print(&out);

    session.note(&format!(
        "{} scenarios: {} allowed, {} blocked{}",
        report.verdicts.len(),
        report.count(FlowResult::Allowed),
        report.count(FlowResult::Blocked),
        if args.write { " (saved)" } else { "" },
    ));
    Ok(())
}

fn plain_lines(report: &SimulationReport) -> String {
    report
        .verdicts
        .iter()
        .map(|v| format!("{} {} {}", v.scenario_id, v.result, v.detail))
        .collect::<Vec<_>>()
        .join("\n")
}

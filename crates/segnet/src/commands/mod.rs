//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod nodes;
pub mod rules;
pub mod scenarios;
pub mod segmentation;
pub mod simulate;
pub mod topology;
pub mod util;

use crate::cli::Command;
use crate::error::CliError;

use util::Session;

/// Dispatch a document-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, session: &Session) -> Result<(), CliError> {
    match cmd {
        Command::Topology(args) => topology::handle(session, args),
        Command::Nodes(args) => nodes::handle(session, args),
        Command::Links(args) => nodes::handle_links(session, args),
        Command::Rules(args) => rules::handle(session, args),
        Command::Scenarios(args) => scenarios::handle(session, args),
        Command::Simulate(args) => simulate::handle(session, &args),
        Command::Segmentation => segmentation::handle(session),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

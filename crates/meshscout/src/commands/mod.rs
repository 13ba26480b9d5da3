//! Command dispatch: bridges CLI args -> core pipeline -> output formatting.

pub mod nodes;
pub mod regions;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Nodes(args) => nodes::handle(args, global).await,
        Command::Regions => regions::handle(global),
    }
}

//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod key;
pub mod remote;
pub mod secret;
pub mod site;
pub mod waiting;

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Context};
use crate::error::CliError;

/// Dispatch a store-backed command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let ctx = Context::open(&cfg)?;

    match cmd {
        Command::Key(args) => key::handle(args, &ctx, global),
        Command::Waiting(args) => waiting::handle(args, &ctx, global),
        Command::Remote(args) => remote::handle(args, &ctx, global).await,
        Command::Site(args) => site::handle(args, &ctx, global).await,
        // Secret, Config and Completions are handled before dispatch
        Command::Secret(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

use serde::Serialize;

use sitemon_core::SiteId;

use crate::cli::{GlobalOpts, WaitingArgs, WaitingCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct WaitingView {
    site_id: SiteId,
    waiting: bool,
}

pub fn handle(args: WaitingArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        WaitingCommand::Set { site, waiting } => {
            ctx.integration.set_waiting_status(site, waiting)?;
            Ok(())
        }

        WaitingCommand::Get { site } => {
            let view = WaitingView {
                site_id: site,
                waiting: ctx.integration.get_waiting_status(site)?,
            };
            let out = output::render(global.output, &view, |v| v.waiting.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

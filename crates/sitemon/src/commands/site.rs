use serde::Serialize;

use sitemon_core::SiteId;

use crate::cli::{GlobalOpts, SiteArgs, SiteCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct RemovedView<'a> {
    site_id: SiteId,
    action: &'a str,
    removed: bool,
}

pub async fn handle(args: SiteArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SiteCommand::Remove { site, action } => {
            ctx.lifecycle()
                .remove_site(site, &action, ctx.store.as_ref())
                .await?;

            let view = RemovedView {
                site_id: site,
                action: &action,
                removed: true,
            };
            let out = output::render(global.output, &view, |v| format!("removed site {}", v.site_id))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

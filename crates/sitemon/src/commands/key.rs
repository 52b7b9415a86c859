use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::info;

use sitemon_core::SiteId;

use crate::cli::{GlobalOpts, KeyArgs, KeyCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct KeyView<'a> {
    site_id: SiteId,
    api_key: &'a str,
}

pub fn handle(args: KeyArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        KeyCommand::Set { site, key } => {
            ctx.integration.set_api_key(site, &key)?;
            info!(site_id = %site, "api key stored");
            Ok(())
        }

        KeyCommand::Accept { site, key } => {
            ctx.integration.accept_api_key(site, &key)?;
            info!(site_id = %site, "api key accepted");
            Ok(())
        }

        KeyCommand::Get { site } => {
            let key = ctx.integration.get_api_key(site)?;
            let view = KeyView {
                site_id: site,
                api_key: key.expose_secret(),
            };
            let out = output::render(global.output, &view, |v| v.api_key.to_owned())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

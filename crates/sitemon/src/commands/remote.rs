use serde::Serialize;

use sitemon_core::{DeleteOutcome, SiteId};

use crate::cli::{GlobalOpts, RemoteArgs, RemoteCommand};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

/// Serializable view of a [`DeleteOutcome`].
#[derive(Serialize)]
pub struct OutcomeView<'a> {
    pub site_id: SiteId,
    pub handled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

impl<'a> OutcomeView<'a> {
    pub fn new(site_id: SiteId, outcome: &'a DeleteOutcome) -> Self {
        match outcome {
            DeleteOutcome::Handled { message } => Self {
                site_id,
                handled: true,
                message: Some(message),
                reason: None,
            },
            DeleteOutcome::NotHandled(reason) => Self {
                site_id,
                handled: false,
                message: None,
                reason: Some(reason.as_str()),
            },
        }
    }

    pub fn plain(&self) -> String {
        match (self.message, self.reason) {
            (Some(message), _) => format!("handled: {message}"),
            (None, Some(reason)) => format!("not handled: {reason}"),
            (None, None) => "not handled".into(),
        }
    }
}

pub async fn handle(args: RemoteArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RemoteCommand::Delete { site } => {
            let outcome = ctx.integration.delete_from_remote_service(site).await;
            let view = OutcomeView::new(site, &outcome);
            let out = output::render(global.output, &view, OutcomeView::plain)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

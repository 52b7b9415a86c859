//! Config file commands. These work without an encryption key where possible.

use sitemon_config::{config_path, load_config_file, save_config};
use sitemon_core::{SecretCodec, TEAM_API_KEY_OPTION};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = global.config.clone().unwrap_or_else(config_path);
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        // Flags and env vars pick the key; only the file's own values are saved
        ConfigCommand::SetTeamKey { key } => {
            let effective = config::load(global)?;
            let sealed = config::codec(&effective)?.encrypt(&key)?;

            let mut on_disk = load_config_file(global.config.as_deref())?;
            on_disk.options.set(TEAM_API_KEY_OPTION, sealed);

            let path = save_config(&on_disk, global.config.as_deref())?;
            if !global.quiet {
                eprintln!("team API key saved to {}", path.display());
            }
            Ok(())
        }
    }
}

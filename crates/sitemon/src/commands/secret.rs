use std::io::Read;

use sitemon_core::{SecretCodec, XChaChaCodec};

use crate::cli::{GlobalOpts, SecretArgs, SecretCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: SecretArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SecretCommand::Encrypt { value } => {
            let plaintext = match value {
                Some(v) => v,
                None => read_stdin()?,
            };
            if plaintext.is_empty() {
                return Err(CliError::Validation {
                    field: "value".into(),
                    reason: "nothing to encrypt".into(),
                });
            }

            let cfg = config::load(global)?;
            let sealed = config::codec(&cfg)?.encrypt(&plaintext)?;
            output::print_output(&sealed, global.quiet);
            Ok(())
        }

        SecretCommand::GenerateKey { keyring } => {
            let key = XChaChaCodec::generate_key();
            if keyring {
                sitemon_config::store_encryption_key(&key)?;
                if !global.quiet {
                    eprintln!("encryption key saved to the system keyring");
                }
            } else {
                output::print_output(&key, global.quiet);
            }
            Ok(())
        }
    }
}

/// Read a single secret from stdin, dropping the trailing newline.
fn read_stdin() -> Result<String, CliError> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_owned())
}

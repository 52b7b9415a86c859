//! Clap derive structures for the `sitemon` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use sitemon_core::SiteId;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// sitemon -- per-site monitoring credentials and remote cleanup
#[derive(Debug, Parser)]
#[command(
    name = "sitemon",
    version,
    about = "Manage monitoring service credentials for hosted sites",
    long_about = "Stores each site's monitoring API key encrypted at rest, tracks\n\
        whether a site is waiting for its key, and removes sites from the\n\
        monitoring service before their records are deleted.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Site attribute store (overrides store.path)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Monitoring service base URL (overrides monitor.base_url)
    #[arg(long, global = true, value_name = "URL")]
    pub monitor_url: Option<String>,

    /// Request timeout in seconds (overrides monitor.timeout)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "plain", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (scripting)
    Plain,
    /// Pretty-printed JSON
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read and write a site's monitoring API key
    Key(KeyArgs),

    /// Read and write a site's "waiting for key" flag
    Waiting(WaitingArgs),

    /// Talk to the monitoring service directly
    Remote(RemoteArgs),

    /// Host-side site lifecycle
    Site(SiteArgs),

    /// Encryption helpers for preparing stored secrets
    Secret(SecretArgs),

    /// Inspect and edit the config file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── key ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(Debug, Subcommand)]
pub enum KeyCommand {
    /// Store a site's API key (no waiting check)
    Set { site: SiteId, key: String },

    /// Store a key for a site that is waiting for one, clearing the flag
    Accept { site: SiteId, key: String },

    /// Print a site's decrypted API key (empty if none)
    Get { site: SiteId },
}

// ── waiting ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WaitingArgs {
    #[command(subcommand)]
    pub command: WaitingCommand,
}

#[derive(Debug, Subcommand)]
pub enum WaitingCommand {
    /// Set or clear the flag
    Set {
        site: SiteId,
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        waiting: bool,
    },

    /// Print the flag (true/false)
    Get { site: SiteId },
}

// ── remote ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RemoteArgs {
    #[command(subcommand)]
    pub command: RemoteCommand,
}

#[derive(Debug, Subcommand)]
pub enum RemoteCommand {
    /// Remove a site from the monitoring service, keeping the local record
    Delete { site: SiteId },
}

// ── site ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SiteArgs {
    #[command(subcommand)]
    pub command: SiteCommand,
}

#[derive(Debug, Subcommand)]
pub enum SiteCommand {
    /// Run removal hooks, then purge the site's stored attributes
    Remove {
        site: SiteId,

        /// Host action that triggered the removal
        #[arg(long, default_value = "remove_full")]
        action: String,
    },
}

// ── secret ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SecretArgs {
    #[command(subcommand)]
    pub command: SecretCommand,
}

#[derive(Debug, Subcommand)]
pub enum SecretCommand {
    /// Encrypt a value with the configured key (reads stdin if omitted)
    Encrypt { value: Option<String> },

    /// Generate a new base64 encryption key
    GenerateKey {
        /// Save it to the system keyring instead of printing it
        #[arg(long)]
        keyring: bool,
    },
}

// ── config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective config file path
    Path,

    /// Print the effective configuration as TOML
    Show,

    /// Encrypt and save the team API key into [options]
    SetTeamKey { key: String },
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

//! Command-line interface for gitsh
//!
//! This module provides the main CLI structure and command handling. It uses
//! clap for argument parsing; without a subcommand gitsh drops into the
//! interactive shell, with one it runs a single command and exits.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::shell::Session;

mod output;

pub use output::Output;

/// Gitsh - Interactive Git Porcelain Shell
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// One-shot commands mirroring the shell verbs
#[derive(Subcommand)]
pub enum Commands {
    /// Clone the configured remote into the local path
    Clone,
    /// Initialize a new repository at the local path
    Init,
    /// Show tracked and untracked files
    Status,
    /// Stage files for the next commit
    Stage {
        /// Paths to stage
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Commit staged changes
    Commit {
        /// Commit message (prompts when omitted)
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Show the commit log
    Log,
    /// Push the current branch to the remote
    Push,
    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let output = Output::new(self.verbose, self.quiet);
        let config = Config::load(self.config.as_deref())?;
        config.validate()?;
        let mut session = Session::new(config);

        match self.command {
            Some(Commands::Clone) => session.clone_remote(&output),
            Some(Commands::Init) => session.init(&output),
            Some(Commands::Status) => session.status(&output),
            Some(Commands::Stage { paths }) => session.stage(&paths, &output),
            Some(Commands::Commit { message }) => session.commit(message.as_deref(), &output),
            Some(Commands::Log) => session.log(&output),
            Some(Commands::Push) => session.push(&output),
            Some(Commands::Config) => session.show_config(&output),
            None => session.run_interactive(&output),
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

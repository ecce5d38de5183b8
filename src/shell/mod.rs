//! Interactive shell session
//!
//! The session owns the loaded profile and the currently open repository;
//! every command handler borrows it explicitly, so there is no state beyond
//! the struct itself. The loop isolates failures per invocation: a command
//! error is printed and the shell returns to the prompt.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Output;
use crate::config::Config;
use crate::git::GitRepo;
use crate::status;

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Clone,
    Init,
    Status,
    Stage(Vec<String>),
    Commit,
    Log,
    Push,
    Config,
    Help,
    Exit,
    Empty,
    Unknown(String),
}

impl ShellCommand {
    /// Parse one line of input
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Self::Empty;
        };

        match command {
            "clone" => Self::Clone,
            "init" => Self::Init,
            "status" => Self::Status,
            "stage" => Self::Stage(words.map(str::to_string).collect()),
            "commit" => Self::Commit,
            "log" => Self::Log,
            "push" => Self::Push,
            "config" => Self::Config,
            "help" => Self::Help,
            "exit" | "quit" => Self::Exit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Whether the interactive loop should keep prompting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    Continue,
    Exit,
}

/// Shell state: the repository profile plus the currently open repository
pub struct Session {
    config: Config,
    repo: Option<GitRepo>,
}

impl Session {
    /// Create a session, opening the configured repository when one exists
    pub fn new(config: Config) -> Self {
        let local_path = config.repository.local_path.clone();
        let repo = if GitRepo::exists(&local_path) {
            match GitRepo::open(&local_path) {
                Ok(repo) => Some(repo),
                Err(err) => {
                    debug!("could not open {}: {err:#}", local_path.display());
                    None
                }
            }
        } else {
            None
        };

        Self { config, repo }
    }

    /// Whether a repository is currently open
    pub fn has_repo(&self) -> bool {
        self.repo.is_some()
    }

    fn local_path(&self) -> &Path {
        &self.config.repository.local_path
    }

    fn repo(&self) -> Result<&GitRepo> {
        self.repo
            .as_ref()
            .context("repository not found; run 'clone' or 'init' first")
    }

    /// Clone the configured remote into the local path
    pub fn clone_remote(&mut self, output: &Output) -> Result<()> {
        if self.repo.is_some() {
            output.warning("Local repository already exists.");
            return Ok(());
        }

        let url = self.config.repository.url.clone();
        if url.is_empty() {
            anyhow::bail!("no remote url configured; set repository.url");
        }

        output.info(&format!(
            "Cloning {} into '{}'...",
            url,
            self.local_path().display()
        ));
        self.repo = Some(GitRepo::clone(&url, self.local_path())?);
        output.success("Repository cloned.");

        Ok(())
    }

    /// Initialize a fresh repository at the local path
    pub fn init(&mut self, output: &Output) -> Result<()> {
        if self.repo.is_some() {
            output.warning("Local repository already exists.");
            return Ok(());
        }

        output.info(&format!(
            "Initializing repository at '{}'...",
            self.local_path().display()
        ));
        self.repo = Some(GitRepo::init(self.local_path())?);
        output.success("Repository initialized.");

        Ok(())
    }

    /// Show tracked and untracked files
    pub fn status(&self, output: &Output) -> Result<()> {
        let repo = self.repo()?;
        let status = status::repository_status(repo)?;
        output.verbose(&format!(
            "{} tracked, {} untracked",
            status.tracked.len(),
            status.untracked.len()
        ));

        output.header("Tracked files");
        if status.tracked.is_empty() {
            output.list_item("(none)");
        }
        for path in &status.tracked {
            output.list_item(path);
        }

        output.header("Untracked files");
        if status.untracked.is_empty() {
            output.list_item("(none)");
        }
        for path in &status.untracked {
            output.list_item(path);
        }
        output.blank_line();

        Ok(())
    }

    /// Stage the given paths
    pub fn stage(&self, paths: &[String], output: &Output) -> Result<()> {
        if paths.is_empty() {
            anyhow::bail!("usage: stage <file1> [file2 ...]");
        }

        self.repo()?.stage(paths)?;
        output.success(&format!("Staged: {}", paths.join(", ")));

        Ok(())
    }

    /// Commit staged changes, prompting for a message when none is given
    pub fn commit(&self, message: Option<&str>, output: &Output) -> Result<()> {
        let repo = self.repo()?;

        let (message, confirmed) = match message {
            Some(message) => (message.to_string(), true),
            None => {
                let default = &self.config.repository.default_commit_message;
                let line = output
                    .prompt(&format!("Enter commit message (default: '{default}'): "))?
                    .unwrap_or_default();
                let message = if line.is_empty() {
                    default.clone()
                } else {
                    line
                };
                let confirmed = output.confirm(&format!("Commit with message '{message}'?"))?;
                (message, confirmed)
            }
        };

        if !confirmed {
            output.warning("Commit cancelled.");
            return Ok(());
        }

        let oid = repo.commit(&message)?;
        output.success(&format!("Committed {oid}"));

        Ok(())
    }

    /// Print the commit log, newest first
    pub fn log(&self, output: &Output) -> Result<()> {
        let entries = self.repo()?.history()?;

        output.header("Commit log");
        for entry in &entries {
            output.key_value("Commit:", &entry.id);
            output.key_value("Author:", &entry.author);
            output.key_value(
                "Date:",
                &entry.when.format("%Y-%m-%d %H:%M:%S %z").to_string(),
            );
            output.key_value("Message:", &entry.message);
            output.separator();
        }

        Ok(())
    }

    /// Push the current branch to the remote
    pub fn push(&self, output: &Output) -> Result<()> {
        let repo = self.repo()?;
        output.info("Pushing changes to remote...");
        repo.push(&self.config.repository.url)?;
        output.success("Push complete.");

        Ok(())
    }

    /// Print the effective configuration
    pub fn show_config(&self, output: &Output) -> Result<()> {
        output.header("Configuration");
        print!("{}", self.config.to_yaml()?);

        Ok(())
    }

    /// Run the interactive loop until exit or end of input
    pub fn run_interactive(&mut self, output: &Output) -> Result<()> {
        if self.repo.is_some() {
            output.info(&format!(
                "Opened existing repository at '{}'.",
                self.local_path().display()
            ));
        } else {
            output.info("No local repository found. You can 'clone' or 'init' one.");
        }
        output.blank_line();
        output.info("Welcome to the interactive git shell. Type 'help' for commands.");

        loop {
            let Some(line) = output.prompt("gitsh> ")? else {
                // End of input counts as exit
                output.blank_line();
                break;
            };
            match self.dispatch(ShellCommand::parse(&line), output) {
                Ok(LoopAction::Exit) => break,
                Ok(LoopAction::Continue) => {}
                Err(err) => output.error(&format!("{err:#}")),
            }
        }

        Ok(())
    }

    /// Execute one parsed command
    pub fn dispatch(&mut self, command: ShellCommand, output: &Output) -> Result<LoopAction> {
        match command {
            ShellCommand::Clone => self.clone_remote(output)?,
            ShellCommand::Init => self.init(output)?,
            ShellCommand::Status => self.status(output)?,
            ShellCommand::Stage(paths) => self.stage(&paths, output)?,
            ShellCommand::Commit => self.commit(None, output)?,
            ShellCommand::Log => self.log(output)?,
            ShellCommand::Push => self.push(output)?,
            ShellCommand::Config => self.show_config(output)?,
            ShellCommand::Help => self.help(output),
            ShellCommand::Exit => {
                output.info("Exiting.");
                return Ok(LoopAction::Exit);
            }
            ShellCommand::Empty => {}
            ShellCommand::Unknown(word) => {
                output.warning(&format!(
                    "Unknown command '{word}'. Type 'help' for a list of commands."
                ));
            }
        }

        Ok(LoopAction::Continue)
    }

    fn help(&self, output: &Output) {
        output.header("Available commands");
        output.list_item("clone                Clone the repository from the configured remote");
        output.list_item("init                 Initialize a new local repository");
        output.list_item("status               Show tracked and untracked files");
        output.list_item("stage <file(s)>      Stage files for the next commit");
        output.list_item("commit               Commit staged changes (prompts for a message)");
        output.list_item("log                  Show the commit log");
        output.list_item("push                 Push the current branch to the remote");
        output.list_item("config               Show the effective configuration");
        output.list_item("help                 Show this help message");
        output.list_item("exit, quit           Leave the shell");
        output.blank_line();
    }
}

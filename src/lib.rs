//! # Gitsh - Interactive Git Porcelain Shell
//!
//! Gitsh wraps libgit2 porcelain operations (clone, init, status, stage,
//! commit, log, push) behind a small read-eval-print loop driven by a YAML
//! repository profile. All version-control semantics are delegated to the
//! `git2` crate; gitsh itself only reconciles the working tree against the
//! index and routes commands.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install gitsh
//! cargo install gitsh
//!
//! # Describe the repository in gitsh.yml, then start the shell
//! gitsh
//!
//! # Or run a single command non-interactively
//! gitsh status
//! ```

pub mod cli;
pub mod config;
pub mod git;
pub mod shell;
pub mod status;

pub use cli::{Cli, Output};
pub use config::Config;
pub use shell::Session;
pub use status::{StatusError, WorkingTreeStatus, compute_status};

/// Result type alias for gitsh operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

//! Git integration layer for gitsh
//!
//! This module provides a high-level interface for Git operations using
//! git2. Object storage, refs, and network transfer all belong to libgit2;
//! gitsh only routes porcelain calls through it.

use std::path::Path;

use anyhow::{Context, Result};
use auth_git2::GitAuthenticator;
use git2::build::RepoBuilder;
use git2::{FetchOptions, RemoteCallbacks, Repository};
use tracing::debug;

use crate::status::METADATA_DIR;

mod operations;

pub use operations::CommitInfo;

/// Handle to an open repository
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open an existing repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path.as_ref()).with_context(|| {
            format!("failed to open repository at {}", path.as_ref().display())
        })?;

        Ok(Self { repo })
    }

    /// Initialize a new repository
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("initializing repository at {}", path.as_ref().display());
        let repo = Repository::init(path.as_ref()).with_context(|| {
            format!(
                "failed to initialize repository at {}",
                path.as_ref().display()
            )
        })?;

        Ok(Self { repo })
    }

    /// Clone a remote repository into the given path
    pub fn clone<P: AsRef<Path>>(url: &str, path: P) -> Result<Self> {
        debug!("cloning {} into {}", url, path.as_ref().display());
        let authenticator = GitAuthenticator::default();
        let git_config =
            git2::Config::open_default().context("failed to open git configuration")?;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(authenticator.credentials(&git_config));

        let mut fetch = FetchOptions::new();
        fetch.remote_callbacks(callbacks);

        let repo = RepoBuilder::new()
            .fetch_options(fetch)
            .clone(url, path.as_ref())
            .with_context(|| format!("failed to clone {url}"))?;

        Ok(Self { repo })
    }

    /// Whether a repository already exists at the given path
    pub fn exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().join(METADATA_DIR).exists()
    }

    /// Get the current branch name
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().context("failed to get HEAD reference")?;
        let branch = head.shorthand().context("failed to get branch name")?;

        Ok(branch.to_string())
    }

    /// Get repository metadata path
    pub fn repo_path(&self) -> &Path {
        self.repo.path()
    }

    /// Get working directory path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }
}

//! Porcelain operations
//!
//! Thin pass-throughs to libgit2 for staging, committing, history, and
//! push. The status computation lives in [`crate::status`]; everything here
//! adds no logic beyond argument plumbing and error context.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use auth_git2::GitAuthenticator;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{IndexAddOption, Oid, PushOptions, RemoteCallbacks, Sort};
use tracing::debug;

use super::GitRepo;
use crate::status::StatusError;

/// One entry of the commit log
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub id: String,
    pub author: String,
    pub when: DateTime<FixedOffset>,
    pub message: String,
}

impl GitRepo {
    /// Enumerate the paths recorded in the index
    ///
    /// Raw index bytes are decoded to UTF-8 here, exactly once, so every
    /// later comparison operates on a single canonical representation.
    pub fn tracked_paths(&self) -> Result<BTreeSet<String>, StatusError> {
        let index = self.repo.index().map_err(StatusError::IndexUnavailable)?;

        let mut paths = BTreeSet::new();
        for entry in index.iter() {
            let path = String::from_utf8(entry.path.clone()).map_err(|_| {
                StatusError::EncodingMismatch(PathBuf::from(
                    String::from_utf8_lossy(&entry.path).into_owned(),
                ))
            })?;
            paths.insert(path);
        }

        Ok(paths)
    }

    /// Stage the given pathspecs
    pub fn stage(&self, pathspecs: &[String]) -> Result<()> {
        debug!("staging {:?}", pathspecs);
        let mut index = self
            .repo
            .index()
            .context("failed to open repository index")?;
        index
            .add_all(pathspecs.iter(), IndexAddOption::DEFAULT, None)
            .context("failed to stage files")?;
        index.write().context("failed to write repository index")?;

        Ok(())
    }

    /// Commit the staged changes
    pub fn commit(&self, message: &str) -> Result<Oid> {
        debug!("committing with message {:?}", message);
        let mut index = self
            .repo
            .index()
            .context("failed to open repository index")?;
        let tree_oid = index.write_tree().context("failed to write index tree")?;
        let tree = self.repo.find_tree(tree_oid)?;

        let signature = self
            .repo
            .signature()
            .context("no committer identity; set user.name and user.email")?;

        // The first commit has no parent.
        let mut parents = Vec::new();
        if let Some(target) = self.repo.head().ok().and_then(|head| head.target()) {
            parents.push(self.repo.find_commit(target)?);
        }
        let parents: Vec<_> = parents.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .context("failed to create commit")?;

        Ok(oid)
    }

    /// Walk the commit log from HEAD, newest first
    pub fn history(&self) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self
            .repo
            .revwalk()
            .context("failed to start revision walk")?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk
            .push_head()
            .context("repository has no commits yet")?;

        let mut entries = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let author = commit.author();
            entries.push(CommitInfo {
                id: commit.id().to_string(),
                author: format!(
                    "{} <{}>",
                    author.name().unwrap_or("unknown"),
                    author.email().unwrap_or("unknown"),
                ),
                when: commit_time(&commit),
                message: commit.message().unwrap_or_default().trim().to_string(),
            });
        }

        Ok(entries)
    }

    /// Push the current branch to the remote
    ///
    /// An `origin` remote wins when one is configured (the usual case after
    /// clone); otherwise the fallback URL from the profile is used.
    pub fn push(&self, fallback_url: &str) -> Result<()> {
        let branch = self.current_branch()?;
        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        debug!("pushing {}", refspec);

        let mut remote = match self.repo.find_remote("origin") {
            Ok(remote) => remote,
            Err(_) if !fallback_url.is_empty() => self.repo.remote_anonymous(fallback_url)?,
            Err(_) => anyhow::bail!("no origin remote and no remote url configured"),
        };

        let authenticator = GitAuthenticator::default();
        let git_config = self
            .repo
            .config()
            .context("failed to open repository configuration")?;
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(authenticator.credentials(&git_config));

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .context("failed to push to remote")?;

        Ok(())
    }
}

fn commit_time(commit: &git2::Commit<'_>) -> DateTime<FixedOffset> {
    let time = commit.time();
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
    DateTime::from_timestamp(time.seconds(), 0)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .with_timezone(&offset)
}

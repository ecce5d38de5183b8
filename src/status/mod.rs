//! Working tree status reconciliation
//!
//! Classifies every regular file under a repository's working directory as
//! tracked or untracked, relative to the paths recorded in the index. The
//! computation is pure and synchronous: one filesystem walk, one set
//! difference, nothing cached across calls. Both inputs pass through a
//! single canonicalization routine (UTF-8 text, `/`-separated components)
//! so that set membership is decided on one representation only.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use thiserror::Error;
use tracing::debug;

use crate::git::GitRepo;

/// Name of the repository metadata directory, excluded from all listings
pub const METADATA_DIR: &str = ".git";

/// Failure modes of the status computation
///
/// All variants are recoverable: the shell reports them and returns to the
/// prompt.
#[derive(Debug, Error)]
pub enum StatusError {
    /// The root lacks a repository metadata directory
    #[error("{} is not a git repository", .0.display())]
    NotARepository(PathBuf),

    /// The tracked-path source could not be read
    #[error("failed to read the repository index")]
    IndexUnavailable(#[source] git2::Error),

    /// A path could not be normalized to the canonical text form
    #[error("path {} cannot be normalized to UTF-8", .0.display())]
    EncodingMismatch(PathBuf),
}

/// Result of one status computation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeStatus {
    /// Paths recorded in the index
    pub tracked: BTreeSet<String>,
    /// On-disk files absent from the index
    pub untracked: BTreeSet<String>,
}

/// Reconcile a tracked-path set against a filesystem walk of `root`
///
/// Enumerates every regular file under `root` (hidden and ignored files
/// included), drops anything whose first segment is the metadata directory,
/// and splits the listing into tracked and untracked by canonical path
/// equality. The returned sets are disjoint, and together they cover every
/// non-metadata regular file under `root`.
pub fn compute_status<I, P>(root: &Path, tracked_paths: I) -> Result<WorkingTreeStatus, StatusError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    if !root.join(METADATA_DIR).exists() {
        return Err(StatusError::NotARepository(root.to_path_buf()));
    }

    let mut tracked = BTreeSet::new();
    for path in tracked_paths {
        tracked.insert(canonical_path(path.as_ref())?);
    }

    let mut untracked = BTreeSet::new();
    for file in walk_working_tree(root) {
        let path = canonical_path(&file)?;
        if !tracked.contains(&path) {
            untracked.insert(path);
        }
    }

    Ok(WorkingTreeStatus { tracked, untracked })
}

/// Compute the status of an open repository
///
/// Sources the tracked set from the repository index and runs
/// [`compute_status`] against its working directory.
pub fn repository_status(repo: &GitRepo) -> Result<WorkingTreeStatus, StatusError> {
    let tracked = repo.tracked_paths()?;
    let root = repo
        .workdir()
        .ok_or_else(|| StatusError::NotARepository(repo.repo_path().to_path_buf()))?;

    compute_status(root, tracked)
}

/// Enumerate regular files under `root` as root-relative paths
///
/// The metadata directory is pruned at the walker level so its contents are
/// never visited; unreadable entries are skipped rather than failing the
/// whole computation.
fn walk_working_tree(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| entry.depth() != 1 || entry.file_name() != OsStr::new(METADATA_DIR))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|file_type| file_type.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        // First-segment check kept alongside the walker prune; it also
        // covers a `.git` gitlink file at the root.
        if relative.components().next() == Some(Component::Normal(OsStr::new(METADATA_DIR))) {
            continue;
        }
        files.push(relative.to_path_buf());
    }

    files
}

/// Normalize a relative path to the canonical comparison form: UTF-8 text
/// with `/`-separated components
fn canonical_path(path: &Path) -> Result<String, StatusError> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| StatusError::EncodingMismatch(path.to_path_buf()))?;
                segments.push(segment);
            }
            Component::CurDir => continue,
            _ => return Err(StatusError::EncodingMismatch(path.to_path_buf())),
        }
    }

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;

    fn init_repo(path: &Path) -> GitRepo {
        GitRepo::init(path).unwrap()
    }

    fn no_tracked() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn empty_repository_yields_empty_sets() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());

        let status = compute_status(dir.path(), no_tracked()).unwrap();
        assert!(status.tracked.is_empty());
        assert!(status.untracked.is_empty());
    }

    #[test]
    fn splits_tracked_and_untracked() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let status = compute_status(dir.path(), ["a.txt"]).unwrap();
        assert_eq!(
            status.tracked.iter().collect::<Vec<_>>(),
            vec!["a.txt"]
        );
        assert_eq!(
            status.untracked.iter().collect::<Vec<_>>(),
            vec!["b.txt"]
        );
    }

    #[test]
    fn nested_tracked_path_is_not_reported_untracked() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::create_dir(dir.path().join("dir")).unwrap();
        fs::write(dir.path().join("dir/c.txt"), "c").unwrap();

        let status = compute_status(dir.path(), ["dir/c.txt"]).unwrap();
        assert_eq!(
            status.tracked.iter().collect::<Vec<_>>(),
            vec!["dir/c.txt"]
        );
        assert!(status.untracked.is_empty());
    }

    #[test]
    fn metadata_directory_never_appears() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        // Repository::init already populates .git; add more noise
        fs::write(dir.path().join(".git").join("extra-file"), "x").unwrap();

        let status = compute_status(dir.path(), no_tracked()).unwrap();
        assert!(status.tracked.is_empty());
        assert!(status.untracked.is_empty());
    }

    #[test]
    fn hidden_and_nested_files_are_enumerated() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), "d").unwrap();

        let status = compute_status(dir.path(), no_tracked()).unwrap();
        assert_eq!(
            status.untracked.iter().collect::<Vec<_>>(),
            vec![".hidden", "a/b/deep.txt"]
        );
    }

    #[test]
    fn outputs_are_disjoint_and_complete() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        for name in ["one.txt", "two.txt", "three.txt"] {
            fs::write(dir.path().join(name), name).unwrap();
        }

        let status = compute_status(dir.path(), ["one.txt", "three.txt"]).unwrap();
        assert!(status.tracked.intersection(&status.untracked).next().is_none());

        let union: BTreeSet<_> = status.tracked.union(&status.untracked).cloned().collect();
        let expected: BTreeSet<_> = ["one.txt", "three.txt", "two.txt"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(union, expected);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();

        let first = compute_status(dir.path(), ["a.txt"]).unwrap();
        let second = compute_status(dir.path(), ["a.txt"]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn tracked_set_is_kept_even_for_missing_files() {
        let dir = TempDir::new().unwrap();
        init_repo(dir.path());

        // Recorded in the index but deleted from disk: still tracked
        let status = compute_status(dir.path(), ["gone.txt"]).unwrap();
        assert_eq!(
            status.tracked.iter().collect::<Vec<_>>(),
            vec!["gone.txt"]
        );
        assert!(status.untracked.is_empty());
    }

    #[test]
    fn plain_directory_is_not_a_repository() {
        let dir = TempDir::new().unwrap();
        let err = compute_status(dir.path(), no_tracked()).unwrap_err();
        assert!(matches!(err, StatusError::NotARepository(_)));
    }

    #[test]
    fn index_paths_and_walk_paths_normalize_identically() {
        let dir = TempDir::new().unwrap();
        let repo = init_repo(dir.path());
        fs::create_dir(dir.path().join("dir")).unwrap();
        fs::write(dir.path().join("dir/c.txt"), "c").unwrap();
        repo.stage(&["dir/c.txt".into()]).unwrap();

        // The index stores raw bytes; tracked_paths decodes them once, and
        // the walk side must land on the same canonical string.
        let status = repository_status(&repo).unwrap();
        assert_eq!(
            status.tracked.iter().collect::<Vec<_>>(),
            vec!["dir/c.txt"]
        );
        assert!(status.untracked.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_working_tree_path_is_an_encoding_mismatch() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        init_repo(dir.path());
        let name = OsStr::from_bytes(b"bad-\xff.txt");
        fs::write(dir.path().join(name), "x").unwrap();

        let err = compute_status(dir.path(), no_tracked()).unwrap_err();
        assert!(matches!(err, StatusError::EncodingMismatch(_)));
    }
}

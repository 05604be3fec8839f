//! Local repository access using git2-rs.

pub mod tags;

use std::path::Path;
use std::sync::Mutex;

use git2::Repository;

use crate::error::GitError;

pub use tags::{TagInfo, get_last_release_tag, get_version_from_tag};

/// The version-control collaborator.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs: Send + Sync {
    /// Name of the last release tag reachable from HEAD.
    fn last_tag(&self) -> Result<String, GitError>;
}

/// A git repository on disk.
pub struct GitRepository {
    // git2::Repository is Send but not Sync.
    repo: Mutex<Repository>,
}

impl GitRepository {
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::open(path).map_err(GitError::OpenRepository)?;
        Ok(Self {
            repo: Mutex::new(repo),
        })
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Repository) -> T) -> T {
        let guard = self
            .repo
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }

    /// URL of the `origin` remote.
    pub fn origin_url(&self) -> Result<Option<String>, GitError> {
        self.with_repo(|repo| {
            let remote = repo
                .find_remote("origin")
                .map_err(|e| GitError::RemoteNotFound("origin".to_string(), e))?;
            Ok(remote.url().map(String::from))
        })
    }
}

impl Vcs for GitRepository {
    fn last_tag(&self) -> Result<String, GitError> {
        self.with_repo(get_last_release_tag)?
            .map(|tag| tag.name)
            .ok_or(GitError::NoTag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GitRepository::open(dir.path()),
            Err(GitError::OpenRepository(_))
        ));
    }

    #[test]
    fn test_last_tag_without_tags() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let repo = GitRepository::open(dir.path()).unwrap();
        assert!(matches!(repo.last_tag(), Err(GitError::NoTag)));
    }

    #[test]
    fn test_origin_url() {
        let dir = tempfile::tempdir().unwrap();
        let raw = Repository::init(dir.path()).unwrap();
        raw.remote("origin", "git@github.com:owner/repo.git").unwrap();

        let repo = GitRepository::open(dir.path()).unwrap();
        assert_eq!(
            repo.origin_url().unwrap().as_deref(),
            Some("git@github.com:owner/repo.git")
        );
    }
}

//! The remote API seam: everything the pipeline asks of GitHub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::changelog::PullRequest;
use crate::error::GitHubError;
use crate::labels::LabelSpec;

/// A label as it currently exists on the remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteLabel {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A release to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelease {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
}

/// Issue/PR/release operations consumed by the pipeline.
///
/// All list operations return fully paginated results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn list_labels(&self) -> Result<Vec<RemoteLabel>, GitHubError>;

    /// Create a label. Fails with [`GitHubError::LabelAlreadyExists`] if the
    /// name is taken.
    async fn create_label(&self, label: &LabelSpec) -> Result<(), GitHubError>;

    /// Rename/recolor the label currently called `existing_name` in place.
    async fn update_label(&self, existing_name: &str, label: &LabelSpec)
    -> Result<(), GitHubError>;

    /// Merged pull requests associated with commits after `tag`.
    ///
    /// May contain the same PR more than once.
    async fn merged_pull_requests_since(&self, tag: &str)
    -> Result<Vec<PullRequest>, GitHubError>;

    async fn create_release(&self, release: &NewRelease) -> Result<(), GitHubError>;
}

//! Fetch merged pull requests since a tag and classify them.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{LabelKind, Taxonomy};
use crate::error::{LabelError, ReleaseError};
use crate::github::RemoteApi;
use crate::labels::parse_label;

use super::types::{Change, PullRequest, severity};

/// Classify one pull request from its labels.
///
/// Returns `Ok(None)` when no change-type label is present. When several
/// change-type labels are present, the most severe wins.
pub fn classify(taxonomy: &Taxonomy, pr: PullRequest) -> Result<Option<Change>, LabelError> {
    let mut kind: Option<String> = None;
    let mut scopes: Vec<String> = Vec::new();

    for raw in &pr.labels {
        let Some(label) = parse_label(taxonomy, raw)? else {
            continue;
        };

        match label.kind() {
            LabelKind::ChangeType => {
                let more_severe = kind
                    .as_deref()
                    .is_none_or(|current| severity(taxonomy, label.key()) < severity(taxonomy, current));
                if more_severe {
                    kind = Some(label.key().to_string());
                }
            }
            LabelKind::Scope => {
                if !scopes.iter().any(|s| s == label.key()) {
                    scopes.push(label.key().to_string());
                }
            }
        }
    }

    Ok(kind.map(|kind| Change {
        pull_request: pr,
        kind,
        scopes,
    }))
}

/// Turns the remote's merged pull requests into classified changes.
#[derive(Clone)]
pub struct ChangeFetcher {
    taxonomy: Arc<Taxonomy>,
    remote: Arc<dyn RemoteApi>,
}

impl ChangeFetcher {
    pub fn new(taxonomy: Arc<Taxonomy>, remote: Arc<dyn RemoteApi>) -> Self {
        Self { taxonomy, remote }
    }

    /// Classified changes merged since `tag`, ordered by PR number.
    ///
    /// Pull requests without a change-type label are dropped. Any label
    /// error aborts the fetch.
    pub async fn changes_since(&self, tag: &str) -> Result<Vec<Change>, ReleaseError> {
        let pulls = self.remote.merged_pull_requests_since(tag).await?;
        let fetched = pulls.len();

        let mut unique: BTreeMap<u64, PullRequest> = BTreeMap::new();
        for pr in pulls {
            unique.entry(pr.number).or_insert(pr);
        }

        let mut changes = Vec::with_capacity(unique.len());
        for (number, pr) in unique {
            match classify(&self.taxonomy, pr)
                .map_err(|source| ReleaseError::Classification { number, source })?
            {
                Some(change) => changes.push(change),
                None => debug!(number, "Skipping PR without a change-type label"),
            }
        }

        info!(fetched, classified = changes.len(), %tag, "Fetched changes");
        Ok(changes)
    }
}

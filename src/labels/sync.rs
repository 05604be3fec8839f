//! Reconcile the remote label set with the canonical labels of the taxonomy.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::Taxonomy;
use crate::error::{GitHubError, ReleaseError};
use crate::github::{RemoteApi, RemoteLabel};

use super::codec::{LabelSpec, canonical_labels, parse_label};

/// What to do for one canonical label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// No remote label resolves to this key.
    Create(LabelSpec),
    /// A remote label resolves to this key but is spelled, colored or
    /// described differently. Renamed in place to keep PR associations.
    Update { existing: String, spec: LabelSpec },
    /// Already canonical.
    Unchanged(LabelSpec),
}

impl SyncAction {
    pub fn spec(&self) -> &LabelSpec {
        match self {
            Self::Create(spec) | Self::Unchanged(spec) => spec,
            Self::Update { spec, .. } => spec,
        }
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(spec) => write!(f, "[CREATE] {} (#{})", spec.name, spec.color),
            Self::Update { existing, spec } => {
                write!(f, "[UPDATE] {} -> {} (#{})", existing, spec.name, spec.color)
            }
            Self::Unchanged(spec) => write!(f, "[OK] {}", spec.name),
        }
    }
}

/// Outcome of applying a set of actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    /// Creates that lost a race with a concurrent run.
    pub already_present: Vec<String>,
    pub unchanged: usize,
}

enum Applied {
    Created(String),
    Updated(String),
    AlreadyPresent(String),
    Unchanged,
}

fn normalize_color(color: &str) -> String {
    color.trim().trim_start_matches('#').to_uppercase()
}

fn is_canonical(remote: &RemoteLabel, spec: &LabelSpec) -> bool {
    remote.name == spec.name
        && normalize_color(&remote.color) == normalize_color(&spec.color)
        && remote.description.as_deref().unwrap_or("") == spec.description
}

/// Decide the action for every canonical label.
///
/// Pure: the same inputs always produce the same plan.
pub fn plan_sync(
    taxonomy: &Taxonomy,
    canonical: &[LabelSpec],
    remote: &[RemoteLabel],
) -> Vec<SyncAction> {
    let classified: Vec<(&RemoteLabel, LabelSpec)> = remote
        .iter()
        .filter_map(|label| match parse_label(taxonomy, &label.name) {
            Ok(Some(parsed)) => Some((label, parsed.spec)),
            Ok(None) => None,
            Err(e) => {
                warn!(label = %label.name, error = %e, "Skipping remote label outside the taxonomy");
                None
            }
        })
        .collect();

    canonical
        .iter()
        .map(|spec| {
            let candidates: Vec<&RemoteLabel> = classified
                .iter()
                .filter(|(_, parsed)| parsed.kind == spec.kind && parsed.key == spec.key)
                .map(|(label, _)| *label)
                .collect();

            // Prefer the label already carrying the canonical name; renaming
            // another spelling onto it would collide.
            let target = candidates
                .iter()
                .find(|label| label.name == spec.name)
                .or_else(|| candidates.first());

            match target {
                None => SyncAction::Create(spec.clone()),
                Some(label) if is_canonical(label, spec) => SyncAction::Unchanged(spec.clone()),
                Some(label) => SyncAction::Update {
                    existing: label.name.clone(),
                    spec: spec.clone(),
                },
            }
        })
        .collect()
}

/// Applies label plans against the remote.
#[derive(Clone)]
pub struct LabelSynchronizer {
    remote: Arc<dyn RemoteApi>,
}

impl LabelSynchronizer {
    pub fn new(remote: Arc<dyn RemoteApi>) -> Self {
        Self { remote }
    }

    /// List the remote labels and plan against the taxonomy.
    pub async fn plan(&self, taxonomy: &Taxonomy) -> Result<Vec<SyncAction>, ReleaseError> {
        let remote = self.remote.list_labels().await?;
        debug!(count = remote.len(), "Listed remote labels");
        Ok(plan_sync(taxonomy, &canonical_labels(taxonomy), &remote))
    }

    /// Apply every action concurrently and wait for all of them.
    ///
    /// Each action targets a distinct key, so no two mutations race on the
    /// same label within a run. A create rejected because the label already
    /// exists counts as success.
    pub async fn apply(&self, actions: &[SyncAction]) -> Result<SyncReport, ReleaseError> {
        let results = join_all(actions.iter().map(|action| self.apply_one(action))).await;

        let total = results.len();
        let mut report = SyncReport::default();
        let mut errors: Vec<GitHubError> = Vec::new();

        for result in results {
            match result {
                Ok(Applied::Created(name)) => report.created.push(name),
                Ok(Applied::Updated(name)) => report.updated.push(name),
                Ok(Applied::AlreadyPresent(name)) => report.already_present.push(name),
                Ok(Applied::Unchanged) => report.unchanged += 1,
                Err(e) => {
                    warn!(error = %e, "Label operation failed");
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            let failed = errors.len();
            return Err(ReleaseError::LabelSync {
                failed,
                total,
                first: Box::new(errors.swap_remove(0)),
            });
        }

        info!(
            created = report.created.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged,
            "Labels synchronized"
        );
        Ok(report)
    }

    /// Plan and apply in one step.
    pub async fn sync(&self, taxonomy: &Taxonomy) -> Result<SyncReport, ReleaseError> {
        let actions = self.plan(taxonomy).await?;
        self.apply(&actions).await
    }

    async fn apply_one(&self, action: &SyncAction) -> Result<Applied, GitHubError> {
        match action {
            SyncAction::Create(spec) => match self.remote.create_label(spec).await {
                Ok(()) => Ok(Applied::Created(spec.name.clone())),
                Err(GitHubError::LabelAlreadyExists(name)) => {
                    debug!(label = %name, "Label created concurrently");
                    Ok(Applied::AlreadyPresent(name))
                }
                Err(e) => Err(e),
            },
            SyncAction::Update { existing, spec } => {
                self.remote.update_label(existing, spec).await?;
                Ok(Applied::Updated(spec.name.clone()))
            }
            SyncAction::Unchanged(_) => Ok(Applied::Unchanged),
        }
    }
}

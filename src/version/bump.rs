//! Decide the release policy and drive the version bump.

use std::sync::Arc;

use tracing::info;

use crate::changelog::Change;
use crate::error::{ModuleError, ReleaseError};

use super::module::VersionModule;

/// How the next version is derived from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPolicy {
    Normal,
    Breaking,
}

impl BumpPolicy {
    pub fn from_breaking(breaking: bool) -> Self {
        if breaking { Self::Breaking } else { Self::Normal }
    }
}

/// True iff any change has a breaking kind. Scopes never matter.
pub fn is_breaking(changes: &[Change]) -> bool {
    changes.iter().any(Change::is_breaking)
}

/// Strip one leading `v`.
pub fn strip_v(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

pub fn versions_match(tag: &str, declared: &str) -> bool {
    strip_v(tag) == strip_v(declared)
}

/// Fail unless the last tag is the currently declared version.
pub fn ensure_versions_match(tag: &str, declared: &str) -> Result<(), ReleaseError> {
    if versions_match(tag, declared) {
        Ok(())
    } else {
        Err(ReleaseError::VersionMismatch {
            tag: tag.to_string(),
            declared: declared.to_string(),
        })
    }
}

/// Asks the version module for the next version under a policy.
#[derive(Clone)]
pub struct BumpResolver {
    module: Arc<dyn VersionModule>,
}

impl BumpResolver {
    pub fn new(module: Arc<dyn VersionModule>) -> Self {
        Self { module }
    }

    /// Bump, then read the resulting version back.
    pub async fn next_version(&self, breaking: bool) -> Result<String, ModuleError> {
        let policy = BumpPolicy::from_breaking(breaking);
        self.module.bump(policy).await?;
        let version = self.module.version().await?;
        info!(?policy, %version, "Bumped version");
        Ok(version)
    }
}

//! The release pipeline: version check, fetch, bump, render, publish.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::changelog::{Change, ChangeFetcher, Renderer, write_changelog};
use crate::config::{Config, RunContext, Taxonomy};
use crate::error::ReleaseError;
use crate::git::{GitRepository, Vcs};
use crate::github::{GitHubClient, NewRelease, RemoteApi};
use crate::labels::{LabelSynchronizer, SyncAction, SyncReport};
use crate::version::{
    BumpResolver, VersionModule, ensure_versions_match, is_breaking, setup_module, strip_v,
};

/// Result of a changelog run.
#[derive(Debug, Clone)]
pub struct ReleaseNotes {
    pub previous_tag: String,
    /// Version after the bump.
    pub version: String,
    pub breaking: bool,
    pub changes: Vec<Change>,
    /// Rendered markdown document.
    pub body: String,
}

impl ReleaseNotes {
    /// Tag for the new release, `v`-prefixed iff the previous tag was.
    pub fn tag_name(&self) -> String {
        let version = strip_v(&self.version);
        if self.previous_tag.starts_with('v') {
            format!("v{}", version)
        } else {
            version.to_string()
        }
    }
}

/// Release orchestrator.
///
/// Owns the pipeline stages and the three collaborators; built once per run.
pub struct Relasy {
    taxonomy: Arc<Taxonomy>,
    vcs: Arc<dyn Vcs>,
    module: Arc<dyn VersionModule>,
    remote: Arc<dyn RemoteApi>,
    fetcher: ChangeFetcher,
    renderer: Renderer,
    resolver: BumpResolver,
    labels: LabelSynchronizer,
}

impl Relasy {
    pub fn new(
        taxonomy: Taxonomy,
        vcs: Arc<dyn Vcs>,
        module: Arc<dyn VersionModule>,
        remote: Arc<dyn RemoteApi>,
    ) -> Self {
        let taxonomy = Arc::new(taxonomy);
        Self {
            fetcher: ChangeFetcher::new(Arc::clone(&taxonomy), Arc::clone(&remote)),
            renderer: Renderer::new(Arc::clone(&taxonomy)),
            resolver: BumpResolver::new(Arc::clone(&module)),
            labels: LabelSynchronizer::new(Arc::clone(&remote)),
            taxonomy,
            vcs,
            module,
            remote,
        }
    }

    /// Wire the real collaborators for a workspace.
    pub fn load(ctx: &RunContext, config: &Config) -> Result<Self, ReleaseError> {
        let repository = GitRepository::open(&ctx.workspace)?;

        let origin = match &config.gh {
            Some(_) => None,
            // A missing origin is reported as MissingRepository below.
            None => repository.origin_url().ok().flatten(),
        };
        let (owner, repo) = config.repository(origin.as_deref())?;
        debug!(%owner, %repo, "Resolved target repository");

        let remote = GitHubClient::new(&ctx.token, &owner, &repo)?;
        let module = setup_module(&config.manager, &ctx.workspace);

        Ok(Self::new(
            config.taxonomy.clone(),
            Arc::new(repository),
            module,
            Arc::new(remote),
        ))
    }

    /// Compute the next release's notes.
    ///
    /// Fails with [`ReleaseError::VersionMismatch`] before any remote call
    /// when the last tag is not the declared version. Bumps the declared
    /// version as a side effect.
    pub async fn changelog(&self) -> Result<ReleaseNotes, ReleaseError> {
        let previous_tag = self.vcs.last_tag()?;
        let declared = self.module.version().await?;
        ensure_versions_match(&previous_tag, &declared)?;
        info!(tag = %previous_tag, "Generating changelog");

        let changes = self.fetcher.changes_since(&previous_tag).await?;
        let breaking = is_breaking(&changes);
        let version = self.resolver.next_version(breaking).await?;
        let body = self.renderer.render(&version, &changes);

        Ok(ReleaseNotes {
            previous_tag,
            version,
            breaking,
            changes,
            body,
        })
    }

    /// Generate the notes and write them to `<dir>/<name>.md`.
    pub async fn write_changelog(
        &self,
        dir: &Path,
        name: &str,
    ) -> Result<(ReleaseNotes, PathBuf), ReleaseError> {
        let notes = self.changelog().await?;
        let path = write_changelog(dir, name, &notes.body)?;
        info!(path = %path.display(), "Changelog written");
        Ok((notes, path))
    }

    /// Generate the notes and publish them as a draft release.
    pub async fn release(&self) -> Result<ReleaseNotes, ReleaseError> {
        let notes = self.changelog().await?;
        let release = NewRelease {
            tag_name: notes.tag_name(),
            name: notes.version.clone(),
            body: notes.body.clone(),
            draft: true,
        };
        self.remote.create_release(&release).await?;
        info!(tag = %release.tag_name, "Draft release created");
        Ok(notes)
    }

    /// Planned label actions, without mutating the remote.
    pub async fn plan_labels(&self) -> Result<Vec<SyncAction>, ReleaseError> {
        self.labels.plan(&self.taxonomy).await
    }

    /// Bring the remote label set in line with the taxonomy.
    pub async fn sync_labels(&self) -> Result<SyncReport, ReleaseError> {
        self.labels.sync(&self.taxonomy).await
    }
}

//! relasy - Generate release notes and draft GitHub releases from labeled pull requests.
//!
//! # Overview
//!
//! relasy classifies the pull requests merged since the last release tag by
//! their labels, bumps the project version (major when any change is
//! breaking), renders a markdown changelog grouped by change type and scope,
//! and publishes it as a draft GitHub release. It also keeps the repository's
//! label set canonical so the classification stays reliable.

pub mod changelog;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod labels;
pub mod release;
pub mod version;

// Re-export commonly used types
pub use changelog::{Change, PullRequest, Renderer};
pub use config::{Config, LabelKind, Manager, RunContext, Taxonomy};
pub use error::{
    ChangelogError, ConfigError, GitError, GitHubError, LabelError, ModuleError, ReleaseError,
};
pub use labels::{LabelSpec, SyncAction, SyncReport};
pub use release::{Relasy, ReleaseNotes};
pub use version::BumpPolicy;

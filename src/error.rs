//! Error types for relasy modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading the taxonomy/configuration or building the run context.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration must declare at least one entry in changeTypes")]
    EmptyChangeTypes,

    #[error("Invalid {section} key '{key}': keys must be non-empty and contain no '/', ':' or whitespace")]
    InvalidKey { section: &'static str, key: String },

    #[error("Missing long name for {section} key '{key}'")]
    EmptyLongName { section: &'static str, key: String },

    #[error("Invalid repository '{0}': expected the form owner/repo")]
    InvalidRepository(String),

    #[error("Could not determine the GitHub repository: set \"gh\" in the configuration or add a GitHub 'origin' remote")]
    MissingRepository,

    #[error("Missing GITHUB_TOKEN (or GITHUB_API_TOKEN / GH_TOKEN), and 'gh auth token' is unavailable")]
    MissingToken,

    #[error("Failed to determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),
}

/// Errors from parsing a label against the taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("invalid label \"{label}\": too many separators for this label, only one of '/', ':' or whitespace is allowed")]
    TooManySeparators { label: String },

    #[error("invalid label {label}. key {key} could not be found on object with fields: {}", available.join(", "))]
    UnknownKey {
        label: String,
        key: String,
        available: Vec<String>,
    },
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("No release tag reachable from HEAD. Tag the current release (e.g. v0.1.0) first.")]
    NoTag,

    #[error("Failed to find remote '{0}': {1}")]
    RemoteNotFound(String, #[source] git2::Error),
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("GitHub request failed ({operation}): {source}")]
    Request {
        operation: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Label '{0}' already exists")]
    LabelAlreadyExists(String),

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Tag '{0}' not found on GitHub. Push it with 'git push origin {0}'.")]
    TagNotFound(String),

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Failed to parse repository URL")]
    InvalidRepositoryUrl,
}

/// Errors from the project's version manager (npm, cargo, or custom commands).
#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("'{0}' was not found on PATH")]
    ToolNotFound(String),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to read {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("No version declared in {0}")]
    MissingVersion(PathBuf),

    #[error("Failed to parse version '{0}': {1}")]
    InvalidVersion(String, #[source] semver::Error),

    #[error("Failed to write {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Version command printed nothing")]
    EmptyVersion,
}

/// Errors from changelog file operations.
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to write changelog {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors surfaced by the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error(transparent)]
    Module(#[from] ModuleError),

    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    #[error("versions does not match: {tag} {declared}")]
    VersionMismatch { tag: String, declared: String },

    #[error("PR #{number}: {source}")]
    Classification {
        number: u64,
        #[source]
        source: LabelError,
    },

    #[error("{failed} of {total} label operations failed, first error: {first}")]
    LabelSync {
        failed: usize,
        total: usize,
        #[source]
        first: Box<GitHubError>,
    },
}

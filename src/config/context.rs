//! Immutable per-run context built once at startup.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;
use crate::github::auth::get_github_token;

/// Environment variable naming the checked-out repository in CI.
const WORKSPACE_ENV_VAR: &str = "GITHUB_WORKSPACE";

/// Credentials and working directory for a single run.
///
/// Built from the process environment without mutating it.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub token: String,
    pub workspace: PathBuf,
}

impl RunContext {
    pub fn new(token: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            token: token.into(),
            workspace: workspace.into(),
        }
    }

    /// Build the context from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = get_github_token().map_err(|_| ConfigError::MissingToken)?;
        let workspace = resolve_workspace()?;
        debug!(workspace = %workspace.display(), "Resolved workspace");
        Ok(Self { token, workspace })
    }

    /// Resolve a path relative to the workspace root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }
}

fn resolve_workspace() -> Result<PathBuf, ConfigError> {
    match env::var(WORKSPACE_ENV_VAR) {
        Ok(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => env::current_dir().map_err(ConfigError::WorkingDirectory),
    }
}

//! GitHub token discovery.
//!
//! Order:
//! 1. GITHUB_TOKEN env var
//! 2. GITHUB_API_TOKEN env var
//! 3. GH_TOKEN env var
//! 4. `gh auth token` (gh CLI)

use std::env;
use std::process::Command;

use crate::error::GitHubError;

/// Environment variables checked for a token, in priority order.
pub const TOKEN_ENV_VARS: [&str; 3] = ["GITHUB_TOKEN", "GITHUB_API_TOKEN", "GH_TOKEN"];

/// Get a GitHub token from the environment or the gh CLI.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = get_token_from_env() {
        return Ok(token);
    }

    get_token_from_gh_cli().ok_or(GitHubError::AuthenticationFailed)
}

fn get_token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|token| !token.is_empty())
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

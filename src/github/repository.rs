//! Owner/repo extraction from git remote URLs.

use crate::error::GitHubError;

/// Extract owner and repo from a git remote URL.
pub fn parse_github_remote(url: &str) -> Result<(String, String), GitHubError> {
    // Handle SSH format: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path);
    }

    // Handle HTTPS format: https://github.com/owner/repo.git
    if url.contains("github.com/") {
        let path = url
            .split("github.com/")
            .nth(1)
            .ok_or(GitHubError::InvalidRepositoryUrl)?;
        return parse_owner_repo_path(path);
    }

    Err(GitHubError::InvalidRepositoryUrl)
}

fn parse_owner_repo_path(path: &str) -> Result<(String, String), GitHubError> {
    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');

    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(GitHubError::InvalidRepositoryUrl),
    }
}

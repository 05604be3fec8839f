//! Release tag lookup.

use std::collections::HashMap;

use git2::Repository;
use semver::Version;
use tracing::{debug, warn};

use crate::error::GitError;

/// A git tag resolved to the commit it points at.
#[derive(Debug, Clone)]
pub struct TagInfo {
    pub name: String,
    pub oid: git2::Oid,
    pub version: Option<Version>,
}

/// Extract semver version from a tag name.
/// Handles both "v1.2.3" and "1.2.3" formats.
pub fn get_version_from_tag(tag_name: &str) -> Option<Version> {
    let version_str = tag_name.strip_prefix('v').unwrap_or(tag_name);
    Version::parse(version_str).ok()
}

/// Get all tags from the repository.
pub fn get_all_tags(repo: &Repository) -> Result<Vec<TagInfo>, GitError> {
    let mut tags = Vec::new();

    repo.tag_foreach(|oid, name_bytes| {
        if let Ok(name_str) = std::str::from_utf8(name_bytes) {
            let name = name_str
                .strip_prefix("refs/tags/")
                .unwrap_or(name_str)
                .to_string();

            // Annotated tags point at a tag object; peel to the commit.
            let resolved_oid = match repo.find_tag(oid) {
                Ok(tag_obj) => tag_obj.target_id(),
                Err(_) => oid,
            };

            tags.push(TagInfo {
                version: get_version_from_tag(&name),
                name,
                oid: resolved_oid,
            });
        } else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
        }
        true
    })
    .map_err(GitError::RevwalkError)?;

    Ok(tags)
}

/// The release tag nearest to HEAD.
///
/// Walks commits reachable from `HEAD` and returns the first one carrying a
/// version tag (`vX.Y.Z` or `X.Y.Z`, pre-releases included). When a commit
/// carries several, the highest version wins.
pub fn get_last_release_tag(repo: &Repository) -> Result<Option<TagInfo>, GitError> {
    let head_oid = match repo.head().ok().and_then(|head| head.target()) {
        Some(oid) => oid,
        None => return Ok(None),
    };

    let mut tags_by_commit: HashMap<git2::Oid, Vec<TagInfo>> = HashMap::new();
    for tag in get_all_tags(repo)?
        .into_iter()
        .filter(|tag| tag.version.is_some())
    {
        tags_by_commit.entry(tag.oid).or_default().push(tag);
    }

    if tags_by_commit.is_empty() {
        debug!("No version tags found in repository");
        return Ok(None);
    }

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk.push(head_oid).map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    for oid in revwalk {
        let oid = oid.map_err(GitError::RevwalkError)?;
        if let Some(candidates) = tags_by_commit.get(&oid) {
            let latest = candidates
                .iter()
                .max_by(|a, b| a.version.cmp(&b.version))
                .cloned();
            if let Some(tag) = latest {
                debug!(tag = %tag.name, "Found last release tag");
                return Ok(Some(tag));
            }
        }
    }

    Ok(None)
}

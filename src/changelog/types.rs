//! Pull requests, classified changes and change-kind severity.

use serde::{Deserialize, Serialize};

use crate::config::Taxonomy;

/// Well-known change kinds, most severe first.
///
/// Any other configured change type ranks after these, in taxonomy
/// declaration order.
pub const SEVERITY_ORDER: [&str; 6] = ["breaking", "major", "feature", "fix", "minor", "chore"];

/// Change kinds that force a breaking (major) release.
pub const BREAKING_KINDS: [&str; 2] = ["breaking", "major"];

/// A merged pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub author: String,
    pub labels: Vec<String>,
}

/// A pull request with its resolved change kind and scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub pull_request: PullRequest,
    /// Change-type key from the taxonomy.
    pub kind: String,
    /// Scope keys in order of first appearance, without duplicates.
    pub scopes: Vec<String>,
}

impl Change {
    pub fn number(&self) -> u64 {
        self.pull_request.number
    }

    pub fn is_breaking(&self) -> bool {
        BREAKING_KINDS.contains(&self.kind.as_str())
    }
}

/// Total order over change-type keys; lower is more severe.
pub fn severity(taxonomy: &Taxonomy, kind: &str) -> (usize, usize) {
    match SEVERITY_ORDER.iter().position(|k| *k == kind) {
        Some(rank) => (rank, 0),
        None => (
            SEVERITY_ORDER.len(),
            taxonomy
                .change_types
                .get_index_of(kind)
                .unwrap_or(usize::MAX),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        let mut t = Taxonomy::default();
        for key in ["perf", "chore", "fix", "docs", "breaking", "feature"] {
            t.change_types.insert(key.into(), key.into());
        }

        let mut keys: Vec<&str> = t.change_types.keys().map(String::as_str).collect();
        keys.sort_by_key(|k| severity(&t, k));
        assert_eq!(keys, vec!["breaking", "feature", "fix", "chore", "perf", "docs"]);
    }

    #[test]
    fn test_breaking_kinds() {
        let change = |kind: &str| Change {
            pull_request: PullRequest {
                number: 1,
                title: "t".into(),
                body: None,
                author: "a".into(),
                labels: vec![],
            },
            kind: kind.into(),
            scopes: vec![],
        };
        assert!(change("breaking").is_breaking());
        assert!(change("major").is_breaking());
        assert!(!change("feature").is_breaking());
    }
}

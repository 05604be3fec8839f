//! Render classified changes as a markdown release-notes document.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{LabelKind, Taxonomy};

use super::types::{Change, severity};

/// Heading for changes without a scope.
pub const UNSCOPED_HEADING: &str = "Other";

/// Body line for a release without classified changes.
pub const EMPTY_BODY: &str = "No notable changes.";

/// Pure changelog renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    taxonomy: Arc<Taxonomy>,
}

/// Bucket key: scoped buckets (`false`) sort before the unscoped one, then
/// by scope positions in the taxonomy.
type ScopeKey = (bool, Vec<(usize, String)>);

impl Renderer {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    fn scope_key(&self, change: &Change) -> ScopeKey {
        let mut scopes: Vec<(usize, String)> = change
            .scopes
            .iter()
            .map(|s| {
                let position = self.taxonomy.scopes.get_index_of(s).unwrap_or(usize::MAX);
                (position, s.clone())
            })
            .collect();
        scopes.sort();
        scopes.dedup();
        (scopes.is_empty(), scopes)
    }

    fn scope_heading(&self, scopes: &[(usize, String)]) -> String {
        if scopes.is_empty() {
            return UNSCOPED_HEADING.to_string();
        }
        scopes
            .iter()
            .map(|(_, key)| self.taxonomy.long_name(LabelKind::Scope, key))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the release notes for `version`.
    ///
    /// Output depends only on the set of changes, not on their order.
    pub fn render(&self, version: &str, changes: &[Change]) -> String {
        let mut doc = format!("# {}\n\n", version);

        if changes.is_empty() {
            doc.push_str(EMPTY_BODY);
            doc.push('\n');
            return doc;
        }

        let mut by_kind: BTreeMap<((usize, usize), &str), BTreeMap<ScopeKey, Vec<&Change>>> =
            BTreeMap::new();
        for change in changes {
            by_kind
                .entry((severity(&self.taxonomy, &change.kind), change.kind.as_str()))
                .or_default()
                .entry(self.scope_key(change))
                .or_default()
                .push(change);
        }

        for ((_, kind), buckets) in by_kind {
            doc.push_str(&format!(
                "## {}\n\n",
                self.taxonomy.long_name(LabelKind::ChangeType, kind)
            ));

            for ((_, scopes), mut entries) in buckets {
                entries.sort_by_key(|c| c.number());

                doc.push_str(&format!("### {}\n\n", self.scope_heading(&scopes)));
                for change in entries {
                    doc.push_str(&format_entry(change));
                }
                doc.push('\n');
            }
        }

        doc
    }
}

fn format_entry(change: &Change) -> String {
    let pr = &change.pull_request;
    format!("- {} (#{}) @{}\n", pr.title.trim(), pr.number, pr.author)
}

//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use octocrab::Octocrab;
use relasy::Taxonomy;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Helper to create an octocrab client pointing to a mock server.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// Taxonomy used across integration tests.
pub fn taxonomy() -> Taxonomy {
    let mut t = Taxonomy::default();
    t.change_types.insert("breaking".into(), "Breaking Change".into());
    t.change_types.insert("feature".into(), "Feature".into());
    t.change_types.insert("fix".into(), "Bug Fix".into());
    t.scopes.insert("core".into(), "Core".into());
    t.scopes.insert("cli".into(), "CLI".into());
    t
}

/// A pull request as returned by `GET /repos/{o}/{r}/commits/{sha}/pulls`.
pub fn mock_pull(number: u64, labels: &[&str], merged: bool, base_repo: &str) -> Value {
    json!({
        "number": number,
        "title": format!("PR #{}", number),
        "body": null,
        "user": { "login": "octocat" },
        "labels": labels.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "merged_at": if merged { json!("2026-01-15T10:00:00Z") } else { Value::Null },
        "base": { "repo": { "full_name": base_repo } },
    })
}

/// A compare response page listing `shas`.
pub fn mock_compare(total_commits: usize, shas: &[&str]) -> Value {
    json!({
        "total_commits": total_commits,
        "commits": shas.iter().map(|sha| json!({ "sha": sha })).collect::<Vec<_>>(),
    })
}

/// A label as returned by `GET /repos/{o}/{r}/labels`.
pub fn mock_label(name: &str, color: &str) -> Value {
    json!({
        "id": 1,
        "name": name,
        "color": color,
        "description": null,
        "default": false,
    })
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Create a commit with the given message. Returns the commit OID.
    pub fn commit(&self, message: &str) -> Oid {
        let sig = self.signature();

        let file_path = self.dir.path().join("test.txt");
        std::fs::write(&file_path, message).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new("test.txt"))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Create a lightweight tag pointing to the given commit.
    pub fn tag(&self, name: &str, oid: Oid) {
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag_lightweight(name, &obj, false)
            .expect("Failed to create tag");
    }

    /// Create an annotated tag pointing to the given commit.
    pub fn annotated_tag(&self, name: &str, oid: Oid) {
        let obj = self.repo.find_object(oid, None).expect("Failed to find object");
        self.repo
            .tag(name, &obj, &self.signature(), name, false)
            .expect("Failed to create annotated tag");
    }

    /// Point `origin` at a URL.
    pub fn set_origin(&self, url: &str) {
        self.repo.remote("origin", url).expect("Failed to add remote");
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

//! Integration tests for the GitHub client against a mocked REST API.

mod common;

use common::{mock_client, mock_compare, mock_label, mock_pull};
use relasy::error::GitHubError;
use relasy::github::{GitHubClient, NewRelease, RemoteApi};
use relasy::labels::build_label;
use relasy::LabelKind;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::with_client(mock_client(server).await, "owner", "repo")
}

#[tokio::test]
async fn test_list_labels_follows_pagination() {
    let server = MockServer::start().await;

    let first_page: Vec<_> = (0..100)
        .map(|i| mock_label(&format!("label-{}", i), "ffffff"))
        .collect();
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first_page))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(vec![mock_label("✨ feature", "0E8A16")]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let labels = client(&server).await.list_labels().await.unwrap();
    assert_eq!(labels.len(), 101);
    assert_eq!(labels[100].name, "✨ feature");
    assert_eq!(labels[100].description, None);
}

#[tokio::test]
async fn test_create_label_posts_canonical_spec() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/labels"))
        .and(body_partial_json(json!({
            "name": "🐛 fix",
            "color": "1D76DB",
            "description": "Label for versioning: Bug Fix",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(mock_label("🐛 fix", "1D76DB")))
        .expect(1)
        .mount(&server)
        .await;

    let spec = build_label(LabelKind::ChangeType, "fix", "Bug Fix");
    client(&server).await.create_label(&spec).await.unwrap();
}

#[tokio::test]
async fn test_create_label_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{ "resource": "Label", "code": "already_exists", "field": "name" }],
            "documentation_url": "https://docs.github.com/rest/issues/labels#create-a-label",
        })))
        .mount(&server)
        .await;

    let spec = build_label(LabelKind::Scope, "core", "Core");
    match client(&server).await.create_label(&spec).await {
        Err(GitHubError::LabelAlreadyExists(name)) => assert_eq!(name, spec.name),
        other => panic!("expected LabelAlreadyExists, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_label_targets_existing_name() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"^/repos/owner/repo/labels/type(%2F|/)major$"))
        .and(body_partial_json(json!({
            "new_name": "🚨 major",
            "color": "B60205",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_label("🚨 major", "B60205")))
        .expect(1)
        .mount(&server)
        .await;

    let spec = build_label(LabelKind::ChangeType, "major", "Major Change");
    client(&server)
        .await
        .update_label("type/major", &spec)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_merged_pull_requests_since_tag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/compare/v1.0.0...HEAD"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_compare(2, &["aaa111", "bbb222"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/aaa111/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            mock_pull(42, &["feature", "scope/core"], true, "owner/repo"),
            // Same commit merged into a fork.
            mock_pull(7, &["fix"], true, "someone/fork"),
        ]))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/commits/bbb222/pulls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![
            mock_pull(42, &["feature", "scope/core"], true, "owner/repo"),
            mock_pull(43, &["fix"], false, "owner/repo"),
        ]))
        .mount(&server)
        .await;

    let mut pulls = client(&server)
        .await
        .merged_pull_requests_since("v1.0.0")
        .await
        .unwrap();
    pulls.sort_by_key(|pr| pr.number);

    // Deduplication is left to the fetcher.
    let numbers: Vec<u64> = pulls.iter().map(|pr| pr.number).collect();
    assert_eq!(numbers, vec![42, 42]);
    assert_eq!(pulls[0].author, "octocat");
    assert_eq!(pulls[0].labels, vec!["feature", "scope/core"]);
}

#[tokio::test]
async fn test_compare_pages_until_total() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/compare/v2.0.0...HEAD"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_compare(3, &["a1", "a2"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/compare/v2.0.0...HEAD"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_compare(3, &["a3"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/repos/owner/repo/commits/a[123]/pulls$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(3)
        .mount(&server)
        .await;

    let pulls = client(&server)
        .await
        .merged_pull_requests_since("v2.0.0")
        .await
        .unwrap();
    assert!(pulls.is_empty());
}

#[tokio::test]
async fn test_unknown_tag_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/compare/v9.9.9...HEAD"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest",
        })))
        .mount(&server)
        .await;

    match client(&server)
        .await
        .merged_pull_requests_since("v9.9.9")
        .await
    {
        Err(GitHubError::TagNotFound(tag)) => assert_eq!(tag, "v9.9.9"),
        other => panic!("expected TagNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_label_on_update_is_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path_regex(r"^/repos/owner/repo/labels/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest",
        })))
        .mount(&server)
        .await;

    let spec = build_label(LabelKind::ChangeType, "fix", "Bug Fix");
    match client(&server).await.update_label("bug", &spec).await {
        Err(GitHubError::Request { operation, .. }) => assert_eq!(operation, "update label"),
        other => panic!("expected Request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_repository_on_list_labels() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/owner/repo/labels"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest",
        })))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).await.list_labels().await,
        Err(GitHubError::RepositoryNotFound { .. })
    ));
}

#[tokio::test]
async fn test_create_release_as_draft() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/owner/repo/releases"))
        .and(body_partial_json(json!({
            "tag_name": "v1.1.0",
            "name": "1.1.0",
            "draft": true,
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let release = NewRelease {
        tag_name: "v1.1.0".into(),
        name: "1.1.0".into(),
        body: "# 1.1.0\n\nNo notable changes.\n".into(),
        draft: true,
    };
    client(&server).await.create_release(&release).await.unwrap();
}

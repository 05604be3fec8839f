//! [`RemoteApi`] implementation over the GitHub REST API via octocrab.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use octocrab::Octocrab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::changelog::PullRequest;
use crate::error::GitHubError;
use crate::labels::LabelSpec;

use super::remote::{NewRelease, RemoteApi, RemoteLabel};

/// Page size for every list endpoint.
const PER_PAGE: usize = 100;

/// Safety limit to prevent infinite pagination loops.
const MAX_PAGES: u32 = 50;

/// Commit-to-PR lookups issued concurrently.
const MAX_CONCURRENT_REQUESTS: usize = 8;

/// Ref compared against the last tag.
const HEAD_REF: &str = "HEAD";

#[derive(Debug, Deserialize)]
struct CompareResponse {
    #[serde(default)]
    total_commits: usize,
    #[serde(default)]
    commits: Vec<CompareCommit>,
}

#[derive(Debug, Deserialize)]
struct CompareCommit {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    full_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiBase {
    repo: Option<ApiRepo>,
}

#[derive(Debug, Deserialize)]
struct ApiPullRequest {
    number: u64,
    title: Option<String>,
    body: Option<String>,
    user: Option<ApiUser>,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    merged_at: Option<String>,
    base: Option<ApiBase>,
}

/// GitHub client bound to one repository.
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Build a client authenticated with a personal/installation token.
    pub fn new(token: &str, owner: &str, repo: &str) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(octocrab, owner, repo))
    }

    /// Use a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(octocrab: Octocrab, owner: &str, repo: &str) -> Self {
        Self {
            octocrab,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    fn route(&self, tail: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, self.repo, tail)
    }

    fn is_not_found(e: &octocrab::Error) -> bool {
        e.to_string().contains("Not Found") || format!("{:?}", e).contains("Not Found")
    }

    /// Map an error from an operation whose 404 means "no such repository".
    fn map_error(&self, e: octocrab::Error, operation: &str) -> GitHubError {
        if Self::is_not_found(&e) {
            return GitHubError::RepositoryNotFound {
                owner: self.owner.clone(),
                repo: self.repo.clone(),
            };
        }
        Self::map_request_error(e, operation)
    }

    /// Map an error from an operation on a sub-resource; a 404 there names
    /// the resource, not the repository.
    fn map_request_error(e: octocrab::Error, operation: &str) -> GitHubError {
        // octocrab error shapes vary between versions; inspect both renderings.
        let display_lower = e.to_string().to_lowercase();
        let debug_lower = format!("{:?}", e).to_lowercase();

        if display_lower.contains("rate limit") || debug_lower.contains("rate limit") {
            return GitHubError::RateLimited {
                reset_time: "unknown".to_string(),
            };
        }
        GitHubError::Request {
            operation: operation.to_string(),
            source: Box::new(e),
        }
    }

    /// Fetch every page of a list endpoint.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
        map_err: impl Fn(octocrab::Error) -> GitHubError,
    ) -> Result<Vec<T>, GitHubError> {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let params = [("per_page", PER_PAGE.to_string()), ("page", page.to_string())];
            let items: Vec<T> = self
                .octocrab
                .get(route, Some(&params))
                .await
                .map_err(&map_err)?;

            let count = items.len();
            all.extend(items);

            if count < PER_PAGE {
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                warn!("Reached {}-page safety limit while fetching {}", MAX_PAGES, route);
                break;
            }
        }

        Ok(all)
    }

    /// Commits in `tag...HEAD`, across all compare pages.
    async fn commits_since(&self, tag: &str) -> Result<Vec<String>, GitHubError> {
        let route = self.route(&format!(
            "compare/{}...{}",
            urlencoding::encode(tag),
            HEAD_REF
        ));
        let mut shas = Vec::new();
        let mut page = 1u32;

        loop {
            let params = [("per_page", PER_PAGE.to_string()), ("page", page.to_string())];
            let response: CompareResponse = self
                .octocrab
                .get(&route, Some(&params))
                .await
                .map_err(|e| {
                    if Self::is_not_found(&e) {
                        GitHubError::TagNotFound(tag.to_string())
                    } else {
                        Self::map_request_error(e, "compare commits")
                    }
                })?;

            if response.commits.is_empty() {
                break;
            }
            shas.extend(response.commits.into_iter().map(|c| c.sha));

            if shas.len() >= response.total_commits {
                break;
            }

            page += 1;
            if page > MAX_PAGES {
                warn!(
                    "Reached {}-page safety limit while comparing {}...{}",
                    MAX_PAGES, tag, HEAD_REF
                );
                break;
            }
        }

        debug!(count = shas.len(), %tag, "Commits since tag");
        Ok(shas)
    }

    async fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>, GitHubError> {
        let route = self.route(&format!("commits/{}/pulls", sha));
        let pulls: Vec<ApiPullRequest> = self
            .get_all_pages(&route, |e| Self::map_request_error(e, "list commit pulls"))
            .await?;
        let full_name = format!("{}/{}", self.owner, self.repo);

        Ok(pulls
            .into_iter()
            .filter(|pr| pr.merged_at.is_some())
            .filter(|pr| {
                // Forks can reference the same commit; keep PRs into this repository.
                pr.base
                    .as_ref()
                    .and_then(|b| b.repo.as_ref())
                    .is_none_or(|r| r.full_name.eq_ignore_ascii_case(&full_name))
            })
            .map(|pr| PullRequest {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                body: pr.body,
                author: pr
                    .user
                    .map(|u| u.login)
                    .unwrap_or_else(|| "ghost".to_string()),
                labels: pr.labels.into_iter().map(|l| l.name).collect(),
            })
            .collect())
    }
}

#[async_trait]
impl RemoteApi for GitHubClient {
    async fn list_labels(&self) -> Result<Vec<RemoteLabel>, GitHubError> {
        self.get_all_pages(&self.route("labels"), |e| self.map_error(e, "list labels"))
            .await
    }

    async fn create_label(&self, label: &LabelSpec) -> Result<(), GitHubError> {
        let body = json!({
            "name": label.name,
            "color": label.color,
            "description": label.description,
        });

        let result: Result<serde_json::Value, _> =
            self.octocrab.post(self.route("labels"), Some(&body)).await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if format!("{:?}", e).contains("already_exists") => {
                Err(GitHubError::LabelAlreadyExists(label.name.clone()))
            }
            Err(e) => Err(self.map_error(e, "create label")),
        }
    }

    async fn update_label(
        &self,
        existing_name: &str,
        label: &LabelSpec,
    ) -> Result<(), GitHubError> {
        let route = self.route(&format!("labels/{}", urlencoding::encode(existing_name)));
        let body = json!({
            "new_name": label.name,
            "color": label.color,
            "description": label.description,
        });

        let _: serde_json::Value = self
            .octocrab
            .patch(route, Some(&body))
            .await
            .map_err(|e| Self::map_request_error(e, "update label"))?;

        Ok(())
    }

    async fn merged_pull_requests_since(
        &self,
        tag: &str,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let shas = self.commits_since(tag).await?;

        let per_commit: Vec<Vec<PullRequest>> = futures::stream::iter(shas)
            .map(|sha| async move { self.pulls_for_commit(&sha).await })
            .buffer_unordered(MAX_CONCURRENT_REQUESTS)
            .try_collect()
            .await?;

        Ok(per_commit.into_iter().flatten().collect())
    }

    async fn create_release(&self, release: &NewRelease) -> Result<(), GitHubError> {
        let body = json!({
            "tag_name": release.tag_name,
            "name": release.name,
            "body": release.body,
            "draft": release.draft,
        });

        let _: serde_json::Value = self
            .octocrab
            .post(self.route("releases"), Some(&body))
            .await
            .map_err(|e| self.map_error(e, "create release"))?;

        Ok(())
    }
}

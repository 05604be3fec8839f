//! GitHub integration: the remote API seam and its octocrab implementation.

pub mod auth;
pub mod client;
pub mod remote;
pub mod repository;

pub use client::GitHubClient;
pub use remote::{NewRelease, RemoteApi, RemoteLabel};
pub use repository::parse_github_remote;

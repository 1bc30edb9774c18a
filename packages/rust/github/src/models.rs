//! Subsets of GitHub REST API payloads.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /users/{owner}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiUser {
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Element of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiContributor {
    pub login: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub contributions: Option<u64>,
}

/// Author of a pull request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullAuthor {
    /// GitHub login.
    pub login: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
    /// Profile page URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Element of `GET /repos/{owner}/{repo}/pulls?state=closed`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,
    /// Author; GitHub returns `null` for deleted accounts.
    #[serde(default)]
    pub user: Option<PullAuthor>,
    /// Set only when the pull request was merged.
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

/// Profile URL for a login when the API leaves it out.
pub fn profile_url(login: &str) -> String {
    format!("https://github.com/{login}")
}

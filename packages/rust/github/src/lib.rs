//! Minimal GitHub REST client for site enrichment.
//!
//! Every lookup here is best-effort: a failed request (non-2xx, timeout,
//! malformed JSON) is logged and turned into "no result" so a flaky or
//! rate-limited API never aborts a build.

mod models;
mod repo;

use std::time::Duration;

use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use allweneed_shared::{Contributor, GitHubSettings, Result, SiteError};

pub use models::{PullAuthor, PullRequest, profile_url};
pub use repo::RepoRef;

/// User-Agent string for API requests (GitHub rejects requests without one).
const USER_AGENT: &str = concat!("allweneed-site-generator/", env!("CARGO_PKG_VERSION"));

/// Media type recommended by the REST API docs.
const MEDIA_TYPE: &str = "application/vnd.github+json";

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Shared HTTP client plus API location and credentials.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    token: Option<String>,
    contributors_limit: u32,
    pulls_per_page: u32,
}

impl GitHubClient {
    /// Build a client from runtime settings.
    pub fn new(settings: &GitHubSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| SiteError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            contributors_limit: settings.contributors_limit,
            pulls_per_page: settings.pulls_per_page,
        })
    }

    /// Whether requests carry a token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Avatar URL of a user or organization.
    #[instrument(skip(self))]
    pub async fn user_avatar(&self, owner: &str) -> Option<String> {
        let path = format!("/users/{owner}");
        match self.get_json::<models::ApiUser>(&path, &[]).await {
            Ok(user) => user.avatar_url.filter(|u| !u.is_empty()),
            Err(e) => {
                debug!(error = %e, "avatar lookup failed");
                None
            }
        }
    }

    /// Top contributors of a repository, in API order.
    #[instrument(skip(self))]
    pub async fn repo_contributors(&self, owner: &str, repo: &str) -> Vec<Contributor> {
        let path = format!("/repos/{owner}/{repo}/contributors");
        let query = [("per_page", self.contributors_limit.to_string())];

        match self
            .get_json::<Vec<models::ApiContributor>>(&path, &query)
            .await
        {
            Ok(list) => list
                .into_iter()
                .map(|c| Contributor {
                    profile_url: c.html_url.unwrap_or_else(|| profile_url(&c.login)),
                    login: c.login,
                    avatar_url: c.avatar_url,
                    contributions: c.contributions,
                })
                .collect(),
            Err(e) => {
                debug!(error = %e, "contributor lookup failed");
                Vec::new()
            }
        }
    }

    /// Most recently closed pull requests of a repository, merged or not.
    #[instrument(skip(self))]
    pub async fn closed_pulls(&self, owner: &str, repo: &str) -> Vec<PullRequest> {
        let path = format!("/repos/{owner}/{repo}/pulls");
        let query = [
            ("state", "closed".to_string()),
            ("per_page", self.pulls_per_page.to_string()),
        ];

        match self.get_json::<Vec<PullRequest>>(&path, &query).await {
            Ok(pulls) => pulls,
            Err(e) => {
                warn!(error = %e, "pull request lookup failed");
                Vec::new()
            }
        }
    }

    /// GET `path` under the API base and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);

        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(header::ACCEPT, MEDIA_TYPE);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SiteError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            if is_rate_limited(status, response.headers()) {
                warn!(
                    %url,
                    authenticated = self.is_authenticated(),
                    "GitHub API rate limit exhausted"
                );
            }
            return Err(SiteError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SiteError::parse(format!("{url}: invalid JSON: {e}")))
    }
}

/// 403/429 with no remaining quota.
fn is_rate_limited(status: StatusCode, headers: &header::HeaderMap) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(server: &MockServer, token: Option<&str>) -> GitHubSettings {
        GitHubSettings {
            api_base: server.uri(),
            token: token.map(String::from),
            timeout_secs: 5,
            contributors_limit: 10,
            pulls_per_page: 100,
        }
    }

    #[tokio::test]
    async fn avatar_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "avatar_url": "https://avatars.example.com/u/1"
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&settings(&server, None)).unwrap();
        assert_eq!(
            client.user_avatar("octocat").await.as_deref(),
            Some("https://avatars.example.com/u/1")
        );
    }

    #[tokio::test]
    async fn avatar_missing_on_404_and_bad_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/garbled"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&settings(&server, None)).unwrap();
        assert!(client.user_avatar("ghost").await.is_none());
        assert!(client.user_avatar("garbled").await.is_none());
    }

    #[tokio::test]
    async fn token_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("authorization", "Bearer s3cret"))
            .and(header("accept", MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "avatar_url": "https://avatars.example.com/u/1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GitHubClient::new(&settings(&server, Some("s3cret"))).unwrap();
        assert!(client.is_authenticated());
        assert!(client.user_avatar("octocat").await.is_some());
    }

    #[tokio::test]
    async fn contributors_mapped_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/r/contributors"))
            .and(query_param("per_page", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"login": "alice", "avatar_url": "https://a/1", "html_url": "https://github.com/alice", "contributions": 50},
                {"login": "bob", "avatar_url": "https://a/2", "contributions": 3}
            ])))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&settings(&server, None)).unwrap();
        let contributors = client.repo_contributors("o", "r").await;
        assert_eq!(contributors.len(), 2);
        assert_eq!(contributors[0].login, "alice");
        assert_eq!(contributors[0].contributions, Some(50));
        assert_eq!(contributors[1].profile_url, "https://github.com/bob");
    }

    #[tokio::test]
    async fn contributors_empty_on_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/r/contributors"))
            .respond_with(
                ResponseTemplate::new(403).insert_header("x-ratelimit-remaining", "0"),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new(&settings(&server, None)).unwrap();
        assert!(client.repo_contributors("o", "r").await.is_empty());
    }

    #[tokio::test]
    async fn closed_pulls_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/site/pulls"))
            .and(query_param("state", "closed"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"number": 2, "user": {"login": "alice", "avatar_url": "https://a/1"}, "merged_at": "2025-01-02T00:00:00Z"},
                {"number": 1, "user": null, "merged_at": null}
            ])))
            .mount(&server)
            .await;

        let client = GitHubClient::new(&settings(&server, None)).unwrap();
        let pulls = client.closed_pulls("o", "site").await;
        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].user.as_ref().unwrap().login, "alice");
        assert!(pulls[0].merged_at.is_some());
        assert!(pulls[1].user.is_none());
    }

    #[tokio::test]
    async fn unreachable_api_degrades() {
        let settings = GitHubSettings {
            api_base: "http://127.0.0.1:9".into(),
            token: None,
            timeout_secs: 1,
            contributors_limit: 10,
            pulls_per_page: 100,
        };
        let client = GitHubClient::new(&settings).unwrap();
        assert!(client.user_avatar("x").await.is_none());
        assert!(client.repo_contributors("x", "y").await.is_empty());
        assert!(client.closed_pulls("x", "y").await.is_empty());
    }

    #[test]
    fn rate_limit_detection() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("x-ratelimit-remaining", "0".parse().unwrap());
        assert!(is_rate_limited(StatusCode::FORBIDDEN, &headers));
        assert!(!is_rate_limited(StatusCode::NOT_FOUND, &headers));
        assert!(!is_rate_limited(
            StatusCode::FORBIDDEN,
            &reqwest::header::HeaderMap::new()
        ));
    }
}

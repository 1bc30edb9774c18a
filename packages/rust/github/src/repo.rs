//! Recognizing GitHub links.

use url::Url;

/// Hosts treated as GitHub.
const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// Owner (and repository, when present) named by a GitHub URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization login.
    pub owner: String,
    /// Repository name, without a trailing `.git`.
    pub repo: Option<String>,
}

impl RepoRef {
    /// Parse a project link. Returns `None` for anything that isn't a GitHub
    /// URL with at least an owner segment.
    pub fn from_link(link: &str) -> Option<Self> {
        let url = Url::parse(link.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        let host = url.host_str()?.to_ascii_lowercase();
        if !GITHUB_HOSTS.contains(&host.as_str()) {
            return None;
        }

        let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
        let owner = segments.next()?.to_string();
        let repo = segments
            .next()
            .map(|r| r.strip_suffix(".git").unwrap_or(r).to_string())
            .filter(|r| !r.is_empty());

        Some(Self { owner, repo })
    }

    /// Parse an `owner/repo` pair such as the site repository setting.
    pub fn from_slug(slug: &str) -> Option<Self> {
        let (owner, repo) = slug.trim().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some(Self {
            owner: owner.to_string(),
            repo: Some(repo.to_string()),
        })
    }
}

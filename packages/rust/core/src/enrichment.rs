//! Network enrichment of project sources: logo resolution and contributors.
//!
//! The logo is resolved by walking [`LOGO_CHAIN`] in order and stopping at the
//! first step that yields a value. Network steps degrade to "no value" on any
//! failure, so the chain always terminates with at least the placeholder.

use tracing::{debug, instrument};
use url::Url;

use allweneed_content::ProjectSource;
use allweneed_github::{GitHubClient, RepoRef};
use allweneed_shared::{
    BuildConfig, Contributor, PLACEHOLDER_LOGO, ProjectRecord, project_page_path,
};

// ---------------------------------------------------------------------------
// Logo chain
// ---------------------------------------------------------------------------

/// One way of finding a project logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoStep {
    /// `logo` from front-matter, used verbatim.
    FrontMatter,
    /// Avatar of the GitHub account owning the link.
    SourceHostAvatar,
    /// Favicon service URL for the link's host.
    Favicon,
    /// Bundled placeholder image.
    Placeholder,
}

/// Resolution order.
pub const LOGO_CHAIN: [LogoStep; 4] = [
    LogoStep::FrontMatter,
    LogoStep::SourceHostAvatar,
    LogoStep::Favicon,
    LogoStep::Placeholder,
];

/// Favicon service URL for the host of `link`, e.g.
/// `https://www.google.com/s2/favicons?domain=example.com&sz=128`.
///
/// `None` if either the link or the service URL doesn't parse, or the link
/// has no host.
pub fn favicon_url(service: &str, link: &str, size: u32) -> Option<String> {
    let link = Url::parse(link.trim()).ok()?;
    let host = link.host_str()?;
    let size = size.to_string();
    let url = Url::parse_with_params(service, &[("domain", host), ("sz", size.as_str())]).ok()?;
    Some(url.into())
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

/// Turns [`ProjectSource`]s into [`ProjectRecord`]s using one shared client.
#[derive(Debug, Clone)]
pub struct Enricher<'a> {
    client: &'a GitHubClient,
    favicon_service: &'a str,
    favicon_size: u32,
}

impl<'a> Enricher<'a> {
    pub fn new(client: &'a GitHubClient, config: &'a BuildConfig) -> Self {
        Self {
            client,
            favicon_service: &config.favicon_service,
            favicon_size: config.favicon_size,
        }
    }

    /// Resolve logo and contributors, producing the final record.
    #[instrument(skip_all, fields(slug = %source.slug))]
    pub async fn enrich(&self, source: ProjectSource) -> ProjectRecord {
        let logo = self.resolve_logo(&source).await;
        let contributors = self.contributors(&source.link).await;

        ProjectRecord {
            page: project_page_path(&source.slug),
            slug: source.slug,
            title: source.title,
            link: source.link,
            description: source.description,
            tags: source.tags,
            logo,
            screenshot: source.screenshot,
            contributors,
            content_html: source.content_html,
        }
    }

    /// Walk [`LOGO_CHAIN`] until a step produces a logo.
    pub async fn resolve_logo(&self, source: &ProjectSource) -> String {
        for step in LOGO_CHAIN {
            if let Some(logo) = self.try_step(step, source).await {
                debug!(?step, %logo, "logo resolved");
                return logo;
            }
        }
        PLACEHOLDER_LOGO.to_string()
    }

    async fn try_step(&self, step: LogoStep, source: &ProjectSource) -> Option<String> {
        match step {
            LogoStep::FrontMatter => source.logo.clone(),
            LogoStep::SourceHostAvatar => {
                let repo = RepoRef::from_link(&source.link)?;
                self.client.user_avatar(&repo.owner).await
            }
            LogoStep::Favicon => favicon_url(self.favicon_service, &source.link, self.favicon_size),
            LogoStep::Placeholder => Some(PLACEHOLDER_LOGO.to_string()),
        }
    }

    /// Contributors of the repository named by `link`; empty unless the link
    /// names both owner and repository on GitHub.
    pub async fn contributors(&self, link: &str) -> Vec<Contributor> {
        match RepoRef::from_link(link) {
            Some(RepoRef {
                owner,
                repo: Some(repo),
            }) => self.client.repo_contributors(&owner, &repo).await,
            _ => Vec::new(),
        }
    }
}

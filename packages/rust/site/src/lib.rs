//! HTML, XML and text renderers for the generated site.
//!
//! Everything here is a pure function from records to strings; writing the
//! results to disk is the assembler's job. All interpolated text goes through
//! [`text`] or [`attr`].

pub mod assets;
pub mod layout;
pub mod pages;
pub mod sitemap;

use allweneed_shared::BuildConfig;

pub use assets::STATIC_FILES;
pub use pages::{SiteStats, home_page, leaderboard_page, listing_page, project_page};
pub use sitemap::{robots_txt, sitemap_xml};

/// Site identity shared by every page.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    /// Display name.
    pub name: String,
    /// Public base URL without trailing slash.
    pub url: String,
    /// Tagline.
    pub description: String,
    /// `owner/repo` of the site repository, for header and footer links.
    pub repository: Option<String>,
}

impl SiteInfo {
    /// Absolute URL for a site-absolute path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    /// GitHub URL of the site repository.
    pub fn repository_url(&self) -> Option<String> {
        self.repository
            .as_deref()
            .map(|repo| format!("https://github.com/{repo}"))
    }
}

impl From<&BuildConfig> for SiteInfo {
    fn from(config: &BuildConfig) -> Self {
        Self {
            name: config.site_name.clone(),
            url: config.site_url.clone(),
            description: config.site_description.clone(),
            repository: config.repository.clone(),
        }
    }
}

/// Escape text content.
pub(crate) fn text(s: &str) -> String {
    html_escape::encode_text(s).into_owned()
}

/// Escape a double-quoted attribute value.
pub(crate) fn attr(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(s).into_owned()
}

/// Hostname of a link, or the link itself when it doesn't parse.
pub(crate) fn hostname(link: &str) -> String {
    url::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| link.to_string())
}

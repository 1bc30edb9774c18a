//! Core domain types for the generated directory site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logo used when every other resolution step comes up empty.
pub const PLACEHOLDER_LOGO: &str = "/logo.svg";

/// Category name for projects without tags.
pub const OTHER_CATEGORY: &str = "Other";

/// Site-absolute path of a project's detail page.
pub fn project_page_path(slug: &str) -> String {
    format!("/projects/{slug}.html")
}

// ---------------------------------------------------------------------------
// Contributor
// ---------------------------------------------------------------------------

/// A repository contributor shown on project cards and pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// GitHub login.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile page URL.
    pub profile_url: String,
    /// Contribution count as reported by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributions: Option<u64>,
}

// ---------------------------------------------------------------------------
// ProjectRecord
// ---------------------------------------------------------------------------

/// A fully-resolved project, one per valid markdown file.
///
/// This is also the element type of `projects.json`; the rendered body is
/// only used for the detail page and never exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// URL-safe identifier derived from the title.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Project homepage or repository URL.
    pub link: String,
    /// One-line description.
    pub description: String,
    /// Tags in front-matter order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Resolved logo URL or site path.
    pub logo: String,
    /// Optional screenshot URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Site-absolute detail page path.
    pub page: String,
    /// Top contributors, empty for non-GitHub links.
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    /// Markdown body rendered to HTML.
    #[serde(default, skip_serializing)]
    pub content_html: String,
}

// ---------------------------------------------------------------------------
// CategoryGroup
// ---------------------------------------------------------------------------

/// Projects sharing one tag, as shown in a homepage section.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    /// Tag name, or [`OTHER_CATEGORY`] for untagged projects.
    pub name: String,
    /// Member projects in build order.
    pub projects: Vec<ProjectRecord>,
}

impl CategoryGroup {
    /// Number of projects in the group.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the group has no projects.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LeaderboardEntry
// ---------------------------------------------------------------------------

/// Merged pull request totals for one author of the site repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// GitHub login.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile page URL.
    pub profile_url: String,
    /// Number of merged pull requests.
    pub count: usize,
    /// Merge timestamps, one per merged pull request.
    pub merged_dates: Vec<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> ProjectRecord {
        ProjectRecord {
            slug: "ripgrep".into(),
            title: "ripgrep".into(),
            link: "https://github.com/BurntSushi/ripgrep".into(),
            description: "Fast recursive search".into(),
            tags: vec!["cli".into(), "search".into()],
            logo: "https://avatars.githubusercontent.com/u/456674".into(),
            screenshot: None,
            page: project_page_path("ripgrep"),
            contributors: vec![Contributor {
                login: "BurntSushi".into(),
                avatar_url: "https://avatars.githubusercontent.com/u/456674".into(),
                profile_url: "https://github.com/BurntSushi".into(),
                contributions: Some(1500),
            }],
            content_html: "<p>Body</p>".into(),
        }
    }

    #[test]
    fn project_json_omits_rendered_body() {
        let json = serde_json::to_value(sample_project()).expect("serialize");
        assert!(json.get("content_html").is_none());
        assert!(json.get("screenshot").is_none());
        assert_eq!(json["page"], "/projects/ripgrep.html");
        assert_eq!(json["contributors"][0]["login"], "BurntSushi");
    }

    #[test]
    fn project_json_reads_back_without_body() {
        let json = serde_json::to_string(&sample_project()).expect("serialize");
        let parsed: ProjectRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.tags, vec!["cli", "search"]);
        assert!(parsed.content_html.is_empty());
    }

    #[test]
    fn leaderboard_entry_dates_are_rfc3339() {
        let entry = LeaderboardEntry {
            login: "octocat".into(),
            avatar_url: "https://example.com/a.png".into(),
            profile_url: "https://github.com/octocat".into(),
            count: 1,
            merged_dates: vec!["2025-03-01T12:00:00Z".parse().expect("timestamp")],
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["merged_dates"][0], "2025-03-01T12:00:00Z");
    }
}

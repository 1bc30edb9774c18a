//! Offline fuzzy search over built project records.
//!
//! Mirrors the browser search: four weighted fields, each scored
//! independently, with a match threshold shared by all fields.

use strsim::normalized_damerau_levenshtein;

use allweneed_shared::ProjectRecord;

/// Default match threshold; a field matches when its similarity is at least
/// `1 - threshold`.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

const TITLE_WEIGHT: f64 = 0.7;
const DESCRIPTION_WEIGHT: f64 = 0.5;
const TAGS_WEIGHT: f64 = 0.4;
const CONTRIBUTORS_WEIGHT: f64 = 0.3;

/// A project matching a query.
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    /// The matched project.
    pub project: &'a ProjectRecord,
    /// Weighted sum of matching field similarities. Higher is better.
    pub score: f64,
}

/// Rank `projects` against `query`.
///
/// Results are ordered by score, best first; equal scores keep input order.
/// An empty query matches nothing.
pub fn search<'a>(
    projects: &'a [ProjectRecord],
    query: &str,
    threshold: f64,
) -> Vec<SearchHit<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let min_quality = 1.0 - threshold.clamp(0.0, 1.0);

    let mut hits: Vec<SearchHit<'a>> = projects
        .iter()
        .filter_map(|project| {
            let fields = [
                (TITLE_WEIGHT, similarity(&query, &project.title)),
                (DESCRIPTION_WEIGHT, similarity(&query, &project.description)),
                (TAGS_WEIGHT, best_of(&query, project.tags.iter().map(String::as_str))),
                (
                    CONTRIBUTORS_WEIGHT,
                    best_of(&query, project.contributors.iter().map(|c| c.login.as_str())),
                ),
            ];

            let score: f64 = fields
                .iter()
                .filter(|(_, quality)| *quality >= min_quality)
                .map(|(weight, quality)| weight * quality)
                .sum();

            (score > 0.0).then_some(SearchHit { project, score })
        })
        .collect();

    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}

/// Similarity in `[0, 1]` of a lowercase query to a field value.
///
/// Substrings score 1.0. Otherwise the best normalized edit-distance
/// similarity against the whole value or any of its words.
fn similarity(query: &str, value: &str) -> f64 {
    let value = value.to_lowercase();
    if value.is_empty() {
        return 0.0;
    }
    if value.contains(query) {
        return 1.0;
    }

    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|word| normalized_damerau_levenshtein(query, word))
        .fold(normalized_damerau_levenshtein(query, &value), f64::max)
}

fn best_of<'v>(query: &str, values: impl Iterator<Item = &'v str>) -> f64 {
    values.map(|v| similarity(query, v)).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use allweneed_shared::{Contributor, project_page_path};

    use super::*;

    fn project(title: &str, description: &str, tags: &[&str], logins: &[&str]) -> ProjectRecord {
        let slug = title.to_lowercase();
        ProjectRecord {
            page: project_page_path(&slug),
            slug,
            title: title.into(),
            link: "https://example.com".into(),
            description: description.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            logo: "/logo.svg".into(),
            screenshot: None,
            contributors: logins
                .iter()
                .map(|l| Contributor {
                    login: l.to_string(),
                    avatar_url: String::new(),
                    profile_url: String::new(),
                    contributions: None,
                })
                .collect(),
            content_html: String::new(),
        }
    }

    fn catalog() -> Vec<ProjectRecord> {
        vec![
            project(
                "ripgrep",
                "Recursively search directories",
                &["cli", "search"],
                &["BurntSushi"],
            ),
            project("Postgres", "Relational database", &["database"], &["tglsfdc"]),
            project("fd", "A simple alternative to find", &["cli"], &["sharkdp"]),
        ]
    }

    fn titles(hits: &[SearchHit<'_>]) -> Vec<String> {
        hits.iter().map(|h| h.project.title.clone()).collect()
    }

    #[test]
    fn exact_title_ranks_first() {
        let projects = catalog();
        let hits = search(&projects, "ripgrep", DEFAULT_THRESHOLD);
        assert_eq!(titles(&hits)[0], "ripgrep");
    }

    #[test]
    fn tolerates_typos() {
        let projects = catalog();
        let hits = search(&projects, "postgers", DEFAULT_THRESHOLD);
        assert_eq!(titles(&hits), vec!["Postgres"]);
    }

    #[test]
    fn matches_tags_and_contributors() {
        let projects = catalog();
        let hits = search(&projects, "cli", DEFAULT_THRESHOLD);
        let found = titles(&hits);
        assert!(found.contains(&"ripgrep".to_string()));
        assert!(found.contains(&"fd".to_string()));

        let hits = search(&projects, "sharkdp", DEFAULT_THRESHOLD);
        assert_eq!(titles(&hits), vec!["fd"]);
    }

    #[test]
    fn title_outweighs_description() {
        let projects = vec![
            project("Other", "mentions search here", &[], &[]),
            project("Search", "unrelated", &[], &[]),
        ];
        let hits = search(&projects, "search", DEFAULT_THRESHOLD);
        assert_eq!(titles(&hits), vec!["Search", "Other"]);
    }

    #[test]
    fn nothing_for_empty_or_unrelated_queries() {
        let projects = catalog();
        assert!(search(&projects, "   ", DEFAULT_THRESHOLD).is_empty());
        assert!(search(&projects, "zzzzqqqq", DEFAULT_THRESHOLD).is_empty());
    }
}

//! Homepage, listing, detail and leaderboard pages.

use std::fmt::Write as _;

use allweneed_shared::{CategoryGroup, HomepageConfig, LeaderboardEntry, ProjectRecord};

use crate::layout::{self, PageMeta};
use crate::{SiteInfo, attr, hostname, text};

/// Leaderboard window links, as `(filter key, label)`.
const WINDOW_LINKS: &[(&str, &str)] = &[
    ("daily", "Today"),
    ("week", "This week"),
    ("month", "This month"),
    ("all", "All time"),
];

/// Counters shown in the homepage hero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteStats {
    /// Number of projects.
    pub projects: usize,
    /// Number of category groups.
    pub categories: usize,
    /// Sum of contributor list lengths across projects.
    pub contributors: usize,
}

impl SiteStats {
    /// Compute the counters for a build.
    pub fn collect(projects: &[ProjectRecord], groups: &[CategoryGroup]) -> Self {
        Self {
            projects: projects.len(),
            categories: groups.len(),
            contributors: projects.iter().map(|p| p.contributors.len()).sum(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// `index.html`: hero with search and stats, then one section per category.
///
/// `groups` are rendered in the order given. Groups larger than the collapse
/// threshold get a "Show all" button and a `limited` grid.
pub fn home_page(
    site: &SiteInfo,
    homepage: &HomepageConfig,
    groups: &[CategoryGroup],
    stats: &SiteStats,
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<section class="hero">
  <h1>{name}</h1>
  <p class="lead">{description}</p>
  <div class="search-container">
    <input id="search-input" type="search" placeholder="Search what you are looking for..." autocomplete="off" />
  </div>
  <div class="stats">
    <div class="stat"><span class="stat-number">{projects}</span><span class="stat-label">Projects</span></div>
    <div class="stat"><span class="stat-number">{categories}</span><span class="stat-label">Categories</span></div>
    <div class="stat"><span class="stat-number">{contributors}</span><span class="stat-label">Contributors</span></div>
  </div>
</section>
<div id="projects">
"#,
        name = text(&site.name),
        description = text(&site.description),
        projects = stats.projects,
        categories = stats.categories,
        contributors = stats.contributors,
    );

    for group in groups {
        let collapsible = group.len() > homepage.collapse_threshold;
        let name_attr = attr(&group.name);

        let _ = write!(
            body,
            r#"<section class="category" data-category="{name_attr}">
  <div class="category-header">
    <h2>{name} <span class="count">({count})</span></h2>
"#,
            name = text(&group.name),
            count = group.len(),
        );
        if collapsible {
            let _ = writeln!(
                body,
                r#"    <button class="show-more" type="button" data-category="{name_attr}">Show all</button>"#
            );
        }
        let _ = writeln!(
            body,
            r#"  </div>
  <div class="projects-grid{limited}" data-category-grid="{name_attr}">"#,
            limited = if collapsible { " limited" } else { "" },
        );
        for project in &group.projects {
            body.push_str(&project_card(project, homepage));
        }
        body.push_str("  </div>\n</section>\n");
    }

    body.push_str(
        r#"</div>
<div id="no-results" class="no-results" hidden>
  <h3>No projects found</h3>
  <p>Try different keywords or browse the categories.</p>
</div>"#,
    );

    let title = format!("{} · Developer Tools & Hidden Gems", site.name);
    layout::render(
        site,
        &PageMeta {
            title: &title,
            description: &site.description,
            path: "/",
        },
        &body,
    )
}

/// `projects/index.html`: every project in build order.
pub fn listing_page(
    site: &SiteInfo,
    homepage: &HomepageConfig,
    projects: &[ProjectRecord],
) -> String {
    let mut body = format!(
        "<h1>All Projects</h1>\n<p>Browse the complete collection of {} developer tools and resources.</p>\n<div class=\"projects-grid\">\n",
        projects.len()
    );
    for project in projects {
        body.push_str(&project_card(project, homepage));
    }
    body.push_str("</div>");

    let title = format!("All Projects · {}", site.name);
    layout::render(
        site,
        &PageMeta {
            title: &title,
            description: "Browse all projects",
            path: "/projects/",
        },
        &body,
    )
}

/// `projects/<slug>.html`: full project details and rendered body.
pub fn project_page(site: &SiteInfo, project: &ProjectRecord) -> String {
    let title = text(&project.title);
    let link = attr(&project.link);

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<article class="project-full">
  <header class="project-header">
    <img class="project-header-logo" src="{logo}" alt="{title_attr} logo" />
    <div class="project-info">
      <h1>{title}</h1>
      <p class="project-description">{description}</p>
      <div class="project-actions">
        <a class="cta-primary" href="{link}" target="_blank" rel="noopener">Visit Project</a>
"#,
        logo = attr(&project.logo),
        title_attr = attr(&project.title),
        description = text(&project.description),
    );
    if is_github_link(&project.link) {
        let _ = writeln!(
            body,
            r#"        <a class="cta-secondary" href="{link}" target="_blank" rel="noopener">View Source</a>"#
        );
    }
    body.push_str("      </div>\n");

    if !project.tags.is_empty() {
        body.push_str("      <div class=\"project-tags\">");
        for tag in &project.tags {
            let _ = write!(body, r#"<span class="tag">{}</span>"#, text(tag));
        }
        body.push_str("</div>\n");
    }

    if !project.contributors.is_empty() {
        body.push_str(
            "      <div class=\"contributors-section\">\n        <h3>Contributors</h3>\n        <div class=\"contributors-list\">\n",
        );
        for c in &project.contributors {
            let _ = writeln!(
                body,
                r#"          <a class="contributor" href="{profile}" target="_blank" rel="noopener"><img src="{avatar}" alt="{login_attr}" loading="lazy" /><span>{login}</span></a>"#,
                profile = attr(&c.profile_url),
                avatar = attr(&c.avatar_url),
                login_attr = attr(&c.login),
                login = text(&c.login),
            );
        }
        body.push_str("        </div>\n      </div>\n");
    }

    body.push_str("    </div>\n  </header>\n");

    if let Some(shot) = &project.screenshot {
        let _ = writeln!(
            body,
            r#"  <figure class="project-screenshot"><img src="{}" alt="{} screenshot" loading="lazy" /></figure>"#,
            attr(shot),
            attr(&project.title),
        );
    }

    if !project.content_html.trim().is_empty() {
        let _ = writeln!(
            body,
            "  <section class=\"project-content\">\n{}\n  </section>",
            project.content_html
        );
    }

    body.push_str(
        "  <div class=\"back-to-home\"><a href=\"/\">← Back to all projects</a></div>\n</article>",
    );

    let page_title = format!("{} · {}", project.title, site.name);
    layout::render(
        site,
        &PageMeta {
            title: &page_title,
            description: &project.description,
            path: &project.page,
        },
        &body,
    )
}

/// `leaderboard.html`: all-time ranking, re-filtered in the browser by the
/// `filter` query parameter.
pub fn leaderboard_page(site: &SiteInfo, entries: &[LeaderboardEntry]) -> String {
    let mut body = String::from(
        "<section class=\"leaderboard\">\n  <h1>Leaderboard</h1>\n  <p class=\"lead\">Contributors ranked by merged pull requests.</p>\n  <nav class=\"leaderboard-filters\">\n",
    );
    for (key, label) in WINDOW_LINKS {
        let _ = writeln!(
            body,
            r#"    <a class="filter" data-filter="{key}" href="?filter={key}">{label}</a>"#
        );
    }
    body.push_str(
        "  </nav>\n  <table class=\"leaderboard-table\">\n    <thead><tr><th>Rank</th><th>Contributor</th><th>Merged PRs</th></tr></thead>\n    <tbody id=\"leaderboard-body\">\n",
    );

    if entries.is_empty() {
        body.push_str(
            "      <tr><td colspan=\"3\" class=\"empty\">No active contributors in this period.</td></tr>\n",
        );
    }
    for (rank, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            body,
            r#"      <tr><td class="rank">#{rank}</td><td class="who"><img src="{avatar}" alt="" loading="lazy" /><a href="{profile}" target="_blank" rel="noopener">{login}</a></td><td class="count">{count}</td></tr>"#,
            rank = rank + 1,
            avatar = attr(&entry.avatar_url),
            profile = attr(&entry.profile_url),
            login = text(&entry.login),
            count = entry.count,
        );
    }
    body.push_str("    </tbody>\n  </table>\n</section>");

    let title = format!("Leaderboard · {}", site.name);
    layout::render(
        site,
        &PageMeta {
            title: &title,
            description: "Top contributors by merged pull requests",
            path: "/leaderboard.html",
        },
        &body,
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Summary card used on the homepage and listing.
fn project_card(project: &ProjectRecord, homepage: &HomepageConfig) -> String {
    let title = text(&project.title);
    let logo = if project.logo.is_empty() {
        r#"<div class="project-logo placeholder"></div>"#.to_string()
    } else {
        format!(
            r#"<img class="project-logo" src="{}" alt="{} logo" loading="lazy" />"#,
            attr(&project.logo),
            attr(&project.title),
        )
    };

    let tags: String = project
        .tags
        .iter()
        .take(homepage.card_tags)
        .map(|t| format!(r#"<span class="tag">{}</span>"#, text(t)))
        .collect();

    let contributors: Vec<String> = project
        .contributors
        .iter()
        .take(homepage.card_contributors)
        .map(|c| {
            format!(
                r#"<a class="contrib" href="{}" target="_blank" rel="noopener" title="{}">{}</a>"#,
                attr(&c.profile_url),
                attr(&c.login),
                text(&c.login),
            )
        })
        .collect();

    let mut card = String::new();
    let _ = write!(
        card,
        r#"    <article class="project-card" data-slug="{slug}" data-tags="{tags_attr}">
      <a class="project-link" href="{page}">
        <div class="project-left">{logo}</div>
        <div class="project-body">
          <h3>{title}</h3>
          <p class="desc">{description}</p>
          <div class="tags">{tags}</div>
        </div>
      </a>
      <div class="meta">
        <a class="site-link" href="{link}" target="_blank" rel="noopener">{host}</a>
"#,
        slug = attr(&project.slug),
        tags_attr = attr(&project.tags.join(" ")),
        page = attr(&project.page),
        description = text(&project.description),
        link = attr(&project.link),
        host = text(&hostname(&project.link)),
    );
    if !contributors.is_empty() {
        let _ = writeln!(
            card,
            r#"        <span class="contributors">{}</span>"#,
            contributors.join(" ")
        );
    }
    card.push_str("      </div>\n    </article>\n");
    card
}

fn is_github_link(link: &str) -> bool {
    matches!(hostname(link).as_str(), "github.com" | "www.github.com")
}

#[cfg(test)]
mod tests {
    use allweneed_shared::ProjectRecord;
    use scraper::{Html, Selector};

    use super::*;
    use crate::test_support::{contributor, project, site};

    fn count(html: &str, css: &str) -> usize {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(css).unwrap();
        doc.select(&selector).count()
    }

    fn texts(html: &str, css: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(css).unwrap();
        doc.select(&selector)
            .map(|e| e.text().collect::<String>().trim().to_string())
            .collect()
    }

    fn group(name: &str, projects: Vec<ProjectRecord>) -> CategoryGroup {
        CategoryGroup {
            name: name.into(),
            projects,
        }
    }

    #[test]
    fn home_sections_and_stats() {
        let mut a = project("Alpha", &["cli"]);
        a.contributors = vec![contributor("x"), contributor("y")];
        let b = project("Beta", &[]);
        let groups = vec![group("cli", vec![a.clone()]), group("Other", vec![b.clone()])];
        let stats = SiteStats::collect(&[a, b], &groups);
        assert_eq!(
            stats,
            SiteStats {
                projects: 2,
                categories: 2,
                contributors: 2
            }
        );

        let html = home_page(&site(), &HomepageConfig::default(), &groups, &stats);
        assert_eq!(texts(&html, "section.category h2"), vec!["cli (1)", "Other (1)"]);
        assert_eq!(texts(&html, ".stat-number"), vec!["2", "2", "2"]);
        assert_eq!(count(&html, "#search-input"), 1);
        assert_eq!(count(&html, "button.show-more"), 0);
    }

    #[test]
    fn large_groups_collapse() {
        let projects: Vec<_> = (0..7).map(|i| project(&format!("P{i}"), &["web"])).collect();
        let groups = vec![
            group("web", projects.clone()),
            group("small", projects[..6].to_vec()),
        ];
        let stats = SiteStats::collect(&projects, &groups);
        let html = home_page(&site(), &HomepageConfig::default(), &groups, &stats);

        assert_eq!(count(&html, "button.show-more[data-category=web]"), 1);
        assert_eq!(count(&html, ".projects-grid.limited"), 1);
        assert_eq!(count(&html, "[data-category-grid=small].limited"), 0);
    }

    #[test]
    fn cards_are_truncated_and_escaped() {
        let mut p = project("Tool <X>", &["a", "b", "c", "d"]);
        p.contributors = (0..6).map(|i| contributor(&format!("c{i}"))).collect();
        let html = listing_page(&site(), &HomepageConfig::default(), &[p]);

        assert_eq!(count(&html, ".project-card .tag"), 3);
        assert_eq!(count(&html, ".project-card .contrib"), 4);
        assert_eq!(texts(&html, ".project-card h3"), vec!["Tool <X>"]);
        assert!(html.contains("Tool &lt;X&gt;"));
        assert_eq!(texts(&html, ".site-link"), vec!["example.com"]);
    }

    #[test]
    fn detail_page_sections() {
        let mut p = project("ripgrep", &["cli"]);
        p.link = "https://github.com/BurntSushi/ripgrep".into();
        p.screenshot = Some("https://example.com/shot.png".into());
        p.contributors = vec![contributor("BurntSushi")];
        p.content_html = "<h2>Install</h2>".into();

        let html = project_page(&site(), &p);
        assert_eq!(count(&html, ".cta-secondary"), 1);
        assert_eq!(count(&html, ".project-screenshot img"), 1);
        assert_eq!(count(&html, ".contributors-list .contributor"), 1);
        assert_eq!(texts(&html, ".project-content h2"), vec!["Install"]);
        assert!(html.contains(r#"href="https://allweneed.github.io/projects/ripgrep.html""#));
    }

    #[test]
    fn detail_page_omits_empty_sections() {
        let html = project_page(&site(), &project("Plain", &[]));
        assert_eq!(count(&html, ".cta-secondary"), 0);
        assert_eq!(count(&html, ".project-tags"), 0);
        assert_eq!(count(&html, ".contributors-section"), 0);
        assert_eq!(count(&html, ".project-screenshot"), 0);
        assert_eq!(count(&html, ".project-content"), 0);
    }

    #[test]
    fn leaderboard_rows() {
        let entries = vec![
            LeaderboardEntry {
                login: "alice".into(),
                avatar_url: "https://a/1".into(),
                profile_url: "https://github.com/alice".into(),
                count: 3,
                merged_dates: Vec::new(),
            },
            LeaderboardEntry {
                login: "bob".into(),
                avatar_url: "https://a/2".into(),
                profile_url: "https://github.com/bob".into(),
                count: 1,
                merged_dates: Vec::new(),
            },
        ];
        let html = leaderboard_page(&site(), &entries);
        assert_eq!(texts(&html, "#leaderboard-body .rank"), vec!["#1", "#2"]);
        assert_eq!(texts(&html, "#leaderboard-body .count"), vec!["3", "1"]);
        assert_eq!(count(&html, ".leaderboard-filters a"), 4);

        let empty = leaderboard_page(&site(), &[]);
        assert!(empty.contains("No active contributors in this period."));
    }
}

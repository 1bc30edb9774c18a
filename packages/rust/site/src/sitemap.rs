//! `sitemap.xml` and `robots.txt`.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use allweneed_shared::ProjectRecord;

use crate::{SiteInfo, text};

/// Fixed pages and their priorities, ahead of the per-project entries.
const FIXED_PAGES: &[(&str, &str)] = &[
    ("/", "1.0"),
    ("/projects/", "0.8"),
    ("/leaderboard.html", "0.6"),
];

/// Priority of every project detail page.
const PROJECT_PRIORITY: &str = "0.7";

/// Sitemap listing the fixed pages and every project page, all stamped with
/// the build time.
pub fn sitemap_xml(
    site: &SiteInfo,
    projects: &[ProjectRecord],
    built_at: DateTime<Utc>,
) -> String {
    let lastmod = built_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for (path, priority) in FIXED_PAGES {
        push_url(&mut xml, &site.absolute(path), &lastmod, priority);
    }
    for project in projects {
        push_url(&mut xml, &site.absolute(&project.page), &lastmod, PROJECT_PRIORITY);
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, priority: &str) {
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <priority>{priority}</priority>\n  </url>\n",
        text(loc),
    );
}

/// Allow-all robots file pointing at the sitemap.
pub fn robots_txt(site: &SiteInfo) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n\n# Optimize crawling\nCrawl-delay: 1\n",
        site.absolute("/sitemap.xml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{project, site};

    #[test]
    fn sitemap_lists_fixed_and_project_pages() {
        let built_at: DateTime<Utc> = "2025-06-01T10:00:00Z".parse().unwrap();
        let xml = sitemap_xml(&site(), &[project("Alpha", &[]), project("Beta", &[])], built_at);

        assert_eq!(xml.matches("<url>").count(), 5);
        assert!(xml.contains("<loc>https://allweneed.github.io/</loc>"));
        assert!(xml.contains("<loc>https://allweneed.github.io/projects/alpha.html</loc>"));
        assert!(xml.contains("<lastmod>2025-06-01T10:00:00.000Z</lastmod>"));
        assert_eq!(xml.matches("<priority>0.7</priority>").count(), 2);
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn sitemap_escapes_locations() {
        let mut p = project("A", &[]);
        p.page = "/projects/a&b.html".into();
        let xml = sitemap_xml(&site(), &[p], Utc::now());
        assert!(xml.contains("a&amp;b.html"));
    }

    #[test]
    fn robots_points_at_sitemap() {
        let robots = robots_txt(&site());
        assert!(robots.starts_with("User-agent: *\nAllow: /\n"));
        assert!(robots.contains("Sitemap: https://allweneed.github.io/sitemap.xml"));
        assert!(robots.ends_with("Crawl-delay: 1\n"));
    }
}

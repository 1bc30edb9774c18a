//! Page shell shared by every HTML document.

use std::fmt::Write as _;

use crate::{SiteInfo, attr, text};

/// Per-page head metadata.
#[derive(Debug, Clone)]
pub struct PageMeta<'a> {
    /// Document title.
    pub title: &'a str,
    /// Meta description.
    pub description: &'a str,
    /// Site-absolute path used for the canonical URL.
    pub path: &'a str,
}

/// Wrap `body` in the site layout: head with SEO tags, header navigation,
/// footer and the search script.
pub fn render(site: &SiteInfo, meta: &PageMeta<'_>, body: &str) -> String {
    let canonical = attr(&site.absolute(meta.path));
    let title = attr(meta.title);
    let description = attr(meta.description);
    let name = text(&site.name);
    let repo_url = site.repository_url().map(|u| attr(&u));

    let mut html = String::with_capacity(body.len() + 2048);
    let _ = write!(
        html,
        r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>{title_text}</title>
  <meta name="description" content="{description}" />
  <link rel="canonical" href="{canonical}" />
  <meta name="robots" content="index,follow" />
  <meta property="og:title" content="{title}" />
  <meta property="og:description" content="{description}" />
  <meta property="og:url" content="{canonical}" />
  <meta property="og:type" content="website" />
  <meta property="og:site_name" content="{site_name}" />
  <meta name="twitter:card" content="summary_large_image" />
  <meta name="twitter:title" content="{title}" />
  <meta name="twitter:description" content="{description}" />
  <link rel="icon" href="/logo.svg" />
  <meta name="theme-color" content="#0b6efd" />
  <link rel="stylesheet" href="/styles.css" />
</head>
<body>
<header class="site-header" id="site-header">
  <div class="header-content">
    <a class="brand" href="/"><img src="/logo.svg" alt="{site_name}" /> <span>{name}</span></a>
    <nav class="nav-links">
      <a href="/">Home</a>
      <a href="/projects/">Projects</a>
      <a href="/leaderboard.html">Leaderboard</a>
"##,
        title_text = text(meta.title),
        site_name = attr(&site.name),
    );

    if let Some(url) = &repo_url {
        let _ = writeln!(html, r#"      <a href="{url}">GitHub</a>"#);
    }

    let _ = write!(
        html,
        r#"    </nav>
  </div>
</header>
<main class="container">
{body}
</main>
<footer class="site-footer">
  <div class="footer-content">
    <p>MIT License · Open source</p>
    <div class="footer-links">
      <a href="/sitemap.xml">Sitemap</a>
"#
    );

    if let Some(url) = &repo_url {
        let _ = writeln!(
            html,
            r#"      <a href="{url}">Source</a>
      <a href="{url}/blob/main/CONTRIBUTING.md">Contribute</a>"#
        );
    }

    html.push_str(
        r#"    </div>
  </div>
</footer>
<script src="/search.js"></script>
</body>
</html>
"#,
    );

    html
}

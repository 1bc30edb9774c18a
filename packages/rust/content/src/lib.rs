//! Content ingestion: markdown project files → validated project sources.
//!
//! Each `*.md` file in the content directory describes one project in its
//! YAML front-matter (`title`, `link`, `description`, `tags`, `logo`,
//! `screenshot`) followed by a free-form markdown body. Files that fail to
//! parse or validate are skipped with a warning; they never abort ingestion.

pub mod frontmatter;
pub mod markdown;
pub mod slug;

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use allweneed_shared::{Result, SiteError};

pub use slug::slugify;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A validated project file, before network enrichment.
#[derive(Debug, Clone)]
pub struct ProjectSource {
    /// File name within the content directory (e.g. `ripgrep.md`).
    pub file_name: String,
    /// Display title.
    pub title: String,
    /// Project URL.
    pub link: String,
    /// One-line description.
    pub description: String,
    /// Tags in front-matter order, de-duplicated.
    pub tags: Vec<String>,
    /// Explicit logo from front-matter.
    pub logo: Option<String>,
    /// Optional screenshot URL.
    pub screenshot: Option<String>,
    /// Slug derived from the title.
    pub slug: String,
    /// Body rendered to HTML.
    pub content_html: String,
}

/// A content file that was left out of the build.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Path of the offending file.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of reading a content directory.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Valid projects, in file name order.
    pub projects: Vec<ProjectSource>,
    /// Files that were skipped.
    pub skipped: Vec<SkippedFile>,
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Read every `*.md` file in `dir`.
///
/// A missing directory is created and yields an empty report. Only failing to
/// list or create the directory is an error; per-file problems end up in
/// [`IngestReport::skipped`].
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_projects(dir: &Path) -> Result<IngestReport> {
    if !dir.exists() {
        info!("content directory missing, creating it");
        std::fs::create_dir_all(dir).map_err(|e| SiteError::io(dir, e))?;
        return Ok(IngestReport::default());
    }

    let files = markdown_files(dir)?;
    info!(count = files.len(), "found project files");

    let mut report = IngestReport::default();
    for path in files {
        match load_project(&path) {
            Ok(project) => {
                debug!(file = %project.file_name, slug = %project.slug, "parsed project");
                report.projects.push(project);
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping project file");
                report.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Read and parse a single project file.
pub fn load_project(path: &Path) -> Result<ProjectSource> {
    let raw = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_project(&file_name, &raw)
}

/// Parse a project from raw file contents.
pub fn parse_project(file_name: &str, raw: &str) -> Result<ProjectSource> {
    let fm = frontmatter::split(raw)?;

    let title = required(&fm.data, "title")?;
    let link = required(&fm.data, "link")?;
    let description = required(&fm.data, "description")?;

    let slug = slugify(&title);
    if slug.is_empty() {
        return Err(SiteError::validation(format!(
            "title '{title}' does not produce a usable slug"
        )));
    }

    Ok(ProjectSource {
        file_name: file_name.to_string(),
        title,
        link,
        description,
        tags: tags(&fm.data),
        logo: optional(&fm.data, "logo"),
        screenshot: optional(&fm.data, "screenshot"),
        slug,
        content_html: markdown::to_html(fm.body),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// List `*.md` files directly inside `dir`, sorted by name.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| SiteError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SiteError::io(dir, e))?;
        let path = entry.path();
        let is_md = path.extension().is_some_and(|ext| ext == "md");
        if is_md && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Strings and other scalars as trimmed text.
fn scalar_string(value: &JsonValue) -> Option<String> {
    let text = match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn required(data: &JsonValue, key: &str) -> Result<String> {
    data.get(key)
        .and_then(scalar_string)
        .ok_or_else(|| SiteError::validation(format!("missing required field `{key}`")))
}

fn optional(data: &JsonValue, key: &str) -> Option<String> {
    data.get(key).and_then(scalar_string)
}

fn tags(data: &JsonValue) -> Vec<String> {
    let Some(JsonValue::Array(items)) = data.get("tags") else {
        return Vec::new();
    };

    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for tag in items.iter().filter_map(scalar_string) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

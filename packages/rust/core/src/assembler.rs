//! Output directory assembler.
//!
//! Takes enriched projects, category groups and the leaderboard, renders
//! them through `allweneed_site`, and writes the final site to disk.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use allweneed_shared::{
    CategoryGroup, HomepageConfig, LeaderboardEntry, ProjectRecord, Result, SiteError,
};
use allweneed_site::{self as site, SiteInfo, SiteStats};

/// Projects export consumed by the browser search.
pub const PROJECTS_JSON: &str = "projects.json";
/// Leaderboard export consumed by the leaderboard page.
pub const LEADERBOARD_JSON: &str = "leaderboard.json";

/// Everything needed to render the site.
#[derive(Debug, Clone)]
pub struct AssembleInput<'a> {
    /// Site identity.
    pub site: &'a SiteInfo,
    /// Homepage layout knobs.
    pub homepage: &'a HomepageConfig,
    /// Enriched projects in build order.
    pub projects: &'a [ProjectRecord],
    /// Category groups, already sorted.
    pub groups: &'a [CategoryGroup],
    /// All-time leaderboard.
    pub leaderboard: &'a [LeaderboardEntry],
    /// Optional directory of extra static files.
    pub assets_dir: &'a Path,
    /// Timestamp stamped into the sitemap.
    pub built_at: DateTime<Utc>,
}

/// Output from a successful assembly.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Number of distinct project detail pages.
    pub project_pages: usize,
    /// Files copied from the assets directory.
    pub assets_copied: usize,
}

/// Write the complete site into `output_dir`.
///
/// Creates the following layout:
/// ```text
/// <output_dir>/
/// ├── index.html
/// ├── leaderboard.html
/// ├── projects/
/// │   ├── index.html
/// │   └── <slug>.html
/// ├── projects.json
/// ├── leaderboard.json
/// ├── sitemap.xml
/// ├── robots.txt
/// ├── styles.css, search.js, logo.svg
/// └── assets/
/// ```
///
/// Any previous contents of `output_dir` are removed first.
#[instrument(skip_all, fields(output = %output_dir.display(), projects = input.projects.len()))]
pub fn assemble(output_dir: &Path, input: &AssembleInput<'_>) -> Result<AssembleResult> {
    prepare_output_dir(output_dir)?;

    for (name, body) in site::STATIC_FILES {
        write_file(&output_dir.join(name), body)?;
    }
    let assets_copied = copy_assets(input.assets_dir, &output_dir.join("assets"))?;

    // Detail pages; a repeated slug overwrites the earlier page.
    let projects_dir = output_dir.join("projects");
    let mut slugs = HashSet::new();
    for project in input.projects {
        let html = site::project_page(input.site, project);
        write_file(&projects_dir.join(format!("{}.html", project.slug)), &html)?;
        slugs.insert(project.slug.as_str());
    }

    let stats = SiteStats::collect(input.projects, input.groups);
    write_file(
        &output_dir.join("index.html"),
        &site::home_page(input.site, input.homepage, input.groups, &stats),
    )?;
    write_file(
        &projects_dir.join("index.html"),
        &site::listing_page(input.site, input.homepage, input.projects),
    )?;
    write_file(
        &output_dir.join("leaderboard.html"),
        &site::leaderboard_page(input.site, input.leaderboard),
    )?;

    write_json(&output_dir.join(PROJECTS_JSON), &input.projects)?;
    write_json(&output_dir.join(LEADERBOARD_JSON), &input.leaderboard)?;

    write_file(
        &output_dir.join("sitemap.xml"),
        &site::sitemap_xml(input.site, input.projects, input.built_at),
    )?;
    write_file(&output_dir.join("robots.txt"), &site::robots_txt(input.site))?;

    info!(
        project_pages = slugs.len(),
        categories = input.groups.len(),
        assets_copied,
        "site assembly complete"
    );

    Ok(AssembleResult {
        output_dir: output_dir.to_path_buf(),
        project_pages: slugs.len(),
        assets_copied,
    })
}

// ---------------------------------------------------------------------------
// Filesystem helpers
// ---------------------------------------------------------------------------

/// Refuse an output directory that is, or contains, one of `sources`.
///
/// Clearing such a directory would delete the build's own input. Paths that
/// do not exist yet are resolved through their nearest existing ancestor.
pub fn ensure_disjoint(output_dir: &Path, sources: &[&Path]) -> Result<()> {
    let output = resolve(output_dir)?;
    for source in sources {
        let resolved = resolve(source)?;
        if resolved.starts_with(&output) {
            return Err(SiteError::config(format!(
                "output directory {} would overwrite {}",
                output_dir.display(),
                source.display()
            )));
        }
    }
    Ok(())
}

fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| SiteError::io(path, e))?;

    // Canonicalize the deepest existing ancestor, then re-append the rest.
    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(mut resolved) = std::fs::canonicalize(existing) {
            resolved.extend(rest.iter().rev());
            return Ok(resolved);
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => return Ok(absolute),
        }
    }
}

/// Empty `dir` and recreate it with a `projects/` subdirectory.
///
/// Whole-directory removal is tried first. If that fails, each entry is
/// removed on its own and leftovers are only logged. Creating the fresh
/// directories is the only fatal step.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if let Err(e) = std::fs::remove_dir_all(dir) {
            warn!(
                path = %dir.display(),
                error = %e,
                "could not remove output directory, clearing entries"
            );
            clear_entries(dir);
        }
    }

    let projects = dir.join("projects");
    std::fs::create_dir_all(&projects).map_err(|e| SiteError::io(&projects, e))?;
    debug!(path = %dir.display(), "output directory ready");
    Ok(())
}

fn clear_entries(dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "could not list output directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let removed = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        if let Err(e) = removed {
            warn!(path = %path.display(), error = %e, "could not remove stale output entry");
        }
    }
}

/// Copy regular files from `src` into `dest` (flat). A missing `src` copies
/// nothing; subdirectories are skipped.
pub fn copy_assets(src: &Path, dest: &Path) -> Result<usize> {
    if !src.is_dir() {
        debug!(path = %src.display(), "no assets directory");
        return Ok(0);
    }

    std::fs::create_dir_all(dest).map_err(|e| SiteError::io(dest, e))?;
    let entries = std::fs::read_dir(src).map_err(|e| SiteError::io(src, e))?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry.map_err(|e| SiteError::io(src, e))?;
        let path = entry.path();
        if !path.is_file() {
            debug!(path = %path.display(), "skipping non-file asset");
            continue;
        }
        let target = dest.join(entry.file_name());
        std::fs::copy(&path, &target).map_err(|e| SiteError::io(&target, e))?;
        copied += 1;
    }

    debug!(copied, "copied assets");
    Ok(copied)
}

/// Write a file atomically: temp file in the same directory, then rename.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, contents).map_err(|e| SiteError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| SiteError::io(path, e))?;

    debug!(path = %path.display(), size = contents.len(), "wrote file");
    Ok(())
}

/// Write a JSON file (pretty-printed).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| SiteError::validation(format!("JSON serialization failed: {e}")))?;
    write_file(path, &json)
}

/// Read a JSON file written by a previous build.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| SiteError::parse(format!("invalid {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

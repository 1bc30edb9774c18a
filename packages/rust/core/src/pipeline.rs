//! End-to-end `build` pipeline: content → enrichment → leaderboard → site.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{info, instrument, warn};

use allweneed_content::{IngestReport, ProjectSource, SkippedFile};
use allweneed_github::{GitHubClient, RepoRef};
use allweneed_shared::{BuildConfig, LeaderboardEntry, ProjectRecord, Result};
use allweneed_site::SiteInfo;

use crate::assembler::{self, AssembleInput};
use crate::categories;
use crate::enrichment::Enricher;
use crate::leaderboard;

/// Result of the `build` pipeline.
#[derive(Debug)]
pub struct BuildResult {
    /// Output directory.
    pub output_dir: PathBuf,
    /// Projects rendered.
    pub project_count: usize,
    /// Content files left out.
    pub skipped: Vec<SkippedFile>,
    /// Homepage categories.
    pub category_count: usize,
    /// Leaderboard authors.
    pub leaderboard_entries: usize,
    /// Extra assets copied.
    pub assets_copied: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each project is enriched.
    fn project_processed(&self, title: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn project_processed(&self, _title: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Projects sharing one slug. Only the last file's detail page survives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugCollision {
    /// The shared slug.
    pub slug: String,
    /// Source files in processing order.
    pub files: Vec<String>,
}

/// Run the full build.
///
/// 1. Read and validate content files
/// 2. Resolve logos and contributors, one project at a time
/// 3. Aggregate the site repository's merged pull requests
/// 4. Group by tag
/// 5. Render and write the output directory
#[instrument(
    skip_all,
    fields(
        content = %config.content_dir.display(),
        output = %config.output_dir.display(),
    )
)]
pub async fn build_site(
    config: &BuildConfig,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();
    info!("starting site build");
    assembler::ensure_disjoint(
        &config.output_dir,
        &[config.content_dir.as_path(), config.assets_dir.as_path()],
    )?;

    // --- Phase 1: Content ---
    progress.phase("Reading content");
    let IngestReport {
        projects: sources,
        skipped,
    } = allweneed_content::load_projects(&config.content_dir)?;
    for collision in slug_collisions(&sources) {
        warn!(
            slug = %collision.slug,
            files = ?collision.files,
            "duplicate slug, last file's page wins"
        );
    }

    let client = GitHubClient::new(&config.github)?;
    if !client.is_authenticated() {
        info!("no GitHub token set, using unauthenticated rate limits");
    }

    // --- Phase 2: Enrichment ---
    progress.phase("Enriching projects");
    let projects = enrich_all(&client, config, sources, progress).await;

    // --- Phase 3: Leaderboard ---
    progress.phase("Building leaderboard");
    let board = build_leaderboard(&client, config.repository.as_deref()).await;

    // --- Phase 4: Categories ---
    let groups = categories::group_by_tag(&projects);

    // --- Phase 5: Assemble ---
    progress.phase("Writing site");
    let site = SiteInfo::from(config);
    let assembled = assembler::assemble(
        &config.output_dir,
        &AssembleInput {
            site: &site,
            homepage: &config.homepage,
            projects: &projects,
            groups: &groups,
            leaderboard: &board,
            assets_dir: &config.assets_dir,
            built_at: Utc::now(),
        },
    )?;

    let result = BuildResult {
        output_dir: assembled.output_dir,
        project_count: projects.len(),
        skipped,
        category_count: groups.len(),
        leaderboard_entries: board.len(),
        assets_copied: assembled.assets_copied,
        elapsed: start.elapsed(),
    };

    info!(
        projects = result.project_count,
        skipped = result.skipped.len(),
        categories = result.category_count,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "site build complete"
    );

    progress.done(&result);
    Ok(result)
}

/// Validate content without touching the network or the output directory.
#[instrument(skip_all, fields(content = %content_dir.display()))]
pub fn check_content(content_dir: &Path) -> Result<(IngestReport, Vec<SlugCollision>)> {
    let report = allweneed_content::load_projects(content_dir)?;
    let collisions = slug_collisions(&report.projects);
    Ok((report, collisions))
}

/// Slugs claimed by more than one source, ordered by slug.
pub fn slug_collisions(sources: &[ProjectSource]) -> Vec<SlugCollision> {
    let mut by_slug: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for source in sources {
        by_slug
            .entry(source.slug.as_str())
            .or_default()
            .push(source.file_name.clone());
    }

    by_slug
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(slug, files)| SlugCollision {
            slug: slug.to_string(),
            files,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Enrich sources sequentially, in input order.
async fn enrich_all(
    client: &GitHubClient,
    config: &BuildConfig,
    sources: Vec<ProjectSource>,
    progress: &dyn ProgressReporter,
) -> Vec<ProjectRecord> {
    let enricher = Enricher::new(client, config);
    let total = sources.len();
    let mut projects = Vec::with_capacity(total);

    for (i, source) in sources.into_iter().enumerate() {
        let record = enricher.enrich(source).await;
        progress.project_processed(&record.title, i + 1, total);
        projects.push(record);
    }

    projects
}

async fn build_leaderboard(
    client: &GitHubClient,
    repository: Option<&str>,
) -> Vec<LeaderboardEntry> {
    let Some(repository) = repository else {
        info!("no site repository configured, skipping leaderboard");
        return Vec::new();
    };

    let Some(RepoRef {
        owner,
        repo: Some(repo),
    }) = RepoRef::from_slug(repository)
    else {
        warn!(%repository, "site repository is not owner/repo, skipping leaderboard");
        return Vec::new();
    };

    let pulls = client.closed_pulls(&owner, &repo).await;
    leaderboard::aggregate(&pulls)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use allweneed_core::assembler::{self, LEADERBOARD_JSON, PROJECTS_JSON};
use allweneed_core::pipeline::{BuildResult, ProgressReporter};
use allweneed_core::search::{self, DEFAULT_THRESHOLD};
use allweneed_core::{TimeWindow, leaderboard};
use allweneed_shared::{
    AppConfig, BuildConfig, CONFIG_FILE_NAME, LeaderboardEntry, ProjectRecord, init_config,
    load_config, resolve_token,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// allweneed: build a searchable directory site from markdown.
#[derive(Parser)]
#[command(
    name = "allweneed",
    version,
    about = "Build a searchable directory website from markdown project files.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Path to the config file (defaults to ./allweneed.toml if present).
    #[arg(long, global = true, env = "ALLWENEED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the site into the output directory.
    Build {
        /// Directory of project markdown files.
        #[arg(long)]
        content: Option<PathBuf>,

        /// Output directory (cleared first).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Extra static assets copied to <out>/assets.
        #[arg(long)]
        assets: Option<PathBuf>,

        /// Public base URL for canonical links and the sitemap.
        #[arg(long)]
        site_url: Option<String>,

        /// Site repository (owner/repo) used for the leaderboard.
        #[arg(long)]
        repo: Option<String>,

        /// Skip fetching pull requests for the leaderboard.
        #[arg(long)]
        no_leaderboard: bool,
    },

    /// Validate content files without building.
    Check {
        /// Directory of project markdown files.
        #[arg(long)]
        content: Option<PathBuf>,
    },

    /// Fuzzy-search a built site's projects.
    Search {
        /// Search terms.
        query: String,

        /// Built site directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum results to print.
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Show a built site's leaderboard for a time window.
    Leaderboard {
        /// Window: daily, week, month, or all.
        #[arg(short, long, default_value = "all")]
        window: String,

        /// Built site directory.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum rows to print.
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "allweneed=info",
        1 => "allweneed=debug",
        _ => "allweneed=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build {
            content,
            out,
            assets,
            site_url,
            repo,
            no_leaderboard,
        } => {
            let overrides = BuildOverrides {
                content,
                out,
                assets,
                site_url,
                repo,
                no_leaderboard,
            };
            cmd_build(config_path, overrides).await
        }
        Command::Check { content } => cmd_check(config_path, content),
        Command::Search { query, out, limit } => cmd_search(config_path, &query, out, limit),
        Command::Leaderboard { window, out, limit } => {
            cmd_leaderboard(config_path, &window, out, limit)
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// `build` flags that take precedence over the config file.
struct BuildOverrides {
    content: Option<PathBuf>,
    out: Option<PathBuf>,
    assets: Option<PathBuf>,
    site_url: Option<String>,
    repo: Option<String>,
    no_leaderboard: bool,
}

impl BuildOverrides {
    fn apply(self, config: &AppConfig) -> BuildConfig {
        let mut build = BuildConfig::from(config);
        build.github.token = resolve_token(config);

        if let Some(content) = self.content {
            build.content_dir = content;
        }
        if let Some(out) = self.out {
            build.output_dir = out;
        }
        if let Some(assets) = self.assets {
            build.assets_dir = assets;
        }
        if let Some(url) = self.site_url {
            build.site_url = url.trim_end_matches('/').to_string();
        }
        if let Some(repo) = self.repo {
            build.repository = Some(repo);
        }
        if self.no_leaderboard {
            build.repository = None;
        }
        build
    }
}

async fn cmd_build(config_path: Option<&Path>, overrides: BuildOverrides) -> Result<()> {
    let config = load_config(config_path)?;
    let build = overrides.apply(&config);

    info!(
        content = %build.content_dir.display(),
        output = %build.output_dir.display(),
        repository = build.repository.as_deref().unwrap_or("-"),
        "building site"
    );

    let reporter = CliProgress::new();
    let result = allweneed_core::build_site(&build, &reporter).await?;

    println!();
    println!("  Site generated successfully!");
    println!("  Projects:    {}", result.project_count);
    println!("  Categories:  {}", result.category_count);
    println!("  Leaderboard: {}", result.leaderboard_entries);
    if !result.skipped.is_empty() {
        println!("  Skipped:     {}", result.skipped.len());
        for skipped in &result.skipped {
            println!("    {}: {}", skipped.path.display(), skipped.reason);
        }
    }
    println!("  Output:      {}", result.output_dir.display());
    println!("  Time:        {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn project_processed(&self, title: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Enriching [{current}/{total}] {title}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// check / search / leaderboard
// ---------------------------------------------------------------------------

fn cmd_check(config_path: Option<&Path>, content: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let content = content.unwrap_or_else(|| PathBuf::from(&config.paths.content_dir));

    let (report, collisions) = allweneed_core::check_content(&content)?;

    println!("  Valid projects: {}", report.projects.len());
    for skipped in &report.skipped {
        println!("  invalid  {}: {}", skipped.path.display(), skipped.reason);
    }
    for collision in &collisions {
        println!(
            "  duplicate slug '{}': {}",
            collision.slug,
            collision.files.join(", ")
        );
    }

    if report.skipped.is_empty() {
        Ok(())
    } else {
        Err(eyre!(
            "{} content file(s) failed validation",
            report.skipped.len()
        ))
    }
}

/// Output directory from the flag or the config file.
fn output_dir(config_path: Option<&Path>, out: Option<PathBuf>) -> Result<PathBuf> {
    match out {
        Some(out) => Ok(out),
        None => Ok(PathBuf::from(load_config(config_path)?.paths.output_dir)),
    }
}

fn cmd_search(
    config_path: Option<&Path>,
    query: &str,
    out: Option<PathBuf>,
    limit: usize,
) -> Result<()> {
    let out = output_dir(config_path, out)?;
    let projects: Vec<ProjectRecord> = assembler::read_json(&out.join(PROJECTS_JSON))
        .map_err(|e| eyre!("{e} (run `allweneed build` first)"))?;

    let hits = search::search(&projects, query, DEFAULT_THRESHOLD);
    if hits.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    for hit in hits.iter().take(limit) {
        println!(
            "  {:.2}  {}  {}",
            hit.score, hit.project.title, hit.project.page
        );
        println!("        {}", hit.project.description);
    }
    Ok(())
}

fn cmd_leaderboard(
    config_path: Option<&Path>,
    window: &str,
    out: Option<PathBuf>,
    limit: usize,
) -> Result<()> {
    let out = output_dir(config_path, out)?;
    let entries: Vec<LeaderboardEntry> = assembler::read_json(&out.join(LEADERBOARD_JSON))
        .map_err(|e| eyre!("{e} (run `allweneed build` first)"))?;

    let window = TimeWindow::from_query(Some(window));
    let ranked = leaderboard::apply_window(&entries, window, Utc::now());

    println!("  Leaderboard ({window})");
    if ranked.is_empty() {
        println!("  No active contributors in this period.");
        return Ok(());
    }
    for (i, entry) in ranked.iter().take(limit).enumerate() {
        println!("  #{:<3} {:<24} {}", i + 1, entry.login, entry.count);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));
    let written = init_config(path)?;
    println!("Config initialized at: {}", written.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config: AppConfig = load_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build_flags() {
        let cli = Cli::parse_from([
            "allweneed",
            "-vv",
            "build",
            "--out",
            "site",
            "--repo",
            "a/b",
            "--no-leaderboard",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Build {
                out,
                repo,
                no_leaderboard,
                ..
            } => {
                assert_eq!(out, Some(PathBuf::from("site")));
                assert_eq!(repo.as_deref(), Some("a/b"));
                assert!(no_leaderboard);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let config = AppConfig::default();
        let build = BuildOverrides {
            content: Some("content".into()),
            out: None,
            assets: None,
            site_url: Some("https://example.org/".into()),
            repo: Some("me/site".into()),
            no_leaderboard: false,
        }
        .apply(&config);

        assert_eq!(build.content_dir, PathBuf::from("content"));
        assert_eq!(build.output_dir, PathBuf::from("docs"));
        assert_eq!(build.site_url, "https://example.org");
        assert_eq!(build.repository.as_deref(), Some("me/site"));
    }

    #[test]
    fn no_leaderboard_clears_repository() {
        let build = BuildOverrides {
            content: None,
            out: None,
            assets: None,
            site_url: None,
            repo: Some("me/site".into()),
            no_leaderboard: true,
        }
        .apply(&AppConfig::default());
        assert!(build.repository.is_none());
    }

    #[test]
    fn leaderboard_defaults_to_all() {
        let cli = Cli::parse_from(["allweneed", "leaderboard"]);
        match cli.command {
            Command::Leaderboard { window, limit, .. } => {
                assert_eq!(window, "all");
                assert_eq!(limit, 20);
            }
            _ => panic!("expected leaderboard"),
        }
    }
}

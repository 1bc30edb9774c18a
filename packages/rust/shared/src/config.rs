//! Application configuration for allweneed.
//!
//! Site config lives in `allweneed.toml` next to the content directory.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SiteError};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "allweneed.toml";

// ---------------------------------------------------------------------------
// Config structs (matching allweneed.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Site identity.
    #[serde(default)]
    pub site: SiteConfig,

    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// GitHub API settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Favicon lookup service.
    #[serde(default)]
    pub favicon: FaviconConfig,

    /// Homepage layout knobs.
    #[serde(default)]
    pub homepage: HomepageConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Display name used in titles and the header.
    #[serde(default = "default_site_name")]
    pub name: String,

    /// Public base URL, used for canonical links and the sitemap.
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Tagline shown on the homepage and in meta descriptions.
    #[serde(default = "default_site_description")]
    pub description: String,

    /// `owner/repo` of the site's own repository. Source of the leaderboard;
    /// empty disables it.
    #[serde(default = "default_repository")]
    pub repository: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
            description: default_site_description(),
            repository: default_repository(),
        }
    }
}

fn default_site_name() -> String {
    "all_we_need".into()
}
fn default_site_url() -> String {
    "https://allweneed.github.io".into()
}
fn default_site_description() -> String {
    "Discover amazing developer tools, hidden gems, and useful resources curated by the community."
        .into()
}
fn default_repository() -> String {
    "ghostshanky/allweneed.github.io".into()
}

/// `[paths]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one markdown file per project.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Optional directory of extra static files copied to `<output>/assets/`.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// Generated site directory. Cleared on every build.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            assets_dir: default_assets_dir(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_content_dir() -> String {
    "projects".into()
}
fn default_assets_dir() -> String {
    "assets".into()
}
fn default_output_dir() -> String {
    "docs".into()
}

/// `[github]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the env var holding an optional token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// How many contributors to fetch per project.
    #[serde(default = "default_contributors_limit")]
    pub contributors_limit: u32,

    /// Page size for the closed pull request listing.
    #[serde(default = "default_pulls_per_page")]
    pub pulls_per_page: u32,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
            contributors_limit: default_contributors_limit(),
            pulls_per_page: default_pulls_per_page(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_contributors_limit() -> u32 {
    10
}
fn default_pulls_per_page() -> u32 {
    100
}

/// `[favicon]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaviconConfig {
    /// Favicon service endpoint; receives `?domain=<host>&sz=<size>`.
    #[serde(default = "default_favicon_service")]
    pub service_url: String,

    /// Requested icon size in pixels.
    #[serde(default = "default_favicon_size")]
    pub size: u32,
}

impl Default for FaviconConfig {
    fn default() -> Self {
        Self {
            service_url: default_favicon_service(),
            size: default_favicon_size(),
        }
    }
}

fn default_favicon_service() -> String {
    "https://www.google.com/s2/favicons".into()
}
fn default_favicon_size() -> u32 {
    128
}

/// `[homepage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomepageConfig {
    /// Categories with more projects than this get a "Show all" toggle.
    #[serde(default = "default_collapse_threshold")]
    pub collapse_threshold: usize,

    /// Maximum tags shown on a project card.
    #[serde(default = "default_card_tags")]
    pub card_tags: usize,

    /// Maximum contributors shown on a project card.
    #[serde(default = "default_card_contributors")]
    pub card_contributors: usize,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            collapse_threshold: default_collapse_threshold(),
            card_tags: default_card_tags(),
            card_contributors: default_card_contributors(),
        }
    }
}

fn default_collapse_threshold() -> usize {
    6
}
fn default_card_tags() -> usize {
    3
}
fn default_card_contributors() -> usize {
    4
}

// ---------------------------------------------------------------------------
// Build config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime GitHub client settings.
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    /// REST API base URL.
    pub api_base: String,
    /// Optional bearer token, read from the environment at build start.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Contributors fetched per project.
    pub contributors_limit: u32,
    /// Page size for closed pull requests.
    pub pulls_per_page: u32,
}

/// Runtime build configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Site display name.
    pub site_name: String,
    /// Public base URL without trailing slash.
    pub site_url: String,
    /// Site tagline.
    pub site_description: String,
    /// `owner/repo` for the leaderboard; `None` disables it.
    pub repository: Option<String>,
    /// Markdown content directory.
    pub content_dir: PathBuf,
    /// Extra static assets directory.
    pub assets_dir: PathBuf,
    /// Output directory.
    pub output_dir: PathBuf,
    /// GitHub client settings.
    pub github: GitHubSettings,
    /// Favicon service endpoint.
    pub favicon_service: String,
    /// Favicon size in pixels.
    pub favicon_size: u32,
    /// Homepage layout knobs.
    pub homepage: HomepageConfig,
}

impl From<&AppConfig> for BuildConfig {
    fn from(config: &AppConfig) -> Self {
        let repository = config.site.repository.trim();
        Self {
            site_name: config.site.name.clone(),
            site_url: config.site.url.trim_end_matches('/').to_string(),
            site_description: config.site.description.clone(),
            repository: (!repository.is_empty()).then(|| repository.to_string()),
            content_dir: PathBuf::from(&config.paths.content_dir),
            assets_dir: PathBuf::from(&config.paths.assets_dir),
            output_dir: PathBuf::from(&config.paths.output_dir),
            github: GitHubSettings {
                api_base: config.github.api_base.trim_end_matches('/').to_string(),
                token: None,
                timeout_secs: config.github.timeout_secs,
                contributors_limit: config.github.contributors_limit,
                pulls_per_page: config.github.pulls_per_page,
            },
            favicon_service: config.favicon.service_url.clone(),
            favicon_size: config.favicon.size,
            homepage: config.homepage.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config.
///
/// With an explicit `path` the file must exist. Without one, `allweneed.toml`
/// in the working directory is used if present, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => {
            let path = Path::new(CONFIG_FILE_NAME);
            if !path.exists() {
                tracing::debug!(?path, "config file not found, using defaults");
                AppConfig::default()
            } else {
                load_config_from(path)?
            }
        }
    };

    validate_config(&config)?;
    Ok(config)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SiteError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file at `path`. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(SiteError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SiteError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SiteError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

/// Check values that serde alone cannot.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    Url::parse(&config.site.url)
        .map_err(|e| SiteError::config(format!("site.url '{}': {e}", config.site.url)))?;

    Url::parse(&config.github.api_base).map_err(|e| {
        SiteError::config(format!("github.api_base '{}': {e}", config.github.api_base))
    })?;

    let repository = config.site.repository.trim();
    if !repository.is_empty() && !is_repo_slug(repository) {
        return Err(SiteError::config(format!(
            "site.repository must look like 'owner/repo', got '{repository}'"
        )));
    }

    Ok(())
}

/// Read the GitHub token from the configured env var. Empty counts as unset.
pub fn resolve_token(config: &AppConfig) -> Option<String> {
    std::env::var(&config.github.token_env)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_repo_slug(s: &str) -> bool {
    let mut parts = s.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("content_dir"));
        assert!(toml_str.contains("GITHUB_TOKEN"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.homepage.collapse_threshold, 6);
        assert_eq!(parsed.github.token_env, "GITHUB_TOKEN");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[site]
url = "https://example.org/"

[paths]
output_dir = "public"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.paths.output_dir, "public");
        assert_eq!(config.paths.content_dir, "projects");
        assert_eq!(config.site.name, "all_we_need");
        assert_eq!(config.github.pulls_per_page, 100);
    }

    #[test]
    fn build_config_from_app_config() {
        let mut app = AppConfig::default();
        app.site.url = "https://example.org/".into();
        let build = BuildConfig::from(&app);
        assert_eq!(build.site_url, "https://example.org");
        assert_eq!(build.output_dir, PathBuf::from("docs"));
        assert_eq!(
            build.repository.as_deref(),
            Some("ghostshanky/allweneed.github.io")
        );
        assert_eq!(build.github.contributors_limit, 10);
        assert!(build.github.token.is_none());
    }

    #[test]
    fn empty_repository_disables_leaderboard() {
        let mut app = AppConfig::default();
        app.site.repository = "  ".into();
        let build = BuildConfig::from(&app);
        assert!(build.repository.is_none());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.site.url = "not a url".into();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.site.repository = "just-an-owner".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("owner/repo"));

        let mut config = AppConfig::default();
        config.site.repository = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn token_resolution() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.github.token_env = "AWN_TEST_NONEXISTENT_TOKEN_12345".into();
        assert!(resolve_token(&config).is_none());
    }
}

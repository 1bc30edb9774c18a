//! Shared types, error model, and configuration for allweneed.
//!
//! This crate is the foundation depended on by all other allweneed crates.
//! It provides:
//! - [`SiteError`]: the unified error type
//! - Domain types ([`ProjectRecord`], [`Contributor`], [`CategoryGroup`], [`LeaderboardEntry`])
//! - Configuration ([`AppConfig`], [`BuildConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BuildConfig, CONFIG_FILE_NAME, FaviconConfig, GitHubConfig, GitHubSettings,
    HomepageConfig, PathsConfig, SiteConfig, init_config, load_config, load_config_from,
    resolve_token, validate_config,
};
pub use error::{Result, SiteError};
pub use types::{
    CategoryGroup, Contributor, LeaderboardEntry, OTHER_CATEGORY, PLACEHOLDER_LOGO, ProjectRecord,
    project_page_path,
};

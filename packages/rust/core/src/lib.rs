//! Core pipeline orchestration and domain logic for allweneed.
//!
//! This crate ties together content ingestion, GitHub enrichment, category
//! grouping, leaderboard aggregation and site assembly into the end-to-end
//! `build` workflow, plus the offline `search` and `leaderboard` views over
//! a built site.

pub mod assembler;
pub mod categories;
pub mod enrichment;
pub mod leaderboard;
pub mod pipeline;
pub mod search;

pub use leaderboard::TimeWindow;
pub use pipeline::{
    BuildResult, ProgressReporter, SilentProgress, SlugCollision, build_site, check_content,
};

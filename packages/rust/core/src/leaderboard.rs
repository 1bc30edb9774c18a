//! Merged pull request leaderboard and time windows.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use allweneed_github::{PullRequest, profile_url};
use allweneed_shared::LeaderboardEntry;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Count merged pull requests per author.
///
/// Unmerged and authorless records are ignored. Avatar and profile come from
/// the author's first record. The result is sorted by count, descending;
/// equal counts keep first-seen order.
pub fn aggregate(pulls: &[PullRequest]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for pull in pulls {
        let (Some(user), Some(merged_at)) = (&pull.user, pull.merged_at) else {
            continue;
        };

        let slot = *index.entry(user.login.as_str()).or_insert_with(|| {
            entries.push(LeaderboardEntry {
                login: user.login.clone(),
                avatar_url: user.avatar_url.clone(),
                profile_url: user
                    .html_url
                    .clone()
                    .unwrap_or_else(|| profile_url(&user.login)),
                count: 0,
                merged_dates: Vec::new(),
            });
            entries.len() - 1
        });

        let entry = &mut entries[slot];
        entry.count += 1;
        entry.merged_dates.push(merged_at);
    }

    sort_by_count(&mut entries);
    debug!(
        pulls = pulls.len(),
        authors = entries.len(),
        "aggregated merged pull requests"
    );
    entries
}

fn sort_by_count(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.count.cmp(&a.count));
}

// ---------------------------------------------------------------------------
// Time windows
// ---------------------------------------------------------------------------

/// Period a leaderboard view is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// Merged within the last day.
    Daily,
    /// Within the last 7 days.
    Week,
    /// Within the last 30 days.
    Month,
    /// No restriction.
    #[default]
    All,
}

impl TimeWindow {
    /// Parse a `filter` value. Unknown or missing keys mean [`TimeWindow::All`].
    pub fn from_query(key: Option<&str>) -> Self {
        match key.map(|k| k.trim().to_ascii_lowercase()).as_deref() {
            Some("daily" | "day") => Self::Daily,
            Some("week" | "weekly") => Self::Week,
            Some("month" | "monthly") => Self::Month,
            _ => Self::All,
        }
    }

    /// Threshold in days, `None` for unbounded.
    pub fn days(self) -> Option<i64> {
        match self {
            Self::Daily => Some(1),
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::All => None,
        }
    }

    /// Canonical query key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }

    /// Whether a merge at `at` falls inside the window relative to `now`.
    ///
    /// Age is measured in whole days rounded up, in either direction, so a
    /// merge five minutes ago is one day old.
    pub fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.days() {
            None => true,
            Some(limit) => age_in_days(at, now) <= limit,
        }
    }

    /// Number of `dates` inside the window.
    pub fn windowed_count(self, dates: &[DateTime<Utc>], now: DateTime<Utc>) -> usize {
        dates.iter().filter(|&&d| self.contains(d, now)).count()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// `ceil(|now - at| / 1 day)`, with sub-second precision.
fn age_in_days(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (now - at).num_milliseconds().unsigned_abs();
    let day = (SECONDS_PER_DAY * 1000) as u64;
    millis.div_ceil(day) as i64
}

/// Restrict entries to `window`: counts are recomputed from merge dates,
/// entries left with zero merges are dropped, and the rest re-sorted.
///
/// Merge dates are kept whole so the result can be windowed again.
pub fn apply_window(
    entries: &[LeaderboardEntry],
    window: TimeWindow,
    now: DateTime<Utc>,
) -> Vec<LeaderboardEntry> {
    let mut out: Vec<LeaderboardEntry> = entries
        .iter()
        .filter_map(|entry| {
            let count = window.windowed_count(&entry.merged_dates, now);
            (count > 0).then(|| LeaderboardEntry {
                count,
                ..entry.clone()
            })
        })
        .collect();
    sort_by_count(&mut out);
    out
}

//! Retention policy definitions.

use serde::{Deserialize, Serialize};

/// Default record lifetime: 8 days.
pub const DEFAULT_MAX_AGE_SECS: i64 = 691_200;

/// Default compaction interval: 24 hours.
pub const DEFAULT_COMPACTION_INTERVAL_SECS: i64 = 86_400;

/// Retention policy for the supplementary archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Rows older than this relative to the newest record are pruned.
    /// Zero or negative disables retention maintenance entirely.
    #[serde(rename = "max_age", default = "default_max_age")]
    pub max_age_secs: i64,
    /// Minimum spacing between compactions. Zero or negative disables it.
    #[serde(rename = "vacuum", default = "default_compaction_interval")]
    pub compaction_interval_secs: i64,
    /// Reference timestamp of the last compaction attempt.
    #[serde(skip)]
    pub last_compaction: Option<i64>,
}

fn default_max_age() -> i64 {
    DEFAULT_MAX_AGE_SECS
}

fn default_compaction_interval() -> i64 {
    DEFAULT_COMPACTION_INTERVAL_SECS
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            compaction_interval_secs: DEFAULT_COMPACTION_INTERVAL_SECS,
            last_compaction: None,
        }
    }
}

impl RetentionPolicy {
    pub fn new(max_age_secs: i64, compaction_interval_secs: i64) -> Self {
        Self {
            max_age_secs,
            compaction_interval_secs,
            last_compaction: None,
        }
    }

    /// Whether retention maintenance runs at all.
    pub fn is_enabled(&self) -> bool {
        self.max_age_secs > 0
    }

    /// Rows with a timestamp strictly below this are expired.
    pub fn cutoff(&self, reference_ts: i64) -> i64 {
        reference_ts - self.max_age_secs
    }

    /// Whether a compaction should be attempted at `reference_ts`.
    pub fn compaction_due(&self, reference_ts: i64) -> bool {
        if !self.is_enabled() || self.compaction_interval_secs <= 0 {
            return false;
        }
        match self.last_compaction {
            None => true,
            Some(last) => reference_ts - last >= self.compaction_interval_secs,
        }
    }

    pub fn record_compaction(&mut self, reference_ts: i64) {
        self.last_compaction = Some(reference_ts);
    }
}

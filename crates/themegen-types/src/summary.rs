//! Run and window execution reports.

use serde::{Deserialize, Serialize};

use crate::outcome::FailedRecord;
use crate::window::Window;

/// Terminal state of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    /// Fetched, enriched, and (when any record succeeded) committed.
    Done,
    /// The fetch failed; enrichment and commit never ran.
    FailedFetch,
    /// Enrichment ran but the batch commit was rejected.
    FailedWrite,
}

impl WindowStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::FailedFetch => "failed_fetch",
            Self::FailedWrite => "failed_write",
        }
    }
}

impl std::fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution report for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    pub window: Window,
    pub status: WindowStatus,
    pub records_fetched: u64,
    pub records_succeeded: u64,
    pub records_failed: u64,
    pub records_committed: u64,
    /// Per-record failure causes, encounter order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedRecord>,
    /// Window-fatal error message for `FailedFetch` / `FailedWrite`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WindowReport {
    /// Report for a window that reached `Done`.
    #[must_use]
    pub fn done(
        window: Window,
        records_fetched: u64,
        records_committed: u64,
        failures: Vec<FailedRecord>,
    ) -> Self {
        let records_failed = failures.len() as u64;
        Self {
            window,
            status: WindowStatus::Done,
            records_fetched,
            records_succeeded: records_fetched - records_failed,
            records_failed,
            records_committed,
            failures,
            error: None,
        }
    }

    /// Report for a window whose fetch failed; contributes zero records.
    #[must_use]
    pub fn failed_fetch(window: Window, error: String) -> Self {
        Self {
            window,
            status: WindowStatus::FailedFetch,
            records_fetched: 0,
            records_succeeded: 0,
            records_failed: 0,
            records_committed: 0,
            failures: Vec::new(),
            error: Some(error),
        }
    }

    /// Report for a window whose batch commit was rejected.
    #[must_use]
    pub fn failed_write(
        window: Window,
        records_fetched: u64,
        records_succeeded: u64,
        failures: Vec<FailedRecord>,
        error: String,
    ) -> Self {
        Self {
            window,
            status: WindowStatus::FailedWrite,
            records_fetched,
            records_succeeded,
            records_failed: failures.len() as u64,
            records_committed: 0,
            failures,
            error: Some(error),
        }
    }
}

/// Aggregate tally for a whole pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pipeline: String,
    /// RFC3339 timestamp of when planning started.
    pub started_at: String,
    pub duration_secs: f64,
    pub windows_planned: u64,
    pub windows_done: u64,
    pub windows_failed_fetch: u64,
    pub windows_failed_write: u64,
    pub records_fetched: u64,
    pub records_committed: u64,
    pub records_failed: u64,
    /// Per-window reports ordered by window offset.
    pub windows: Vec<WindowReport>,
}

impl RunSummary {
    /// True when any window or record failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.windows_failed_fetch > 0 || self.windows_failed_write > 0 || self.records_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;

    #[test]
    fn done_report_counts() {
        let failures = vec![FailedRecord {
            id: Some(RecordId::new("4")),
            cause: "timeout".into(),
        }];
        let report = WindowReport::done(Window::new(0, 5), 5, 4, failures);
        assert_eq!(report.status, WindowStatus::Done);
        assert_eq!(report.records_succeeded, 4);
        assert_eq!(report.records_failed, 1);
        assert_eq!(report.records_committed, 4);
    }

    #[test]
    fn failed_fetch_report_is_empty() {
        let report = WindowReport::failed_fetch(Window::new(100, 50), "boom".into());
        assert_eq!(report.status, WindowStatus::FailedFetch);
        assert_eq!(report.records_fetched, 0);
        assert_eq!(report.error.as_deref(), Some("boom"));
    }

    #[test]
    fn failed_write_commits_nothing() {
        let report =
            WindowReport::failed_write(Window::new(0, 10), 10, 9, Vec::new(), "rejected".into());
        assert_eq!(report.records_committed, 0);
        assert_eq!(report.records_succeeded, 9);
    }

    #[test]
    fn summary_failure_flag() {
        let mut summary = RunSummary::default();
        assert!(!summary.has_failures());
        summary.windows_failed_write = 1;
        assert!(summary.has_failures());
    }

    #[test]
    fn summary_roundtrip() {
        let summary = RunSummary {
            pipeline: "p".into(),
            started_at: "2026-08-07T00:00:00Z".into(),
            duration_secs: 1.5,
            windows_planned: 2,
            windows_done: 2,
            records_fetched: 150,
            records_committed: 140,
            records_failed: 10,
            ..RunSummary::default()
        };
        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(summary, back);
    }
}

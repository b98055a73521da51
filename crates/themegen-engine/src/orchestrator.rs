//! Pipeline orchestrator: plans windows, drives them with bounded
//! parallelism, and assembles the run tally.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use themegen_types::{RunSummary, Window, WindowReport, WindowStatus};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::aggregate;
use crate::config::types::PipelineConfig;
use crate::config::validator::validate_pipeline;
use crate::destination::ThemeSink;
use crate::enricher::{self, EnrichOptions};
use crate::error::PipelineError;
use crate::fetcher;
use crate::model::ThemeModel;
use crate::planner;
use crate::source::RecordSource;
use crate::writer;

/// The three external collaborators a run is wired against.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn RecordSource>,
    pub model: Arc<dyn ThemeModel>,
    pub sink: Arc<dyn ThemeSink>,
}

/// Immutable per-window parameters shared across window tasks.
struct WindowParams {
    table: String,
    enrich: EnrichOptions,
}

/// Run a full pipeline: count, plan, then fetch -> enrich -> aggregate ->
/// commit per window with at most `max_parallelism` windows in flight.
///
/// Windows are independent units: a window that fails at fetch or at
/// commit is recorded in the tally and never halts its siblings. The run
/// finishes once every planned window has reached a terminal state.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfiguration`] before any window
/// starts when the config is rejected, [`PipelineError::Source`] when the
/// initial count query fails, and [`PipelineError::Infrastructure`] on
/// host-side failures (window task panics).
pub async fn run_pipeline(
    config: &PipelineConfig,
    collaborators: Collaborators,
) -> Result<RunSummary, PipelineError> {
    validate_pipeline(config)?;

    let started_at = Utc::now();
    let start = Instant::now();

    let total_count = collaborators.source.count().await?;
    let windows = planner::plan(total_count, config.resources.batch_size)?;
    let max_parallelism = config.resources.max_parallelism as usize;

    tracing::info!(
        pipeline = config.pipeline,
        total_records = total_count,
        windows = windows.len(),
        batch_size = config.resources.batch_size,
        max_parallelism,
        "Planned enrichment run"
    );

    let params = Arc::new(WindowParams {
        table: config.destination.table.clone(),
        enrich: EnrichOptions {
            max_inflight: config.resources.max_inflight_requests as usize,
            timeout: Some(Duration::from_secs(config.resources.request_timeout_secs)),
        },
    });

    let semaphore = Arc::new(Semaphore::new(max_parallelism));
    let mut window_join_set: JoinSet<WindowReport> = JoinSet::new();

    for window in &windows {
        let permit = semaphore.clone().acquire_owned().await.map_err(|e| {
            PipelineError::Infrastructure(anyhow::anyhow!("Semaphore closed: {e}"))
        })?;

        let window = *window;
        let collaborators = collaborators.clone();
        let params = params.clone();

        window_join_set.spawn(async move {
            let _permit = permit;
            process_window(window, &collaborators, &params).await
        });
    }

    let mut reports = Vec::with_capacity(windows.len());
    while let Some(joined) = window_join_set.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(join_err) => {
                return Err(PipelineError::Infrastructure(anyhow::anyhow!(
                    "Window task panicked: {join_err}"
                )));
            }
        }
    }

    // Join completion order is nondeterministic; report by plan order.
    reports.sort_by_key(|r| r.window.offset);

    let summary = tally(config.pipeline.clone(), started_at, start, windows.len(), reports);
    tracing::info!(
        pipeline = summary.pipeline,
        records_fetched = summary.records_fetched,
        records_committed = summary.records_committed,
        records_failed = summary.records_failed,
        windows_failed_fetch = summary.windows_failed_fetch,
        windows_failed_write = summary.windows_failed_write,
        duration_secs = summary.duration_secs,
        "Enrichment run completed"
    );
    Ok(summary)
}

/// Drive one window through its states. Always returns a report; fetch
/// and write failures terminate the window, never the run.
async fn process_window(
    window: Window,
    collaborators: &Collaborators,
    params: &WindowParams,
) -> WindowReport {
    let records = match fetcher::fetch_window(collaborators.source.as_ref(), window).await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!(offset = window.offset, error = %e, "Window fetch failed");
            return WindowReport::failed_fetch(window, e.to_string());
        }
    };
    let records_fetched = records.len() as u64;

    let outcomes =
        enricher::enrich_window(records, Arc::clone(&collaborators.model), &params.enrich).await;
    let result = aggregate::partition(outcomes);

    tracing::info!(
        offset = window.offset,
        fetched = records_fetched,
        succeeded = result.successes.len(),
        failed = result.failures.len(),
        "Window enriched"
    );

    match writer::commit_window(collaborators.sink.as_ref(), &params.table, &result.successes).await
    {
        Ok(committed) => WindowReport::done(window, records_fetched, committed, result.failures),
        Err(e) => {
            tracing::error!(offset = window.offset, error = %e, "Window commit failed");
            WindowReport::failed_write(
                window,
                records_fetched,
                result.successes.len() as u64,
                result.failures,
                e.to_string(),
            )
        }
    }
}

fn tally(
    pipeline: String,
    started_at: chrono::DateTime<Utc>,
    start: Instant,
    windows_planned: usize,
    reports: Vec<WindowReport>,
) -> RunSummary {
    let mut summary = RunSummary {
        pipeline,
        started_at: started_at.to_rfc3339(),
        duration_secs: start.elapsed().as_secs_f64(),
        windows_planned: windows_planned as u64,
        ..RunSummary::default()
    };

    for report in &reports {
        match report.status {
            WindowStatus::Done => summary.windows_done += 1,
            WindowStatus::FailedFetch => summary.windows_failed_fetch += 1,
            WindowStatus::FailedWrite => summary.windows_failed_write += 1,
        }
        summary.records_fetched += report.records_fetched;
        summary.records_committed += report.records_committed;
        summary.records_failed += report.records_failed;
    }
    summary.windows = reports;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_sums_reports_by_status() {
        let reports = vec![
            WindowReport::done(Window::new(0, 10), 10, 9, vec![]),
            WindowReport::failed_fetch(Window::new(10, 10), "down".into()),
            WindowReport::failed_write(Window::new(20, 10), 10, 10, vec![], "rejected".into()),
        ];
        let summary = tally("p".into(), Utc::now(), Instant::now(), 3, reports);
        assert_eq!(summary.windows_planned, 3);
        assert_eq!(summary.windows_done, 1);
        assert_eq!(summary.windows_failed_fetch, 1);
        assert_eq!(summary.windows_failed_write, 1);
        assert_eq!(summary.records_fetched, 20);
        assert_eq!(summary.records_committed, 9);
    }

    #[test]
    fn tally_of_no_reports_is_all_zeros() {
        let summary = tally("p".into(), Utc::now(), Instant::now(), 0, vec![]);
        assert_eq!(summary.windows_planned, 0);
        assert_eq!(summary.records_fetched, 0);
        assert_eq!(summary.records_committed, 0);
        assert!(!summary.has_failures());
    }
}

use std::path::Path;

use anyhow::Result;
use themegen_types::{RunSummary, WindowStatus};

use super::{load_pipeline, wire_collaborators};

/// Execute the `run` command: parse, validate, wire, and run a pipeline.
pub async fn execute(pipeline_path: &Path, json: bool) -> Result<()> {
    let config = load_pipeline(pipeline_path)?;

    tracing::info!(
        pipeline = config.pipeline,
        source = config.source.table,
        destination = config.destination.table,
        model = config.enrichment.model,
        "Pipeline validated"
    );

    let collaborators = wire_collaborators(&config)?;
    let summary = themegen_engine::run_pipeline(&config, collaborators).await?;

    print_summary(&summary);

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Pipeline '{}' completed.", summary.pipeline);
    println!("  Windows planned:      {}", summary.windows_planned);
    println!("  Windows committed:    {}", summary.windows_done);
    println!("  Windows failed fetch: {}", summary.windows_failed_fetch);
    println!("  Windows failed write: {}", summary.windows_failed_write);
    println!("  Records fetched:      {}", summary.records_fetched);
    println!("  Records committed:    {}", summary.records_committed);
    println!("  Records failed:       {}", summary.records_failed);
    println!("  Duration:             {:.2}s", summary.duration_secs);
    if summary.duration_secs > 0.0 {
        println!(
            "  Throughput:           {:.0} records/sec",
            summary.records_fetched as f64 / summary.duration_secs
        );
    }

    for report in &summary.windows {
        match report.status {
            WindowStatus::Done => {}
            WindowStatus::FailedFetch | WindowStatus::FailedWrite => {
                println!(
                    "  ! window {}: {} ({})",
                    report.window,
                    report.status,
                    report.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        for failure in &report.failures {
            match &failure.id {
                Some(id) => println!("  ! record {}: {}", id, failure.cause),
                None => println!("  ! record <no id>: {}", failure.cause),
            }
        }
    }
}

use std::path::Path;

use anyhow::Result;

use themegen_engine::planner;
use themegen_engine::source::RecordSource as _;

use super::{load_pipeline, wire_collaborators};

/// Execute the `plan` command: print the window sequence the run would
/// process for the current source row count.
pub async fn execute(pipeline_path: &Path) -> Result<()> {
    let config = load_pipeline(pipeline_path)?;
    let collaborators = wire_collaborators(&config)?;

    let total = collaborators.source.count().await?;
    let windows = planner::plan(total, config.resources.batch_size)?;

    println!(
        "Pipeline '{}': {} rows, {} window(s)",
        config.pipeline,
        total,
        windows.len()
    );
    for (i, window) in windows.iter().enumerate() {
        println!("  [{i:>4}] {window}");
    }

    Ok(())
}

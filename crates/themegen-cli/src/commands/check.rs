use std::path::Path;

use anyhow::Result;

use themegen_engine::source::RecordSource as _;

use super::{load_pipeline, wire_collaborators};

/// Execute the `check` command: validate configuration and probe the
/// collaborators without running any enrichment.
pub async fn execute(pipeline_path: &Path) -> Result<()> {
    let config = load_pipeline(pipeline_path)?;
    println!("Configuration:  ok");

    let collaborators = wire_collaborators(&config)?;
    println!("Destination:    ok (table '{}')", config.destination.table);

    let total = collaborators.source.count().await?;
    println!(
        "Source:         ok ({} rows in '{}')",
        total, config.source.table
    );

    let windows = total.div_ceil(config.resources.batch_size);
    println!(
        "Plan:           {} window(s) of {} record(s)",
        windows, config.resources.batch_size
    );

    Ok(())
}

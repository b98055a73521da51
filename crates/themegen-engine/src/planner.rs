//! Deterministic pagination of the source dataset into fixed-size windows.

use themegen_types::Window;

use crate::error::PipelineError;

/// Produce the ordered window sequence covering `total_count` rows.
///
/// Offsets step by `batch_size` from 0; the final window's limit may
/// exceed the rows remaining. Runs once, before any window is processed —
/// rows arriving after planning are not picked up by this run.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfiguration`] when `batch_size` is 0.
pub fn plan(total_count: u64, batch_size: u64) -> Result<Vec<Window>, PipelineError> {
    if batch_size == 0 {
        return Err(PipelineError::InvalidConfiguration(
            "batch_size must be at least 1".to_string(),
        ));
    }

    let mut windows = Vec::with_capacity(total_count.div_ceil(batch_size) as usize);
    let mut offset = 0u64;
    while offset < total_count {
        windows.push(Window::new(offset, batch_size));
        offset += batch_size;
    }
    Ok(windows)
}

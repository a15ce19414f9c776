//! The batch orchestrator: drive the conversion engine over resolved inputs.
//!
//! Candidates are processed strictly one at a time, in the order the input
//! resolver produced them. This keeps at most one document's page images on
//! disk, and no two conversions ever race on the same output path. Each
//! file's outcome is recorded in the [`BatchReport`]; one failure never stops
//! the rest of the batch.

use crate::config::BatchConfig;
use crate::convert::convert;
use crate::error::Pdf2CbzError;
use crate::output::BatchReport;
use crate::pipeline::input::{resolve_input, ResolvedInput};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Convert every candidate in order and collect the results.
pub async fn run_batch(candidates: &[PathBuf], config: &BatchConfig) -> BatchReport {
    let batch_start = Instant::now();
    let total = candidates.len();
    if total == 0 {
        info!("No input files found");
    } else {
        info!("Starting batch: {} file(s) at {} DPI", total, config.dpi);
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut results = Vec::with_capacity(total);
    for (i, source) in candidates.iter().enumerate() {
        let index = i + 1;
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, source);
        }

        let result = convert(config.request_for(source), config).await;

        if let Some(ref cb) = config.progress_callback {
            cb.on_file_complete(index, total, &result);
        }
        results.push(result);
    }

    let report = BatchReport {
        results,
        duration_ms: batch_start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} converted, {} skipped, {} failed, {}ms",
        report.succeeded(),
        report.attempted(),
        report.skipped(),
        report.failed(),
        report.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&report);
    }

    report
}

/// Resolve `input` and convert everything it names.
///
/// Returns the resolution alongside the report so callers can tell a single
/// file from a batch (they have different exit-code rules).
pub async fn convert_input(
    input: &str,
    config: &BatchConfig,
) -> Result<(ResolvedInput, BatchReport), Pdf2CbzError> {
    let resolved = resolve_input(input)?;
    let report = run_batch(&resolved.candidates, config).await;
    Ok((resolved, report))
}

/// Synchronous wrapper around [`run_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn run_batch_sync(
    candidates: &[PathBuf],
    config: &BatchConfig,
) -> Result<BatchReport, Pdf2CbzError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2CbzError::Internal(format!("Failed to create tokio runtime: {}", e)))?;
    Ok(runtime.block_on(run_batch(candidates, config)))
}

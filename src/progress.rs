//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! events as the orchestrator walks the resolved inputs.
//!
//! # Example
//!
//! ```rust
//! use pdf2cbz::{BatchConfig, ConversionProgressCallback, ConversionResult};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, result: &ConversionResult) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} {}", index, total, result.source.display());
//!     }
//! }
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchReport, ConversionResult};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch orchestrator as it processes each input file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in input order; `index` is 1-based.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first file, with the number of candidates.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is handed to the conversion engine.
    fn on_file_start(&self, index: usize, total_files: usize, source: &Path) {
        let _ = (index, total_files, source);
    }

    /// Called once a file has a final result (converted, skipped or failed).
    fn on_file_complete(&self, index: usize, total_files: usize, result: &ConversionResult) {
        let _ = (index, total_files, result);
    }

    /// Called once after every candidate has been attempted.
    fn on_batch_complete(&self, report: &BatchReport) {
        let _ = report;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{ConversionResult, SkipReason};
    use std::path::PathBuf;

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let result = ConversionResult::skipped(
            PathBuf::from("a.pdf"),
            PathBuf::from("a.cbz"),
            SkipReason::AlreadyConverted,
        );
        cb.on_batch_start(1);
        cb.on_file_start(1, 1, Path::new("a.pdf"));
        cb.on_file_complete(1, 1, &result);
        cb.on_batch_complete(&BatchReport::default());
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_file_start(1, 10, Path::new("x.pdf"));
    }
}

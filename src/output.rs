//! Result types produced by the conversion engine and the batch orchestrator.

use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Why a file was skipped without being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The extension is not `.pdf` (any case). Reported as a warning.
    NotAPdf,
    /// The `.cbz` already exists and `force` is off.
    AlreadyConverted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotAPdf => f.write_str("not a PDF"),
            SkipReason::AlreadyConverted => f.write_str("already converted"),
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Outcome {
    Converted,
    Skipped(SkipReason),
    Failed(ConversionError),
}

/// The flat status view of an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionStatus {
    Converted,
    Skipped,
    Failed,
}

/// Result of converting one PDF. Created once by the engine, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// The PDF as it was requested.
    pub source: PathBuf,
    /// The sibling `.cbz` path, whether or not it was written.
    pub output: PathBuf,
    pub outcome: Outcome,
    /// Pages archived. Zero unless converted.
    pub pages: usize,
    /// Wall-clock time spent on this file.
    pub duration_ms: u64,
}

impl ConversionResult {
    pub(crate) fn converted(source: PathBuf, output: PathBuf, pages: usize) -> Self {
        Self {
            source,
            output,
            outcome: Outcome::Converted,
            pages,
            duration_ms: 0,
        }
    }

    pub(crate) fn skipped(source: PathBuf, output: PathBuf, reason: SkipReason) -> Self {
        Self {
            source,
            output,
            outcome: Outcome::Skipped(reason),
            pages: 0,
            duration_ms: 0,
        }
    }

    pub(crate) fn failed(source: PathBuf, output: PathBuf, error: ConversionError) -> Self {
        Self {
            source,
            output,
            outcome: Outcome::Failed(error),
            pages: 0,
            duration_ms: 0,
        }
    }

    pub(crate) fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn status(&self) -> ConversionStatus {
        match self.outcome {
            Outcome::Converted => ConversionStatus::Converted,
            Outcome::Skipped(_) => ConversionStatus::Skipped,
            Outcome::Failed(_) => ConversionStatus::Failed,
        }
    }

    /// Human-readable detail for skipped and failed files.
    pub fn error_detail(&self) -> Option<String> {
        match self.outcome {
            Outcome::Converted => None,
            Outcome::Skipped(reason) => Some(reason.to_string()),
            Outcome::Failed(ref e) => Some(e.to_string()),
        }
    }

    /// The per-file error, if the conversion failed.
    pub fn error(&self) -> Option<&ConversionError> {
        match self.outcome {
            Outcome::Failed(ref e) => Some(e),
            _ => None,
        }
    }
}

/// Aggregate of a batch run, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<ConversionResult>,
    /// Wall-clock time for the whole batch.
    pub duration_ms: u64,
}

impl BatchReport {
    /// Every candidate processed, whatever the outcome.
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(ConversionStatus::Converted)
    }

    pub fn skipped(&self) -> usize {
        self.count(ConversionStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(ConversionStatus::Failed)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    fn count(&self, status: ConversionStatus) -> usize {
        self.results.iter().filter(|r| r.status() == status).count()
    }
}

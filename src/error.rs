//! Error types for the pdf2cbz library.
//!
//! Two layers of error reflect two distinct failure modes:
//!
//! * [`Pdf2CbzError`] — **Fatal**: the batch cannot start at all (a named
//!   directory is missing, the glob pattern is malformed, the configuration
//!   is invalid). Returned as `Err(Pdf2CbzError)` before any file is touched.
//!
//! * [`ConversionError`] — **Per file**: one PDF failed to convert but the
//!   rest of the batch is unaffected. Stored inside
//!   [`crate::output::Outcome::Failed`] so callers can inspect the whole
//!   batch rather than losing it to one bad document.
//!
//! The adapter traits report their own narrower errors ([`RasterizeError`],
//! [`ArchiveError`]); the conversion engine wraps them into a
//! [`ConversionError`] at its boundary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2cbz library.
///
/// Per-file failures use [`ConversionError`] and are stored in
/// [`crate::output::ConversionResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Pdf2CbzError {
    // ── Resolution errors ─────────────────────────────────────────────────
    /// The argument names a directory (trailing separator) that does not exist.
    #[error("Directory not found: '{path}'\nCheck the path exists and is a directory.")]
    DirectoryNotFound { path: PathBuf },

    /// The directory exists but could not be listed.
    #[error("Cannot read directory '{path}': {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The argument looked like a glob pattern but could not be parsed.
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single PDF.
///
/// Every variant carries enough context to print a one-line diagnostic
/// without the surrounding [`crate::output::ConversionResult`].
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum ConversionError {
    /// The source PDF does not exist.
    #[error("not found: '{path}'")]
    InputNotFound { path: PathBuf },

    /// The scratch workspace could not be created.
    #[error("cannot create scratch workspace: {detail}")]
    Workspace { detail: String },

    /// The rasterizer reported a failure.
    #[error("extraction failed: {source}")]
    ExtractionFailed {
        #[from]
        source: RasterizeError,
    },

    /// The rasterizer ran but produced no page images.
    #[error("no pages extracted from '{path}'")]
    NoPagesExtracted { path: PathBuf },

    /// The archiver could not build the CBZ.
    #[error("archive creation failed: {source}")]
    ArchiveFailed {
        #[from]
        source: ArchiveError,
    },

    /// The finished archive could not be moved to its destination.
    #[error("cannot publish '{path}': {detail}")]
    PublishFailed { path: PathBuf, detail: String },

    /// The conversion task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure reported by a [`crate::pipeline::render::Rasterizer`].
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum RasterizeError {
    /// The rendering engine itself is unavailable (e.g. libpdfium missing).
    #[error("rendering engine unavailable: {0}")]
    Engine(String),

    /// The PDF could not be opened or parsed.
    #[error("cannot open PDF '{path}': {detail}")]
    Load { path: PathBuf, detail: String },

    /// A single page failed to render.
    #[error("page {page} failed to render: {detail}")]
    Render { page: usize, detail: String },

    /// A rendered page could not be written to disk.
    #[error("cannot write page {page} to '{path}': {detail}")]
    Write {
        page: usize,
        path: PathBuf,
        detail: String,
    },

    /// The document opened fine but has zero pages.
    #[error("document has no pages")]
    NoPages,
}

/// Failure reported by a [`crate::pipeline::archive::Archiver`].
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum ArchiveError {
    /// The archive file could not be created.
    #[error("cannot create '{path}': {detail}")]
    Create { path: PathBuf, detail: String },

    /// An image could not be added as an entry.
    #[error("cannot add '{path}': {detail}")]
    AddEntry { path: PathBuf, detail: String },

    /// The central directory could not be written.
    #[error("cannot finalise archive: {detail}")]
    Finish { detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_and_no_pages_are_distinct() {
        let extraction = ConversionError::from(RasterizeError::Load {
            path: "a.pdf".into(),
            detail: "bad xref".into(),
        });
        let empty = ConversionError::NoPagesExtracted {
            path: "a.pdf".into(),
        };
        assert!(extraction.to_string().starts_with("extraction failed"));
        assert!(extraction.to_string().contains("bad xref"));
        assert!(empty.to_string().starts_with("no pages extracted"));
    }

    #[test]
    fn archive_error_display() {
        let e = ConversionError::from(ArchiveError::Finish {
            detail: "disk full".into(),
        });
        let msg = e.to_string();
        assert!(msg.contains("archive creation failed"), "got: {msg}");
        assert!(msg.contains("disk full"), "got: {msg}");
    }

    #[test]
    fn invalid_glob_display() {
        let e = Pdf2CbzError::InvalidGlob {
            pattern: "[a".into(),
            reason: "unclosed bracket".into(),
        };
        assert!(e.to_string().contains("[a"));
    }

    #[test]
    fn conversion_error_serialises() {
        let e = ConversionError::InputNotFound {
            path: "missing.pdf".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("InputNotFound"), "got: {json}");
    }
}

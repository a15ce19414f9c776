//! # pdf2cbz
//!
//! Convert PDF documents into CBZ comic archives.
//!
//! Every page is rasterised to an image, the images are packed into a zip
//! container, and the result is placed next to the source as `<name>.cbz`.
//! Inputs can be a single file, a directory (non-recursive) or a glob
//! pattern; already-converted files are skipped unless `force` is set.
//!
//! ## Pipeline Overview
//!
//! ```text
//! argument
//!  │
//!  ├─ 1. Resolve    file | directory | glob  →  ordered candidate PDFs
//!  └─ 2. For each candidate, sequentially:
//!        ├─ validate    exists? .pdf? .cbz already there?
//!        ├─ workspace   fresh temp dir, removed on every exit path
//!        ├─ render      pdfium, one image per page (spawn_blocking)
//!        ├─ archive     zip the page images in page order
//!        └─ publish     atomic rename next to the source
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2cbz::{convert_input, BatchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder().dpi(200).build()?;
//!     let (_resolved, report) = convert_input("comics/", &config).await?;
//!     eprintln!(
//!         "{}/{} converted, {} skipped, {} failed",
//!         report.succeeded(),
//!         report.attempted(),
//!         report.skipped(),
//!         report.failed()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2cbz` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Rendering engine
//!
//! The default [`pipeline::render::PdfiumRasterizer`] needs a libpdfium
//! shared library at run time. Point `PDFIUM_LIB_PATH` at it, drop it in the
//! working directory, or install it system-wide. Library users can plug in
//! their own [`Rasterizer`] and [`Archiver`] through [`BatchConfigBuilder`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_input, run_batch, run_batch_sync};
pub use config::{BatchConfig, BatchConfigBuilder, PageFormat, DEFAULT_DPI};
pub use convert::{convert, convert_blocking, output_path_for, ConversionRequest};
pub use error::{ArchiveError, ConversionError, Pdf2CbzError, RasterizeError};
pub use output::{BatchReport, ConversionResult, ConversionStatus, Outcome, SkipReason};
pub use pipeline::archive::{Archiver, ZipArchiver};
pub use pipeline::input::{resolve_input, InputKind, ResolvedInput};
pub use pipeline::render::{PdfiumRasterizer, Rasterizer};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};

//! Configuration types for PDF-to-CBZ conversion.
//!
//! All batch behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. The config is passed explicitly into the batch
//! orchestrator and threaded into every [`ConversionRequest`]; nothing is
//! read from the process environment by the library itself.

use crate::convert::ConversionRequest;
use crate::error::Pdf2CbzError;
use crate::pipeline::archive::{Archiver, ZipArchiver};
use crate::pipeline::render::{PdfiumRasterizer, Rasterizer};
use crate::progress::{ConversionProgressCallback, ProgressCallback};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 150;

/// Configuration for a batch of PDF-to-CBZ conversions.
///
/// Built via [`BatchConfig::builder()`] or using [`BatchConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2cbz::{BatchConfig, PageFormat};
///
/// let config = BatchConfig::builder()
///     .dpi(200)
///     .force(true)
///     .page_format(PageFormat::Png)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 200);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Rendering DPI passed to the rasterizer. Must be ≥ 1. Default: 150.
    ///
    /// 150 DPI gives comfortable on-screen reading on tablets. Raise it for
    /// print-quality scans; every doubling roughly quadruples archive size.
    pub dpi: u32,

    /// Re-convert even when the `.cbz` already exists. Default: false.
    ///
    /// With `force = false` a rerun over the same directory is a cheap no-op:
    /// every already-converted file is skipped before any rendering happens.
    pub force: bool,

    /// Image format of the archived pages. Default: [`PageFormat::Jpeg`].
    pub page_format: PageFormat,

    /// Parent directory for scratch workspaces. If None, the system temp dir.
    pub scratch_root: Option<PathBuf>,

    /// Rasterizer override. If None, a [`PdfiumRasterizer`] is used.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Archiver override. If None, a [`ZipArchiver`] is used.
    pub archiver: Option<Arc<dyn Archiver>>,

    /// Per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            force: false,
            page_format: PageFormat::default(),
            scratch_root: None,
            rasterizer: None,
            archiver: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("dpi", &self.dpi)
            .field("force", &self.force)
            .field("page_format", &self.page_format)
            .field("scratch_root", &self.scratch_root)
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field("archiver", &self.archiver.as_ref().map(|_| "<dyn Archiver>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Build the per-file request for `source`.
    pub fn request_for(&self, source: impl AsRef<Path>) -> ConversionRequest {
        ConversionRequest {
            source: source.as_ref().to_path_buf(),
            dpi: self.dpi,
            force: self.force,
            scratch_root: self.scratch_root.clone(),
        }
    }

    /// The configured rasterizer, or the pdfium default.
    pub fn rasterizer(&self) -> Arc<dyn Rasterizer> {
        match self.rasterizer {
            Some(ref r) => Arc::clone(r),
            None => Arc::new(PdfiumRasterizer::new(self.page_format)),
        }
    }

    /// The configured archiver, or the zip default.
    pub fn archiver(&self) -> Arc<dyn Archiver> {
        match self.archiver {
            Some(ref a) => Arc::clone(a),
            None => Arc::new(ZipArchiver::new()),
        }
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.config.force = force;
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.config.page_format = format;
        self
    }

    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_root = Some(dir.into());
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn archiver(mut self, archiver: Arc<dyn Archiver>) -> Self {
        self.config.archiver = Some(archiver);
        self
    }

    pub fn progress_callback(mut self, cb: Arc<dyn ConversionProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<BatchConfig, Pdf2CbzError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(Pdf2CbzError::InvalidConfig(
                "DPI must be a positive integer, got 0".into(),
            ));
        }
        if let Some(ref root) = c.scratch_root {
            if !root.is_dir() {
                return Err(Pdf2CbzError::InvalidConfig(format!(
                    "scratch directory '{}' does not exist",
                    root.display()
                )));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Image encoding used for the archived pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageFormat {
    /// Baseline JPEG. Small files, the usual choice for comic readers. (default)
    #[default]
    Jpeg,
    /// Lossless PNG. Larger, but crisp for line art and text-heavy pages.
    Png,
}

impl PageFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            PageFormat::Jpeg => "jpg",
            PageFormat::Png => "png",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            PageFormat::Jpeg => image::ImageFormat::Jpeg,
            PageFormat::Png => image::ImageFormat::Png,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BatchConfig::default();
        assert_eq!(c.dpi, 150);
        assert!(!c.force);
        assert_eq!(c.page_format, PageFormat::Jpeg);
        assert!(c.scratch_root.is_none());
    }

    #[test]
    fn zero_dpi_rejected() {
        let err = BatchConfig::builder().dpi(0).build().unwrap_err();
        assert!(matches!(err, Pdf2CbzError::InvalidConfig(_)));
    }

    #[test]
    fn missing_scratch_root_rejected() {
        let err = BatchConfig::builder()
            .scratch_root("/definitely/not/a/real/dir")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("scratch directory"));
    }

    #[test]
    fn request_threads_settings() {
        let c = BatchConfig::builder().dpi(300).force(true).build().unwrap();
        let req = c.request_for("book.pdf");
        assert_eq!(req.source, PathBuf::from("book.pdf"));
        assert_eq!(req.dpi, 300);
        assert!(req.force);
    }

    #[test]
    fn page_format_extensions() {
        assert_eq!(PageFormat::Jpeg.extension(), "jpg");
        assert_eq!(PageFormat::Png.extension(), "png");
    }

    #[test]
    fn debug_hides_trait_objects() {
        let c = BatchConfig::builder()
            .archiver(Arc::new(ZipArchiver::new()))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn Archiver>"), "got: {dbg}");
    }
}

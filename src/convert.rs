//! The conversion engine: one PDF in, one sibling `.cbz` out.
//!
//! [`convert_blocking`] is the synchronous core. It never returns an error:
//! every failure mode ends up in the returned [`ConversionResult`], so the
//! batch orchestrator can record it and move on. [`convert`] runs the same
//! core on tokio's blocking pool and also turns a panicking adapter into a
//! Failed result.
//!
//! The only change visible outside the scratch workspace is the creation (or
//! replacement, with `force`) of the output file, and it is never partial.

use crate::config::BatchConfig;
use crate::error::{ConversionError, RasterizeError};
use crate::output::{ConversionResult, SkipReason};
use crate::pipeline::archive::Archiver;
use crate::pipeline::input::has_pdf_extension;
use crate::pipeline::publish::publish;
use crate::pipeline::render::Rasterizer;
use crate::pipeline::workspace::ScratchWorkspace;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything the engine needs to convert one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// The PDF to convert, as given.
    pub source: PathBuf,
    /// Rendering resolution, ≥ 1.
    pub dpi: u32,
    /// Overwrite an existing `.cbz` instead of skipping.
    pub force: bool,
    /// Parent directory for the scratch workspace. If None, the system temp dir.
    pub scratch_root: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn output_path(&self) -> PathBuf {
        output_path_for(&self.source)
    }
}

/// `book.pdf` → `book.cbz` in the same directory.
pub fn output_path_for(source: &Path) -> PathBuf {
    source.with_extension("cbz")
}

/// Where a successful run ended.
enum Finished {
    Converted { pages: usize },
    Skipped(SkipReason),
}

/// Convert one PDF on the current thread.
pub fn convert_blocking(
    request: &ConversionRequest,
    rasterizer: &dyn Rasterizer,
    archiver: &dyn Archiver,
) -> ConversionResult {
    let start = Instant::now();
    let source = request.source.clone();
    let output = request.output_path();

    let result = match run(request, &output, rasterizer, archiver) {
        Ok(Finished::Converted { pages }) => {
            info!("Converted {} → {} ({} pages)", source.display(), output.display(), pages);
            ConversionResult::converted(source, output, pages)
        }
        Ok(Finished::Skipped(reason)) => ConversionResult::skipped(source, output, reason),
        Err(e) => {
            warn!("Failed to convert {}: {}", source.display(), e);
            ConversionResult::failed(source, output, e)
        }
    };

    result.with_duration_ms(start.elapsed().as_millis() as u64)
}

fn run(
    request: &ConversionRequest,
    output: &Path,
    rasterizer: &dyn Rasterizer,
    archiver: &dyn Archiver,
) -> Result<Finished, ConversionError> {
    let source = &request.source;

    // ── Step 1: Validate source ──────────────────────────────────────────
    if !source.exists() {
        return Err(ConversionError::InputNotFound {
            path: source.clone(),
        });
    }
    if !has_pdf_extension(source) {
        warn!("Skipping {}: not a PDF", source.display());
        return Ok(Finished::Skipped(SkipReason::NotAPdf));
    }

    // ── Step 2: Skip if already converted ────────────────────────────────
    if output.exists() && !request.force {
        info!("Skipping {}: {} already exists", source.display(), output.display());
        return Ok(Finished::Skipped(SkipReason::AlreadyConverted));
    }

    // ── Step 3: Acquire scratch workspace ────────────────────────────────
    // Dropped (and removed) on every `?` below.
    let workspace = ScratchWorkspace::acquire(request.scratch_root.as_deref()).map_err(|e| {
        ConversionError::Workspace {
            detail: e.to_string(),
        }
    })?;

    // ── Step 4: Rasterise pages ──────────────────────────────────────────
    info!("Rendering {} at {} DPI", source.display(), request.dpi);
    let render_start = Instant::now();
    let pages = rasterizer
        .render(source, request.dpi, workspace.pages_dir())
        .map_err(|e| match e {
            RasterizeError::NoPages => ConversionError::NoPagesExtracted {
                path: source.clone(),
            },
            other => ConversionError::ExtractionFailed { source: other },
        })?;
    if pages.is_empty() {
        return Err(ConversionError::NoPagesExtracted {
            path: source.clone(),
        });
    }
    debug!(
        "Rendered {} pages in {}ms",
        pages.len(),
        render_start.elapsed().as_millis()
    );

    // ── Step 5: Build the archive inside the workspace ───────────────────
    let archive = workspace.archive_path(source);
    archiver.pack(&pages, &archive)?;

    // ── Step 6: Publish atomically ───────────────────────────────────────
    publish(&archive, output).map_err(|e| ConversionError::PublishFailed {
        path: output.to_path_buf(),
        detail: e.to_string(),
    })?;

    workspace.release();
    Ok(Finished::Converted { pages: pages.len() })
}

/// Convert one PDF using the adapters from `config`.
///
/// The blocking work runs inside `spawn_blocking`; a panic there becomes a
/// Failed result carrying [`ConversionError::Internal`].
pub async fn convert(request: ConversionRequest, config: &BatchConfig) -> ConversionResult {
    let start = Instant::now();
    let rasterizer = config.rasterizer();
    let archiver = config.archiver();
    let source = request.source.clone();

    let joined = tokio::task::spawn_blocking(move || {
        convert_blocking(&request, rasterizer.as_ref(), archiver.as_ref())
    })
    .await;

    match joined {
        Ok(result) => result,
        Err(e) => {
            warn!("Conversion task for {} panicked: {}", source.display(), e);
            let output = output_path_for(&source);
            ConversionResult::failed(
                source,
                output,
                ConversionError::Internal(format!("conversion task failed: {e}")),
            )
            .with_duration_ms(start.elapsed().as_millis() as u64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiveError;
    use crate::output::{ConversionStatus, Outcome};
    use crate::pipeline::archive::ZipArchiver;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Writes `pages` small files whose body records the DPI.
    struct FakeRasterizer {
        pages: usize,
        calls: AtomicUsize,
    }

    impl FakeRasterizer {
        fn new(pages: usize) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Rasterizer for FakeRasterizer {
        fn render(
            &self,
            _pdf: &Path,
            dpi: u32,
            dest: &Path,
        ) -> Result<Vec<PathBuf>, RasterizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (0..self.pages)
                .map(|i| -> Result<PathBuf, RasterizeError> {
                    let p = dest.join(format!("page-{:04}.jpg", i + 1));
                    std::fs::write(&p, format!("dpi={dpi}")).map_err(|e| RasterizeError::Write {
                        page: i + 1,
                        path: p.clone(),
                        detail: e.to_string(),
                    })?;
                    Ok(p)
                })
                .collect()
        }
    }

    struct FailingArchiver;

    impl Archiver for FailingArchiver {
        fn pack(&self, _images: &[PathBuf], _dest: &Path) -> Result<(), ArchiveError> {
            Err(ArchiveError::Finish {
                detail: "disk full".into(),
            })
        }
    }

    struct Fixture {
        docs: TempDir,
        scratch: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                docs: TempDir::new().unwrap(),
                scratch: TempDir::new().unwrap(),
            }
        }

        fn pdf(&self, name: &str) -> PathBuf {
            let p = self.docs.path().join(name);
            std::fs::write(&p, b"%PDF-1.7").unwrap();
            p
        }

        fn request(&self, source: PathBuf, force: bool) -> ConversionRequest {
            ConversionRequest {
                source,
                dpi: 150,
                force,
                scratch_root: Some(self.scratch.path().to_path_buf()),
            }
        }

        fn scratch_is_empty(&self) -> bool {
            std::fs::read_dir(self.scratch.path()).unwrap().next().is_none()
        }
    }

    #[test]
    fn output_path_replaces_extension() {
        assert_eq!(output_path_for(Path::new("a/report.pdf")), PathBuf::from("a/report.cbz"));
        assert_eq!(output_path_for(Path::new("B.PDF")), PathBuf::from("B.cbz"));
        assert_eq!(output_path_for(Path::new("v.1.pdf")), PathBuf::from("v.1.cbz"));
    }

    #[test]
    fn missing_source_fails() {
        let fx = Fixture::new();
        let req = fx.request(fx.docs.path().join("ghost.pdf"), false);
        let result = convert_blocking(&req, &FakeRasterizer::new(1), &ZipArchiver::new());
        assert!(matches!(
            result.outcome,
            Outcome::Failed(ConversionError::InputNotFound { .. })
        ));
    }

    #[test]
    fn non_pdf_is_skipped_without_rendering() {
        let fx = Fixture::new();
        let txt = fx.docs.path().join("notes.txt");
        std::fs::write(&txt, b"hello").unwrap();
        let raster = FakeRasterizer::new(1);

        let result = convert_blocking(&fx.request(txt, false), &raster, &ZipArchiver::new());
        assert!(matches!(result.outcome, Outcome::Skipped(SkipReason::NotAPdf)));
        assert_eq!(raster.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn existing_output_is_skipped_without_workspace() {
        let fx = Fixture::new();
        let pdf = fx.pdf("report.pdf");
        std::fs::write(fx.docs.path().join("report.cbz"), b"previous").unwrap();
        let raster = FakeRasterizer::new(3);

        let result = convert_blocking(&fx.request(pdf, false), &raster, &ZipArchiver::new());
        assert!(matches!(result.outcome, Outcome::Skipped(SkipReason::AlreadyConverted)));
        assert_eq!(raster.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            std::fs::read(fx.docs.path().join("report.cbz")).unwrap(),
            b"previous"
        );
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn converts_and_cleans_up() {
        let fx = Fixture::new();
        let pdf = fx.pdf("report.pdf");

        let result = convert_blocking(&fx.request(pdf, false), &FakeRasterizer::new(3), &ZipArchiver::new());
        assert_eq!(result.status(), ConversionStatus::Converted);
        assert_eq!(result.pages, 3);
        assert_eq!(result.output, fx.docs.path().join("report.cbz"));
        assert!(result.output.is_file());
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn zero_pages_is_distinct_failure() {
        let fx = Fixture::new();
        let pdf = fx.pdf("empty.pdf");

        let result = convert_blocking(&fx.request(pdf, false), &FakeRasterizer::new(0), &ZipArchiver::new());
        assert!(matches!(
            result.outcome,
            Outcome::Failed(ConversionError::NoPagesExtracted { .. })
        ));
        assert!(!fx.docs.path().join("empty.cbz").exists());
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn archive_failure_releases_workspace() {
        let fx = Fixture::new();
        let pdf = fx.pdf("report.pdf");

        let result = convert_blocking(&fx.request(pdf, false), &FakeRasterizer::new(2), &FailingArchiver);
        assert!(matches!(
            result.outcome,
            Outcome::Failed(ConversionError::ArchiveFailed { .. })
        ));
        assert!(result.error_detail().unwrap().contains("disk full"));
        assert!(!fx.docs.path().join("report.cbz").exists());
        assert!(fx.scratch_is_empty());
    }

    #[test]
    fn publish_failure_releases_workspace() {
        let fx = Fixture::new();
        let pdf = fx.pdf("report.pdf");
        // A non-empty directory where the archive should land cannot be
        // replaced by a rename.
        let blocker = fx.docs.path().join("report.cbz");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep.txt"), b"x").unwrap();

        let result = convert_blocking(&fx.request(pdf, true), &FakeRasterizer::new(2), &ZipArchiver::new());
        assert!(matches!(
            result.outcome,
            Outcome::Failed(ConversionError::PublishFailed { .. })
        ));
        assert!(blocker.join("keep.txt").is_file());
        assert!(fx.scratch_is_empty());
    }

    #[tokio::test]
    async fn panicking_rasterizer_becomes_failure() {
        struct Panics;
        impl Rasterizer for Panics {
            fn render(&self, _: &Path, _: u32, _: &Path) -> Result<Vec<PathBuf>, RasterizeError> {
                panic!("engine crashed");
            }
        }

        let fx = Fixture::new();
        let pdf = fx.pdf("report.pdf");
        let config = BatchConfig::builder()
            .rasterizer(std::sync::Arc::new(Panics))
            .build()
            .unwrap();

        let result = convert(fx.request(pdf, false), &config).await;
        assert!(matches!(result.outcome, Outcome::Failed(ConversionError::Internal(_))));
        assert!(fx.scratch_is_empty());
    }
}

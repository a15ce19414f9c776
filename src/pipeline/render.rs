//! PDF rasterisation: render every page to an image file via pdfium.
//!
//! The conversion engine only sees the [`Rasterizer`] trait. The default
//! implementation, [`PdfiumRasterizer`], binds to libpdfium at call time and
//! writes one image per page into the destination directory.
//!
//! ## Page file names
//!
//! Pages are written as `page-0001.jpg`, `page-0002.jpg`, … The index is
//! zero-padded to at least four digits (more for documents with ≥ 10 000
//! pages) so that a plain lexicographic sort, which is what most comic
//! readers do with archive entries, matches reading order.

use crate::config::PageFormat;
use crate::error::RasterizeError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Points per inch in PDF user space.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Turns a PDF into one image file per page.
///
/// Implementations are blocking; the engine calls them from tokio's
/// blocking pool.
pub trait Rasterizer: Send + Sync {
    /// Render every page of `pdf_path` at `dpi` into `dest_dir`.
    ///
    /// Returns the written image paths in page order. File names must sort
    /// lexicographically in the same order.
    fn render(&self, pdf_path: &Path, dpi: u32, dest_dir: &Path)
        -> Result<Vec<PathBuf>, RasterizeError>;
}

/// File name for the 0-based page `index` of a `total`-page document.
pub fn page_file_name(index: usize, total: usize, extension: &str) -> String {
    let width = total.to_string().len().max(4);
    format!("page-{:0width$}.{}", index + 1, extension, width = width)
}

/// Rasterizer backed by libpdfium.
///
/// The library is located through `PDFIUM_LIB_PATH` (a file or the
/// directory containing it), then the working directory, then the system
/// library search path.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumRasterizer {
    format: PageFormat,
}

impl PdfiumRasterizer {
    pub fn new(format: PageFormat) -> Self {
        Self { format }
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn render(
        &self,
        pdf_path: &Path,
        dpi: u32,
        dest_dir: &Path,
    ) -> Result<Vec<PathBuf>, RasterizeError> {
        let pdfium = bind_pdfium()?;

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| RasterizeError::Load {
                path: pdf_path.to_path_buf(),
                detail: one_line(&format!("{:?}", e)),
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        if total_pages == 0 {
            return Err(RasterizeError::NoPages);
        }
        info!("PDF loaded: {} pages", total_pages);

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / PDF_POINTS_PER_INCH);

        let mut written = Vec::with_capacity(total_pages);
        for (idx, page) in pages.iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                RasterizeError::Render {
                    page: idx + 1,
                    detail: one_line(&format!("{:?}", e)),
                }
            })?;

            let image = bitmap.as_image();
            let path = dest_dir.join(page_file_name(idx, total_pages, self.format.extension()));
            save_page(&image, &path, self.format).map_err(|e| RasterizeError::Write {
                page: idx + 1,
                path: path.clone(),
                detail: e.to_string(),
            })?;

            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            written.push(path);
        }

        Ok(written)
    }
}

/// Encode one rendered page. JPEG has no alpha channel, so flatten to RGB first.
fn save_page(
    image: &image::DynamicImage,
    path: &Path,
    format: PageFormat,
) -> Result<(), image::ImageError> {
    match format {
        PageFormat::Jpeg => image.to_rgb8().save_with_format(path, format.image_format()),
        PageFormat::Png => image.save_with_format(path, format.image_format()),
    }
}

/// Bind to libpdfium, honouring `PDFIUM_LIB_PATH`.
pub fn bind_pdfium() -> Result<Pdfium, RasterizeError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(p) => {
            let p = PathBuf::from(p);
            let lib = if p.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&p)
            } else {
                p
            };
            Pdfium::bind_to_library(&lib)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| {
            RasterizeError::Engine(format!(
                "{}. Set PDFIUM_LIB_PATH=/path/to/libpdfium",
                one_line(&format!("{e:?}"))
            ))
        })
}

/// Collapse pdfium's pretty-printed errors so they fit a status line.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

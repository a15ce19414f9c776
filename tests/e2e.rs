//! End-to-end tests against a real libpdfium.
//!
//! Gated behind the `E2E_ENABLED` environment variable so they do not run in
//! CI unless explicitly requested. The PDFs are generated on the fly.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=/path/to/libpdfium cargo test --test e2e -- --nocapture

use pdf2cbz::{run_batch, BatchConfig, ConversionError, ConversionStatus, PageFormat};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

/// Skip this test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
    }};
}

/// Write a minimal PDF with `pages` blank US-letter pages.
fn write_blank_pdf(path: &Path, pages: usize) {
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..pages).map(|i| format!("{} 0 R", i + 3)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages
    ));
    for _ in 0..pages {
        objects.push("<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>".to_string());
    }

    let mut body = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, obj) in objects.iter().enumerate() {
        offsets.push(body.len());
        body.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, obj));
    }

    let xref_at = body.len();
    body.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for off in offsets {
        body.push_str(&format!("{:010} 00000 n \n", off));
    }
    body.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));

    std::fs::write(path, body).unwrap();
}

fn entry_names(cbz: &Path) -> Vec<String> {
    let mut archive = ZipArchive::new(File::open(cbz).unwrap()).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[tokio::test]
async fn test_three_page_pdf_round_trip() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("report.pdf");
    write_blank_pdf(&pdf, 3);

    let config = BatchConfig::builder().dpi(72).build().unwrap();
    let report = run_batch(&[pdf], &config).await;
    let result = &report.results[0];
    assert_eq!(
        result.status(),
        ConversionStatus::Converted,
        "detail: {:?}",
        result.error_detail()
    );

    let names = entry_names(&dir.path().join("report.cbz"));
    assert_eq!(names, vec!["page-0001.jpg", "page-0002.jpg", "page-0003.jpg"]);
    println!("✓ {} pages archived", names.len());
}

#[tokio::test]
async fn test_png_pages_have_dpi_scaled_size() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("letter.pdf");
    write_blank_pdf(&pdf, 1);

    let config = BatchConfig::builder()
        .dpi(144)
        .page_format(PageFormat::Png)
        .build()
        .unwrap();
    let report = run_batch(&[pdf], &config).await;
    assert_eq!(report.succeeded(), 1, "{:?}", report.results[0].error_detail());

    let mut archive = ZipArchive::new(File::open(dir.path().join("letter.cbz")).unwrap()).unwrap();
    let mut entry = archive.by_index(0).unwrap();
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
    let img = image::load_from_memory(&bytes).unwrap();
    // 8.5in × 11in at 144 DPI.
    assert_eq!((img.width(), img.height()), (1224, 1584));
}

#[tokio::test]
async fn test_corrupt_pdf_is_extraction_failure() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().unwrap();
    let pdf: PathBuf = dir.path().join("broken.pdf");
    std::fs::write(&pdf, b"this is not a pdf at all").unwrap();

    let report = run_batch(&[pdf], &BatchConfig::default()).await;
    assert!(matches!(
        report.results[0].error(),
        Some(ConversionError::ExtractionFailed { .. })
    ));
    assert!(!dir.path().join("broken.cbz").exists());
}

//! CBZ assembly: pack page images into a zip archive.
//!
//! A CBZ is a plain zip whose entries are the page images. Entries are
//! written flat (file name only, no directories) in the order given, with
//! the `Stored` method: JPEG and PNG payloads are already compressed, so
//! deflating them again costs time for no size gain.

use crate::error::ArchiveError;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Packs a set of files into a single archive.
pub trait Archiver: Send + Sync {
    /// Write exactly `images`, in order, into a new archive at `archive_path`.
    fn pack(&self, images: &[PathBuf], archive_path: &Path) -> Result<(), ArchiveError>;
}

/// Default archiver producing a zip (CBZ) file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }
}

impl Archiver for ZipArchiver {
    fn pack(&self, images: &[PathBuf], archive_path: &Path) -> Result<(), ArchiveError> {
        let file = File::create(archive_path).map_err(|e| ArchiveError::Create {
            path: archive_path.to_path_buf(),
            detail: e.to_string(),
        })?;

        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for image in images {
            add_entry(&mut zip, image, options).map_err(|e| ArchiveError::AddEntry {
                path: image.clone(),
                detail: e.to_string(),
            })?;
        }

        zip.finish().map_err(|e| ArchiveError::Finish {
            detail: e.to_string(),
        })?;

        debug!("Packed {} entries into {}", images.len(), archive_path.display());
        Ok(())
    }
}

fn add_entry(
    zip: &mut ZipWriter<File>,
    image: &Path,
    options: SimpleFileOptions,
) -> io::Result<()> {
    let name = image
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "entry name is not UTF-8"))?;

    zip.start_file(name, options)?;
    let mut reader = BufReader::new(File::open(image)?);
    io::copy(&mut reader, zip)?;
    Ok(())
}

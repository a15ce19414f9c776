//! Input resolution: classify the user-supplied argument and expand it into
//! an ordered list of candidate PDF paths.
//!
//! Three shapes are recognised, checked in this order:
//!
//! 1. an existing directory — its direct children with a `.pdf` extension
//! 2. a glob pattern (`*` or `?`) — every regular file it matches
//! 3. anything else — a single file, passed through verbatim
//!
//! A single file is *not* checked for existence here; the conversion engine
//! reports a missing file as a per-file failure so the exit-code policy stays
//! in one place.

use crate::error::Pdf2CbzError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// How the argument was interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    SingleFile(PathBuf),
    Directory(PathBuf),
    Glob(String),
}

/// The classified argument together with its candidate paths.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub kind: InputKind,
    /// Candidates in processing order.
    pub candidates: Vec<PathBuf>,
}

impl ResolvedInput {
    /// True for directory and glob inputs, whose exit code ignores per-file failures.
    pub fn is_batch(&self) -> bool {
        !matches!(self.kind, InputKind::SingleFile(_))
    }
}

/// Check if the argument contains a glob metacharacter.
pub fn is_glob(input: &str) -> bool {
    input.contains('*') || input.contains('?')
}

/// Case-insensitive `.pdf` extension check.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Classify the argument without touching the candidate files.
pub fn classify(input: &str) -> InputKind {
    let path = PathBuf::from(input);
    if path.is_dir() {
        InputKind::Directory(path)
    } else if is_glob(input) {
        InputKind::Glob(input.to_string())
    } else {
        InputKind::SingleFile(path)
    }
}

/// Classify the argument and expand it into candidate paths.
///
/// An empty candidate list is a valid result (empty directory, glob with no
/// matches). Errors are reserved for arguments that cannot be resolved at
/// all.
pub fn resolve_input(input: &str) -> Result<ResolvedInput, Pdf2CbzError> {
    let kind = classify(input);
    let candidates = match kind {
        InputKind::Directory(ref dir) => list_directory(dir)?,
        InputKind::Glob(ref pattern) => expand_glob(pattern)?,
        InputKind::SingleFile(ref path) => {
            // "books/" clearly names a directory; don't treat it as a file.
            if ends_with_separator(input) {
                return Err(Pdf2CbzError::DirectoryNotFound { path: path.clone() });
            }
            vec![path.clone()]
        }
    };

    debug!("Resolved {:?} → {} candidate(s)", kind, candidates.len());
    Ok(ResolvedInput { kind, candidates })
}

fn ends_with_separator(input: &str) -> bool {
    input.ends_with('/') || input.ends_with(std::path::MAIN_SEPARATOR)
}

/// Regular files directly inside `dir` with a `.pdf` extension, sorted by name.
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, Pdf2CbzError> {
    let entries = std::fs::read_dir(dir).map_err(|e| Pdf2CbzError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }

    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// Expand a glob pattern, keeping only existing regular files.
fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, Pdf2CbzError> {
    let matches = glob::glob(pattern).map_err(|e| Pdf2CbzError::InvalidGlob {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in matches {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable glob match: {}", e),
        }
    }
    Ok(files)
}

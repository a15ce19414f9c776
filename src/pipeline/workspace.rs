//! Scratch workspace: a per-conversion temporary directory.
//!
//! Wraps a [`tempfile::TempDir`], so the directory and everything in it is
//! removed when the guard is dropped: on success, on every early return, and
//! while unwinding from a panic. [`ScratchWorkspace::release`] does the same
//! removal eagerly and logs a warning instead of silently ignoring failure.
//!
//! A hard kill (SIGKILL, power loss) skips `Drop`; a `pdf2cbz-*` directory
//! may then be left behind in the temp directory.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

const PREFIX: &str = "pdf2cbz-";
const PAGES_DIR: &str = "pages";

/// Exclusively owned scratch directory for one conversion.
#[derive(Debug)]
pub struct ScratchWorkspace {
    dir: TempDir,
    pages: PathBuf,
}

impl ScratchWorkspace {
    /// Create a fresh workspace under `root`, or the system temp dir if None.
    ///
    /// Every call creates a new uniquely named directory; workspaces are
    /// never reused.
    pub fn acquire(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let pages = dir.path().join(PAGES_DIR);
        std::fs::create_dir(&pages)?;

        debug!("Acquired scratch workspace {}", dir.path().display());
        Ok(Self { dir, pages })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the rasterizer writes page images into.
    pub fn pages_dir(&self) -> &Path {
        &self.pages
    }

    /// Where the in-progress archive is built, named after `source`.
    pub fn archive_path(&self, source: &Path) -> PathBuf {
        let mut name = source
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "archive".into());
        name.push(".cbz");
        self.dir.path().join(name)
    }

    /// Remove the workspace now.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!("Released scratch workspace {}", path.display()),
            Err(e) => warn!("Failed to remove scratch workspace {}: {}", path.display(), e),
        }
    }
}

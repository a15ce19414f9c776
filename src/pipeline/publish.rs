//! Atomic placement of a finished archive at its destination.
//!
//! The archive is built inside the scratch workspace and only then moved
//! next to the source PDF, so readers of the destination directory see
//! either no `.cbz` or a complete one.
//!
//! A plain `rename` is used when the workspace and the destination share a
//! filesystem. Otherwise (`EXDEV`, typical when the temp dir is a tmpfs) the
//! archive is copied into a hidden temp file in the destination directory
//! and that file is renamed over the destination.

use std::fs::File;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Move `archive` to `dest`, replacing any existing file.
pub fn publish(archive: &Path, dest: &Path) -> io::Result<()> {
    match std::fs::rename(archive, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Cross-device rename to {}; copying instead", dest.display());
            copy_then_persist(archive, dest)
        }
        Err(e) => Err(e),
    }
}

/// Copy into a temp file beside `dest`, then rename it into place.
fn copy_then_persist(archive: &Path, dest: &Path) -> io::Result<()> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".pdf2cbz-")
        .suffix(".part")
        .tempfile_in(dir)?;
    let mut source = File::open(archive)?;
    io::copy(&mut source, tmp.as_file_mut())?;
    // The temp file starts owner-only; a rename would have kept the archive's mode.
    tmp.as_file().set_permissions(source.metadata()?.permissions())?;
    tmp.as_file().sync_all()?;
    persist(tmp, dest)
}

fn persist(tmp: NamedTempFile, dest: &Path) -> io::Result<()> {
    tmp.persist(dest).map(|_| ()).map_err(|e| e.error)
}

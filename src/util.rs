//! Shared utility functions

use std::io;
use std::path::Path;

/// Write `contents` to `path` atomically: write a sibling temp file, then
/// rename it over the target. A crash mid-write leaves the previous file
/// intact. The temp file lives in the same directory so the rename stays
/// on one filesystem.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, contents)?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        // Best effort: don't leave the temp file behind on failure
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(())
}

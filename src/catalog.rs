// Theme catalog loader
//
// Scans the Alacritty themes directory and produces the ordered list of
// discoverable themes. Read-only: the loader owns no state and is rerun
// whenever a fresh view of the directory is needed.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// One discoverable theme on disk.
///
/// The identifier is the filename stem and is the canonical name used
/// across the annotation store and both config targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeFile {
    pub identifier: String,
    pub path: PathBuf,
}

/// List recognized theme files in `directory`, ordered by identifier
/// (case-insensitive) for deterministic display.
///
/// Recognized means a regular file with a `.toml` extension; everything
/// else is skipped silently. A missing directory is an error - the caller
/// decides whether to tell the user to create it.
pub fn list_themes(directory: &Path) -> Result<Vec<ThemeFile>> {
    let entries = std::fs::read_dir(directory).map_err(|e| Error::from_io(directory, e))?;

    let mut themes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::from_io(directory, e))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if path.extension().map(|ext| ext == "toml") != Some(true) {
            continue;
        }
        let Some(stem) = path.file_stem() else {
            continue;
        };

        themes.push(ThemeFile {
            identifier: stem.to_string_lossy().to_string(),
            path,
        });
    }

    // Case-insensitive order, with the exact identifier as tiebreak so the
    // result is fully deterministic.
    themes.sort_by(|a, b| {
        a.identifier
            .to_lowercase()
            .cmp(&b.identifier.to_lowercase())
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    Ok(themes)
}

// Annotation store - persisted user metadata about themes
//
// The store is a small TOML file mapping theme identifiers to the user's
// notes: a pinned flag, a free-form comment, and a light/dark mark. The
// file format is versioned and record-based so round-trips stay lossless:
//
//   version = 1
//
//   [[annotations]]
//   theme = "gruvbox_dark"
//   pinned = true
//   comment = "daily driver"
//   mode = "dark"
//
// Annotations for themes that no longer exist on disk are kept: user notes
// are never dropped just because a theme file went away.
//
// The running process is the single writer. Saves are atomic
// (write-temp-then-rename) so an interrupted run cannot corrupt the
// previous valid store.

use crate::error::{Error, Result};
use crate::util::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Current on-disk schema version.
const STORE_VERSION: u32 = 1;

/// User classification of a theme as light or dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeMark {
    #[default]
    Unset,
    Light,
    Dark,
}

impl ModeMark {
    /// Textual form, also what the merged-view filter matches against.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeMark::Unset => "unset",
            ModeMark::Light => "light",
            ModeMark::Dark => "dark",
        }
    }

    /// Next mark in the cycle Unset -> Light -> Dark -> Unset.
    pub fn cycled(self) -> Self {
        match self {
            ModeMark::Unset => ModeMark::Light,
            ModeMark::Light => ModeMark::Dark,
            ModeMark::Dark => ModeMark::Unset,
        }
    }
}

/// User metadata for one theme.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThemeAnnotation {
    pub pinned: bool,
    pub comment: String,
    pub mode_mark: ModeMark,
}

/// One field of an annotation, for single-field updates.
///
/// `upsert` takes this instead of a whole record so an edit can never
/// clobber the fields it did not mean to touch.
#[derive(Debug, Clone)]
pub enum AnnotationField {
    Pinned(bool),
    Comment(String),
    ModeMark(ModeMark),
}

// ─────────────────────────────────────────────────────────────────────────────
// File schema (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct FileStore {
    version: u32,
    #[serde(default)]
    annotations: Vec<FileAnnotation>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileAnnotation {
    theme: String,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    mode: ModeMark,
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory annotation mapping, keyed by theme identifier.
///
/// BTreeMap keeps iteration (and therefore the saved file) in a stable
/// order, so saves of an unchanged store are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStore {
    annotations: BTreeMap<String, ThemeAnnotation>,
}

impl AnnotationStore {
    /// Load the store from `path`.
    ///
    /// A missing file is a first run, not an error: returns an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Persistence {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        let file: FileStore =
            toml::from_str(&contents).map_err(|e| Error::config_format(path, e.to_string()))?;

        if file.version != STORE_VERSION {
            return Err(Error::config_format(
                path,
                format!("unsupported store version {}", file.version),
            ));
        }

        let mut annotations = BTreeMap::new();
        for record in file.annotations {
            annotations.insert(
                record.theme,
                ThemeAnnotation {
                    pinned: record.pinned,
                    comment: record.comment,
                    mode_mark: record.mode,
                },
            );
        }

        Ok(Self { annotations })
    }

    /// Annotation for `identifier`, if the user has made one.
    pub fn get(&self, identifier: &str) -> Option<&ThemeAnnotation> {
        self.annotations.get(identifier)
    }

    /// Set a single field of `identifier`'s annotation, creating a default
    /// record first if none exists. Other fields and other identifiers are
    /// left untouched.
    pub fn upsert(&mut self, identifier: &str, field: AnnotationField) {
        let annotation = self.annotations.entry(identifier.to_string()).or_default();
        match field {
            AnnotationField::Pinned(pinned) => annotation.pinned = pinned,
            AnnotationField::Comment(comment) => annotation.comment = comment,
            AnnotationField::ModeMark(mark) => annotation.mode_mark = mark,
        }
    }

    /// Serialize the full store to `path` atomically.
    ///
    /// On failure the in-memory store is unchanged and remains usable.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = FileStore {
            version: STORE_VERSION,
            annotations: self
                .annotations
                .iter()
                .map(|(theme, annotation)| FileAnnotation {
                    theme: theme.clone(),
                    pinned: annotation.pinned,
                    comment: annotation.comment.clone(),
                    mode: annotation.mode_mark,
                })
                .collect(),
        };

        // FileStore contains nothing a TOML document can't represent, so
        // serialization itself cannot fail; map defensively anyway.
        let contents = toml::to_string(&file)
            .map_err(|e| Error::config_format(path, format!("serialization failed: {}", e)))?;

        write_atomic(path, &contents).map_err(|e| Error::Persistence {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

// Merged view builder
//
// Joins the theme catalog with the annotation store into the list the
// selector displays, plus the two query operations the UI composes over it
// (filter, then sort). All three are pure functions over their inputs so
// they can be tested without any filesystem or UI in the loop.

use crate::catalog::ThemeFile;
use crate::store::{AnnotationStore, ThemeAnnotation};

/// One row of the browsable list: a discovered theme plus the user's
/// annotation (defaulted when the user has not made one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedThemeEntry {
    pub theme: ThemeFile,
    pub annotation: ThemeAnnotation,
}

impl MergedThemeEntry {
    /// Case-insensitive substring match against identifier, comment, or the
    /// mode mark's textual form. Matching any one of the three suffices.
    fn matches(&self, query_lower: &str) -> bool {
        self.theme.identifier.to_lowercase().contains(query_lower)
            || self.annotation.comment.to_lowercase().contains(query_lower)
            || self.annotation.mode_mark.as_str().contains(query_lower)
    }
}

/// Join `themes` with `store`, preserving the catalog's order.
///
/// Annotations without a matching theme file stay in the store but get no
/// entry here - they are not browsable until the theme file returns.
pub fn build_view(themes: &[ThemeFile], store: &AnnotationStore) -> Vec<MergedThemeEntry> {
    themes
        .iter()
        .map(|theme| MergedThemeEntry {
            theme: theme.clone(),
            annotation: store.get(&theme.identifier).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Entries of `view` matching `query`. The empty query matches everything.
pub fn filter(view: &[MergedThemeEntry], query: &str) -> Vec<MergedThemeEntry> {
    if query.is_empty() {
        return view.to_vec();
    }
    let query_lower = query.to_lowercase();
    view.iter()
        .filter(|entry| entry.matches(&query_lower))
        .cloned()
        .collect()
}

/// Stable pinned-first ordering: all pinned entries before all unpinned
/// ones, catalog order preserved within each group.
pub fn sort(view: &[MergedThemeEntry]) -> Vec<MergedThemeEntry> {
    let mut sorted = view.to_vec();
    sorted.sort_by_key(|entry| !entry.annotation.pinned);
    sorted
}

// Selector application state
//
// Holds the catalog, the annotation store, and the live query/selection
// state. Every annotation edit is upserted into the store and persisted
// immediately; a failed save is logged (surfacing on the status line) and
// the in-memory state is kept so the user's work is not lost.

use crate::catalog::ThemeFile;
use crate::logging::LogBuffer;
use crate::store::{AnnotationField, AnnotationStore};
use crate::view::{self, MergedThemeEntry};
use std::path::PathBuf;

/// Which of the two input lines owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Search,
    Comment,
}

pub struct App {
    catalog: Vec<ThemeFile>,
    store: AnnotationStore,
    store_path: PathBuf,

    /// Full merged view (unfiltered); rebuilt after every annotation edit
    merged: Vec<MergedThemeEntry>,

    /// Live search query
    pub query: String,

    /// Comment text under edit (comment mode only)
    pub comment_input: String,

    pub input_mode: InputMode,

    /// Selection index into the visible (filtered + sorted) list
    pub selected: usize,

    /// First visible row of the list viewport
    pub offset: usize,

    /// List viewport height, updated by the renderer each frame
    pub viewport: usize,

    /// Identifier confirmed with Enter, if any
    pub confirmed: Option<String>,

    pub should_quit: bool,

    pub log_buffer: LogBuffer,
}

impl App {
    pub fn new(
        catalog: Vec<ThemeFile>,
        store: AnnotationStore,
        store_path: PathBuf,
        log_buffer: LogBuffer,
    ) -> Self {
        let merged = view::build_view(&catalog, &store);
        Self {
            catalog,
            store,
            store_path,
            merged,
            query: String::new(),
            comment_input: String::new(),
            input_mode: InputMode::Search,
            selected: 0,
            offset: 0,
            viewport: 10,
            confirmed: None,
            should_quit: false,
            log_buffer,
        }
    }

    /// The list as currently displayed: filtered by the query, pinned first.
    pub fn visible(&self) -> Vec<MergedThemeEntry> {
        view::sort(&view::filter(&self.merged, &self.query))
    }

    pub fn selected_entry(&self) -> Option<MergedThemeEntry> {
        self.visible().get(self.selected).cloned()
    }

    // ─── Search editing ──────────────────────────────────────

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.reset_selection();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    // ─── Navigation ──────────────────────────────────────────

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_visible();
    }

    pub fn move_down(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        self.selected = (self.selected + 1).min(max);
        self.ensure_visible();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.viewport.max(1));
        self.ensure_visible();
    }

    pub fn page_down(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        self.selected = (self.selected + self.viewport.max(1)).min(max);
        self.ensure_visible();
    }

    /// Keep the selected row inside the viewport, clamping against the
    /// current visible list (which shrinks as the query narrows).
    pub fn ensure_visible(&mut self) {
        let max = self.visible().len().saturating_sub(1);
        if self.selected > max {
            self.selected = max;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.viewport > 0 && self.selected >= self.offset + self.viewport {
            self.offset = self.selected + 1 - self.viewport;
        }
    }

    // ─── Annotation edits ────────────────────────────────────

    pub fn toggle_pin(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let pinned = !entry.annotation.pinned;
        self.store
            .upsert(&entry.theme.identifier, AnnotationField::Pinned(pinned));
        tracing::debug!(
            "{} {}",
            if pinned { "pinned" } else { "unpinned" },
            entry.theme.identifier
        );
        self.after_edit();
    }

    pub fn cycle_mode(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        let mark = entry.annotation.mode_mark.cycled();
        self.store
            .upsert(&entry.theme.identifier, AnnotationField::ModeMark(mark));
        tracing::debug!("marked {} as {}", entry.theme.identifier, mark.as_str());
        self.after_edit();
    }

    /// Switch to comment mode, preloaded with the selected entry's comment.
    pub fn begin_comment(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        self.comment_input = entry.annotation.comment;
        self.input_mode = InputMode::Comment;
    }

    pub fn commit_comment(&mut self) {
        if let Some(entry) = self.selected_entry() {
            self.store.upsert(
                &entry.theme.identifier,
                AnnotationField::Comment(self.comment_input.clone()),
            );
            self.after_edit();
        }
        self.input_mode = InputMode::Search;
    }

    pub fn cancel_comment(&mut self) {
        self.comment_input.clear();
        self.input_mode = InputMode::Search;
    }

    fn after_edit(&mut self) {
        self.merged = view::build_view(&self.catalog, &self.store);
        self.persist();
    }

    /// Save the store, keeping the in-memory state either way.
    pub fn persist(&self) {
        if let Err(e) = self.store.save(&self.store_path) {
            tracing::error!("failed to save annotations: {}", e);
        }
    }

    // ─── Selection ───────────────────────────────────────────

    pub fn confirm(&mut self) {
        if let Some(entry) = self.selected_entry() {
            self.confirmed = Some(entry.theme.identifier);
            self.should_quit = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ModeMark;
    use std::path::Path;

    fn theme(identifier: &str) -> ThemeFile {
        ThemeFile {
            identifier: identifier.to_string(),
            path: Path::new("/themes").join(format!("{}.toml", identifier)),
        }
    }

    fn app_with(themes: &[&str]) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("annotations.toml");
        let catalog: Vec<_> = themes.iter().map(|t| theme(t)).collect();
        let app = App::new(
            catalog,
            AnnotationStore::default(),
            store_path,
            LogBuffer::new(),
        );
        (app, dir)
    }

    #[test]
    fn test_query_narrows_visible_and_resets_selection() {
        let (mut app, _dir) = app_with(&["gruvbox_dark", "nord", "solarized_dark"]);
        app.selected = 2;

        app.push_query_char('d');
        app.push_query_char('a');

        assert_eq!(app.selected, 0);
        let ids: Vec<_> = app
            .visible()
            .iter()
            .map(|e| e.theme.identifier.clone())
            .collect();
        assert_eq!(ids, vec!["gruvbox_dark", "solarized_dark"]);
    }

    #[test]
    fn test_navigation_clamps_to_bounds() {
        let (mut app, _dir) = app_with(&["a", "b", "c"]);

        app.move_up();
        assert_eq!(app.selected, 0);

        app.move_down();
        app.move_down();
        app.move_down();
        assert_eq!(app.selected, 2);

        app.page_down();
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_toggle_pin_persists_and_reorders() {
        let (mut app, dir) = app_with(&["a", "b", "c"]);
        app.selected = 1; // "b"

        app.toggle_pin();

        let ids: Vec<_> = app
            .visible()
            .iter()
            .map(|e| e.theme.identifier.clone())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        // Saved to disk
        let reloaded =
            AnnotationStore::load(&dir.path().join("annotations.toml")).unwrap();
        assert!(reloaded.get("b").unwrap().pinned);
    }

    #[test]
    fn test_cycle_mode_walks_the_enum() {
        let (mut app, _dir) = app_with(&["a"]);

        app.cycle_mode();
        assert_eq!(app.selected_entry().unwrap().annotation.mode_mark, ModeMark::Light);
        app.cycle_mode();
        assert_eq!(app.selected_entry().unwrap().annotation.mode_mark, ModeMark::Dark);
        app.cycle_mode();
        assert_eq!(app.selected_entry().unwrap().annotation.mode_mark, ModeMark::Unset);
    }

    #[test]
    fn test_comment_edit_roundtrip() {
        let (mut app, _dir) = app_with(&["a", "b"]);
        app.selected = 1;

        app.begin_comment();
        assert_eq!(app.input_mode, InputMode::Comment);
        assert_eq!(app.comment_input, "");

        app.comment_input.push_str("warm colors");
        app.commit_comment();

        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(app.selected_entry().unwrap().annotation.comment, "warm colors");

        // Reopening preloads the saved comment
        app.begin_comment();
        assert_eq!(app.comment_input, "warm colors");
    }

    #[test]
    fn test_cancel_comment_discards_input() {
        let (mut app, _dir) = app_with(&["a"]);
        app.begin_comment();
        app.comment_input.push_str("typo");
        app.cancel_comment();

        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(app.selected_entry().unwrap().annotation.comment, "");
    }

    #[test]
    fn test_confirm_records_identifier() {
        let (mut app, _dir) = app_with(&["a", "b"]);
        app.selected = 1;
        app.confirm();

        assert_eq!(app.confirmed.as_deref(), Some("b"));
        assert!(app.should_quit);
    }

    #[test]
    fn test_confirm_with_no_match_is_noop() {
        let (mut app, _dir) = app_with(&["a"]);
        app.push_query_char('z');
        app.confirm();

        assert!(app.confirmed.is_none());
        assert!(!app.should_quit);
    }
}

// Keyboard input dispatch
//
// Layered: quit keys first, then the bindings of whichever input line owns
// the keyboard. Search mode carries the navigation and annotation keys;
// comment mode is a plain line editor.

use super::app::{App, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Quit works in either mode
    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Search => handle_search_key(app, key.code, ctrl),
        InputMode::Comment => handle_comment_key(app, key.code, ctrl),
    }
}

fn handle_search_key(app: &mut App, code: KeyCode, ctrl: bool) {
    if ctrl {
        match code {
            KeyCode::Char('k') => app.move_up(),
            KeyCode::Char('j') => app.move_down(),
            KeyCode::Char('u') => app.page_up(),
            KeyCode::Char('d') => app.page_down(),
            KeyCode::Char('p') => app.toggle_pin(),
            KeyCode::Char('t') => app.cycle_mode(),
            KeyCode::Char('l') => app.begin_comment(),
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Enter => app.confirm(),
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
}

fn handle_comment_key(app: &mut App, code: KeyCode, ctrl: bool) {
    if ctrl {
        if code == KeyCode::Char('l') {
            app.cancel_comment();
        }
        return;
    }

    match code {
        KeyCode::Enter => app.commit_comment(),
        KeyCode::Esc => app.cancel_comment(),
        KeyCode::Backspace => {
            app.comment_input.pop();
        }
        KeyCode::Char(c) => app.comment_input.push(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ThemeFile;
    use crate::logging::LogBuffer;
    use crate::store::AnnotationStore;
    use std::path::PathBuf;

    fn app() -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let catalog = vec![
            ThemeFile {
                identifier: "nord".to_string(),
                path: PathBuf::from("/themes/nord.toml"),
            },
            ThemeFile {
                identifier: "gruvbox".to_string(),
                path: PathBuf::from("/themes/gruvbox.toml"),
            },
        ];
        let app = App::new(
            catalog,
            AnnotationStore::default(),
            dir.path().join("annotations.toml"),
            LogBuffer::new(),
        );
        (app, dir)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_edits_query() {
        let (mut a, _dir) = app();
        handle_key(&mut a, press(KeyCode::Char('n')));
        handle_key(&mut a, press(KeyCode::Char('o')));
        assert_eq!(a.query, "no");

        handle_key(&mut a, press(KeyCode::Backspace));
        assert_eq!(a.query, "n");
    }

    #[test]
    fn test_ctrl_q_quits_without_selection() {
        let (mut a, _dir) = app();
        handle_key(&mut a, ctrl('q'));
        assert!(a.should_quit);
        assert!(a.confirmed.is_none());
    }

    #[test]
    fn test_ctrl_navigation_aliases() {
        let (mut a, _dir) = app();
        handle_key(&mut a, ctrl('j'));
        assert_eq!(a.selected, 1);
        handle_key(&mut a, ctrl('k'));
        assert_eq!(a.selected, 0);
    }

    #[test]
    fn test_ctrl_l_enters_and_leaves_comment_mode() {
        let (mut a, _dir) = app();
        handle_key(&mut a, ctrl('l'));
        assert_eq!(a.input_mode, InputMode::Comment);

        // Typing goes to the comment, not the query
        handle_key(&mut a, press(KeyCode::Char('x')));
        assert_eq!(a.comment_input, "x");
        assert_eq!(a.query, "");

        handle_key(&mut a, ctrl('l'));
        assert_eq!(a.input_mode, InputMode::Search);
    }

    #[test]
    fn test_enter_confirms_in_search_mode() {
        let (mut a, _dir) = app();
        handle_key(&mut a, press(KeyCode::Enter));
        // Visible list is sorted pinned-first over catalog order; no pins,
        // so the first catalog entry is selected
        assert_eq!(a.confirmed.as_deref(), Some("nord"));
    }

    #[test]
    fn test_enter_saves_comment_in_comment_mode() {
        let (mut a, _dir) = app();
        handle_key(&mut a, ctrl('l'));
        handle_key(&mut a, press(KeyCode::Char('o')));
        handle_key(&mut a, press(KeyCode::Char('k')));
        handle_key(&mut a, press(KeyCode::Enter));

        assert!(a.confirmed.is_none());
        assert_eq!(a.selected_entry().unwrap().annotation.comment, "ok");
    }
}

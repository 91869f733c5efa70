// Rendering
//
// Single-screen layout, top to bottom: input line (search or comment),
// spacer, theme list, help line, status line. Rows follow the store's
// notation: mode char (D/L), pin marker (*), identifier, trailing comment.

use super::app::{App, InputMode};
use crate::logging::LogLevel;
use crate::store::ModeMark;
use crate::view::MergedThemeEntry;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Accent style for prompts, key hints, and the selected row
fn accent() -> Style {
    Style::default().bg(Color::LightGreen).fg(Color::Black)
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let [input_area, _, list_area, help_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    // The renderer owns the viewport size; sync it before windowing
    app.viewport = list_area.height as usize;
    app.ensure_visible();

    // ─── Input line ──────────────────────────────────────────
    let (prompt, text) = match app.input_mode {
        InputMode::Search => ("Search:", app.query.as_str()),
        InputMode::Comment => ("Comment:", app.comment_input.as_str()),
    };
    let input_line = Line::from(vec![
        Span::styled(prompt, accent()),
        Span::raw(" "),
        Span::raw(text),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]);
    f.render_widget(Paragraph::new(input_line), input_area);

    // ─── Theme list ──────────────────────────────────────────
    let visible = app.visible();
    let end = (app.offset + app.viewport).min(visible.len());
    let width = list_area.width as usize;

    let mut items: Vec<ListItem> = Vec::new();
    for (i, entry) in visible
        .iter()
        .enumerate()
        .skip(app.offset)
        .take(end.saturating_sub(app.offset))
    {
        let row = fit_to_width(&format_row(entry), width);
        let style = if i == app.selected {
            accent()
        } else {
            Style::default()
        };
        items.push(ListItem::new(row).style(style));
    }
    f.render_widget(List::new(items), list_area);

    // ─── Help line ───────────────────────────────────────────
    let help = match app.input_mode {
        InputMode::Search => Line::from(vec![
            Span::styled("Search:", accent()),
            Span::raw(" type to filter "),
            Span::styled("Navigate:", accent()),
            Span::raw(" ↑/↓ PgUp/PgDn Ctrl+j/k/u/d "),
            Span::styled("Pin:", accent()),
            Span::raw(" Ctrl+p "),
            Span::styled("Mode:", accent()),
            Span::raw(" Ctrl+t "),
            Span::styled("Comment:", accent()),
            Span::raw(" Ctrl+l "),
            Span::styled("Apply:", accent()),
            Span::raw(" Enter "),
            Span::styled("Quit:", accent()),
            Span::raw(" Ctrl+q"),
        ]),
        InputMode::Comment => Line::from(vec![
            Span::styled("Comment:", accent()),
            Span::raw(" type your note "),
            Span::styled("Save:", accent()),
            Span::raw(" Enter "),
            Span::styled("Back:", accent()),
            Span::raw(" Ctrl+l "),
            Span::styled("Quit:", accent()),
            Span::raw(" Ctrl+q"),
        ]),
    };
    f.render_widget(Paragraph::new(help), help_area);

    // ─── Status line ─────────────────────────────────────────
    if let Some(entry) = app.log_buffer.last() {
        let style = match entry.level {
            LogLevel::Error => Style::default().fg(Color::Red),
            LogLevel::Warn => Style::default().fg(Color::Yellow),
            _ => Style::default().fg(Color::DarkGray),
        };
        let status = Line::from(vec![
            Span::styled(
                format!(
                    "{} {}",
                    entry.timestamp.format("%H:%M:%S"),
                    entry.level.as_str()
                ),
                style.add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(entry.message, style),
        ]);
        f.render_widget(Paragraph::new(status), status_area);
    }
}

/// One list row: mode char, pin marker, identifier, trailing comment.
pub fn format_row(entry: &MergedThemeEntry) -> String {
    let mode_char = match entry.annotation.mode_mark {
        ModeMark::Dark => 'D',
        ModeMark::Light => 'L',
        ModeMark::Unset => ' ',
    };

    let mut row = format!("{} ", mode_char);
    if entry.annotation.pinned {
        row.push_str("* ");
    }
    row.push_str(&entry.theme.identifier);
    if !entry.annotation.comment.is_empty() {
        row.push_str("   # ");
        row.push_str(&entry.annotation.comment);
    }
    row
}

/// Truncate to at most `max_width` terminal columns, not bytes, so wide
/// characters in identifiers or comments don't overflow the row.
fn fit_to_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(ch);
    }
    out
}

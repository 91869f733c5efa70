// TUI module - the interactive selector
//
// Handles terminal initialization and cleanup, the event loop, and the
// keyboard/render split. The loop is synchronous: it blocks on crossterm
// input with a short poll timeout so status-line updates still appear
// promptly.

pub mod app;
pub mod input;
pub mod ui;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// Run the selector until the user confirms a theme or quits.
///
/// Sets up the terminal, runs the event loop, and restores the terminal
/// even when the loop errors. Returns the confirmed theme identifier, or
/// None if the user quit without selecting.
pub fn run(mut app: App) -> Result<Option<String>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal before reporting any error from the loop
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    // Annotations are saved on every edit; save once more on the way out
    app.persist();

    result.map(|_| app.confirmed)
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .context("Failed to draw terminal")?;

        if event::poll(Duration::from_millis(200)).context("Failed to poll input")? {
            if let Event::Key(key) = event::read().context("Failed to read input")? {
                input::handle_key(app, key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

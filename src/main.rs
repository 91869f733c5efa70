// tinct - Interactive theme selector for Alacritty and Oh My Posh
//
// Browses the Alacritty themes directory, lets the user search, pin,
// comment, and light/dark-mark themes, and on selection rewrites the
// active-theme reference in both the Alacritty and Oh My Posh configs
// without disturbing anything else in them.
//
// Architecture:
// - catalog: scans the themes directory for discoverable themes
// - store: persisted annotations (pins, comments, light/dark marks)
// - view: merged catalog + annotations, with pure filter/sort queries
// - writer: structure-preserving edits of the two foreign configs
// - tui (ratatui): single-screen interactive selector

mod catalog;
mod cli;
mod config;
mod error;
mod logging;
mod store;
mod tui;
mod util;
mod view;
mod writer;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, LogRotation};
use logging::{LogBuffer, TuiLogLayer};
use store::AnnotationStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use writer::ConfigTarget;

fn main() -> Result<()> {
    let mut args = cli::Cli::parse();
    let command = args.command.take();

    // The config subcommand runs before any config loading so a broken
    // config file can still be inspected or reset
    if let Some(cli::Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = command
    {
        cli::handle_config(show, reset, edit, path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    args.apply_overrides(&mut config);

    let headless = matches!(command, Some(cli::Commands::List));

    // Initialize tracing with conditional output:
    // In TUI mode logs go to an in-memory buffer (shown on the status line)
    // so they can't garble the alternate screen; headless mode logs to
    // stderr. File logging is optional on top of either.
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let log_buffer = LogBuffer::new();
    let _file_guard = init_logging(&config, &log_buffer, headless);

    match command {
        Some(cli::Commands::List) => run_list(&config),
        None => run_selector(config, log_buffer),
        Some(cli::Commands::Config { .. }) => Ok(()), // handled above
    }
}

/// Set up the tracing subscriber. Returns the file-appender guard, which
/// must stay alive for the program's lifetime so buffered logs flush.
fn init_logging(
    config: &Config,
    log_buffer: &LogBuffer,
    headless: bool,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("tinct={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // Set up the non-blocking file writer if file logging is enabled
    let file_writer = if config.logging.file_enabled {
        match std::fs::create_dir_all(&config.logging.file_dir) {
            Ok(()) => {
                let appender = match config.logging.file_rotation {
                    LogRotation::Hourly => tracing_appender::rolling::hourly(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Daily => tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                    LogRotation::Never => tracing_appender::rolling::never(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    ),
                };
                Some(tracing_appender::non_blocking(appender))
            }
            Err(e) => {
                eprintln!(
                    "Warning: could not create log directory {:?}: {}",
                    config.logging.file_dir, e
                );
                None
            }
        }
    } else {
        None
    };

    let (file_layer, guard) = match file_writer {
        Some((non_blocking, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(TuiLogLayer::new(log_buffer.clone()))
            .with(file_layer)
            .init();
    }

    guard
}

/// `tinct list`: print the merged view the selector would show.
fn run_list(config: &Config) -> Result<()> {
    let themes = catalog::list_themes(&config.themes_dir)
        .with_context(|| format!("cannot list themes in {}", config.themes_dir.display()))?;
    let store = AnnotationStore::load(&config.store_path)
        .with_context(|| format!("cannot load annotations from {}", config.store_path.display()))?;

    for entry in view::sort(&view::build_view(&themes, &store)) {
        println!("{}", tui::ui::format_row(&entry));
    }
    Ok(())
}

/// Run the interactive selector and apply the confirmed theme.
fn run_selector(config: Config, log_buffer: LogBuffer) -> Result<()> {
    let themes = catalog::list_themes(&config.themes_dir)
        .with_context(|| format!("cannot list themes in {}", config.themes_dir.display()))?;
    let store = AnnotationStore::load(&config.store_path)
        .with_context(|| format!("cannot load annotations from {}", config.store_path.display()))?;

    tracing::info!("{} themes found, {} annotated", themes.len(), store.len());

    let app = tui::app::App::new(themes, store, config.store_path.clone(), log_buffer);

    let Some(identifier) = tui::run(app)? else {
        // Quit without a selection: nothing to write
        return Ok(());
    };

    let targets = [
        ConfigTarget::Alacritty {
            config_path: config.alacritty_config.clone(),
            themes_dir: config.themes_dir.clone(),
        },
        ConfigTarget::Posh {
            config_path: config.posh_config.clone(),
        },
    ];
    for target in &targets {
        target
            .apply_theme(&identifier)
            .with_context(|| format!("failed to update {}", target.config_path().display()))?;
    }

    println!("Switched to {}", identifier);
    Ok(())
}

//! SRSTRIS - terminal front-end
//!
//! Sets up logging, settings and the terminal, then hands off to the async
//! game loop.

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use srstris::{runtime, settings::Settings};
use std::io::{self, stdout};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, filter::Directive};

/// Get the srstris temp directory, creating it if needed
fn temp_dir() -> io::Result<PathBuf> {
    let dir = std::env::temp_dir().join("srstris");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Log to `<temp>/srstris/<session>.log`; the guard must outlive the session
fn init_logging() -> io::Result<WorkerGuard> {
    let session_id: u32 = rand::random();
    let dir = temp_dir()?;
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&dir, &log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let directive = "srstris=debug"
        .parse::<Directive>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_ansi(false)
        .init();

    tracing::info!(
        "SRSTRIS starting up, session={:08x}, log={}",
        session_id,
        dir.join(&log_file).display()
    );
    Ok(guard)
}

fn main() -> io::Result<()> {
    let _guard = init_logging()?;
    let settings = Settings::load();

    let rt = tokio::runtime::Runtime::new()?;

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = rt.block_on(runtime::run(&mut terminal, &settings));

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Writes the defaults out on first run so there is a file to edit
    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    let game = result?;
    let score = game.score();
    println!("\nThanks for playing SRSTRIS!");
    println!("Final Score: {}", score.points);
    println!("Level: {} | Lines: {}", score.level, score.lines);
    Ok(())
}

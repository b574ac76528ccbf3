//! TUI (Terminal User Interface) presenter
//!
//! Shows a deck with:
//! - Sidebar page navigation
//! - Checkboxes, sliders, ratings and note fields
//! - Live relevance score with its feedback band
//! - Bar, pie and line charts

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use codepath_core::deck::Deck;
use codepath_core::session::SessionState;

mod app;
mod events;
mod ui;

pub use app::App;
pub use events::EventHandler;

/// Runs the presenter until the viewer quits and returns what they entered.
pub fn run_tui(deck: Deck, start_page: usize, tick_rate: Duration) -> Result<SessionState> {
    // Setup terminal
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut app = App::new(deck, start_page);
    let mut event_handler = EventHandler::new(tick_rate);

    let result = run_event_loop(&mut terminal, &mut app, &mut event_handler);

    // Restore terminal
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;

    result?;
    Ok(app.state)
}

/// Main event loop
fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &mut EventHandler,
) -> Result<()> {
    terminal.draw(|f| ui::render(f, app))?;

    while app.running {
        if let Some(event) = event_handler.next_event()? {
            events::handle_event(app, event)?;
            // Every event redraws, so scores always reflect the latest input
            terminal.draw(|f| ui::render(f, app))?;
        }
    }

    Ok(())
}

/// Checks if stdout is an interactive terminal
pub fn available() -> bool {
    atty::is(atty::Stream::Stdout) && atty::is(atty::Stream::Stdin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepath_core::content::builtin_deck;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_app_creation() {
        let app = App::new(builtin_deck().unwrap(), 0);
        assert!(app.running);
    }

    #[test]
    fn test_event_loop_stops_when_not_running() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut app = App::new(builtin_deck().unwrap(), 0);
        app.quit();
        let mut handler = EventHandler::new(Duration::from_millis(1));

        run_event_loop(&mut terminal, &mut app, &mut handler).unwrap();
        assert!(!app.running);
    }
}

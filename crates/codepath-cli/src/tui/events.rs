//! TUI Event Handling
//!
//! Handles keyboard input and other events for the TUI.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::tui::app::App;

/// TUI event types
#[derive(Debug, Clone)]
pub enum TuiEvent {
    /// Terminal tick (for the session clock)
    Tick,
    /// Keyboard input
    Key(KeyEvent),
    /// Window resize
    Resize(u16, u16),
}

/// Event handler for the TUI
pub struct EventHandler {
    /// Tick rate for updates
    tick_rate: Duration,
    /// Last tick time
    last_tick: Instant,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            tick_rate,
            last_tick: Instant::now(),
        }
    }

    /// Polls for the next event
    pub fn next_event(&mut self) -> anyhow::Result<Option<TuiEvent>> {
        let timeout = self.tick_rate.saturating_sub(self.last_tick.elapsed());

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    Ok(Some(TuiEvent::Key(key)))
                }
                Event::Resize(w, h) => Ok(Some(TuiEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            self.last_tick = Instant::now();
            Ok(Some(TuiEvent::Tick))
        }
    }
}

/// Handles a TUI event and updates the app state
pub fn handle_event(app: &mut App, event: TuiEvent) -> anyhow::Result<()> {
    match event {
        TuiEvent::Tick => {
            // Redraw only; the clock in the header moves
        }
        TuiEvent::Key(key) => handle_key_event(app, key)?,
        TuiEvent::Resize(_, _) => {
            // Terminal will automatically handle resize
        }
    }
    Ok(())
}

/// Handles keyboard input
fn handle_key_event(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    if app.editing {
        handle_editing_keys(app, key)
    } else {
        handle_normal_keys(app, key)
    }
}

/// Handles keys while a notes field is being edited
fn handle_editing_keys(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => app.stop_editing(),
        KeyCode::Backspace => app.backspace()?,
        KeyCode::Char(c) => app.type_char(c)?,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.stop_editing();
            handle_normal_keys(app, key)?;
        }
        _ => {}
    }
    Ok(())
}

/// Handles normal keys (non-editing mode)
fn handle_normal_keys(app: &mut App, key: KeyEvent) -> anyhow::Result<()> {
    match key.code {
        // Page navigation
        KeyCode::Tab | KeyCode::PageDown => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_page();
            } else {
                app.next_page();
            }
        }
        KeyCode::BackTab | KeyCode::PageUp => app.prev_page(),
        KeyCode::Home => app.go_to_page(0),
        KeyCode::End => app.go_to_page(app.page_count().saturating_sub(1)),

        // Sliders first, pages otherwise
        KeyCode::Right => {
            if !app.adjust(1)? {
                app.next_page();
            }
        }
        KeyCode::Left => {
            if !app.adjust(-1)? {
                app.prev_page();
            }
        }

        // Focus
        KeyCode::Down => app.focus_next(),
        KeyCode::Up => app.focus_prev(),
        KeyCode::Char(' ') | KeyCode::Enter => app.activate()?,

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // Number keys for direct page navigation
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.go_to_page(index);
        }

        _ => {}
    }

    Ok(())
}

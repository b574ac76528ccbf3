//! TUI Application State Management
//!
//! Holds the deck being presented, the per-session widget state and which
//! page and control currently have focus.

use std::time::Instant;

use codepath_core::deck::{Block, Deck, Page};
use codepath_core::relevance::Statement;
use codepath_core::session::SessionState;

/// A focusable input on the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Check { block: String, statement: Statement },
    Slider { block: String, item: String },
    Rating { block: String },
    Notes { block: String },
    Submit { block: String },
}

impl Control {
    /// Sliders and ratings respond to left/right.
    pub fn is_adjustable(&self) -> bool {
        matches!(self, Control::Slider { .. } | Control::Rating { .. })
    }
}

/// Main application state
#[derive(Debug)]
pub struct App {
    pub deck: Deck,
    pub state: SessionState,
    pub current_page: usize,
    /// Index into `controls()` of the focused input
    pub focus: usize,
    /// Whether keystrokes go into the focused notes field
    pub editing: bool,
    /// Manual scroll for pages without inputs
    pub scroll: u16,
    pub running: bool,
    pub session_start: Instant,
}

impl App {
    pub fn new(deck: Deck, start_page: usize) -> Self {
        let state = SessionState::for_deck(&deck);
        let current_page = start_page.min(deck.pages.len().saturating_sub(1));
        let mut app = Self {
            deck,
            state,
            current_page,
            focus: 0,
            editing: false,
            scroll: 0,
            running: true,
            session_start: Instant::now(),
        };
        app.state.visit(current_page);
        app
    }

    pub fn page(&self) -> &Page {
        &self.deck.pages[self.current_page]
    }

    pub fn page_count(&self) -> usize {
        self.deck.pages.len()
    }

    /// Inputs of the current page, top to bottom.
    pub fn controls(&self) -> Vec<Control> {
        page_controls(self.page())
    }

    pub fn focused_control(&self) -> Option<Control> {
        self.controls().into_iter().nth(self.focus)
    }

    /// Returns session duration as string
    pub fn session_duration(&self) -> String {
        let duration = self.session_start.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    pub fn go_to_page(&mut self, index: usize) {
        if index >= self.page_count() || index == self.current_page {
            return;
        }
        self.current_page = index;
        self.focus = 0;
        self.scroll = 0;
        self.editing = false;
        self.state.visit(index);
        tracing::debug!(page = %self.page().title, "page changed");
    }

    pub fn next_page(&mut self) {
        let next = (self.current_page + 1) % self.page_count();
        self.go_to_page(next);
    }

    pub fn prev_page(&mut self) {
        let count = self.page_count();
        let prev = (self.current_page + count - 1) % count;
        self.go_to_page(prev);
    }

    pub fn focus_next(&mut self) {
        let count = self.controls().len();
        if count == 0 {
            self.scroll = self.scroll.saturating_add(1);
        } else {
            self.focus = (self.focus + 1).min(count - 1);
        }
    }

    pub fn focus_prev(&mut self) {
        if self.controls().is_empty() {
            self.scroll = self.scroll.saturating_sub(1);
        } else {
            self.focus = self.focus.saturating_sub(1);
        }
    }

    /// Space/Enter on the focused input.
    pub fn activate(&mut self) -> anyhow::Result<()> {
        match self.focused_control() {
            Some(Control::Check { block, statement }) => {
                self.state.toggle(&block, &statement)?;
            }
            Some(Control::Submit { block }) => self.state.submit(&block),
            Some(Control::Notes { .. }) => self.editing = true,
            Some(Control::Slider { .. }) | Some(Control::Rating { .. }) | None => {}
        }
        Ok(())
    }

    /// Moves the focused slider or rating by `delta`. Returns false when the
    /// focused input is not adjustable.
    pub fn adjust(&mut self, delta: i64) -> anyhow::Result<bool> {
        match self.focused_control() {
            Some(Control::Slider { block, item }) => {
                self.state.adjust_slider(&block, &item, delta)?;
                Ok(true)
            }
            Some(Control::Rating { block }) => {
                self.state.adjust_rating(&block, delta)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn type_char(&mut self, c: char) -> anyhow::Result<()> {
        if let Some(Control::Notes { block }) = self.focused_control() {
            self.state.notes_mut(&block)?.push(c);
        }
        Ok(())
    }

    pub fn backspace(&mut self) -> anyhow::Result<()> {
        if let Some(Control::Notes { block }) = self.focused_control() {
            self.state.notes_mut(&block)?.pop();
        }
        Ok(())
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
    }

    /// Quits the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

fn page_controls(page: &Page) -> Vec<Control> {
    let mut controls = Vec::new();
    for block in &page.blocks {
        match block {
            Block::Checklist { id, items, .. } => {
                controls.extend(items.iter().map(|statement| Control::Check {
                    block: id.clone(),
                    statement: statement.clone(),
                }));
            }
            Block::Relevance { id, statements, .. } => {
                controls.extend(statements.iter().map(|statement| Control::Check {
                    block: id.clone(),
                    statement: statement.clone(),
                }));
            }
            Block::Sliders { id, items, .. } => {
                controls.extend(items.iter().map(|item| Control::Slider {
                    block: id.clone(),
                    item: item.clone(),
                }));
            }
            Block::Rating { id, .. } => controls.push(Control::Rating { block: id.clone() }),
            Block::Notes { id, .. } => controls.push(Control::Notes { block: id.clone() }),
            Block::Submit { id, .. } => controls.push(Control::Submit { block: id.clone() }),
            _ => {}
        }
    }
    controls
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepath_core::content::builtin_deck;

    fn app_on(title: &str) -> App {
        let deck = builtin_deck().unwrap();
        let index = deck.find_page(title).unwrap();
        App::new(deck, index)
    }

    #[test]
    fn test_app_new() {
        let app = App::new(builtin_deck().unwrap(), 0);
        assert!(app.running);
        assert_eq!(app.current_page, 0);
        assert!(app.controls().is_empty());
        assert_eq!(app.state.visited().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_start_page_is_clamped() {
        let app = App::new(builtin_deck().unwrap(), 99);
        assert_eq!(app.current_page, 7);
    }

    #[test]
    fn test_page_navigation_wraps() {
        let mut app = App::new(builtin_deck().unwrap(), 0);
        app.prev_page();
        assert_eq!(app.current_page, 7);
        app.next_page();
        assert_eq!(app.current_page, 0);
        app.next_page();
        assert_eq!(app.current_page, 1);
        assert_eq!(app.state.visited().collect::<Vec<_>>(), vec![0, 1, 7]);
    }

    #[test]
    fn test_toggle_updates_relevance() {
        let mut app = app_on("Benefits");
        assert_eq!(app.controls().len(), 11);

        for _ in 0..8 {
            app.activate().unwrap();
            app.focus_next();
        }
        let assessment = app.state.assessment(&app.deck, "relevance").unwrap();
        assert_eq!(assessment.score.value(), 72.73);

        app.focus = 0;
        app.activate().unwrap();
        let assessment = app.state.assessment(&app.deck, "relevance").unwrap();
        assert_eq!(assessment.checked, 7);
    }

    #[test]
    fn test_adjust_slider_and_rating() {
        let mut app = app_on("Pros & Cons");
        app.focus = 5;
        assert!(app.focused_control().unwrap().is_adjustable());
        assert!(app.adjust(1).unwrap());
        assert_eq!(
            app.state
                .slider("challenges", "Steep learning curve for beginners")
                .unwrap()
                .value,
            4
        );

        app.focus = 0;
        assert!(!app.adjust(1).unwrap());

        let mut app = app_on("Feedback");
        assert!(app.adjust(-2).unwrap());
        assert_eq!(app.state.rating("experience").unwrap().value, 3);
    }

    #[test]
    fn test_notes_editing() {
        let mut app = app_on("Q&A");
        app.activate().unwrap();
        assert!(app.editing);
        for c in "Hi!".chars() {
            app.type_char(c).unwrap();
        }
        app.backspace().unwrap();
        app.stop_editing();
        assert_eq!(app.state.notes("questions"), Some("Hi"));

        app.focus_next();
        app.activate().unwrap();
        assert!(app.state.is_submitted("submit-questions"));
    }

    #[test]
    fn test_scroll_on_static_pages() {
        let mut app = app_on("Modules");
        app.focus_next();
        app.focus_next();
        assert_eq!(app.scroll, 2);
        app.focus_prev();
        assert_eq!(app.scroll, 1);
        app.next_page();
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_session_duration() {
        let app = App::new(builtin_deck().unwrap(), 0);
        assert!(app.session_duration().contains(':'));
    }
}

use std::path::PathBuf;

use anyhow::Result;

use codepath_core::deck::Deck;
use codepath_core::session::SessionState;

use super::load_deck;
use crate::plain;

pub fn execute(config_path: Option<PathBuf>, deck: Option<PathBuf>, page: Option<String>) -> Result<()> {
    let (_, deck) = load_deck(config_path, deck.as_deref())?;
    let state = SessionState::for_deck(&deck);

    match page {
        Some(key) => {
            let index = resolve_page(&deck, &key)?;
            print!("{}", plain::render_page(&deck, &deck.pages[index], &state)?);
        }
        None => print!("{}", plain::render_deck(&deck, &state)?),
    }
    Ok(())
}

pub fn list_pages(config_path: Option<PathBuf>, deck: Option<PathBuf>) -> Result<()> {
    let (_, deck) = load_deck(config_path, deck.as_deref())?;
    for (index, page) in deck.pages.iter().enumerate() {
        let widgets = page.interactive_blocks().count();
        let charts = page.charts().count();
        println!("{index:>2}  {:<20} {widgets} inputs, {charts} charts", page.title);
    }
    Ok(())
}

/// Page index from a 0-based number or a case-insensitive title.
pub fn resolve_page(deck: &Deck, key: &str) -> Result<usize> {
    deck.find_page(key)
        .ok_or_else(|| anyhow::anyhow!("no page {key:?} in deck {:?}", deck.title))
}

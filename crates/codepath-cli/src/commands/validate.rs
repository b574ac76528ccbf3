use std::path::PathBuf;

use anyhow::Result;

use super::load_deck;

pub fn execute(config_path: Option<PathBuf>, deck: Option<PathBuf>) -> Result<()> {
    let (_, deck) = load_deck(config_path, deck.as_deref())?;
    let widgets = deck.blocks().filter(|block| block.is_interactive()).count();
    println!(
        "{}: {} pages, {} interactive blocks. OK",
        deck.title,
        deck.pages.len(),
        widgets
    );
    Ok(())
}

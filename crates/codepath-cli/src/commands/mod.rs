use std::path::{Path, PathBuf};

use anyhow::Result;

use codepath_core::config::{Config, ConfigPaths};
use codepath_core::deck::Deck;

pub mod config;
pub mod present;
pub mod report;
pub mod score;
pub mod show;
pub mod validate;

/// Effective config: `--config` if given, else the default location, else defaults.
pub fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => Config::load(&path),
        None => {
            let paths = ConfigPaths::resolve()?;
            Config::load_or_default(&paths.config_path)
        }
    }
}

pub fn load_deck(config_path: Option<PathBuf>, deck: Option<&Path>) -> Result<(Config, Deck)> {
    let config = load_config(config_path)?;
    let deck = config.resolve_deck(deck)?;
    Ok((config, deck))
}

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use time::OffsetDateTime;

use codepath_core::config::{Config, ConfigPaths};
use codepath_core::deck::Deck;
use codepath_core::session::SessionState;
use reporting::json::{save_report, write_report};
use reporting::SessionReport;

use super::load_deck;
use super::show::resolve_page;
use crate::{plain, tui};

pub struct PresentInputs {
    pub config_path: Option<PathBuf>,
    pub deck: Option<PathBuf>,
    pub page: Option<String>,
    pub report: Option<PathBuf>,
}

pub fn execute(inputs: PresentInputs) -> Result<()> {
    let (config, deck) = load_deck(inputs.config_path, inputs.deck.as_deref())?;
    let start_page = match &inputs.page {
        Some(key) => resolve_page(&deck, key)?,
        None => config.presentation.start_page,
    };

    let started_at = OffsetDateTime::now_utc();
    let state = if tui::available() {
        let tick_rate = Duration::from_millis(config.presentation.tick_rate_ms);
        tui::run_tui(deck.clone(), start_page, tick_rate)?
    } else {
        tracing::info!("stdout is not a terminal, printing the deck instead");
        let mut state = SessionState::for_deck(&deck);
        for index in 0..deck.pages.len() {
            state.visit(index);
        }
        print!("{}", plain::render_deck(&deck, &state)?);
        state
    };
    let ended_at = OffsetDateTime::now_utc();

    finish_session(&config, &deck, &state, started_at, ended_at, inputs.report)
}

/// Writes the session report where requested and prints the summary.
fn finish_session(
    config: &Config,
    deck: &Deck,
    state: &SessionState,
    started_at: OffsetDateTime,
    ended_at: OffsetDateTime,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let report = SessionReport::from_session(deck, state, started_at, ended_at);

    if let Some(path) = report_path {
        write_report(&report, &path)?;
        println!("Report written to {}", path.display());
    } else if config.reporting.store_reports {
        let paths = ConfigPaths::resolve()?;
        let path = save_report(&report, &paths.report_dir)?;
        println!("Report written to {}", path.display());
    }

    if config.reporting.human_summary {
        println!("{}", report.human_summary());
    }
    tracing::info!(session = %report.session_id, "session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepath_core::content::builtin_deck;

    #[test]
    fn test_finish_session_writes_requested_report() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        state.visit(0);
        let mut config = Config::default_config();
        config.reporting.human_summary = false;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("session.json");
        let now = OffsetDateTime::now_utc();
        finish_session(&config, &deck, &state, now, now, Some(path.clone())).unwrap();

        let report = reporting::json::load_report(&path).unwrap();
        assert_eq!(report.session_id, state.session_id);
        assert_eq!(report.pages_viewed, vec!["Intro"]);
    }
}

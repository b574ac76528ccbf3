use anyhow::{Context, Result};

use crate::deck::Deck;

/// The Coding Path presentation shipped with the binary.
pub const BUILTIN_DECK: &str = include_str!("../decks/coding_path.toml");

pub fn builtin_deck() -> Result<Deck> {
    Deck::from_toml_str(BUILTIN_DECK).context("load built-in deck")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Block, ChartKind};

    #[test]
    fn test_builtin_deck_is_valid() {
        let deck = builtin_deck().unwrap();
        let titles: Vec<&str> = deck.pages.iter().map(|page| page.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Intro",
                "Modules",
                "Applications",
                "Pros & Cons",
                "Benefits",
                "Insights",
                "Feedback",
                "Q&A"
            ]
        );
    }

    #[test]
    fn test_builtin_relevance_has_eleven_statements() {
        let deck = builtin_deck().unwrap();
        match deck.block("relevance") {
            Some(Block::Relevance { statements, .. }) => assert_eq!(statements.len(), 11),
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn test_builtin_insights_cover_every_chart_kind() {
        let deck = builtin_deck().unwrap();
        let insights = &deck.pages[deck.find_page("insights").unwrap()];
        let kinds: Vec<ChartKind> = insights.charts().map(|chart| chart.chart).collect();
        assert!(kinds.contains(&ChartKind::Bar));
        assert!(kinds.contains(&ChartKind::Pie));
        assert!(kinds.contains(&ChartKind::Line));
    }
}

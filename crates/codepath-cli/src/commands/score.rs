use std::path::PathBuf;

use anyhow::{Context, Result};

use codepath_core::deck::{Block, Deck};
use codepath_core::relevance::{assess, Assessment, ResponseSet, Statement};

use super::load_deck;

pub struct ScoreInputs {
    pub config_path: Option<PathBuf>,
    pub deck: Option<PathBuf>,
    pub block: Option<String>,
    pub checked: Vec<usize>,
    pub all: bool,
    pub json: bool,
}

pub fn execute(inputs: ScoreInputs) -> Result<()> {
    let (_, deck) = load_deck(inputs.config_path, inputs.deck.as_deref())?;
    let assessment = score_deck(&deck, inputs.block.as_deref(), &inputs.checked, inputs.all)?;

    if inputs.json {
        let output =
            serde_json::to_string_pretty(&assessment).context("render assessment JSON")?;
        println!("{}", output);
    } else {
        let marker = if assessment.band.is_warning() { "!" } else { "*" };
        println!(
            "Relevance: {} ({} of {} statements)",
            assessment.score, assessment.checked, assessment.total
        );
        println!("{marker} {}", assessment.message);
    }
    Ok(())
}

/// Scores a relevance block with the given 1-based statement numbers checked.
pub fn score_deck(
    deck: &Deck,
    block: Option<&str>,
    checked: &[usize],
    all: bool,
) -> Result<Assessment> {
    let statements = relevance_statements(deck, block)?;
    let mut responses = ResponseSet::for_statements(statements);
    if all {
        for statement in statements {
            responses.set(statement, true);
        }
    }
    for number in checked {
        let statement = number
            .checked_sub(1)
            .and_then(|index| statements.get(index))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "statement {number} out of range (1..={})",
                    statements.len()
                )
            })?;
        responses.set(statement, true);
    }
    Ok(assess(statements, &responses)?)
}

fn relevance_statements<'a>(deck: &'a Deck, block: Option<&str>) -> Result<&'a [Statement]> {
    let found = deck.blocks().find_map(|candidate| match candidate {
        Block::Relevance { id, statements, .. } if block.map_or(true, |wanted| wanted == id) => {
            Some(statements.as_slice())
        }
        _ => None,
    });
    match (found, block) {
        (Some(statements), _) => Ok(statements),
        (None, Some(id)) => Err(anyhow::anyhow!("no relevance block named {id:?}")),
        (None, None) => Err(anyhow::anyhow!("deck {:?} has no relevance block", deck.title)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepath_core::content::builtin_deck;
    use codepath_core::relevance::Band;

    #[test]
    fn test_score_eight_of_eleven() {
        let deck = builtin_deck().unwrap();
        let assessment = score_deck(&deck, None, &[1, 2, 3, 4, 5, 6, 7, 8], false).unwrap();
        assert_eq!(assessment.score.value(), 72.73);
        assert_eq!(assessment.band, Band::Neutral);
    }

    #[test]
    fn test_score_all() {
        let deck = builtin_deck().unwrap();
        let assessment = score_deck(&deck, Some("relevance"), &[], true).unwrap();
        assert_eq!(assessment.score.value(), 100.0);
        assert_eq!(assessment.band, Band::Positive);
    }

    #[test]
    fn test_repeated_numbers_count_once() {
        let deck = builtin_deck().unwrap();
        let assessment = score_deck(&deck, None, &[1, 1, 1], false).unwrap();
        assert_eq!(assessment.checked, 1);
    }

    #[test]
    fn test_out_of_range_statement() {
        let deck = builtin_deck().unwrap();
        assert!(score_deck(&deck, None, &[0], false).is_err());
        assert!(score_deck(&deck, None, &[12], false).is_err());
    }

    #[test]
    fn test_unknown_block() {
        let deck = builtin_deck().unwrap();
        let err = score_deck(&deck, Some("advantages"), &[], false).unwrap_err();
        assert!(err.to_string().contains("advantages"));
    }
}

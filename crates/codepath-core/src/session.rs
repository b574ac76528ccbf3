//! Widget state for one viewing of a deck.
//!
//! Every interactive block gets its state up front with its default value,
//! so readers never see a missing entry. Nothing here outlives the session.

use std::collections::{BTreeMap, BTreeSet};

use crate::deck::{Block, Deck};
use crate::error::CodePathError;
use crate::ids::SessionId;
use crate::relevance::{self, Assessment, ResponseSet, Statement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    pub min: i64,
    pub max: i64,
    pub value: i64,
}

impl Slider {
    fn new(min: i64, max: i64, value: i64) -> Self {
        Self { min, max, value }
    }

    fn adjust(&mut self, delta: i64) -> i64 {
        self.value = self.value.saturating_add(delta).clamp(self.min, self.max);
        self.value
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub session_id: SessionId,
    checks: BTreeMap<String, ResponseSet>,
    sliders: BTreeMap<String, BTreeMap<String, Slider>>,
    ratings: BTreeMap<String, Slider>,
    notes: BTreeMap<String, String>,
    submitted: BTreeSet<String>,
    visited: BTreeSet<usize>,
}

impl SessionState {
    pub fn for_deck(deck: &Deck) -> Self {
        let mut state = Self::default();
        for block in deck.blocks() {
            match block {
                Block::Checklist { id, items, .. } => {
                    state
                        .checks
                        .insert(id.clone(), ResponseSet::for_statements(items));
                }
                Block::Relevance { id, statements, .. } => {
                    state
                        .checks
                        .insert(id.clone(), ResponseSet::for_statements(statements));
                }
                Block::Sliders {
                    id,
                    min,
                    max,
                    default,
                    items,
                    ..
                } => {
                    let group = items
                        .iter()
                        .map(|item| (item.clone(), Slider::new(*min, *max, *default)))
                        .collect();
                    state.sliders.insert(id.clone(), group);
                }
                Block::Rating {
                    id,
                    min,
                    max,
                    default,
                    ..
                } => {
                    state
                        .ratings
                        .insert(id.clone(), Slider::new(*min, *max, *default));
                }
                Block::Notes { id, .. } => {
                    state.notes.insert(id.clone(), String::new());
                }
                _ => {}
            }
        }
        tracing::debug!(session = %state.session_id, "session state created");
        state
    }

    pub fn responses(&self, id: &str) -> Option<&ResponseSet> {
        self.checks.get(id)
    }

    /// Flips a checklist item or relevance statement and returns its new state.
    pub fn toggle(&mut self, id: &str, statement: &Statement) -> Result<bool, CodePathError> {
        let responses = self
            .checks
            .get_mut(id)
            .ok_or_else(|| CodePathError::UnknownBlock(id.to_string()))?;
        let checked = responses.toggle(statement);
        tracing::debug!(block = id, statement = %statement, checked, "toggled");
        Ok(checked)
    }

    pub fn set_checked(
        &mut self,
        id: &str,
        statement: &Statement,
        checked: bool,
    ) -> Result<(), CodePathError> {
        let responses = self
            .checks
            .get_mut(id)
            .ok_or_else(|| CodePathError::UnknownBlock(id.to_string()))?;
        responses.set(statement, checked);
        Ok(())
    }

    pub fn slider(&self, id: &str, item: &str) -> Option<Slider> {
        self.sliders.get(id)?.get(item).copied()
    }

    /// Current values of a slider group, keyed by item.
    pub fn slider_values(&self, id: &str) -> Option<BTreeMap<String, i64>> {
        let group = self.sliders.get(id)?;
        Some(
            group
                .iter()
                .map(|(item, slider)| (item.clone(), slider.value))
                .collect(),
        )
    }

    /// Moves a slider by `delta`, clamped to its range.
    pub fn adjust_slider(&mut self, id: &str, item: &str, delta: i64) -> Result<i64, CodePathError> {
        let slider = self
            .sliders
            .get_mut(id)
            .and_then(|group| group.get_mut(item))
            .ok_or_else(|| CodePathError::UnknownBlock(format!("{id}/{item}")))?;
        Ok(slider.adjust(delta))
    }

    pub fn rating(&self, id: &str) -> Option<Slider> {
        self.ratings.get(id).copied()
    }

    pub fn adjust_rating(&mut self, id: &str, delta: i64) -> Result<i64, CodePathError> {
        let rating = self
            .ratings
            .get_mut(id)
            .ok_or_else(|| CodePathError::UnknownBlock(id.to_string()))?;
        Ok(rating.adjust(delta))
    }

    pub fn notes(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    pub fn notes_mut(&mut self, id: &str) -> Result<&mut String, CodePathError> {
        self.notes
            .get_mut(id)
            .ok_or_else(|| CodePathError::UnknownBlock(id.to_string()))
    }

    pub fn submit(&mut self, id: &str) {
        if self.submitted.insert(id.to_string()) {
            tracing::info!(session = %self.session_id, button = id, "submitted");
        }
    }

    pub fn visit(&mut self, page: usize) {
        self.visited.insert(page);
    }

    /// Page indices shown at least once, ascending.
    pub fn visited(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited.iter().copied()
    }

    pub fn is_submitted(&self, id: &str) -> bool {
        self.submitted.contains(id)
    }

    pub fn submitted(&self) -> impl Iterator<Item = &str> {
        self.submitted.iter().map(String::as_str)
    }

    /// Checked checklist items in deck order.
    pub fn selected<'a>(&self, deck: &'a Deck, id: &str) -> Result<Vec<&'a Statement>, CodePathError> {
        let items = match deck.block(id) {
            Some(Block::Checklist { items, .. }) => items,
            Some(Block::Relevance { statements, .. }) => statements,
            _ => return Err(CodePathError::UnknownBlock(id.to_string())),
        };
        let responses = self
            .checks
            .get(id)
            .ok_or_else(|| CodePathError::UnknownBlock(id.to_string()))?;
        Ok(responses.checked(items))
    }

    /// Scores a relevance block against the current answers.
    pub fn assessment(&self, deck: &Deck, id: &str) -> Result<Assessment, CodePathError> {
        let statements = match deck.block(id) {
            Some(Block::Relevance { statements, .. }) => statements,
            _ => return Err(CodePathError::UnknownBlock(id.to_string())),
        };
        let empty = ResponseSet::new();
        let responses = self.checks.get(id).unwrap_or(&empty);
        relevance::assess(statements, responses)
    }

    /// Assessments for every relevance block in the deck, in deck order.
    pub fn assessments(&self, deck: &Deck) -> Vec<(String, Result<Assessment, CodePathError>)> {
        deck.blocks()
            .filter_map(|block| match block {
                Block::Relevance { id, .. } => Some((id.clone(), self.assessment(deck, id))),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin_deck;
    use crate::relevance::Band;

    fn statements(deck: &Deck) -> Vec<Statement> {
        match deck.block("relevance") {
            Some(Block::Relevance { statements, .. }) => statements.clone(),
            _ => panic!("missing relevance block"),
        }
    }

    #[test]
    fn test_fresh_state_uses_defaults() {
        let deck = builtin_deck().unwrap();
        let state = SessionState::for_deck(&deck);

        assert_eq!(state.responses("relevance").unwrap().len(), 11);
        assert_eq!(state.responses("advantages").unwrap().len(), 5);
        assert_eq!(
            state
                .slider("challenges", "Steep learning curve for beginners")
                .unwrap()
                .value,
            3
        );
        assert_eq!(state.rating("experience").unwrap().value, 5);
        assert_eq!(state.notes("questions"), Some(""));
        assert!(!state.is_submitted("submit-feedback"));
    }

    #[test]
    fn test_assessment_follows_toggles() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        let list = statements(&deck);

        let initial = state.assessment(&deck, "relevance").unwrap();
        assert_eq!(initial.score.value(), 0.0);
        assert_eq!(initial.band, Band::Negative);

        for statement in list.iter().take(8) {
            assert!(state.toggle("relevance", statement).unwrap());
        }
        let assessment = state.assessment(&deck, "relevance").unwrap();
        assert_eq!(assessment.score.value(), 72.73);
        assert_eq!(assessment.band, Band::Neutral);

        for statement in list.iter().skip(8) {
            state.set_checked("relevance", statement, true).unwrap();
        }
        let assessment = state.assessment(&deck, "relevance").unwrap();
        assert_eq!(assessment.band, Band::Positive);
        assert_eq!(state.assessments(&deck).len(), 1);
    }

    #[test]
    fn test_sliders_clamp_to_range() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        let item = "Initial productivity dip during the learning phase";

        assert_eq!(state.adjust_slider("challenges", item, 10).unwrap(), 5);
        assert_eq!(state.adjust_slider("challenges", item, -10).unwrap(), 1);
        assert_eq!(state.adjust_rating("experience", 1).unwrap(), 6);
        assert_eq!(state.adjust_rating("experience", -100).unwrap(), 0);
        assert!(state.adjust_slider("challenges", "missing", 1).is_err());
    }

    #[test]
    fn test_selected_keeps_deck_order() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        let last = Statement::new(
            "Professional growth and alignment with digital transformation initiatives",
        );
        let first = Statement::new("Enhanced skill set and future-proofing");
        state.toggle("advantages", &last).unwrap();
        state.toggle("advantages", &first).unwrap();

        let selected = state.selected(&deck, "advantages").unwrap();
        assert_eq!(selected, vec![&first, &last]);
    }

    #[test]
    fn test_unknown_blocks_are_errors() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        let statement = Statement::new("anything");

        assert_eq!(
            state.toggle("nope", &statement),
            Err(CodePathError::UnknownBlock("nope".to_string()))
        );
        assert!(state.assessment(&deck, "advantages").is_err());
        assert!(state.notes_mut("nope").is_err());
    }

    #[test]
    fn test_notes_and_submit() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        state.notes_mut("questions").unwrap().push_str("How long does it take?");
        state.submit("submit-questions");
        state.submit("submit-questions");

        assert_eq!(state.notes("questions"), Some("How long does it take?"));
        assert!(state.is_submitted("submit-questions"));
        assert_eq!(state.submitted().count(), 1);
    }

    #[test]
    fn test_visited_pages_are_deduplicated() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        state.visit(3);
        state.visit(0);
        state.visit(3);

        assert_eq!(state.visited().collect::<Vec<_>>(), vec![0, 3]);
    }
}

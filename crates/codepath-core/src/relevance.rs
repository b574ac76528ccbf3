//! Relevance scoring for agree/disagree statement lists.
//!
//! A viewer ticks the statements that apply to their work; the score is the
//! share of ticked statements as a percentage rounded to two decimals, and
//! the band turns that number into the feedback message shown under the list.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CodePathError;

/// Lower bound (inclusive) of the positive band.
pub const POSITIVE_THRESHOLD: f64 = 75.0;
/// Lower bound (inclusive) of the neutral band.
pub const NEUTRAL_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statement(String);

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Statement {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Statement {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checked state per statement. A statement appears at most once; anything
/// never set reads as unchecked.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    responses: BTreeMap<Statement, bool>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// One unchecked entry for every statement in the list.
    pub fn for_statements(statements: &[Statement]) -> Self {
        let responses = statements
            .iter()
            .map(|statement| (statement.clone(), false))
            .collect();
        Self { responses }
    }

    pub fn set(&mut self, statement: &Statement, checked: bool) {
        self.responses.insert(statement.clone(), checked);
    }

    /// Flips the statement and returns its new state.
    pub fn toggle(&mut self, statement: &Statement) -> bool {
        let entry = self.responses.entry(statement.clone()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_checked(&self, statement: &Statement) -> bool {
        self.responses.get(statement).copied().unwrap_or(false)
    }

    /// Number of statements from `statements` that are checked.
    pub fn checked_count(&self, statements: &[Statement]) -> usize {
        statements
            .iter()
            .filter(|statement| self.is_checked(statement))
            .count()
    }

    /// Checked statements, in the order of `statements`.
    pub fn checked<'a>(&self, statements: &'a [Statement]) -> Vec<&'a Statement> {
        statements
            .iter()
            .filter(|statement| self.is_checked(statement))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

/// Percentage in `[0, 100]`, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn from_percent(value: f64) -> Self {
        Self(round2(value.clamp(0.0, 100.0)))
    }

    fn from_ratio(checked: usize, total: usize) -> Self {
        Self::from_percent(checked as f64 / total as f64 * 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Positive,
    Neutral,
    Negative,
}

impl Band {
    pub fn message(&self) -> &'static str {
        match self {
            Band::Positive => "Great! The Coding Path looks highly relevant to your work.",
            Band::Neutral => {
                "The Coding Path looks moderately relevant. Some parts may need adapting to your role."
            }
            Band::Negative => "The Coding Path may not be a strong fit for your work right now.",
        }
    }

    /// Neutral results are presented as a warning rather than a plain note.
    pub fn is_warning(&self) -> bool {
        matches!(self, Band::Neutral)
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "positive" => Ok(Band::Positive),
            "neutral" => Ok(Band::Neutral),
            "negative" => Ok(Band::Negative),
            _ => Err(format!("unknown band: {value}")),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Band::Positive => "positive",
            Band::Neutral => "neutral",
            Band::Negative => "negative",
        };
        write!(f, "{value}")
    }
}

/// What the presenter writes back under a statement list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub score: Score,
    pub band: Band,
    pub checked: usize,
    pub total: usize,
    pub message: String,
}

/// Share of `statements` checked in `responses`.
///
/// The statement list must not be empty; an empty list yields
/// [`CodePathError::EmptyStatements`] instead of a made-up score.
pub fn score(statements: &[Statement], responses: &ResponseSet) -> Result<Score, CodePathError> {
    if statements.is_empty() {
        return Err(CodePathError::EmptyStatements);
    }
    let checked = responses.checked_count(statements);
    Ok(Score::from_ratio(checked, statements.len()))
}

pub fn band(score: Score) -> Band {
    let value = score.value();
    if value >= POSITIVE_THRESHOLD {
        Band::Positive
    } else if value >= NEUTRAL_THRESHOLD {
        Band::Neutral
    } else {
        Band::Negative
    }
}

pub fn assess(statements: &[Statement], responses: &ResponseSet) -> Result<Assessment, CodePathError> {
    let score = score(statements, responses)?;
    let band = band(score);
    Ok(Assessment {
        score,
        band,
        checked: responses.checked_count(statements),
        total: statements.len(),
        message: band.message().to_string(),
    })
}

/// Two decimals, ties to the even digit.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(count: usize) -> Vec<Statement> {
        (1..=count)
            .map(|index| Statement::new(format!("Statement {index}")))
            .collect()
    }

    fn check_first(list: &[Statement], count: usize) -> ResponseSet {
        let mut responses = ResponseSet::for_statements(list);
        for statement in list.iter().take(count) {
            responses.set(statement, true);
        }
        responses
    }

    #[test]
    fn test_eight_of_eleven_is_neutral_warning() {
        let list = statements(11);
        let responses = check_first(&list, 8);

        let assessment = assess(&list, &responses).unwrap();
        assert_eq!(assessment.score.value(), 72.73);
        assert_eq!(assessment.band, Band::Neutral);
        assert!(assessment.band.is_warning());
        assert_eq!(assessment.checked, 8);
        assert_eq!(assessment.total, 11);
    }

    #[test]
    fn test_all_fourteen_checked_is_positive() {
        let list = statements(14);
        let responses = check_first(&list, 14);

        let score = score(&list, &responses).unwrap();
        assert_eq!(score.value(), 100.0);
        assert_eq!(band(score), Band::Positive);
    }

    #[test]
    fn test_empty_statement_list_is_an_error() {
        let result = score(&[], &ResponseSet::new());
        assert_eq!(result, Err(CodePathError::EmptyStatements));
        assert!(assess(&[], &ResponseSet::new()).is_err());
    }

    #[test]
    fn test_missing_responses_count_as_unchecked() {
        let list = statements(4);
        let mut responses = ResponseSet::new();
        responses.set(&list[0], true);

        let score = score(&list, &responses).unwrap();
        assert_eq!(score.value(), 25.0);
    }

    #[test]
    fn test_responses_outside_the_list_are_ignored() {
        let list = statements(2);
        let mut responses = ResponseSet::for_statements(&list);
        responses.set(&Statement::new("Unrelated"), true);

        assert_eq!(score(&list, &responses).unwrap().value(), 0.0);
    }

    #[test]
    fn test_score_matches_formula_for_every_subset() {
        for total in 1..=14usize {
            let list = statements(total);
            for mask in 0u32..(1 << total) {
                let mut responses = ResponseSet::for_statements(&list);
                for (index, statement) in list.iter().enumerate() {
                    if mask & (1 << index) != 0 {
                        responses.set(statement, true);
                    }
                }
                let checked = mask.count_ones() as f64;
                let expected = (100.0 * checked / total as f64 * 100.0).round_ties_even() / 100.0;
                let actual = score(&list, &responses).unwrap().value();
                assert!(
                    (actual - expected).abs() < 1e-9,
                    "{checked}/{total}: {actual} != {expected}"
                );
                assert!((0.0..=100.0).contains(&actual));
            }
        }
    }

    #[test]
    fn test_checking_more_never_lowers_score() {
        let list = statements(13);
        let mut responses = ResponseSet::for_statements(&list);
        let mut previous = score(&list, &responses).unwrap();
        for statement in &list {
            responses.set(statement, true);
            let next = score(&list, &responses).unwrap();
            assert!(next >= previous);
            previous = next;
        }
        assert_eq!(previous.value(), 100.0);
    }

    #[test]
    fn test_ties_round_to_even() {
        let list = statements(32);
        let one = score(&list, &check_first(&list, 1)).unwrap();
        assert_eq!(one.value(), 3.12);
        let three = score(&list, &check_first(&list, 3)).unwrap();
        assert_eq!(three.value(), 9.38);
        assert_eq!(band(one), Band::Negative);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(band(Score::from_percent(75.0)), Band::Positive);
        assert_eq!(band(Score::from_percent(74.99)), Band::Neutral);
        assert_eq!(band(Score::from_percent(50.0)), Band::Neutral);
        assert_eq!(band(Score::from_percent(49.99)), Band::Negative);
        assert_eq!(band(Score::from_percent(0.0)), Band::Negative);
    }

    #[test]
    fn test_toggle_flips_state() {
        let list = statements(1);
        let mut responses = ResponseSet::for_statements(&list);
        assert!(responses.toggle(&list[0]));
        assert!(responses.is_checked(&list[0]));
        assert!(!responses.toggle(&list[0]));
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn test_checked_preserves_statement_order() {
        let list = statements(3);
        let mut responses = ResponseSet::for_statements(&list);
        responses.set(&list[2], true);
        responses.set(&list[0], true);

        let checked = responses.checked(&list);
        assert_eq!(checked, vec![&list[0], &list[2]]);
    }

    #[test]
    fn test_band_parse_and_display() {
        assert_eq!("Neutral".parse::<Band>().unwrap(), Band::Neutral);
        assert_eq!(Band::Positive.to_string(), "positive");
        assert!("great".parse::<Band>().is_err());
        assert_eq!(Score::from_percent(72.7272).to_string(), "72.73%");
    }
}

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CodePathError;
use crate::relevance::Statement;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: String,
    },
    Subheader {
        text: String,
    },
    Text {
        text: String,
    },
    Bullets {
        items: Vec<String>,
    },
    Expander {
        title: String,
        body: Vec<String>,
    },
    Checklist {
        id: String,
        prompt: String,
        items: Vec<Statement>,
    },
    Sliders {
        id: String,
        prompt: String,
        min: i64,
        max: i64,
        default: i64,
        items: Vec<String>,
    },
    Chart(Chart),
    Relevance {
        id: String,
        prompt: String,
        statements: Vec<Statement>,
    },
    Rating {
        id: String,
        prompt: String,
        min: i64,
        max: i64,
        default: i64,
    },
    Notes {
        id: String,
        prompt: String,
    },
    Submit {
        id: String,
        label: String,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub chart: ChartKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    pub data: Vec<DataPoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
}

impl Block {
    /// Widget id for interactive blocks.
    pub fn id(&self) -> Option<&str> {
        match self {
            Block::Checklist { id, .. }
            | Block::Sliders { id, .. }
            | Block::Relevance { id, .. }
            | Block::Rating { id, .. }
            | Block::Notes { id, .. }
            | Block::Submit { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.id().is_some()
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Block::Checklist { items, .. } => {
                ensure_non_empty(items.len(), "checklist has no items")?;
                ensure_unique(items.iter().map(Statement::as_str), "checklist item")
            }
            Block::Relevance { statements, .. } => {
                ensure_non_empty(statements.len(), "relevance block has no statements")?;
                ensure_unique(statements.iter().map(Statement::as_str), "statement")
            }
            Block::Sliders {
                min,
                max,
                default,
                items,
                ..
            } => {
                ensure_non_empty(items.len(), "slider group has no items")?;
                ensure_unique(items.iter().map(String::as_str), "slider")?;
                ensure_range(*min, *max, *default)
            }
            Block::Rating {
                min, max, default, ..
            } => ensure_range(*min, *max, *default),
            Block::Chart(chart) => chart.validate(),
            _ => Ok(()),
        }
    }
}

impl Chart {
    pub fn total(&self) -> f64 {
        self.data.iter().map(|point| point.value).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.data
            .iter()
            .map(|point| point.value)
            .fold(0.0, f64::max)
    }

    /// Each point's share of the total, in percent. All zero when the total is.
    pub fn shares(&self) -> Vec<(String, f64)> {
        let total = self.total();
        self.data
            .iter()
            .map(|point| {
                let share = if total > 0.0 {
                    point.value / total * 100.0
                } else {
                    0.0
                };
                (point.label.clone(), share)
            })
            .collect()
    }

    fn validate(&self) -> Result<(), String> {
        ensure_non_empty(self.data.len(), "chart has no data")?;
        if let Some(point) = self.data.iter().find(|point| point.value < 0.0 || !point.value.is_finite()) {
            return Err(format!("chart value for {:?} must be a non-negative number", point.label));
        }
        Ok(())
    }
}

impl Page {
    pub fn interactive_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|block| block.is_interactive())
    }

    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Chart(chart) => Some(chart),
            _ => None,
        })
    }
}

impl Deck {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let deck: Deck = toml::from_str(contents).context("parse deck TOML")?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render deck TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read deck at {}", path.display()))?;
        let deck = Self::from_toml_str(&contents)
            .with_context(|| format!("load deck {}", path.display()))?;
        tracing::info!(path = %path.display(), pages = deck.pages.len(), "loaded deck");
        Ok(deck)
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Finds a page by 0-based index or case-insensitive title.
    pub fn find_page(&self, key: &str) -> Option<usize> {
        if let Ok(index) = key.parse::<usize>() {
            return (index < self.pages.len()).then_some(index);
        }
        let key = key.to_lowercase();
        self.pages
            .iter()
            .position(|page| page.title.to_lowercase() == key)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.pages.iter().flat_map(|page| page.blocks.iter())
    }

    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks().find(|block| block.id() == Some(id))
    }

    pub fn validate(&self) -> Result<(), CodePathError> {
        if self.pages.is_empty() {
            return Err(CodePathError::InvalidDeck("deck has no pages".to_string()));
        }
        let mut ids = HashSet::new();
        for (index, page) in self.pages.iter().enumerate() {
            if page.title.trim().is_empty() {
                return Err(CodePathError::InvalidDeck(format!(
                    "page {index} has no title"
                )));
            }
            for block in &page.blocks {
                if let Some(id) = block.id() {
                    if !ids.insert(id) {
                        return Err(CodePathError::InvalidDeck(format!(
                            "duplicate block id {id:?}"
                        )));
                    }
                }
                block.validate().map_err(|reason| {
                    CodePathError::InvalidDeck(format!("page {:?}: {reason}", page.title))
                })?;
            }
        }
        Ok(())
    }
}

fn ensure_non_empty(len: usize, message: &str) -> Result<(), String> {
    if len == 0 {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

fn ensure_unique<'a>(values: impl Iterator<Item = &'a str>, what: &str) -> Result<(), String> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(format!("duplicate {what} {value:?}"));
        }
    }
    Ok(())
}

fn ensure_range(min: i64, max: i64, default: i64) -> Result<(), String> {
    if min > max {
        return Err(format!("range {min}..={max} is empty"));
    }
    if !(min..=max).contains(&default) {
        return Err(format!("default {default} outside {min}..={max}"));
    }
    Ok(())
}

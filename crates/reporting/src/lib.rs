use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use codepath_core::deck::{Block, Deck};
use codepath_core::ids::SessionId;
use codepath_core::relevance::Assessment;
use codepath_core::session::SessionState;

pub mod json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub id: String,
    pub prompt: String,
    pub selected: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderSummary {
    pub id: String,
    pub prompt: String,
    pub max: i64,
    pub values: Vec<(String, i64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSummary {
    pub id: String,
    pub prompt: String,
    pub value: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceSummary {
    pub id: String,
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: String,
    pub prompt: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub pages_viewed: u32,
    pub total_pages: u32,
    pub checked_items: u32,
    pub submitted: u32,
    pub average_slider: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    pub deck_title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ended_at: OffsetDateTime,
    pub pages_viewed: Vec<String>,
    pub selections: Vec<SelectionSummary>,
    pub sliders: Vec<SliderSummary>,
    pub ratings: Vec<RatingSummary>,
    pub relevance: Vec<RelevanceSummary>,
    pub notes: Vec<NoteSummary>,
    pub submitted: Vec<String>,
    pub stats: ReportStats,
}

impl SessionReport {
    pub fn from_session(
        deck: &Deck,
        state: &SessionState,
        started_at: OffsetDateTime,
        ended_at: OffsetDateTime,
    ) -> Self {
        let mut selections = Vec::new();
        let mut sliders = Vec::new();
        let mut ratings = Vec::new();
        let mut notes = Vec::new();

        for block in deck.blocks() {
            match block {
                Block::Checklist { id, prompt, items } => {
                    let selected = state
                        .selected(deck, id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|statement| statement.to_string())
                        .collect();
                    selections.push(SelectionSummary {
                        id: id.clone(),
                        prompt: prompt.clone(),
                        selected,
                        total: items.len(),
                    });
                }
                Block::Sliders {
                    id,
                    prompt,
                    max,
                    items,
                    ..
                } => {
                    let values = items
                        .iter()
                        .filter_map(|item| {
                            state
                                .slider(id, item)
                                .map(|slider| (item.clone(), slider.value))
                        })
                        .collect();
                    sliders.push(SliderSummary {
                        id: id.clone(),
                        prompt: prompt.clone(),
                        max: *max,
                        values,
                    });
                }
                Block::Rating { id, prompt, max, .. } => {
                    if let Some(rating) = state.rating(id) {
                        ratings.push(RatingSummary {
                            id: id.clone(),
                            prompt: prompt.clone(),
                            value: rating.value,
                            max: *max,
                        });
                    }
                }
                Block::Notes { id, prompt } => {
                    let text = state.notes(id).unwrap_or_default().trim().to_string();
                    if !text.is_empty() {
                        notes.push(NoteSummary {
                            id: id.clone(),
                            prompt: prompt.clone(),
                            text,
                        });
                    }
                }
                _ => {}
            }
        }

        let relevance = state
            .assessments(deck)
            .into_iter()
            .filter_map(|(id, assessment)| {
                assessment
                    .ok()
                    .map(|assessment| RelevanceSummary { id, assessment })
            })
            .collect::<Vec<_>>();

        let pages_viewed = state
            .visited()
            .filter_map(|index| deck.page(index).map(|page| page.title.clone()))
            .collect::<Vec<_>>();
        let submitted = state.submitted().map(str::to_string).collect::<Vec<_>>();

        let stats = ReportStats::compute(
            deck.pages.len(),
            &pages_viewed,
            &selections,
            &relevance,
            &sliders,
            &submitted,
        );

        Self {
            session_id: state.session_id,
            deck_title: deck.title.clone(),
            started_at,
            ended_at,
            pages_viewed,
            selections,
            sliders,
            ratings,
            relevance,
            notes,
            submitted,
            stats,
        }
    }

    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    pub fn human_summary(&self) -> String {
        let mut lines = vec![
            format!("{} ({})", self.deck_title, format_duration(self.duration())),
            format!(
                "You viewed {} of {} pages.",
                self.stats.pages_viewed, self.stats.total_pages
            ),
        ];

        for relevance in &self.relevance {
            let assessment = &relevance.assessment;
            lines.push(format!(
                "Relevance: {} ({} of {} statements, {}). {}",
                assessment.score,
                assessment.checked,
                assessment.total,
                assessment.band,
                assessment.message
            ));
        }
        for selection in &self.selections {
            lines.push(format!(
                "Selected {} of {}: {}",
                selection.selected.len(),
                selection.total,
                if selection.selected.is_empty() {
                    "none".to_string()
                } else {
                    selection.selected.join("; ")
                }
            ));
        }
        if let Some(average) = self.stats.average_slider {
            lines.push(format!("Average challenge rating: {average:.1}"));
        }
        for rating in &self.ratings {
            lines.push(format!("{} {}/{}", rating.prompt, rating.value, rating.max));
        }
        for note in &self.notes {
            lines.push(format!("{} {}", note.prompt, note.text));
        }
        if !self.submitted.is_empty() {
            lines.push("Thank you for your feedback!".to_string());
        }

        lines.join("\n")
    }
}

impl ReportStats {
    fn compute(
        total_pages: usize,
        pages_viewed: &[String],
        selections: &[SelectionSummary],
        relevance: &[RelevanceSummary],
        sliders: &[SliderSummary],
        submitted: &[String],
    ) -> Self {
        let checked_from_lists: usize = selections.iter().map(|s| s.selected.len()).sum();
        let checked_from_relevance: usize =
            relevance.iter().map(|r| r.assessment.checked).sum();

        let values: Vec<i64> = sliders
            .iter()
            .flat_map(|group| group.values.iter().map(|(_, value)| *value))
            .collect();
        let average_slider = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<i64>() as f64 / values.len() as f64)
        };

        ReportStats {
            pages_viewed: saturating_u32(pages_viewed.len()),
            total_pages: saturating_u32(total_pages),
            checked_items: saturating_u32(checked_from_lists + checked_from_relevance),
            submitted: saturating_u32(submitted.len()),
            average_slider,
        }
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_seconds_f64().max(0.0) as i64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepath_core::content::builtin_deck;
    use codepath_core::relevance::{Band, Statement};

    fn sample_report() -> SessionReport {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        state.visit(0);
        state.visit(4);
        if let Some(Block::Relevance { statements, .. }) = deck.block("relevance") {
            for statement in statements.iter().take(8) {
                state.toggle("relevance", statement).unwrap();
            }
        }
        state
            .toggle(
                "advantages",
                &Statement::new("Increased efficiency through automation"),
            )
            .unwrap();
        state
            .adjust_slider("challenges", "Steep learning curve for beginners", 2)
            .unwrap();
        state.adjust_rating("experience", 3).unwrap();
        state.notes_mut("questions").unwrap().push_str("  What comes next?  ");
        state.submit("submit-feedback");

        let started = OffsetDateTime::UNIX_EPOCH;
        let ended = started + Duration::seconds(125);
        SessionReport::from_session(&deck, &state, started, ended)
    }

    #[test]
    fn test_report_collects_widget_state() {
        let report = sample_report();

        assert_eq!(report.pages_viewed, vec!["Intro", "Benefits"]);
        assert_eq!(report.relevance.len(), 1);
        assert_eq!(report.relevance[0].assessment.score.value(), 72.73);
        assert_eq!(report.relevance[0].assessment.band, Band::Neutral);
        assert_eq!(
            report.selections[0].selected,
            vec!["Increased efficiency through automation"]
        );
        assert_eq!(report.ratings[0].value, 8);
        assert_eq!(report.notes[0].text, "What comes next?");
        assert_eq!(report.submitted, vec!["submit-feedback"]);
    }

    #[test]
    fn test_report_stats() {
        let report = sample_report();

        assert_eq!(report.stats.pages_viewed, 2);
        assert_eq!(report.stats.total_pages, 8);
        assert_eq!(report.stats.checked_items, 9);
        assert_eq!(report.stats.submitted, 1);
        // four sliders at 3 and one at 5
        assert_eq!(report.stats.average_slider, Some(3.4));
    }

    #[test]
    fn test_human_summary_mentions_score_and_duration() {
        let summary = sample_report().human_summary();

        assert!(summary.contains("(2m 5s)"));
        assert!(summary.contains("Relevance: 72.73%"));
        assert!(summary.contains("neutral"));
        assert!(summary.contains("Selected 1 of 5"));
        assert!(summary.contains("Average challenge rating: 3.4"));
        assert!(summary.contains("Thank you for your feedback!"));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(42)), "42s");
        assert_eq!(format_duration(Duration::seconds(3725)), "1h 2m");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }
}

//! Plain-text rendering for pipes, scripts and non-interactive terminals.

use std::fmt::{self, Write};

use codepath_core::deck::{Block, Chart, ChartKind, Deck, Page};
use codepath_core::session::SessionState;

const BAR_WIDTH: usize = 30;

pub fn render_deck(deck: &Deck, state: &SessionState) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{}", deck.title)?;
    if let Some(subtitle) = &deck.subtitle {
        writeln!(out, "{subtitle}")?;
    }
    for page in &deck.pages {
        out.push('\n');
        write_page(&mut out, deck, page, state)?;
    }
    Ok(out)
}

pub fn render_page(deck: &Deck, page: &Page, state: &SessionState) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_page(&mut out, deck, page, state)?;
    Ok(out)
}

fn write_page(out: &mut String, deck: &Deck, page: &Page, state: &SessionState) -> fmt::Result {
    writeln!(out, "== {} ==", page.title)?;
    for block in &page.blocks {
        render_block(out, deck, block, state)?;
    }
    Ok(())
}

fn render_block(out: &mut String, deck: &Deck, block: &Block, state: &SessionState) -> fmt::Result {
    match block {
        Block::Header { text } => {
            writeln!(out, "\n{}\n{}", text, "=".repeat(text.chars().count()))?;
        }
        Block::Subheader { text } => {
            writeln!(out, "\n{}\n{}", text, "-".repeat(text.chars().count()))?;
        }
        Block::Text { text } => writeln!(out, "{text}")?,
        Block::Bullets { items } => {
            for item in items {
                writeln!(out, "  - {item}")?;
            }
        }
        Block::Expander { title, body } => {
            writeln!(out, "\n> {title}")?;
            for line in body {
                writeln!(out, "    - {line}")?;
            }
        }
        Block::Checklist { id, prompt, items } => {
            writeln!(out, "\n{prompt}")?;
            for item in items {
                let checked = state
                    .responses(id)
                    .is_some_and(|responses| responses.is_checked(item));
                writeln!(out, "  {} {item}", checkbox(checked))?;
            }
        }
        Block::Relevance { id, prompt, statements } => {
            writeln!(out, "\n{prompt}")?;
            for (number, statement) in statements.iter().enumerate() {
                let checked = state
                    .responses(id)
                    .is_some_and(|responses| responses.is_checked(statement));
                writeln!(out, "  {} {:>2}. {statement}", checkbox(checked), number + 1)?;
            }
            match state.assessment(deck, id) {
                Ok(assessment) => writeln!(
                    out,
                    "  Relevance: {} [{}]\n  {}",
                    assessment.score, assessment.band, assessment.message
                )?,
                Err(err) => writeln!(out, "  Relevance unavailable: {err}")?,
            }
        }
        Block::Sliders { id, prompt, min, max, items, .. } => {
            writeln!(out, "\n{prompt}")?;
            for item in items {
                let value = state.slider(id, item).map(|slider| slider.value).unwrap_or(*min);
                writeln!(out, "  {item}: {value} ({min}..{max})")?;
            }
        }
        Block::Chart(chart) => render_chart(out, chart)?,
        Block::Rating { id, prompt, min, max, .. } => {
            let value = state.rating(id).map(|rating| rating.value).unwrap_or(*min);
            writeln!(out, "\n{prompt} {value} ({min}..{max})")?;
        }
        Block::Notes { id, prompt } => {
            writeln!(out, "\n{prompt}")?;
            let text = state.notes(id).unwrap_or_default();
            if !text.is_empty() {
                writeln!(out, "  {text}")?;
            }
        }
        Block::Submit { id, label, message } => {
            if state.is_submitted(id) {
                writeln!(out, "[{label}] {message}")?;
            } else {
                writeln!(out, "[{label}]")?;
            }
        }
    }
    Ok(())
}

fn render_chart(out: &mut String, chart: &Chart) -> fmt::Result {
    writeln!(out, "\n{} ({})", chart.title, chart_kind_label(chart.chart))?;
    if let Some(label) = &chart.y_label {
        writeln!(out, "  {label}")?;
    }
    let label_width = chart
        .data
        .iter()
        .map(|point| point.label.chars().count())
        .max()
        .unwrap_or(0);
    match chart.chart {
        ChartKind::Pie => {
            for (label, share) in chart.shares() {
                writeln!(
                    out,
                    "  {label:<label_width$} {} {share:.1}%",
                    bar(share, 100.0)
                )?;
            }
        }
        ChartKind::Bar | ChartKind::Line => {
            let max = chart.max_value();
            for point in &chart.data {
                writeln!(
                    out,
                    "  {:<label_width$} {} {}",
                    point.label,
                    bar(point.value, max),
                    format_value(point.value)
                )?;
            }
        }
    }
    Ok(())
}

pub fn chart_kind_label(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "bar chart",
        ChartKind::Pie => "pie chart",
        ChartKind::Line => "line chart",
    }
}

/// Whole numbers print without a fractional part.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "#".repeat(filled.min(BAR_WIDTH))
}

//! TUI UI Rendering
//!
//! Renders the sidebar, the current page and its charts using ratatui.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType,
        List, ListItem, ListState, Paragraph, Wrap,
    },
    Frame,
};

use codepath_core::deck::{Block as DeckBlock, Chart as DeckChart, ChartKind};
use codepath_core::relevance::{Assessment, Band};

use crate::plain::{chart_kind_label, format_value};
use crate::tui::app::{App, Control};

const SIDEBAR_WIDTH: u16 = 26;
const CHART_HEIGHT: u16 = 12;
const CHARTS_PER_ROW: usize = 3;
const MAX_TRACK_STEPS: i128 = 20;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, app, main_layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(main_layout[1]);
    render_sidebar(frame, app, body[0]);
    render_page(frame, app, body[1]);

    render_footer(frame, app, main_layout[2]);
}

/// Renders the deck title and session clock
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        app.deck.title.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(subtitle) = &app.deck.subtitle {
        spans.push(Span::styled(
            format!("  {subtitle}"),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(
                " Page {}/{} ",
                app.current_page + 1,
                app.page_count()
            ))
            .title(
                Line::from(format!(" {} ", app.session_duration())).alignment(Alignment::Right),
            ),
    );
    frame.render_widget(header, area);
}

/// Renders the page list used for navigation
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .deck
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| {
            let style = if index == app.current_page {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Line::from(Span::styled(
                format!("{} {}", index + 1, page.title),
                style,
            )))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.current_page));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Navigation "),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state);
}

/// Renders the current page: text and inputs, then the relevance gauge and charts
fn render_page(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.page();
    let charts: Vec<&DeckChart> = page.charts().collect();
    let assessment = page.blocks.iter().find_map(|block| match block {
        DeckBlock::Relevance { id, .. } => Some(app.state.assessment(&app.deck, id)),
        _ => None,
    });

    let chart_rows = charts.len().div_ceil(CHARTS_PER_ROW) as u16;
    let mut constraints = vec![Constraint::Min(5)];
    if assessment.is_some() {
        constraints.push(Constraint::Length(3));
    }
    if chart_rows > 0 {
        constraints.push(Constraint::Length(chart_rows * CHART_HEIGHT));
    }
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let (lines, focused_line) = page_lines(app);
    let visible = layout[0].height.saturating_sub(2);
    let scroll = match focused_line {
        Some(line) if line as u16 >= visible => line as u16 + 1 - visible,
        Some(_) => 0,
        None => app.scroll,
    };
    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", page.title)),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(body, layout[0]);

    let mut rest = layout.iter().skip(1);
    if let Some(result) = assessment {
        if let Some(gauge_area) = rest.next() {
            render_relevance_gauge(frame, result, *gauge_area);
        }
    }
    if let Some(chart_area) = rest.next() {
        render_charts(frame, &charts, *chart_area);
    }
}

/// Builds the text of the current page and the line index of the focused input
fn page_lines(app: &App) -> (Vec<Line<'static>>, Option<usize>) {
    let focused = if app.controls().is_empty() {
        None
    } else {
        app.focused_control()
    };
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut focused_line = None;

    let mut push_control = |lines: &mut Vec<Line<'static>>, control: Control, text: String| {
        let is_focused = focused.as_ref() == Some(&control);
        if is_focused {
            focused_line = Some(lines.len());
        }
        let style = if is_focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
        } else {
            Style::default()
        };
        let marker = if is_focused { "> " } else { "  " };
        lines.push(Line::from(Span::styled(format!("{marker}{text}"), style)));
    };

    for block in &app.page().blocks {
        match block {
            DeckBlock::Header { text } => {
                lines.push(Line::from(Span::styled(
                    text.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::default());
            }
            DeckBlock::Subheader { text } => {
                lines.push(Line::from(Span::styled(
                    text.clone(),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
                )));
                lines.push(Line::default());
            }
            DeckBlock::Text { text } => {
                lines.push(Line::from(text.clone()));
                lines.push(Line::default());
            }
            DeckBlock::Bullets { items } => {
                for item in items {
                    lines.push(Line::from(format!("  • {item}")));
                }
                lines.push(Line::default());
            }
            DeckBlock::Expander { title, body } => {
                lines.push(Line::from(Span::styled(
                    format!("▾ {title}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in body {
                    lines.push(Line::from(format!("    - {line}")));
                }
                lines.push(Line::default());
            }
            DeckBlock::Checklist { id, prompt, items } | DeckBlock::Relevance { id, prompt, statements: items } => {
                lines.push(prompt_line(prompt));
                for statement in items {
                    let checked = app
                        .state
                        .responses(id)
                        .is_some_and(|responses| responses.is_checked(statement));
                    let mark = if checked { "[x]" } else { "[ ]" };
                    push_control(
                        &mut lines,
                        Control::Check {
                            block: id.clone(),
                            statement: statement.clone(),
                        },
                        format!("{mark} {statement}"),
                    );
                }
                if matches!(block, DeckBlock::Checklist { .. }) {
                    let selected = app.state.selected(&app.deck, id).map(|s| s.len()).unwrap_or(0);
                    lines.push(Line::from(Span::styled(
                        format!("  Selected: {selected} of {}", items.len()),
                        Style::default().fg(Color::Gray),
                    )));
                }
                lines.push(Line::default());
            }
            DeckBlock::Sliders { id, prompt, min, max, items, .. } => {
                lines.push(prompt_line(prompt));
                for item in items {
                    let value = app.state.slider(id, item).map(|s| s.value).unwrap_or(*min);
                    push_control(
                        &mut lines,
                        Control::Slider {
                            block: id.clone(),
                            item: item.clone(),
                        },
                        format!("{} {value}  {item}", slider_track(value, *min, *max)),
                    );
                }
                lines.push(Line::default());
            }
            DeckBlock::Rating { id, prompt, min, max, .. } => {
                lines.push(prompt_line(prompt));
                let value = app.state.rating(id).map(|s| s.value).unwrap_or(*min);
                push_control(
                    &mut lines,
                    Control::Rating { block: id.clone() },
                    format!("{} {value}/{max}", slider_track(value, *min, *max)),
                );
                lines.push(Line::default());
            }
            DeckBlock::Notes { id, prompt } => {
                lines.push(prompt_line(prompt));
                let text = app.state.notes(id).unwrap_or_default();
                let cursor = if app.editing && focused == Some(Control::Notes { block: id.clone() }) {
                    "█"
                } else {
                    ""
                };
                push_control(
                    &mut lines,
                    Control::Notes { block: id.clone() },
                    format!("✎ {text}{cursor}"),
                );
                lines.push(Line::default());
            }
            DeckBlock::Submit { id, label, message } => {
                push_control(
                    &mut lines,
                    Control::Submit { block: id.clone() },
                    format!("[ {label} ]"),
                );
                if app.state.is_submitted(id) {
                    lines.push(Line::from(Span::styled(
                        format!("  {message}"),
                        Style::default().fg(Color::Green),
                    )));
                }
                lines.push(Line::default());
            }
            DeckBlock::Chart(_) => {}
        }
    }

    (lines, focused_line)
}

fn prompt_line(prompt: &str) -> Line<'static> {
    Line::from(Span::styled(
        prompt.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// One cell per step for short ranges, scaled to `MAX_TRACK_STEPS` beyond that.
fn slider_track(value: i64, min: i64, max: i64) -> String {
    let range = (i128::from(max) - i128::from(min)).max(0);
    let offset = (i128::from(value) - i128::from(min)).clamp(0, range);
    let steps = range.clamp(1, MAX_TRACK_STEPS);
    let position = if range == 0 {
        0
    } else {
        (offset * steps + range / 2) / range
    };
    let mut track = String::with_capacity(steps as usize * 3 + 4);
    track.push('[');
    for step in 0..=steps {
        track.push(if step == position { '●' } else { '─' });
    }
    track.push(']');
    track
}

/// Renders the relevance score gauge with its band message
fn render_relevance_gauge(
    frame: &mut Frame,
    result: Result<Assessment, codepath_core::CodePathError>,
    area: Rect,
) {
    match result {
        Ok(assessment) => {
            let color = band_color(assessment.band);
            let prefix = if assessment.band.is_warning() { "⚠ " } else { "" };
            let gauge = Gauge::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {prefix}{} ", assessment.message))
                        .border_style(Style::default().fg(color)),
                )
                .gauge_style(Style::default().fg(color))
                .ratio((assessment.score.value() / 100.0).clamp(0.0, 1.0))
                .label(format!(
                    "Relevance: {} ({}/{})",
                    assessment.score, assessment.checked, assessment.total
                ));
            frame.render_widget(gauge, area);
        }
        Err(err) => {
            let message = Paragraph::new(err.to_string())
                .block(Block::default().borders(Borders::ALL).title(" Relevance "))
                .style(Style::default().fg(Color::Red));
            frame.render_widget(message, area);
        }
    }
}

/// Lays charts out in rows and renders each one
fn render_charts(frame: &mut Frame, charts: &[&DeckChart], area: Rect) {
    let rows: Vec<&[&DeckChart]> = charts.chunks(CHARTS_PER_ROW).collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CHART_HEIGHT); rows.len()])
        .split(area);

    for (row, row_area) in rows.iter().zip(row_areas.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, row.len() as u32); row.len()])
            .split(*row_area);
        for (chart, cell) in row.iter().zip(cells.iter()) {
            match chart.chart {
                ChartKind::Bar => render_bar_chart(frame, chart, *cell),
                ChartKind::Pie => render_share_chart(frame, chart, *cell),
                ChartKind::Line => render_line_chart(frame, chart, *cell),
            }
        }
    }
}

fn chart_block(chart: &DeckChart) -> Block<'static> {
    let title = match &chart.y_label {
        Some(label) => format!(" {} ({label}) ", chart.title),
        None => format!(" {} ", chart.title),
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_bottom(Line::from(format!(" {} ", chart_kind_label(chart.chart))).alignment(Alignment::Right))
}

fn render_bar_chart(frame: &mut Frame, chart: &DeckChart, area: Rect) {
    let bars: Vec<Bar> = chart
        .data
        .iter()
        .enumerate()
        .map(|(index, point)| {
            Bar::default()
                .value(point.value.round() as u64)
                .label(Line::from(point.label.clone()))
                .text_value(format_value(point.value))
                .style(Style::default().fg(palette(index)))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2);
    let count = bars.len().max(1) as u16;
    let bar_width = (inner_width / count).saturating_sub(1).max(1);

    let widget = BarChart::default()
        .block(chart_block(chart))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars))
        .max(chart.max_value().ceil() as u64);
    frame.render_widget(widget, area);
}

/// Pie charts become horizontal bars of each slice's share
fn render_share_chart(frame: &mut Frame, chart: &DeckChart, area: Rect) {
    let bars: Vec<Bar> = chart
        .shares()
        .into_iter()
        .enumerate()
        .map(|(index, (label, share))| {
            Bar::default()
                .value(share.round() as u64)
                .label(Line::from(label))
                .text_value(format!("{share:.1}%"))
                .style(Style::default().fg(palette(index)))
        })
        .collect();

    let widget = BarChart::default()
        .block(chart_block(chart))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars))
        .max(100);
    frame.render_widget(widget, area);
}

fn render_line_chart(frame: &mut Frame, chart: &DeckChart, area: Rect) {
    let points: Vec<(f64, f64)> = chart
        .data
        .iter()
        .enumerate()
        .map(|(index, point)| (index as f64, point.value))
        .collect();
    let max = chart.max_value().max(1.0);
    let last = points.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];

    let x_labels: Vec<Span> = match (chart.data.first(), chart.data.last()) {
        (Some(first), Some(last_point)) => vec![
            Span::raw(first.label.clone()),
            Span::raw(last_point.label.clone()),
        ],
        _ => Vec::new(),
    };

    let widget = Chart::new(datasets)
        .block(chart_block(chart))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, last])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, max])
                .labels(vec![Span::raw("0"), Span::raw(format_value(max))]),
        );
    frame.render_widget(widget, area);
}

/// Renders the footer with help text
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.editing {
        "Type your text | Backspace:Delete | Enter/Esc:Done"
    } else if app
        .focused_control()
        .is_some_and(|control| control.is_adjustable())
    {
        "Tab/PgDn:Next | Shift+Tab/PgUp:Prev | 1-9:Page | ↑↓:Focus | ←→:Adjust | Q:Quit"
    } else {
        "Tab/PgDn:Next | Shift+Tab/PgUp:Prev | 1-9:Page | ↑↓:Focus | Space:Toggle | ←→:Page | Q:Quit"
    };
    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}

/// Helper function to get color for a relevance band
fn band_color(band: Band) -> Color {
    match band {
        Band::Positive => Color::Green,
        Band::Neutral => Color::Yellow,
        Band::Negative => Color::Red,
    }
}

fn palette(index: usize) -> Color {
    const COLORS: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::Yellow,
    ];
    COLORS[index % COLORS.len()]
}

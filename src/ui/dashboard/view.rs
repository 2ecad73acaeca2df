use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::stats::{self, StatusCount};
use crate::task::{format_time, Priority, Status, Task};

use super::app::{AppState, DeleteConfirmState, StatusKind, StatusPickerState, Tab};
use super::form::AddForm;

const ID_WIDTH: usize = 5;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER: Color = Color::Rgb(92, 126, 166);

pub fn render(frame: &mut Frame, app: &AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_tabs(frame, app, chunks[0]);
    match app.tab {
        Tab::Tasks => render_tasks(frame, app, chunks[1]),
        Tab::Dashboard => render_dashboard(frame, app, chunks[1]),
        Tab::Weekly => render_weekly(frame, app, chunks[1]),
    }
    render_footer(frame, app, chunks[2]);

    if let Some(form) = app.form.as_ref() {
        render_form_modal(frame, area, form);
    }
    if let Some(picker) = app.status_picker.as_ref() {
        render_status_modal(frame, area, picker);
    }
    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, state);
    }
}

fn render_tabs(frame: &mut Frame, app: &AppState, area: Rect) {
    let mut spans = Vec::new();
    for (idx, tab) in Tab::ALL.into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", Style::default().fg(COLOR_MUTED_DARK)));
        }
        let style = if tab == app.tab {
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(COLOR_MUTED)
        };
        spans.push(Span::styled(tab.title(), style));
    }

    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_tasks(frame: &mut Frame, app: &AppState, area: Rect) {
    let title = format!("Tasks for {} ({})", app.date_label(), app.day_tasks.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(COLOR_BORDER))
        .title(title);

    if app.day_tasks.is_empty() {
        render_placeholder(frame, area, block, "No tasks scheduled for this day. Press a to add one.");
        return;
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let (start, end) = list_window(app.day_tasks.len(), app.selected, inner_height);
    let lines: Vec<Line<'static>> = app.day_tasks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, task)| task_row(task, app.selected == Some(start + offset)))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn task_row(task: &Task, selected: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format_time(task.scheduled_time),
            Style::default().fg(COLOR_INFO),
        ),
        Span::raw(" "),
        Span::styled(
            pad_text(&format!("#{}", task.id), ID_WIDTH),
            Style::default().fg(COLOR_MUTED_DARK),
        ),
        Span::styled(
            pad_text(task.status.as_str(), 12),
            status_style(task.status).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            pad_text(task.priority.as_str(), 7),
            Style::default().fg(priority_color(task.priority)),
        ),
        Span::styled(
            pad_text(task.category.as_str(), 9),
            Style::default().fg(COLOR_MUTED),
        ),
        Span::styled(task.description.clone(), Style::default().fg(COLOR_TEXT)),
    ];
    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn render_dashboard(frame: &mut Frame, app: &AppState, area: Rect) {
    let board = &app.dashboard;
    if board.total == 0 {
        let block = Block::default().borders(Borders::ALL).title("Dashboard");
        render_placeholder(frame, area, block, "No tasks recorded yet.");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
        .split(area);

    let title = format!(
        "Status distribution ({} tasks: {})",
        board.total,
        stats::format_status_counts(&board.status_counts)
    );
    let status_group = BarGroup::default().bars(&status_bars(&board.status_counts));
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(12)
        .bar_gap(2)
        .data(status_group);
    frame.render_widget(chart, chunks[0]);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tasks by category and status"),
        )
        .bar_width(4)
        .bar_gap(1)
        .group_gap(3);
    for row in &board.category_by_status.rows {
        let group = BarGroup::default()
            .label(Line::from(row.category.as_str()))
            .bars(&status_bars(&row.counts));
        chart = chart.data(group);
    }
    frame.render_widget(chart, chunks[1]);
}

fn render_weekly(frame: &mut Frame, app: &AppState, area: Rect) {
    let weekly = &app.weekly;
    let title = format!(
        "Weekly summary {} .. {}  completed: {}",
        weekly.start, weekly.end, weekly.completed_total
    );
    if weekly.days.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(title);
        let message = format!("No tasks in the last {} days.", app.window_days());
        render_placeholder(frame, area, block, &message);
        return;
    }

    let mut chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(3)
        .bar_gap(1)
        .group_gap(2);
    let mut idx = 0;
    while idx < weekly.days.len() {
        let date = weekly.days[idx].date;
        let mut counts = Vec::new();
        while idx < weekly.days.len() && weekly.days[idx].date == date {
            counts.push(StatusCount {
                status: weekly.days[idx].status,
                count: weekly.days[idx].count,
            });
            idx += 1;
        }
        let group = BarGroup::default()
            .label(Line::from(date.format("%m-%d").to_string()))
            .bars(&status_bars(&counts));
        chart = chart.data(group);
    }
    frame.render_widget(chart, area);
}

fn status_bars(counts: &[StatusCount]) -> Vec<Bar<'static>> {
    counts
        .iter()
        .map(|entry| {
            Bar::default()
                .value(entry.count as u64)
                .label(Line::from(short_status(entry.status)))
                .style(status_style(entry.status))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(status_color(entry.status))
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect()
}

fn render_placeholder(frame: &mut Frame, area: Rect, block: Block<'_>, message: &str) {
    let widget = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(COLOR_WARNING),
    )))
    .alignment(Alignment::Center)
    .block(block)
    .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = Span::styled(app.footer_hint(), Style::default().fg(COLOR_INFO));
    let status = match app.status_line() {
        Some((message, StatusKind::Error)) => Line::from(Span::styled(
            message,
            Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        )),
        Some((message, StatusKind::Info)) => {
            Line::from(Span::styled(message, Style::default().fg(COLOR_WARNING)))
        }
        None => Line::from(Span::styled(
            format!(
                "total: {}  {}",
                app.dashboard.total,
                stats::format_status_counts(&app.dashboard.status_counts)
            ),
            Style::default().fg(COLOR_ACCENT),
        )),
    };
    let widget = Paragraph::new(vec![Line::from(hint), status])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER)),
        );
    frame.render_widget(widget, area);
}

fn render_form_modal(frame: &mut Frame, area: Rect, form: &AddForm) {
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 12u16.min(area.height.saturating_sub(2));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let active = form.active_field();
    let mut lines: Vec<Line<'static>> = Vec::new();
    for (id, value) in form.fields() {
        let is_active = id == active;
        let label_style = if is_active {
            Style::default().fg(COLOR_ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED_DARK)
        };
        let value_text = match (id.is_choice(), is_active) {
            (true, true) => format!("< {value} >"),
            (false, true) => format!("{value}_"),
            _ => value,
        };
        lines.push(Line::from(vec![
            Span::styled(pad_text(&format!("{}:", id.label()), 13), label_style),
            Span::styled(value_text, Style::default().fg(COLOR_TEXT)),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(error) = form.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(COLOR_ERROR).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(
        "enter add  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("New Task"))
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, modal);
}

fn render_status_modal(frame: &mut Frame, area: Rect, picker: &StatusPickerState) {
    let content_width = 26u16.min(area.width.saturating_sub(6));
    let height = (Status::ALL.len() as u16 + 4).min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (idx, status) in Status::ALL.into_iter().enumerate() {
        let mut span = Span::styled(
            status.as_str(),
            status_style(status).add_modifier(Modifier::BOLD),
        );
        if idx == picker.selected {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(span));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter apply  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let title = format!("Status #{}", picker.task_id);
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, state: &DeleteConfirmState) {
    let content_width = area.width.saturating_sub(8).min(64);
    let height = 8u16.min(area.height.saturating_sub(6).max(7));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let description_width = (content_width as usize).saturating_sub(16);
    let lines = vec![
        Line::from(Span::styled(
            "Delete task?",
            Style::default().fg(COLOR_ERROR).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(state.task_id.to_string(), Style::default().fg(COLOR_ACCENT)),
        ]),
        Line::from(vec![
            Span::styled("Description: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(
                truncate_text(&state.description, description_width),
                Style::default().fg(COLOR_TEXT),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "y/enter confirm  esc/n cancel",
            Style::default().fg(COLOR_MUTED_DARK),
        )),
    ];

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Visible slice `[start, end)` that keeps the selection on screen.
fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if height == 0 || total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0).min(total - 1);
    let start = selected.saturating_sub(height - 1);
    (start, (start + height).min(total))
}

fn short_status(status: Status) -> &'static str {
    match status {
        Status::Pending => "Pend",
        Status::InProgress => "Prog",
        Status::Completed => "Done",
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => COLOR_WARNING,
        Status::InProgress => COLOR_INFO,
        Status::Completed => COLOR_SUCCESS,
    }
}

fn status_style(status: Status) -> Style {
    Style::default().fg(status_color(status))
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => COLOR_ERROR,
        Priority::Medium => COLOR_WARNING,
        Priority::Low => COLOR_MUTED,
    }
}

fn pad_text(value: &str, width: usize) -> String {
    format!("{value:<width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return value.chars().take(max).collect();
    }
    let mut out: String = value.chars().take(max - 3).collect();
    out.push_str("...");
    out
}

use std::cmp::min;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::Task;
use crate::view;

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn format_opt_date(value: Option<&NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn format_opt_time(value: Option<&NaiveTime>) -> String {
    value.map(|t| t.format("%H:%M").to_string()).unwrap_or_default()
}

pub fn format_opt_datetime(value: Option<&NaiveDateTime>) -> String {
    value
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Schedule column text: date span plus times when present.
pub fn format_schedule(task: &Task) -> String {
    let mut parts = Vec::new();
    match (task.start_date, task.end_date) {
        (Some(start), Some(end)) if start != end => {
            parts.push(format!("{} → {}", start, end));
        }
        (_, Some(end)) => parts.push(end.to_string()),
        (Some(start), None) => parts.push(start.to_string()),
        (None, None) => {}
    }
    match (task.start_time, task.end_time) {
        (Some(start), Some(end)) => {
            parts.push(format!("{}–{}", start.format("%H:%M"), end.format("%H:%M")));
        }
        (Some(start), None) => parts.push(start.format("%H:%M").to_string()),
        (None, Some(end)) => parts.push(format!("until {}", end.format("%H:%M"))),
        (None, None) => {}
    }
    parts.join(" ")
}

pub fn format_task_detail_entries(task: &Task, today: NaiveDate) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    entries.push((String::from("Title"), task.title.clone()));
    entries.push((String::from("ID"), task.id.to_string()));

    let mut state = if task.completed { "completed" } else { "pending" }.to_string();
    if view::is_overdue(task, today) {
        state.push_str(" (overdue)");
    }
    entries.push((String::from("State"), state));

    if let Some(category) = task.category {
        entries.push((String::from("Category"), category.to_string()));
    }
    let start = format_opt_date(task.start_date.as_ref());
    if !start.is_empty() {
        entries.push((String::from("Start"), start));
    }
    let due = format_opt_date(task.end_date.as_ref());
    if !due.is_empty() {
        entries.push((String::from("Due"), due));
    }
    let start_time = format_opt_time(task.start_time.as_ref());
    if !start_time.is_empty() {
        entries.push((String::from("Start time"), start_time));
    }
    let end_time = format_opt_time(task.end_time.as_ref());
    if !end_time.is_empty() {
        entries.push((String::from("End time"), end_time));
    }
    entries.push((
        String::from("Created"),
        format_opt_datetime(Some(&task.created_at)),
    ));
    let updated = format_opt_datetime(task.updated_at.as_ref());
    if !updated.is_empty() {
        entries.push((String::from("Updated"), updated));
    }

    if let Some(description) = &task.description {
        if !description.trim().is_empty() {
            entries.push((String::from("Description"), description.clone()));
        }
    }

    entries
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab / Shift+Tab", "Switch period views"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Home / End", "Jump to first / last task"),
        ("q", "Quit"),
        ("Enter", "Toggle task detail overlay"),
        ("h", "Toggle this help overlay"),
        ("a", "Add a new task"),
        ("e", "Edit selected task"),
        ("d / Space", "Toggle completion"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("r", "Refresh from the server"),
        ("Esc", "Cancel/close overlays"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}

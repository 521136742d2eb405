use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;

use crate::model::{Category, Task, TaskDraft};

use super::buffer::FieldBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Title,
    Description,
    StartDate,
    EndDate,
    StartTime,
    EndTime,
    Category,
}

impl FormField {
    pub(crate) const ALL: [FormField; 7] = [
        FormField::Title,
        FormField::Description,
        FormField::StartDate,
        FormField::EndDate,
        FormField::StartTime,
        FormField::EndTime,
        FormField::Category,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::StartDate => "Start date",
            FormField::EndDate => "Due date",
            FormField::StartTime => "Start time",
            FormField::EndTime => "End time",
            FormField::Category => "Category",
        }
    }

    pub(crate) fn hint(self) -> &'static str {
        match self {
            FormField::Title => "required",
            FormField::Description => "optional",
            FormField::StartDate | FormField::EndDate => "YYYY-MM-DD",
            FormField::StartTime | FormField::EndTime => "HH:MM",
            FormField::Category => "Space/←/→ to cycle",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub(crate) fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let idx = self.index();
        if idx == 0 {
            Self::ALL[Self::ALL.len() - 1]
        } else {
            Self::ALL[idx - 1]
        }
    }
}

impl Default for FormField {
    fn default() -> Self {
        FormField::Title
    }
}

/// Editable add/edit overlay state. Buffers hold raw text until submit,
/// when `parse` turns them into a validated draft.
#[derive(Debug, Clone, Default)]
pub(crate) struct TaskForm {
    pub(crate) editing: Option<i64>,
    pub(crate) title: FieldBuffer,
    pub(crate) description: FieldBuffer,
    pub(crate) start_date: FieldBuffer,
    pub(crate) end_date: FieldBuffer,
    pub(crate) start_time: FieldBuffer,
    pub(crate) end_time: FieldBuffer,
    pub(crate) category: Option<Category>,
    pub(crate) field: FormField,
}

impl TaskForm {
    pub(crate) fn blank() -> Self {
        Self::default()
    }

    pub(crate) fn for_task(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            title: FieldBuffer::with_text(task.title.clone()),
            description: FieldBuffer::with_text(task.description.clone().unwrap_or_default()),
            start_date: FieldBuffer::with_text(
                task.start_date.map(|d| d.to_string()).unwrap_or_default(),
            ),
            end_date: FieldBuffer::with_text(
                task.end_date.map(|d| d.to_string()).unwrap_or_default(),
            ),
            start_time: FieldBuffer::with_text(
                task.start_time
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_default(),
            ),
            end_time: FieldBuffer::with_text(
                task.end_time
                    .map(|t| t.format("%H:%M").to_string())
                    .unwrap_or_default(),
            ),
            category: task.category,
            field: FormField::Title,
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub(crate) fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub(crate) fn prev_field(&mut self) {
        self.field = self.field.prev();
    }

    pub(crate) fn active_buffer_mut(&mut self) -> Option<&mut FieldBuffer> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::StartDate => Some(&mut self.start_date),
            FormField::EndDate => Some(&mut self.end_date),
            FormField::StartTime => Some(&mut self.start_time),
            FormField::EndTime => Some(&mut self.end_time),
            FormField::Category => None,
        }
    }

    pub(crate) fn field_text(&self, field: FormField) -> String {
        match field {
            FormField::Title => self.title.as_str().to_string(),
            FormField::Description => self.description.as_str().to_string(),
            FormField::StartDate => self.start_date.as_str().to_string(),
            FormField::EndDate => self.end_date.as_str().to_string(),
            FormField::StartTime => self.start_time.as_str().to_string(),
            FormField::EndTime => self.end_time.as_str().to_string(),
            FormField::Category => self
                .category
                .map(|c| c.to_string())
                .unwrap_or_else(|| String::from("none")),
        }
    }

    pub(crate) fn cycle_category(&mut self, forward: bool) {
        let variants = Category::value_variants();
        let position = self
            .category
            .and_then(|current| variants.iter().position(|v| *v == current));
        self.category = if forward {
            match position {
                None => variants.first().copied(),
                Some(idx) if idx + 1 < variants.len() => Some(variants[idx + 1]),
                Some(_) => None,
            }
        } else {
            match position {
                None => variants.last().copied(),
                Some(0) => None,
                Some(idx) => Some(variants[idx - 1]),
            }
        };
    }

    /// Build a draft from the buffers. Field-level format errors come back
    /// as a message for the status line; draft validation happens later.
    pub(crate) fn parse(&self) -> Result<TaskDraft, String> {
        let draft = TaskDraft {
            title: self.title.as_str().trim().to_string(),
            description: opt_text(self.description.as_str()),
            start_date: parse_date(self.start_date.as_str(), "start date")?,
            end_date: parse_date(self.end_date.as_str(), "due date")?,
            start_time: parse_time(self.start_time.as_str(), "start time")?,
            end_time: parse_time(self.end_time.as_str(), "end time")?,
            category: self.category,
        };
        Ok(draft)
    }
}

fn opt_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_date(raw: &str, label: &str) -> Result<Option<NaiveDate>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| format!("Invalid {} '{}': expected YYYY-MM-DD", label, trimmed))
}

fn parse_time(raw: &str, label: &str) -> Result<Option<NaiveTime>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(Some)
        .map_err(|_| format!("Invalid {} '{}': expected HH:MM", label, trimmed))
}

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Listing window understood by the task store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "today" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(anyhow!("Unknown period '{}': expected day|week|month", other)),
        }
    }
}

impl ValueEnum for Period {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [Period; 3] = [Period::Day, Period::Week, Period::Month];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Closed category set accepted by the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Education,
    Hobby,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Education => "education",
            Category::Hobby => "hobby",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "health" => Ok(Category::Health),
            "education" => Ok(Category::Education),
            "hobby" => Ok(Category::Hobby),
            "other" => Ok(Category::Other),
            other => Err(anyhow!(
                "Unknown category '{}': expected work|personal|health|education|hobby|other",
                other
            )),
        }
    }
}

impl ValueEnum for Category {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [Category; 6] = [
            Category::Work,
            Category::Personal,
            Category::Health,
            Category::Education,
            Category::Hobby,
            Category::Other,
        ];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Server-confirmed task record. The store assigns `id` and `created_at`;
/// the client never fabricates either.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub category: Option<Category>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    pub user_id: i64,
}

/// Create payload: a task the store has not confirmed yet.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl TaskDraft {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Mirror of the store's own validators so obviously bad input fails
    /// before a round-trip.
    pub fn validate(&self) -> ApiResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("Task title cannot be empty".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ApiError::Validation(format!(
                "Task title cannot exceed {} characters",
                MAX_TITLE_LEN
            )));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(ApiError::Validation(format!(
                    "Description cannot exceed {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ApiError::Validation(
                    "End date cannot be before start date".into(),
                ));
            }
            if start == end {
                if let (Some(start_time), Some(end_time)) = (self.start_time, self.end_time) {
                    if end_time <= start_time {
                        return Err(ApiError::Validation(
                            "End time must be after start time".into(),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            start_time: task.start_time,
            end_time: task.end_time,
            category: task.category,
        }
    }
}

/// Partial update payload; fields left as `None` never reach the wire.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<TaskDraft> for TaskPatch {
    fn from(draft: TaskDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: draft.description,
            start_date: draft.start_date,
            end_date: draft.end_date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            category: draft.category,
            completed: None,
        }
    }
}

/// List-request filters. Everything is optional; absent fields are omitted
/// from the query string entirely, never sent as empty values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilters {
    pub period: Option<Period>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
    pub search: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl TaskFilters {
    pub fn for_period(period: Period) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(period) = self.period {
            pairs.push(("period", period.as_str().to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.as_str().to_string()));
        }
        if let Some(completed) = self.completed {
            pairs.push(("completed", completed.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

/// Envelope the list endpoints wrap task sequences in.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Server-computed aggregate counters from `/tasks/stats`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct StatsReport {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    pub overdue: u64,
    pub today: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn period_round_trips_through_strings() {
        for period in [Period::Day, Period::Week, Period::Month] {
            assert_eq!(period.as_str().parse::<Period>().unwrap(), period);
        }
        assert!("fortnight".parse::<Period>().is_err());
    }

    #[test]
    fn category_parses_ignoring_case() {
        assert_eq!("Work".parse::<Category>().unwrap(), Category::Work);
        assert!("chores".parse::<Category>().is_err());
    }

    #[test]
    fn query_pairs_skip_absent_filters() {
        let filters = TaskFilters::for_period(Period::Week);
        assert_eq!(filters.query_pairs(), vec![("period", "week".to_string())]);

        let empty = TaskFilters::default();
        assert!(empty.query_pairs().is_empty());
    }

    #[test]
    fn query_pairs_include_every_set_filter() {
        let filters = TaskFilters {
            period: Some(Period::Day),
            category: Some(Category::Health),
            completed: Some(false),
            search: Some("gym".into()),
            skip: Some(10),
            limit: Some(50),
        };
        let pairs = filters.query_pairs();
        assert_eq!(pairs.len(), 6);
        assert!(pairs.contains(&("completed", "false".to_string())));
        assert!(pairs.contains(&("search", "gym".to_string())));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn draft_rejects_blank_titles(#[case] title: &str) {
        let draft = TaskDraft::new(title);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_rejects_overlong_title() {
        let draft = TaskDraft::new("x".repeat(MAX_TITLE_LEN + 1));
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_rejects_inverted_dates() {
        let draft = TaskDraft {
            title: "Plan trip".into(),
            start_date: Some(date("2024-03-10")),
            end_date: Some(date("2024-03-09")),
            ..TaskDraft::default()
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn draft_checks_times_only_on_single_day_tasks() {
        let mut draft = TaskDraft {
            title: "Standup".into(),
            start_date: Some(date("2024-03-10")),
            end_date: Some(date("2024-03-10")),
            start_time: Some(time("10:00")),
            end_time: Some(time("09:00")),
            ..TaskDraft::default()
        };
        assert!(draft.validate().is_err());

        // Spread over two days the same clock times are fine.
        draft.end_date = Some(date("2024-03-11"));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_serializes_without_absent_fields() {
        let draft = TaskDraft::new("Water plants");
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Water plants" }));
    }

    #[test]
    fn patch_from_draft_replaces_all_editable_fields() {
        let draft = TaskDraft {
            title: "Read".into(),
            category: Some(Category::Hobby),
            ..TaskDraft::default()
        };
        let patch = TaskPatch::from(draft);
        assert_eq!(patch.title.as_deref(), Some("Read"));
        assert_eq!(patch.category, Some(Category::Hobby));
        assert_eq!(patch.completed, None);
        assert!(!patch.is_empty());
    }

    #[test]
    fn task_deserializes_store_payload() {
        let task: Task = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "Dentist",
                "description": null,
                "start_date": "2024-05-02",
                "end_date": "2024-05-02",
                "start_time": "09:30:00",
                "end_time": "10:00:00",
                "category": "health",
                "completed": false,
                "created_at": "2024-04-28T12:00:00",
                "updated_at": null,
                "user_id": 3
            }"#,
        )
        .unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.category, Some(Category::Health));
        assert_eq!(task.start_time, Some(time("09:30")));
    }
}

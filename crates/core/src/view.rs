//! Pure derivations over the current task collection: display order,
//! overdue/today predicates, and the aggregate counters shown above the
//! list. Deterministic given identical input; `today` is always passed in.

use std::cmp::Ordering;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::model::Task;

/// Current calendar day used by the interactive surfaces.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Display comparator: incomplete before completed; within a partition
/// ascending by start date when both sides have one, otherwise ascending by
/// creation timestamp (which also breaks start-date ties).
pub fn display_cmp(a: &Task, b: &Task) -> Ordering {
    match (a.completed, b.completed) {
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    if let (Some(a_start), Some(b_start)) = (a.start_date, b.start_date) {
        if a_start != b_start {
            return a_start.cmp(&b_start);
        }
    }
    a.created_at.cmp(&b.created_at)
}

/// Stable sort into display order.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(display_cmp);
}

/// A task is overdue iff its end date is strictly before today and it is
/// not completed. Time of day is ignored.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    !task.completed && task.end_date.is_some_and(|end| end < today)
}

/// A task belongs to "today" iff either of its dates lands on it.
pub fn is_today(task: &Task, today: NaiveDate) -> bool {
    task.start_date == Some(today) || task.end_date == Some(today)
}

/// Counters recomputed from the collection on every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl Stats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let overdue = tasks.iter().filter(|task| is_overdue(task, today)).count();
        Self {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn task(id: i64, completed: bool, start: Option<&str>, created: &str) -> Task {
        Task {
            id,
            title: format!("task {}", id),
            description: None,
            start_date: start.map(|s| s.parse().unwrap()),
            end_date: None,
            start_time: None,
            end_time: None,
            category: None,
            completed,
            created_at: created.parse::<NaiveDateTime>().unwrap(),
            updated_at: None,
            user_id: 1,
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn incomplete_tasks_sort_before_completed_then_by_start_date() {
        let a = task(1, false, Some("2024-01-02"), "2024-01-01T09:00:00");
        let b = task(2, false, Some("2024-01-01"), "2024-01-01T10:00:00");
        let c = task(3, true, Some("2024-01-01"), "2024-01-01T11:00:00");

        let mut tasks = vec![a, b, c];
        sort_for_display(&mut tasks);

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn creation_order_breaks_ties_and_covers_missing_dates() {
        let early = task(1, false, None, "2024-01-01T09:00:00");
        let late = task(2, false, None, "2024-01-02T09:00:00");
        let dated = task(3, false, Some("2024-01-05"), "2024-01-03T09:00:00");

        // `dated` has a start date but its peers do not, so creation
        // timestamps decide throughout.
        let mut tasks = vec![dated.clone(), late.clone(), early.clone()];
        sort_for_display(&mut tasks);
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn overdue_requires_past_end_date_and_pending_state() {
        let today = day("2024-06-15");
        let mut task = task(1, false, None, "2024-06-01T09:00:00");
        task.end_date = Some(day("2024-06-14"));
        assert!(is_overdue(&task, today));

        task.completed = true;
        assert!(!is_overdue(&task, today));

        task.completed = false;
        task.end_date = Some(today);
        assert!(!is_overdue(&task, today));
    }

    #[test]
    fn today_matches_either_date() {
        let today = day("2024-06-15");
        let mut entry = task(1, false, Some("2024-06-15"), "2024-06-01T09:00:00");
        assert!(is_today(&entry, today));

        entry.start_date = None;
        entry.end_date = Some(today);
        assert!(is_today(&entry, today));

        entry.end_date = Some(day("2024-06-16"));
        assert!(!is_today(&entry, today));
    }

    #[test]
    fn stats_balance_pending_against_completed() {
        let today = day("2024-06-15");
        let mut overdue = task(1, false, None, "2024-06-01T09:00:00");
        overdue.end_date = Some(day("2024-06-10"));
        let done = task(2, true, None, "2024-06-01T10:00:00");
        let open = task(3, false, None, "2024-06-01T11:00:00");

        let stats = Stats::compute(&[overdue, done, open], today);
        assert_eq!(
            stats,
            Stats {
                total: 3,
                completed: 1,
                pending: 2,
                overdue: 1,
            }
        );
        assert_eq!(stats.pending + stats.completed, stats.total);
    }
}

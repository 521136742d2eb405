use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;
use tokio::runtime::{Builder, Runtime};

use super::constants::*;
use super::form::TaskForm;
use crate::config::AppConfig;
use crate::core::{ApiClient, ApiError, ApiResult, TaskBoard};
use crate::model::{Period, Task, TaskFilters, TaskPatch, User};
use crate::view;

mod input;
mod render;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
struct PeriodTab {
    label: &'static str,
    period: Option<Period>,
    description: &'static str,
}

impl PeriodTab {
    fn new(label: &'static str, period: Option<Period>, description: &'static str) -> Self {
        Self {
            label,
            period,
            description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Form,
    Inspect,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    config: AppConfig,
    api: ApiClient,
    runtime: Runtime,
    user: User,
    tabs: Vec<PeriodTab>,
    tab_index: usize,
    board: TaskBoard,
    visible: Vec<Task>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    form: Option<TaskForm>,
    inspect_task: Option<Task>,
    confirm_choice: ConfirmChoice,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig, api: ApiClient, user: User) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;

        let tabs = vec![
            PeriodTab::new("🗂 All", None, "All tasks"),
            PeriodTab::new("📆 Today", Some(Period::Day), "Due today"),
            PeriodTab::new("🗓 Week", Some(Period::Week), "This week"),
            PeriodTab::new("📅 Month", Some(Period::Month), "This month"),
        ];

        let mut app = Self {
            config,
            api,
            runtime,
            user,
            tabs,
            tab_index: 0,
            board: TaskBoard::new(),
            visible: Vec::new(),
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            form: None,
            inspect_task: None,
            confirm_choice: ConfirmChoice::No,
            status: None,
            should_quit: false,
        };
        app.refresh();
        Ok(app)
    }

    fn current_period(&self) -> Option<Period> {
        self.tabs.get(self.tab_index).and_then(|tab| tab.period)
    }

    fn current_filters(&self) -> TaskFilters {
        match self.current_period() {
            Some(period) => TaskFilters::for_period(period),
            None => TaskFilters::default(),
        }
    }

    pub(crate) fn refresh(&mut self) {
        let filters = self.current_filters();
        let result = self
            .runtime
            .block_on(self.board.load(&self.api, &filters));
        if self.report(result).is_none() {
            return;
        }
        self.rebuild_view();
    }

    /// Re-derive the display order from the board and clamp the selection.
    fn rebuild_view(&mut self) {
        self.visible = self.board.tasks().to_vec();
        view::sort_for_display(&mut self.visible);

        if self.visible.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= self.visible.len() {
                self.selected = self.visible.len() - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    /// Surface an API failure on the status line. Session expiry shuts the
    /// dashboard down since every further call would fail the same way.
    fn report<T>(&mut self, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(ApiError::SessionExpired) => {
                self.set_status_error(STATUS_SESSION_EXPIRED);
                self.should_quit = true;
                None
            }
            Err(err) => {
                self.set_status_error(err.to_string());
                None
            }
        }
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > Duration::from_secs(5) {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn selected_task(&self) -> Option<&Task> {
        self.visible.get(self.selected)
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.visible.len() - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.table_state.select(Some(self.selected));
    }

    fn select_task_by_id(&mut self, id: i64) {
        if let Some((idx, _)) = self
            .visible
            .iter()
            .enumerate()
            .find(|(_, task)| task.id == id)
        {
            self.selected = idx;
            self.table_state.select(Some(idx));
        }
    }

    fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % self.tabs.len();
        self.refresh();
    }

    fn prev_tab(&mut self) {
        if self.tab_index == 0 {
            self.tab_index = self.tabs.len() - 1;
        } else {
            self.tab_index -= 1;
        }
        self.refresh();
    }

    fn open_add_form(&mut self) {
        self.form = Some(TaskForm::blank());
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_ENTER_ADD);
    }

    fn open_edit_form(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_info("Nothing to edit");
            return;
        };
        self.form = Some(TaskForm::for_task(&task));
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_ENTER_EDIT);
    }

    fn cancel_form(&mut self) {
        self.form = None;
        self.input_mode = InputMode::Normal;
        self.status = None;
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            self.input_mode = InputMode::Normal;
            return;
        };

        let draft = match form.parse() {
            Ok(draft) => draft,
            Err(message) => {
                self.set_status_error(message);
                return;
            }
        };
        if let Err(err) = draft.validate() {
            self.set_status_error(err.to_string());
            return;
        }

        match form.editing {
            Some(id) => {
                let patch = TaskPatch::from(draft);
                let result = self
                    .runtime
                    .block_on(self.board.update(&self.api, id, &patch));
                if let Some(task) = self.report(result) {
                    self.rebuild_view();
                    self.select_task_by_id(task.id);
                    self.set_status_info(format!("Updated task: {}", task.title));
                    self.form = None;
                    self.input_mode = InputMode::Normal;
                }
            }
            None => {
                let result = self.runtime.block_on(self.board.create(&self.api, &draft));
                if let Some(task) = self.report(result) {
                    self.rebuild_view();
                    self.select_task_by_id(task.id);
                    self.set_status_info(format!("Added task: {}", task.title));
                    self.form = None;
                    self.input_mode = InputMode::Normal;
                }
            }
        }
    }

    fn toggle_current(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id) else {
            self.set_status_info("Nothing to toggle");
            return;
        };
        let result = self.runtime.block_on(self.board.toggle(&self.api, id));
        if let Some(task) = self.report(result) {
            let state = if task.completed { "completed" } else { "pending" };
            self.set_status_info(format!("Task '{}' is now {}", task.title, state));
            self.rebuild_view();
            self.select_task_by_id(id);
        }
    }

    fn prompt_delete(&mut self) {
        if self.visible.is_empty() {
            self.set_status_info("Nothing to delete");
            return;
        }
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmDelete;
        self.set_status_info(STATUS_CONFIRM_DELETE);
    }

    fn perform_delete(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_info("Nothing to delete");
            return;
        };
        let result = self.runtime.block_on(self.board.remove(&self.api, task.id));
        if self.report(result).is_some() {
            self.set_status_info(format!("Deleted '{}'", task.title));
            self.rebuild_view();
        }
    }

    fn show_selected_details(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_info("Nothing to inspect");
            return;
        };
        self.inspect_task = Some(task);
        self.input_mode = InputMode::Inspect;
        self.set_status_info(STATUS_VIEW_DETAILS);
    }

    fn show_help_overlay(&mut self) {
        self.inspect_task = None;
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}

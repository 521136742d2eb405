use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{value_parser, Args, Parser, Subcommand};

use crate::model::{Category, Period, TaskDraft, TaskPatch};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "daydash",
    version,
    about = "Terminal client for the daydash personal task dashboard.",
    after_help = "Examples:\n  daydash                      Launch the dashboard (same as `daydash tui`)\n  daydash login ada@example.com\n  daydash list --period week\n  daydash add \"Buy milk\" --end 2024-06-01\n  daydash delete 42 --yes"
)]
pub struct Cli {
    /// Override the API base URL (defaults to http://localhost:8000/api)
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Override the data directory holding the saved session
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter for diagnostics (e.g. "info", "daydash_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal dashboard (default command)
    Tui,
    /// Log in and persist the session token
    Login(LoginArgs),
    /// Register a new account, then log in
    Register(RegisterArgs),
    /// Forget the persisted session
    Logout,
    /// Show who the saved session belongs to
    Whoami,
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Create a task
    Add(AddArgs),
    /// Change fields on an existing task
    Edit(EditArgs),
    /// Flip a task between pending and completed
    Toggle(ToggleArgs),
    /// Delete one or more tasks (asks for confirmation first)
    Delete(DeleteArgs),
    /// Show the store's aggregate task counters
    Stats(StatsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(value_name = "EMAIL")]
    pub email: String,

    /// Password (prompted for when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Display name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Account email
    #[arg(value_name = "EMAIL")]
    pub email: String,

    /// Password (prompted for twice when omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Restrict to a period window (day, week, month)
    #[arg(long, value_enum)]
    pub period: Option<Period>,

    /// Restrict to one category
    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Restrict by completion state (true/false)
    #[arg(long)]
    pub completed: Option<bool>,

    /// Full-text search over title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Records to skip (server-side paging)
    #[arg(long, value_parser = value_parser!(u32))]
    pub skip: Option<u32>,

    /// Maximum records to return
    #[arg(long, value_parser = value_parser!(u32))]
    pub limit: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(value_name = "TITLE", required = true)]
    pub title: Vec<String>,

    /// Optional longer description
    #[arg(long)]
    pub description: Option<String>,

    /// Start date (ISO, e.g. 2024-06-01)
    #[arg(long = "start", value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// End date (ISO)
    #[arg(long = "end", value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    /// Start time of day (HH:MM)
    #[arg(long = "start-time", value_name = "TIME", value_parser = parse_time_arg)]
    pub start_time: Option<NaiveTime>,

    /// End time of day (HH:MM)
    #[arg(long = "end-time", value_name = "TIME", value_parser = parse_time_arg)]
    pub end_time: Option<NaiveTime>,

    /// Category tag
    #[arg(long, value_enum)]
    pub category: Option<Category>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Id of the task to change
    #[arg(value_name = "ID")]
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "start", value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    #[arg(long = "end", value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    #[arg(long = "start-time", value_name = "TIME", value_parser = parse_time_arg)]
    pub start_time: Option<NaiveTime>,

    #[arg(long = "end-time", value_name = "TIME", value_parser = parse_time_arg)]
    pub end_time: Option<NaiveTime>,

    #[arg(long, value_enum)]
    pub category: Option<Category>,

    /// Set completion state directly
    #[arg(long)]
    pub completed: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct ToggleArgs {
    /// Id of the task to flip
    #[arg(value_name = "ID")]
    pub id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// One or more task ids to delete
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<i64>,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Restrict the counters to a period window
    #[arg(long, value_enum)]
    pub period: Option<Period>,
}

fn parse_time_arg(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| format!("invalid time '{}': expected HH:MM", raw))
}

impl From<&AddArgs> for TaskDraft {
    fn from(args: &AddArgs) -> Self {
        TaskDraft {
            title: args.title.join(" "),
            description: args.description.clone(),
            start_date: args.start_date,
            end_date: args.end_date,
            start_time: args.start_time,
            end_time: args.end_time,
            category: args.category,
        }
    }
}

impl From<&EditArgs> for TaskPatch {
    fn from(args: &EditArgs) -> Self {
        TaskPatch {
            title: args.title.clone(),
            description: args.description.clone(),
            start_date: args.start_date,
            end_date: args.end_date,
            start_time: args.start_time,
            end_time: args.end_time,
            category: args.category,
            completed: args.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_args_join_title_words() {
        let cli = Cli::try_parse_from(["daydash", "add", "Buy", "milk", "--category", "personal"])
            .unwrap();
        let Some(CliCommand::Add(args)) = cli.command else {
            panic!("expected add command");
        };
        let draft = TaskDraft::from(&args);
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.category, Some(Category::Personal));
    }

    #[test]
    fn edit_args_map_to_a_sparse_patch() {
        let cli = Cli::try_parse_from(["daydash", "edit", "7", "--completed", "true"]).unwrap();
        let Some(CliCommand::Edit(args)) = cli.command else {
            panic!("expected edit command");
        };
        let patch = TaskPatch::from(&args);
        assert_eq!(patch.completed, Some(true));
        assert_eq!(patch.title, None);
        assert!(!patch.is_empty());
    }
}

use std::fmt;
use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use tokio::runtime::Builder;

use crate::cli::{
    AddArgs, CliCommand, DeleteArgs, EditArgs, ListArgs, LoginArgs, RegisterArgs, StatsArgs,
    ToggleArgs,
};
use crate::config::AppConfig;
use crate::core::{ApiClient, ApiError};
use crate::model::{TaskDraft, TaskFilters, TaskPatch};
use crate::view;

/// Install a tracing subscriber for the given filter directive.
pub fn init_tracing(directive: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log directive '{}'", directive))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {}", err))?;
    Ok(())
}

/// Run a one-shot command against the task store, writing human-readable
/// output to `writer`.
pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let api = ApiClient::new(config)?;
    runtime.block_on(run(&api, command, &mut writer))
}

async fn run<W: Write>(api: &ApiClient, command: CliCommand, writer: &mut W) -> Result<()> {
    match command {
        CliCommand::Login(args) => handle_login(api, &args, writer).await,
        CliCommand::Register(args) => handle_register(api, &args, writer).await,
        CliCommand::Logout => handle_logout(api, writer),
        CliCommand::Whoami => handle_whoami(api, writer),
        CliCommand::List(args) => handle_list(api, &args, writer).await,
        CliCommand::Add(args) => handle_add(api, &args, writer).await,
        CliCommand::Edit(args) => handle_edit(api, &args, writer).await,
        CliCommand::Toggle(args) => handle_toggle(api, &args, writer).await,
        CliCommand::Delete(args) => handle_delete(api, &args, writer).await,
        CliCommand::Stats(args) => handle_stats(api, &args, writer).await,
        CliCommand::Tui => Err(anyhow!("launch the dashboard directly")),
    }
}

async fn handle_login<W: Write>(api: &ApiClient, args: &LoginArgs, writer: &mut W) -> Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => prompt_line("Password: ")?,
    };
    let session = api.login(&args.email, &password).await?;
    writeln!(
        writer,
        "Logged in as {} <{}>",
        session.user.name, session.user.email
    )?;
    Ok(())
}

async fn handle_register<W: Write>(
    api: &ApiClient,
    args: &RegisterArgs,
    writer: &mut W,
) -> Result<()> {
    let password = match &args.password {
        Some(password) => password.clone(),
        None => {
            let first = prompt_line("Password: ")?;
            let second = prompt_line("Repeat password: ")?;
            if first != second {
                bail!("passwords do not match");
            }
            first
        }
    };
    let session = api.register(&args.name, &args.email, &password).await?;
    writeln!(
        writer,
        "Registered and logged in as {} <{}>",
        session.user.name, session.user.email
    )?;
    Ok(())
}

fn handle_logout<W: Write>(api: &ApiClient, writer: &mut W) -> Result<()> {
    api.logout()?;
    writeln!(writer, "Logged out")?;
    Ok(())
}

fn handle_whoami<W: Write>(api: &ApiClient, writer: &mut W) -> Result<()> {
    match api.saved_session()? {
        Some(session) => writeln!(
            writer,
            "{} <{}> (user id {})",
            session.user.name, session.user.email, session.user.id
        )?,
        None => writeln!(writer, "Not logged in (run `daydash login <email>`)")?,
    }
    Ok(())
}

async fn handle_list<W: Write>(api: &ApiClient, args: &ListArgs, writer: &mut W) -> Result<()> {
    let filters = TaskFilters {
        period: args.period,
        category: args.category,
        completed: args.completed,
        search: args.search.clone(),
        skip: args.skip,
        limit: args.limit,
    };
    let page = api.list_tasks(&filters).await?;
    let mut tasks = page.tasks;
    view::sort_for_display(&mut tasks);

    let today = view::local_today();
    for task in &tasks {
        writeln!(writer, "{}", TaskLine::new(task, today))?;
    }
    let stats = view::Stats::compute(&tasks, today);
    writeln!(
        writer,
        "{} task{}: {} pending, {} completed, {} overdue",
        stats.total,
        if stats.total == 1 { "" } else { "s" },
        stats.pending,
        stats.completed,
        stats.overdue
    )?;
    Ok(())
}

async fn handle_add<W: Write>(api: &ApiClient, args: &AddArgs, writer: &mut W) -> Result<()> {
    let draft = TaskDraft::from(args);
    draft.validate()?;
    let task = api.create_task(&draft).await?;
    writeln!(writer, "Created task {}: {}", task.id, task.title)?;
    Ok(())
}

async fn handle_edit<W: Write>(api: &ApiClient, args: &EditArgs, writer: &mut W) -> Result<()> {
    let patch = TaskPatch::from(args);
    if patch.is_empty() {
        bail!("nothing to update; pass at least one field flag");
    }
    let task = api.update_task(args.id, &patch).await?;
    writeln!(writer, "Updated task {}: {}", task.id, task.title)?;
    Ok(())
}

async fn handle_toggle<W: Write>(api: &ApiClient, args: &ToggleArgs, writer: &mut W) -> Result<()> {
    let task = api.toggle_completion(args.id).await?;
    let state = if task.completed { "completed" } else { "pending" };
    writeln!(writer, "Task {} is now {}", task.id, state)?;
    Ok(())
}

async fn handle_delete<W: Write>(api: &ApiClient, args: &DeleteArgs, writer: &mut W) -> Result<()> {
    if !args.yes && !confirm_deletion(args.ids.len())? {
        writeln!(writer, "Aborted")?;
        return Ok(());
    }

    let mut summary = DeleteSummary::default();
    for &id in &args.ids {
        match api.delete_task(id).await {
            Ok(()) => summary.deleted += 1,
            Err(ApiError::Request { status: 404, .. }) => summary.missing.push(id),
            Err(err) => return Err(err.into()),
        }
    }
    summary.write_to(writer)?;
    Ok(())
}

async fn handle_stats<W: Write>(api: &ApiClient, args: &StatsArgs, writer: &mut W) -> Result<()> {
    let report = api.stats(args.period).await?;
    let scope = args
        .period
        .map(|period| format!(" ({})", period))
        .unwrap_or_default();
    writeln!(writer, "Tasks{}", scope)?;
    writeln!(writer, "  total:     {}", report.total)?;
    writeln!(writer, "  pending:   {}", report.pending)?;
    writeln!(writer, "  completed: {}", report.completed)?;
    writeln!(writer, "  overdue:   {}", report.overdue)?;
    writeln!(writer, "  today:     {}", report.today)?;
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm_deletion(count: usize) -> Result<bool> {
    let answer = prompt_line(&format!(
        "Delete {} task{}? This cannot be undone. [y/N] ",
        count,
        if count == 1 { "" } else { "s" }
    ))?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

struct TaskLine<'a> {
    task: &'a crate::model::Task,
    today: chrono::NaiveDate,
}

impl<'a> TaskLine<'a> {
    fn new(task: &'a crate::model::Task, today: chrono::NaiveDate) -> Self {
        Self { task, today }
    }
}

impl fmt::Display for TaskLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.task.completed { "x" } else { " " };
        write!(f, "[{}] {:>4}  {}", mark, self.task.id, self.task.title)?;
        if let Some(end) = self.task.end_date {
            write!(f, "  due {}", end)?;
        }
        if let Some(category) = self.task.category {
            write!(f,"  #{}", category)?;
        }
        if view::is_overdue(self.task, self.today) {
            write!(f, "  (overdue)")?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct DeleteSummary {
    deleted: usize,
    missing: Vec<i64>,
}

impl DeleteSummary {
    fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.deleted > 0 {
            writeln!(
                writer,
                "Deleted {} task{}",
                self.deleted,
                if self.deleted == 1 { "" } else { "s" }
            )?;
        } else {
            writeln!(writer, "No tasks deleted")?;
        }
        if !self.missing.is_empty() {
            let ids: Vec<String> = self.missing.iter().map(|id| id.to_string()).collect();
            writeln!(writer, "Not found: {}", ids.join(", "))?;
        }
        Ok(())
    }
}

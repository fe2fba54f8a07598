//! Taskboard command-line client.
//!
//! Lists, shows and edits tasks on a running task server. Edits go through
//! the same edit session as an interactive front end: the form is filled
//! from the stored task, the given changes are applied, and the result is
//! validated before anything is sent.
//!
//! ```bash
//! taskboard list
//! taskboard show 1
//! taskboard edit 1 --title "Book venue" --status in-progress --tag venue
//!
//! # Against another server
//! TASKBOARD_URL=http://tasks.internal:3000 taskboard list
//! ```

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::api::{ClientError, HttpTaskApi, TaskApi};
use taskboard::config::{CliArgs, ClientConfig};
use taskboard::edit::tags::TagKey;
use taskboard::edit::{ClickTarget, EditSession, SubmitOutcome};
use taskboard_proto::task::{Task, TaskId};

#[derive(Parser, Debug)]
#[command(version, about = "Taskboard command-line client")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List every task.
    List,
    /// Show one task.
    Show {
        /// Task id.
        id: String,
    },
    /// Edit one task. Options left out keep their current value.
    Edit(EditArgs),
}

#[derive(clap::Args, Debug)]
struct EditArgs {
    /// Task id.
    id: String,
    /// New title.
    #[arg(long)]
    title: Option<String>,
    /// New description.
    #[arg(long)]
    description: Option<String>,
    /// New priority (low, medium, high).
    #[arg(long)]
    priority: Option<String>,
    /// New status (pending, in-progress, completed).
    #[arg(long)]
    status: Option<String>,
    /// New due date (YYYY-MM-DD).
    #[arg(long)]
    due_date: Option<String>,
    /// Tag to add; repeatable.
    #[arg(long = "tag")]
    add_tags: Vec<String>,
    /// Tag to remove; repeatable.
    #[arg(long = "remove-tag")]
    remove_tags: Vec<String>,
    /// Remove every existing tag before adding new ones.
    #[arg(long)]
    clear_tags: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ClientConfig::load(&cli.args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&cli.args.log_level, cli.args.log_file.as_deref());

    match run(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "request failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing to stderr, or to `file_path` when given.
///
/// Returns the appender guard when logging to a file; it must be held
/// until exit so buffered lines are flushed. A path with no usable
/// directory or file name falls back to stderr.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if let Some((log_dir, file_name)) = file_path.and_then(log_file_target) {
        let file_appender = tracing_appender::rolling::never(log_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .with_writer(non_blocking)
            .with_env_filter(env_filter)
            .with_ansi(false)
            .init();
        return Some(guard);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();
    if let Some(path) = file_path {
        tracing::warn!(path = %path.display(), "cannot log to this file, logging to stderr");
    }
    None
}

/// Splits a log file path into the directory and file name the appender
/// needs. A bare file name logs to the current directory.
fn log_file_target(path: &Path) -> Option<(&Path, &str)> {
    let file_name = path.file_name()?.to_str()?;
    let dir = match path.parent()? {
        dir if dir.as_os_str().is_empty() => Path::new("."),
        dir => dir,
    };
    Some((dir, file_name))
}

async fn run(command: Command, config: &ClientConfig) -> Result<ExitCode, ClientError> {
    let api = HttpTaskApi::new(&config.server_url, config.timeout)?;
    tracing::debug!(url = %api.base_url(), "using task server");

    match command {
        Command::List => {
            for task in api.list_tasks().await? {
                println!("{}", summary_line(&task));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Show { id } => {
            print_task(&api.fetch_task(&parse_id(&id)).await?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Edit(args) => edit(api, args).await,
    }
}

/// Drives an edit session the way a user would: open, edit, change, save.
async fn edit(api: HttpTaskApi, args: EditArgs) -> Result<ExitCode, ClientError> {
    let mut session = EditSession::new(api);
    session.open_by_id(&parse_id(&args.id)).await?;
    session.click_edit().await;

    let form = session.form_mut();
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(priority) = args.priority {
        form.priority = priority;
    }
    if let Some(status) = args.status {
        form.status = status;
    }
    if let Some(due_date) = args.due_date {
        form.due_date = due_date;
    }

    if args.clear_tags {
        while !session.tags().tags().is_empty() {
            session.tag_key(TagKey::Backspace);
        }
    }
    for tag in &args.remove_tags {
        match session.tags().tags().iter().position(|t| t == tag) {
            Some(index) => session.click_tag_area(ClickTarget::RemovePill(index)),
            None => tracing::warn!(tag = %tag, "tag to remove is not on the task"),
        }
    }
    for tag in args.add_tags {
        session.tags_mut().set_input(tag);
        session.tag_key(TagKey::Enter);
    }

    let outcome = session
        .click_edit()
        .await
        .unwrap_or(SubmitOutcome::NoSelection);
    match outcome {
        SubmitOutcome::Saved { message } => {
            println!("{message}");
            if let Some(task) = session.task() {
                print_task(task);
            }
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Invalid(e) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Failed { message } => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::NoSelection => Ok(ExitCode::FAILURE),
    }
}

/// Numeric ids are sent as numbers, everything else as text.
fn parse_id(raw: &str) -> TaskId {
    raw.parse::<i64>()
        .map_or_else(|_| TaskId::from(raw), TaskId::from)
}

fn summary_line(task: &Task) -> String {
    format!(
        "{:>6}  {:<11}  {:<6}  {}",
        task.id.to_string(),
        task.status.as_deref().unwrap_or("-"),
        task.priority.as_deref().unwrap_or("-"),
        task.title
    )
}

fn print_task(task: &Task) {
    println!("#{} {}", task.id, task.title);
    println!("  status:   {}", task.status.as_deref().unwrap_or("-"));
    println!("  priority: {}", task.priority.as_deref().unwrap_or("-"));
    println!("  due:      {}", task.due_date.as_deref().unwrap_or("-"));
    println!("  tags:     {}", task.tags.join(", "));
    match &task.created_at {
        Some(Value::String(created)) => println!("  created:  {created}"),
        Some(created) if !created.is_null() => println!("  created:  {created}"),
        _ => {}
    }
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }
}

//! `TaskFlow` — in-memory task and category manager.
//!
//! Each invocation seeds the stores from fixture data, loads the board
//! through the intent dispatcher, runs one subcommand and exits. Nothing is
//! persisted between runs.
//!
//! ```bash
//! # List everything (the default)
//! cargo run --bin taskflow
//!
//! # Active high-priority tasks mentioning "release"
//! cargo run --bin taskflow -- list --search release --priority high --status active
//!
//! # Today's counters, without the simulated delay
//! cargo run --bin taskflow -- summary --latency-min-ms 0 --latency-max-ms 0
//! ```

use std::path::Path;
use std::process::ExitCode;

use chrono::{DateTime, Local};
use clap::Parser;
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskflow::board::{Board, BoardError, NoticeLevel};
use taskflow::config::{AddArgs, AddCategoryArgs, AppConfig, CliArgs, Command, ListArgs};
use taskflow::dispatch::{self, Intent, Outcome};
use taskflow::store::Stores;
use taskflow::view::FilterState;
use taskflow_model::{CategoryDraft, CategoryId, FixtureError, TaskDraft, TaskId};

/// Errors that end a run early.
#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("failed to load fixtures: {0}")]
    Fixture(#[from] FixtureError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dispatcher stopped unexpectedly")]
    DispatcherClosed,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_logging(&config.log_level, cli.log_file.as_deref());

    let command = cli
        .command
        .unwrap_or_else(|| Command::List(ListArgs::default()));
    tracing::debug!(?command, "taskflow starting");

    match run(command, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stderr, or to a file when `file_path` is given.
///
/// Returns a [`WorkerGuard`] for the file writer that must be held until
/// shutdown so buffered entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some(log_path) = file_path else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let log_dir = match log_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Channel ends plus the board they feed.
struct Session {
    board: Board,
    intent_tx: mpsc::Sender<Intent>,
    outcome_rx: mpsc::Receiver<Outcome>,
}

impl Session {
    /// Sends one intent and applies its outcome.
    async fn round_trip(&mut self, intent: Intent) -> Result<(), RunError> {
        self.intent_tx
            .send(intent)
            .await
            .map_err(|_| RunError::DispatcherClosed)?;
        let outcome = self
            .outcome_rx
            .recv()
            .await
            .ok_or(RunError::DispatcherClosed)?;
        self.board.apply(outcome);
        Ok(())
    }

    /// Stops the dispatcher and applies anything still in flight.
    async fn shutdown(&mut self) {
        if self.intent_tx.send(Intent::Shutdown).await.is_err() {
            tracing::debug!("dispatcher already stopped");
        }
        while let Some(outcome) = self.outcome_rx.recv().await {
            self.board.apply(outcome);
        }
    }
}

/// Runs one subcommand. Returns `Ok(false)` if an error notice was raised.
async fn run(command: Command, config: &AppConfig) -> Result<bool, RunError> {
    let stores = Stores::from_fixtures(config.fixture_source(), config.latency())?;
    let (intent_tx, outcome_rx) = dispatch::spawn_dispatcher(stores, config.channel_capacity);
    let mut session = Session {
        board: Board::new().with_max_notices(config.max_notices),
        intent_tx,
        outcome_rx,
    };

    session.round_trip(Intent::Load).await?;
    let now = Local::now();

    let result = match command {
        Command::List(args) => print_list(&mut session.board, args, &now),
        Command::Summary => {
            print_summary(&session.board, &now);
            Ok(())
        }
        Command::Categories => {
            print_categories(&session.board);
            Ok(())
        }
        Command::Add(args) => add_task(&mut session, args, &now).await,
        Command::Done { id } => toggle_task(&mut session, &TaskId::from(id), &now).await,
        Command::Delete { id } => delete_task(&mut session, TaskId::from(id), &now).await,
        Command::AddCategory(args) => add_category(&mut session, args).await,
    };

    session.shutdown().await;
    result?;

    let mut ok = true;
    for notice in session.board.take_notices() {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Error => {
                ok = false;
                eprintln!("{}", notice.message);
            }
        }
    }
    Ok(ok)
}

fn print_list(board: &mut Board, args: ListArgs, now: &DateTime<Local>) -> Result<(), RunError> {
    let mut filter = FilterState::new().with_status(args.status);
    if let Some(search) = args.search {
        filter = filter.with_search(search);
    }
    if let Some(category) = args.category {
        filter = filter.with_category(CategoryId::from(category));
    }
    if let Some(priority) = args.priority {
        filter = filter.with_priority(priority);
    }
    *board.filter_mut() = filter;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&board.visible_tasks())?);
        return Ok(());
    }

    let rows = board.visible_rows(now);
    if rows.is_empty() {
        if board.filter().is_active() {
            println!("No tasks match the current filters.");
        } else {
            println!("No tasks yet.");
        }
        return Ok(());
    }
    for row in rows {
        let check = if row.task.completed { "x" } else { " " };
        let category = row.category.map_or("-", |c| c.name.as_str());
        let badge = row.urgency.label().map_or_else(String::new, |l| format!(" [{l}]"));
        println!(
            "[{check}] {:<6} {:<32} {:<6} {category}{badge}",
            row.task.id.as_str(),
            row.task.title,
            row.task.priority.as_str()
        );
    }
    Ok(())
}

fn print_summary(board: &Board, now: &DateTime<Local>) {
    let summary = board.summary(now);
    println!("Due today: {}", summary.due_today);
    println!("Overdue:   {}", summary.overdue);
    println!("Completed: {}/{}", summary.completed, summary.total);
}

fn print_categories(board: &Board) {
    for count in board.category_counts() {
        println!(
            "{:<6} {:<16} {:<8} {}",
            count.category.id.as_str(),
            count.category.name,
            count.category.color,
            count.live_count
        );
    }
}

async fn add_task(
    session: &mut Session,
    args: AddArgs,
    now: &DateTime<Local>,
) -> Result<(), RunError> {
    let mut draft = TaskDraft::new(args.title);
    if let Some(description) = args.description {
        draft = draft.with_description(description);
    }
    if let Some(category) = args.category {
        draft = draft.with_category(CategoryId::from(category));
    }
    if let Some(priority) = args.priority {
        draft = draft.with_priority(priority);
    }
    if let Some(due) = args.due {
        draft = draft.with_due_date(due);
    }

    let intent = Board::create_task_intent(draft)?;
    session.round_trip(intent).await?;
    if let Some(task) = session.board.tasks().first() {
        tracing::info!(task_id = %task.id, "task added");
    }
    print_summary(&session.board, now);
    Ok(())
}

async fn toggle_task(
    session: &mut Session,
    id: &TaskId,
    now: &DateTime<Local>,
) -> Result<(), RunError> {
    let intent = session.board.toggle_intent(id, now.to_utc())?;
    session.round_trip(intent).await?;
    print_summary(&session.board, now);
    Ok(())
}

async fn delete_task(
    session: &mut Session,
    id: TaskId,
    now: &DateTime<Local>,
) -> Result<(), RunError> {
    session.round_trip(Intent::DeleteTask(id)).await?;
    print_summary(&session.board, now);
    Ok(())
}

async fn add_category(session: &mut Session, args: AddCategoryArgs) -> Result<(), RunError> {
    let mut draft = CategoryDraft::new(args.name);
    if let Some(color) = args.color {
        draft = draft.with_color(color);
    }

    let intent = Board::create_category_intent(draft)?;
    session.round_trip(intent).await?;
    if let Some(category) = session.board.categories().last() {
        tracing::info!(category_id = %category.id, "category added");
    }
    print_categories(&session.board);
    Ok(())
}

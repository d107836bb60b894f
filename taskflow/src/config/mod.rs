//! Configuration system for the `taskflow` binary.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskflow/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use taskflow_model::Priority;

use crate::board::DEFAULT_MAX_NOTICES;
use crate::dispatch::DEFAULT_CHANNEL_CAPACITY;
use crate::store::{FixtureSource, Latency};
use crate::view::StatusFilter;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    store: StoreFileConfig,
    board: BoardFileConfig,
}

/// `[store]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StoreFileConfig {
    latency_min_ms: Option<u64>,
    latency_max_ms: Option<u64>,
    tasks_fixture: Option<PathBuf>,
    categories_fixture: Option<PathBuf>,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    max_notices: Option<usize>,
    channel_capacity: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Lower bound of the simulated store delay.
    pub latency_min: Duration,
    /// Upper bound of the simulated store delay.
    pub latency_max: Duration,
    /// Task fixture file; `None` uses the built-in data.
    pub tasks_fixture: Option<PathBuf>,
    /// Category fixture file; `None` uses the built-in data.
    pub categories_fixture: Option<PathBuf>,
    /// Notices kept on the board.
    pub max_notices: usize,
    /// Capacity of the intent and outcome channels.
    pub channel_capacity: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            latency_min: Duration::from_millis(200),
            latency_max: Duration::from_millis(400),
            tasks_fixture: None,
            categories_fixture: None,
            max_notices: DEFAULT_MAX_NOTICES,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// Otherwise the default path is tried and a missing file is treated as
    /// empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            latency_min: cli
                .latency_min_ms
                .or(file.store.latency_min_ms)
                .map_or(defaults.latency_min, Duration::from_millis),
            latency_max: cli
                .latency_max_ms
                .or(file.store.latency_max_ms)
                .map_or(defaults.latency_max, Duration::from_millis),
            tasks_fixture: cli
                .tasks_fixture
                .clone()
                .or_else(|| file.store.tasks_fixture.clone()),
            categories_fixture: cli
                .categories_fixture
                .clone()
                .or_else(|| file.store.categories_fixture.clone()),
            max_notices: file.board.max_notices.unwrap_or(defaults.max_notices),
            channel_capacity: file
                .board
                .channel_capacity
                .unwrap_or(defaults.channel_capacity)
                .max(1),
            log_level: cli.log_level.clone(),
        }
    }

    /// The store delay described by this configuration.
    #[must_use]
    pub fn latency(&self) -> Latency {
        Latency::between(self.latency_min, self.latency_max)
    }

    /// Where the stores should be seeded from.
    #[must_use]
    pub fn fixture_source(&self) -> FixtureSource<'_> {
        FixtureSource {
            tasks: self.tasks_fixture.as_deref(),
            categories: self.categories_fixture.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "In-memory task and category manager")]
pub struct CliArgs {
    /// What to do. Defaults to `list`.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (default: `~/.config/taskflow/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Minimum simulated store delay in milliseconds.
    #[arg(long, global = true)]
    pub latency_min_ms: Option<u64>,

    /// Maximum simulated store delay in milliseconds.
    #[arg(long, global = true)]
    pub latency_max_ms: Option<u64>,

    /// JSON file to seed tasks from.
    #[arg(long, global = true, env = "TASKFLOW_TASKS")]
    pub tasks_fixture: Option<PathBuf>,

    /// JSON file to seed categories from.
    #[arg(long, global = true, env = "TASKFLOW_CATEGORIES")]
    pub categories_fixture: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info", env = "TASKFLOW_LOG")]
    pub log_level: String,

    /// Path to log file (default: stderr).
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// Subcommands.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List tasks, optionally filtered.
    List(ListArgs),
    /// Show today's counters.
    Summary,
    /// List categories with live task counts.
    Categories,
    /// Create a task.
    Add(AddArgs),
    /// Toggle a task between completed and active.
    Done {
        /// Id of the task.
        id: String,
    },
    /// Delete a task.
    Delete {
        /// Id of the task.
        id: String,
    },
    /// Create a category.
    AddCategory(AddCategoryArgs),
}

/// Filters for `list`.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Case-insensitive text to look for in title or description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only tasks in this category id.
    #[arg(long)]
    pub category: Option<String>,

    /// Only tasks with this priority (low, medium, high).
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Completion status (all, active, completed).
    #[arg(long, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Print the matching tasks as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Fields for `add`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Task title.
    pub title: String,

    /// Longer description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Category id to file the task under.
    #[arg(long)]
    pub category: Option<String>,

    /// Priority (low, medium, high).
    #[arg(short, long)]
    pub priority: Option<Priority>,

    /// Due date, as `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[arg(long, value_parser = parse_due_date)]
    pub due: Option<DateTime<Utc>>,
}

/// Fields for `add-category`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct AddCategoryArgs {
    /// Category name.
    pub name: String,

    /// Display color such as `#10B981` (default: `#5B4CFF`).
    #[arg(long)]
    pub color: Option<String>,
}

/// Parses a due date given on the command line.
///
/// A bare date means local midnight of that day.
///
/// # Errors
///
/// Returns a message if the text is neither an RFC 3339 timestamp nor a
/// `YYYY-MM-DD` date.
pub fn parse_due_date(text: &str) -> Result<DateTime<Utc>, String> {
    parse_due_date_in(text, &Local)
}

/// Parses a due date, reading a bare date as midnight in `tz`.
///
/// If midnight does not exist in `tz` (a DST gap) noon is used instead.
///
/// # Errors
///
/// Returns a message if the text is neither an RFC 3339 timestamp nor a
/// `YYYY-MM-DD` date.
pub fn parse_due_date_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| format!("invalid due date: {text} (expected YYYY-MM-DD or RFC 3339)"))?;
    [date.and_hms_opt(0, 0, 0), date.and_hms_opt(12, 0, 0)]
        .into_iter()
        .flatten()
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| format!("due date {text} does not exist in the local time zone"))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskflow").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

//! Command-line front end for Dailyflow.
//!
//! Usage:
//!
//! ```text
//! dailyflow [--config dailyflow.toml] [--store tasks.json] <command>
//! ```
//!
//! Tasks live in a JSON file; `prioritize` re-orders the open tasks with the
//! configured ranking oracle. Set `RUST_LOG` to adjust log verbosity.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dailyflow::config::{DailyflowConfig, OracleBackend};
use dailyflow::llm::OllamaClient;
use dailyflow::prioritization::{
    adapters::{DeadlineRankingOracle, OllamaRankingOracle},
    domain::RankingCandidate,
    ports::{RankingOracle, RankingOracleResult},
    services::{NothingToPrioritize, PrioritizationOutcome, PrioritizationService},
};
use dailyflow::suggestion::{adapters::OllamaTaskDetailSuggester, services::SuggestionService};
use dailyflow::task::{
    adapters::JsonFileTaskStore,
    domain::{EstimatedHours, NewTask, Task, TaskChanges, TaskId, TaskTitle},
    services::TaskLifecycleService,
};
use mockable::DefaultClock;
use std::io::{self, Write};
use std::sync::Arc;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "dailyflow", version, about = "Personal task manager")]
struct Cli {
    /// Configuration file.
    #[arg(long, global = true, default_value = "dailyflow.toml")]
    config: Utf8PathBuf,

    /// Task file, overriding the configured path.
    #[arg(long, global = true)]
    store: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a task.
    Add {
        /// Task title.
        title: String,
        /// Free-form description.
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Estimated hours.
        #[arg(long)]
        estimate: Option<String>,
        /// Label; repeat for several.
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// List tasks in priority order.
    List,
    /// Edit a task.
    Edit {
        /// Task identifier.
        id: String,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New due date (YYYY-MM-DD).
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        /// New estimated hours.
        #[arg(long)]
        estimate: Option<String>,
    },
    /// Toggle completion of a task.
    Complete {
        /// Task identifier.
        id: String,
    },
    /// Delete a task.
    Delete {
        /// Task identifier.
        id: String,
    },
    /// Re-order open tasks with the ranking oracle.
    Prioritize,
    /// Suggest labels and subtasks for a description.
    Suggest {
        /// Task description.
        description: String,
        /// Merge the suggestion into this task.
        #[arg(long)]
        apply: Option<String>,
    },
}

/// Ranking oracle chosen by configuration.
enum ConfiguredOracle {
    Deadline(DeadlineRankingOracle),
    Ollama(OllamaRankingOracle),
}

#[async_trait]
impl RankingOracle for ConfiguredOracle {
    async fn rank(&self, candidates: &[RankingCandidate]) -> RankingOracleResult<Vec<TaskId>> {
        match self {
            Self::Deadline(oracle) => oracle.rank(candidates).await,
            Self::Ollama(oracle) => oracle.rank(candidates).await,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();
    let cli = Cli::parse();
    let config = DailyflowConfig::load(&cli.config)?;
    let store_path = cli.store.unwrap_or_else(|| config.store.path.clone());
    let app = App {
        store: Arc::new(JsonFileTaskStore::open_path(&store_path)?),
        clock: Arc::new(DefaultClock),
        config,
    };
    let mut out = io::stdout().lock();
    app.run(cli.command, &mut out).await
}

/// Wiring shared by every command.
struct App {
    store: Arc<JsonFileTaskStore>,
    clock: Arc<DefaultClock>,
    config: DailyflowConfig,
}

impl App {
    fn tasks(&self) -> TaskLifecycleService<JsonFileTaskStore, DefaultClock> {
        TaskLifecycleService::new(Arc::clone(&self.store), Arc::clone(&self.clock))
    }

    fn ollama(&self) -> Arc<OllamaClient> {
        Arc::new(OllamaClient::new(self.config.oracle.ollama.clone()))
    }

    async fn run(&self, command: Command, out: &mut impl Write) -> Result<(), BoxError> {
        match command {
            Command::Add {
                title,
                description,
                due,
                estimate,
                labels,
            } => {
                let request = new_task_request(title, description, due, estimate, labels)?;
                let task = self.tasks().create(request).await?;
                writeln!(out, "added {}", task.id())?;
            }
            Command::List => {
                for task in self.tasks().list().await? {
                    write_task(out, &task)?;
                }
            }
            Command::Edit {
                id,
                title,
                description,
                due,
                clear_due,
                estimate,
            } => {
                let changes = TaskChanges {
                    title: title.map(TaskTitle::new).transpose()?,
                    description: description.map(Some),
                    due_date: if clear_due { Some(None) } else { due.map(Some) },
                    estimated_completion_time: estimate
                        .map(|value| EstimatedHours::new(value).map(Some))
                        .transpose()?,
                    ..TaskChanges::default()
                };
                let task = self.tasks().update(&TaskId::from_string(id)?, changes).await?;
                write_task(out, &task)?;
            }
            Command::Complete { id } => {
                let task = self.tasks().toggle_complete(&TaskId::from_string(id)?).await?;
                write_task(out, &task)?;
            }
            Command::Delete { id } => {
                let task = self.tasks().delete(&TaskId::from_string(id)?).await?;
                writeln!(out, "deleted {}", task.id())?;
            }
            Command::Prioritize => self.prioritize(out).await?,
            Command::Suggest { description, apply } => {
                self.suggest(&description, apply, out).await?;
            }
        }
        Ok(())
    }

    async fn prioritize(&self, out: &mut impl Write) -> Result<(), BoxError> {
        let oracle = match self.config.oracle.backend {
            OracleBackend::Deadline => ConfiguredOracle::Deadline(DeadlineRankingOracle::new()),
            OracleBackend::Ollama => {
                ConfiguredOracle::Ollama(OllamaRankingOracle::new(self.ollama()))
            }
        };
        let service = PrioritizationService::with_settings(
            Arc::clone(&self.store),
            Arc::new(oracle),
            Arc::clone(&self.clock),
            self.config.prioritization.to_settings()?,
        );
        match service.prioritize().await? {
            PrioritizationOutcome::NothingToPrioritize(NothingToPrioritize::NoTasks) => {
                writeln!(out, "no tasks; add some tasks before prioritizing")?;
            }
            PrioritizationOutcome::NothingToPrioritize(NothingToPrioritize::AllTasksCompleted) => {
                writeln!(out, "all tasks completed; no pending tasks to prioritize")?;
            }
            PrioritizationOutcome::Prioritized(summary) => {
                for task in &summary.tasks {
                    write_task(out, task)?;
                }
            }
        }
        Ok(())
    }

    async fn suggest(
        &self,
        description: &str,
        apply: Option<String>,
        out: &mut impl Write,
    ) -> Result<(), BoxError> {
        let service = SuggestionService::new(
            Arc::clone(&self.store),
            Arc::new(OllamaTaskDetailSuggester::new(self.ollama())),
            Arc::clone(&self.clock),
        );
        let suggestion = service.suggest(description).await?;
        writeln!(out, "labels: {}", suggestion.labels().join(", "))?;
        for subtask in suggestion.subtasks() {
            writeln!(out, "- {subtask}")?;
        }
        if let Some(id) = apply {
            let task = service
                .apply_to_task(&TaskId::from_string(id)?, &suggestion)
                .await?;
            write_task(out, &task)?;
        }
        Ok(())
    }
}

fn new_task_request(
    title: String,
    description: Option<String>,
    due: Option<NaiveDate>,
    estimate: Option<String>,
    labels: Vec<String>,
) -> Result<NewTask, BoxError> {
    let mut request = NewTask::new(TaskTitle::new(title)?).with_labels(labels);
    if let Some(text) = description {
        request = request.with_description(text);
    }
    if let Some(date) = due {
        request = request.with_due_date(date);
    }
    if let Some(hours) = estimate {
        request = request.with_estimated_completion_time(EstimatedHours::new(hours)?);
    }
    Ok(request)
}

fn write_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    let status = if task.is_completed() { "x" } else { " " };
    let priority = task
        .priority()
        .map_or_else(|| "-".to_owned(), |rank| rank.to_string());
    let due = task
        .due_date()
        .map_or_else(String::new, |date| format!(" due {date}"));
    writeln!(
        out,
        "[{status}] {priority:>3} {} {}{due}",
        task.id(),
        task.title()
    )
}

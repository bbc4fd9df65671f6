use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use taskflow_core::{MAX_NOTES_PER_TASK, Priority, SortOrder, StatusFilter, Task, TaskBoard, ViewOptions};
use taskflow_server::session::TaskSession;
use uuid::Uuid;

pub mod config {
    use serde::Deserialize;

    /// Settings for the command-line client, read from the environment.
    #[derive(Deserialize, Debug, Clone)]
    pub struct ClientConfig {
        pub db_url: String,
        #[serde(default)]
        pub enhancement_url: Option<String>,
        #[serde(default = "default_enhancement_timeout_secs")]
        pub enhancement_timeout_secs: u64,
    }

    impl ClientConfig {
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            Ok(settings.try_deserialize()?)
        }
    }

    fn default_enhancement_timeout_secs() -> u64 {
        10
    }
}

#[derive(Parser, Debug)]
#[command(name = "taskflow", about = "Manage TaskFlow tasks from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create a task
    Add {
        text: String,
        #[arg(short, long, value_enum)]
        priority: Option<PriorityArg>,
        /// Rewrite the title through the enhancement webhook first
        #[arg(short, long)]
        enhance: bool,
    },
    /// Show tasks
    List {
        #[arg(short, long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        #[arg(short, long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Case-insensitive match on task text and notes
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Flip a task between todo and completed
    Toggle { id: String },
    /// Replace a task's text
    Edit { id: String, text: String },
    Delete { id: String },
    #[command(subcommand)]
    Note(NoteCommands),
}

#[derive(Debug, Clone, Subcommand)]
pub enum NoteCommands {
    Add { task_id: String, content: String },
    Delete { note_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Todo,
    Completed,
}

impl From<FilterArg> for StatusFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => StatusFilter::All,
            FilterArg::Todo => StatusFilter::Todo,
            FilterArg::Completed => StatusFilter::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    Priority,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortOrder::Newest,
            SortArg::Oldest => SortOrder::Oldest,
            SortArg::Priority => SortOrder::Priority,
        }
    }
}

/// Resolves a full task ID or a unique prefix of one against the board.
pub fn resolve_task_id(board: &TaskBoard, input: &str) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    let input = input.to_ascii_lowercase();
    let mut matches = board
        .tasks()
        .iter()
        .filter(|task| task.id.to_string().starts_with(&input));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (None, _) => anyhow::bail!("No task matches '{}'", input),
        (Some(_), Some(_)) => anyhow::bail!("'{}' matches more than one task", input),
    }
}

/// Resolves a full note ID or a unique prefix of one against the board.
pub fn resolve_note_id(board: &TaskBoard, input: &str) -> anyhow::Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    let input = input.to_ascii_lowercase();
    let mut matches = board
        .tasks()
        .iter()
        .flat_map(|task| &task.notes)
        .filter(|note| note.id.to_string().starts_with(&input));
    match (matches.next(), matches.next()) {
        (Some(note), None) => Ok(note.id),
        (None, _) => anyhow::bail!("No note matches '{}'", input),
        (Some(_), Some(_)) => anyhow::bail!("'{}' matches more than one note", input),
    }
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Formats one task and its notes as terminal lines.
pub fn render_task(task: &Task) -> Vec<String> {
    let mark = if task.completed { "x" } else { " " };
    let mut lines = vec![format!(
        "[{}] {}  {:<6}  {}",
        mark,
        short_id(task.id),
        task.priority.as_str(),
        task.text
    )];
    lines.extend(
        task.notes
            .iter()
            .map(|note| format!("      - {}  {}", short_id(note.id), note.content)),
    );
    lines
}

/// Executes one command against the session, writing human-readable output.
pub async fn run(
    command: Commands,
    session: &mut TaskSession,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    session.refresh().await?;

    match command {
        Commands::Add {
            text,
            priority,
            enhance,
        } => {
            let task = session
                .add_task(&text, priority.map(Priority::from), enhance)
                .await?;
            writeln!(out, "Task added with ID {}", task.id)?;
            for line in render_task(&task) {
                writeln!(out, "{}", line)?;
            }
        }
        Commands::List {
            filter,
            sort,
            search,
        } => {
            let options = ViewOptions {
                filter: filter.into(),
                sort: sort.into(),
                search,
            };
            let visible = session.visible(&options);
            if visible.is_empty() {
                writeln!(out, "No tasks")?;
            }
            for task in visible {
                for line in render_task(task) {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        Commands::Toggle { id } => {
            let id = resolve_task_id(session.board(), &id)?;
            match session.toggle_task(id).await? {
                Some(true) => writeln!(out, "Task {} completed", id)?,
                Some(false) => writeln!(out, "Task {} reopened", id)?,
                None => writeln!(out, "Task {} not found", id)?,
            }
        }
        Commands::Edit { id, text } => {
            let id = resolve_task_id(session.board(), &id)?;
            session.edit_task(id, &text).await?;
            writeln!(out, "Task {} updated", id)?;
        }
        Commands::Delete { id } => {
            let id = resolve_task_id(session.board(), &id)?;
            if session.delete_task(id).await? {
                writeln!(out, "Task {} deleted", id)?;
            } else {
                writeln!(out, "Task {} not found", id)?;
            }
        }
        Commands::Note(NoteCommands::Add { task_id, content }) => {
            let task_id = resolve_task_id(session.board(), &task_id)?;
            if session.board().get(task_id).is_none() {
                anyhow::bail!("Task {} not found", task_id);
            }
            if !session.board().can_add_note(task_id) {
                anyhow::bail!(
                    "Task {} already has {} notes",
                    task_id,
                    MAX_NOTES_PER_TASK
                );
            }
            let note = session.add_note(task_id, &content).await?;
            writeln!(out, "Note added with ID {}", note.id)?;
        }
        Commands::Note(NoteCommands::Delete { note_id }) => {
            let note_id = resolve_note_id(session.board(), &note_id)?;
            session.delete_note(note_id).await?;
            writeln!(out, "Note {} deleted", note_id)?;
        }
    }

    Ok(())
}

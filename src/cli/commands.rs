use clap::{Args, Parser, Subcommand};

use crate::ops::query::{QueryParams, SortKey};

#[derive(Parser)]
#[command(name = "tareas", about = concat!("tareas v", env!("CARGO_PKG_VERSION"), " - tasks in one JSON file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks (default filter: Pending and In Progress)
    List(ListArgs),
    /// Create a task
    Add(AddArgs),
    /// Replace a task's name, due date and status
    Edit(EditArgs),
    /// Change a task's status
    Status(StatusArgs),
    /// Mark a task Finished (shortcut for status <ID> Finished)
    Finish(IdArgs),
    /// Mark a task Cancelled (shortcut for status <ID> Cancelled)
    Cancel(IdArgs),
    /// Delete a task
    Delete(IdArgs),
    /// View the recovery log
    Recovery(RecoveryArgs),
}

// ---------------------------------------------------------------------------
// Query args (shared by every command that shows the list)
// ---------------------------------------------------------------------------

#[derive(Args, Clone)]
pub struct QueryArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub page: i64,
    /// Tasks per page (default from tareas.toml, 10 if unset)
    #[arg(long, alias = "page-size", default_value_t = 0, allow_negative_numbers = true)]
    pub size: i64,
    /// Only tasks whose name contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,
    /// Sort order: name-asc, name-desc, due-asc, due-desc
    #[arg(long, default_value = "name-asc")]
    pub sort: String,
    /// Only tasks with this status (overrides --statuses)
    #[arg(long)]
    pub only: Option<String>,
    /// Only tasks with one of these statuses, comma-separated
    #[arg(long, value_delimiter = ',')]
    pub statuses: Vec<String>,
}

impl QueryArgs {
    pub fn to_params(&self) -> QueryParams {
        QueryParams {
            page: self.page,
            page_size: self.size,
            search: self.search.clone(),
            sort: SortKey::parse(&self.sort),
            status_shortcut: self.only.clone(),
            status_select: self.statuses.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task name
    pub name: String,
    /// Due date (dd/mm/yyyy, d/m/yyyy or yyyy-mm-dd)
    #[arg(long)]
    pub due: Option<String>,
    /// Initial status (default: Pending)
    #[arg(long)]
    pub status: Option<String>,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: u32,
    /// New name
    #[arg(long)]
    pub name: String,
    /// New due date; omit to clear it
    #[arg(long)]
    pub due: Option<String>,
    /// New status; omit to keep the current one
    #[arg(long)]
    pub status: Option<String>,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Task ID
    pub id: u32,
    /// New status (e.g. "In Progress")
    #[arg(value_name = "STATUS")]
    pub new_status: String,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: u32,
    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Print the path to the recovery log instead
    #[arg(long)]
    pub path: bool,
}

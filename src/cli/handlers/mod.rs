use std::path::PathBuf;

use chrono::NaiveDate;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::recovery;
use crate::model::task::TaskDraft;
use crate::ops::query::QueryPage;
use crate::ops::tracker::{ActionOutcome, Tracker};
use crate::parse::parse_date;

/// Default number of recovery entries shown
const RECOVERY_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let dir = workspace_dir(cli.dir.as_deref())?;
    let tracker = Tracker::open(&dir)?;

    match cli.command {
        Commands::List(args) => cmd_list(&tracker, args, json),
        Commands::Add(args) => cmd_add(&tracker, args, json),
        Commands::Edit(args) => cmd_edit(&tracker, args, json),
        Commands::Status(args) => {
            let query = args.query.to_params();
            let outcome = tracker.change_status(&query, args.id, &args.new_status)?;
            print_outcome(&outcome, json)
        }
        Commands::Finish(args) => {
            let outcome = tracker.finish(&args.query.to_params(), args.id)?;
            print_outcome(&outcome, json)
        }
        Commands::Cancel(args) => {
            let outcome = tracker.cancel(&args.query.to_params(), args.id)?;
            print_outcome(&outcome, json)
        }
        Commands::Delete(args) => {
            let outcome = tracker.delete(&args.query.to_params(), args.id)?;
            print_outcome(&outcome, json)
        }
        Commands::Recovery(args) => cmd_recovery(&tracker, args, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the -C override, or the current directory.
fn workspace_dir(dir: Option<&str>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match dir {
        Some(d) => Ok(std::fs::canonicalize(d)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?),
        None => Ok(std::env::current_dir()?),
    }
}

/// Parse a `--due` value. A value that is given but unparsable is rejected
/// here, before it could silently become the unset date.
fn due_arg(due: Option<&str>) -> Result<Option<NaiveDate>, Box<dyn std::error::Error>> {
    match due.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(text)
            .map(Some)
            .ok_or_else(|| {
                format!("invalid due date '{}': use dd/mm/yyyy or yyyy-mm-dd", text).into()
            }),
    }
}

fn print_page(page: &QueryPage, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&page_to_json(page))?);
    } else {
        for line in format_page(page) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn print_outcome(outcome: &ActionOutcome, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome_to_json(outcome))?);
    } else {
        println!("{}", outcome.message);
        println!();
        for line in format_page(&outcome.page) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_list(tracker: &Tracker, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    print_page(&tracker.list(&args.query.to_params()), json)
}

fn cmd_add(tracker: &Tracker, args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let draft = TaskDraft {
        name: args.name,
        due: due_arg(args.due.as_deref())?,
        status: args.status,
    };
    let outcome = tracker.create(&args.query.to_params(), draft)?;
    print_outcome(&outcome, json)
}

fn cmd_edit(tracker: &Tracker, args: EditArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let draft = TaskDraft {
        name: args.name,
        due: due_arg(args.due.as_deref())?,
        status: args.status,
    };
    let outcome = tracker.edit(&args.query.to_params(), args.id, draft)?;
    print_outcome(&outcome, json)
}

fn cmd_recovery(
    tracker: &Tracker,
    args: RecoveryArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = tracker.store().dir();
    if args.path {
        println!("{}", recovery::recovery_log_path(dir).display());
        return Ok(());
    }

    let limit = args.limit.unwrap_or(RECOVERY_LIMIT);
    let entries = recovery::read_recovery_entries(dir, Some(limit));
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(|e| e.to_json()).collect();
        println!("{}", serde_json::to_string_pretty(&values)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("(recovery log is empty)");
    }
    for entry in &entries {
        println!(
            "{}  {}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.category,
            entry.description
        );
        for (key, value) in &entry.fields {
            println!("    {}: {}", key, value);
        }
        for line in entry.body.lines() {
            println!("    | {}", line);
        }
    }
    Ok(())
}

use serde::Serialize;

use crate::model::task::Task;
use crate::ops::query::{QueryPage, QueryParams};
use crate::ops::tracker::ActionOutcome;
use crate::parse::format_date;
use crate::util::unicode::{display_width, pad_to_width, truncate_to_width};

/// Longest name shown in the table before it is cut with `…`
const MAX_NAME_WIDTH: usize = 48;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: u32,
    pub name: String,
    /// `dd/mm/yyyy`, absent when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    pub status: String,
}

#[derive(Serialize)]
pub struct PageJson {
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct QueryJson {
    pub page: i64,
    pub page_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub sort: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,
}

#[derive(Serialize)]
pub struct OutcomeJson {
    pub message: String,
    pub query: QueryJson,
    #[serde(flatten)]
    pub page: PageJson,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id,
        name: task.name.clone(),
        due: task.due.map(|d| format_date(Some(d))),
        status: task.status.clone(),
    }
}

pub fn page_to_json(page: &QueryPage) -> PageJson {
    PageJson {
        page: page.page,
        total_pages: page.total_pages,
        page_size: page.page_size,
        total_count: page.total_count,
        tasks: page.tasks.iter().map(task_to_json).collect(),
    }
}

pub fn query_to_json(query: &QueryParams) -> QueryJson {
    QueryJson {
        page: query.page,
        page_size: query.page_size,
        search: query.search.clone(),
        sort: query.sort.as_str(),
        only: query.status_shortcut.clone(),
        statuses: query.status_select.clone(),
    }
}

pub fn outcome_to_json(outcome: &ActionOutcome) -> OutcomeJson {
    OutcomeJson {
        message: outcome.message.clone(),
        query: query_to_json(&outcome.query),
        page: page_to_json(&outcome.page),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a page as an aligned table followed by a pagination footer.
pub fn format_page(page: &QueryPage) -> Vec<String> {
    let mut lines = Vec::new();
    if page.tasks.is_empty() {
        lines.push("(no tasks)".to_string());
    } else {
        let rows: Vec<[String; 4]> = page
            .tasks
            .iter()
            .map(|t| {
                [
                    t.id.to_string(),
                    truncate_to_width(&t.name, MAX_NAME_WIDTH),
                    format_date(t.due),
                    t.status.clone(),
                ]
            })
            .collect();

        let header = ["id", "name", "due", "status"];
        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                rows.iter()
                    .map(|r| display_width(&r[col]))
                    .chain(std::iter::once(header[col].len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_row = |cells: [&str; 4]| {
            format!(
                "{:>id_w$}  {}  {}  {}",
                cells[0],
                pad_to_width(cells[1], widths[1]),
                pad_to_width(cells[2], widths[2]),
                cells[3],
                id_w = widths[0],
            )
        };

        lines.push(format_row(header));
        for row in &rows {
            lines.push(format_row([
                row[0].as_str(),
                row[1].as_str(),
                row[2].as_str(),
                row[3].as_str(),
            ]));
        }
    }

    let noun = if page.total_count == 1 { "task" } else { "tasks" };
    lines.push(format!(
        "page {}/{} ({} {})",
        page.page, page.total_pages, page.total_count, noun
    ));
    lines
}

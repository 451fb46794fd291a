use std::cmp::Reverse;

use crate::model::config::QueryConfig;
use crate::model::task::Task;

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    DueAsc,
    DueDesc,
}

impl SortKey {
    /// Parse a sort token. Unrecognized tokens fall back to `name-asc`.
    /// The short tokens `az`, `za`, `fasc`, `fdesc` are accepted too.
    pub fn parse(s: &str) -> SortKey {
        match s.trim().to_lowercase().as_str() {
            "name-desc" | "za" => SortKey::NameDesc,
            "due-asc" | "fasc" => SortKey::DueAsc,
            "due-desc" | "fdesc" => SortKey::DueDesc,
            _ => SortKey::NameAsc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::DueAsc => "due-asc",
            SortKey::DueDesc => "due-desc",
        }
    }
}

/// Everything a list request asks for.
///
/// Mutations take one of these and hand it back untouched together with the
/// redisplayed page, so filter, sort and page survive a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// 1-based; values below 1 mean page 1
    pub page: i64,
    /// Non-positive means the configured default
    pub page_size: i64,
    /// Substring matched against task names; blank disables it
    pub search: Option<String>,
    pub sort: SortKey,
    /// Single status that, when non-blank, replaces `status_select`
    pub status_shortcut: Option<String>,
    pub status_select: Vec<String>,
}

impl Default for QueryParams {
    fn default() -> Self {
        QueryParams {
            page: 1,
            page_size: 0,
            search: None,
            sort: SortKey::NameAsc,
            status_shortcut: None,
            status_select: Vec::new(),
        }
    }
}

/// One page of results plus pagination metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPage {
    pub tasks: Vec<Task>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_count: usize,
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Resolve the status filter: shortcut, else multi-select, else the defaults.
pub fn effective_statuses<'a>(params: &'a QueryParams, config: &'a QueryConfig) -> Vec<&'a str> {
    if let Some(status) = non_blank(&params.status_shortcut) {
        return vec![status];
    }
    let selected: Vec<&str> = params
        .status_select
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !selected.is_empty() {
        return selected;
    }
    config.default_statuses.iter().map(|s| s.as_str()).collect()
}

/// Filter, search, sort and paginate `tasks`.
///
/// The steps run in that order so counts and ordering agree with the page
/// that comes out. `tasks` is not modified.
pub fn run_query(tasks: &[Task], params: &QueryParams, config: &QueryConfig) -> QueryPage {
    let statuses = effective_statuses(params, config);
    let mut matched: Vec<Task> = tasks
        .iter()
        .filter(|t| statuses.iter().any(|s| t.has_status(s)))
        .cloned()
        .collect();

    if let Some(search) = non_blank(&params.search) {
        let needle = search.to_lowercase();
        matched.retain(|t| t.name.to_lowercase().contains(&needle));
    }

    // All of these are stable sorts
    match params.sort {
        SortKey::NameAsc => matched.sort_by_cached_key(|t| t.name.to_lowercase()),
        SortKey::NameDesc => matched.sort_by_cached_key(|t| Reverse(t.name.to_lowercase())),
        SortKey::DueAsc => matched.sort_by_key(|t| t.due),
        SortKey::DueDesc => matched.sort_by_key(|t| Reverse(t.due)),
    }

    let page_size = usize::try_from(params.page_size)
        .ok()
        .filter(|&n| n > 0)
        .unwrap_or(config.page_size.max(1));
    let total_count = matched.len();
    let total_pages = total_count.div_ceil(page_size).max(1);
    let page = usize::try_from(params.page.max(1))
        .unwrap_or(usize::MAX)
        .min(total_pages);

    let tasks = matched
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    QueryPage {
        tasks,
        page,
        total_pages,
        page_size,
        total_count,
    }
}

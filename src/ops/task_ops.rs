use crate::model::task::{Task, TaskDraft};

/// Error type for task operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(u32),
    #[error("task name is required")]
    BlankName,
    #[error("task status is required")]
    BlankStatus,
    #[error("no task ids left")]
    IdsExhausted,
}

// ---------------------------------------------------------------------------
// Lookup and validation
// ---------------------------------------------------------------------------

pub fn find_task(tasks: &[Task], id: u32) -> Option<&Task> {
    tasks.iter().find(|t| t.id == id)
}

pub fn find_task_mut(tasks: &mut [Task], id: u32) -> Option<&mut Task> {
    tasks.iter_mut().find(|t| t.id == id)
}

/// Trimmed name, or `BlankName` if nothing is left
pub fn validate_name(name: &str) -> Result<String, TaskError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TaskError::BlankName);
    }
    Ok(name.to_string())
}

/// Id for a new task: one past the highest id in use, 1 for an empty list.
/// `None` once the highest id is `u32::MAX`.
pub fn next_id(tasks: &[Task]) -> Option<u32> {
    tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)
}

fn trimmed_status(status: Option<&str>) -> Option<String> {
    status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Append a task built from `draft`. Returns the assigned id.
pub fn add_task(
    tasks: &mut Vec<Task>,
    draft: TaskDraft,
    default_status: &str,
) -> Result<u32, TaskError> {
    let name = validate_name(&draft.name)?;
    let status = trimmed_status(draft.status.as_deref())
        .unwrap_or_else(|| default_status.to_string());
    let id = next_id(tasks).ok_or(TaskError::IdsExhausted)?;
    tasks.push(Task::new(id, name, draft.due, status));
    Ok(id)
}

/// Overwrite name, due date and status in place. A blank status keeps the
/// current one.
pub fn edit_task(tasks: &mut [Task], id: u32, draft: TaskDraft) -> Result<(), TaskError> {
    let name = validate_name(&draft.name)?;
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.name = name;
    task.due = draft.due;
    if let Some(status) = trimmed_status(draft.status.as_deref()) {
        task.status = status;
    }
    Ok(())
}

pub fn set_status(tasks: &mut [Task], id: u32, status: &str) -> Result<(), TaskError> {
    let status = trimmed_status(Some(status)).ok_or(TaskError::BlankStatus)?;
    let task = find_task_mut(tasks, id).ok_or(TaskError::NotFound(id))?;
    task.status = status;
    Ok(())
}

/// Remove a task, returning it.
pub fn delete_task(tasks: &mut Vec<Task>, id: u32) -> Result<Task, TaskError> {
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or(TaskError::NotFound(id))?;
    Ok(tasks.remove(pos))
}

use chrono::NaiveDate;
use serde::Serialize;

/// Status given to new tasks when none is supplied
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_IN_PROGRESS: &str = "In Progress";
pub const STATUS_FINISHED: &str = "Finished";
pub const STATUS_CANCELLED: &str = "Cancelled";

/// A single task record.
///
/// Serialization writes the canonical key set in a fixed order
/// (`Id`, `name`, `dueDate`, `status`). Deserialization is hand-written in
/// `parse::task_json` because keys are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Unique id; 0 means not yet assigned
    #[serde(rename = "Id")]
    pub id: u32,
    pub name: String,
    /// Due date; `None` is the unset date
    #[serde(rename = "dueDate", serialize_with = "crate::parse::date::serialize")]
    pub due: Option<NaiveDate>,
    pub status: String,
}

impl Task {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        due: Option<NaiveDate>,
        status: impl Into<String>,
    ) -> Self {
        Task {
            id,
            name: name.into(),
            due,
            status: status.into(),
        }
    }

    /// Case-insensitive status comparison
    pub fn has_status(&self, status: &str) -> bool {
        self.status.trim().to_lowercase() == status.trim().to_lowercase()
    }
}

/// Field values supplied by a create or edit request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub due: Option<NaiveDate>,
    /// Blank means "use the default status"
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_status_ignores_case_and_padding() {
        let task = Task::new(1, "Buy milk", None, "In Progress");
        assert!(task.has_status("in progress"));
        assert!(task.has_status(" IN PROGRESS "));
        assert!(!task.has_status("Pending"));
    }
}

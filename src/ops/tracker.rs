use std::path::Path;

use crate::io::config_io::{self, ConfigError};
use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::io::store::{StoreError, TaskStore};
use crate::model::config::QueryConfig;
use crate::model::task::{STATUS_CANCELLED, STATUS_FINISHED, TaskDraft};
use crate::ops::query::{QueryPage, QueryParams, run_query};
use crate::ops::task_ops::{self, TaskError};

/// Error type for write actions
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a write action: what happened, and the list as it now looks
/// under the caller's unchanged query.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub message: String,
    pub query: QueryParams,
    pub page: QueryPage,
}

/// The task store and the query defaults, wired together.
///
/// Every action is one load, an in-memory change and at most one save.
#[derive(Debug, Clone)]
pub struct Tracker {
    store: TaskStore,
    config: QueryConfig,
}

impl Tracker {
    pub fn new(store: TaskStore, config: QueryConfig) -> Self {
        Tracker { store, config }
    }

    /// Open the workspace in `dir`, reading tareas.toml if present.
    pub fn open(dir: &Path) -> Result<Self, ConfigError> {
        let config = config_io::read_config(dir)?;
        let store = config_io::open_store(dir, &config);
        Ok(Tracker::new(store, config.query))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Run a query against a fresh load of the document.
    pub fn list(&self, query: &QueryParams) -> QueryPage {
        run_query(&self.store.load_all_with_ids(), query, &self.config)
    }

    pub fn create(
        &self,
        query: &QueryParams,
        draft: TaskDraft,
    ) -> Result<ActionOutcome, ActionError> {
        task_ops::validate_name(&draft.name)?;
        let mut tasks = self.store.load_all_with_ids();
        let id = task_ops::add_task(&mut tasks, draft, &self.config.default_status)?;
        self.store.save_all(&tasks)?;
        Ok(self.redisplay(query, format!("Task {} created.", id)))
    }

    pub fn edit(
        &self,
        query: &QueryParams,
        id: u32,
        draft: TaskDraft,
    ) -> Result<ActionOutcome, ActionError> {
        task_ops::validate_name(&draft.name)?;
        let mut tasks = self.store.load_all_with_ids();
        task_ops::edit_task(&mut tasks, id, draft)?;
        self.store.save_all(&tasks)?;
        Ok(self.redisplay(query, format!("Task {} updated.", id)))
    }

    pub fn change_status(
        &self,
        query: &QueryParams,
        id: u32,
        status: &str,
    ) -> Result<ActionOutcome, ActionError> {
        let mut tasks = self.store.load_all_with_ids();
        task_ops::set_status(&mut tasks, id, status)?;
        self.store.save_all(&tasks)?;
        Ok(self.redisplay(query, format!("Task {} marked {}.", id, status.trim())))
    }

    pub fn finish(&self, query: &QueryParams, id: u32) -> Result<ActionOutcome, ActionError> {
        self.change_status(query, id, STATUS_FINISHED)
    }

    pub fn cancel(&self, query: &QueryParams, id: u32) -> Result<ActionOutcome, ActionError> {
        self.change_status(query, id, STATUS_CANCELLED)
    }

    /// Remove a task. Deleting an unknown id is reported, not ignored.
    pub fn delete(&self, query: &QueryParams, id: u32) -> Result<ActionOutcome, ActionError> {
        let mut tasks = self.store.load_all_with_ids();
        let removed = task_ops::delete_task(&mut tasks, id)?;
        self.store.save_all(&tasks)?;

        // Keep the deleted record around in case it was a mistake
        let body = serde_json::to_string_pretty(&removed).unwrap_or_default();
        recovery::log_recovery(
            self.store.dir(),
            RecoveryEntry::new(RecoveryCategory::Delete, format!("task {} deleted", id))
                .field("Task", id)
                .field("Name", &removed.name)
                .body(body),
        );

        Ok(self.redisplay(query, format!("Task {} deleted.", id)))
    }

    fn redisplay(&self, query: &QueryParams, message: String) -> ActionOutcome {
        ActionOutcome {
            message,
            query: query.clone(),
            page: self.list(query),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn sample_tracker(dir: &Path) -> Tracker {
        let tracker = Tracker::open(dir).unwrap();
        tracker
            .store()
            .save_all(&[
                Task::new(1, "Buy milk", ymd(2024, 1, 10), "Pending"),
                Task::new(2, "Pay rent", ymd(2024, 1, 5), "Finished"),
            ])
            .unwrap();
        tracker
    }

    fn draft(name: &str) -> TaskDraft {
        TaskDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn stored_ids(tracker: &Tracker) -> Vec<u32> {
        tracker.store().load_all().iter().map(|t| t.id).collect()
    }

    #[test]
    fn list_filters_by_status() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());
        let query = QueryParams {
            status_select: vec!["Pending".into()],
            page_size: 10,
            ..Default::default()
        };
        let page = tracker.list(&query);
        assert_eq!(page.tasks.len(), 1);
        assert_eq!(page.tasks[0].name, "Buy milk");
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn create_assigns_next_id_and_redisplays() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());
        let query = QueryParams {
            search: Some("call".into()),
            ..Default::default()
        };
        let outcome = tracker.create(&query, draft("Call mom")).unwrap();
        assert_eq!(outcome.message, "Task 3 created.");
        assert_eq!(outcome.query, query);
        assert_eq!(outcome.page.tasks.len(), 1);
        assert_eq!(outcome.page.tasks[0].id, 3);
        assert_eq!(outcome.page.tasks[0].status, "Pending");
        assert_eq!(stored_ids(&tracker), vec![1, 2, 3]);
    }

    #[test]
    fn create_in_empty_workspace_starts_at_one() {
        let tmp = TempDir::new().unwrap();
        let tracker = Tracker::open(tmp.path()).unwrap();
        tracker.create(&QueryParams::default(), draft("first")).unwrap();
        assert_eq!(stored_ids(&tracker), vec![1]);
        assert!(tmp.path().join("tareas.json").exists());
    }

    #[test]
    fn create_blank_name_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());
        let before = fs::read_to_string(tracker.store().path()).unwrap();

        let err = tracker.create(&QueryParams::default(), draft("")).unwrap_err();
        assert!(matches!(err, ActionError::Task(TaskError::BlankName)));
        assert_eq!(fs::read_to_string(tracker.store().path()).unwrap(), before);

        // No id was consumed
        tracker.create(&QueryParams::default(), draft("next")).unwrap();
        assert_eq!(stored_ids(&tracker), vec![1, 2, 3]);
    }

    #[test]
    fn create_blank_name_does_not_touch_missing_store() {
        let tmp = TempDir::new().unwrap();
        let tracker = Tracker::open(tmp.path()).unwrap();
        assert!(tracker.create(&QueryParams::default(), draft("  ")).is_err());
        assert!(!tracker.store().path().exists());
    }

    #[test]
    fn create_past_the_largest_id_is_reported() {
        let tmp = TempDir::new().unwrap();
        let tracker = Tracker::open(tmp.path()).unwrap();
        fs::write(
            tracker.store().path(),
            r#"[{"Id": 4294967295, "name": "last", "status": "Pending"}, {"Id": 0, "name": "b", "status": "Pending"}]"#,
        )
        .unwrap();
        let before = fs::read_to_string(tracker.store().path()).unwrap();

        let page = tracker.list(&QueryParams::default());
        assert_eq!(page.total_count, 2);

        let err = tracker.create(&QueryParams::default(), draft("one more")).unwrap_err();
        assert!(matches!(err, ActionError::Task(TaskError::IdsExhausted)));
        assert_eq!(fs::read_to_string(tracker.store().path()).unwrap(), before);
    }

    #[test]
    fn delete_then_delete_again() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());

        tracker.delete(&QueryParams::default(), 2).unwrap();
        assert_eq!(stored_ids(&tracker), vec![1]);

        let before = fs::read_to_string(tracker.store().path()).unwrap();
        let err = tracker.delete(&QueryParams::default(), 2).unwrap_err();
        assert!(matches!(err, ActionError::Task(TaskError::NotFound(2))));
        assert_eq!(err.to_string(), "task not found: 2");
        assert_eq!(fs::read_to_string(tracker.store().path()).unwrap(), before);
    }

    #[test]
    fn delete_is_recorded_in_recovery_log() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());
        tracker.delete(&QueryParams::default(), 1).unwrap();

        let entries = recovery::read_recovery_entries(tmp.path(), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, RecoveryCategory::Delete);
        assert!(entries[0].body.contains("Buy milk"));
    }

    #[test]
    fn change_status_moves_task_out_of_default_view() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());

        let outcome = tracker.finish(&QueryParams::default(), 1).unwrap();
        assert_eq!(outcome.message, "Task 1 marked Finished.");
        assert!(outcome.page.tasks.is_empty());

        let outcome = tracker
            .change_status(&QueryParams::default(), 2, "In Progress")
            .unwrap();
        assert_eq!(outcome.page.tasks[0].id, 2);

        let err = tracker.cancel(&QueryParams::default(), 42).unwrap_err();
        assert!(matches!(err, ActionError::Task(TaskError::NotFound(42))));
    }

    #[test]
    fn edit_preserves_id() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());
        let update = TaskDraft {
            name: " Buy oat milk ".into(),
            due: ymd(2024, 2, 1),
            status: Some("In Progress".into()),
        };
        tracker.edit(&QueryParams::default(), 1, update).unwrap();

        let tasks = tracker.store().load_all();
        assert_eq!(tasks[0], Task::new(1, "Buy oat milk", ymd(2024, 2, 1), "In Progress"));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn edit_errors_write_nothing() {
        let tmp = TempDir::new().unwrap();
        let tracker = sample_tracker(tmp.path());
        let before = fs::read_to_string(tracker.store().path()).unwrap();

        let err = tracker.edit(&QueryParams::default(), 9, draft("x")).unwrap_err();
        assert!(matches!(err, ActionError::Task(TaskError::NotFound(9))));
        let err = tracker.edit(&QueryParams::default(), 1, draft(" ")).unwrap_err();
        assert!(matches!(err, ActionError::Task(TaskError::BlankName)));

        assert_eq!(fs::read_to_string(tracker.store().path()).unwrap(), before);
    }

    #[test]
    fn mutation_persists_repaired_ids() {
        let tmp = TempDir::new().unwrap();
        let tracker = Tracker::open(tmp.path()).unwrap();
        fs::write(
            tracker.store().path(),
            r#"[{"name": "a", "status": "Pending"}, {"Id": 4, "name": "b", "status": "Pending"}]"#,
        )
        .unwrap();

        // Reads repair ids without writing
        let listed: Vec<u32> = tracker
            .list(&QueryParams::default())
            .tasks
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, vec![5, 4]);
        assert_eq!(stored_ids(&tracker), vec![0, 4]);

        tracker.finish(&QueryParams::default(), 5).unwrap();
        assert_eq!(stored_ids(&tracker), vec![5, 4]);
    }
}

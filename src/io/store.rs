use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};
use crate::model::task::Task;
use crate::parse::{parse_tasks, serialize_tasks};

/// Error type for record store writes. Reads never fail; see [`TaskStore::load_all`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The JSON document holding every task, read and written whole.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TaskStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the document and its recovery log
    pub fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }

    /// Load every task as stored.
    ///
    /// A missing document is an empty collection. An unreadable or malformed
    /// document is also treated as empty: a warning goes to stderr and the
    /// raw text is kept in the recovery log so a later save cannot lose it.
    pub fn load_all(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("warning: could not read {}: {}", self.path.display(), e);
                recovery::log_recovery(
                    self.dir(),
                    RecoveryEntry::new(RecoveryCategory::Parser, "document read failed")
                        .field("Source", self.path.display())
                        .field("Error", &e),
                );
                return Vec::new();
            }
        };

        match parse_tasks(&content) {
            Ok(tasks) => tasks,
            Err(e) => {
                eprintln!("warning: could not parse {}: {}", self.path.display(), e);
                recovery::log_recovery(
                    self.dir(),
                    RecoveryEntry::new(RecoveryCategory::Parser, "document parse failed")
                        .field("Source", self.path.display())
                        .field("Error", &e)
                        .body(content),
                );
                Vec::new()
            }
        }
    }

    /// Load every task, giving an id to each record that lacks a usable one.
    pub fn load_all_with_ids(&self) -> Vec<Task> {
        let mut tasks = self.load_all();
        assign_missing_ids(&mut tasks);
        tasks
    }

    /// Replace the whole document with `tasks`.
    ///
    /// The write goes through a temp file and a rename, so on failure the
    /// previous document is left untouched. The unsaved content is kept in the
    /// recovery log.
    pub fn save_all(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let content = serialize_tasks(tasks)?;
        if let Err(e) = fs::create_dir_all(self.dir())
            .and_then(|()| recovery::atomic_write(&self.path, content.as_bytes()))
        {
            recovery::log_recovery(
                self.dir(),
                RecoveryEntry::new(RecoveryCategory::Write, "document write failed")
                    .field("Target", self.path.display())
                    .field("Error", &e)
                    .body(content),
            );
            return Err(StoreError::Write {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }
}

/// Give every record with id 0, or with an id already used earlier in the
/// sequence, a fresh id.
///
/// Fresh ids start above the highest id anywhere in the sequence and are
/// handed out in encounter order, so they never collide with an id that
/// appears later. Once `u32::MAX` is reached the lowest unused ids are
/// taken instead. Running this on its own output changes nothing.
pub fn assign_missing_ids(tasks: &mut [Task]) {
    let mut taken: HashSet<u32> = tasks.iter().map(|t| t.id).filter(|&id| id != 0).collect();
    let mut next = tasks.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1);
    let mut lowest_free = 1u32;
    let mut seen = HashSet::new();
    for task in tasks.iter_mut() {
        if task.id != 0 && seen.insert(task.id) {
            continue;
        }
        let id = match next {
            Some(id) => {
                next = id.checked_add(1);
                id
            }
            None => {
                while taken.contains(&lowest_free) {
                    lowest_free += 1;
                }
                lowest_free
            }
        };
        taken.insert(id);
        seen.insert(id);
        task.id = id;
    }
}

use std::fmt;

use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::Value;

use crate::model::task::{STATUS_IN_PROGRESS, STATUS_PENDING, Task};
use crate::parse::date::parse_date;

/// Which task attribute a document key refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Due,
    Status,
    Unknown,
}

impl Field {
    /// Keys are matched case-insensitively. The Spanish names written by
    /// older versions of the document are accepted as aliases.
    fn from_key(key: &str) -> Field {
        match key.to_lowercase().as_str() {
            "id" => Field::Id,
            "name" | "nombretarea" => Field::Name,
            "duedate" | "due" | "fechavencimiento" => Field::Due,
            "status" | "estado" => Field::Status,
            _ => Field::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TaskVisitor)
    }
}

struct TaskVisitor;

impl<'de> Visitor<'de> for TaskVisitor {
    type Value = Task;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a task object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Task, A::Error> {
        let mut task = Task::new(0, "", None, "");
        while let Some(key) = map.next_key::<String>()? {
            match Field::from_key(&key) {
                Field::Id => task.id = id_from_value(map.next_value::<Value>()?),
                Field::Name => task.name = map.next_value::<Option<String>>()?.unwrap_or_default(),
                Field::Due => {
                    // Anything that is not a parsable date string is the unset date
                    task.due = match map.next_value::<Value>()? {
                        Value::String(s) => parse_date(&s),
                        _ => None,
                    };
                }
                Field::Status => {
                    let status = map.next_value::<Option<String>>()?.unwrap_or_default();
                    task.status = legacy_status(&status).map_or(status, str::to_string);
                }
                Field::Unknown => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(task)
    }
}

/// An id that is not a positive `u32` (negative, too large, fractional,
/// or not a number at all) reads as 0 and is repaired on load.
fn id_from_value(value: Value) -> u32 {
    let id = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    id.and_then(|id| u32::try_from(id).ok()).unwrap_or(0)
}

/// Status labels written by the Spanish versions of the tracker.
fn legacy_status(status: &str) -> Option<&'static str> {
    let folded: String = status
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    match folded.as_str() {
        "pendiente" => Some(STATUS_PENDING),
        "enprogreso" => Some(STATUS_IN_PROGRESS),
        _ => None,
    }
}

/// Parse a whole document. A top-level `null` is an empty collection.
pub fn parse_tasks(text: &str) -> Result<Vec<Task>, serde_json::Error> {
    let tasks: Option<Vec<Task>> = serde_json::from_str(text)?;
    Ok(tasks.unwrap_or_default())
}

/// Serialize a whole document: pretty-printed, two-space indent, trailing newline.
pub fn serialize_tasks(tasks: &[Task]) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(tasks)?;
    out.push('\n');
    Ok(out)
}

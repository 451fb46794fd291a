pub mod date;
pub mod task_json;

pub use date::{format_date, parse_date};
pub use task_json::{parse_tasks, serialize_tasks};

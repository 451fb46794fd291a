pub mod query;
pub mod task_ops;
pub mod tracker;

mod task_def;
mod task_type;

pub use task_def::{RetryLogic, TaskDef, TimeoutPolicy};
pub use task_type::TaskType;

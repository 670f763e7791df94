mod common;
mod exception;
mod metadata;
mod utils;

pub use metadata::{
    RetryLogic, SubWorkflowParams, TaskDef, TaskType, TimeoutPolicy, WorkflowDef, WorkflowTask,
};
pub use utils::EnvUtils;

pub mod prelude;

mod macros;

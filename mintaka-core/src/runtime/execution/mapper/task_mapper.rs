use mintaka_common::prelude::*;

use super::task_mapper_context::TaskMapperContext;
use crate::model::TaskModel;

/// One implementation per task type. `get_mapped_tasks` is a pure expansion:
/// it reads the context, at most performs a read-only definition lookup, and
/// returns the ordered, never-empty list of execution units to schedule.
pub trait TaskMapper: Send + Sync {
    fn get_task_type(&self) -> &str;

    fn get_mapped_tasks(&self, task_mapper_context: TaskMapperContext)
        -> MtkResult<Vec<TaskModel>>;
}

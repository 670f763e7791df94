use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext};
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::Wait` to a `TaskModel` that parks until completed externally.
pub struct WaitTaskMapper;

impl TaskMapper for WaitTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::Wait.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in WaitTaskMapper",
            task_mapper_context
        );

        let mut wait_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        wait_task.input_data = task_mapper_context.task_input.clone();

        Ok(vec![wait_task])
    }
}

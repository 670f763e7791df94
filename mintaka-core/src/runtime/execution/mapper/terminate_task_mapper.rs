use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext};
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::Terminate` to a `TaskModel` that ends the workflow when started.
pub struct TerminateTaskMapper;

impl TaskMapper for TerminateTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::Terminate.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in TerminateTaskMapper",
            task_mapper_context
        );

        let mut terminate_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        terminate_task.input_data = task_mapper_context.task_input.clone();

        Ok(vec![terminate_task])
    }
}

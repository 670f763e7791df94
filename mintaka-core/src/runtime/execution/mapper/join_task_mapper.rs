use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext};
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::Join` to a `TaskModel` waiting on its declared fork siblings.
pub struct JoinTaskMapper;

impl TaskMapper for JoinTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::Join.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in JoinTaskMapper",
            task_mapper_context
        );

        let workflow_task = task_mapper_context.workflow_task;

        let mut join_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        join_task.input_data = task_mapper_context.task_input.clone();
        join_task.input_data.insert(
            "joinOn".into(),
            workflow_task
                .join_on
                .iter()
                .map(Object::from)
                .collect::<Vec<_>>()
                .into(),
        );

        Ok(vec![join_task])
    }
}

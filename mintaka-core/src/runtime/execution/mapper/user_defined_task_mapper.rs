use mintaka_common::prelude::*;
use mintaka_common::{TaskDef, TaskType};

use super::{TaskMapper, TaskMapperContext};
use crate::dao::MetadataDao;
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::UserDefined` to a `TaskModel` executed by a custom worker.
pub struct UserDefinedTaskMapper;

impl TaskMapper for UserDefinedTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::UserDefined.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in UserDefinedTaskMapper",
            task_mapper_context
        );

        let workflow_task = task_mapper_context.workflow_task;

        let task_def_guard;
        let task_def = if let Some(task_def) = workflow_task.task_definition.as_ref() {
            Some(task_def)
        } else if let Some(guard) = MetadataDao::get_task_def(&workflow_task.name) {
            task_def_guard = guard;
            Some(task_def_guard.value())
        } else {
            None
        };

        let mut user_defined_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        user_defined_task.input_data = task_mapper_context.task_input.clone();
        user_defined_task.start_delay_in_seconds = workflow_task.start_delay;
        user_defined_task.callback_after_seconds = workflow_task.start_delay as i64;
        user_defined_task.response_timeout_seconds = task_def
            .map(|x| x.get_response_timeout_seconds())
            .unwrap_or(TaskDef::ONE_HOUR_SECS) as i64;
        if let Some(task_def) = task_def {
            user_defined_task.apply_isolation(task_def);
        }

        Ok(vec![user_defined_task])
    }
}

use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext};
use crate::dao::MetadataDao;
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::Event` to a `TaskModel` publishing to the configured sink.
pub struct EventTaskMapper;

impl TaskMapper for EventTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::Event.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in EventTaskMapper",
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
            // an event task without registered metadata is still mapped, with
            // isolation group and execution namespace left empty
            None
        };

        let mut event_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        event_task.input_data = task_mapper_context.task_input.clone();
        event_task
            .input_data
            .insert("sink".into(), (&workflow_task.sink).into());
        event_task
            .input_data
            .insert("asyncComplete".into(), workflow_task.async_complete.into());
        if let Some(task_def) = task_def {
            event_task.apply_isolation(task_def);
        }

        Ok(vec![event_task])
    }
}

use mintaka_common::prelude::*;
use mintaka_common::{TaskDef, TaskType};

use super::{TaskMapper, TaskMapperContext};
use crate::dao::MetadataDao;
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::KafkaPublish` to a `TaskModel` carrying the publish request.
pub struct KafkaPublishTaskMapper;

impl TaskMapper for KafkaPublishTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::KafkaPublish.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in KafkaPublishTaskMapper",
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

        let mut kafka_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        kafka_task.input_data = task_mapper_context.task_input.clone();
        kafka_task.start_delay_in_seconds = workflow_task.start_delay;
        kafka_task.callback_after_seconds = workflow_task.start_delay as i64;
        kafka_task.response_timeout_seconds = task_def
            .map(|x| x.get_response_timeout_seconds())
            .unwrap_or(TaskDef::ONE_HOUR_SECS) as i64;
        kafka_task.rate_limit_per_frequency = task_def
            .and_then(|x| x.rate_limit_per_frequency)
            .unwrap_or(0);
        kafka_task.rate_limit_frequency_in_seconds = task_def
            .and_then(|x| x.rate_limit_frequency_in_seconds)
            .unwrap_or(1);
        if let Some(task_def) = task_def {
            kafka_task.apply_isolation(task_def);
        }

        Ok(vec![kafka_task])
    }
}

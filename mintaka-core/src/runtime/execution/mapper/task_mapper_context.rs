use std::collections::HashMap;

use chrono::Utc;
use mintaka_common::prelude::*;
use mintaka_common::WorkflowTask;

use crate::model::{TaskModel, TaskStatus, WorkflowModel};
use crate::utils::{retried_task_id, IdGenerator};

/// Business object used for interaction between the advancement loop and the
/// different mappers. Immutable once built; mappers never write through it.
pub struct TaskMapperContext<'a> {
    pub workflow_model: &'a WorkflowModel,
    pub workflow_task: &'a WorkflowTask,
    /// Already expression-resolved. May be empty, never absent.
    pub task_input: HashMap<InlineStr, Object>,
    pub retry_count: i32,
    /// Identifier of the unit being retried; empty on first attempts.
    pub retry_task_id: InlineStr,
    /// Identifier to assign to the primary produced unit (first attempts).
    pub task_id: InlineStr,
    pub id_generator: &'a dyn IdGenerator,
}

impl<'a> std::fmt::Debug for TaskMapperContext<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskMapperContext")
            .field("workflow", &self.workflow_model.to_short_string())
            .field("workflow_task", &self.workflow_task.task_reference_name)
            .field("task_input", &self.task_input)
            .field("retry_count", &self.retry_count)
            .field("retry_task_id", &self.retry_task_id)
            .field("task_id", &self.task_id)
            .finish()
    }
}

impl<'a> TaskMapperContext<'a> {
    pub fn new(
        workflow_model: &'a WorkflowModel,
        workflow_task: &'a WorkflowTask,
        task_input: HashMap<InlineStr, Object>,
        retry_count: i32,
        retry_task_id: InlineStr,
        task_id: InlineStr,
        id_generator: &'a dyn IdGenerator,
    ) -> Self {
        Self {
            workflow_model,
            workflow_task,
            task_input,
            retry_count,
            retry_task_id,
            task_id,
            id_generator,
        }
    }

    /// The identifier of the primary produced unit: the context-supplied one
    /// on first attempts, a deterministic descendant of the retried unit's
    /// identifier on retries. Mappers never invent a new lineage on retry.
    pub fn assigned_task_id(&self) -> InlineStr {
        if self.retry_count > 0 && !self.retry_task_id.is_empty() {
            retried_task_id(&self.retry_task_id, self.retry_count)
        } else {
            self.task_id.clone()
        }
    }

    pub fn create_task_model(&self, status: TaskStatus) -> TaskModel {
        let mut task_model = TaskModel::new(status);
        task_model.reference_task_name = self.workflow_task.task_reference_name.clone();
        task_model.workflow_instance_id = self.workflow_model.workflow_id.clone();
        task_model.workflow_type = self.workflow_model.workflow_definition.name.clone();
        task_model.correlation_id = self.workflow_model.correlation_id.clone();
        task_model.scheduled_time = Utc::now().timestamp_millis();

        task_model.task_id = self.assigned_task_id();
        task_model.retry_count = self.retry_count;
        task_model.retried_task_id = self.retry_task_id.clone();
        task_model.workflow_task = Some(self.workflow_task.clone());
        task_model.workflow_priority = self.workflow_model.priority;

        task_model.task_type = self.workflow_task.type_.clone();
        task_model.task_def_name = self.workflow_task.name.clone();

        task_model
    }
}

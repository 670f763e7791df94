use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext};
use crate::model::{TaskModel, TaskStatus};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::SubWorkflow` to a `TaskModel` that starts the nested workflow.
pub struct SubWorkflowTaskMapper;

impl TaskMapper for SubWorkflowTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::SubWorkflow.as_ref()
    }

    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in SubWorkflowTaskMapper",
            task_mapper_context
        );

        let workflow_task = task_mapper_context.workflow_task;

        // cannot start a nested workflow without knowing which one
        let sub_workflow_params =
            workflow_task.sub_workflow_param.as_ref().ok_or_else(|| {
                ErrorCode::TerminateWorkflow(format!(
                    "Sub-workflow task {} declares no sub-workflow parameters",
                    workflow_task.task_reference_name
                ))
            })?;

        let mut sub_workflow_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        sub_workflow_task
            .input_data
            .insert("subWorkflowName".into(), (&sub_workflow_params.name).into());
        if let Some(version) = sub_workflow_params.version {
            sub_workflow_task
                .input_data
                .insert("subWorkflowVersion".into(), version.into());
        }
        if !sub_workflow_params.task_to_domain.is_empty() {
            let task_to_domain: HashMap<InlineStr, Object> = sub_workflow_params
                .task_to_domain
                .iter()
                .map(|(k, v)| (k.clone(), v.into()))
                .collect();
            sub_workflow_task
                .input_data
                .insert("subWorkflowTaskToDomain".into(), task_to_domain.into());
        }
        // seeds the nested instance's input
        sub_workflow_task.input_data.insert(
            "workflowInput".into(),
            Object::Map(task_mapper_context.task_input.clone()),
        );

        Ok(vec![sub_workflow_task])
    }
}

use mintaka_common::prelude::*;
use mintaka_common::{TaskType, WorkflowTask};

use super::{TaskMapper, TaskMapperContext, TaskMapperRegistry};
use crate::model::TaskModel;

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::ForkJoinDynamic` to a list of `TaskModel`, one per child task
/// configuration supplied in the resolved input.
pub struct ForkJoinDynamicTaskMapper;

impl TaskMapper for ForkJoinDynamicTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::ForkJoinDynamic.as_ref()
    }

    /// Returns one unit per child, in the order the input supplies them.
    /// Child configurations come from the input entry named by
    /// `dynamic_fork_tasks_param`; per-child input, when present, comes from
    /// the map named by `dynamic_fork_tasks_input_param_name`, keyed by the
    /// child's reference name. Zero children fails the mapping.
    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in ForkJoinDynamicTaskMapper",
            task_mapper_context
        );

        let workflow_task = task_mapper_context.workflow_task;

        let fork_tasks =
            Self::get_dynamic_fork_tasks(&task_mapper_context, workflow_task)?;
        if fork_tasks.is_empty() {
            return fmt_err!(
                TerminateWorkflow,
                "Dynamic fork task {} resolved zero child tasks from input parameter {}",
                workflow_task.task_reference_name,
                workflow_task.dynamic_fork_tasks_param
            );
        }
        let fork_task_input =
            Self::get_dynamic_fork_task_input(&task_mapper_context, workflow_task);

        let fork_task_id = task_mapper_context.task_id.clone();
        let mut tasks_to_be_scheduled = Vec::default();
        for (seq, fork_task) in fork_tasks.iter().enumerate() {
            let mut child_tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
                task_mapper_context.workflow_model,
                fork_task,
                task_mapper_context.retry_count,
                &task_mapper_context.retry_task_id,
                task_mapper_context.id_generator,
            )?;
            let child_input = fork_task_input
                .as_ref()
                .and_then(|x| x.get(&fork_task.task_reference_name));
            for child_task in &mut child_tasks {
                child_task.fork_task_id = fork_task_id.clone();
                child_task.seq = seq as i32;
                if let Some(Object::Map(child_input)) = child_input {
                    child_task.input_data.extend(
                        child_input
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone())),
                    );
                }
            }
            tasks_to_be_scheduled.extend(child_tasks);
        }

        Ok(tasks_to_be_scheduled)
    }
}

impl ForkJoinDynamicTaskMapper {
    /// Parses the child task configurations out of the resolved input.
    fn get_dynamic_fork_tasks(
        task_mapper_context: &TaskMapperContext,
        workflow_task: &WorkflowTask,
    ) -> MtkResult<Vec<WorkflowTask>> {
        if workflow_task.dynamic_fork_tasks_param.is_empty() {
            return fmt_err!(
                TerminateWorkflow,
                "Dynamic fork task {} declares no dynamic tasks input parameter",
                workflow_task.task_reference_name
            );
        }
        let dynamic_tasks = task_mapper_context
            .task_input
            .get(&workflow_task.dynamic_fork_tasks_param)
            .ok_or_else(|| {
                ErrorCode::TerminateWorkflow(format!(
                    "Dynamic fork task {} input has no entry {}",
                    workflow_task.task_reference_name, workflow_task.dynamic_fork_tasks_param
                ))
            })?;
        let dynamic_tasks = dynamic_tasks.as_list()?;

        let mut fork_tasks = Vec::with_capacity(dynamic_tasks.len());
        for dynamic_task in dynamic_tasks {
            let json = dynamic_task.to_json();
            fork_tasks.push(WorkflowTask::try_from(&json)?);
        }
        Ok(fork_tasks)
    }

    /// The per-child input overlay, keyed by child reference name. Absence is
    /// tolerated, children then keep their own resolved input.
    fn get_dynamic_fork_task_input(
        task_mapper_context: &TaskMapperContext,
        workflow_task: &WorkflowTask,
    ) -> Option<HashMap<InlineStr, Object>> {
        if workflow_task.dynamic_fork_tasks_input_param_name.is_empty() {
            return None;
        }
        match task_mapper_context
            .task_input
            .get(&workflow_task.dynamic_fork_tasks_input_param_name)
        {
            Some(Object::Map(input)) => Some(input.clone()),
            _ => None,
        }
    }
}

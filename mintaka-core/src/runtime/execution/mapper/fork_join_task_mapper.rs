use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext, TaskMapperRegistry};
use crate::model::TaskModel;

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::ForkJoin` to a list of `TaskModel`, one per declared parallel
/// branch, each carrying the shared fork identifier.
pub struct ForkJoinTaskMapper;

impl TaskMapper for ForkJoinTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::ForkJoin.as_ref()
    }

    /// Returns one unit per branch, in branch declaration order. Each branch
    /// contributes the units mapped from its first task; every returned unit
    /// shares the fork identifier so the advancement loop can recognize the
    /// siblings. A fork with no branches, or one not followed by a join in
    /// the workflow definition, fails the mapping.
    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in ForkJoinTaskMapper",
            task_mapper_context
        );

        let workflow_task = task_mapper_context.workflow_task;
        if workflow_task.fork_tasks.is_empty() {
            return fmt_err!(
                TerminateWorkflow,
                "Fork task {} declares no branches",
                workflow_task.task_reference_name
            );
        }

        let join_task = task_mapper_context
            .workflow_model
            .workflow_definition
            .get_next_task(&workflow_task.task_reference_name);
        if !join_task.is_some_and(|x| x.type_.eq(TaskType::Join.as_ref())) {
            return fmt_err!(
                TerminateWorkflow,
                "Fork task {} is not followed by a join task",
                workflow_task.task_reference_name
            );
        }

        let fork_task_id = task_mapper_context.task_id.clone();
        let mut tasks_to_be_scheduled = Vec::default();
        for branch in &workflow_task.fork_tasks {
            let first_task = branch.first().ok_or_else(|| {
                ErrorCode::TerminateWorkflow(format!(
                    "Fork task {} declares an empty branch",
                    workflow_task.task_reference_name
                ))
            })?;
            let mut branch_tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
                task_mapper_context.workflow_model,
                first_task,
                task_mapper_context.retry_count,
                &task_mapper_context.retry_task_id,
                task_mapper_context.id_generator,
            )?;
            for branch_task in &mut branch_tasks {
                branch_task.fork_task_id = fork_task_id.clone();
            }
            tasks_to_be_scheduled.extend(branch_tasks);
        }

        Ok(tasks_to_be_scheduled)
    }
}

use mintaka_common::prelude::*;
use mintaka_common::TaskType;

use super::{TaskMapper, TaskMapperContext, TaskMapperRegistry};
use crate::model::{TaskModel, TaskStatus};
use crate::runtime::execution::evaluators::{EvaluatorRegistry, ValueParamEvaluator};

/// An implementation of `TaskMapper` to map a `WorkflowTask` of type
/// `TaskType::Switch` to a list of `TaskModel` starting with the switch unit
/// itself, followed by the units mapped from the selected case branch.
pub struct SwitchTaskMapper;

impl TaskMapper for SwitchTaskMapper {
    fn get_task_type(&self) -> &str {
        TaskType::Switch.as_ref()
    }

    /// Returns units in the following order:
    /// - the switch unit carrying the evaluated case in its input and output
    /// - the units mapped from the first task of the matching case branch, or
    ///   of the default branch when no case matches
    ///
    /// An unmatched case with no default branch fails the mapping.
    fn get_mapped_tasks(
        &self,
        task_mapper_context: TaskMapperContext,
    ) -> MtkResult<Vec<TaskModel>> {
        debug!(
            "TaskMapperContext {:?} in SwitchTaskMapper",
            task_mapper_context
        );
        let mut tasks_to_be_scheduled = Vec::default();

        let workflow_task = task_mapper_context.workflow_task;
        let task_input: Object = Object::Map(task_mapper_context.task_input.clone());

        let evaluator_type = if workflow_task.evaluator_type.is_empty() {
            InlineStr::from(ValueParamEvaluator::NAME)
        } else {
            workflow_task.evaluator_type.clone()
        };
        let evaluator = EvaluatorRegistry::get_evaluator(&evaluator_type).ok_or_else(|| {
            error!("No evaluator registered for type: {}", evaluator_type);
            ErrorCode::TerminateWorkflow(format!(
                "No evaluator registered for type: {}",
                evaluator_type
            ))
        })?;
        let eval_result = evaluator
            .evaluate(&workflow_task.expression, &task_input)?
            .as_string()?
            .clone();
        debug!("eval_result is: {}", eval_result);

        let mut switch_task = task_mapper_context.create_task_model(TaskStatus::Scheduled);
        switch_task
            .input_data
            .insert("case".into(), eval_result.clone().into());
        switch_task.output_data.insert(
            "evaluationResult".into(),
            vec![Object::from(eval_result.clone())].into(),
        );
        tasks_to_be_scheduled.push(switch_task);

        // select the branch matched by the evaluated case, falling back to
        // the default branch when no case matches or the matched case is empty
        let selected_tasks =
            if let Some(selected_tasks) = workflow_task.decision_cases.get(&eval_result) {
                if !selected_tasks.is_empty() {
                    selected_tasks
                } else {
                    &workflow_task.default_case
                }
            } else {
                &workflow_task.default_case
            };
        if selected_tasks.is_empty() {
            return fmt_err!(
                TerminateWorkflow,
                "Switch task {} has no case matching evaluation result '{}' and no default case",
                workflow_task.task_reference_name,
                eval_result
            );
        }

        // only the first task of the branch is scheduled now; the advancement
        // loop schedules the rest as the branch progresses
        let selected_task = &selected_tasks[0];
        let case_tasks = TaskMapperRegistry::get_tasks_to_be_scheduled(
            task_mapper_context.workflow_model,
            selected_task,
            task_mapper_context.retry_count,
            &task_mapper_context.retry_task_id,
            task_mapper_context.id_generator,
        )?;
        tasks_to_be_scheduled.extend(case_tasks);

        Ok(tasks_to_be_scheduled)
    }
}

use dashmap::DashMap;
use mintaka_common::prelude::*;
use mintaka_common::{TaskType, WorkflowTask};
use once_cell::sync::Lazy;

use super::event_task_mapper::EventTaskMapper;
use super::fork_join_dynamic_task_mapper::ForkJoinDynamicTaskMapper;
use super::fork_join_task_mapper::ForkJoinTaskMapper;
use super::join_task_mapper::JoinTaskMapper;
use super::kafka_publish_task_mapper::KafkaPublishTaskMapper;
use super::simple_task_mapper::SimpleTaskMapper;
use super::sub_workflow_task_mapper::SubWorkflowTaskMapper;
use super::switch_task_mapper::SwitchTaskMapper;
use super::terminate_task_mapper::TerminateTaskMapper;
use super::user_defined_task_mapper::UserDefinedTaskMapper;
use super::wait_task_mapper::WaitTaskMapper;
use super::{TaskMapper, TaskMapperContext};
use crate::dao::MetadataDao;
use crate::model::{TaskModel, WorkflowModel};
use crate::utils::{retried_task_id, IdGenerator, ParametersUtils};

static REGISTRY: Lazy<DashMap<InlineStr, Box<dyn TaskMapper>>> = Lazy::new(|| {
    let map: DashMap<InlineStr, Box<dyn TaskMapper>> = DashMap::new();
    let mappers: Vec<Box<dyn TaskMapper>> = vec![
        Box::new(SimpleTaskMapper),
        Box::new(SwitchTaskMapper),
        Box::new(ForkJoinTaskMapper),
        Box::new(ForkJoinDynamicTaskMapper),
        Box::new(JoinTaskMapper),
        Box::new(SubWorkflowTaskMapper),
        Box::new(EventTaskMapper),
        Box::new(KafkaPublishTaskMapper),
        Box::new(WaitTaskMapper),
        Box::new(TerminateTaskMapper),
        Box::new(UserDefinedTaskMapper),
    ];
    for mapper in mappers {
        map.insert(InlineStr::from(mapper.get_task_type()), mapper);
    }
    map
});

/// Routes an expansion request to the mapper registered for the
/// configuration's task type. Populated once at first use and only read
/// afterwards, so concurrent dispatch needs no further synchronization.
pub struct TaskMapperRegistry;

impl TaskMapperRegistry {
    pub fn dispatch(context: TaskMapperContext) -> MtkResult<Vec<TaskModel>> {
        let type_ = context.workflow_task.type_.clone();
        // No fallback for unregistered types: an unknown tag is a
        // configuration or programming error and must never be retried.
        let mapper = REGISTRY.get(&type_).ok_or_else(|| {
            ErrorCode::UnknownTaskType(format!(
                "No mapper registered for task type: {}, task: {}",
                type_, context.workflow_task.task_reference_name
            ))
        })?;

        let mapped_tasks = mapper.get_mapped_tasks(context)?;
        if mapped_tasks.is_empty() {
            return fmt_err!(
                EmptyMapping,
                "Mapper for task type {} produced no execution units",
                type_
            );
        }
        Ok(mapped_tasks)
    }

    /// Expands a nested task configuration through the same mapping contract.
    /// Used by the fan-out mappers (switch, fork) for branch children; plain
    /// synchronous recursion, there are no suspension points to worry about.
    pub fn get_tasks_to_be_scheduled(
        workflow: &WorkflowModel,
        workflow_task: &WorkflowTask,
        retry_count: i32,
        retry_task_id: &InlineStr,
        id_generator: &dyn IdGenerator,
    ) -> MtkResult<Vec<TaskModel>> {
        let task_def_guard;
        let task_definition = if let Some(task_def) = workflow_task.task_definition.as_ref() {
            Some(task_def)
        } else if let Some(guard) = MetadataDao::get_task_def(&workflow_task.name) {
            task_def_guard = guard;
            Some(task_def_guard.value())
        } else {
            None
        };

        let task_id = id_generator.generate();
        // On a retry the produced unit carries the derived descendant id, not
        // the freshly minted one; task-id bindings in the input must resolve
        // to the id the unit ends up with.
        let assigned_task_id = if retry_count > 0 && !retry_task_id.is_empty() {
            retried_task_id(retry_task_id, retry_count)
        } else {
            task_id.clone()
        };
        let task_input = ParametersUtils::get_task_input(
            &workflow_task.input_parameters,
            workflow,
            task_definition,
            Some(&assigned_task_id),
        )?;
        let context = TaskMapperContext::new(
            workflow,
            workflow_task,
            task_input,
            retry_count,
            retry_task_id.clone(),
            task_id,
            id_generator,
        );
        Self::dispatch(context)
    }

    pub fn is_registered(task_type: &TaskType) -> bool {
        REGISTRY.contains_key(&InlineStr::from(task_type.as_ref()))
    }
}

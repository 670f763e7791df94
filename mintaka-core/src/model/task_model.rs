use mintaka_common::prelude::*;
use mintaka_common::{TaskDef, WorkflowTask};
use strum_macros::{AsRefStr, EnumString};

/// One concrete, schedulable execution unit, produced exclusively by a task
/// mapper. Everything after creation (state transitions, result recording) is
/// the execution subsystem's business.
#[derive(Clone, Debug)]
pub struct TaskModel {
    pub task_type: InlineStr,
    pub status: TaskStatus,
    pub reference_task_name: InlineStr,
    pub retry_count: i32,
    /// Sibling position within a fan-out, in declaration/supply order.
    pub seq: i32,
    pub correlation_id: InlineStr,
    pub task_def_name: InlineStr,
    /// Time when the task was scheduled
    pub scheduled_time: i64,
    pub start_delay_in_seconds: i32,
    /// Identifier of the unit this one retries, empty on first attempts.
    pub retried_task_id: InlineStr,
    pub response_timeout_seconds: i64,
    pub workflow_instance_id: InlineStr,
    pub workflow_type: InlineStr,
    pub task_id: InlineStr,
    pub callback_after_seconds: i64,
    pub workflow_task: Option<WorkflowTask>,
    pub rate_limit_per_frequency: i32,
    pub rate_limit_frequency_in_seconds: i32,
    pub workflow_priority: i32,
    /// Inherited from the task definition when present and non-empty,
    /// otherwise left empty. Never defaulted here.
    pub execution_name_space: InlineStr,
    pub isolation_group_id: InlineStr,
    /// Identifier shared by all sibling units fanned out from one fork.
    pub fork_task_id: InlineStr,
    pub sub_workflow_id: InlineStr,
    pub input_data: HashMap<InlineStr, Object>,
    pub output_data: HashMap<InlineStr, Object>,
}

impl TaskModel {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            task_type: InlineStr::new(),
            status,
            reference_task_name: InlineStr::new(),
            retry_count: 0,
            seq: 0,
            correlation_id: InlineStr::new(),
            task_def_name: InlineStr::new(),
            scheduled_time: 0,
            start_delay_in_seconds: 0,
            retried_task_id: InlineStr::new(),
            response_timeout_seconds: 0,
            workflow_instance_id: InlineStr::new(),
            workflow_type: InlineStr::new(),
            task_id: InlineStr::new(),
            callback_after_seconds: 0,
            workflow_task: None,
            rate_limit_per_frequency: 0,
            rate_limit_frequency_in_seconds: 0,
            workflow_priority: 0,
            execution_name_space: InlineStr::new(),
            isolation_group_id: InlineStr::new(),
            fork_task_id: InlineStr::new(),
            sub_workflow_id: InlineStr::new(),
            input_data: HashMap::new(),
            output_data: HashMap::new(),
        }
    }

    /// Copies isolation group and execution namespace off the definition when
    /// they are non-empty. With no definition the fields stay empty; any
    /// defaulting is the execution subsystem's job.
    pub fn apply_isolation(&mut self, task_def: &TaskDef) {
        if !task_def.isolation_group_id.is_empty() {
            self.isolation_group_id = task_def.isolation_group_id.clone();
        }
        if !task_def.execution_name_space.is_empty() {
            self.execution_name_space = task_def.execution_name_space.clone();
        }
    }
}

#[derive(Clone, Copy, Debug, EnumString, AsRefStr, PartialEq, Eq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    InProgress,
    Canceled,
    Failed,
    FailedWithTerminalError,
    Completed,
    CompletedWithErrors,
    Scheduled,
    TimedOut,
    Skipped,
}


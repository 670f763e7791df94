use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};

#[derive(Clone, Copy, Debug, EnumString, AsRefStr, PartialEq, Eq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    Simple,
    ForkJoin,
    ForkJoinDynamic,
    Switch,
    Join,
    SubWorkflow,
    Event,
    Wait,
    UserDefined,
    Terminate,
    KafkaPublish,
}

impl TaskType {
    /// Converts a task type string to `TaskType`. For an unknown string, the value is defaulted to
    /// `TaskType::USER_DEFINED`.
    pub fn of(task_type: &str) -> TaskType {
        TaskType::from_str(task_type).unwrap_or(TaskType::UserDefined)
    }
}

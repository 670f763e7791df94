use std::env;

use strum_macros::AsRefStr;

use crate::prelude::*;

pub struct EnvUtils;

impl EnvUtils {
    /// Resolves a system parameter binding: the reserved task-id parameter
    /// maps to the identifier assigned to the unit being produced, anything
    /// else falls back to a process environment variable of the same name.
    pub fn get_system_parameters_value(
        sys_param: &str,
        task_id: Option<&InlineStr>,
    ) -> Option<InlineStr> {
        if SystemParameters::WfTaskId.as_ref().eq(sys_param) {
            task_id.cloned()
        } else if let Ok(v) = env::var(sys_param) {
            Some(v.into())
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
enum SystemParameters {
    WfTaskId,
}

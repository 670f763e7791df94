use std::collections::VecDeque;

use crate::prelude::*;
use crate::{TaskType, WorkflowTask};

#[derive(Clone, Debug)]
pub struct WorkflowDef {
    /// Name of the workflow
    pub name: InlineStr,
    /// Description of the workflow
    pub description: InlineStr,
    /// Numeric field used to identify the version of the schema. Use incrementing numbers.
    pub version: i32,
    /// An array of task configurations.
    pub tasks: Vec<WorkflowTask>,
    /// List of input parameters. Used for documenting the required inputs to workflow
    pub input_parameters: Vec<InlineStr>,
    /// JSON template used to generate the output of the workflow
    pub output_parameters: HashMap<InlineStr, Object>,
    /// Default input values.
    pub input_template: HashMap<InlineStr, Object>,
    /// Current Mintaka Schema version. schemaVersion 1 is discontinued.
    pub schema_version: i32,
    /// Email address of the team that owns the workflow
    pub owner_email: InlineStr,
    pub variables: HashMap<InlineStr, Object>,
}

impl WorkflowDef {
    /// The task configuration scheduled after `task_reference_name`, walking
    /// into nested branch structures. Used by the fork mappers to check that a
    /// fork is followed by a JOIN.
    pub fn get_next_task(&self, task_reference_name: &str) -> Option<&WorkflowTask> {
        if let Some(workflow_task) = self.get_task_by_ref_name(task_reference_name) {
            if workflow_task.type_.eq(TaskType::Terminate.as_ref()) {
                return None;
            }
        }

        let mut iterator = self.tasks.iter();
        while let Some(task) = iterator.next() {
            if task.task_reference_name.eq(task_reference_name) {
                // If taskReferenceName matches, break out
                break;
            }
            if let Some(next_task) = task.next(task_reference_name, None) {
                return Some(next_task);
            }
            if task.has(task_reference_name) {
                break;
            }
        }

        iterator.next()
    }

    pub fn get_task_by_ref_name(&self, task_reference_name: &str) -> Option<&WorkflowTask> {
        self.collect_tasks()
            .into_iter()
            .filter(|&x| x.task_reference_name.eq(task_reference_name))
            .collect::<VecDeque<_>>()
            .pop_front()
    }

    pub fn collect_tasks(&self) -> Vec<&WorkflowTask> {
        let mut tasks = Vec::default();
        for workflow_task in &self.tasks {
            tasks.extend(workflow_task.collect_tasks())
        }
        tasks
    }
}

impl TryFrom<&serde_json::Value> for WorkflowDef {
    type Error = ErrorCode;
    fn try_from(value: &serde_json::Value) -> Result<Self, ErrorCode> {
        // Optional
        let input_parameters: Vec<InlineStr> = match value.get("inputParameters") {
            None => Vec::default(),
            Some(json) => {
                let mut input_parameters: Vec<InlineStr> = Vec::default();
                for input_param in json.as_array().ok_or_else(|| {
                    ErrorCode::IllegalArgument("inputParameters invalid, not a array")
                })? {
                    if let Some(input_p) = input_param.as_str() {
                        input_parameters.push(input_p.trim().into());
                    } else {
                        return str_err!(
                            IllegalArgument,
                            "inputParameters invalid, not a string in array"
                        );
                    }
                }
                input_parameters
            }
        };

        let output_parameters = match value.get("outputParameters") {
            Some(json) => Object::convert_jsonmap_to_hashmap(
                json.as_object()
                    .ok_or(ErrorCode::IllegalArgument("outputParameters invalid"))?,
            ),
            None => HashMap::default(),
        };

        let input_template = match value.get("inputTemplate") {
            Some(json) => Object::convert_jsonmap_to_hashmap(
                json.as_object()
                    .ok_or(ErrorCode::IllegalArgument("inputTemplate invalid"))?,
            ),
            None => HashMap::default(),
        };

        let variables = match value.get("variables") {
            Some(json) => Object::convert_jsonmap_to_hashmap(
                json.as_object()
                    .ok_or(ErrorCode::IllegalArgument("variables invalid"))?,
            ),
            None => HashMap::default(),
        };

        let tasks = WorkflowTask::try_from_jsonlist(
            value
                .get("tasks")
                .and_then(|x| x.as_array())
                .ok_or(ErrorCode::IllegalArgument("tasks invalid"))?,
        )?;
        if tasks.is_empty() {
            return str_err!(IllegalArgument, "tasks can not be empty");
        }

        Ok(Self {
            name: value
                .get("name")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("name not found"))?
                .trim()
                .into(),
            description: value
                .get("description")
                .and_then(|x| x.as_str())
                .unwrap_or("")
                .trim()
                .into(),
            version: value
                .get("version")
                .unwrap_or(&serde_json::json!(1))
                .as_i64()
                .ok_or(ErrorCode::IllegalArgument("version invalid"))? as i32,
            tasks,
            input_parameters,
            output_parameters,
            input_template,
            schema_version: value
                .get("schemaVersion")
                .unwrap_or(&serde_json::json!(2))
                .as_i64()
                .ok_or(ErrorCode::IllegalArgument("schemaVersion invalid"))?
                as i32,
            owner_email: value
                .get("ownerEmail")
                .and_then(|x| x.as_str())
                .unwrap_or("")
                .trim()
                .into(),
            variables,
        })
    }
}

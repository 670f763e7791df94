use either::Either;
use fancy_regex::Regex;
use mintaka_common::prelude::*;
use mintaka_common::{EnvUtils, TaskDef};

use crate::model::WorkflowModel;

/// Used to parse and resolve the `${...}` jsonpath bindings in task input
/// templates against the workflow and task context.
pub struct ParametersUtils;

impl ParametersUtils {
    pub fn get_task_input(
        input_params: &HashMap<InlineStr, Object>,
        workflow: &WorkflowModel,
        task_definition: Option<&TaskDef>,
        task_id: Option<&InlineStr>,
    ) -> MtkResult<HashMap<InlineStr, Object>> {
        let mut input_params = input_params.clone();
        if let Some(task_definition) = task_definition {
            for (k, v) in &task_definition.input_template {
                input_params.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }

        let workflow_params: HashMap<InlineStr, Object> = HashMap::from([
            (InlineStr::from("input"), workflow.input.clone().into()),
            (InlineStr::from("output"), workflow.output.clone().into()),
            (
                InlineStr::from("workflowId"),
                workflow.workflow_id.clone().into(),
            ),
            (
                InlineStr::from("parentWorkflowId"),
                workflow.parent_workflow_id.clone().into(),
            ),
            (
                InlineStr::from("parentWorkflowTaskId"),
                workflow.parent_workflow_task_id.clone().into(),
            ),
            (
                InlineStr::from("workflowType"),
                workflow.workflow_definition.name.clone().into(),
            ),
            (
                InlineStr::from("version"),
                workflow.workflow_definition.version.into(),
            ),
            (
                InlineStr::from("correlationId"),
                workflow.correlation_id.clone().into(),
            ),
            (
                InlineStr::from("reasonForIncompletion"),
                workflow.reason_for_incompletion.clone().into(),
            ),
            (
                InlineStr::from("schemaVersion"),
                workflow.workflow_definition.schema_version.into(),
            ),
            (
                InlineStr::from("variables"),
                workflow.variables.clone().into(),
            ),
        ]);

        let mut input_map: HashMap<InlineStr, Object> =
            HashMap::from([(InlineStr::from("workflow"), workflow_params.into())]);
        // For a new workflow being started the list of tasks will be empty
        for task in &workflow.tasks {
            let mut task_params: HashMap<InlineStr, Object> = HashMap::default();
            task_params.insert("input".into(), task.input_data.clone().into());
            task_params.insert("output".into(), task.output_data.clone().into());
            task_params.insert("taskType".into(), task.task_type.clone().into());
            task_params.insert("status".into(), task.status.as_ref().into());
            task_params.insert(
                "referenceTaskName".into(),
                task.reference_task_name.clone().into(),
            );
            task_params.insert("retryCount".into(), task.retry_count.into());
            task_params.insert("correlationId".into(), task.correlation_id.clone().into());
            task_params.insert("taskDefName".into(), task.task_def_name.clone().into());
            task_params.insert("scheduledTime".into(), task.scheduled_time.into());
            task_params.insert(
                "workflowInstanceId".into(),
                task.workflow_instance_id.clone().into(),
            );
            task_params.insert("taskId".into(), task.task_id.clone().into());
            input_map.insert(task.reference_task_name.clone(), task_params.into());
        }

        let mut document_context = Either::Left(input_map);
        let mut replaced_task_input = Self::replace(input_params, &mut document_context, task_id);
        if let Some(task_definition) = task_definition {
            if !task_definition.input_template.is_empty() {
                // If input for a given key resolves to null, try replacing it with one from
                // inputTemplate, if it exists.
                for (k, v) in replaced_task_input.iter_mut() {
                    if v.is_null() {
                        let value = task_definition
                            .input_template
                            .get(k)
                            .cloned()
                            .unwrap_or(Object::Null);
                        let _ = std::mem::replace(v, value);
                    }
                }
            }
        }
        Ok(replaced_task_input)
    }

    fn replace(
        input: HashMap<InlineStr, Object>,
        document_context: &mut Either<HashMap<InlineStr, Object>, serde_json::Value>,
        task_id: Option<&InlineStr>,
    ) -> HashMap<InlineStr, Object> {
        let mut replace_map = HashMap::with_capacity(input.len());
        for (k, v) in input {
            let new_value = match v {
                Object::String(value) => {
                    Self::replace_variables(value, document_context, task_id)
                }
                Object::Map(value) => Self::replace(value, document_context, task_id).into(),
                Object::List(value) => Self::replace_list(value, document_context, task_id).into(),
                v => v,
            };
            replace_map.insert(k, new_value);
        }
        replace_map
    }

    fn replace_list(
        input_list: Vec<Object>,
        document_context: &mut Either<HashMap<InlineStr, Object>, serde_json::Value>,
        task_id: Option<&InlineStr>,
    ) -> Vec<Object> {
        let mut replace_list = Vec::with_capacity(input_list.len());
        for v in input_list {
            let new_value = match v {
                Object::String(value) => {
                    Self::replace_variables(value, document_context, task_id)
                }
                Object::Map(value) => Self::replace(value, document_context, task_id).into(),
                Object::List(value) => Self::replace_list(value, document_context, task_id).into(),
                v => v,
            };
            replace_list.push(new_value);
        }
        replace_list
    }

    fn replace_variables(
        param_string: InlineStr,
        document_context: &mut Either<HashMap<InlineStr, Object>, serde_json::Value>,
        task_id: Option<&InlineStr>,
    ) -> Object {
        lazy_static! {
            static ref PARAM_REGEX: Regex =
                Regex::new(r"\$\{[^}]*\}").expect("regex compile error");
        }

        // Split into literal segments and ${...} bindings. A binding preceded
        // by an extra dollar ("$${...}") is an escape for a literal "${...}".
        let mut converted_values: Vec<Object> = Vec::default();
        let text = param_string.as_str();
        let mut last = 0;
        for m in PARAM_REGEX.find_iter(text).flatten() {
            let escaped = m.start() > 0 && text.as_bytes()[m.start() - 1] == b'$';
            let literal_end = if escaped { m.start() - 1 } else { m.start() };
            if literal_end > last {
                converted_values.push(text[last..literal_end].into());
            }
            if escaped {
                converted_values.push(m.as_str().into());
            } else {
                let param_path = &m.as_str()[2..m.as_str().len() - 1];
                // no value in between ${ and }, like ${} or ${  }, resolves
                // to an empty string
                if param_path.trim().is_empty() {
                    converted_values.push(InlineStr::from("").into());
                } else if let Some(sys_value) =
                    EnvUtils::get_system_parameters_value(param_path, task_id)
                {
                    converted_values.push(sys_value.into());
                } else {
                    converted_values.push(Object::read(document_context, param_path).into());
                }
            }
            last = m.end();
        }
        if last < text.len() {
            converted_values.push(text[last..].into());
        }
        if converted_values.is_empty() {
            return param_string.into();
        }

        // If the parameter String was "v1 v2 v3" then make sure to stitch it
        if converted_values.len() > 1 {
            let mut stitched = InlineStr::new();
            for val in converted_values {
                stitched.push_str(&val.to_string());
            }
            return stitched.into();
        }

        converted_values.remove(0)
    }
}

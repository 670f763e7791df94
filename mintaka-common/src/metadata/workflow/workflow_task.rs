use crate::metadata::tasks::TaskDef;
use crate::prelude::*;
use crate::{SubWorkflowParams, TaskType};

/// The static, author-time configuration of one step in a workflow graph,
/// defined as part of the `WorkflowDef`. Expansion into schedulable execution
/// units is driven entirely by `type_`.
#[derive(Clone, Debug)]
pub struct WorkflowTask {
    /// Name of the task. MUST be registered as a Task Type with Mintaka before starting workflow
    pub name: InlineStr,
    /// Alias used by the workflow graph to address this task
    pub task_reference_name: InlineStr,
    /// Type of task. SIMPLE for tasks executed by remote workers, or one of the system task types
    pub type_: InlineStr,
    /// Description of the task
    pub description: InlineStr,
    /// true or false. When set to true - workflow continues even if the task fails. The status of
    /// the task is reflected as COMPLETED_WITH_ERRORS
    pub optional: bool,
    /// JSON template that defines the input given to the task
    pub input_parameters: HashMap<InlineStr, Object>,
    /// false to mark status COMPLETED upon execution; true to keep the task IN_PROGRESS and wait
    /// for an external event to complete it.
    pub async_complete: bool,
    /// Time in seconds to wait before making the task available to be polled by a worker.
    pub start_delay: i32,

    /// SWITCH
    /// Type of the evaluator used. Only value-param is registered: the case expression arrives
    /// already resolved into the input mapping.
    pub evaluator_type: InlineStr,
    /// Reference to the provided key in inputParameters whose value selects the case.
    pub expression: InlineStr,
    /// Map where the keys are the possible values that can result from expression being evaluated
    /// by evaluatorType with values being lists of tasks to be executed.
    pub decision_cases: HashMap<InlineStr, Vec<WorkflowTask>>,
    /// List of tasks to be executed when no matching value is found in decisionCases.
    /// May be empty; an unmatched case with an empty default is a mapping failure.
    pub default_case: Vec<WorkflowTask>,

    /// FORK_JOIN
    /// One inner list per parallel branch, in declaration order.
    pub fork_tasks: Vec<Vec<WorkflowTask>>,
    /// JOIN
    pub join_on: Vec<InlineStr>,

    /// FORK_JOIN_DYNAMIC
    /// Name of the input parameter carrying the list of child task configurations.
    pub dynamic_fork_tasks_param: InlineStr,
    /// Name of the input parameter carrying the per-child input mappings, keyed by the child's
    /// task reference name.
    pub dynamic_fork_tasks_input_param_name: InlineStr,

    /// SUB_WORKFLOW
    pub sub_workflow_param: Option<SubWorkflowParams>,

    /// EVENT
    pub sink: InlineStr,

    pub retry_count: i32,
    pub task_definition: Option<TaskDef>,
}

impl WorkflowTask {
    fn children(&self) -> Vec<&Vec<WorkflowTask>> {
        let mut workflow_task_lists = Vec::default();
        match TaskType::of(self.type_.as_str()) {
            TaskType::Switch => {
                workflow_task_lists.extend(self.decision_cases.values());
                workflow_task_lists.push(&self.default_case);
            }
            TaskType::ForkJoin => workflow_task_lists.extend(&self.fork_tasks),
            _ => {}
        }
        workflow_task_lists
    }

    pub fn collect_tasks(&self) -> Vec<&WorkflowTask> {
        let mut tasks = vec![self];
        for workflow_task_list in self.children() {
            for workflow_task in workflow_task_list {
                tasks.extend(workflow_task.collect_tasks())
            }
        }
        tasks
    }

    /// Finds the task scheduled after `task_reference_name` inside this task's
    /// nested branches, if any.
    pub fn next<'a>(
        &'a self,
        task_reference_name: &str,
        parent: Option<&'a WorkflowTask>,
    ) -> Option<&WorkflowTask> {
        match TaskType::of(self.type_.as_str()) {
            TaskType::Switch => {
                for workflow_tasks in self.children() {
                    let mut iterator = workflow_tasks.iter();
                    while let Some(task) = iterator.next() {
                        if task.task_reference_name.eq(task_reference_name) {
                            break;
                        }
                        if let Some(next_task) = task.next(task_reference_name, Some(self)) {
                            return Some(next_task);
                        }
                        if task.has(task_reference_name) {
                            break;
                        }
                    }
                    if let Some(next_task) = iterator.next() {
                        return Some(next_task);
                    }
                }
            }
            TaskType::ForkJoin => {
                let mut found = false;
                for workflow_tasks in self.children() {
                    let mut iterator = workflow_tasks.iter();
                    while let Some(task) = iterator.next() {
                        if task.task_reference_name.eq(task_reference_name) {
                            found = true;
                            break;
                        }
                        if let Some(next_task) = task.next(task_reference_name, Some(self)) {
                            return Some(next_task);
                        }
                        if task.has(task_reference_name) {
                            break;
                        }
                    }
                    if let Some(next_task) = iterator.next() {
                        return Some(next_task);
                    }
                    if found && parent.is_some() {
                        // the task after a whole branch is the fork's own
                        // successor, i.e. the join -- ask the parent
                        return parent
                            .expect("checked above")
                            .next(&self.task_reference_name, parent);
                    }
                }
            }
            _ => {}
        }
        None
    }

    pub fn has(&self, task_reference_name: &str) -> bool {
        if self.task_reference_name.eq(task_reference_name) {
            return true;
        }

        match TaskType::of(self.type_.as_str()) {
            TaskType::Switch | TaskType::ForkJoin => {
                for child_list in self.children() {
                    for child in child_list {
                        if child.has(task_reference_name) {
                            return true;
                        }
                    }
                }
            }
            _ => {}
        }
        false
    }
}

impl TryFrom<&serde_json::Value> for WorkflowTask {
    type Error = ErrorCode;
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        let type_: InlineStr = value
            .get("type")
            .and_then(|x| x.as_str())
            .ok_or(ErrorCode::IllegalArgument("type not found"))?
            .trim()
            .into();

        let input_parameters = match value.get("inputParameters") {
            Some(json) => Object::convert_jsonmap_to_hashmap(
                json.as_object()
                    .ok_or(ErrorCode::IllegalArgument("inputParameters invalid"))?,
            ),
            None => HashMap::default(),
        };

        let (evaluator_type, expression, decision_cases, default_case) =
            Self::switch_try_from(&type_, value)?;

        let (fork_tasks, join_on) = Self::fork_join_try_from(&type_, value)?;

        let (dynamic_fork_tasks_param, dynamic_fork_tasks_input_param_name) =
            Self::dynamic_fork_try_from(&type_, value)?;

        let sub_workflow_param = Self::sub_workflow_try_from(&type_, value)?;

        let sink = Self::event_try_from(&type_, value)?;

        Ok(Self {
            name: value
                .get("name")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("name not found"))?
                .trim()
                .into(),
            task_reference_name: value
                .get("taskReferenceName")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("taskReferenceName not found"))?
                .trim()
                .into(),
            type_,
            description: value
                .get("description")
                .and_then(|x| x.as_str())
                .unwrap_or("")
                .trim()
                .into(),
            optional: value
                .get("optional")
                .unwrap_or(&serde_json::json!(false))
                .as_bool()
                .ok_or(ErrorCode::IllegalArgument("optional invalid"))?,
            input_parameters,
            async_complete: value
                .get("asyncComplete")
                .unwrap_or(&serde_json::json!(false))
                .as_bool()
                .ok_or(ErrorCode::IllegalArgument("asyncComplete invalid"))?,
            start_delay: value
                .get("startDelay")
                .unwrap_or(&serde_json::json!(0))
                .as_i64()
                .ok_or(ErrorCode::IllegalArgument("startDelay invalid"))?
                as i32,
            evaluator_type,
            expression,
            decision_cases,
            default_case,
            fork_tasks,
            join_on,
            dynamic_fork_tasks_param,
            dynamic_fork_tasks_input_param_name,
            sub_workflow_param,
            sink,
            retry_count: 0,
            task_definition: None,
        })
    }
}

impl WorkflowTask {
    pub fn try_from_jsonlist(jsonlist: &Vec<serde_json::Value>) -> MtkResult<Vec<Self>> {
        let mut tasks = Vec::with_capacity(jsonlist.len());
        for json in jsonlist {
            tasks.push(json.try_into()?);
        }
        Ok(tasks)
    }

    pub fn try_from_jsonmap(
        jsonmap: &serde_json::Map<String, serde_json::Value>,
    ) -> MtkResult<HashMap<InlineStr, Vec<Self>>> {
        let mut tasks = HashMap::with_capacity(jsonmap.len());
        for (k, v) in jsonmap {
            let jsonlist = v
                .as_array()
                .ok_or(ErrorCode::IllegalArgument("decisionCases invalid"))?;
            tasks.insert(k.into(), Self::try_from_jsonlist(jsonlist)?);
        }
        Ok(tasks)
    }

    fn switch_try_from(
        type_: &InlineStr,
        value: &serde_json::Value,
    ) -> MtkResult<(
        InlineStr,
        InlineStr,
        HashMap<InlineStr, Vec<WorkflowTask>>,
        Vec<WorkflowTask>,
    )> {
        if type_.eq(TaskType::Switch.as_ref()) {
            let evaluator_type: InlineStr = value
                .get("evaluatorType")
                .and_then(|x| x.as_str())
                .unwrap_or("value-param")
                .trim()
                .into();

            let expression: InlineStr = value
                .get("expression")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("expression not found"))?
                .trim()
                .into();

            let decision_cases = WorkflowTask::try_from_jsonmap(
                value
                    .get("decisionCases")
                    .and_then(|x| x.as_object())
                    .ok_or(ErrorCode::IllegalArgument("decisionCases invalid"))?,
            )?;
            if decision_cases.is_empty() {
                return fmt_err!(IllegalArgument, "decisionCases can not be empty");
            }

            // defaultCase is optional; falling through an empty default is
            // rejected at mapping time, not at parse time
            let default_case = match value.get("defaultCase") {
                Some(json) => WorkflowTask::try_from_jsonlist(
                    json.as_array()
                        .ok_or(ErrorCode::IllegalArgument("defaultCase invalid"))?,
                )?,
                None => Vec::default(),
            };
            Ok((evaluator_type, expression, decision_cases, default_case))
        } else {
            Ok((
                InlineStr::default(),
                InlineStr::default(),
                HashMap::default(),
                Vec::default(),
            ))
        }
    }

    fn fork_join_try_from(
        type_: &InlineStr,
        value: &serde_json::Value,
    ) -> MtkResult<(Vec<Vec<WorkflowTask>>, Vec<InlineStr>)> {
        let mut fork_tasks = Vec::default();
        let mut join_on = Vec::default();

        if type_.eq(TaskType::ForkJoin.as_ref()) {
            for branch in value
                .get("forkTasks")
                .and_then(|x| x.as_array())
                .ok_or(ErrorCode::IllegalArgument("forkTasks invalid"))?
            {
                let branch_tasks = branch
                    .as_array()
                    .ok_or(ErrorCode::IllegalArgument("forkTasks invalid"))?;
                fork_tasks.push(WorkflowTask::try_from_jsonlist(branch_tasks)?);
            }
        }

        if type_.eq(TaskType::Join.as_ref()) {
            for ref_name in value
                .get("joinOn")
                .and_then(|x| x.as_array())
                .ok_or(ErrorCode::IllegalArgument("joinOn invalid"))?
            {
                join_on.push(
                    ref_name
                        .as_str()
                        .ok_or(ErrorCode::IllegalArgument("joinOn invalid"))?
                        .trim()
                        .into(),
                );
            }
        }

        Ok((fork_tasks, join_on))
    }

    fn dynamic_fork_try_from(
        type_: &InlineStr,
        value: &serde_json::Value,
    ) -> MtkResult<(InlineStr, InlineStr)> {
        if type_.eq(TaskType::ForkJoinDynamic.as_ref()) {
            let tasks_param: InlineStr = value
                .get("dynamicForkTasksParam")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("dynamicForkTasksParam not found"))?
                .trim()
                .into();
            let tasks_input_param: InlineStr = value
                .get("dynamicForkTasksInputParamName")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument(
                    "dynamicForkTasksInputParamName not found",
                ))?
                .trim()
                .into();
            Ok((tasks_param, tasks_input_param))
        } else {
            Ok((InlineStr::default(), InlineStr::default()))
        }
    }

    fn sub_workflow_try_from(
        type_: &InlineStr,
        value: &serde_json::Value,
    ) -> MtkResult<Option<SubWorkflowParams>> {
        if type_.eq(TaskType::SubWorkflow.as_ref()) {
            let params = value
                .get("subWorkflowParam")
                .ok_or(ErrorCode::IllegalArgument("subWorkflowParam not found"))?;
            Ok(Some(SubWorkflowParams::try_from(params)?))
        } else {
            Ok(None)
        }
    }

    fn event_try_from(type_: &InlineStr, value: &serde_json::Value) -> MtkResult<InlineStr> {
        if type_.eq(TaskType::Event.as_ref()) {
            Ok(value
                .get("sink")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("sink not found"))?
                .trim()
                .into())
        } else {
            Ok(InlineStr::default())
        }
    }
}

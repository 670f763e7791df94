use mintaka_common::prelude::*;
use mintaka_common::WorkflowDef;

use super::task_model::TaskModel;

/// One running occurrence of a workflow definition. The mapping layer reads
/// it, never writes it.
#[derive(Clone, Debug)]
pub struct WorkflowModel {
    pub workflow_id: InlineStr,
    pub correlation_id: InlineStr,
    pub priority: i32,
    pub workflow_definition: WorkflowDef,
    pub parent_workflow_id: InlineStr,
    pub parent_workflow_task_id: InlineStr,
    pub tasks: Vec<TaskModel>,
    pub variables: HashMap<InlineStr, Object>,
    pub input: HashMap<InlineStr, Object>,
    pub output: HashMap<InlineStr, Object>,
    pub reason_for_incompletion: InlineStr,
}

impl WorkflowModel {
    pub fn new(workflow_id: InlineStr, workflow_definition: WorkflowDef) -> Self {
        let variables = workflow_definition.variables.clone();
        Self {
            workflow_id,
            correlation_id: InlineStr::new(),
            priority: 0,
            workflow_definition,
            parent_workflow_id: InlineStr::new(),
            parent_workflow_task_id: InlineStr::new(),
            tasks: Vec::default(),
            variables,
            input: HashMap::default(),
            output: HashMap::default(),
            reason_for_incompletion: InlineStr::new(),
        }
    }

    pub fn to_short_string(&self) -> String {
        format!(
            "{}.{}/{}",
            self.workflow_definition.name, self.workflow_definition.version, self.workflow_id
        )
    }
}

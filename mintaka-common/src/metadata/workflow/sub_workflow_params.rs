use crate::prelude::*;

/// Reference to the nested workflow a SUB_WORKFLOW task starts.
#[derive(Clone, Debug)]
pub struct SubWorkflowParams {
    pub name: InlineStr,
    /// Absent means "latest registered version", resolved by the execution
    /// subsystem when the nested instance is started.
    pub version: Option<i32>,
    pub task_to_domain: HashMap<InlineStr, InlineStr>,
}

impl TryFrom<&serde_json::Value> for SubWorkflowParams {
    type Error = ErrorCode;
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        let mut task_to_domain = HashMap::default();
        if let Some(json) = value.get("taskToDomain") {
            for (k, v) in json
                .as_object()
                .ok_or(ErrorCode::IllegalArgument("taskToDomain invalid"))?
            {
                let domain = v
                    .as_str()
                    .ok_or(ErrorCode::IllegalArgument("taskToDomain invalid"))?;
                task_to_domain.insert(k.into(), domain.into());
            }
        }

        Ok(Self {
            name: value
                .get("name")
                .and_then(|x| x.as_str())
                .ok_or(ErrorCode::IllegalArgument("subWorkflowParam.name not found"))?
                .trim()
                .into(),
            version: value
                .get("version")
                .and_then(|x| x.as_i64())
                .map(|x| x as i32),
            task_to_domain,
        })
    }
}

use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use mintaka_common::prelude::*;
use mintaka_common::TaskDef;
use once_cell::sync::Lazy;

/// Data access layer for registered task definitions. Mappers only ever read
/// it: absence of a definition is `None`, never an error.
pub struct MetadataDao;

static TASK_DEF: Lazy<DashMap<InlineStr, TaskDef>> = Lazy::new(DashMap::new);

impl MetadataDao {
    pub fn create_task_def(task_def: TaskDef) {
        let task_name = task_def.name.clone();
        TASK_DEF.insert(task_name, task_def);
    }

    pub fn get_task_def(name: &InlineStr) -> Option<Ref<'static, InlineStr, TaskDef>> {
        TASK_DEF.get(name)
    }

    pub fn remove_task_def(name: &InlineStr) -> MtkResult<()> {
        if TASK_DEF.remove(name).is_none() {
            fmt_err!(
                NotFound,
                "Cannot remove the task: {} - no such task definition",
                name
            )
        } else {
            Ok(())
        }
    }
}

mod dao;
mod model;
mod runtime;
mod utils;

pub use dao::MetadataDao;
pub use model::{TaskModel, TaskStatus, WorkflowModel};
pub use runtime::{
    Evaluator, EvaluatorRegistry, TaskMapper, TaskMapperContext, TaskMapperRegistry,
};
pub use utils::{IdGenerator, ParametersUtils, UuidIdGenerator};

mod execution;

pub use execution::{
    Evaluator, EvaluatorRegistry, TaskMapper, TaskMapperContext, TaskMapperRegistry,
};

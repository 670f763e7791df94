mod evaluators;
mod mapper;

pub use evaluators::{Evaluator, EvaluatorRegistry};
pub use mapper::{TaskMapper, TaskMapperContext, TaskMapperRegistry};

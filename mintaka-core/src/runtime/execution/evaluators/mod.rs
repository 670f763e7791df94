mod evaluator;
mod evaluator_registry;
mod value_param_evaluator;

pub use evaluator::Evaluator;
pub use evaluator_registry::EvaluatorRegistry;
pub use value_param_evaluator::ValueParamEvaluator;

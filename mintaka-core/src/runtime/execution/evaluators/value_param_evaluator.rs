use mintaka_common::prelude::*;

use super::Evaluator;

/// Looks the expression up as a key in the (already resolved) input mapping.
/// The only evaluator this layer registers: case expressions arrive resolved,
/// script evaluation lives outside the mapping boundary.
pub struct ValueParamEvaluator;

impl ValueParamEvaluator {
    pub const NAME: &'static str = "value-param";
}

impl Evaluator for ValueParamEvaluator {
    fn evaluate(&self, expression: &InlineStr, input: &Object) -> MtkResult<Object> {
        debug!(
            "ValueParam evaluator -- evaluating: {} with input: {:?}",
            expression, input
        );
        if let Object::Map(input) = input {
            let result = input.get(expression).cloned().unwrap_or(Object::Null);
            debug!("ValueParam evaluator -- result is: {:?}", result);
            Ok(result)
        } else {
            error!("Input has to be a Map object: {:?}", input);
            fmt_err!(EvaluationFailed, "Input has to be a Map object: {:?}", input)
        }
    }
}

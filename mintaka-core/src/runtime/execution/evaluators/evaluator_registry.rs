use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use mintaka_common::prelude::*;
use once_cell::sync::Lazy;

use super::value_param_evaluator::ValueParamEvaluator;
use super::Evaluator;

pub struct EvaluatorRegistry;

static REGISTRY: Lazy<DashMap<InlineStr, Box<dyn Evaluator>>> = Lazy::new(|| {
    let map = DashMap::new();
    map.insert(
        InlineStr::from(ValueParamEvaluator::NAME),
        Box::new(ValueParamEvaluator) as Box<dyn Evaluator>,
    );
    map
});

impl EvaluatorRegistry {
    pub fn get_evaluator(
        evaluator_type: &InlineStr,
    ) -> Option<Ref<'static, InlineStr, Box<dyn Evaluator>>> {
        REGISTRY.get(evaluator_type)
    }
}

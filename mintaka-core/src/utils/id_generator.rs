use base58::ToBase58;
use mintaka_common::prelude::*;
use numtoa::NumToA;
use uuid::Uuid;

/// Mints globally unique identifiers for execution units. Injected into the
/// mapper context rather than reached for globally, so mappers stay
/// unit-testable with deterministic identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> InlineStr;
}

/// Default generator: UUID v4 rendered in base58. Overriding the ID scheme is
/// possible but should only be done after very careful consideration.
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> InlineStr {
        Uuid::new_v4().as_bytes().to_base58().into()
    }
}

/// Deterministic descendant identifier for the retry of an existing unit:
/// distinct from the original yet reproducible from it, so re-evaluating the
/// same retry after a crash regenerates the same id.
pub fn retried_task_id(original_task_id: &InlineStr, retry_count: i32) -> InlineStr {
    let mut task_id = original_task_id.clone();
    task_id.push_str("_");
    task_id.push_str(retry_count.numtoa_str(10, &mut [0u8; 16]));
    task_id
}

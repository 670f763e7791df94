mod id_generator;
mod parameters_utils;

pub use id_generator::{retried_task_id, IdGenerator, UuidIdGenerator};
pub use parameters_utils::ParametersUtils;

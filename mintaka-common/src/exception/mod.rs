mod exception;
mod exception_code;

pub use exception::{ErrorCode, ErrorCodeBacktrace, MtkResult};

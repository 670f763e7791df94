mod env_utils;

pub use env_utils::EnvUtils;

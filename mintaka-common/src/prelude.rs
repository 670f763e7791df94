#[rustfmt::skip]
pub use crate::exception::{ErrorCode, MtkResult};
pub use crate::{fmt_err, str_err};

#[rustfmt::skip]
// std
pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList};
pub use std::ops::ControlFlow;

#[rustfmt::skip]
pub type InlineStr = smartstring::SmartString<smartstring::Compact>;
pub use lazy_static::lazy_static;
pub use once_cell::sync::{Lazy, OnceCell};

#[rustfmt::skip]
pub use log::{debug, error, info, log_enabled, trace, warn, LevelFilter};

#[rustfmt::skip]
pub use crate::common::Object;

//! Facade Module
//!
//! The cache operation set applications call: get, set, del, exists, keys,
//! delete_all_matching and flush_all over injected store and cipher handles.

mod options;
mod service;
mod value;

pub use options::{GetOptions, SetOptions};
pub use service::CacheFacade;
pub use value::CachedValue;

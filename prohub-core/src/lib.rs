pub mod catalog;
pub mod common;
pub mod content;
pub mod domain;
pub mod paths;
pub mod storage;

pub use catalog::Catalog;
pub use common::error::{ContentError, Result};
pub use domain::*;
pub use storage::{ContentStore, FileContentStore};

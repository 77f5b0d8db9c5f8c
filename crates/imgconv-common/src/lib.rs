pub mod error;
pub mod format;
pub mod path;

pub use error::{Error, Result};
pub use format::{TargetFormat, FORMAT_TABLE};
pub use path::PathManager;

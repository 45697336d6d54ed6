mod reader;
mod types;

pub use reader::{DEFAULT_FIELD, DEFAULT_LEVEL, DEFAULT_TAG, LogSampleExtractor};
pub use types::*;

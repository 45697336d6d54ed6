pub mod analysis;
pub mod error;
pub mod layout;
pub mod log;
pub mod report;
pub mod sweep;

pub use error::{Error, Result};

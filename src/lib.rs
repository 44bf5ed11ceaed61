pub mod config;
pub mod distributed;
pub mod engines;
pub mod error;
pub mod report;
pub mod types;

pub use error::{FoldError, Result};

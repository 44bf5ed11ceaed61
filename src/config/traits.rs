use crate::error::FoldError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), FoldError>;
}

/// Shorthand for the `Configuration` variant with a section prefix
pub(crate) fn invalid<S: ConfigSection>(message: impl Into<String>) -> FoldError {
    FoldError::Configuration(format!("[{}] {}", S::section_name(), message.into()))
}

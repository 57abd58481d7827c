//! Application services for the administrative surface.

pub mod posts;
pub mod settings;

use serde::Serialize;

/// A user-correctable validation failure attached to one form field.
///
/// Field errors re-render the form; they never reach the persistence layer
/// and never surface as server errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::new(field, "This field is required")
    }
}

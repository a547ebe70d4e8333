//! Validation statuses derived from properties.

use crate::map::map_as_default;
use crate::property::{Property, ReadOnlyProperty};
use alloc::string::String;
use core::fmt;

/// Outcome of validating a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValidationStatus {
    pub success: bool,
    pub error_message: String,
}

impl ValidationStatus {
    /// A passing status.
    pub fn ok() -> Self {
        Self {
            success: true,
            error_message: String::new(),
        }
    }

    /// A failing status carrying `message`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: message.into(),
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "OK")
        } else {
            write!(f, "Error: {}", self.error_message)
        }
    }
}

pub(crate) fn validate<P, F>(source: &P, error_message: String, condition: F) -> Property<ValidationStatus>
where
    P: ReadOnlyProperty,
    F: Fn(&P::Value) -> bool + 'static,
{
    map_as_default(source, move |value| {
        if condition(value) {
            ValidationStatus::ok()
        } else {
            ValidationStatus::error(error_message.clone())
        }
    })
}

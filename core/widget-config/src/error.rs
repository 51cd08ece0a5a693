//! FILENAME: core/widget-config/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid widget configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Role '{role}' is not defined for widget kind '{kind}'")]
    UnknownRole { kind: &'static str, role: String },

    #[error("Role '{role}' has an empty attribute name")]
    EmptyAttribute { role: String },

    #[error("Aggregation override for '{role}', which is not a measure role of '{kind}'")]
    NotAMeasureRole { kind: &'static str, role: String },

    #[error("Row filter condition #{index} has no attribute")]
    InvalidFilter { index: usize },

    #[error("Conditional formatting rule #{index} has no attribute")]
    InvalidRule { index: usize },

    #[error("{field} has no attribute")]
    MissingAttribute { field: &'static str },
}

//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected payload shape: {0}")]
    UnexpectedShape(String),

    #[error("Row {index} is not an object")]
    RowNotObject { index: usize },
}

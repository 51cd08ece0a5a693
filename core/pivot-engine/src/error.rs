//! FILENAME: core/pivot-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("Blank {role} attribute name")]
    BlankAttribute { role: &'static str },
}

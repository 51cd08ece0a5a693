//! FILENAME: core/pivot-engine/src/lib.rs
//! Aggregation and pivot subsystem for widget data.
//!
//! This crate groups flat rows by dimensions, reduces measures, and
//! cross-tabulates the result into dynamic columns. It depends on `engine`
//! only for shared types (Row, Value).
//!
//! Layers:
//! - `definition`: Serializable configuration (what to group and reduce)
//! - `cache`: Interning, group keys and accumulators (HOW we group)
//! - `view`: Cross-tab output for the table renderer (WHAT we display)
//! - `engine`: Calculation entry points

pub mod cache;
pub mod definition;
pub mod engine;
pub mod error;
pub mod view;

pub use cache::{AggregateAccumulator, FieldCache, Group, GroupIndex, GroupKey, OrderedFloat, ValueId, VALUE_ID_EMPTY};
pub use definition::*;
pub use self::engine::{
    aggregate_value, apply_aggregations, column_headers, composite_value, group_rows, pivot_table_data,
    try_apply_aggregations,
};
pub use error::PivotError;
pub use view::*;

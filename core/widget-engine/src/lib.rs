//! FILENAME: core/widget-engine/src/lib.rs
//! PURPOSE: Widget render pipeline.
//! CONTEXT: Wires the shared engine, the aggregation/pivot engine, the widget
//! configuration and the decoration engine into one pure function, plus a
//! memoizing session and the unified logger.

pub mod logging;
pub mod pipeline;
pub mod session;
pub mod sort;

pub use pipeline::{
    aggregate_or_raw, prefilter_rows, render_widget, ChartData, PivotData, PlaceholderReason, RenderableResult,
    TableData,
};
pub use session::WidgetSession;
pub use sort::{compare_values, order_column_headers, sort_pivoted_rows, sort_rows};

// Re-export the workspace crates so hosts depend on one crate
pub use decoration_engine;
pub use engine;
pub use pivot_engine;
pub use widget_config;

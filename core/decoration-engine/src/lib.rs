//! FILENAME: core/decoration-engine/src/lib.rs
//! PURPOSE: Cell decoration for table and pivot widgets.
//! CONTEXT: Consumes the final rows or cross-tab and produces display hints
//! (scaled percentages, visualization variants, rule colors, formatted text).

pub mod conditional_formatting;
pub mod decorator;
pub mod scaling;
pub mod visualization;

pub use conditional_formatting::{conditional_style, find_matching_rule, CellStyle, ConditionalFormattingRule};
pub use decorator::{CellDecoration, CellDecorator, ColumnStyle};
pub use scaling::{compute_pivot_ranges, compute_ranges, ValueRange, FLAT_RANGE_PERCENT};
pub use visualization::{
    color_scale_alpha, visualize, IconBand, Visualization, VisualizationKind, DEFAULT_BASE_COLOR,
};

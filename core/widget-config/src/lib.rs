//! FILENAME: core/widget-config/src/lib.rs
//! PURPOSE: Widget configuration model and resolver.
//! CONTEXT: Turns the persisted widget JSON into typed, validated properties
//! and resolves role assignments into aggregation and pivot specs.

pub mod error;
pub mod kind;
pub mod properties;
pub mod resolver;

pub use error::ConfigError;
pub use kind::{RenderShape, RoleClass, RoleSpec, WidgetDescriptor, WidgetKind};
pub use properties::{
    AggregationOverrides, AttributeList, DimensionAssignment, SortOrder, SortSpec, WidgetConfig, WidgetProperties,
};
pub use resolver::{pivot_config, resolve, resolve_aggregations, ResolvedAttributes};

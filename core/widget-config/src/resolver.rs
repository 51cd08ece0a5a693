//! FILENAME: core/widget-config/src/resolver.rs
//! PURPOSE: Translate a role assignment into engine-ready specs.
//! CONTEXT: Pure table lookup over the kind registry. Roles the kind does not
//! define are skipped here; `WidgetConfig::validate` reports them at load.

use serde::Serialize;

use pivot_engine::{AggregationConfig, AggregationType, PivotConfig};

use crate::kind::{RoleClass, WidgetKind};
use crate::properties::{AggregationOverrides, DimensionAssignment, WidgetConfig};

/// Attribute names split by purpose, in role-table order, de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedAttributes {
    pub dimensions: Vec<String>,
    pub measures: Vec<String>,
}

impl ResolvedAttributes {
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.measures.is_empty()
    }
}

/// Visits `(role key, class, attribute)` in role-table order, skipping blanks.
fn for_each_assigned(
    kind: WidgetKind,
    assignment: &DimensionAssignment,
    mut visit: impl FnMut(&'static str, RoleClass, &str),
) {
    for role in kind.descriptor().roles {
        let Some(attributes) = assignment.get(role.key) else {
            continue;
        };
        for attribute in attributes.iter().filter(|a| !a.trim().is_empty()) {
            visit(role.key, role.class, attribute);
        }
    }
}

fn push_unique(list: &mut Vec<String>, attribute: &str) {
    if !list.iter().any(|a| a == attribute) {
        list.push(attribute.to_string());
    }
}

pub fn resolve(kind: WidgetKind, assignment: &DimensionAssignment) -> ResolvedAttributes {
    let mut resolved = ResolvedAttributes::default();
    for_each_assigned(kind, assignment, |_, class, attribute| {
        if class.is_dimension() {
            push_unique(&mut resolved.dimensions, attribute);
        } else {
            push_unique(&mut resolved.measures, attribute);
        }
    });
    resolved
}

/// Aggregation spec for the widget. Each measure's function comes from
/// `overrides[role][attribute]`, defaulting to `SUM`. An attribute assigned to
/// several measure roles keeps the aggregation of the last one.
pub fn resolve_aggregations(
    kind: WidgetKind,
    assignment: &DimensionAssignment,
    overrides: &AggregationOverrides,
) -> AggregationConfig {
    let mut config = AggregationConfig::new();
    for_each_assigned(kind, assignment, |role, class, attribute| {
        if class.is_dimension() {
            config.add_dimension(attribute);
        } else {
            let aggregation = overrides
                .get(role)
                .and_then(|by_attribute| by_attribute.get(attribute))
                .copied()
                .unwrap_or(AggregationType::Sum);
            config.add_measure(attribute, aggregation);
        }
    });
    config
}

/// Row axis from dimension roles, column axis from column-dimension roles,
/// cell values from measure roles.
pub fn pivot_config(kind: WidgetKind, assignment: &DimensionAssignment) -> PivotConfig {
    let mut config = PivotConfig::default();
    for_each_assigned(kind, assignment, |_, class, attribute| {
        let axis = match class {
            RoleClass::Dimension => &mut config.row_attrs,
            RoleClass::ColumnDimension => &mut config.column_attrs,
            RoleClass::Measure => &mut config.value_attrs,
        };
        push_unique(axis, attribute);
    });
    config
}

impl WidgetConfig {
    pub fn resolved_attributes(&self) -> ResolvedAttributes {
        resolve(self.kind, &self.properties.chart_dimensions)
    }

    pub fn aggregation_config(&self) -> AggregationConfig {
        resolve_aggregations(
            self.kind,
            &self.properties.chart_dimensions,
            &self.properties.chart_dimension_aggregations,
        )
    }

    pub fn pivot_config(&self) -> PivotConfig {
        pivot_config(self.kind, &self.properties.chart_dimensions)
    }
}

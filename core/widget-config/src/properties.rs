//! FILENAME: core/widget-config/src/properties.rs
//! PURPOSE: Typed, validated widget configuration as persisted by the editor.
//! CONTEXT: Properties are parsed and validated once at load. Every consumer
//! downstream reads plain fields instead of probing a loose property bag.

use std::collections::BTreeMap;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use decoration_engine::{ColumnStyle, ConditionalFormattingRule};
use engine::{DateRangeConfig, FilterGroup};
use pivot_engine::AggregationType;

use crate::error::ConfigError;
use crate::kind::{RoleClass, WidgetDescriptor, WidgetKind};

// ============================================================================
// ATTRIBUTE ASSIGNMENT
// ============================================================================

/// Attribute names assigned to one role. Persisted either as a single string
/// or as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct AttributeList(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
    None(()),
}

impl From<OneOrMany> for AttributeList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(name) => AttributeList(vec![name]),
            OneOrMany::Many(names) => AttributeList(names),
            OneOrMany::None(()) => AttributeList::default(),
        }
    }
}

impl AttributeList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AttributeList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AttributeList(iter.into_iter().map(Into::into).collect())
    }
}

/// `chartDimensions`: role key -> attribute names.
pub type DimensionAssignment = BTreeMap<String, AttributeList>;

/// `chartDimensionAggregations`: role key -> attribute -> aggregation.
pub type AggregationOverrides = BTreeMap<String, BTreeMap<String, AggregationType>>;

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    #[serde(alias = "asc")]
    Asc,
    #[serde(alias = "desc")]
    Desc,
}

/// `rowSort` / `columnSort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub attribute: String,
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(attribute: impl Into<String>, order: SortOrder) -> Self {
        SortSpec {
            attribute: attribute.into(),
            order,
        }
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub chart_dimensions: DimensionAssignment,
    pub chart_dimension_aggregations: AggregationOverrides,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_filters: Option<FilterGroup>,
    pub conditional_formatting_rules: Vec<ConditionalFormattingRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range_config: Option<DateRangeConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_sort: Option<SortSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_sort: Option<SortSpec>,
    pub column_styles: BTreeMap<String, ColumnStyle>,
}

impl WidgetProperties {
    /// Assigns attributes to a role, replacing any previous assignment.
    pub fn assign<I, S>(&mut self, role: &str, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart_dimensions
            .insert(role.to_string(), attributes.into_iter().collect());
    }

    pub fn set_aggregation(&mut self, role: &str, attribute: &str, aggregation: AggregationType) {
        self.chart_dimension_aggregations
            .entry(role.to_string())
            .or_default()
            .insert(attribute.to_string(), aggregation);
    }

    /// True when at least one attribute is assigned to any role.
    pub fn has_assignments(&self) -> bool {
        self.chart_dimensions
            .values()
            .any(|list| list.iter().any(|a| !a.trim().is_empty()))
    }

    fn validate(&self, kind: WidgetKind, descriptor: &WidgetDescriptor) -> Result<(), ConfigError> {
        for (role, attributes) in &self.chart_dimensions {
            if descriptor.role(role).is_none() {
                return Err(ConfigError::UnknownRole {
                    kind: kind.as_str(),
                    role: role.clone(),
                });
            }
            if attributes.iter().any(|a| a.trim().is_empty()) {
                return Err(ConfigError::EmptyAttribute { role: role.clone() });
            }
        }

        for role in self.chart_dimension_aggregations.keys() {
            match descriptor.role(role) {
                Some(spec) if spec.class == RoleClass::Measure => {}
                _ => {
                    return Err(ConfigError::NotAMeasureRole {
                        kind: kind.as_str(),
                        role: role.clone(),
                    })
                }
            }
        }

        if let Some(filters) = &self.row_filters {
            if let Some(index) = filters.conditions().iter().position(|c| c.attribute.trim().is_empty()) {
                return Err(ConfigError::InvalidFilter { index });
            }
        }

        if let Some(index) = self
            .conditional_formatting_rules
            .iter()
            .position(|r| r.attribute.trim().is_empty())
        {
            return Err(ConfigError::InvalidRule { index });
        }

        if let Some(range) = &self.date_range_config {
            if range.attribute.trim().is_empty() && range.bounds().is_bounded() {
                return Err(ConfigError::MissingAttribute {
                    field: "dateRangeConfig",
                });
            }
        }

        for (field, sort) in [("rowSort", &self.row_sort), ("columnSort", &self.column_sort)] {
            if matches!(sort, Some(spec) if spec.attribute.trim().is_empty()) {
                return Err(ConfigError::MissingAttribute { field });
            }
        }

        Ok(())
    }
}

// ============================================================================
// WIDGET CONFIG
// ============================================================================

/// A widget as stored in a dashboard: its kind plus its properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: WidgetKind,
    #[serde(default)]
    pub properties: WidgetProperties,
}

impl WidgetConfig {
    pub fn new(kind: WidgetKind) -> Self {
        WidgetConfig {
            id: None,
            kind,
            properties: WidgetProperties::default(),
        }
    }

    /// Parses and validates a persisted widget.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: WidgetConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.properties.validate(self.kind, self.descriptor())
    }

    pub fn descriptor(&self) -> &'static WidgetDescriptor {
        self.kind.descriptor()
    }

    /// Content hash of the configuration, for render memoization.
    /// Map-valued sections serialize in sorted key order.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        match serde_json::to_vec(self) {
            Ok(bytes) => hasher.write(&bytes),
            Err(_) => hasher.write_u8(0),
        }
        hasher.finish()
    }
}

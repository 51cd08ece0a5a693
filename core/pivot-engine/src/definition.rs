//! FILENAME: core/pivot-engine/src/definition.rs
//! Aggregation and Pivot Definitions - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE an aggregation or a
//! pivot. They are built by the widget configuration resolver and are
//! immutable snapshots of user intent for a single recompute.

use serde::{Deserialize, Serialize};

use crate::error::PivotError;

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported reduction functions for measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    #[default]
    Sum,
    Avg,
    Count,
    CountDistinct,
    Min,
    Max,
    /// First numeric value observed, no reduction.
    None,
}

/// A measure attribute with the function that reduces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureSpec {
    pub attribute: String,
    pub aggregation: AggregationType,
}

impl MeasureSpec {
    pub fn new(attribute: impl Into<String>, aggregation: AggregationType) -> Self {
        MeasureSpec {
            attribute: attribute.into(),
            aggregation,
        }
    }
}

/// What to group by and what to reduce.
///
/// `dimensions` is treated as an ordered set and `measures` as an ordered
/// map: adding a measure for an attribute that already has one replaces its
/// aggregation (last one wins) without moving it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub measures: Vec<MeasureSpec>,
}

impl AggregationConfig {
    pub fn new() -> Self {
        AggregationConfig::default()
    }

    pub fn with_dimension(mut self, attribute: impl Into<String>) -> Self {
        self.add_dimension(attribute);
        self
    }

    pub fn with_measure(mut self, attribute: impl Into<String>, aggregation: AggregationType) -> Self {
        self.add_measure(attribute, aggregation);
        self
    }

    pub fn add_dimension(&mut self, attribute: impl Into<String>) {
        let attribute = attribute.into();
        if !self.dimensions.contains(&attribute) {
            self.dimensions.push(attribute);
        }
    }

    pub fn add_measure(&mut self, attribute: impl Into<String>, aggregation: AggregationType) {
        let attribute = attribute.into();
        match self.measures.iter_mut().find(|m| m.attribute == attribute) {
            Some(existing) => existing.aggregation = aggregation,
            None => self.measures.push(MeasureSpec { attribute, aggregation }),
        }
    }

    /// Dimensions with duplicates removed, first occurrence kept.
    pub fn effective_dimensions(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.dimensions.len());
        for d in &self.dimensions {
            if !out.contains(&d.as_str()) {
                out.push(d);
            }
        }
        out
    }

    /// Measures with one entry per attribute: first position, last aggregation.
    pub fn effective_measures(&self) -> Vec<(&str, AggregationType)> {
        let mut out: Vec<(&str, AggregationType)> = Vec::with_capacity(self.measures.len());
        for m in &self.measures {
            match out.iter_mut().find(|(attr, _)| *attr == m.attribute) {
                Some(slot) => slot.1 = m.aggregation,
                None => out.push((&m.attribute, m.aggregation)),
            }
        }
        out
    }

    pub fn aggregation_for(&self, attribute: &str) -> Option<AggregationType> {
        self.measures
            .iter()
            .rev()
            .find(|m| m.attribute == attribute)
            .map(|m| m.aggregation)
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty() && self.measures.is_empty()
    }

    /// Rejects blank attribute names.
    pub fn validate(&self) -> Result<(), PivotError> {
        if self.dimensions.iter().any(|d| d.trim().is_empty()) {
            return Err(PivotError::BlankAttribute { role: "dimension" });
        }
        if self.measures.iter().any(|m| m.attribute.trim().is_empty()) {
            return Err(PivotError::BlankAttribute { role: "measure" });
        }
        Ok(())
    }
}

// ============================================================================
// PIVOT
// ============================================================================

/// Which attributes form the row axis, the column axis and the cell values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotConfig {
    #[serde(default)]
    pub row_attrs: Vec<String>,
    #[serde(default)]
    pub column_attrs: Vec<String>,
    #[serde(default)]
    pub value_attrs: Vec<String>,
}

impl PivotConfig {
    pub fn new(row_attrs: Vec<String>, column_attrs: Vec<String>, value_attrs: Vec<String>) -> Self {
        PivotConfig {
            row_attrs,
            column_attrs,
            value_attrs,
        }
    }

    /// A cross-tab only exists when something is on the column axis.
    pub fn should_pivot(&self) -> bool {
        !self.column_attrs.is_empty()
    }

    /// Pivot-table mode (cells hold value attributes) vs. plain table mode.
    pub fn has_values(&self) -> bool {
        !self.value_attrs.is_empty()
    }

    /// Row or column attribute; such keys are metadata inside a cell.
    pub fn is_axis_attribute(&self, attribute: &str) -> bool {
        self.row_attrs.iter().any(|a| a == attribute) || self.column_attrs.iter().any(|a| a == attribute)
    }
}

//! FILENAME: core/decoration-engine/src/decorator.rs
//! PURPOSE: Per-cell decoration queries for the table renderer.
//! CONTEXT: A `CellDecorator` is built once per recompute from the final
//! result set, then answers `decorate(attribute, value)` for every cell.
//! Values are never modified; decorations are display hints only.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use engine::{format_value, Color, NumberFormat, Row, Value};
use pivot_engine::PivotResult;

use crate::conditional_formatting::{find_matching_rule, ConditionalFormattingRule};
use crate::scaling::{compute_pivot_ranges, compute_ranges, ValueRange};
use crate::visualization::{visualize, Visualization, VisualizationKind, DEFAULT_BASE_COLOR};

/// Per-attribute display settings (`columnStyles` in widget properties).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisualizationKind>,
    /// Base color as CSS hex; unparseable colors fall back to the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub number_format: NumberFormat,
}

impl ColumnStyle {
    pub fn base_color(&self) -> Color {
        self.color
            .as_deref()
            .and_then(Color::from_hex)
            .unwrap_or(DEFAULT_BASE_COLOR)
    }
}

/// Everything the renderer needs to draw one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDecoration {
    pub display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<Visualization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CellDecorator {
    ranges: FxHashMap<String, ValueRange>,
    styles: BTreeMap<String, ColumnStyle>,
    rules: Vec<ConditionalFormattingRule>,
}

impl CellDecorator {
    pub fn new(styles: BTreeMap<String, ColumnStyle>, rules: Vec<ConditionalFormattingRule>) -> Self {
        CellDecorator {
            ranges: FxHashMap::default(),
            styles,
            rules,
        }
    }

    /// Decorator for a flat result; scales `attributes` over all `rows`.
    pub fn for_rows(
        rows: &[Row],
        attributes: &[String],
        styles: BTreeMap<String, ColumnStyle>,
        rules: Vec<ConditionalFormattingRule>,
    ) -> Self {
        let mut decorator = CellDecorator::new(styles, rules);
        decorator.ranges = compute_ranges(rows, attributes);
        decorator
    }

    /// Decorator for a cross-tab; scales `value_attrs` over every cell.
    pub fn for_pivot(
        result: &PivotResult,
        value_attrs: &[String],
        styles: BTreeMap<String, ColumnStyle>,
        rules: Vec<ConditionalFormattingRule>,
    ) -> Self {
        let mut decorator = CellDecorator::new(styles, rules);
        decorator.ranges = compute_pivot_ranges(result, value_attrs);
        decorator
    }

    pub fn range(&self, attribute: &str) -> Option<ValueRange> {
        self.ranges.get(attribute).copied()
    }

    pub fn style(&self, attribute: &str) -> Option<&ColumnStyle> {
        self.styles.get(attribute)
    }

    pub fn rules(&self) -> &[ConditionalFormattingRule] {
        &self.rules
    }

    /// Scaled position of `value` within the attribute's range.
    pub fn percent(&self, attribute: &str, value: &Value) -> Option<f64> {
        let n = value.as_number()?;
        self.range(attribute).map(|r| r.percent(n))
    }

    pub fn decorate(&self, attribute: &str, value: &Value) -> CellDecoration {
        let style = self.style(attribute);
        let number_format = style.map(|s| s.number_format).unwrap_or_default();

        let mut decoration = CellDecoration {
            display: format_value(value, number_format),
            percent: self.percent(attribute, value),
            ..CellDecoration::default()
        };

        if let (Some(style), Some(percent)) = (style, decoration.percent) {
            if let Some(kind) = style.visualization {
                decoration.visualization = Some(visualize(kind, percent, style.base_color()));
            }
        }

        if let Some(rule) = find_matching_rule(&self.rules, attribute, value) {
            decoration.text_color = rule.text_color.clone();
            decoration.background_color = rule.background_color.clone();
        }

        decoration
    }

    /// Decorations for every attribute of a row, in row order.
    pub fn decorate_row(&self, row: &Row) -> Vec<(String, CellDecoration)> {
        row.iter()
            .map(|(attribute, value)| (attribute.to_string(), self.decorate(attribute, value)))
            .collect()
    }
}

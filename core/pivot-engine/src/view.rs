//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - The cross-tab handed to the table renderer.
//!
//! A `PivotResult` is rows x dynamic column headers. Every row carries an
//! entry for every header; `None` marks an empty intersection.

use std::collections::BTreeMap;

use serde::Serialize;

use engine::Row;

/// Maximum characters of a plain-table cell summary before it is elided.
pub const CELL_SUMMARY_MAX_CHARS: usize = 50;

/// Separator between the parts of a composite row or column value.
pub const COMPOSITE_SEPARATOR: &str = " | ";

/// One output row of the cross-tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotedRow {
    /// Composite row-axis value, or the source index when there is no row axis.
    pub row_key: String,
    /// Row-axis attribute values of the group's first row.
    pub row_values: Row,
    /// Header -> cell. A cell maps value attributes (or copied attributes) to values.
    pub cells: BTreeMap<String, Option<Row>>,
}

impl PivotedRow {
    pub fn cell(&self, header: &str) -> Option<&Row> {
        self.cells.get(header).and_then(|c| c.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotResult {
    pub pivoted_data: Vec<PivotedRow>,
    pub column_headers: Vec<String>,
}

impl PivotResult {
    pub fn is_empty(&self) -> bool {
        self.pivoted_data.is_empty() && self.column_headers.is_empty()
    }

    /// Every non-empty cell in row-major, header order.
    pub fn cells(&self) -> impl Iterator<Item = &Row> {
        self.pivoted_data.iter().flat_map(move |row| {
            self.column_headers.iter().filter_map(move |header| row.cell(header))
        })
    }
}

/// Stringifies one intersection for display.
///
/// Pivot-table mode returns the named value attribute; plain-table mode
/// summarizes every non-axis attribute as `"k: v, k2: v2"`. Missing cells
/// (and missing attributes) render as the empty string.
pub fn get_pivot_cell_value(
    row: &PivotedRow,
    header: &str,
    value_attr: Option<&str>,
    row_attrs: &[String],
    column_attrs: &[String],
    has_values: bool,
) -> String {
    let Some(cell) = row.cell(header) else {
        return String::new();
    };

    if has_values {
        return match value_attr {
            Some(attr) => cell.value(attr).to_display_string(),
            None => String::new(),
        };
    }

    let is_metadata = |key: &str| row_attrs.iter().any(|a| a == key) || column_attrs.iter().any(|a| a == key);
    let summary = cell
        .iter()
        .filter(|(key, _)| !is_metadata(key))
        .map(|(key, value)| format!("{}: {}", key, value.to_display_string()))
        .collect::<Vec<_>>()
        .join(", ");

    truncate_with_ellipsis(&summary, CELL_SUMMARY_MAX_CHARS)
}

fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

//! FILENAME: core/pivot-engine/src/engine.rs
//! Aggregation & Pivot Engine - The calculation core.
//!
//! Algorithm:
//! 1. Partition rows by their dimension values (first-seen group order)
//! 2. Reduce every measure per group with an accumulator
//! 3. Optionally cross-tabulate the result: group by the row axis, spread the
//!    distinct column-axis values into sorted dynamic headers
//!
//! Nothing here fails on bad data. Missing or non-numeric values simply
//! produce `Value::Null` cells.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;

use engine::{Row, Value};

use crate::cache::{AggregateAccumulator, GroupIndex};
use crate::definition::{AggregationConfig, AggregationType, PivotConfig};
use crate::error::PivotError;
use crate::view::{PivotResult, PivotedRow, COMPOSITE_SEPARATOR};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Reduces `attribute` over `rows`.
///
/// Missing and non-numeric values are dropped before reduction; `COUNT`
/// still counts every row. Returns `None` for an empty numeric list, except
/// for the two counting functions.
pub fn aggregate_value<'a, I>(rows: I, attribute: &str, aggregation: AggregationType) -> Option<f64>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut acc = AggregateAccumulator::for_type(aggregation);
    for row in rows {
        acc.add_value(row.value(attribute));
    }
    acc.compute(aggregation)
}

/// Partitions `rows` by the given dimensions.
pub fn group_rows(rows: &[Row], dimensions: &[&str]) -> GroupIndex {
    let mut index = GroupIndex::new(dimensions);
    for (i, row) in rows.iter().enumerate() {
        index.add_row(i, dimensions.iter().map(|d| row.value(d)));
    }
    index
}

/// Groups and reduces `rows`.
///
/// Output rows hold the group's first-seen dimension values followed by one
/// value per measure, in first-seen group order. Without dimensions the whole
/// input collapses into a single row; without dimensions and measures the
/// input is returned unchanged. Aggregates that overflow become null.
pub fn apply_aggregations(rows: &[Row], config: &AggregationConfig) -> Vec<Row> {
    let measures = config.effective_measures();
    let mut output = aggregate_rows(rows, config);
    if measures.is_empty() {
        return output;
    }
    for row in &mut output {
        for (attribute, _) in &measures {
            if non_finite(row.value(attribute)) {
                row.insert(*attribute, Value::Null);
            }
        }
    }
    output
}

/// Checked variant of [`apply_aggregations`] for callers that prefer the raw
/// rows over a doubtful configuration: rejects blank attribute names. Data
/// problems still only null the affected cell.
pub fn try_apply_aggregations(rows: &[Row], config: &AggregationConfig) -> Result<Vec<Row>, PivotError> {
    config.validate()?;
    Ok(apply_aggregations(rows, config))
}

fn non_finite(value: &Value) -> bool {
    matches!(value, Value::Number(n) if !n.is_finite())
}

fn aggregate_rows(rows: &[Row], config: &AggregationConfig) -> Vec<Row> {
    let dimensions = config.effective_dimensions();
    let measures = config.effective_measures();

    if dimensions.is_empty() {
        if measures.is_empty() {
            return rows.to_vec();
        }
        let mut total = Row::with_capacity(measures.len());
        for (attribute, aggregation) in &measures {
            total.insert(*attribute, aggregate_value(rows, attribute, *aggregation));
        }
        return vec![total];
    }

    let index = group_rows(rows, &dimensions);
    let mut output = Vec::with_capacity(index.len());
    for group in index.groups() {
        let Some(&first) = group.rows.first() else {
            continue;
        };
        let mut out = Row::with_capacity(dimensions.len() + measures.len());
        for dimension in &dimensions {
            out.insert(*dimension, rows[first].value(dimension).clone());
        }
        for (attribute, aggregation) in &measures {
            let members = group.rows.iter().map(|&i| &rows[i]);
            out.insert(*attribute, aggregate_value(members, attribute, *aggregation));
        }
        output.push(out);
    }
    output
}

// ============================================================================
// PIVOT
// ============================================================================

/// Joins the string coercion of `attributes` with `" | "`.
pub fn composite_value(row: &Row, attributes: &[String]) -> String {
    attributes
        .iter()
        .map(|a| row.value(a).to_display_string())
        .collect::<Vec<_>>()
        .join(COMPOSITE_SEPARATOR)
}

/// Sorted, de-duplicated composite column values.
pub fn column_headers(rows: &[Row], column_attrs: &[String]) -> Vec<String> {
    rows.iter()
        .map(|row| composite_value(row, column_attrs))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Cross-tabulates `rows` into dynamic columns.
///
/// Returns an empty result when there is no column axis or no data.
pub fn pivot_table_data(rows: &[Row], config: &PivotConfig) -> PivotResult {
    if !config.should_pivot() || rows.is_empty() {
        return PivotResult::default();
    }

    let column_values: Vec<String> = rows
        .iter()
        .map(|row| composite_value(row, &config.column_attrs))
        .collect();
    let column_headers: Vec<String> = column_values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let empty_cells = || -> BTreeMap<String, Option<Row>> {
        column_headers.iter().map(|h| (h.clone(), None)).collect()
    };

    if config.row_attrs.is_empty() {
        let pivoted_data = rows
            .iter()
            .zip(&column_values)
            .enumerate()
            .map(|(i, (row, column))| {
                let mut cells = empty_cells();
                cells.insert(column.clone(), Some(row.clone()));
                PivotedRow {
                    row_key: i.to_string(),
                    row_values: Row::new(),
                    cells,
                }
            })
            .collect();
        return PivotResult {
            pivoted_data,
            column_headers,
        };
    }

    let mut positions: FxHashMap<String, usize> = FxHashMap::default();
    let mut pivoted_data: Vec<PivotedRow> = Vec::new();

    for (row, column) in rows.iter().zip(&column_values) {
        let row_key = composite_value(row, &config.row_attrs);
        let pos = match positions.get(&row_key) {
            Some(&pos) => pos,
            None => {
                let pos = pivoted_data.len();
                positions.insert(row_key.clone(), pos);
                pivoted_data.push(PivotedRow {
                    row_key,
                    row_values: project(row, &config.row_attrs),
                    cells: empty_cells(),
                });
                pos
            }
        };

        let slot = pivoted_data[pos].cells.entry(column.clone()).or_insert(None);
        if config.has_values() {
            merge_value_cell(slot, row, &config.value_attrs);
        } else if slot.is_none() {
            *slot = Some(plain_cell(row, config));
        }
    }

    PivotResult {
        pivoted_data,
        column_headers,
    }
}

fn project(row: &Row, attributes: &[String]) -> Row {
    attributes
        .iter()
        .map(|a| (a.as_str(), row.value(a).clone()))
        .collect()
}

/// Numbers colliding on one intersection are summed; anything else keeps
/// the first value seen.
fn merge_value_cell(slot: &mut Option<Row>, row: &Row, value_attrs: &[String]) {
    let Some(cell) = slot.as_mut() else {
        *slot = Some(project(row, value_attrs));
        return;
    };
    for attribute in value_attrs {
        let summed = match (cell.value(attribute), row.value(attribute)) {
            (Value::Number(existing), Value::Number(incoming)) => Some(existing + incoming),
            _ => None,
        };
        if let Some(sum) = summed {
            cell.insert(attribute.as_str(), sum);
        }
    }
}

/// Every non-axis attribute of the row, or the whole row if there is none.
fn plain_cell(row: &Row, config: &PivotConfig) -> Row {
    let extra: Row = row
        .iter()
        .filter(|(key, _)| !config.is_axis_attribute(key))
        .map(|(key, value)| (key, value.clone()))
        .collect();
    if extra.is_empty() {
        row.clone()
    } else {
        extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::row;

    fn sales() -> Vec<Row> {
        vec![
            row! { "region" => "East", "product" => "A", "sales" => 100.0 },
            row! { "region" => "East", "product" => "B", "sales" => 50.0 },
            row! { "region" => "West", "product" => "A", "sales" => 75.0 },
        ]
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_group_and_sum_first_seen_order() {
        let config = AggregationConfig::new()
            .with_dimension("region")
            .with_measure("sales", AggregationType::Sum);
        let result = apply_aggregations(&sales(), &config);
        assert_eq!(
            result,
            vec![
                row! { "region" => "East", "sales" => 150.0 },
                row! { "region" => "West", "sales" => 75.0 },
            ]
        );
    }

    #[test]
    fn test_no_dimensions_single_row() {
        let config = AggregationConfig::new()
            .with_measure("sales", AggregationType::Max)
            .with_measure("product", AggregationType::Count);
        let result = apply_aggregations(&sales(), &config);
        assert_eq!(result, vec![row! { "sales" => 100.0, "product" => 3.0 }]);
    }

    #[test]
    fn test_no_dimensions_no_measures_passthrough() {
        let rows = sales();
        assert_eq!(apply_aggregations(&rows, &AggregationConfig::new()), rows);
    }

    #[test]
    fn test_null_group_is_distinct_from_empty_string() {
        let rows = vec![
            row! { "region" => Value::Null, "sales" => 1.0 },
            row! { "sales" => 2.0 },
            row! { "region" => "", "sales" => 4.0 },
        ];
        let config = AggregationConfig::new()
            .with_dimension("region")
            .with_measure("sales", AggregationType::Sum);
        let result = apply_aggregations(&rows, &config);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].value("region"), &Value::Null);
        assert_eq!(result[0].value("sales"), &Value::Number(3.0));
        assert_eq!(result[1].value("sales"), &Value::Number(4.0));
    }

    #[test]
    fn test_empty_numeric_list_is_null() {
        let rows = vec![
            row! { "team" => "x", "score" => "n/a" },
            row! { "team" => "x" },
        ];
        let config = AggregationConfig::new()
            .with_dimension("team")
            .with_measure("score", AggregationType::Avg);
        let result = apply_aggregations(&rows, &config);
        assert_eq!(result[0].value("score"), &Value::Null);

        assert_eq!(aggregate_value(&rows, "score", AggregationType::Count), Some(2.0));
        assert_eq!(aggregate_value(&rows, "score", AggregationType::CountDistinct), Some(0.0));
        assert_eq!(aggregate_value(&rows, "score", AggregationType::None), None);
    }

    #[test]
    fn test_none_takes_first_numeric() {
        let rows = vec![
            row! { "v" => "abc" },
            row! { "v" => "7" },
            row! { "v" => 3.0 },
        ];
        assert_eq!(aggregate_value(&rows, "v", AggregationType::None), Some(7.0));
        assert_eq!(aggregate_value(&rows, "v", AggregationType::Min), Some(3.0));
    }

    #[test]
    fn test_grouping_partitions_completely() {
        let mut rows = sales();
        rows.push(row! { "product" => "C", "sales" => "bad" });
        rows.push(row! { "region" => "North", "sales" => 1.0 });
        for dims in [vec![], vec!["region"], vec!["region", "product"], vec!["missing"]] {
            let mut config = AggregationConfig::new().with_measure("__count", AggregationType::Count);
            for d in &dims {
                config.add_dimension(*d);
            }
            let total: f64 = apply_aggregations(&rows, &config)
                .iter()
                .filter_map(|r| r.value("__count").as_number())
                .sum();
            assert_eq!(total as usize, rows.len(), "dims {:?}", dims);
        }
    }

    #[test]
    fn test_avg_and_distinct_properties() {
        let rows = vec![
            row! { "k" => "a", "v" => 2.0 },
            row! { "k" => "a", "v" => 2.0 },
            row! { "k" => "a", "v" => 5.0 },
            row! { "k" => "b", "v" => 1.5 },
        ];
        let index = group_rows(&rows, &["k"]);
        for group in index.groups() {
            let members: Vec<&Row> = group.rows.iter().map(|&i| &rows[i]).collect();
            let sum = aggregate_value(members.iter().copied(), "v", AggregationType::Sum).unwrap();
            let count = aggregate_value(members.iter().copied(), "v", AggregationType::Count).unwrap();
            let avg = aggregate_value(members.iter().copied(), "v", AggregationType::Avg).unwrap();
            let distinct = aggregate_value(members.iter().copied(), "v", AggregationType::CountDistinct).unwrap();
            assert!((avg - sum / count).abs() < 1e-9);
            assert!(distinct <= count);
        }
    }

    #[test]
    fn test_measure_overwrites_same_named_dimension() {
        let config = AggregationConfig::new()
            .with_dimension("sales")
            .with_measure("sales", AggregationType::Count);
        let result = apply_aggregations(&sales(), &config);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|r| r.value("sales") == &Value::Number(1.0)));
    }

    #[test]
    fn test_try_apply_rejects_configs_and_nulls_overflow() {
        let blank = AggregationConfig::new().with_dimension("");
        assert!(try_apply_aggregations(&sales(), &blank).is_err());

        let huge = vec![
            row! { "k" => "a", "v" => f64::MAX },
            row! { "k" => "a", "v" => f64::MAX },
            row! { "k" => "b", "v" => 2.0 },
        ];
        let config = AggregationConfig::new()
            .with_dimension("k")
            .with_measure("v", AggregationType::Sum);
        let expected = vec![
            row! { "k" => "a", "v" => Value::Null },
            row! { "k" => "b", "v" => 2.0 },
        ];
        assert_eq!(try_apply_aggregations(&huge, &config), Ok(expected.clone()));
        assert_eq!(apply_aggregations(&huge, &config), expected);
    }

    #[test]
    fn test_pivot_scenario() {
        let config = PivotConfig::new(strings(&["region"]), strings(&["product"]), strings(&["sales"]));
        let result = pivot_table_data(&sales(), &config);
        assert_eq!(result.column_headers, strings(&["A", "B"]));
        assert_eq!(result.pivoted_data.len(), 2);

        let east = &result.pivoted_data[0];
        assert_eq!(east.row_key, "East");
        assert_eq!(east.row_values, row! { "region" => "East" });
        assert_eq!(east.cell("A"), Some(&row! { "sales" => 100.0 }));
        assert_eq!(east.cell("B"), Some(&row! { "sales" => 50.0 }));

        let west = &result.pivoted_data[1];
        assert_eq!(west.cell("A"), Some(&row! { "sales" => 75.0 }));
        assert_eq!(west.cells.get("B"), Some(&None));
    }

    #[test]
    fn test_pivot_completeness() {
        let mut rows = sales();
        rows.push(row! { "region" => "North", "product" => "C", "sales" => 5.0 });
        let config = PivotConfig::new(strings(&["region"]), strings(&["product"]), strings(&["sales"]));
        let result = pivot_table_data(&rows, &config);
        for row in &result.pivoted_data {
            for header in &result.column_headers {
                assert!(row.cells.contains_key(header));
            }
            assert_eq!(row.cells.len(), result.column_headers.len());
        }
    }

    #[test]
    fn test_pivot_collision_merge_policy() {
        let rows = vec![
            row! { "region" => "East", "product" => "A", "sales" => 10.0, "note" => "first" },
            row! { "region" => "East", "product" => "A", "sales" => 5.0, "note" => "second" },
            row! { "region" => "East", "product" => "A", "sales" => "7", "note" => "third" },
        ];
        let config = PivotConfig::new(strings(&["region"]), strings(&["product"]), strings(&["sales", "note"]));
        let result = pivot_table_data(&rows, &config);
        let cell = result.pivoted_data[0].cell("A").unwrap();
        assert_eq!(cell.value("sales"), &Value::Number(15.0));
        assert_eq!(cell.value("note"), &Value::from("first"));
    }

    #[test]
    fn test_pivot_composite_headers() {
        let rows = vec![
            row! { "r" => "x", "c1" => "b", "c2" => 2.0, "v" => 1.0 },
            row! { "r" => "x", "c1" => "a", "c2" => 1.0, "v" => 1.0 },
        ];
        let config = PivotConfig::new(strings(&["r"]), strings(&["c1", "c2"]), strings(&["v"]));
        let result = pivot_table_data(&rows, &config);
        assert_eq!(result.column_headers, strings(&["a | 1", "b | 2"]));
    }

    #[test]
    fn test_pivot_without_row_attrs() {
        let config = PivotConfig::new(vec![], strings(&["product"]), vec![]);
        let result = pivot_table_data(&sales(), &config);
        assert_eq!(result.pivoted_data.len(), 3);
        let second = &result.pivoted_data[1];
        assert_eq!(second.row_key, "1");
        assert!(second.row_values.is_empty());
        assert_eq!(second.cell("B"), Some(&sales()[1]));
        assert_eq!(second.cells.get("A"), Some(&None));
    }

    #[test]
    fn test_pivot_plain_mode() {
        let config = PivotConfig::new(strings(&["region"]), strings(&["product"]), vec![]);
        let result = pivot_table_data(&sales(), &config);
        assert_eq!(result.pivoted_data[0].cell("A"), Some(&row! { "sales" => 100.0 }));

        let bare = vec![row! { "region" => "East", "product" => "A" }];
        let result = pivot_table_data(&bare, &config);
        assert_eq!(result.pivoted_data[0].cell("A"), Some(&bare[0]));
    }

    #[test]
    fn test_pivot_empty_inputs() {
        let config = PivotConfig::new(strings(&["region"]), vec![], strings(&["sales"]));
        assert!(pivot_table_data(&sales(), &config).is_empty());
        let config = PivotConfig::new(strings(&["region"]), strings(&["product"]), strings(&["sales"]));
        assert!(pivot_table_data(&[], &config).is_empty());
    }
}

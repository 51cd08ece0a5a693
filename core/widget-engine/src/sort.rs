//! FILENAME: core/widget-engine/src/sort.rs
//! PURPOSE: Row and column ordering for rendered widgets.
//! CONTEXT: Sorting is stable. Numbers sort before text and missing values
//! always go last; numbers compare numerically, text as strings.

use std::cmp::Ordering;

use engine::{Row, Value};
use pivot_engine::PivotedRow;
use widget_config::{SortOrder, SortSpec};

/// Sort class of a value. Classes never interleave, which keeps the order
/// total when a column mixes numbers and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortClass {
    Number,
    Text,
    Blank,
}

fn sort_class(value: &Value) -> SortClass {
    if value.is_blank() {
        SortClass::Blank
    } else if value.as_number().is_some() {
        SortClass::Number
    } else {
        SortClass::Text
    }
}

/// Ascending comparison used by every sort in the pipeline.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    let class = sort_class(a);
    match class.cmp(&sort_class(b)) {
        Ordering::Equal => {}
        unequal => return unequal,
    }
    match class {
        SortClass::Number => match (a.as_number(), b.as_number()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        SortClass::Text => a.to_display_string().cmp(&b.to_display_string()),
        SortClass::Blank => Ordering::Equal,
    }
}

fn ordered(a: &Value, b: &Value, order: SortOrder) -> Ordering {
    if a.is_blank() || b.is_blank() {
        // Blanks stay last in both directions
        return compare_values(a, b);
    }
    match order {
        SortOrder::Asc => compare_values(a, b),
        SortOrder::Desc => compare_values(b, a),
    }
}

pub fn sort_rows(rows: &mut [Row], spec: &SortSpec) {
    rows.sort_by(|a, b| ordered(a.value(&spec.attribute), b.value(&spec.attribute), spec.order));
}

/// Sorts cross-tab rows by a row-axis attribute.
pub fn sort_pivoted_rows(rows: &mut [PivotedRow], spec: &SortSpec) {
    rows.sort_by(|a, b| {
        ordered(
            a.row_values.value(&spec.attribute),
            b.row_values.value(&spec.attribute),
            spec.order,
        )
    });
}

/// Headers arrive sorted ascending; `DESC` reverses them.
pub fn order_column_headers(headers: &mut [String], spec: Option<&SortSpec>) {
    if matches!(spec, Some(s) if s.order == SortOrder::Desc) {
        headers.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::row;

    fn rows() -> Vec<Row> {
        vec![
            row! { "name" => "b", "score" => "10" },
            row! { "name" => "a", "score" => 9.0 },
            row! { "name" => "c" },
            row! { "name" => "d", "score" => 10.0 },
        ]
    }

    fn names(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.value("name").to_display_string()).collect()
    }

    #[test]
    fn test_numeric_sort_is_stable_with_blanks_last() {
        let mut data = rows();
        sort_rows(&mut data, &SortSpec::new("score", SortOrder::Asc));
        assert_eq!(names(&data), vec!["a", "b", "d", "c"]);

        let mut data = rows();
        sort_rows(&mut data, &SortSpec::new("score", SortOrder::Desc));
        assert_eq!(names(&data), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_string_sort() {
        let mut data = rows();
        sort_rows(&mut data, &SortSpec::new("name", SortOrder::Desc));
        assert_eq!(names(&data), vec!["d", "c", "b", "a"]);
    }

    /// Deterministic permutation of `0..len` for reordering test input.
    fn permutation(len: usize, seed: u64) -> Vec<usize> {
        let mut state = seed;
        let mut order: Vec<usize> = (0..len).collect();
        for i in (1..len).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            order.swap(i, (state >> 33) as usize % (i + 1));
        }
        order
    }

    fn mixed_values() -> Vec<Value> {
        vec![
            Value::from("2"),
            Value::from("10"),
            Value::from("1a"),
            Value::from(3.5),
            Value::from("b"),
            Value::from(""),
            Value::Null,
            Value::from("-1"),
            Value::Bool(true),
            Value::from("10x"),
        ]
    }

    #[test]
    fn test_mixed_numbers_and_text_are_totally_ordered() {
        let two = Value::from("2");
        let ten = Value::from("10");
        let text = Value::from("1a");
        assert_eq!(compare_values(&two, &ten), Ordering::Less);
        assert_eq!(compare_values(&ten, &text), Ordering::Less);
        assert_eq!(compare_values(&two, &text), Ordering::Less);

        let values = mixed_values();
        for a in &values {
            for b in &values {
                assert_eq!(compare_values(a, b), compare_values(b, a).reverse(), "{:?} vs {:?}", a, b);
                for c in &values {
                    if compare_values(a, b) != Ordering::Greater && compare_values(b, c) != Ordering::Greater {
                        assert_ne!(compare_values(a, c), Ordering::Greater, "{:?} <= {:?} <= {:?}", a, b, c);
                    }
                }
            }
        }
    }

    #[test]
    fn test_mixed_sort_independent_of_input_order() {
        let values = mixed_values();
        let source: Vec<Row> = (0..300)
            .map(|i| row! { "score" => values[(i * 7) % values.len()].clone() })
            .collect();
        let scores = |rows: &[Row]| -> Vec<String> { rows.iter().map(|r| r.value("score").to_display_string()).collect() };

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let spec = SortSpec::new("score", order);
            let mut expected: Option<Vec<String>> = None;
            for seed in 0..8u64 {
                let mut data: Vec<Row> = permutation(source.len(), seed + 1)
                    .into_iter()
                    .map(|i| source[i].clone())
                    .collect();
                sort_rows(&mut data, &spec);
                let sorted = scores(&data);
                match &expected {
                    Some(first) => assert_eq!(&sorted, first, "seed {}", seed),
                    None => expected = Some(sorted),
                }
            }

            let sorted = expected.unwrap_or_default();
            let mut distinct = sorted.clone();
            distinct.dedup();
            let head = match order {
                SortOrder::Asc => vec!["-1", "true", "2", "3.5", "10", "10x", "1a", "b", ""],
                SortOrder::Desc => vec!["b", "1a", "10x", "10", "3.5", "2", "true", "-1", ""],
            };
            assert_eq!(distinct, head);
        }
    }

    #[test]
    fn test_column_headers() {
        let mut headers = vec!["A".to_string(), "B".to_string()];
        order_column_headers(&mut headers, None);
        assert_eq!(headers, vec!["A", "B"]);
        order_column_headers(&mut headers, Some(&SortSpec::new("product", SortOrder::Desc)));
        assert_eq!(headers, vec!["B", "A"]);
    }
}

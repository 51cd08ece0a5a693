//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the shared widget data types.
//! CONTEXT: Re-exports the value model, row predicates, the date-range
//! pre-filter and number formatting for use by the other crates.

pub mod date_range;
pub mod error;
pub mod number_format;
pub mod predicate;
pub mod row;
pub mod style;
pub mod value;

// Re-export commonly used types at the crate root
pub use date_range::{filter_by_date_range, parse_date_value, DateBounds, DateRangeConfig};
pub use error::DatasetError;
pub use number_format::{format_number, format_value, NumberFormat};
pub use predicate::{
    evaluate_condition, evaluate_group, filter_rows, FilterCondition, FilterGroup, Logic, Operator,
    Predicate, PredicateEvaluator, UnknownOperator,
};
pub use row::{fingerprint_rows, Dataset, Row};
pub use style::Color;
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_builds_rows() {
        let r = row! { "region" => "East", "sales" => 100.0 };
        assert_eq!(r.value("sales"), &Value::Number(100.0));
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn integration_test_filter_then_format() {
        let dataset = Dataset::from_json_str(
            r#"{"data": [
                {"region": "East", "sales": 1500, "day": "2024-01-02"},
                {"region": "West", "sales": 80, "day": "2024-02-10"},
                {"region": "East", "sales": 2500.5, "day": "2024-01-20"}
            ]}"#,
        )
        .unwrap();

        let in_january = filter_by_date_range(
            dataset.rows(),
            &DateRangeConfig::new("day", Some("2024-01-01"), Some("2024-01-31")),
        );
        let east = filter_rows(
            &in_january,
            &FilterGroup::and(vec![FilterCondition::new("region", Operator::Equals, "East").into()]),
        );

        let formatted: Vec<String> = east
            .iter()
            .map(|r| format_value(r.value("sales"), NumberFormat::Currency))
            .collect();
        assert_eq!(formatted, vec!["$1,500.00", "$2,500.50"]);
    }
}

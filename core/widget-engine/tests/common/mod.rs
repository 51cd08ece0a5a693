//! FILENAME: tests/common/mod.rs
//! Fixtures and assertion helpers for widget pipeline integration tests.

#![allow(dead_code)]

use widget_engine::engine::{row, Dataset, Row, Value};
use widget_engine::widget_config::WidgetConfig;

// ============================================================================
// FIXTURES
// ============================================================================

/// Regional sales by product and quarter.
pub struct SalesFixture;

impl SalesFixture {
    pub fn attributes() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Date", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    /// Mid-quarter date for a quarter label.
    pub fn date_for(quarter: &str) -> &'static str {
        match quarter {
            "Q1" => "2024-02-15",
            "Q2" => "2024-05-15T10:30:00Z",
            _ => "",
        }
    }

    pub fn rows() -> Vec<Row> {
        Self::data()
            .into_iter()
            .map(|(region, product, quarter, sales, quantity)| {
                row! {
                    "Region" => region,
                    "Product" => product,
                    "Quarter" => quarter,
                    "Date" => Self::date_for(quarter),
                    "Sales" => sales,
                    "Quantity" => quantity,
                }
            })
            .collect()
    }

    pub fn dataset() -> Dataset {
        Dataset::new(Self::rows())
    }
}

/// The three-row region/product/sales dataset used by the reference scenarios.
pub fn scenario_rows() -> Vec<Row> {
    vec![
        row! { "region" => "East", "product" => "A", "sales" => 100.0 },
        row! { "region" => "East", "product" => "B", "sales" => 50.0 },
        row! { "region" => "West", "product" => "A", "sales" => 75.0 },
    ]
}

pub fn config(json: &str) -> WidgetConfig {
    match WidgetConfig::from_json(json) {
        Ok(config) => config,
        Err(e) => panic!("invalid test config: {}\n{}", e, json),
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Assert that a row holds an expected number.
pub fn assert_number(row: &Row, attribute: &str, expected: f64) {
    match row.value(attribute) {
        Value::Number(n) => {
            assert!(
                (n - expected).abs() < 0.001,
                "'{}' expected {} but got {}",
                attribute,
                expected,
                n
            );
        }
        other => panic!("'{}' expected Number({}) but got {:?}", attribute, expected, other),
    }
}

/// Assert that a row holds an expected text.
pub fn assert_text(row: &Row, attribute: &str, expected: &str) {
    match row.value(attribute) {
        Value::Text(s) => assert_eq!(s, expected, "'{}' expected '{}' but got '{}'", attribute, expected, s),
        other => panic!("'{}' expected Text({}) but got {:?}", attribute, expected, other),
    }
}

/// Assert that an attribute is null or absent.
pub fn assert_null(row: &Row, attribute: &str) {
    match row.value(attribute) {
        Value::Null => {}
        other => panic!("'{}' expected null but got {:?}", attribute, other),
    }
}

/// Text values of `attribute` across rows, in order.
pub fn column_text(rows: &[Row], attribute: &str) -> Vec<String> {
    rows.iter().map(|r| r.value(attribute).to_display_string()).collect()
}

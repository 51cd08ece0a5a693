//! FILENAME: core/decoration-engine/src/scaling.rs
//! PURPOSE: Min-max scaling of numeric cells to a 0-100 percentage.
//! CONTEXT: Ranges are taken over every cell of an attribute in the final
//! (filtered, aggregated, pivoted) result, never per row or per column subset.

use rustc_hash::FxHashMap;

use engine::{Row, Value};
use pivot_engine::PivotResult;

/// Percentage returned when all values of an attribute are equal.
pub const FLAT_RANGE_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        ValueRange { min, max }
    }

    /// Range over the numeric coercions of `values`; `None` if none is numeric.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Option<Self> {
        let mut range: Option<ValueRange> = None;
        for n in values.into_iter().filter_map(Value::as_number) {
            range = Some(match range {
                Some(r) => r.including(n),
                None => ValueRange::new(n, n),
            });
        }
        range
    }

    pub fn including(self, value: f64) -> Self {
        ValueRange {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `(value - min) / (max - min) * 100`, clamped to `0..=100`.
    pub fn percent(&self, value: f64) -> f64 {
        let span = self.span();
        if span == 0.0 {
            return FLAT_RANGE_PERCENT;
        }
        ((value - self.min) / span * 100.0).clamp(0.0, 100.0)
    }
}

/// Ranges of `attributes` across flat rows.
pub fn compute_ranges(rows: &[Row], attributes: &[String]) -> FxHashMap<String, ValueRange> {
    let mut ranges = FxHashMap::default();
    for attribute in attributes {
        if let Some(range) = ValueRange::from_values(rows.iter().map(|r| r.value(attribute))) {
            ranges.insert(attribute.clone(), range);
        }
    }
    ranges
}

/// Ranges of `value_attrs` across every cell of a cross-tab.
pub fn compute_pivot_ranges(result: &PivotResult, value_attrs: &[String]) -> FxHashMap<String, ValueRange> {
    let mut ranges = FxHashMap::default();
    for attribute in value_attrs {
        let values = result.cells().map(|cell| cell.value(attribute));
        if let Some(range) = ValueRange::from_values(values) {
            ranges.insert(attribute.clone(), range);
        }
    }
    ranges
}

//! FILENAME: core/engine/src/predicate.rs
//! PURPOSE: Row predicates: single conditions and nested AND/OR groups.
//! CONTEXT: Row filters and conditional formatting rules share one operator
//! set. They differ only in what an unrecognized operator means, which is a
//! policy on the evaluator rather than a second implementation.

use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::value::Value;

// ============================================================================
// OPERATORS
// ============================================================================

/// Comparison operator of a condition, as persisted in widget configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    IsNull,
    IsNotNull,
    Between,
    /// Any operator name this build does not know.
    #[serde(other)]
    Unknown,
}

/// How groups combine their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Logic {
    #[default]
    #[serde(alias = "and")]
    And,
    #[serde(alias = "or")]
    Or,
}

// ============================================================================
// PREDICATE TREE
// ============================================================================

/// A single `attribute operator value [value2]` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCondition {
    pub attribute: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Value,
    /// Upper bound for `between`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
}

impl FilterCondition {
    pub fn new(attribute: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        FilterCondition {
            attribute: attribute.into(),
            operator,
            value: value.into(),
            value2: None,
        }
    }

    pub fn between(attribute: impl Into<String>, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        FilterCondition {
            attribute: attribute.into(),
            operator: Operator::Between,
            value: low.into(),
            value2: Some(high.into()),
        }
    }
}

/// A node of the filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Predicate {
    Condition(FilterCondition),
    Group(FilterGroup),
}

/// AND/OR over child predicates. `items` is required so that a bare condition
/// object can never be mistaken for a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default)]
    pub logic: Logic,
    pub items: Vec<Predicate>,
}

impl FilterGroup {
    pub fn and(items: Vec<Predicate>) -> Self {
        FilterGroup { logic: Logic::And, items }
    }

    pub fn or(items: Vec<Predicate>) -> Self {
        FilterGroup { logic: Logic::Or, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every condition in the tree, depth first.
    pub fn conditions(&self) -> Vec<&FilterCondition> {
        let mut out = Vec::new();
        collect_conditions(&self.items, &mut out);
        out
    }
}

fn collect_conditions<'a>(items: &'a [Predicate], out: &mut Vec<&'a FilterCondition>) {
    for item in items {
        match item {
            Predicate::Condition(c) => out.push(c),
            Predicate::Group(g) => collect_conditions(&g.items, out),
        }
    }
}

impl From<FilterCondition> for Predicate {
    fn from(condition: FilterCondition) -> Self {
        Predicate::Condition(condition)
    }
}

impl From<FilterGroup> for Predicate {
    fn from(group: FilterGroup) -> Self {
        Predicate::Group(group)
    }
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// What an `Operator::Unknown` evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOperator {
    /// The condition passes.
    Pass,
    /// The condition does not match.
    NoMatch,
}

/// Evaluates conditions and groups against rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateEvaluator {
    unknown_operator: UnknownOperator,
}

impl PredicateEvaluator {
    /// Row filters keep rows whose condition uses an unknown operator.
    pub const ROW_FILTER: PredicateEvaluator = PredicateEvaluator::new(UnknownOperator::Pass);

    /// Conditional formatting never matches an unknown operator.
    pub const CONDITIONAL_FORMAT: PredicateEvaluator = PredicateEvaluator::new(UnknownOperator::NoMatch);

    pub const fn new(unknown_operator: UnknownOperator) -> Self {
        PredicateEvaluator { unknown_operator }
    }

    pub fn unknown_operator(&self) -> UnknownOperator {
        self.unknown_operator
    }

    pub fn evaluate(&self, predicate: &Predicate, row: &Row) -> bool {
        match predicate {
            Predicate::Condition(c) => self.evaluate_condition(c, row),
            Predicate::Group(g) => self.evaluate_group(g, row),
        }
    }

    pub fn evaluate_condition(&self, condition: &FilterCondition, row: &Row) -> bool {
        self.compare(
            row.value(&condition.attribute),
            condition.operator,
            &condition.value,
            condition.value2.as_ref(),
        )
    }

    /// Empty groups are true for both AND and OR.
    pub fn evaluate_group(&self, group: &FilterGroup, row: &Row) -> bool {
        if group.items.is_empty() {
            return true;
        }
        match group.logic {
            Logic::And => group.items.iter().all(|item| self.evaluate(item, row)),
            Logic::Or => group.items.iter().any(|item| self.evaluate(item, row)),
        }
    }

    /// Applies `operator` to a raw value and the condition operand(s).
    pub fn compare(&self, actual: &Value, operator: Operator, expected: &Value, expected2: Option<&Value>) -> bool {
        match operator {
            Operator::Equals => actual.to_display_string() == expected.to_display_string(),
            Operator::NotEquals => actual.to_display_string() != expected.to_display_string(),
            Operator::Contains => text_test(actual, expected, |a, e| a.contains(e)),
            Operator::NotContains => !text_test(actual, expected, |a, e| a.contains(e)),
            Operator::StartsWith => text_test(actual, expected, |a, e| a.starts_with(e)),
            Operator::EndsWith => text_test(actual, expected, |a, e| a.ends_with(e)),
            Operator::GreaterThan => numeric_test(actual, expected, |a, e| a > e),
            Operator::LessThan => numeric_test(actual, expected, |a, e| a < e),
            Operator::GreaterOrEqual => numeric_test(actual, expected, |a, e| a >= e),
            Operator::LessOrEqual => numeric_test(actual, expected, |a, e| a <= e),
            Operator::IsNull => actual.is_blank(),
            Operator::IsNotNull => !actual.is_blank(),
            Operator::Between => {
                match (actual.as_number(), expected.as_number(), expected2.and_then(Value::as_number)) {
                    (Some(v), Some(low), Some(high)) => v >= low && v <= high,
                    _ => false,
                }
            }
            Operator::Unknown => self.unknown_operator == UnknownOperator::Pass,
        }
    }
}

impl Default for PredicateEvaluator {
    fn default() -> Self {
        PredicateEvaluator::ROW_FILTER
    }
}

/// Case-insensitive substring test on the string coercions.
fn text_test(actual: &Value, expected: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
    let actual = actual.to_display_string().to_lowercase();
    let expected = expected.to_display_string().to_lowercase();
    test(&actual, &expected)
}

/// Both sides must coerce to numbers, otherwise the test fails.
fn numeric_test(actual: &Value, expected: &Value, test: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_number(), expected.as_number()) {
        (Some(a), Some(e)) => test(a, e),
        _ => false,
    }
}

// ============================================================================
// ROW FILTERS
// ============================================================================

/// Evaluates a condition with row-filter semantics.
pub fn evaluate_condition(condition: &FilterCondition, row: &Row) -> bool {
    PredicateEvaluator::ROW_FILTER.evaluate_condition(condition, row)
}

/// Evaluates a group with row-filter semantics.
pub fn evaluate_group(group: &FilterGroup, row: &Row) -> bool {
    PredicateEvaluator::ROW_FILTER.evaluate_group(group, row)
}

/// Keeps the rows the filter tree accepts, in their original order.
pub fn filter_rows(rows: &[Row], group: &FilterGroup) -> Vec<Row> {
    rows.iter()
        .filter(|row| evaluate_group(group, row))
        .cloned()
        .collect()
}

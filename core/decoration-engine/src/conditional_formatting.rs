//! FILENAME: core/decoration-engine/src/conditional_formatting.rs
//! PURPOSE: Ordered conditional formatting rules, first match wins.
//! CONTEXT: Conditions use the shared predicate operators with the
//! conditional-format policy: an unknown operator never matches.

use serde::{Deserialize, Serialize};

use engine::{Operator, PredicateEvaluator, Value};

/// A persisted `conditionalFormattingRules` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormattingRule {
    pub attribute: String,
    pub condition: Operator,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

impl ConditionalFormattingRule {
    pub fn new(attribute: impl Into<String>, condition: Operator, value: impl Into<Value>) -> Self {
        ConditionalFormattingRule {
            attribute: attribute.into(),
            condition,
            value: value.into(),
            value2: None,
            text_color: None,
            background_color: None,
        }
    }

    pub fn with_value2(mut self, value2: impl Into<Value>) -> Self {
        self.value2 = Some(value2.into());
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn applies_to(&self, attribute: &str) -> bool {
        self.attribute == attribute
    }

    pub fn matches(&self, value: &Value) -> bool {
        PredicateEvaluator::CONDITIONAL_FORMAT.compare(value, self.condition, &self.value, self.value2.as_ref())
    }

    pub fn style(&self) -> CellStyle {
        CellStyle {
            text_color: self.text_color.clone(),
            background_color: self.background_color.clone(),
        }
    }
}

/// Colors a matching rule applies to a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    pub text_color: Option<String>,
    pub background_color: Option<String>,
}

/// First rule for `attribute` whose condition holds for `value`.
/// Rules after the first match are never evaluated.
pub fn find_matching_rule<'a>(
    rules: &'a [ConditionalFormattingRule],
    attribute: &str,
    value: &Value,
) -> Option<&'a ConditionalFormattingRule> {
    rules
        .iter()
        .filter(|rule| rule.applies_to(attribute))
        .find(|rule| rule.matches(value))
}

pub fn conditional_style(rules: &[ConditionalFormattingRule], attribute: &str, value: &Value) -> Option<CellStyle> {
    find_matching_rule(rules, attribute, value).map(ConditionalFormattingRule::style)
}

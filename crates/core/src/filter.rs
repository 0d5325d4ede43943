//! Path filters: a single constraint on a dotted field path

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Operator emitted for field-match clauses
pub const EQ_OP: &str = "eq";

/// Operator and operand of a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub op: String,
    pub value: Value,
}

/// A borrowed view of a range-shaped filter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange<'a> {
    pub start: Option<&'a Value>,
    pub end: &'a Value,
}

impl FilterCondition {
    pub fn new(op: impl Into<String>, value: Value) -> Self {
        Self {
            op: op.into(),
            value,
        }
    }

    pub fn eq(value: Value) -> Self {
        Self::new(EQ_OP, value)
    }

    /// The value as a range, if it is an object carrying `end`.
    ///
    /// An object with only `start` is not a range.
    pub fn range(&self) -> Option<ValueRange<'_>> {
        let object = self.value.as_object()?;
        let end = object.get("end")?;
        Some(ValueRange {
            start: object.get("start"),
            end,
        })
    }

    /// Human readable rendering of the operand
    pub fn display_value(&self) -> String {
        match self.range() {
            Some(range) => {
                let from = range.start.filter(|v| is_truthy(v)).unwrap_or(range.end);
                format!("{} ... {}", render_value(from), render_value(range.end))
            }
            None => render_value(&self.value),
        }
    }
}

/// A single constraint: dotted path plus condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathFilter {
    pub path: String,
    pub condition: FilterCondition,
}

impl PathFilter {
    pub fn new(path: impl Into<String>, condition: FilterCondition) -> Self {
        Self {
            path: path.into(),
            condition,
        }
    }

    pub fn segments(&self) -> Vec<&str> {
        self.path.split('.').collect()
    }

    /// Well-formed iff the path has at least one segment, no segment is empty,
    /// and the operator is non-empty
    pub fn is_well_formed(&self) -> bool {
        !self.path.is_empty()
            && self.path.split('.').all(|segment| !segment.is_empty())
            && !self.condition.op.is_empty()
    }
}

impl fmt::Display for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.segments().join(" > "),
            self.condition.op,
            self.condition.display_value()
        )
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed() {
        let filter = PathFilter::new("subscription.status", FilterCondition::eq(json!("active")));
        assert!(filter.is_well_formed());
        assert_eq!(filter.segments(), vec!["subscription", "status"]);
    }

    #[test]
    fn test_malformed_paths_and_ops() {
        let empty_path = PathFilter::new("", FilterCondition::eq(json!(1)));
        assert!(!empty_path.is_well_formed());

        let empty_segment = PathFilter::new("subscription..status", FilterCondition::eq(json!(1)));
        assert!(!empty_segment.is_well_formed());

        let empty_op = PathFilter::new("product.name", FilterCondition::new("", json!("x")));
        assert!(!empty_op.is_well_formed());
    }

    #[test]
    fn test_range_requires_end() {
        let with_end = FilterCondition::new("between", json!({"start": "2024-01-01", "end": "2024-02-01"}));
        assert!(with_end.range().is_some());
        assert_eq!(with_end.display_value(), "2024-01-01 ... 2024-02-01");

        let start_only = FilterCondition::new("gte", json!({"start": "2024-01-01"}));
        assert!(start_only.range().is_none());
        assert_eq!(start_only.display_value(), r#"{"start":"2024-01-01"}"#);
    }

    #[test]
    fn test_range_without_start_uses_end_twice() {
        let condition = FilterCondition::new("lte", json!({"end": "2024-02-01"}));
        assert_eq!(condition.display_value(), "2024-02-01 ... 2024-02-01");

        let empty_start = FilterCondition::new("lte", json!({"start": "", "end": 5}));
        assert_eq!(empty_start.display_value(), "5 ... 5");
    }

    #[test]
    fn test_primitive_display() {
        assert_eq!(FilterCondition::eq(json!("active")).display_value(), "active");
        assert_eq!(FilterCondition::eq(json!(42)).display_value(), "42");
        assert_eq!(FilterCondition::eq(json!(true)).display_value(), "true");
    }

    #[test]
    fn test_display_filter() {
        let filter = PathFilter::new("subscription.product.name", FilterCondition::eq(json!("Fiber")));
        assert_eq!(filter.to_string(), "subscription > product > name eq Fiber");
    }
}

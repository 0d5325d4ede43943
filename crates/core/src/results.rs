//! Search result variants and their structural discrimination
//!
//! The backend returns result records without a type tag. Records are
//! classified once, on deserialization, by testing their shape in a fixed
//! precedence order:
//!
//! 1. object-valued `subscription` → [`SearchResult::Subscription`]
//! 2. `processId` and `workflowName` → [`SearchResult::Process`]
//! 3. `productId` and `productType` → [`SearchResult::Product`]
//! 4. array-valued `products` → [`SearchResult::Workflow`]
//!
//! Anything else is kept as [`SearchResult::Unknown`] so a single odd record
//! never fails a whole page.

use crate::entities::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

const UNKNOWN_LABEL: &str = "Unknown result type";

/// Subscription hit: a nested `subscription` record plus a relevance score
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionResult {
    record: Value,
}

impl SubscriptionResult {
    /// The nested subscription record, without wrapper metadata
    pub fn subscription(&self) -> &Value {
        &self.record["subscription"]
    }

    pub fn score(&self) -> Option<f64> {
        self.record.get("score").and_then(Value::as_f64)
    }

    pub fn description(&self) -> Option<&str> {
        self.subscription()
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
    }
}

/// Process hit, identified by `processId` and `workflowName`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessResult {
    record: Value,
}

impl ProcessResult {
    pub fn process_id(&self) -> &Value {
        &self.record["processId"]
    }

    pub fn workflow_name(&self) -> String {
        text_of(&self.record["workflowName"])
    }
}

/// Product hit, identified by `productId` and `productType`
#[derive(Debug, Clone, PartialEq)]
pub struct ProductResult {
    record: Value,
}

impl ProductResult {
    pub fn product_id(&self) -> &Value {
        &self.record["productId"]
    }

    pub fn product_type(&self) -> &Value {
        &self.record["productType"]
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(Value::as_str)
    }
}

/// Workflow hit, identified by a `products` array
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    record: Value,
}

impl WorkflowResult {
    pub fn products(&self) -> &[Value] {
        self.record["products"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.record.get("name").and_then(Value::as_str)
    }
}

/// One record of a search result page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SearchResult {
    Subscription(SubscriptionResult),
    Process(ProcessResult),
    Product(ProductResult),
    Workflow(WorkflowResult),
    Unknown(Value),
}

#[derive(Clone, Copy)]
enum Shape {
    Subscription,
    Process,
    Product,
    Workflow,
}

fn shape_of(object: &Map<String, Value>) -> Option<Shape> {
    if object.get("subscription").is_some_and(Value::is_object) {
        Some(Shape::Subscription)
    } else if object.contains_key("processId") && object.contains_key("workflowName") {
        Some(Shape::Process)
    } else if object.contains_key("productId") && object.contains_key("productType") {
        Some(Shape::Product)
    } else if object.get("products").is_some_and(Value::is_array) {
        Some(Shape::Workflow)
    } else {
        None
    }
}

impl SearchResult {
    /// Classify a raw record
    pub fn classify(record: Value) -> Self {
        let shape = record.as_object().and_then(shape_of);
        match shape {
            Some(Shape::Subscription) => Self::Subscription(SubscriptionResult { record }),
            Some(Shape::Process) => Self::Process(ProcessResult { record }),
            Some(Shape::Product) => Self::Product(ProductResult { record }),
            Some(Shape::Workflow) => Self::Workflow(WorkflowResult { record }),
            None => {
                debug!("Unclassifiable search result record");
                Self::Unknown(record)
            }
        }
    }

    /// Entity kind of the variant, `None` for unknown records
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Subscription(_) => Some(EntityKind::Subscription),
            Self::Process(_) => Some(EntityKind::Process),
            Self::Product(_) => Some(EntityKind::Product),
            Self::Workflow(_) => Some(EntityKind::Workflow),
            Self::Unknown(_) => None,
        }
    }

    /// The full record as received
    pub fn record(&self) -> &Value {
        match self {
            Self::Subscription(r) => &r.record,
            Self::Process(r) => &r.record,
            Self::Product(r) => &r.record,
            Self::Workflow(r) => &r.record,
            Self::Unknown(record) => record,
        }
    }

    /// The canonical domain record for detail display
    ///
    /// For subscriptions this is the nested `subscription` object (the score is
    /// dropped); every other variant is its own core record.
    pub fn core_record(&self) -> &Value {
        match self {
            Self::Subscription(r) => r.subscription(),
            other => other.record(),
        }
    }

    /// Relevance score, only carried by subscription hits
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Subscription(r) => r.score(),
            _ => None,
        }
    }

    /// One-line label for result lists
    pub fn display_text(&self) -> String {
        match self {
            Self::Subscription(r) => r.description().unwrap_or("Subscription").to_string(),
            Self::Process(r) => r.workflow_name(),
            Self::Product(r) => r.name().unwrap_or_default().to_string(),
            Self::Workflow(r) => r.name().unwrap_or_default().to_string(),
            Self::Unknown(_) => UNKNOWN_LABEL.to_string(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    pub fn into_record(self) -> Value {
        match self {
            Self::Subscription(r) => r.record,
            Self::Process(r) => r.record,
            Self::Product(r) => r.record,
            Self::Workflow(r) => r.record,
            Self::Unknown(record) => record,
        }
    }
}

impl From<Value> for SearchResult {
    fn from(record: Value) -> Self {
        Self::classify(record)
    }
}

impl From<SearchResult> for Value {
    fn from(result: SearchResult) -> Self {
        result.into_record()
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

//! Searchable entity kinds

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Domain category a search is scoped to
///
/// The kind selects the backend endpoint and is the first segment of every
/// filter path produced for it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum EntityKind {
    #[default]
    Subscription,
    Product,
    Workflow,
    Process,
}

impl EntityKind {
    /// All kinds, in tab order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Subscription,
        EntityKind::Product,
        EntityKind::Workflow,
        EntityKind::Process,
    ];

    /// Path segment of the search endpoint for this kind
    pub fn endpoint_path(&self) -> &'static str {
        match self {
            EntityKind::Subscription => "subscriptions",
            EntityKind::Product => "products",
            EntityKind::Workflow => "workflows",
            EntityKind::Process => "processes",
        }
    }

    /// First segment of filter paths (`subscription`, `product`, ...)
    pub fn path_prefix(&self) -> &'static str {
        match self {
            EntityKind::Subscription => "subscription",
            EntityKind::Product => "product",
            EntityKind::Workflow => "workflow",
            EntityKind::Process => "process",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Subscription => "Subscriptions",
            EntityKind::Product => "Products",
            EntityKind::Workflow => "Workflows",
            EntityKind::Process => "Processes",
        }
    }

    /// Search bar placeholder text
    pub fn placeholder(&self) -> String {
        format!("Search for {}…", self.label().to_lowercase())
    }
}

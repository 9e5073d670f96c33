//! # mealgrid-core
//!
//! Core domain model and traits for the mealgrid weekly order workbook engine.
//!
//! This crate provides:
//! - Domain types: `MenuItem`, `OrderRecord`, `AggregatedQuantity`, `ReportData`
//! - Report period configuration: `ReportPeriod`, `RangePreset`
//! - Core trait: `ReportRenderer`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use mealgrid_core::{Category, MenuItem, OrderRecord};
//! use chrono::NaiveDate;
//!
//! let catalog = vec![
//!     MenuItem::new(9, "Mini bruschetta (45g)", Category::Bruschetta, 270),
//!     MenuItem::new(14, "Olivier salad (1kg)", Category::Salads, 1900),
//! ];
//! let order = OrderRecord::new("Company A", NaiveDate::from_ymd_opt(2025, 12, 25).unwrap())
//!     .item(9, 5.0)
//!     .item(14, 0.5);
//! assert_eq!(order.order_items.len(), 2);
//! assert_eq!(catalog[0].category, Category::Bruschetta);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod period;

pub use period::{RangePreset, ReportPeriod};

// ============================================================================
// Type Aliases
// ============================================================================

/// Stable catalog identifier of a menu item
pub type ItemId = u32;

/// Content type of the emitted workbook binary, for transport collaborators
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Quantities summed per customer, per delivery date, per item id.
///
/// Derived fresh for every report request; iteration order carries no
/// meaning. Display order always comes from the supplied customer list and
/// the catalog, never from this map.
pub type AggregatedQuantity = HashMap<String, HashMap<NaiveDate, HashMap<ItemId, f64>>>;

// ============================================================================
// Catalog
// ============================================================================

/// Menu category, in fixed display order.
///
/// The order of `Category::ALL` drives grouping and row order on every sheet
/// of the generated workbook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "bruschetta")]
    Bruschetta,
    #[serde(rename = "hot")]
    HotDishes,
    #[serde(rename = "snacks")]
    Snacks,
    #[serde(rename = "canape")]
    Canapes,
    #[serde(rename = "salad")]
    Salads,
    #[serde(rename = "tartlets")]
    Tartlets,
}

impl Category {
    /// All categories in catalog display order
    pub const ALL: [Category; 6] = [
        Category::Bruschetta,
        Category::HotDishes,
        Category::Snacks,
        Category::Canapes,
        Category::Salads,
        Category::Tartlets,
    ];

    /// Human-readable label used on category rows
    pub fn label(&self) -> &'static str {
        match self {
            Category::Bruschetta => "Bruschetta",
            Category::HotDishes => "Hot Dishes",
            Category::Snacks => "Snacks",
            Category::Canapes => "Canapes",
            Category::Salads => "Salads",
            Category::Tartlets => "Tartlets",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog menu item.
///
/// Immutable for the duration of a report run. The display name may embed a
/// unit or weight in parentheses ("Olivier salad (1kg)").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable catalog identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Grouping category
    pub category: Category,
    /// Price in whole currency units
    pub price: i64,
}

impl MenuItem {
    pub fn new(id: ItemId, name: impl Into<String>, category: Category, price: i64) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            price,
        }
    }
}

/// Build an id-keyed lookup over the catalog
pub fn menu_lookup(menu_items: &[MenuItem]) -> HashMap<ItemId, &MenuItem> {
    menu_items.iter().map(|item| (item.id, item)).collect()
}

// ============================================================================
// Orders
// ============================================================================

/// One item line inside an order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: ItemId,
    /// Nonnegative; fractional for items sold by weight
    pub quantity: f64,
}

/// A stored customer order, read-only input to the report engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Free-text grouping key, not a foreign key
    pub customer_name: String,
    /// Requested delivery date
    pub delivery_date: NaiveDate,
    /// Item lines in the order
    pub order_items: Vec<OrderItem>,
}

impl OrderRecord {
    pub fn new(customer_name: impl Into<String>, delivery_date: NaiveDate) -> Self {
        Self {
            customer_name: customer_name.into(),
            delivery_date,
            order_items: Vec::new(),
        }
    }

    /// Append an item line
    pub fn item(mut self, item_id: ItemId, quantity: f64) -> Self {
        self.order_items.push(OrderItem { item_id, quantity });
        self
    }
}

/// An order item enriched with catalog name and price
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedItem {
    pub item_id: ItemId,
    pub name: String,
    pub quantity: f64,
    /// Unit price from the catalog, never from the client
    pub price: i64,
}

// ============================================================================
// Report input contract
// ============================================================================

/// The reporting window as supplied by the ordering backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Requested sub-range; `None` means the full week
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<RangePreset>,
}

/// The aggregated report payload handed over by the ordering backend.
///
/// Orders are optional: when present the engine re-aggregates them fresh,
/// otherwise `aggregated_data` is used as supplied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub customers: Vec<String>,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
    #[serde(default)]
    pub orders: Vec<OrderRecord>,
    #[serde(default)]
    pub aggregated_data: AggregatedQuantity,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors surfaced by report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("workbook generation failed: {0}")]
    Workbook(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid range '{value}': valid values are full_week, first_half, second_half")]
    InvalidRange { value: String },
}

// ============================================================================
// Renderer trait
// ============================================================================

/// A report backend that turns an aggregated payload into an output document
pub trait ReportRenderer {
    type Output;

    /// Render the requested sub-range of the payload
    fn render(&self, data: &ReportData, preset: RangePreset) -> Result<Self::Output, ReportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn category_order_is_stable() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["Bruschetta", "Hot Dishes", "Snacks", "Canapes", "Salads", "Tartlets"]
        );
    }

    #[test]
    fn payload_deserializes_from_backend_json() {
        let json = r#"{
            "date_range": {"start": "2025-12-25", "end": "2025-12-31"},
            "customers": ["Company A", "John"],
            "menu_items": [
                {"id": 9, "name": "Mini bruschetta (45g)", "category": "bruschetta", "price": 270, "image": "b9.jpg"}
            ],
            "orders": [
                {
                    "customer_name": "Company A",
                    "delivery_date": "2025-12-25",
                    "order_items": [{"item_id": 9, "quantity": 5}]
                }
            ],
            "aggregated_data": {
                "Company A": {"2025-12-25": {"9": 5.0}}
            }
        }"#;

        let data: ReportData = serde_json::from_str(json).unwrap();
        let range = data.date_range.unwrap();
        assert_eq!(range.start, date(2025, 12, 25));
        assert_eq!(range.preset, None);
        assert_eq!(data.customers, vec!["Company A", "John"]);
        assert_eq!(data.menu_items[0].category, Category::Bruschetta);
        assert_eq!(data.orders[0].order_items[0].quantity, 5.0);
        assert_eq!(
            data.aggregated_data["Company A"][&date(2025, 12, 25)][&9],
            5.0
        );
    }

    #[test]
    fn menu_lookup_keys_by_id() {
        let items = vec![
            MenuItem::new(1, "Ham canape", Category::Canapes, 150),
            MenuItem::new(7, "Greek salad (1kg)", Category::Salads, 1600),
        ];
        let lookup = menu_lookup(&items);
        assert_eq!(lookup[&7].name, "Greek salad (1kg)");
        assert!(!lookup.contains_key(&2));
    }

    #[test]
    fn invalid_range_error_lists_valid_values() {
        let err = ReportError::InvalidRange {
            value: "whole_month".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("full_week"));
        assert!(msg.contains("first_half"));
        assert!(msg.contains("second_half"));
    }
}

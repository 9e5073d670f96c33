//! # mealgrid-aggregate
//!
//! Order aggregation and date-range partitioning for the mealgrid report
//! engine.
//!
//! This crate provides:
//! - `aggregate_orders`: fold raw orders into the customer × date × item map
//! - `order_total`: price enrichment of order lines from the catalog
//! - `partition`: preset resolution and activity-based customer filtering
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use mealgrid_core::{Category, MenuItem, OrderRecord};
//! use mealgrid_aggregate::aggregate_orders;
//!
//! let menu = vec![MenuItem::new(9, "Mini bruschetta (45g)", Category::Bruschetta, 270)];
//! let thursday = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
//! let orders = vec![
//!     OrderRecord::new("Company A", thursday).item(9, 5.0),
//!     OrderRecord::new("Company A", thursday).item(9, 3.0),
//! ];
//! let aggregated = aggregate_orders(&orders, &menu);
//! assert_eq!(aggregated["Company A"][&thursday][&9], 8.0);
//! ```

use chrono::NaiveDate;
use mealgrid_core::{
    menu_lookup, AggregatedQuantity, MenuItem, OrderItem, OrderRecord, PricedItem, ReportError,
};
use tracing::warn;

pub mod partition;

pub use partition::{active_customers, has_activity, resolve_dates};

/// Fold raw orders into the three-level quantity map.
///
/// Quantities for the same (customer, date, item) key sum; summation is
/// commutative so input order is irrelevant. Order lines referencing an item
/// id missing from the catalog are dropped with a warning; malformed legacy
/// orders must not abort a report.
pub fn aggregate_orders(orders: &[OrderRecord], menu_items: &[MenuItem]) -> AggregatedQuantity {
    let catalog = menu_lookup(menu_items);
    let mut aggregated = AggregatedQuantity::new();

    for order in orders {
        for line in &order.order_items {
            if !catalog.contains_key(&line.item_id) {
                warn!(
                    item_id = line.item_id,
                    customer = %order.customer_name,
                    date = %order.delivery_date,
                    "dropping order line with unknown item id"
                );
                continue;
            }
            let per_item = aggregated
                .entry(order.customer_name.clone())
                .or_default()
                .entry(order.delivery_date)
                .or_default();
            *per_item.entry(line.item_id).or_insert(0.0) += line.quantity;
        }
    }

    aggregated
}

/// Enrich order lines with catalog names and prices and compute the order
/// total in whole currency units.
///
/// Prices always come from the catalog, never from the client. Unlike
/// aggregation, an unknown item id here is an error: a total computed from a
/// partial order would silently undercharge.
pub fn order_total(
    order_items: &[OrderItem],
    menu_items: &[MenuItem],
) -> Result<(Vec<PricedItem>, i64), ReportError> {
    let catalog = menu_lookup(menu_items);
    let mut enriched = Vec::with_capacity(order_items.len());
    let mut total = 0i64;

    for line in order_items {
        let item = catalog.get(&line.item_id).ok_or_else(|| {
            ReportError::InvalidData(format!("menu item {} not found", line.item_id))
        })?;
        // Fractional quantities (items sold by weight) round to whole units
        total += (item.price as f64 * line.quantity).round() as i64;
        enriched.push(PricedItem {
            item_id: line.item_id,
            name: item.name.clone(),
            quantity: line.quantity,
            price: item.price,
        });
    }

    Ok((enriched, total))
}

/// Total order amount of one customer across the given dates, priced from
/// the catalog. Quantities for items that have left the catalog contribute
/// nothing.
pub fn customer_amount(
    aggregated: &AggregatedQuantity,
    customer: &str,
    dates: &[NaiveDate],
    menu_items: &[MenuItem],
) -> i64 {
    let catalog = menu_lookup(menu_items);
    let Some(per_date) = aggregated.get(customer) else {
        return 0;
    };

    let mut total = 0i64;
    for date in dates {
        let Some(items) = per_date.get(date) else {
            continue;
        };
        for (item_id, quantity) in items {
            if let Some(item) = catalog.get(item_id) {
                total += (item.price as f64 * quantity).round() as i64;
            }
        }
    }
    total
}

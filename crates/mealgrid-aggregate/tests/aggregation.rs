//! Aggregation correctness tests

use chrono::NaiveDate;
use mealgrid_aggregate::{aggregate_orders, customer_amount, order_total};
use mealgrid_core::{Category, MenuItem, OrderItem, OrderRecord};
use pretty_assertions::assert_eq;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new(9, "Mini bruschetta (45g)", Category::Bruschetta, 270),
        MenuItem::new(14, "Olivier salad (1kg)", Category::Salads, 1900),
        MenuItem::new(21, "Ham canape", Category::Canapes, 150),
    ]
}

#[test]
fn quantities_sum_across_orders_for_same_key() {
    // Two separate orders from "Company A" for item 9 on the same Thursday
    let thursday = date(2025, 12, 25);
    let orders = vec![
        OrderRecord::new("Company A", thursday).item(9, 5.0),
        OrderRecord::new("Company A", thursday).item(9, 3.0),
    ];

    let aggregated = aggregate_orders(&orders, &menu());
    assert_eq!(aggregated["Company A"][&thursday][&9], 8.0);
}

#[test]
fn customers_and_dates_aggregate_independently() {
    let thursday = date(2025, 12, 25);
    let monday = date(2025, 12, 29);
    let orders = vec![
        OrderRecord::new("Company A", thursday).item(9, 2.0).item(21, 10.0),
        OrderRecord::new("John", thursday).item(9, 1.0),
        OrderRecord::new("John", monday).item(14, 1.5),
    ];

    let aggregated = aggregate_orders(&orders, &menu());
    assert_eq!(aggregated["Company A"][&thursday][&9], 2.0);
    assert_eq!(aggregated["Company A"][&thursday][&21], 10.0);
    assert_eq!(aggregated["John"][&thursday][&9], 1.0);
    assert_eq!(aggregated["John"][&monday][&14], 1.5);
    assert!(!aggregated["John"].contains_key(&date(2025, 12, 26)));
}

#[test]
fn unknown_item_ids_are_dropped_not_fatal() {
    let thursday = date(2025, 12, 25);
    // Item 999 was removed from the catalog but survives in a legacy order
    let orders = vec![OrderRecord::new("Company A", thursday)
        .item(999, 4.0)
        .item(9, 2.0)];

    let aggregated = aggregate_orders(&orders, &menu());
    let items = &aggregated["Company A"][&thursday];
    assert_eq!(items.get(&9), Some(&2.0));
    assert_eq!(items.get(&999), None);
}

#[test]
fn order_of_only_unknown_items_leaves_no_keys_behind() {
    let orders = vec![OrderRecord::new("Ghost", date(2025, 12, 25)).item(999, 4.0)];
    let aggregated = aggregate_orders(&orders, &menu());
    assert!(!aggregated.contains_key("Ghost"));
}

#[test]
fn fractional_quantities_sum_without_rounding() {
    let friday = date(2025, 12, 26);
    let orders = vec![
        OrderRecord::new("John", friday).item(14, 0.5),
        OrderRecord::new("John", friday).item(14, 0.25),
    ];

    let aggregated = aggregate_orders(&orders, &menu());
    assert_eq!(aggregated["John"][&friday][&14], 0.75);
}

#[test]
fn order_total_prices_from_catalog() {
    let lines = vec![
        OrderItem { item_id: 9, quantity: 5.0 },
        OrderItem { item_id: 14, quantity: 0.5 },
    ];

    let (enriched, total) = order_total(&lines, &menu()).unwrap();
    assert_eq!(total, 270 * 5 + 950);
    assert_eq!(enriched.len(), 2);
    assert_eq!(enriched[0].name, "Mini bruschetta (45g)");
    assert_eq!(enriched[0].price, 270);
    assert_eq!(enriched[1].quantity, 0.5);
}

#[test]
fn order_total_rejects_unknown_items() {
    let lines = vec![OrderItem { item_id: 999, quantity: 1.0 }];
    let err = order_total(&lines, &menu()).unwrap_err();
    assert!(err.to_string().contains("999"));
}

#[test]
fn customer_amount_spans_only_the_given_dates() {
    let thursday = date(2025, 12, 25);
    let monday = date(2025, 12, 29);
    let orders = vec![
        OrderRecord::new("John", thursday).item(9, 2.0),
        OrderRecord::new("John", monday).item(21, 4.0),
    ];
    let aggregated = aggregate_orders(&orders, &menu());

    assert_eq!(customer_amount(&aggregated, "John", &[thursday], &menu()), 540);
    assert_eq!(customer_amount(&aggregated, "John", &[monday], &menu()), 600);
    assert_eq!(
        customer_amount(&aggregated, "John", &[thursday, monday], &menu()),
        1140
    );
    assert_eq!(customer_amount(&aggregated, "Nobody", &[thursday], &menu()), 0);
}

//! Integration tests for workbook rendering

use chrono::NaiveDate;
use mealgrid_aggregate::aggregate_orders;
use mealgrid_core::{
    Category, DateRange, MenuItem, OrderRecord, RangePreset, ReportData, ReportPeriod,
    ReportRenderer,
};
use mealgrid_render::layout::RowPlan;
use mealgrid_render::WorkbookRenderer;
use pretty_assertions::assert_eq;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Payload shaped like the ordering backend's weekly export
fn create_week_payload() -> ReportData {
    let menu_items = vec![
        MenuItem::new(9, "Mini bruschetta (45g)", Category::Bruschetta, 270),
        MenuItem::new(10, "Julienne (250g)", Category::HotDishes, 700),
        MenuItem::new(21, "Ham canape", Category::Canapes, 150),
        MenuItem::new(14, "Olivier salad (1kg)", Category::Salads, 1900),
        MenuItem::new(30, "Tartlet with caviar", Category::Tartlets, 420),
    ];

    let orders = vec![
        // Company A orders twice on Thursday; quantities must sum
        OrderRecord::new("Company A", date(2025, 12, 25)).item(9, 5.0),
        OrderRecord::new("Company A", date(2025, 12, 25)).item(9, 3.0).item(21, 20.0),
        OrderRecord::new("Company A", date(2025, 12, 27)).item(10, 4.0),
        // John orders in both halves of the week
        OrderRecord::new("John", date(2025, 12, 25)).item(14, 0.5),
        OrderRecord::new("John", date(2025, 12, 29)).item(30, 12.0),
    ];

    ReportData {
        date_range: Some(DateRange {
            start: date(2025, 12, 25),
            end: date(2025, 12, 31),
            preset: None,
        }),
        customers: vec!["Company A".to_string(), "John".to_string()],
        menu_items,
        orders,
        aggregated_data: Default::default(),
    }
}

#[test]
fn render_full_week_produces_valid_xlsx() {
    let renderer = WorkbookRenderer::new();
    let xlsx = renderer.render(&create_week_payload(), RangePreset::FullWeek).unwrap();

    // Valid XLSX file (starts with PK zip signature)
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn render_each_half_produces_valid_xlsx() {
    let renderer = WorkbookRenderer::new();
    let payload = create_week_payload();

    for preset in [RangePreset::FirstHalf, RangePreset::SecondHalf] {
        let xlsx = renderer.render(&payload, preset).unwrap();
        assert!(xlsx.len() > 100, "{preset} produced a truncated file");
        assert_eq!(&xlsx[0..2], b"PK");
    }
}

#[test]
fn render_with_supplied_aggregate_and_no_raw_orders() {
    // The backend may hand over only the pre-aggregated map
    let mut payload = create_week_payload();
    payload.aggregated_data = aggregate_orders(&payload.orders, &payload.menu_items);
    payload.orders.clear();

    let renderer = WorkbookRenderer::new();
    let xlsx = renderer.render(&payload, RangePreset::FullWeek).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn empty_customer_list_still_yields_a_workbook() {
    // Downstream consumers expect a well-formed file even for an empty period
    let payload = ReportData {
        date_range: Some(DateRange {
            start: date(2025, 12, 25),
            end: date(2025, 12, 31),
            preset: None,
        }),
        menu_items: create_week_payload().menu_items,
        ..ReportData::default()
    };

    let renderer = WorkbookRenderer::new();
    let xlsx = renderer.render(&payload, RangePreset::FullWeek).unwrap();
    assert!(xlsx.len() > 100);
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn item_rows_align_across_all_sheets_of_a_report() {
    // The row skeleton is computed once and shared, so a menu item's row is
    // identical on every daily sheet, the matrix and the summary
    let payload = create_week_payload();
    let plan = RowPlan::build(&payload.menu_items);
    let rebuilt = RowPlan::build(&payload.menu_items);

    for item in &payload.menu_items {
        assert_eq!(
            plan.item_row(item.id),
            rebuilt.item_row(item.id),
            "row drifted for item {}",
            item.id
        );
        assert!(plan.item_row(item.id).is_some());
    }
}

#[test]
fn regenerating_a_report_is_structurally_idempotent() {
    let renderer = WorkbookRenderer::new();
    let payload = create_week_payload();
    let dates = ReportPeriod::default_week().full_dates();

    // Sheet structure (names, row plan) is a pure function of the input;
    // only volatile workbook metadata may differ between runs
    assert_eq!(
        renderer.sheet_names(&dates, RangePreset::FullWeek),
        renderer.sheet_names(&dates, RangePreset::FullWeek)
    );
    assert_eq!(
        RowPlan::build(&payload.menu_items),
        RowPlan::build(&payload.menu_items)
    );

    let first = renderer.render(&payload, RangePreset::FullWeek).unwrap();
    let second = renderer.render(&payload, RangePreset::FullWeek).unwrap();
    assert_eq!(&first[0..2], b"PK");
    assert_eq!(&second[0..2], b"PK");
}

#[test]
fn configured_period_overrides_the_payload_range() {
    // A renderer configured for a different week ignores the payload range
    let period = ReportPeriod::new(date(2026, 1, 1), 7, 4).unwrap();
    let renderer = WorkbookRenderer::new().period(period);
    let payload = create_week_payload();

    // No orders fall inside the configured week: header-only output
    let xlsx = renderer.render(&payload, RangePreset::FullWeek).unwrap();
    assert_eq!(&xlsx[0..2], b"PK");
}

#[test]
fn custom_tag_flows_into_sheet_names() {
    let renderer = WorkbookRenderer::new().tag("XM");
    let dates = ReportPeriod::default_week().full_dates();
    let names = renderer.sheet_names(&dates, RangePreset::FullWeek);

    assert!(names.iter().all(|name| name.starts_with("XM ")));
}

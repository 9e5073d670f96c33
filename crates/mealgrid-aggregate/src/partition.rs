//! Date-range partitioning.
//!
//! Resolves a range preset into the concrete date list and narrows the
//! customer list to customers with activity inside that range. Selector
//! validation happens at the request boundary; everything here assumes a
//! valid preset.

use chrono::NaiveDate;
use mealgrid_core::{AggregatedQuantity, RangePreset, ReportPeriod};

/// Concrete date list for a preset, in the fixed calendar order of the
/// business week (period start forward), independent of aggregation key
/// order.
pub fn resolve_dates(period: &ReportPeriod, preset: RangePreset) -> Vec<NaiveDate> {
    period.dates_for(preset)
}

/// Whether a customer has at least one nonzero quantity on any of the given
/// dates.
pub fn has_activity(
    aggregated: &AggregatedQuantity,
    customer: &str,
    dates: &[NaiveDate],
) -> bool {
    aggregated.get(customer).is_some_and(|per_date| {
        dates.iter().any(|date| {
            per_date
                .get(date)
                .is_some_and(|items| items.values().any(|quantity| *quantity > 0.0))
        })
    })
}

/// Narrow the supplied customer list to customers active in the date range,
/// preserving the supplied order.
///
/// A customer whose orders all fall outside `dates` is excluded entirely,
/// never shown as an all-zero column block.
pub fn active_customers(
    customers: &[String],
    aggregated: &AggregatedQuantity,
    dates: &[NaiveDate],
) -> Vec<String> {
    customers
        .iter()
        .filter(|customer| has_activity(aggregated, customer.as_str(), dates))
        .cloned()
        .collect()
}

//! Report period configuration and range presets.
//!
//! The business week (start date, length, split point) is injected
//! configuration rather than literals inside the layout code, so the engine
//! is reusable across periods without code changes. A period is at most
//! seven days so that weekday-coded sheet names stay unique within one
//! workbook.

use crate::ReportError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Range preset
// ============================================================================

/// Named sub-range of the reporting period.
///
/// `FirstHalf` and `SecondHalf` partition `FullWeek` exactly: no overlap, no
/// gap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "full_week")]
    FullWeek,
    #[serde(rename = "first_half")]
    FirstHalf,
    #[serde(rename = "second_half")]
    SecondHalf,
}

impl RangePreset {
    /// All presets, in the order they are listed to clients
    pub const ALL: [RangePreset; 3] = [
        RangePreset::FullWeek,
        RangePreset::FirstHalf,
        RangePreset::SecondHalf,
    ];

    /// Wire tag of the preset
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePreset::FullWeek => "full_week",
            RangePreset::FirstHalf => "first_half",
            RangePreset::SecondHalf => "second_half",
        }
    }

    /// Fixed output filename for this preset.
    ///
    /// Distinct per preset so artifacts from different sub-ranges never
    /// collide.
    pub fn filename(&self) -> &'static str {
        match self {
            RangePreset::FullWeek => "week_orders_full.xlsx",
            RangePreset::FirstHalf => "week_orders_first_half.xlsx",
            RangePreset::SecondHalf => "week_orders_second_half.xlsx",
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangePreset {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_week" => Ok(RangePreset::FullWeek),
            "first_half" => Ok(RangePreset::FirstHalf),
            "second_half" => Ok(RangePreset::SecondHalf),
            other => Err(ReportError::InvalidRange {
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Report period
// ============================================================================

/// The concrete business week a report covers.
///
/// `split` is the number of leading dates belonging to the first half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    start: NaiveDate,
    days: u32,
    split: u32,
}

impl ReportPeriod {
    /// Create a period of `days` calendar days starting at `start`, with the
    /// first `split` days forming the first half.
    pub fn new(start: NaiveDate, days: u32, split: u32) -> Result<Self, ReportError> {
        if days == 0 || days > 7 {
            return Err(ReportError::InvalidData(format!(
                "report period must span 1..=7 days, got {days}"
            )));
        }
        if split == 0 || split > days {
            return Err(ReportError::InvalidData(format!(
                "period split must fall within the period, got {split} of {days} days"
            )));
        }
        Ok(Self { start, days, split })
    }

    /// The deployment's fixed holiday week: Thu 2025-12-25 through
    /// Wed 2025-12-31, split after Sunday.
    pub fn default_week() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            days: 7,
            split: 4,
        }
    }

    /// Derive a period from an inclusive date range, splitting at the
    /// midpoint (the longer half first, matching the deployment template).
    pub fn from_range(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        let span = (end - start).num_days() + 1;
        if span < 1 {
            return Err(ReportError::InvalidData(format!(
                "date range ends before it starts: {start} .. {end}"
            )));
        }
        let days = span as u32;
        Self::new(start, days, (days + 1) / 2)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Inclusive end date
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(i64::from(self.days) - 1)
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn split(&self) -> u32 {
        self.split
    }

    /// Every date of the period in calendar order
    pub fn full_dates(&self) -> Vec<NaiveDate> {
        (0..i64::from(self.days))
            .map(|offset| self.start + Duration::days(offset))
            .collect()
    }

    /// The concrete date list for a preset, in calendar order
    pub fn dates_for(&self, preset: RangePreset) -> Vec<NaiveDate> {
        let all = self.full_dates();
        let split = self.split as usize;
        match preset {
            RangePreset::FullWeek => all,
            RangePreset::FirstHalf => all[..split].to_vec(),
            RangePreset::SecondHalf => all[split..].to_vec(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end()
    }
}

/// Short weekday code used in sheet names and day headers
pub fn weekday_code(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn halves_partition_the_full_week() {
        let period = ReportPeriod::default_week();
        let full = period.dates_for(RangePreset::FullWeek);
        let first = period.dates_for(RangePreset::FirstHalf);
        let second = period.dates_for(RangePreset::SecondHalf);

        let mut recombined = first.clone();
        recombined.extend(second.iter().copied());
        assert_eq!(recombined, full);

        for d in &first {
            assert!(!second.contains(d), "{d} appears in both halves");
        }
    }

    #[test]
    fn default_week_runs_thursday_to_wednesday() {
        let period = ReportPeriod::default_week();
        let codes: Vec<&str> = period.full_dates().into_iter().map(weekday_code).collect();
        assert_eq!(codes, vec!["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"]);
        assert_eq!(period.end(), date(2025, 12, 31));
    }

    #[test]
    fn first_half_is_thursday_through_sunday() {
        let period = ReportPeriod::default_week();
        let first = period.dates_for(RangePreset::FirstHalf);
        assert_eq!(first.first().copied(), Some(date(2025, 12, 25)));
        assert_eq!(first.last().copied(), Some(date(2025, 12, 28)));
        let second = period.dates_for(RangePreset::SecondHalf);
        assert_eq!(second.first().copied(), Some(date(2025, 12, 29)));
        assert_eq!(second.last().copied(), Some(date(2025, 12, 31)));
    }

    #[test]
    fn from_range_matches_default_split() {
        let period = ReportPeriod::from_range(date(2025, 12, 25), date(2025, 12, 31)).unwrap();
        assert_eq!(period, ReportPeriod::default_week());
    }

    #[test]
    fn from_range_rejects_inverted_and_oversized_ranges() {
        assert!(ReportPeriod::from_range(date(2025, 12, 31), date(2025, 12, 25)).is_err());
        assert!(ReportPeriod::from_range(date(2025, 12, 1), date(2025, 12, 31)).is_err());
    }

    #[test]
    fn preset_parses_from_wire_tags() {
        assert_eq!("full_week".parse::<RangePreset>().unwrap(), RangePreset::FullWeek);
        assert_eq!("first_half".parse::<RangePreset>().unwrap(), RangePreset::FirstHalf);
        assert_eq!("second_half".parse::<RangePreset>().unwrap(), RangePreset::SecondHalf);
    }

    #[test]
    fn invalid_preset_is_rejected_with_the_valid_values() {
        let err = "invalid_value".parse::<RangePreset>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("invalid_value"));
        for preset in RangePreset::ALL {
            assert!(msg.contains(preset.as_str()), "message misses {preset}");
        }
    }

    #[test]
    fn filenames_are_distinct_per_preset() {
        let names: Vec<&str> = RangePreset::ALL.iter().map(|p| p.filename()).collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }
}

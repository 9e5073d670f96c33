//! Cell addressing, sheet naming, and formula construction.
//!
//! Emitted formulas reference other sheets by name and cell address as plain
//! text, which couples every sheet builder to the exact names and coordinates
//! used elsewhere in the workbook. All of that text is produced here, in one
//! module, so a renamed sheet or shifted column cannot silently leave a
//! formula pointing at the wrong target.
//!
//! Rows and columns are 0-indexed throughout, matching `rust_xlsxwriter`;
//! the A1-style strings produced here are 1-indexed as Excel expects.

use chrono::NaiveDate;
use mealgrid_core::period::weekday_code;

// ============================================================================
// Cell addressing
// ============================================================================

/// Convert column number to Excel letter (0 -> A, 25 -> Z, 26 -> AA)
pub fn col_to_letter(col: u16) -> String {
    let mut result = String::new();
    let mut n = u32::from(col);
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// A1-style address of a 0-indexed (row, column) pair
pub fn cell_ref(row: u32, col: u16) -> String {
    format!("{}{}", col_to_letter(col), row + 1)
}

/// Sheet name as it appears inside a formula, quoted when Excel requires it
pub fn quoted_sheet(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain && !name.is_empty() {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

// ============================================================================
// Formula construction
// ============================================================================

/// `=Sheet!D5` reference to a single cell on another sheet
pub fn sheet_cell_formula(sheet: &str, row: u32, col: u16) -> String {
    format!("={}!{}", quoted_sheet(sheet), cell_ref(row, col))
}

/// `=SUM(D5:K5)` across a contiguous column span of one row
pub fn sum_row_formula(row: u32, first_col: u16, last_col: u16) -> String {
    format!("=SUM({}:{})", cell_ref(row, first_col), cell_ref(row, last_col))
}

/// `=SUM(B2:B9)` down a contiguous row span of one column
pub fn sum_col_formula(col: u16, first_row: u32, last_row: u32) -> String {
    format!("=SUM({}:{})", cell_ref(first_row, col), cell_ref(last_row, col))
}

/// `=SUM('NY Week'!P4:P41)` down one column of another sheet
pub fn sum_sheet_col_formula(sheet: &str, col: u16, first_row: u32, last_row: u32) -> String {
    format!(
        "=SUM({}!{}:{})",
        quoted_sheet(sheet),
        cell_ref(first_row, col),
        cell_ref(last_row, col),
    )
}

// ============================================================================
// Sheet naming
// ============================================================================

/// Daily sheet name: report tag plus the weekday code ("NY Thu").
///
/// Unique within one workbook because a report period never exceeds seven
/// days.
pub fn daily_sheet_name(tag: &str, date: NaiveDate) -> String {
    format!("{tag} {}", weekday_code(date))
}

/// Main matrix sheet name ("NY Week")
pub fn matrix_sheet_name(tag: &str) -> String {
    format!("{tag} Week")
}

/// Weekly summary sheet name ("NY Summary")
pub fn summary_sheet_name(tag: &str) -> String {
    format!("{tag} Summary")
}

/// Confirmation sheet name ("NY Confirm")
pub fn confirmation_sheet_name(tag: &str) -> String {
    format!("{tag} Confirm")
}

/// Packing list sheet name, 1-based in the label ("NY Packing 1")
pub fn packing_sheet_name(tag: &str, index: usize) -> String {
    format!("{tag} Packing {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn col_to_letter_works() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(27), "AB");
        assert_eq!(col_to_letter(51), "AZ");
        assert_eq!(col_to_letter(52), "BA");
    }

    #[test]
    fn cell_ref_is_one_indexed() {
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref(3, 1), "B4");
        assert_eq!(cell_ref(40, 27), "AB41");
    }

    #[test]
    fn sheet_names_quote_only_when_needed() {
        assert_eq!(quoted_sheet("Summary"), "Summary");
        assert_eq!(quoted_sheet("NY Thu"), "'NY Thu'");
        assert_eq!(quoted_sheet("Jack's list"), "'Jack''s list'");
    }

    #[test]
    fn sum_formulas_span_exactly_the_given_range() {
        assert_eq!(sum_row_formula(4, 3, 10), "=SUM(D5:K5)");
        assert_eq!(sum_col_formula(1, 3, 40), "=SUM(B4:B41)");
        assert_eq!(
            sum_sheet_col_formula("NY Week", 15, 3, 40),
            "=SUM('NY Week'!P4:P41)"
        );
    }

    #[test]
    fn cross_sheet_reference_uses_quoted_name() {
        assert_eq!(
            sheet_cell_formula("NY Thu", 4, 3),
            "='NY Thu'!D5"
        );
    }

    #[test]
    fn sheet_names_are_deterministic_and_distinct_for_a_week() {
        let days: Vec<String> = (25..=31)
            .map(|d| daily_sheet_name("NY", date(2025, 12, d)))
            .collect();
        assert_eq!(days[0], "NY Thu");
        assert_eq!(days[6], "NY Wed");

        let mut all = days;
        all.push(matrix_sheet_name("NY"));
        all.push(summary_sheet_name("NY"));
        all.push(confirmation_sheet_name("NY"));
        all.push(packing_sheet_name("NY", 0));
        all.push(packing_sheet_name("NY", 1));

        let mut deduped = all.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), all.len());
    }
}

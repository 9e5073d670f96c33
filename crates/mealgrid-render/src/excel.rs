//! Weekly order workbook assembler
//!
//! Generates the multi-sheet XLSX workbook used by kitchen and packing
//! operations:
//! - One daily sheet per date in the resolved range, two columns per
//!   customer (quantity, customization placeholder)
//! - The main matrix sheet: one fixed-width block per customer spanning the
//!   whole range, fed by cross-sheet references into the daily sheets
//! - A weekly summary sheet (full-week reports only) referencing the daily
//!   row-total columns
//! - A confirmation sheet listing customers, portion totals and order
//!   amounts, with manual tick columns
//! - A fixed number of static packing-list sheets
//!
//! Every derived total is a formula over the cells it summarizes, never a
//! precomputed literal, so the document stays self-consistent when raw
//! quantities are edited after opening. Reserved template rows are emitted
//! hidden rather than removed; deleting them would shift every following row
//! and break the cross-sheet row alignment.
//!
//! ## Example Output Structure
//!
//! ```text
//! Sheet: NY Thu (one per weekday)
//! | Menu item        | Total | Custom | Company A      | John          |
//! |                  |       |        | Qty | Custom   | Qty | Custom  |
//! | Bruschetta       |       |        |     |          |     |         |
//! | Mini bruschetta  | =SUM  |        | 5   |          | 2   |         |
//!
//! Sheet: NY Week
//! | Menu item        | Company A: Thu..Wed, custom Thu..Wed, Sum | ...
//! | Mini bruschetta  | ='NY Thu'!D5 ... =SUM(B5:O5)              | ...
//! ```

use chrono::NaiveDate;
use mealgrid_aggregate::{active_customers, aggregate_orders, customer_amount, resolve_dates};
use mealgrid_core::period::weekday_code;
use mealgrid_core::{
    AggregatedQuantity, ItemId, MenuItem, RangePreset, ReportData, ReportError, ReportPeriod,
    ReportRenderer,
};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::formula::{
    confirmation_sheet_name, daily_sheet_name, matrix_sheet_name, packing_sheet_name,
    sheet_cell_formula, sum_col_formula, sum_row_formula, sum_sheet_col_formula,
    summary_sheet_name,
};
use crate::layout::{DailyColumns, MatrixColumns, RowKind, RowPlan, SummaryColumns, HEADER_ROWS};

/// Default number of static packing-list sheets per workbook
const DEFAULT_PACKING_SHEETS: usize = 2;

/// Weekly order workbook renderer
#[derive(Clone, Debug)]
pub struct WorkbookRenderer {
    /// Business week configuration; derived from the payload's date range
    /// when not set explicitly
    pub period: Option<ReportPeriod>,
    /// Short tag prefixed to every sheet name
    pub sheet_tag: String,
    /// Number of static packing-list sheets
    pub packing_sheets: usize,
}

impl Default for WorkbookRenderer {
    fn default() -> Self {
        Self {
            period: None,
            sheet_tag: "NY".into(),
            packing_sheets: DEFAULT_PACKING_SHEETS,
        }
    }
}

impl WorkbookRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the business week explicitly
    pub fn period(mut self, period: ReportPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Set the sheet name tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.sheet_tag = tag.into();
        self
    }

    /// Set the number of packing-list sheets
    pub fn packing_sheets(mut self, count: usize) -> Self {
        self.packing_sheets = count;
        self
    }

    /// Generate workbook bytes for one preset of the payload
    pub fn render_to_bytes(
        &self,
        data: &ReportData,
        preset: RangePreset,
    ) -> Result<Vec<u8>, ReportError> {
        let period = self.resolve_period(data)?;
        let dates = resolve_dates(&period, preset);
        if dates.is_empty() {
            return Err(ReportError::InvalidData(format!(
                "preset '{preset}' resolves to no dates for this period"
            )));
        }

        // Re-derive the aggregate when raw orders are present; otherwise the
        // payload's pre-aggregated map is used as supplied
        let aggregated: AggregatedQuantity = if data.orders.is_empty() {
            data.aggregated_data.clone()
        } else {
            aggregate_orders(&data.orders, &data.menu_items)
        };

        let customers = active_customers(&data.customers, &aggregated, &dates);
        let plan = RowPlan::build(&data.menu_items);

        let names = self.sheet_names(&dates, preset);
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ReportError::Workbook(format!(
                    "duplicate sheet name '{name}'"
                )));
            }
        }

        info!(
            preset = %preset,
            dates = dates.len(),
            customers = customers.len(),
            items = plan.item_count(),
            "generating workbook"
        );

        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        for date in &dates {
            self.add_daily_sheet(&mut workbook, *date, &plan, &customers, &aggregated, &formats)?;
        }
        self.add_matrix_sheet(&mut workbook, &dates, &plan, &customers, &formats)?;
        if preset == RangePreset::FullWeek {
            self.add_summary_sheet(&mut workbook, &dates, &plan, &formats)?;
        }
        self.add_confirmation_sheet(
            &mut workbook,
            &dates,
            &plan,
            &customers,
            &aggregated,
            &data.menu_items,
            &formats,
        )?;
        for index in 0..self.packing_sheets {
            self.add_packing_sheet(&mut workbook, index, &plan, &formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| ReportError::Workbook(format!("failed to create workbook: {e}")))
    }

    /// Every sheet name this renderer will emit for a preset, in workbook
    /// order. Also the name source for cross-sheet formulas.
    pub fn sheet_names(&self, dates: &[NaiveDate], preset: RangePreset) -> Vec<String> {
        let mut names: Vec<String> = dates
            .iter()
            .map(|date| daily_sheet_name(&self.sheet_tag, *date))
            .collect();
        names.push(matrix_sheet_name(&self.sheet_tag));
        if preset == RangePreset::FullWeek {
            names.push(summary_sheet_name(&self.sheet_tag));
        }
        names.push(confirmation_sheet_name(&self.sheet_tag));
        for index in 0..self.packing_sheets {
            names.push(packing_sheet_name(&self.sheet_tag, index));
        }
        names
    }

    fn resolve_period(&self, data: &ReportData) -> Result<ReportPeriod, ReportError> {
        if let Some(period) = self.period {
            return Ok(period);
        }
        let range = data.date_range.as_ref().ok_or_else(|| {
            ReportError::InvalidData(
                "payload carries no date range and the renderer has no configured period".into(),
            )
        })?;
        ReportPeriod::from_range(range.start, range.end)
    }

    /// Create reusable formats
    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let day_header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0xD9E1F2)
            .set_border(FormatBorder::Thin);

        let category = Format::new()
            .set_bold()
            .set_background_color(0xD9D9D9)
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        let qty = Format::new()
            .set_num_format("0.##")
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        let total = Format::new()
            .set_bold()
            .set_num_format("0.##")
            .set_align(FormatAlign::Center)
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        let amount = Format::new()
            .set_num_format("#,##0")
            .set_border(FormatBorder::Thin);

        let total_amount = Format::new()
            .set_bold()
            .set_num_format("#,##0")
            .set_background_color(0xE2EFDA)
            .set_border(FormatBorder::Thin);

        ExcelFormats {
            header,
            day_header,
            category,
            text,
            qty,
            total,
            amount,
            total_amount,
        }
    }

    /// Add one daily sheet: per-customer quantities for a single date
    fn add_daily_sheet(
        &self,
        workbook: &mut Workbook,
        date: NaiveDate,
        plan: &RowPlan,
        customers: &[String],
        aggregated: &AggregatedQuantity,
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        let name = daily_sheet_name(&self.sheet_tag, date);
        debug!(sheet = %name, "adding daily sheet");

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&name)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        let columns = DailyColumns::new(customers.len());

        // Leading headers span all three header rows
        sheet
            .merge_range(0, DailyColumns::NAME_COL, 2, DailyColumns::NAME_COL, "Menu item", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;
        sheet
            .merge_range(0, DailyColumns::ROW_TOTAL_COL, 2, DailyColumns::ROW_TOTAL_COL, "Total", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;
        sheet
            .merge_range(0, DailyColumns::CUSTOM_TOTAL_COL, 2, DailyColumns::CUSTOM_TOTAL_COL, "Custom", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        // Customer blocks: merged name, sub-labels, date line
        let date_label = format!("{} {}", weekday_code(date), date.format("%d.%m"));
        for (index, customer) in customers.iter().enumerate() {
            let qty_col = columns.qty_col(index);
            let custom_col = columns.custom_col(index);
            sheet
                .merge_range(0, qty_col, 0, custom_col, customer, &formats.header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
            sheet
                .write_with_format(1, qty_col, "Qty", &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
            sheet
                .write_with_format(1, custom_col, "Custom", &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
            sheet
                .merge_range(2, qty_col, 2, custom_col, &date_label, &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        }

        // Body rows from the shared skeleton
        for (index, kind) in plan.rows().iter().enumerate() {
            let row = plan.sheet_row(index);
            match kind {
                RowKind::Blank => {}
                RowKind::Filler => {
                    sheet
                        .set_row_hidden(row)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                }
                RowKind::CategoryLabel(category) => {
                    self.write_category_row(sheet, row, columns.last_col(), category.label(), formats)?;
                }
                RowKind::Item { id, name } => {
                    sheet
                        .write_with_format(row, DailyColumns::NAME_COL, name, &formats.text)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;

                    // Row total sums the whole contiguous customer span;
                    // customization cells are empty unless filled in by hand,
                    // and then the total picks them up on recalculation
                    match columns.data_span() {
                        Some((first, last)) => {
                            let formula = sum_row_formula(row, first, last);
                            sheet
                                .write_formula_with_format(row, DailyColumns::ROW_TOTAL_COL, formula.as_str(), &formats.total)
                                .map_err(|e| ReportError::Workbook(e.to_string()))?;
                        }
                        None => {
                            sheet
                                .write_blank(row, DailyColumns::ROW_TOTAL_COL, &formats.total)
                                .map_err(|e| ReportError::Workbook(e.to_string()))?;
                        }
                    }
                    // Spare customization-total column, reserved
                    sheet
                        .write_blank(row, DailyColumns::CUSTOM_TOTAL_COL, &formats.text)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;

                    for (customer_index, customer) in customers.iter().enumerate() {
                        let quantity = quantity_for(aggregated, customer, date, *id);
                        self.write_quantity_cell(
                            sheet,
                            row,
                            columns.qty_col(customer_index),
                            quantity,
                            formats,
                        )?;
                        sheet
                            .write_blank(row, columns.custom_col(customer_index), &formats.qty)
                            .map_err(|e| ReportError::Workbook(e.to_string()))?;
                    }
                }
            }
        }

        // Column widths
        sheet.set_column_width(DailyColumns::NAME_COL, 32).ok();
        sheet.set_column_width(DailyColumns::ROW_TOTAL_COL, 8).ok();
        sheet.set_column_width(DailyColumns::CUSTOM_TOTAL_COL, 8).ok();
        for index in 0..customers.len() {
            sheet.set_column_width(columns.qty_col(index), 7).ok();
            sheet.set_column_width(columns.custom_col(index), 7).ok();
        }

        sheet.set_freeze_panes(HEADER_ROWS, DailyColumns::LEADING_COLS).ok();

        Ok(())
    }

    /// Add the main matrix sheet: the whole range, one block per customer
    fn add_matrix_sheet(
        &self,
        workbook: &mut Workbook,
        dates: &[NaiveDate],
        plan: &RowPlan,
        customers: &[String],
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        let name = matrix_sheet_name(&self.sheet_tag);
        debug!(sheet = %name, "adding matrix sheet");

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&name)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        let columns = MatrixColumns::new(customers.len(), dates.len());
        let daily = DailyColumns::new(customers.len());
        let days = dates.len();

        sheet
            .merge_range(0, MatrixColumns::NAME_COL, 2, MatrixColumns::NAME_COL, "Menu item", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        for (index, customer) in customers.iter().enumerate() {
            let start = columns.block_start(index);
            let total_col = columns.block_total_col(index);

            sheet
                .merge_range(0, start, 0, total_col, customer, &formats.header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;

            // Group labels over the day and customization sub-columns
            self.write_group_label(
                sheet,
                1,
                columns.day_col(index, 0),
                columns.day_col(index, days - 1),
                "Total",
                formats,
            )?;
            self.write_group_label(
                sheet,
                1,
                columns.custom_col(index, 0),
                columns.custom_col(index, days - 1),
                "Custom",
                formats,
            )?;
            sheet
                .merge_range(1, total_col, 2, total_col, "Sum", &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;

            // Per-day abbreviations, repeated under both groups
            for (day, date) in dates.iter().enumerate() {
                sheet
                    .write_with_format(2, columns.day_col(index, day), weekday_code(*date), &formats.day_header)
                    .map_err(|e| ReportError::Workbook(e.to_string()))?;
                sheet
                    .write_with_format(2, columns.custom_col(index, day), weekday_code(*date), &formats.day_header)
                    .map_err(|e| ReportError::Workbook(e.to_string()))?;
            }
        }

        for (index, kind) in plan.rows().iter().enumerate() {
            let row = plan.sheet_row(index);
            match kind {
                RowKind::Blank => {}
                RowKind::Filler => {
                    sheet
                        .set_row_hidden(row)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                }
                RowKind::CategoryLabel(category) => {
                    self.write_category_row(sheet, row, columns.last_col(), category.label(), formats)?;
                }
                RowKind::Item { name: item_name, .. } => {
                    sheet
                        .write_with_format(row, MatrixColumns::NAME_COL, item_name, &formats.text)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;

                    for customer_index in 0..customers.len() {
                        // Day cells reference the matching daily sheet: same
                        // row, the customer's quantity column over there
                        for (day, date) in dates.iter().enumerate() {
                            let source = daily_sheet_name(&self.sheet_tag, *date);
                            let formula =
                                sheet_cell_formula(&source, row, daily.qty_col(customer_index));
                            sheet
                                .write_formula_with_format(
                                    row,
                                    columns.day_col(customer_index, day),
                                    formula.as_str(),
                                    &formats.qty,
                                )
                                .map_err(|e| ReportError::Workbook(e.to_string()))?;
                            sheet
                                .write_blank(row, columns.custom_col(customer_index, day), &formats.qty)
                                .map_err(|e| ReportError::Workbook(e.to_string()))?;
                        }

                        // Block total sums exactly this customer's own block
                        let (first, last) = columns.block_data_span(customer_index);
                        let formula = sum_row_formula(row, first, last);
                        sheet
                            .write_formula_with_format(
                                row,
                                columns.block_total_col(customer_index),
                                formula.as_str(),
                                &formats.total,
                            )
                            .map_err(|e| ReportError::Workbook(e.to_string()))?;
                    }
                }
            }
        }

        sheet.set_column_width(MatrixColumns::NAME_COL, 32).ok();
        for index in 0..customers.len() {
            for day in 0..days {
                sheet.set_column_width(columns.day_col(index, day), 6).ok();
                sheet.set_column_width(columns.custom_col(index, day), 6).ok();
            }
            sheet.set_column_width(columns.block_total_col(index), 8).ok();
        }

        sheet.set_freeze_panes(HEADER_ROWS, MatrixColumns::LEADING_COLS).ok();

        Ok(())
    }

    /// Add the weekly summary sheet (full-week reports only)
    fn add_summary_sheet(
        &self,
        workbook: &mut Workbook,
        dates: &[NaiveDate],
        plan: &RowPlan,
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        let name = summary_sheet_name(&self.sheet_tag);
        debug!(sheet = %name, "adding summary sheet");

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&name)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        let columns = SummaryColumns::new(dates.len());
        let days = dates.len();

        sheet
            .merge_range(0, SummaryColumns::NAME_COL, 2, SummaryColumns::NAME_COL, "Menu item", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;
        self.write_group_label(
            sheet,
            0,
            columns.day_col(0),
            columns.day_col(days - 1),
            "Portions per day",
            formats,
        )?;
        sheet
            .merge_range(0, columns.week_total_col(), 2, columns.week_total_col(), "Week", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;
        for (day, date) in dates.iter().enumerate() {
            sheet
                .write_with_format(2, columns.day_col(day), weekday_code(*date), &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        }

        for (index, kind) in plan.rows().iter().enumerate() {
            let row = plan.sheet_row(index);
            match kind {
                RowKind::Blank => {}
                RowKind::Filler => {
                    sheet
                        .set_row_hidden(row)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                }
                RowKind::CategoryLabel(category) => {
                    self.write_category_row(sheet, row, columns.week_total_col(), category.label(), formats)?;
                }
                RowKind::Item { name: item_name, .. } => {
                    sheet
                        .write_with_format(row, SummaryColumns::NAME_COL, item_name, &formats.text)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;

                    // Day columns reference the daily sheets' row-total column
                    for (day, date) in dates.iter().enumerate() {
                        let source = daily_sheet_name(&self.sheet_tag, *date);
                        let formula =
                            sheet_cell_formula(&source, row, DailyColumns::ROW_TOTAL_COL);
                        sheet
                            .write_formula_with_format(row, columns.day_col(day), formula.as_str(), &formats.qty)
                            .map_err(|e| ReportError::Workbook(e.to_string()))?;
                    }

                    // Week total sums the day-reference columns on this row
                    let formula = sum_row_formula(row, columns.day_col(0), columns.day_col(days - 1));
                    sheet
                        .write_formula_with_format(row, columns.week_total_col(), formula.as_str(), &formats.total)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                }
            }
        }

        sheet.set_column_width(SummaryColumns::NAME_COL, 32).ok();
        for day in 0..days {
            sheet.set_column_width(columns.day_col(day), 7).ok();
        }
        sheet.set_column_width(columns.week_total_col(), 8).ok();

        sheet.set_freeze_panes(HEADER_ROWS, 1).ok();

        Ok(())
    }

    /// Add the confirmation sheet: one row per customer with portion totals,
    /// order amounts and manual tick columns
    fn add_confirmation_sheet(
        &self,
        workbook: &mut Workbook,
        dates: &[NaiveDate],
        plan: &RowPlan,
        customers: &[String],
        aggregated: &AggregatedQuantity,
        menu_items: &[MenuItem],
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        let name = confirmation_sheet_name(&self.sheet_tag);
        debug!(sheet = %name, "adding confirmation sheet");

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&name)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        let headers = [
            "Customer",
            "Portions",
            "Amount",
            "Confirmed (order)",
            "Confirmed (delivery)",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, *header, &formats.header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        }

        let matrix = MatrixColumns::new(customers.len(), dates.len());
        let matrix_name = matrix_sheet_name(&self.sheet_tag);
        let (body_first, body_last) = plan.body_range();

        let mut row = 1u32;
        for (index, customer) in customers.iter().enumerate() {
            sheet
                .write_with_format(row, 0, customer, &formats.text)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;

            // Portion total: the customer's own block-total column on the
            // matrix sheet, summed over the item grid
            let formula = sum_sheet_col_formula(
                &matrix_name,
                matrix.block_total_col(index),
                body_first,
                body_last,
            );
            sheet
                .write_formula_with_format(row, 1, formula.as_str(), &formats.qty)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;

            // Order amount is priced from the catalog; prices appear on no
            // other sheet, so this is a raw-data literal
            let amount = customer_amount(aggregated, customer, dates, menu_items);
            sheet
                .write_with_format(row, 2, amount as f64, &formats.amount)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;

            // Manual tick columns
            sheet
                .write_blank(row, 3, &formats.text)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
            sheet
                .write_blank(row, 4, &formats.text)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;

            row += 1;
        }

        // Total row
        if !customers.is_empty() {
            sheet
                .write_with_format(row, 0, "TOTAL", &formats.total_amount)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
            let portions = sum_col_formula(1, 1, row - 1);
            sheet
                .write_formula_with_format(row, 1, portions.as_str(), &formats.total)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
            let amounts = sum_col_formula(2, 1, row - 1);
            sheet
                .write_formula_with_format(row, 2, amounts.as_str(), &formats.total_amount)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        }

        sheet.set_column_width(0, 28).ok();
        sheet.set_column_width(1, 10).ok();
        sheet.set_column_width(2, 12).ok();
        sheet.set_column_width(3, 18).ok();
        sheet.set_column_width(4, 18).ok();

        sheet.set_freeze_panes(1, 0).ok();

        Ok(())
    }

    /// Add one static packing-list sheet: the item skeleton plus empty count
    /// and tick columns for manual use
    fn add_packing_sheet(
        &self,
        workbook: &mut Workbook,
        index: usize,
        plan: &RowPlan,
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        let name = packing_sheet_name(&self.sheet_tag, index);
        debug!(sheet = %name, "adding packing sheet");

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&name)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        const COUNT_COL: u16 = 1;
        const PACKED_COL: u16 = 2;

        sheet
            .merge_range(0, 0, 2, 0, "Menu item", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;
        sheet
            .merge_range(0, COUNT_COL, 2, COUNT_COL, "Count", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;
        sheet
            .merge_range(0, PACKED_COL, 2, PACKED_COL, "Packed", &formats.header)
            .map_err(|e| ReportError::Workbook(e.to_string()))?;

        for (row_index, kind) in plan.rows().iter().enumerate() {
            let row = plan.sheet_row(row_index);
            match kind {
                RowKind::Blank => {}
                RowKind::Filler => {
                    sheet
                        .set_row_hidden(row)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                }
                RowKind::CategoryLabel(category) => {
                    self.write_category_row(sheet, row, PACKED_COL, category.label(), formats)?;
                }
                RowKind::Item { name: item_name, .. } => {
                    sheet
                        .write_with_format(row, 0, item_name, &formats.text)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                    sheet
                        .write_blank(row, COUNT_COL, &formats.qty)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                    sheet
                        .write_blank(row, PACKED_COL, &formats.qty)
                        .map_err(|e| ReportError::Workbook(e.to_string()))?;
                }
            }
        }

        sheet.set_column_width(0, 32).ok();
        sheet.set_column_width(COUNT_COL, 8).ok();
        sheet.set_column_width(PACKED_COL, 8).ok();

        sheet.set_freeze_panes(HEADER_ROWS, 1).ok();

        Ok(())
    }

    /// Write a category label row merged across the sheet's used width
    fn write_category_row(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        last_col: u16,
        label: &str,
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        if last_col > 0 {
            sheet
                .merge_range(row, 0, row, last_col, label, &formats.category)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        } else {
            sheet
                .write_with_format(row, 0, label, &formats.category)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        }
        Ok(())
    }

    /// Write a merged group label, degrading to a plain cell for a
    /// single-column group (merges must span more than one cell)
    fn write_group_label(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        first_col: u16,
        last_col: u16,
        label: &str,
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        if last_col > first_col {
            sheet
                .merge_range(row, first_col, row, last_col, label, &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        } else {
            sheet
                .write_with_format(row, first_col, label, &formats.day_header)
                .map_err(|e| ReportError::Workbook(e.to_string()))?;
        }
        Ok(())
    }

    /// Write a raw quantity cell. Zero renders blank to keep the grid
    /// readable; the cell keeps its format so manual edits land cleanly.
    fn write_quantity_cell(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        col: u16,
        quantity: Option<f64>,
        formats: &ExcelFormats,
    ) -> Result<(), ReportError> {
        match quantity {
            Some(q) if q > 0.0 => {
                sheet
                    .write_with_format(row, col, q, &formats.qty)
                    .map_err(|e| ReportError::Workbook(e.to_string()))?;
            }
            _ => {
                sheet
                    .write_blank(row, col, &formats.qty)
                    .map_err(|e| ReportError::Workbook(e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Look up one raw quantity in the aggregate
fn quantity_for(
    aggregated: &AggregatedQuantity,
    customer: &str,
    date: NaiveDate,
    item: ItemId,
) -> Option<f64> {
    aggregated
        .get(customer)
        .and_then(|per_date| per_date.get(&date))
        .and_then(|items| items.get(&item))
        .copied()
}

/// Reusable Excel formats
struct ExcelFormats {
    header: Format,
    day_header: Format,
    category: Format,
    text: Format,
    qty: Format,
    total: Format,
    amount: Format,
    total_amount: Format,
}

impl ReportRenderer for WorkbookRenderer {
    type Output = Vec<u8>;

    fn render(&self, data: &ReportData, preset: RangePreset) -> Result<Vec<u8>, ReportError> {
        self.render_to_bytes(data, preset)
    }
}

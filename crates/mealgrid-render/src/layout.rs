//! Sheet layout planning.
//!
//! Every item-grid sheet of a workbook (the daily sheets, the main matrix,
//! the weekly summary, the packing lists) is built from one shared
//! [`RowPlan`] computed once per report run. That is what keeps a menu item
//! on the same row index everywhere, which in turn is what lets cross-sheet
//! formulas reference matching rows without translation.
//!
//! Column skeletons are declarative too: a fixed leading block, then one
//! fixed-width block per customer whose internal sub-column order is
//! identical for every customer. Only the block's starting offset varies,
//! computed as `leading + index * width`.

use mealgrid_core::{Category, ItemId, MenuItem};
use std::collections::HashMap;

/// Header rows at the top of every item-grid sheet
pub const HEADER_ROWS: u32 = 3;

/// Reserved row count per category block.
///
/// The workbook template predates the current catalog; categories that have
/// shrunk keep their reserved rows as hidden filler so row numbers stay
/// aligned with documents produced from earlier catalogs. A category that
/// outgrows its budget extends the block (filler pads, never truncates).
pub const CATEGORY_ROW_BUDGETS: [(Category, usize); 6] = [
    (Category::Bruschetta, 6),
    (Category::HotDishes, 10),
    (Category::Snacks, 8),
    (Category::Canapes, 8),
    (Category::Salads, 6),
    (Category::Tartlets, 6),
];

fn budget_for(category: Category) -> usize {
    CATEGORY_ROW_BUDGETS
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, rows)| *rows)
        .unwrap_or(0)
}

// ============================================================================
// Row skeleton
// ============================================================================

/// One row of the shared sheet skeleton
#[derive(Clone, Debug, PartialEq)]
pub enum RowKind {
    /// Visible spacer between category blocks
    Blank,
    /// Category label row
    CategoryLabel(Category),
    /// One menu item
    Item { id: ItemId, name: String },
    /// Reserved template row, emitted hidden
    Filler,
}

/// The ordered row skeleton shared by every item-grid sheet of one report.
///
/// Row coordinates are absolute sheet rows (0-indexed, headers included) and
/// are stable for the lifetime of the report run.
#[derive(Clone, Debug, PartialEq)]
pub struct RowPlan {
    rows: Vec<RowKind>,
    item_rows: HashMap<ItemId, u32>,
}

impl RowPlan {
    /// Build the skeleton from the catalog: categories in fixed display
    /// order, items in catalog insertion order within each category, hidden
    /// filler up to the category's reserved budget, one blank spacer between
    /// category blocks.
    pub fn build(menu_items: &[MenuItem]) -> Self {
        let mut rows = Vec::new();
        let mut item_rows = HashMap::new();

        for category in Category::ALL {
            rows.push(RowKind::CategoryLabel(category));

            let mut in_category = 0usize;
            for item in menu_items.iter().filter(|item| item.category == category) {
                item_rows.insert(item.id, HEADER_ROWS + rows.len() as u32);
                rows.push(RowKind::Item {
                    id: item.id,
                    name: item.name.clone(),
                });
                in_category += 1;
            }

            for _ in in_category..budget_for(category) {
                rows.push(RowKind::Filler);
            }

            rows.push(RowKind::Blank);
        }
        // No spacer after the last block
        rows.pop();

        Self { rows, item_rows }
    }

    pub fn rows(&self) -> &[RowKind] {
        &self.rows
    }

    /// Absolute sheet row of the skeleton entry at `index`
    pub fn sheet_row(&self, index: usize) -> u32 {
        HEADER_ROWS + index as u32
    }

    /// Absolute sheet row of a menu item; identical on every sheet built
    /// from this plan
    pub fn item_row(&self, id: ItemId) -> Option<u32> {
        self.item_rows.get(&id).copied()
    }

    /// First and last absolute sheet rows of the item grid
    pub fn body_range(&self) -> (u32, u32) {
        (
            HEADER_ROWS,
            HEADER_ROWS + self.rows.len().saturating_sub(1) as u32,
        )
    }

    pub fn item_count(&self) -> usize {
        self.item_rows.len()
    }
}

// ============================================================================
// Column skeletons
// ============================================================================

/// Column skeleton of a daily sheet: three fixed leading columns (item name,
/// row total, spare customization total), then a two-column block per
/// customer (quantity, customization placeholder).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyColumns {
    customers: u16,
}

impl DailyColumns {
    pub const NAME_COL: u16 = 0;
    pub const ROW_TOTAL_COL: u16 = 1;
    /// Spare customization-total column kept for template compatibility
    pub const CUSTOM_TOTAL_COL: u16 = 2;
    pub const LEADING_COLS: u16 = 3;
    pub const BLOCK_WIDTH: u16 = 2;

    pub fn new(customers: usize) -> Self {
        Self {
            customers: customers as u16,
        }
    }

    pub fn customers(&self) -> u16 {
        self.customers
    }

    pub fn block_start(&self, customer: usize) -> u16 {
        Self::LEADING_COLS + customer as u16 * Self::BLOCK_WIDTH
    }

    /// Quantity column of one customer's block
    pub fn qty_col(&self, customer: usize) -> u16 {
        self.block_start(customer)
    }

    /// Customization placeholder column of one customer's block
    pub fn custom_col(&self, customer: usize) -> u16 {
        self.block_start(customer) + 1
    }

    /// Contiguous span of all customer columns, `None` when the report has
    /// no customers. Row-total formulas sum exactly this span.
    pub fn data_span(&self) -> Option<(u16, u16)> {
        (self.customers > 0).then(|| {
            (
                Self::LEADING_COLS,
                Self::LEADING_COLS + self.customers * Self::BLOCK_WIDTH - 1,
            )
        })
    }

    /// Rightmost used column
    pub fn last_col(&self) -> u16 {
        self.data_span()
            .map_or(Self::LEADING_COLS - 1, |(_, last)| last)
    }
}

/// Column skeleton of the main matrix sheet: one leading name column, then
/// per customer a block of per-day sub-columns, a parallel set of
/// customization sub-columns, and one trailing block-total sub-column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatrixColumns {
    customers: u16,
    days: u16,
}

impl MatrixColumns {
    pub const NAME_COL: u16 = 0;
    pub const LEADING_COLS: u16 = 1;

    pub fn new(customers: usize, days: usize) -> Self {
        Self {
            customers: customers as u16,
            days: days as u16,
        }
    }

    pub fn customers(&self) -> u16 {
        self.customers
    }

    pub fn days(&self) -> u16 {
        self.days
    }

    /// Block width: day sub-columns, customization sub-columns, block total
    pub fn block_width(&self) -> u16 {
        2 * self.days + 1
    }

    pub fn block_start(&self, customer: usize) -> u16 {
        Self::LEADING_COLS + customer as u16 * self.block_width()
    }

    /// Per-day quantity sub-column within one customer's block
    pub fn day_col(&self, customer: usize, day: usize) -> u16 {
        self.block_start(customer) + day as u16
    }

    /// Per-day customization sub-column within one customer's block
    pub fn custom_col(&self, customer: usize, day: usize) -> u16 {
        self.block_start(customer) + self.days + day as u16
    }

    /// Trailing block-total sub-column of one customer's block
    pub fn block_total_col(&self, customer: usize) -> u16 {
        self.block_start(customer) + 2 * self.days
    }

    /// The sub-columns a block total sums: exactly this customer's own
    /// 2×days data columns, never a neighbor's.
    pub fn block_data_span(&self, customer: usize) -> (u16, u16) {
        (
            self.block_start(customer),
            self.block_total_col(customer) - 1,
        )
    }

    /// Rightmost used column
    pub fn last_col(&self) -> u16 {
        if self.customers == 0 {
            Self::LEADING_COLS - 1
        } else {
            Self::LEADING_COLS + self.customers * self.block_width() - 1
        }
    }
}

/// Column skeleton of the weekly summary sheet: item name, one column per
/// day of the full week, one trailing week-total column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SummaryColumns {
    days: u16,
}

impl SummaryColumns {
    pub const NAME_COL: u16 = 0;

    pub fn new(days: usize) -> Self {
        Self { days: days as u16 }
    }

    pub fn days(&self) -> u16 {
        self.days
    }

    pub fn day_col(&self, day: usize) -> u16 {
        1 + day as u16
    }

    pub fn week_total_col(&self) -> u16 {
        1 + self.days
    }
}

//! # mealgrid-render
//!
//! XLSX workbook rendering for mealgrid weekly order reports.
//!
//! This crate provides:
//! - The sheet layout planner: shared row skeleton and per-customer column
//!   blocks (`layout`)
//! - Cell addressing, sheet naming and formula construction (`formula`)
//! - The workbook assembler (`excel`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use mealgrid_core::{RangePreset, ReportRenderer};
//! use mealgrid_render::WorkbookRenderer;
//!
//! let renderer = WorkbookRenderer::new().tag("NY");
//! let xlsx_bytes = renderer.render(&payload, RangePreset::FullWeek)?;
//! std::fs::write(RangePreset::FullWeek.filename(), xlsx_bytes)?;
//! ```

pub mod excel;
pub mod formula;
pub mod layout;

pub use excel::WorkbookRenderer;

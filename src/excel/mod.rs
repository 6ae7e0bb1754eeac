//! Excel import/export for plan workbooks
//!
//! - Import: master data sheet (.xlsx) → [`ActivityAreaRecord`]s plus raw copies
//! - Export: [`Plan`] → multi-sheet workbook with styling and status dropdowns
//!
//! [`ActivityAreaRecord`]: crate::types::ActivityAreaRecord
//! [`Plan`]: crate::types::Plan

mod exporter;
mod importer;

pub use exporter::{
    PlanExporter, EVENTS_PLACEHOLDER, EVENTS_SHEET, MAINTENANCE_SHEET, SHEET_ORDER,
};
pub use importer::{column_letter, records_from_sheet, ImportedWorkbook, WorkbookImporter};

//! Workbook importer - master data sheet (.xlsx) → records

use crate::config::{ColumnNames, PlanConfig};
use crate::error::{PlanError, PlanResult};
use crate::types::{ActivityAreaRecord, CellValue, RawSheet};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything the generator needs from the input workbook
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedWorkbook {
    pub records: Vec<ActivityAreaRecord>,
    /// The master data sheet as read, for the Working_Sheet copy
    pub working: RawSheet,
    /// The passthrough sheet, when the input has one
    pub events: Option<RawSheet>,
}

/// Reads the master data sheet and the optional passthrough sheet
pub struct WorkbookImporter {
    path: PathBuf,
}

impl WorkbookImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> PlanResult<Xlsx<std::io::BufReader<std::fs::File>>> {
        open_workbook(&self.path).map_err(|e| {
            PlanError::Import(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Import the sheets named in `config`.
    ///
    /// A missing master sheet is an error; a missing passthrough sheet is
    /// logged and reported as `None`.
    pub fn import(&self, config: &PlanConfig) -> PlanResult<ImportedWorkbook> {
        let mut workbook = self.open()?;
        let sheet_names = workbook.sheet_names().to_vec();

        let working_name = &config.sheets.working;
        if !sheet_names.iter().any(|n| n == working_name) {
            return Err(PlanError::MissingSheet(working_name.clone()));
        }
        let range = workbook.worksheet_range(working_name).map_err(|e| {
            PlanError::Import(format!("Failed to read sheet '{}': {}", working_name, e))
        })?;
        let working = sheet_from_range(working_name, &range);
        let records = records_from_sheet(&working, &config.columns)?;
        info!(
            sheet = %working_name,
            rows = working.rows.len(),
            records = records.len(),
            "imported master data"
        );

        let events_name = &config.sheets.events;
        let events = if sheet_names.iter().any(|n| n == events_name) {
            match workbook.worksheet_range(events_name) {
                Ok(range) => Some(sheet_from_range(events_name, &range)),
                Err(e) => {
                    warn!(sheet = %events_name, error = %e, "could not read passthrough sheet");
                    None
                }
            }
        } else {
            warn!(sheet = %events_name, "passthrough sheet not found, using placeholder");
            None
        };

        Ok(ImportedWorkbook {
            records,
            working,
            events,
        })
    }

    /// Every sheet in workbook order, read as raw tables
    pub fn read_all_sheets(&self) -> PlanResult<Vec<RawSheet>> {
        let mut workbook = self.open()?;
        let sheet_names = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name).map_err(|e| {
                PlanError::Import(format!("Failed to read sheet '{}': {}", name, e))
            })?;
            sheets.push(sheet_from_range(&name, &range));
        }
        Ok(sheets)
    }
}

/// Convert one calamine cell. Date cells keep their serial number.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(d) => CellValue::Number(d.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// First row becomes the headers; fully empty rows are dropped
fn sheet_from_range(name: &str, range: &Range<Data>) -> RawSheet {
    let mut sheet = RawSheet::new(name);
    let mut rows = range.rows();

    if let Some(header_row) = rows.next() {
        sheet.headers = header_row
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                cell_value(cell)
                    .as_text()
                    .unwrap_or_else(|| format!("col_{}", col))
            })
            .collect();
    }

    let width = sheet.headers.len();
    for row in rows {
        let mut values: Vec<CellValue> = row.iter().map(cell_value).collect();
        if values.iter().all(CellValue::is_empty) {
            continue;
        }
        values.resize(width.max(values.len()), CellValue::Empty);
        sheet.rows.push(values);
    }

    sheet
}

/// Column positions of the master data fields
struct ColumnLayout {
    activity: usize,
    city: usize,
    area: usize,
    current_clubs: Option<usize>,
    target_clubs: Option<usize>,
    current_meetups_per_week: Option<usize>,
    current_days: Option<usize>,
    target_days: Option<usize>,
    current_attendance: Option<usize>,
    target_attendance: Option<usize>,
    price_per_person: Option<usize>,
    current_revenue: Option<usize>,
    january_revenue: Option<usize>,
    target_revenue: Option<usize>,
    strategy: Option<usize>,
}

impl ColumnLayout {
    fn resolve(sheet: &RawSheet, columns: &ColumnNames) -> PlanResult<Self> {
        let required = |header: &str| {
            sheet
                .column_index(header)
                .ok_or_else(|| PlanError::MissingColumn {
                    sheet: sheet.name.clone(),
                    column: header.to_string(),
                })
        };
        let optional = |header: &str| {
            let idx = sheet.column_index(header);
            if idx.is_none() {
                debug!(sheet = %sheet.name, column = header, "optional column missing");
            }
            idx
        };

        Ok(Self {
            activity: required(&columns.activity)?,
            city: required(&columns.city)?,
            area: required(&columns.area)?,
            current_clubs: optional(&columns.current_clubs),
            target_clubs: optional(&columns.target_clubs),
            current_meetups_per_week: optional(&columns.current_meetups_per_week),
            current_days: optional(&columns.current_days),
            target_days: optional(&columns.target_days),
            current_attendance: optional(&columns.current_attendance),
            target_attendance: optional(&columns.target_attendance),
            price_per_person: optional(&columns.price_per_person),
            current_revenue: optional(&columns.current_revenue),
            january_revenue: optional(&columns.january_revenue),
            target_revenue: optional(&columns.target_revenue),
            strategy: optional(&columns.strategy),
        })
    }
}

fn cell(row: &[CellValue], idx: Option<usize>) -> Option<&CellValue> {
    idx.and_then(|i| row.get(i))
}

fn text(row: &[CellValue], idx: Option<usize>) -> Option<String> {
    cell(row, idx).and_then(CellValue::as_text)
}

fn number(row: &[CellValue], idx: Option<usize>) -> Option<f64> {
    cell(row, idx).and_then(CellValue::as_number)
}

fn count(row: &[CellValue], idx: Option<usize>) -> Option<u32> {
    number(row, idx).map(|n| n.max(0.0).round() as u32)
}

/// Build records from the master data sheet.
///
/// Rows without an activity are skipped. Unparseable numbers become zero,
/// or absent for the optional fields.
pub fn records_from_sheet(
    sheet: &RawSheet,
    columns: &ColumnNames,
) -> PlanResult<Vec<ActivityAreaRecord>> {
    let layout = ColumnLayout::resolve(sheet, columns)?;
    let mut records = Vec::with_capacity(sheet.rows.len());

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let Some(activity) = text(row, Some(layout.activity)) else {
            debug!(row = row_idx + 2, "skipping row without activity");
            continue;
        };

        records.push(ActivityAreaRecord {
            activity,
            city: text(row, Some(layout.city)).unwrap_or_default(),
            area: text(row, Some(layout.area)).unwrap_or_default(),
            current_clubs: count(row, layout.current_clubs).unwrap_or(0),
            target_clubs: count(row, layout.target_clubs),
            current_meetups_per_week: number(row, layout.current_meetups_per_week)
                .unwrap_or(0.0),
            current_days: text(row, layout.current_days),
            target_days: text(row, layout.target_days),
            current_attendance: number(row, layout.current_attendance),
            target_attendance: number(row, layout.target_attendance),
            price_per_person: number(row, layout.price_per_person).unwrap_or(0.0),
            current_revenue: number(row, layout.current_revenue).unwrap_or(0.0),
            january_revenue: number(row, layout.january_revenue).unwrap_or(0.0),
            target_revenue: number(row, layout.target_revenue).unwrap_or(0.0),
            strategy: text(row, layout.strategy).unwrap_or_default(),
        });
    }

    Ok(records)
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
pub fn column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_cell(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn master_sheet() -> RawSheet {
        let columns = ColumnNames::default();
        let mut sheet = RawSheet::new("Working sheet");
        sheet.headers = vec![
            columns.activity.clone(),
            columns.city.clone(),
            columns.area.clone(),
            columns.current_clubs.clone(),
            columns.target_clubs.clone(),
            columns.target_days.clone(),
            columns.current_revenue.clone(),
            columns.target_revenue.clone(),
        ];
        sheet.rows = vec![
            vec![
                text_cell("MUSIC"),
                text_cell("Gurgaon"),
                text_cell("South City"),
                CellValue::Number(1.0),
                CellValue::Number(3.0),
                text_cell("Saturday, Sunday"),
                CellValue::Number(40_000.0),
                text_cell("₹1,60,000"),
            ],
            vec![
                text_cell("CHESS"),
                text_cell("Delhi"),
                text_cell("Saket"),
                text_cell("n/a"),
                CellValue::Empty,
                text_cell("nan"),
                CellValue::Empty,
                CellValue::Number(5_000.0),
            ],
        ];
        sheet
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_cell_value_conversion() {
        assert_eq!(cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            cell_value(&Data::String("x".to_string())),
            CellValue::Text("x".to_string())
        );
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_records_from_sheet() {
        let records = records_from_sheet(&master_sheet(), &ColumnNames::default()).unwrap();

        assert_eq!(records.len(), 2);
        let music = &records[0];
        assert_eq!(music.activity, "MUSIC");
        assert_eq!(music.current_clubs, 1);
        assert_eq!(music.target_clubs, Some(3));
        assert_eq!(music.target_days.as_deref(), Some("Saturday, Sunday"));
        // Currency text is parsed leniently
        assert_eq!(music.target_revenue, 160_000.0);
        // Columns absent from the sheet fall back to defaults
        assert_eq!(music.current_attendance, None);
        assert_eq!(music.strategy, "");

        let chess = &records[1];
        assert_eq!(chess.current_clubs, 0);
        assert_eq!(chess.target_clubs, None);
        assert_eq!(chess.target_days, None);
        assert_eq!(chess.current_revenue, 0.0);
    }

    #[test]
    fn test_malformed_numbers_count_as_zero() {
        let mut sheet = master_sheet();
        sheet.rows[0][6] = text_cell("Rs. 40,000");
        sheet.rows[0][7] = text_cell("v2");
        sheet.rows[0][4] = text_cell("(3)");
        let records = records_from_sheet(&sheet, &ColumnNames::default()).unwrap();

        let music = &records[0];
        assert_eq!(music.current_revenue, 40_000.0);
        assert_eq!(music.target_revenue, 0.0);
        assert_eq!(music.target_clubs, None);
    }

    #[test]
    fn test_rows_without_activity_are_skipped() {
        let mut sheet = master_sheet();
        sheet.rows[1][0] = CellValue::Empty;
        let records = records_from_sheet(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_required_column() {
        let mut sheet = master_sheet();
        sheet.headers[2] = "Neighbourhood".to_string();
        let err = records_from_sheet(&sheet, &ColumnNames::default()).unwrap_err();
        match err {
            PlanError::MissingColumn { sheet, column } => {
                assert_eq!(sheet, "Working sheet");
                assert_eq!(column, "Area");
            }
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_header_lookup_ignores_case_and_padding() {
        let mut sheet = master_sheet();
        sheet.headers[0] = "  activity ".to_string();
        let records = records_from_sheet(&sheet, &ColumnNames::default()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let importer = WorkbookImporter::new("/nonexistent/input.xlsx");
        let result = importer.import(&PlanConfig::default());
        assert!(matches!(result, Err(PlanError::Import(_))));
    }
}

//! Plan exporter - Plan → multi-sheet Excel workbook (.xlsx)

use super::importer::ImportedWorkbook;
use crate::config::PlanConfig;
use crate::error::{PlanError, PlanResult};
use crate::planner::is_priority_week;
use crate::types::{ActionStatus, CellValue, Plan, Priority, RawSheet};
use rust_xlsxwriter::{
    DataValidation, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::path::Path;
use tracing::{debug, info};

pub const EXPANSION_SHEET: &str = "Club_Expansion";
pub const LAUNCH_SHEET: &str = "Club_Launches";
pub const SUMMARY_SHEET: &str = "Summary";
pub const WEEKLY_SHEET: &str = "Weekly_Execution";
pub const MILESTONE_SHEET: &str = "Milestone";
pub const CITY_PROGRESS_SHEET: &str = "City_Progress";
pub const WORKING_SHEET: &str = "Working_Sheet";
pub const EVENTS_SHEET: &str = "Events";
pub const LOGIC_SHEET: &str = "Logic";
pub const MAINTENANCE_SHEET: &str = "Club_Maintenance";

/// Output sheets in workbook order, without the optional maintenance sheet
pub const SHEET_ORDER: [&str; 9] = [
    EXPANSION_SHEET,
    LAUNCH_SHEET,
    SUMMARY_SHEET,
    WEEKLY_SHEET,
    MILESTONE_SHEET,
    CITY_PROGRESS_SHEET,
    WORKING_SHEET,
    EVENTS_SHEET,
    LOGIC_SHEET,
];

pub const EVENTS_PLACEHOLDER: &str = "Events sheet not found in original file";

const EXPANSION_HEADERS: [&str; 21] = [
    "Action ID",
    "Week Group",
    "Type",
    "Priority",
    "City",
    "Area",
    "Activity",
    "Club To Expand",
    "Current Schedule",
    "Target Schedule",
    "Current Capacity",
    "Target Capacity",
    "Specific Action",
    "Success Criteria",
    "Revenue Impact (₹)",
    "Status",
    "Target Date",
    "Duration (weeks)",
    "Owner",
    "Dependencies",
    "Strategy Notes",
];

const LAUNCH_HEADERS: [&str; 19] = [
    "Action ID",
    "Week Group",
    "Type",
    "Priority",
    "City",
    "Area",
    "Activity",
    "Club Name",
    "Target Schedule",
    "Target Capacity",
    "Specific Action",
    "Success Criteria",
    "Revenue Target (₹)",
    "Status",
    "Target Date",
    "Duration (weeks)",
    "Owner",
    "Dependencies",
    "Strategy Notes",
];

const SUMMARY_HEADERS: [&str; 7] = [
    "Metric",
    "Current State",
    "Target State",
    "Gap",
    "Actions Required",
    "Timeline",
    "Priority",
];

const WEEKLY_HEADERS: [&str; 9] = [
    "Week",
    "Period",
    "Focus Area",
    "Launch Actions",
    "Expansion Actions",
    "Revenue Target (₹)",
    "Key Activities",
    "Success Metrics",
    "Risks & Mitigation",
];

const MILESTONE_HEADERS: [&str; 10] = [
    "Milestone ID",
    "Description",
    "Target Date",
    "Priority",
    "Dependencies",
    "Success Criteria",
    "Owner",
    "Status",
    "Progress %",
    "Notes",
];

const CITY_HEADERS: [&str; 13] = [
    "City",
    "Activity",
    "Current Clubs",
    "Target Clubs",
    "New Clubs Needed",
    "Current Revenue",
    "Target Revenue",
    "Revenue Gap",
    "Progress %",
    "Launch Actions",
    "Expansion Actions",
    "Total Actions",
    "Priority Level",
];

const LOGIC_HEADERS: [&str; 4] = ["Component", "Logic", "Formula/Calculation", "Purpose"];

const MAINTENANCE_HEADERS: [&str; 8] = [
    "Activity",
    "City",
    "Area",
    "Club Names",
    "Current Clubs",
    "Maintenance Strategy",
    "Focus Area",
    "Expected Outcome",
];

/// Cell styles shared by every sheet
struct SheetFormats {
    header: Format,
    maintenance_header: Format,
    max_scaling: Format,
    high_priority: Format,
    medium_priority: Format,
    data: Format,
    number: Format,
    currency: Format,
    dropdown: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            maintenance_header: Format::new()
                .set_bold()
                .set_background_color(0x2F5233)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            max_scaling: Format::new()
                .set_bold()
                .set_background_color(0xFF0000)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            high_priority: Format::new()
                .set_bold()
                .set_background_color(0xFF6B6B)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            medium_priority: Format::new()
                .set_bold()
                .set_background_color(0xFFA500)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            data: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Left)
                .set_text_wrap(),
            number: Format::new()
                .set_border(FormatBorder::Thin)
                .set_num_format("#,##0"),
            currency: Format::new()
                .set_border(FormatBorder::Thin)
                .set_num_format("₹#,##0"),
            dropdown: Format::new()
                .set_background_color(0xF2F2F2)
                .set_border(FormatBorder::Thin)
                .set_unlocked(),
        }
    }

    /// Red for top activities, plain data otherwise
    fn activity(&self, is_top: bool) -> &Format {
        if is_top {
            &self.max_scaling
        } else {
            &self.data
        }
    }

    fn priority(&self, priority: Priority) -> &Format {
        match priority {
            Priority::Critical => &self.max_scaling,
            Priority::High => &self.high_priority,
            _ => &self.medium_priority,
        }
    }
}

/// Writes a generated [`Plan`] plus the source sheets into one workbook.
///
/// The workbook is assembled in memory and only written by [`export`],
/// so a failure never leaves a partial file behind.
///
/// [`export`]: PlanExporter::export
pub struct PlanExporter<'a> {
    plan: &'a Plan,
    source: &'a ImportedWorkbook,
    config: &'a PlanConfig,
    formats: SheetFormats,
}

impl<'a> PlanExporter<'a> {
    pub fn new(plan: &'a Plan, source: &'a ImportedWorkbook, config: &'a PlanConfig) -> Self {
        Self {
            plan,
            source,
            config,
            formats: SheetFormats::new(),
        }
    }

    /// Sheet names this exporter will write, in order
    pub fn sheet_names(&self) -> Vec<&'static str> {
        let mut names = SHEET_ORDER.to_vec();
        if self.config.include_maintenance_sheet {
            names.push(MAINTENANCE_SHEET);
        }
        names
    }

    /// Build the workbook and save it to `output_path`
    pub fn export(&self, output_path: &Path) -> PlanResult<()> {
        let mut workbook = self.build()?;
        workbook.save(output_path).map_err(|e| {
            PlanError::Export(format!(
                "Failed to save Excel file {}: {}",
                output_path.display(),
                e
            ))
        })?;
        info!(path = %output_path.display(), sheets = self.sheet_names().len(), "saved plan workbook");
        Ok(())
    }

    fn build(&self) -> PlanResult<Workbook> {
        let mut workbook = Workbook::new();

        self.write_expansions(add_sheet(&mut workbook, EXPANSION_SHEET)?)?;
        self.write_launches(add_sheet(&mut workbook, LAUNCH_SHEET)?)?;
        self.write_summary(add_sheet(&mut workbook, SUMMARY_SHEET)?)?;
        self.write_weekly(add_sheet(&mut workbook, WEEKLY_SHEET)?)?;
        self.write_milestones(add_sheet(&mut workbook, MILESTONE_SHEET)?)?;
        self.write_city_progress(add_sheet(&mut workbook, CITY_PROGRESS_SHEET)?)?;
        self.write_raw_sheet(
            add_sheet(&mut workbook, WORKING_SHEET)?,
            &self.source.working,
            |col| if col < 9 { 15.0 } else { 12.0 },
        )?;

        let events = add_sheet(&mut workbook, EVENTS_SHEET)?;
        match &self.source.events {
            Some(sheet) => self.write_raw_sheet(events, sheet, |_| 15.0)?,
            None => write_text(events, 0, 0, EVENTS_PLACEHOLDER, &self.formats.header)?,
        }

        self.write_logic(add_sheet(&mut workbook, LOGIC_SHEET)?)?;

        if self.config.include_maintenance_sheet {
            self.write_maintenance(add_sheet(&mut workbook, MAINTENANCE_SHEET)?)?;
        }

        Ok(workbook)
    }

    fn write_headers(
        &self,
        worksheet: &mut Worksheet,
        headers: &[&str],
        width: impl Fn(u16) -> f64,
    ) -> PlanResult<()> {
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            write_text(worksheet, 0, col, header, &self.formats.header)?;
            worksheet
                .set_column_width(col, width(col))
                .map_err(|e| PlanError::Export(format!("Failed to set column width: {}", e)))?;
        }
        Ok(())
    }

    /// Status cells: shaded, unlocked, restricted to the status list
    fn write_status(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        status: ActionStatus,
    ) -> PlanResult<()> {
        let validation = DataValidation::new()
            .allow_list_strings(&ActionStatus::labels())
            .map_err(|e| PlanError::Export(format!("Failed to build status list: {}", e)))?;
        worksheet
            .add_data_validation(row, col, row, col, &validation)
            .map_err(|e| PlanError::Export(format!("Failed to add status dropdown: {}", e)))?;
        write_text(worksheet, row, col, status.as_str(), &self.formats.dropdown)
    }

    fn write_expansions(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &EXPANSION_HEADERS, |col| match col {
            7 | 12 | 19 | 20 => 30.0,
            8 | 9 => 20.0,
            _ => 12.0,
        })?;

        for (idx, action) in self.plan.expansions.iter().enumerate() {
            let row = idx as u32 + 1;
            let emphasis = f.activity(self.config.is_top_activity(&action.activity));

            write_text(ws, row, 0, &action.id, emphasis)?;
            write_text(ws, row, 1, &self.config.week_group_label(action.target_week), emphasis)?;
            write_text(ws, row, 2, &action.action_type, emphasis)?;
            write_text(ws, row, 3, action.priority.as_str(), emphasis)?;
            write_text(ws, row, 4, &action.city, &f.data)?;
            write_text(ws, row, 5, &action.area, &f.data)?;
            write_text(ws, row, 6, &action.activity, emphasis)?;
            write_text(ws, row, 7, &action.club_to_expand, &f.data)?;
            write_text(ws, row, 8, &action.current_schedule, &f.data)?;
            write_text(ws, row, 9, &action.target_schedule, emphasis)?;
            write_number(ws, row, 10, f64::from(action.current_capacity), &f.number)?;
            write_number(ws, row, 11, f64::from(action.target_capacity), &f.number)?;
            write_text(ws, row, 12, &action.specific_action, &f.data)?;
            write_text(ws, row, 13, &action.success_criteria, &f.data)?;
            write_number(ws, row, 14, action.revenue_impact, &f.currency)?;
            self.write_status(ws, row, 15, action.status)?;
            write_text(ws, row, 16, &action.target_date, &f.data)?;
            write_number(ws, row, 17, f64::from(action.duration_weeks), &f.number)?;
            write_text(ws, row, 18, &action.owner, &f.data)?;
            write_text(ws, row, 19, &action.dependencies, &f.data)?;
            write_text(ws, row, 20, &action.strategy_notes, &f.data)?;
        }
        debug!(rows = self.plan.expansions.len(), "wrote {}", EXPANSION_SHEET);
        Ok(())
    }

    fn write_launches(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &LAUNCH_HEADERS, |col| match col {
            7 | 10 | 17 | 18 => 30.0,
            8 => 20.0,
            _ => 12.0,
        })?;

        for (idx, action) in self.plan.launches.iter().enumerate() {
            let row = idx as u32 + 1;
            let emphasis = f.activity(self.config.is_top_activity(&action.activity));

            write_text(ws, row, 0, &action.id, emphasis)?;
            write_text(ws, row, 1, &self.config.week_group_label(action.target_week), emphasis)?;
            write_text(ws, row, 2, &action.action_type, emphasis)?;
            write_text(ws, row, 3, action.priority.as_str(), emphasis)?;
            write_text(ws, row, 4, &action.city, &f.data)?;
            write_text(ws, row, 5, &action.area, &f.data)?;
            write_text(ws, row, 6, &action.activity, emphasis)?;
            write_text(ws, row, 7, &action.club_name, &f.data)?;
            write_text(ws, row, 8, &action.target_schedule, emphasis)?;
            write_number(ws, row, 9, f64::from(action.target_capacity), &f.number)?;
            write_text(ws, row, 10, &action.specific_action, &f.data)?;
            write_text(ws, row, 11, &action.success_criteria, &f.data)?;
            write_number(ws, row, 12, action.revenue_target, &f.currency)?;
            self.write_status(ws, row, 13, action.status)?;
            write_text(ws, row, 14, &action.target_date, &f.data)?;
            write_number(ws, row, 15, f64::from(action.duration_weeks), &f.number)?;
            write_text(ws, row, 16, &action.owner, &f.data)?;
            write_text(ws, row, 17, &action.dependencies, &f.data)?;
            write_text(ws, row, 18, &action.strategy_notes, &f.data)?;
        }
        debug!(rows = self.plan.launches.len(), "wrote {}", LAUNCH_SHEET);
        Ok(())
    }

    fn write_summary(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &SUMMARY_HEADERS, |_| 18.0)?;

        for (idx, summary) in self.plan.summary.iter().enumerate() {
            let row = idx as u32 + 1;
            let emphasis = f.priority(summary.priority);
            write_text(ws, row, 0, &summary.metric, emphasis)?;
            write_text(ws, row, 1, &summary.current, &f.data)?;
            write_text(ws, row, 2, &summary.target, &f.data)?;
            write_text(ws, row, 3, &summary.gap, &f.data)?;
            write_text(ws, row, 4, &summary.actions, &f.data)?;
            write_text(ws, row, 5, &summary.timeline, &f.data)?;
            write_text(ws, row, 6, summary.priority.as_str(), emphasis)?;
        }
        Ok(())
    }

    fn write_weekly(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &WEEKLY_HEADERS, |_| 20.0)?;

        for (idx, week) in self.plan.weekly.iter().enumerate() {
            let row = idx as u32 + 1;
            let emphasis = if is_priority_week(week.week) {
                &f.high_priority
            } else {
                &f.medium_priority
            };
            write_text(ws, row, 0, &week.label(), emphasis)?;
            write_text(ws, row, 1, &week.period, emphasis)?;
            write_text(ws, row, 2, &week.focus, emphasis)?;
            write_number(ws, row, 3, week.launch_actions as f64, &f.number)?;
            write_number(ws, row, 4, week.expansion_actions as f64, &f.number)?;
            write_number(ws, row, 5, week.revenue_target, &f.currency)?;
            write_text(ws, row, 6, &week.key_activities, &f.data)?;
            write_text(ws, row, 7, &week.success_metrics, &f.data)?;
            write_text(ws, row, 8, &week.risks, &f.data)?;
        }
        Ok(())
    }

    fn write_milestones(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &MILESTONE_HEADERS, |_| 18.0)?;

        for (idx, milestone) in self.plan.milestones.iter().enumerate() {
            let row = idx as u32 + 1;
            let emphasis = if milestone.priority == Priority::Critical {
                &f.max_scaling
            } else {
                &f.high_priority
            };
            write_text(ws, row, 0, &milestone.id, emphasis)?;
            write_text(ws, row, 1, &milestone.description, &f.data)?;
            write_text(ws, row, 2, &milestone.target_date, &f.data)?;
            write_text(ws, row, 3, milestone.priority.as_str(), emphasis)?;
            write_text(ws, row, 4, &milestone.dependencies, &f.data)?;
            write_text(ws, row, 5, &milestone.success_criteria, &f.data)?;
            write_text(ws, row, 6, &milestone.owner, &f.data)?;
            self.write_status(ws, row, 7, milestone.status)?;
            write_number(ws, row, 8, milestone.progress_pct, &f.number)?;
            write_text(ws, row, 9, &milestone.notes, &f.data)?;
        }
        Ok(())
    }

    fn write_city_progress(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &CITY_HEADERS, |_| 15.0)?;

        for (idx, entry) in self.plan.city_progress.iter().enumerate() {
            let row = idx as u32 + 1;
            let emphasis = f.activity(self.config.is_top_activity(&entry.activity));
            write_text(ws, row, 0, &entry.city, &f.data)?;
            write_text(ws, row, 1, &entry.activity, emphasis)?;
            write_number(ws, row, 2, f64::from(entry.current_clubs), &f.number)?;
            write_number(ws, row, 3, f64::from(entry.target_clubs), &f.number)?;
            write_number(ws, row, 4, f64::from(entry.new_clubs_needed), &f.number)?;
            write_number(ws, row, 5, entry.current_revenue, &f.currency)?;
            write_number(ws, row, 6, entry.target_revenue, &f.currency)?;
            write_number(ws, row, 7, entry.revenue_gap, &f.currency)?;
            write_number(ws, row, 8, entry.progress_pct, &f.number)?;
            write_number(ws, row, 9, entry.launch_actions as f64, &f.number)?;
            write_number(ws, row, 10, entry.expansion_actions as f64, &f.number)?;
            write_number(ws, row, 11, entry.total_actions() as f64, &f.number)?;
            write_text(ws, row, 12, entry.priority.as_str(), emphasis)?;
        }
        Ok(())
    }

    /// Copy a source sheet cell by cell; blanks keep the data style
    fn write_raw_sheet(
        &self,
        ws: &mut Worksheet,
        sheet: &RawSheet,
        width: impl Fn(u16) -> f64,
    ) -> PlanResult<()> {
        let headers: Vec<&str> = sheet.headers.iter().map(String::as_str).collect();
        self.write_headers(ws, &headers, width)?;

        let data = &self.formats.data;
        for (idx, cells) in sheet.rows.iter().enumerate() {
            let row = idx as u32 + 1;
            for (col, value) in cells.iter().enumerate() {
                let col = col as u16;
                match value {
                    CellValue::Number(n) => write_number(ws, row, col, *n, data)?,
                    CellValue::Text(s) => write_text(ws, row, col, s, data)?,
                    CellValue::Bool(b) => {
                        ws.write_boolean_with_format(row, col, *b, data)
                            .map_err(|e| {
                                PlanError::Export(format!("Failed to write boolean: {}", e))
                            })?;
                    }
                    CellValue::Empty => {
                        ws.write_blank(row, col, data).map_err(|e| {
                            PlanError::Export(format!("Failed to write blank cell: {}", e))
                        })?;
                    }
                }
            }
        }
        debug!(sheet = %sheet.name, rows = sheet.rows.len(), "copied source sheet");
        Ok(())
    }

    fn write_logic(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        self.write_headers(ws, &LOGIC_HEADERS, |_| 25.0)?;

        for (idx, entry) in self.plan.logic.iter().enumerate() {
            let row = idx as u32 + 1;
            write_text(ws, row, 0, entry.component, &f.high_priority)?;
            write_text(ws, row, 1, entry.logic, &f.data)?;
            write_text(ws, row, 2, entry.formula, &f.data)?;
            write_text(ws, row, 3, entry.purpose, &f.data)?;
        }
        Ok(())
    }

    fn write_maintenance(&self, ws: &mut Worksheet) -> PlanResult<()> {
        let f = &self.formats;
        let entries = &self.plan.maintenance;

        // Fit each column to its longest value, capped at 30
        let mut widths: Vec<usize> = MAINTENANCE_HEADERS.iter().map(|h| h.chars().count()).collect();
        for entry in entries {
            let cells = [
                entry.activity.chars().count(),
                entry.city.chars().count(),
                entry.area.chars().count(),
                entry.club_names.chars().count(),
                entry.current_clubs.to_string().len(),
                entry.strategy.chars().count(),
                entry.focus_area.chars().count(),
                entry.expected_outcome.chars().count(),
            ];
            for (w, len) in widths.iter_mut().zip(cells) {
                *w = (*w).max(len);
            }
        }

        for (col, header) in MAINTENANCE_HEADERS.iter().enumerate() {
            let col = col as u16;
            write_text(ws, 0, col, header, &f.maintenance_header)?;
            let width = (widths[col as usize] + 2).min(30) as f64;
            ws.set_column_width(col, width)
                .map_err(|e| PlanError::Export(format!("Failed to set column width: {}", e)))?;
        }

        for (idx, entry) in entries.iter().enumerate() {
            let row = idx as u32 + 1;
            write_text(ws, row, 0, &entry.activity, &f.data)?;
            write_text(ws, row, 1, &entry.city, &f.data)?;
            write_text(ws, row, 2, &entry.area, &f.data)?;
            write_text(ws, row, 3, &entry.club_names, &f.data)?;
            write_number(ws, row, 4, f64::from(entry.current_clubs), &f.number)?;
            write_text(ws, row, 5, &entry.strategy, &f.data)?;
            write_text(ws, row, 6, &entry.focus_area, &f.data)?;
            write_text(ws, row, 7, &entry.expected_outcome, &f.data)?;
        }
        debug!(rows = entries.len(), "wrote {}", MAINTENANCE_SHEET);
        Ok(())
    }
}

fn add_sheet<'w>(workbook: &'w mut Workbook, name: &str) -> PlanResult<&'w mut Worksheet> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name).map_err(|e| {
        PlanError::Export(format!("Failed to set worksheet name {}: {}", name, e))
    })?;
    Ok(worksheet)
}

fn write_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: &Format,
) -> PlanResult<()> {
    worksheet
        .write_string_with_format(row, col, text, format)
        .map_err(|e| PlanError::Export(format!("Failed to write text: {}", e)))?;
    Ok(())
}

fn write_number(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: f64,
    format: &Format,
) -> PlanResult<()> {
    worksheet
        .write_number_with_format(row, col, value, format)
        .map_err(|e| PlanError::Export(format!("Failed to write number: {}", e)))?;
    Ok(())
}

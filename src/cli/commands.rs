use crate::config::PlanConfig;
use crate::error::{PlanError, PlanResult};
use crate::excel::{column_letter, PlanExporter, WorkbookImporter};
use crate::format::{format_grouped, format_rupees};
use crate::planner::build_plan;
use crate::types::{ActionStatus, Plan, RawSheet};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments of the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub maintenance: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

/// `"<stem> PLAN.xlsx"` in the input's directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clubplan".to_string());
    input.with_file_name(format!("{stem} PLAN.xlsx"))
}

/// Load the config file if one was given, else the built-in defaults
pub fn load_config(path: Option<&Path>) -> PlanResult<PlanConfig> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading configuration");
            PlanConfig::load(p)
        }
        None => Ok(PlanConfig::default()),
    }
}

/// Execute the generate command
pub fn generate(options: GenerateOptions) -> PlanResult<()> {
    let GenerateOptions {
        input,
        output,
        config,
        maintenance,
        dry_run,
        verbose,
    } = options;
    let output = output.unwrap_or_else(|| default_output_path(&input));

    println!("{}", "🔥 clubplan - Generating plan".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}", output.display());
    if let Some(ref c) = config {
        println!("   Config: {}", c.display());
    }
    println!();

    if dry_run {
        println!(
            "{}",
            "📋 DRY RUN MODE - No workbook will be written\n".yellow()
        );
    }

    let mut config = load_config(config.as_deref())?;
    if maintenance {
        config.include_maintenance_sheet = true;
    }

    if verbose {
        println!("{}", "📖 Reading workbook...".cyan());
    }
    let imported = WorkbookImporter::new(&input).import(&config)?;
    if verbose {
        println!(
            "   Found {} records in '{}'",
            imported.records.len(),
            config.sheets.working
        );
        match &imported.events {
            Some(events) => println!("   Found '{}' ({} rows)\n", events.name, events.rows.len()),
            None => println!(
                "   {}\n",
                format!("'{}' sheet not found, placeholder will be written", config.sheets.events)
                    .yellow()
            ),
        }
        println!("{}", "🧮 Planning actions...".cyan());
    }

    let plan = build_plan(&imported.records, &config);
    print_plan_summary(&plan);

    let exporter = PlanExporter::new(&plan, &imported, &config);
    if verbose || dry_run {
        println!("{}", "📊 Sheets:".bold());
        for (idx, name) in exporter.sheet_names().iter().enumerate() {
            println!("   {}. {}", idx + 1, name);
        }
        println!();
    }

    if dry_run {
        println!("{}", "📋 Dry run complete - no workbook written".yellow());
        return Ok(());
    }

    exporter.export(&output)?;
    println!("{}", "✅ Plan workbook written".bold().green());
    println!("   File: {}\n", output.display());

    Ok(())
}

fn print_plan_summary(plan: &Plan) {
    println!("{}", "✅ Plan Summary:".bold().green());
    println!(
        "   📋 Total actions:     {}",
        plan.total_actions().to_string().bold()
    );
    println!("   🚀 Club launches:     {}", plan.launches.len());
    println!("   📈 Club expansions:   {}", plan.expansions.len());
    println!(
        "   💰 Revenue:           {} → {} (Jan) → {} (Mar)",
        format_rupees(plan.revenue.current),
        format_rupees(plan.revenue.january),
        format_rupees(plan.revenue.target)
    );
    println!();

    for row in &plan.summary {
        println!(
            "   {} {} → {} ({}) [{}]",
            format!("{}:", row.metric).bright_blue().bold(),
            row.current,
            row.target,
            row.gap,
            row.actions
        );
    }

    let busiest = plan
        .weekly
        .iter()
        .max_by_key(|w| w.launch_actions + w.expansion_actions);
    if let Some(week) = busiest {
        if week.launch_actions + week.expansion_actions > 0 {
            println!(
                "   Busiest week: {} ({} launches, {} expansions, ₹{})",
                week.period.bold(),
                week.launch_actions,
                week.expansion_actions,
                format_grouped(week.revenue_target)
            );
        }
    }
    println!();
}

//==============================================================================
// Inspect
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub letter: String,
    pub header: String,
}

/// Shape of one sheet, as printed by `inspect`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub name: String,
    /// Data rows, header excluded
    pub rows: usize,
    pub columns: usize,
    pub headers: Vec<ColumnReport>,
    /// Counts per value of the `Status` column, when the sheet has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_counts: Option<BTreeMap<String, usize>>,
}

impl SheetReport {
    pub fn from_sheet(sheet: &RawSheet) -> Self {
        let headers = sheet
            .headers
            .iter()
            .enumerate()
            .map(|(idx, header)| ColumnReport {
                letter: column_letter(idx),
                header: header.clone(),
            })
            .collect();

        Self {
            name: sheet.name.clone(),
            rows: sheet.rows.len(),
            columns: sheet.headers.len(),
            headers,
            status_counts: status_distribution(sheet),
        }
    }
}

/// Count the values of the `Status` column; blanks count as `(blank)`
pub fn status_distribution(sheet: &RawSheet) -> Option<BTreeMap<String, usize>> {
    let idx = sheet.column_index("Status")?;
    let mut counts = BTreeMap::new();
    for row in &sheet.rows {
        let value = row
            .get(idx)
            .and_then(|c| c.as_text())
            .unwrap_or_else(|| "(blank)".to_string());
        *counts.entry(value).or_insert(0) += 1;
    }
    Some(counts)
}

/// Execute the inspect command
pub fn inspect(file: PathBuf, json: bool) -> PlanResult<()> {
    let sheets = WorkbookImporter::new(&file).read_all_sheets()?;
    let reports: Vec<SheetReport> = sheets.iter().map(SheetReport::from_sheet).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("{}", "🔍 clubplan - Workbook inspection".bold().green());
    println!("   File: {}", file.display());
    println!("   Sheets: {}\n", reports.len());

    for (idx, report) in reports.iter().enumerate() {
        println!(
            "{} {} ({} rows × {} columns)",
            format!("{}.", idx + 1).bold(),
            report.name.bright_blue().bold(),
            report.rows,
            report.columns
        );
        for column in &report.headers {
            println!("   {}: {}", column.letter.cyan(), column.header);
        }
        if let Some(counts) = &report.status_counts {
            println!("   {}", "Status distribution:".bold());
            for (status, count) in counts {
                let label = if ActionStatus::parse(status).is_some() {
                    status.green()
                } else {
                    status.yellow()
                };
                println!("      {label}: {count}");
            }
        }
        println!();
    }

    Ok(())
}

//==============================================================================
// Init config
//==============================================================================

/// Execute the init-config command
pub fn init_config(path: PathBuf, force: bool) -> PlanResult<()> {
    if path.exists() && !force {
        return Err(PlanError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let yaml = PlanConfig::default().to_yaml()?;
    fs::write(&path, yaml)?;

    println!("{}", "✅ Default configuration written".bold().green());
    println!("   File: {}", path.display());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

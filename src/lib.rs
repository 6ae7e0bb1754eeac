//! clubplan - club launch and expansion planner
//!
//! Reads an activity master sheet (one row per activity, area and city with
//! current and target clubs, schedules, attendance and revenue) and produces
//! a multi-sheet Excel execution plan.
//!
//! # Pipeline
//!
//! 1. [`excel::WorkbookImporter`] reads the master sheet into records
//! 2. [`planner::build_plan`] derives launch and expansion actions and the
//!    summary, weekly, milestone and city views
//! 3. [`excel::PlanExporter`] writes the styled workbook
//!
//! # Example
//!
//! ```no_run
//! use clubplan::config::PlanConfig;
//! use clubplan::excel::{PlanExporter, WorkbookImporter};
//! use clubplan::planner::build_plan;
//! use std::path::Path;
//!
//! let config = PlanConfig::default();
//! let imported = WorkbookImporter::new("master.xlsx").import(&config)?;
//! let plan = build_plan(&imported.records, &config);
//!
//! println!("Launches: {}", plan.launches.len());
//! println!("Expansions: {}", plan.expansions.len());
//!
//! PlanExporter::new(&plan, &imported, &config).export(Path::new("plan.xlsx"))?;
//! # Ok::<(), clubplan::error::PlanError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod format;
pub mod planner;
pub mod schedule;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use config::PlanConfig;
pub use error::{PlanError, PlanResult};
pub use planner::build_plan;
pub use types::{ActivityAreaRecord, ExpansionAction, LaunchAction, Plan, Priority};

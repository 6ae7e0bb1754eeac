//! Plan generation: gap classification, action synthesis and aggregation.
//!
//! Everything here is pure. [`build_plan`] takes the imported records and a
//! [`PlanConfig`] and returns a [`Plan`]; identical inputs always produce
//! identical plans.

mod expansion;
mod launch;
mod views;

pub use expansion::generate_expansions;
pub use launch::generate_launches;
pub use views::{
    city_progress, is_priority_week, logic_entries, maintenance_entries, milestones,
    revenue_totals, summary, weekly_plan, WEEKLY_PLAN_WEEKS,
};

use crate::config::{PlanConfig, PriorityWeeks};
use crate::types::{ActivityAreaRecord, Plan, Priority};
use chrono::{Days, NaiveDate};
use tracing::info;

/// Sequential id source scoped to one plan build.
///
/// Numbers start at 1. Launches and expansions each own a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCounter {
    next: u32,
}

impl Default for ActionCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionCounter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next sequence number
    pub fn take(&mut self) -> u32 {
        let n = self.next;
        self.next += 1;
        n
    }

    /// How many numbers have been handed out so far
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

/// `start + (week - 1)` weeks. Week 0 is treated as week 1; dates past
/// the calendar range clamp to [`NaiveDate::MAX`].
pub fn target_date(start: NaiveDate, week: u32) -> NaiveDate {
    let offset = u64::from(week.saturating_sub(1)) * 7;
    start
        .checked_add_days(Days::new(offset))
        .unwrap_or(NaiveDate::MAX)
}

/// Short display form used in the action sheets: `"Nov 04, 2024"`
pub fn format_target_date(start: NaiveDate, week: u32) -> String {
    target_date(start, week).format("%b %d, %Y").to_string()
}

/// Pick priority and base week: allowlisted activities are always HIGH,
/// otherwise `metric > threshold` decides between MEDIUM and LOW.
pub(crate) fn classify_priority(
    is_top: bool,
    metric: f64,
    threshold: f64,
    weeks: PriorityWeeks,
) -> (Priority, u32) {
    if is_top {
        (Priority::High, weeks.high)
    } else if metric > threshold {
        (Priority::Medium, weeks.medium)
    } else {
        (Priority::Low, weeks.low)
    }
}

/// Duration in weeks: top activities move faster
pub(crate) fn duration_weeks(is_top: bool) -> u32 {
    if is_top {
        2
    } else {
        3
    }
}

/// Python-style title case: `"SOCIAL_DEDUCTIONS"` → `"Social_Deductions"`
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Run the whole pipeline over the imported records
pub fn build_plan(records: &[ActivityAreaRecord], config: &PlanConfig) -> Plan {
    let overrides = config.overrides();

    let launches = generate_launches(records, config, &overrides);
    let expansions = generate_expansions(records, config, &overrides);
    info!(
        records = records.len(),
        launches = launches.len(),
        expansions = expansions.len(),
        "generated actions"
    );

    let plan = Plan {
        summary: summary(records, &launches, &expansions, config),
        weekly: weekly_plan(&launches, &expansions, config),
        milestones: milestones(records),
        city_progress: city_progress(records, &launches, &expansions, config),
        logic: logic_entries(),
        maintenance: maintenance_entries(records, config),
        revenue: revenue_totals(records),
        launches,
        expansions,
    };
    info!(
        weeks = plan.weekly.len(),
        city_rows = plan.city_progress.len(),
        "aggregated plan views"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_starts_at_one() {
        let mut counter = ActionCounter::new();
        assert_eq!(counter.issued(), 0);
        assert_eq!(counter.take(), 1);
        assert_eq!(counter.take(), 2);
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn test_target_date_adds_weeks() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
        assert_eq!(target_date(start, 1), start);
        assert_eq!(
            target_date(start, 2),
            NaiveDate::from_ymd_opt(2024, 11, 4).unwrap()
        );
        assert_eq!(
            target_date(start, 10),
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
        );
        assert_eq!(target_date(start, 0), start);
        assert_eq!(target_date(start, u32::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_unvalidated_huge_base_week_does_not_panic() {
        let mut config = PlanConfig::default();
        config.base_weeks.launch.low = u32::MAX;
        config.base_weeks.expansion.low = u32::MAX;
        let record = ActivityAreaRecord {
            activity: "CHESS".to_string(),
            area: "Saket".to_string(),
            city: "Delhi".to_string(),
            current_clubs: 1,
            target_clubs: Some(3),
            target_revenue: 5_000.0,
            ..Default::default()
        };

        let plan = build_plan(&[record], &config);
        assert_eq!(plan.launches.len(), 2);
        assert!(plan.launches.iter().all(|l| l.target_week == u32::MAX));
        assert_eq!(plan.expansions[0].target_week, u32::MAX);
    }

    #[test]
    fn test_format_target_date() {
        let start = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
        assert_eq!(format_target_date(start, 1), "Oct 28, 2024");
        assert_eq!(format_target_date(start, 2), "Nov 04, 2024");
    }

    #[test]
    fn test_classify_priority() {
        let weeks = PriorityWeeks {
            high: 2,
            medium: 5,
            low: 8,
        };
        assert_eq!(
            classify_priority(true, 0.0, 50_000.0, weeks),
            (Priority::High, 2)
        );
        assert_eq!(
            classify_priority(false, 60_000.0, 50_000.0, weeks),
            (Priority::Medium, 5)
        );
        // Threshold itself is not "above"
        assert_eq!(
            classify_priority(false, 50_000.0, 50_000.0, weeks),
            (Priority::Low, 8)
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("BOARDGAMING"), "Boardgaming");
        assert_eq!(title_case("SOCIAL_DEDUCTIONS"), "Social_Deductions");
        assert_eq!(title_case("open mic"), "Open Mic");
    }
}

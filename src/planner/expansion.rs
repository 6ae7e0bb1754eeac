//! Expansion actions for clubs that already exist

use super::{classify_priority, duration_weeks, format_target_date, title_case, ActionCounter};
use crate::config::PlanConfig;
use crate::format::format_rupees;
use crate::schedule::{DaySchedule, ScheduleOverrides};
use crate::types::{ActionStatus, ActivityAreaRecord, ExpansionAction};
use std::collections::HashMap;
use tracing::debug;

/// Target weeks for consecutive expansions alternate over this many weeks
const EXPANSION_SPREAD_WEEKS: u32 = 2;

/// Gap metrics of one record, before any action text is built
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpansionGap {
    pub current_schedule: String,
    pub current_days: u32,
    pub target_schedule: String,
    pub target_days: u32,
    pub meetup_increase: u32,
    pub people_increase: f64,
    pub revenue_increase: f64,
}

impl ExpansionGap {
    pub(crate) fn compute(record: &ActivityAreaRecord, overrides: &ScheduleOverrides) -> Self {
        let (current_schedule, current_days) =
            match DaySchedule::parse_opt(record.current_days.as_deref()) {
                Some(s) => (s.to_string(), s.days_per_week()),
                None => {
                    let n = record.current_meetups_per_week.max(0.0) as u32;
                    (format!("{n} days/week"), n)
                }
            };

        // No target schedule means the schedule stays as it is
        let key = record.key();
        let (target_schedule, target_days) =
            match DaySchedule::parse_opt(overrides.resolve(&key, record.target_days.as_deref())) {
                Some(s) => (s.to_string(), s.days_per_week()),
                None => (current_schedule.clone(), current_days),
            };

        let people_increase = match (record.current_attendance, record.target_attendance) {
            (Some(current), Some(target)) => target - current,
            _ => 0.0,
        };

        Self {
            meetup_increase: target_days.saturating_sub(current_days),
            current_schedule,
            current_days,
            target_schedule,
            target_days,
            people_increase,
            revenue_increase: record.revenue_gap(),
        }
    }

    pub(crate) fn qualifies(&self, min_revenue_delta: f64) -> bool {
        self.meetup_increase > 0
            || self.people_increase > 0.0
            || self.revenue_increase > min_revenue_delta
    }
}

/// Expansion actions for every record with existing clubs and a gap.
///
/// Records are visited in input order. Non-top activities are prioritised by
/// the revenue gap of the whole activity across all cities and areas.
pub fn generate_expansions(
    records: &[ActivityAreaRecord],
    config: &PlanConfig,
    overrides: &ScheduleOverrides,
) -> Vec<ExpansionAction> {
    let mut activity_gaps: HashMap<&str, f64> = HashMap::new();
    for record in records {
        *activity_gaps.entry(record.activity.as_str()).or_default() += record.revenue_gap();
    }

    let mut counter = ActionCounter::new();
    let mut expansions = Vec::new();

    for record in records {
        if record.current_clubs == 0 {
            continue;
        }
        let gap = ExpansionGap::compute(record, overrides);
        if !gap.qualifies(config.thresholds.expansion_min_revenue_delta) {
            continue;
        }
        let activity_gap = activity_gaps
            .get(record.activity.as_str())
            .copied()
            .unwrap_or_default();
        expansions.push(expansion_for_record(
            record,
            &gap,
            activity_gap,
            config,
            &mut counter,
        ));
    }

    expansions.sort_by_key(|a| (!config.is_top_activity(&a.activity), a.target_week));
    expansions
}

fn expansion_for_record(
    record: &ActivityAreaRecord,
    gap: &ExpansionGap,
    activity_gap: f64,
    config: &PlanConfig,
    counter: &mut ActionCounter,
) -> ExpansionAction {
    let is_top = config.is_top_activity(&record.activity);
    let activity = &record.activity;
    let area = &record.area;

    let current_capacity = record.current_attendance.map(|a| a.max(0.0) as u32).unwrap_or(0);
    let target_capacity = record.target_attendance.map(|a| a.max(0.0) as u32).unwrap_or(0);

    let (club_to_expand, club_identifier) = if record.current_clubs == 1 {
        (
            format!("{activity} Club - {area}"),
            format!("Only club in {area}"),
        )
    } else {
        (
            format!("{activity} Main Club - {area}"),
            format!("Primary club (1 of {} clubs)", record.current_clubs),
        )
    };

    let mut changes = Vec::new();
    if gap.meetup_increase > 0 {
        changes.push(format!(
            "Expand from {} to {} days/week",
            gap.current_days, gap.target_days
        ));
        changes.push(format!("Current: {}", gap.current_schedule));
        changes.push(format!("Target: {}", gap.target_schedule));
    }
    if gap.people_increase > 0.0 {
        changes.push(format!(
            "Increase capacity from {current_capacity} to {target_capacity} people/meetup"
        ));
    }
    if changes.is_empty() {
        changes.push(format!(
            "Increase revenue from {} to {}",
            format_rupees(record.current_revenue),
            format_rupees(record.target_revenue)
        ));
    }

    let mut dependencies = Vec::new();
    if gap.meetup_increase > 0 {
        dependencies.push(format!(
            "Secure venue access for {} days/week",
            gap.target_days
        ));
        dependencies.push(format!("Confirm {} availability", gap.target_schedule));
    }
    if gap.people_increase > 0.0 {
        dependencies.push(format!("Venue capacity for {target_capacity} people"));
    }
    dependencies.push("Community Manager capacity planning".to_string());

    let (priority, base_week) = classify_priority(
        is_top,
        activity_gap,
        config.thresholds.expansion_medium_activity_gap,
        config.base_weeks.expansion,
    );
    let seq = counter.take();
    let target_week = base_week.saturating_add(seq % EXPANSION_SPREAD_WEEKS);
    let duration = duration_weeks(is_top);
    let prefix = if is_top {
        "🔥 MAX SCALING"
    } else {
        "STANDARD SCALING"
    };

    let action = ExpansionAction {
        id: format!("EXP_{seq:03}"),
        action_type: format!("{activity} Expansion"),
        priority,
        city: record.city.clone(),
        area: area.clone(),
        activity: activity.clone(),
        specific_action: format!("{prefix}: Expand {club_to_expand} - {}", changes.join(" | ")),
        success_criteria: format!(
            "Club operational with target schedule and capacity for {duration}+ consecutive weeks"
        ),
        strategy_notes: format!(
            "CLUB: {club_identifier} | CURRENT: {} ({current_capacity} people) | TARGET: {} ({target_capacity} people) | STRATEGY: {}",
            gap.current_schedule, gap.target_schedule, record.strategy
        ),
        club_to_expand,
        current_schedule: gap.current_schedule.clone(),
        target_schedule: gap.target_schedule.clone(),
        current_capacity,
        target_capacity,
        revenue_impact: gap.revenue_increase,
        target_week,
        target_date: format_target_date(config.start_date, target_week),
        duration_weeks: duration,
        owner: format!("{} Expansion Team", title_case(activity)),
        dependencies: dependencies.join(" | "),
        status: ActionStatus::NotStarted,
    };
    debug!(id = %action.id, week = target_week, priority = %priority, "expansion action");
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Priority;
    use pretty_assertions::assert_eq;

    fn existing(activity: &str, area: &str, clubs: u32) -> ActivityAreaRecord {
        ActivityAreaRecord {
            activity: activity.to_string(),
            area: area.to_string(),
            city: "Delhi".to_string(),
            current_clubs: clubs,
            target_clubs: Some(clubs),
            current_days: Some("Monday, Wednesday, Friday".to_string()),
            target_days: Some("Monday, Wednesday, Friday".to_string()),
            current_attendance: Some(20.0),
            target_attendance: Some(20.0),
            current_revenue: 10_000.0,
            target_revenue: 10_000.0,
            ..Default::default()
        }
    }

    fn generate(records: &[ActivityAreaRecord]) -> Vec<ExpansionAction> {
        let config = PlanConfig::default();
        generate_expansions(records, &config, &config.overrides())
    }

    #[test]
    fn test_no_gap_below_revenue_threshold() {
        let mut r = existing("CHESS", "Saket", 1);
        r.target_revenue = r.current_revenue + 500.0;
        assert!(generate(&[r]).is_empty());
    }

    #[test]
    fn test_revenue_gap_alone_qualifies() {
        let mut r = existing("CHESS", "Saket", 1);
        r.target_revenue = r.current_revenue + 1_500.0;
        let expansions = generate(&[r]);
        assert_eq!(expansions.len(), 1);
        assert!(expansions[0].specific_action.contains("Increase revenue from ₹10,000 to ₹11,500"));
        assert_eq!(expansions[0].revenue_impact, 1_500.0);
    }

    #[test]
    fn test_skips_records_without_clubs() {
        let mut r = existing("CHESS", "Saket", 0);
        r.target_revenue = 500_000.0;
        assert!(generate(&[r]).is_empty());
    }

    #[test]
    fn test_meetup_day_increase() {
        let mut r = existing("CHESS", "Saket", 1);
        r.target_days = Some("Monday, Wednesday, Friday, Sunday".to_string());
        let expansions = generate(&[r]);

        assert_eq!(expansions.len(), 1);
        let action = &expansions[0];
        assert_eq!(action.club_to_expand, "CHESS Club - Saket");
        assert_eq!(
            action.specific_action,
            "STANDARD SCALING: Expand CHESS Club - Saket - Expand from 3 to 4 days/week | Current: Monday, Wednesday, Friday | Target: Monday, Wednesday, Friday, Sunday"
        );
        assert!(action
            .dependencies
            .starts_with("Secure venue access for 4 days/week"));
        assert!(action.strategy_notes.starts_with("CLUB: Only club in Saket"));
    }

    #[test]
    fn test_capacity_increase_and_main_club_naming() {
        let mut r = existing("MUSIC", "Hauz Khas", 3);
        r.target_attendance = Some(30.0);
        let expansions = generate(&[r]);

        let action = &expansions[0];
        assert_eq!(action.club_to_expand, "MUSIC Main Club - Hauz Khas");
        assert!(action
            .specific_action
            .starts_with("🔥 MAX SCALING: Expand MUSIC Main Club"));
        assert!(action
            .specific_action
            .contains("Increase capacity from 20 to 30 people/meetup"));
        assert_eq!(action.current_capacity, 20);
        assert_eq!(action.target_capacity, 30);
        assert!(action.strategy_notes.contains("Primary club (1 of 3 clubs)"));
    }

    #[test]
    fn test_top_priority_and_alternating_weeks() {
        let mut a = existing("MUSIC", "A", 1);
        a.target_attendance = Some(25.0);
        let mut b = existing("MUSIC", "B", 1);
        b.target_attendance = Some(25.0);
        let mut c = existing("MUSIC", "C", 1);
        c.target_attendance = Some(25.0);

        let expansions = generate(&[a, b, c]);
        assert!(expansions.iter().all(|e| e.priority == Priority::High));
        // seq 1 → +1, seq 2 → +0, seq 3 → +1; then sorted by week
        let by_id: HashMap<&str, u32> = expansions
            .iter()
            .map(|e| (e.id.as_str(), e.target_week))
            .collect();
        assert_eq!(by_id["EXP_001"], 2);
        assert_eq!(by_id["EXP_002"], 1);
        assert_eq!(by_id["EXP_003"], 2);
        assert_eq!(expansions[0].id, "EXP_002");
    }

    #[test]
    fn test_activity_wide_gap_decides_medium() {
        let mut big = existing("CHESS", "A", 1);
        big.target_revenue = 400_000.0;
        let mut small = existing("CHESS", "B", 1);
        small.target_revenue = 12_000.0;
        let mut other = existing("POETRY", "C", 1);
        other.target_revenue = 12_000.0;

        let expansions = generate(&[big, small, other]);
        let priority_of = |area: &str| {
            expansions
                .iter()
                .find(|e| e.area == area)
                .map(|e| (e.priority, e.target_week))
                .unwrap()
        };
        // CHESS total gap is ~392k > 300k, so both CHESS rows are MEDIUM
        assert_eq!(priority_of("A"), (Priority::Medium, 7));
        assert_eq!(priority_of("B"), (Priority::Medium, 6));
        assert_eq!(priority_of("C"), (Priority::Low, 11));
    }

    #[test]
    fn test_fallback_schedules() {
        let mut r = existing("CHESS", "Saket", 1);
        r.current_days = None;
        r.current_meetups_per_week = 2.0;
        r.target_days = None;
        r.target_revenue = 50_000.0;

        let gap = ExpansionGap::compute(&r, &ScheduleOverrides::new());
        assert_eq!(gap.current_schedule, "2 days/week");
        assert_eq!(gap.target_schedule, "2 days/week");
        assert_eq!(gap.meetup_increase, 0);
        assert!(gap.qualifies(1_000.0));
    }

    #[test]
    fn test_override_raises_target_days() {
        let mut r = existing("BOARDGAMING", "GCR Extn.", 1);
        r.city = "Gurgaon".to_string();
        let expansions = generate(&[r]);
        assert_eq!(expansions.len(), 1);
        assert_eq!(
            expansions[0].target_schedule,
            "Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday"
        );
        assert!(expansions[0]
            .specific_action
            .contains("Expand from 3 to 7 days/week"));
    }
}

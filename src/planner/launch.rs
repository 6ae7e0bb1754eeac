//! New-club launch actions

use super::{classify_priority, duration_weeks, format_target_date, title_case, ActionCounter};
use crate::config::PlanConfig;
use crate::format::format_rupees;
use crate::schedule::{DaySchedule, ScheduleOverrides};
use crate::types::{ActionStatus, ActivityAreaRecord, LaunchAction};
use tracing::debug;

/// Target weeks for consecutive launches rotate over this many weeks
const LAUNCH_SPREAD_WEEKS: u32 = 3;

/// One launch action per missing club.
///
/// Records are visited in descending order of revenue gap (ties keep input
/// order); the run-wide sequence number drives both the id and the week
/// spread. The result is ordered top activities first, then by target week.
pub fn generate_launches(
    records: &[ActivityAreaRecord],
    config: &PlanConfig,
    overrides: &ScheduleOverrides,
) -> Vec<LaunchAction> {
    let mut ordered: Vec<&ActivityAreaRecord> = records.iter().collect();
    ordered.sort_by(|a, b| b.revenue_gap().total_cmp(&a.revenue_gap()));

    let mut counter = ActionCounter::new();
    let mut launches = Vec::new();

    for record in ordered {
        let needed = record.clubs_needed();
        if needed == 0 {
            continue;
        }
        launches.extend(launches_for_record(record, needed, config, overrides, &mut counter));
    }

    launches.sort_by_key(|a| (!config.is_top_activity(&a.activity), a.target_week));
    launches
}

fn launches_for_record(
    record: &ActivityAreaRecord,
    needed: u32,
    config: &PlanConfig,
    overrides: &ScheduleOverrides,
    counter: &mut ActionCounter,
) -> Vec<LaunchAction> {
    let is_top = config.is_top_activity(&record.activity);
    let activity = &record.activity;
    let area = &record.area;

    // Launch sheets keep the schedule text as entered; only the count is parsed
    let key = record.key();
    let target_days = overrides
        .resolve(&key, record.target_days.as_deref())
        .filter(|text| DaySchedule::parse(text).is_some())
        .unwrap_or(config.default_target_days.as_str())
        .trim()
        .to_string();
    let target_meetups = DaySchedule::parse(&target_days)
        .map(|s| s.days_per_week())
        .unwrap_or(0);

    let capacity = record
        .target_attendance
        .map(|a| a.max(0.0) as u32)
        .unwrap_or(config.default_capacity);

    let revenue_per_club = record.revenue_gap() / f64::from(needed);
    let (priority, base_week) = classify_priority(
        is_top,
        revenue_per_club,
        config.thresholds.launch_medium_revenue_per_club,
        config.base_weeks.launch,
    );
    let duration = duration_weeks(is_top);
    let prefix = if is_top {
        "🔥 MAX SCALING LAUNCH"
    } else {
        "STANDARD LAUNCH"
    };

    let dependencies = [
        format!("Secure venue for {target_meetups} days/week in {area}"),
        format!("Recruit Community Manager for {area}"),
        format!("Marketing campaign for {activity} in {area}"),
        format!("Equipment/setup for {capacity} people capacity"),
    ]
    .join(" | ");

    (1..=needed)
        .map(|club_num| {
            let seq = counter.take();
            let target_week = base_week.saturating_add((seq - 1) % LAUNCH_SPREAD_WEEKS);

            let (club_name, club_identifier) = if needed == 1 {
                (
                    format!("{activity} Club - {area}"),
                    format!("First club in {area}"),
                )
            } else {
                (
                    format!("{activity} Club #{club_num} - {area}"),
                    format!("Club {club_num} of {needed} planned clubs"),
                )
            };

            let action = LaunchAction {
                id: format!("LAUNCH_{seq:03}"),
                action_type: format!("{activity} Launch"),
                priority,
                city: record.city.clone(),
                area: area.clone(),
                activity: activity.clone(),
                specific_action: format!(
                    "{prefix}: Launch {club_name} with {target_meetups} days/week ({target_days})"
                ),
                success_criteria: format!(
                    "Club operational with {capacity} people/meetup for {duration}+ weeks"
                ),
                strategy_notes: format!(
                    "NEW AREA: {club_identifier} | TARGET: {target_days} ({capacity} people) | REVENUE TARGET: {} | STRATEGY: {}",
                    format_rupees(revenue_per_club),
                    record.strategy
                ),
                club_name,
                target_schedule: target_days.clone(),
                target_capacity: capacity,
                revenue_target: revenue_per_club,
                target_week,
                target_date: format_target_date(config.start_date, target_week),
                duration_weeks: duration,
                owner: format!("{} Launch Team", title_case(activity)),
                dependencies: dependencies.clone(),
                status: ActionStatus::NotStarted,
            };
            debug!(id = %action.id, week = target_week, priority = %priority, "launch action");
            action
        })
        .collect()
}

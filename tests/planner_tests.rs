//! Planner properties over a realistic master table

use chrono::{Days, NaiveDate};
use clubplan::config::PlanConfig;
use clubplan::planner::{build_plan, target_date, WEEKLY_PLAN_WEEKS};
use clubplan::types::{ActionStatus, ActivityAreaRecord, Priority};
use pretty_assertions::assert_eq;

fn row(
    activity: &str,
    city: &str,
    area: &str,
    current: u32,
    target: Option<u32>,
    revenue: (f64, f64),
) -> ActivityAreaRecord {
    ActivityAreaRecord {
        activity: activity.to_string(),
        city: city.to_string(),
        area: area.to_string(),
        current_clubs: current,
        target_clubs: target,
        current_meetups_per_week: 3.0,
        current_days: Some("Monday, Wednesday, Friday".to_string()),
        target_days: Some("Monday, Wednesday, Friday".to_string()),
        current_attendance: Some(20.0),
        target_attendance: Some(20.0),
        price_per_person: 300.0,
        current_revenue: revenue.0,
        target_revenue: revenue.1,
        ..Default::default()
    }
}

fn master_table() -> Vec<ActivityAreaRecord> {
    vec![
        row("BOARDGAMING", "Gurgaon", "GCR Extn.", 1, Some(2), (72_000.0, 300_000.0)),
        row("SOCIAL_DEDUCTIONS", "Gurgaon", "South City", 0, Some(1), (0.0, 90_000.0)),
        row("MUSIC", "Delhi", "Hauz Khas", 2, Some(4), (50_000.0, 260_000.0)),
        row("CHESS", "Delhi", "Saket", 1, Some(3), (10_000.0, 150_000.0)),
        row("POETRY", "Noida", "Sector 18", 1, None, (8_000.0, 8_500.0)),
        row("RUNNING", "Noida", "Sector 62", 0, Some(0), (0.0, 0.0)),
    ]
}

#[test]
fn test_identical_input_gives_identical_plan() {
    let config = PlanConfig::default();
    let records = master_table();
    assert_eq!(build_plan(&records, &config), build_plan(&records, &config));
}

#[test]
fn test_launch_count_matches_club_gap() {
    let config = PlanConfig::default();
    let records = master_table();
    let plan = build_plan(&records, &config);

    for record in &records {
        let expected = record
            .effective_target_clubs()
            .saturating_sub(record.current_clubs) as usize;
        let actual = plan
            .launches
            .iter()
            .filter(|l| l.activity == record.activity && l.area == record.area)
            .count();
        assert_eq!(actual, expected, "launches for {}", record.activity);
    }
    assert_eq!(plan.launches.len(), 1 + 1 + 2 + 2);
}

#[test]
fn test_priority_high_iff_allowlisted() {
    let config = PlanConfig::default();
    let plan = build_plan(&master_table(), &config);

    for action in plan.actions() {
        assert_eq!(
            action.priority() == Priority::High,
            config.is_top_activity(action.activity()),
            "{}",
            action.id()
        );
    }
}

#[test]
fn test_target_weeks_and_dates() {
    let config = PlanConfig::default();
    let plan = build_plan(&master_table(), &config);

    for launch in &plan.launches {
        assert!(launch.target_week >= 1);
        let expected = config
            .start_date
            .checked_add_days(Days::new(u64::from(launch.target_week - 1) * 7))
            .unwrap();
        assert_eq!(
            launch.target_date,
            expected.format("%b %d, %Y").to_string()
        );
    }
    assert!(!plan.expansions.is_empty());
    for expansion in &plan.expansions {
        assert!(expansion.target_week >= 1);
        let expected = config
            .start_date
            .checked_add_days(Days::new(u64::from(expansion.target_week - 1) * 7))
            .unwrap();
        assert_eq!(
            expansion.target_date,
            expected.format("%b %d, %Y").to_string()
        );
    }

    let start = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
    assert_eq!(
        target_date(start, 9),
        NaiveDate::from_ymd_opt(2024, 12, 23).unwrap()
    );
}

#[test]
fn test_top_activity_two_new_clubs() {
    let config = PlanConfig::default();
    let records = vec![row("BOARDGAMING", "Delhi", "Saket", 0, Some(2), (0.0, 0.0))];
    let plan = build_plan(&records, &config);

    assert_eq!(plan.launches.len(), 2);
    assert!(plan.launches.iter().all(|l| l.priority == Priority::High));
    let mut weeks: Vec<u32> = plan.launches.iter().map(|l| l.target_week).collect();
    weeks.sort();
    assert_eq!(weeks, vec![2, 3]);
}

#[test]
fn test_unchanged_schedule_small_revenue_delta_is_not_expanded() {
    let config = PlanConfig::default();
    let records = vec![row("CHESS", "Delhi", "Saket", 1, Some(1), (10_000.0, 10_500.0))];
    let plan = build_plan(&records, &config);
    assert!(plan.expansions.is_empty());
    assert!(plan.launches.is_empty());
}

#[test]
fn test_action_lists_put_top_activities_first() {
    let config = PlanConfig::default();
    let plan = build_plan(&master_table(), &config);

    let top_flags: Vec<bool> = plan
        .launches
        .iter()
        .map(|l| config.is_top_activity(&l.activity))
        .collect();
    let first_secondary = top_flags.iter().position(|t| !t).unwrap_or(top_flags.len());
    assert!(top_flags[first_secondary..].iter().all(|t| !t));

    for pair in plan.expansions.windows(2) {
        let a_top = config.is_top_activity(&pair[0].activity);
        let b_top = config.is_top_activity(&pair[1].activity);
        assert!(a_top >= b_top);
        if a_top == b_top {
            assert!(pair[0].target_week <= pair[1].target_week);
        }
    }
}

#[test]
fn test_ids_are_sequential_per_kind() {
    let config = PlanConfig::default();
    let plan = build_plan(&master_table(), &config);

    let mut launch_ids: Vec<&str> = plan.launches.iter().map(|l| l.id.as_str()).collect();
    launch_ids.sort();
    let expected: Vec<String> = (1..=plan.launches.len())
        .map(|n| format!("LAUNCH_{n:03}"))
        .collect();
    assert_eq!(launch_ids, expected.iter().map(String::as_str).collect::<Vec<_>>());

    let mut exp_ids: Vec<&str> = plan.expansions.iter().map(|e| e.id.as_str()).collect();
    exp_ids.sort();
    assert_eq!(exp_ids.first().copied(), Some("EXP_001"));
}

#[test]
fn test_views_are_complete() {
    let config = PlanConfig::default();
    let records = master_table();
    let plan = build_plan(&records, &config);

    assert_eq!(plan.summary.len(), 4);
    assert_eq!(plan.weekly.len(), WEEKLY_PLAN_WEEKS as usize);
    assert_eq!(plan.milestones.len(), 4);
    assert_eq!(plan.city_progress.len(), records.len());
    assert_eq!(plan.logic.len(), 6);
    // RUNNING has no clubs yet
    assert_eq!(plan.maintenance.len(), 4);

    let weekly_actions: usize = plan
        .weekly
        .iter()
        .map(|w| w.launch_actions + w.expansion_actions)
        .sum();
    let in_window = plan
        .actions()
        .filter(|a| a.target_week() <= WEEKLY_PLAN_WEEKS)
        .count();
    assert_eq!(weekly_actions, in_window);

    assert!(plan
        .launches
        .iter()
        .all(|l| l.status == ActionStatus::NotStarted));
}

#[test]
fn test_config_allowlist_changes_priorities() {
    let config = PlanConfig::from_yaml_str("top_activities: [CHESS]\n").unwrap();
    let plan = build_plan(&master_table(), &config);

    let chess: Vec<_> = plan.launches.iter().filter(|l| l.activity == "CHESS").collect();
    assert!(chess.iter().all(|l| l.priority == Priority::High));
    assert_eq!(plan.launches[0].activity, "CHESS");
    assert!(plan
        .launches
        .iter()
        .filter(|l| l.activity == "MUSIC")
        .all(|l| l.priority != Priority::High));
}

//! Aggregated views over the generated actions
//!
//! Summary, weekly execution plan, milestones, city progress, the static
//! logic explanation and the optional maintenance list. All of these are
//! recomputed from scratch on every run.

use crate::config::PlanConfig;
use crate::format::{format_lakhs, format_rupees};
use crate::strategy::club_names_label;
use crate::types::{
    ActionStatus, ActivityAreaRecord, CityProgressEntry, ExpansionAction, LaunchAction,
    LogicEntry, MaintenanceEntry, MilestoneEntry, Priority, RevenueTotals, SummaryRow,
    WeeklyPlanEntry,
};

/// Length of the execution plan
pub const WEEKLY_PLAN_WEEKS: u32 = 16;

//==============================================================================
// Summary
//==============================================================================

/// Four headline rows: clubs, revenue, top activities, secondary activities
pub fn summary(
    records: &[ActivityAreaRecord],
    launches: &[LaunchAction],
    expansions: &[ExpansionAction],
    config: &PlanConfig,
) -> Vec<SummaryRow> {
    let current_clubs: u64 = records.iter().map(|r| u64::from(r.current_clubs)).sum();
    // Absent targets count as zero here, unlike the per-record fallback
    let target_clubs: u64 = records
        .iter()
        .map(|r| u64::from(r.target_clubs.unwrap_or(0)))
        .sum();
    let current_revenue: f64 = records.iter().map(|r| r.current_revenue).sum();
    let target_revenue: f64 = records.iter().map(|r| r.target_revenue).sum();

    let top_actions = launches
        .iter()
        .filter(|a| config.is_top_activity(&a.activity))
        .count()
        + expansions
            .iter()
            .filter(|a| config.is_top_activity(&a.activity))
            .count();
    let secondary_actions = launches.len() + expansions.len() - top_actions;

    let group = |i: usize| {
        config
            .week_groups
            .get(i)
            .or_else(|| config.week_groups.last())
            .map(|g| g.label.as_str())
            .unwrap_or_default()
    };
    let last = config.week_groups.len().saturating_sub(1);
    let full_timeline = format!("{} - {}", group(0), group(last));

    vec![
        SummaryRow {
            metric: "Total Clubs".to_string(),
            current: format!("{current_clubs} clubs"),
            target: format!("{target_clubs} clubs"),
            gap: format!(
                "{} new clubs",
                target_clubs as i64 - current_clubs as i64
            ),
            actions: format!("{} launch actions", launches.len()),
            timeline: full_timeline.clone(),
            priority: Priority::High,
        },
        SummaryRow {
            metric: "Total Revenue".to_string(),
            current: format_rupees(current_revenue),
            target: format_rupees(target_revenue),
            gap: format_rupees(target_revenue - current_revenue),
            actions: format!("{} expansion actions", expansions.len()),
            timeline: full_timeline,
            priority: Priority::High,
        },
        SummaryRow {
            metric: "TOP 3 Activities".to_string(),
            current: "Standard scaling".to_string(),
            target: "Maximum scaling (7 days/week)".to_string(),
            gap: "Enhanced day coverage".to_string(),
            actions: format!("{top_actions} priority actions"),
            timeline: format!("{} - {}", group(0), group(2)),
            priority: Priority::Critical,
        },
        SummaryRow {
            metric: "Secondary Activities".to_string(),
            current: "Moderate scaling".to_string(),
            target: "Steady growth support".to_string(),
            gap: "Balanced expansion".to_string(),
            actions: format!("{secondary_actions} support actions"),
            timeline: format!("{} - {}", group(1), group(last)),
            priority: Priority::Medium,
        },
    ]
}

/// Current, January and end-of-plan revenue summed over every record
pub fn revenue_totals(records: &[ActivityAreaRecord]) -> RevenueTotals {
    records.iter().fold(RevenueTotals::default(), |acc, r| RevenueTotals {
        current: acc.current + r.current_revenue,
        january: acc.january + r.january_revenue,
        target: acc.target + r.target_revenue,
    })
}

//==============================================================================
// Weekly Plan
//==============================================================================

struct Phase {
    last_week: u32,
    focus: &'static str,
    key_activities: &'static str,
    success_metrics: &'static str,
    risks: &'static str,
}

const PHASES: [Phase; 4] = [
    Phase {
        last_week: 4,
        focus: "TOP 3 Expansion Priority",
        key_activities: "Expand existing TOP 3 clubs to maximum days",
        success_metrics: "90% expanded clubs operational",
        risks: "Venue availability, CM capacity",
    },
    Phase {
        last_week: 8,
        focus: "TOP 3 Launch + Scale",
        key_activities: "Launch TOP 3 new clubs + continue expansion",
        success_metrics: "80% new TOP 3 clubs operational",
        risks: "Marketing effectiveness, attendance",
    },
    Phase {
        last_week: 12,
        focus: "Secondary Activities",
        key_activities: "Launch secondary activity clubs",
        success_metrics: "70% secondary clubs operational",
        risks: "Market saturation, resource allocation",
    },
    Phase {
        last_week: WEEKLY_PLAN_WEEKS,
        focus: "Optimization & Final Push",
        key_activities: "Final optimization + target achievement",
        success_metrics: "95% revenue targets achieved",
        risks: "Seasonal variations, retention",
    },
];

/// Weeks 1 to 8 are the high-priority half of the plan
pub fn is_priority_week(week: u32) -> bool {
    week <= PHASES[1].last_week
}

/// One entry per plan week, W1 to W16.
///
/// Phases are four weeks each. The period label takes the month of the
/// matching week group by phase position, so week 13 reads as the last
/// month even though the week-group table puts it one month earlier.
pub fn weekly_plan(
    launches: &[LaunchAction],
    expansions: &[ExpansionAction],
    config: &PlanConfig,
) -> Vec<WeeklyPlanEntry> {
    (1..=WEEKLY_PLAN_WEEKS)
        .map(|week| {
            let phase_idx = PHASES
                .iter()
                .position(|p| week <= p.last_week)
                .unwrap_or(PHASES.len() - 1);
            let phase = &PHASES[phase_idx];
            let month = config
                .week_groups
                .get(phase_idx)
                .or_else(|| config.week_groups.last())
                .map(|g| g.label.as_str())
                .unwrap_or_default();

            let week_launches: Vec<&LaunchAction> =
                launches.iter().filter(|a| a.target_week == week).collect();
            let week_expansions: Vec<&ExpansionAction> =
                expansions.iter().filter(|a| a.target_week == week).collect();
            let revenue_target = week_launches.iter().map(|a| a.revenue_target).sum::<f64>()
                + week_expansions.iter().map(|a| a.revenue_impact).sum::<f64>();

            WeeklyPlanEntry {
                week,
                period: format!("{month} (W{week})"),
                focus: phase.focus.to_string(),
                launch_actions: week_launches.len(),
                expansion_actions: week_expansions.len(),
                revenue_target,
                key_activities: phase.key_activities.to_string(),
                success_metrics: phase.success_metrics.to_string(),
                risks: phase.risks.to_string(),
            }
        })
        .collect()
}

//==============================================================================
// Milestones
//==============================================================================

/// The four fixed milestones; M004 quotes the total target revenue in lakhs
pub fn milestones(records: &[ActivityAreaRecord]) -> Vec<MilestoneEntry> {
    let target_revenue: f64 = records.iter().map(|r| r.target_revenue).sum();

    let milestone = |id: &str,
                     description: &str,
                     target_date: &str,
                     priority: Priority,
                     dependencies: &str,
                     success_criteria: String,
                     owner: &str,
                     notes: &str| MilestoneEntry {
        id: id.to_string(),
        description: description.to_string(),
        target_date: target_date.to_string(),
        priority,
        dependencies: dependencies.to_string(),
        success_criteria,
        owner: owner.to_string(),
        status: ActionStatus::NotStarted,
        progress_pct: 0.0,
        notes: notes.to_string(),
    };

    vec![
        milestone(
            "M001",
            "TOP 3 Club Expansions Complete",
            "Dec 31, 2024",
            Priority::Critical,
            "Venue agreements, CM training",
            "All TOP 3 clubs operational at target days".to_string(),
            "Operations Team",
            "Foundation for revenue scaling",
        ),
        milestone(
            "M002",
            "TOP 3 New Club Launches (Phase 1)",
            "Jan 15, 2025",
            Priority::Critical,
            "Market research, venue setup",
            "50% of TOP 3 new clubs launched".to_string(),
            "Launch Team",
            "Critical for revenue targets",
        ),
        milestone(
            "M003",
            "Secondary Activities Scaling",
            "Feb 15, 2025",
            Priority::High,
            "TOP 3 success, resource allocation",
            "70% of secondary clubs operational".to_string(),
            "Growth Team",
            "Balanced portfolio growth",
        ),
        milestone(
            "M004",
            "Revenue Target Achievement",
            "Mar 31, 2025",
            Priority::Critical,
            "All previous milestones",
            format!("{} revenue achieved", format_lakhs(target_revenue)),
            "Executive Team",
            "Ultimate success metric",
        ),
    ]
}

//==============================================================================
// City Progress
//==============================================================================

/// One row per record, top activities first, then largest revenue gap first.
///
/// Action counts match on activity and city only, so every area of the same
/// city reports the same counts.
pub fn city_progress(
    records: &[ActivityAreaRecord],
    launches: &[LaunchAction],
    expansions: &[ExpansionAction],
    config: &PlanConfig,
) -> Vec<CityProgressEntry> {
    let mut rows: Vec<CityProgressEntry> = records
        .iter()
        .map(|record| {
            let revenue_gap = record.revenue_gap();
            let progress_pct = if record.target_revenue > 0.0 {
                record.current_revenue / record.target_revenue * 100.0
            } else {
                100.0
            };
            let matches = |activity: &str, city: &str| {
                activity == record.activity && city == record.city
            };

            let priority = if config.is_top_activity(&record.activity) {
                Priority::High
            } else if revenue_gap > config.thresholds.city_medium_revenue_gap {
                Priority::Medium
            } else {
                Priority::Low
            };

            CityProgressEntry {
                city: record.city.clone(),
                activity: record.activity.clone(),
                current_clubs: record.current_clubs,
                target_clubs: record.effective_target_clubs(),
                new_clubs_needed: record.clubs_needed(),
                current_revenue: record.current_revenue,
                target_revenue: record.target_revenue,
                revenue_gap,
                progress_pct,
                launch_actions: launches
                    .iter()
                    .filter(|a| matches(&a.activity, &a.city))
                    .count(),
                expansion_actions: expansions
                    .iter()
                    .filter(|a| matches(&a.activity, &a.city))
                    .count(),
                priority,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        let a_top = config.is_top_activity(&a.activity);
        let b_top = config.is_top_activity(&b.activity);
        b_top
            .cmp(&a_top)
            .then_with(|| b.revenue_gap.total_cmp(&a.revenue_gap))
    });
    rows
}

//==============================================================================
// Logic & Maintenance
//==============================================================================

const LOGIC: [LogicEntry; 6] = [
    LogicEntry {
        component: "Club Launches",
        logic: "New clubs needed = Clubs_Needed_Feb - Current_Clubs_Count",
        formula: "IF(Clubs_Needed_Feb > Current_Clubs_Count, Clubs_Needed_Feb - Current_Clubs_Count, 0)",
        purpose: "Identify gaps requiring new club launches",
    },
    LogicEntry {
        component: "Club Expansions",
        logic: "Expansion needed if target days > current days OR target capacity > current capacity",
        formula: "IF(OR(target_days > current_days, target_attendance > current_attendance), TRUE, FALSE)",
        purpose: "Identify existing clubs needing scaling",
    },
    LogicEntry {
        component: "TOP 3 Prioritization",
        logic: "BOARDGAMING, SOCIAL_DEDUCTIONS, MUSIC get maximum scaling (7 days/week)",
        formula: "IF(Activity IN [BOARDGAMING, SOCIAL_DEDUCTIONS, MUSIC], \"HIGH\", revenue_based_priority)",
        purpose: "Focus maximum resources on highest impact activities",
    },
    LogicEntry {
        component: "Revenue Calculation",
        logic: "Revenue = Days/week × Attendance × Price × 4 weeks",
        formula: "target_days × target_attendance × price × 4",
        purpose: "Calculate monthly revenue potential",
    },
    LogicEntry {
        component: "Timeline Distribution",
        logic: "TOP 3 in weeks 1-8, Secondary in weeks 5-16",
        formula: "IF(TOP3, WEEK(1-8), WEEK(5-16))",
        purpose: "Phased execution prioritizing high-impact activities",
    },
    LogicEntry {
        component: "Priority Assignment",
        logic: "HIGH for TOP 3, MEDIUM for revenue >50k, LOW for others",
        formula: "IF(TOP3, \"HIGH\", IF(revenue_gap > 50000, \"MEDIUM\", \"LOW\"))",
        purpose: "Resource allocation based on impact",
    },
];

pub fn logic_entries() -> Vec<LogicEntry> {
    LOGIC.to_vec()
}

/// Records that already run clubs, with club names pulled from the notes
pub fn maintenance_entries(
    records: &[ActivityAreaRecord],
    config: &PlanConfig,
) -> Vec<MaintenanceEntry> {
    records
        .iter()
        .filter(|r| r.current_clubs > 0)
        .map(|r| MaintenanceEntry {
            activity: r.activity.clone(),
            city: r.city.clone(),
            area: r.area.clone(),
            club_names: club_names_label(&r.strategy),
            current_clubs: r.current_clubs,
            strategy: if config.is_top_activity(&r.activity) {
                "Maximize engagement and frequency".to_string()
            } else {
                "Maintain quality and consistency".to_string()
            },
            focus_area: "Member retention and activity scaling".to_string(),
            expected_outcome: format!("Sustain {} active clubs", r.current_clubs),
        })
        .collect()
}

//! Plan configuration
//!
//! Every knob of the generator lives here: the plan start date, the top
//! activities that get maximum scaling, priority thresholds, base weeks,
//! week-group labels, schedule overrides and the input column headers.
//! All fields have defaults, so an empty YAML document is a valid config.

use crate::error::{PlanError, PlanResult};
use crate::schedule::ScheduleOverrides;
use crate::types::RecordKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Monday of plan week 1
    pub start_date: NaiveDate,
    /// Activities designated for maximum scaling (always HIGH priority)
    pub top_activities: Vec<String>,
    pub thresholds: Thresholds,
    pub base_weeks: BaseWeeks,
    /// Schedule used for launches when the record has no target days
    pub default_target_days: String,
    /// Capacity used for launches when the record has no target attendance
    pub default_capacity: u32,
    /// Ascending week boundaries for the "Week Group" label
    pub week_groups: Vec<WeekGroup>,
    pub schedule_overrides: Vec<ScheduleOverride>,
    pub sheets: SheetNames,
    pub columns: ColumnNames,
    /// Append the Club_Maintenance sheet after Logic
    pub include_maintenance_sheet: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Revenue per new club above which a non-top launch is MEDIUM
    pub launch_medium_revenue_per_club: f64,
    /// Activity-wide revenue gap above which a non-top expansion is MEDIUM
    pub expansion_medium_activity_gap: f64,
    /// Revenue gap that alone qualifies a record for expansion
    pub expansion_min_revenue_delta: f64,
    /// Revenue gap above which a city/activity row is MEDIUM
    pub city_medium_revenue_gap: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            launch_medium_revenue_per_club: 50_000.0,
            expansion_medium_activity_gap: 300_000.0,
            expansion_min_revenue_delta: 1_000.0,
            city_medium_revenue_gap: 50_000.0,
        }
    }
}

/// Largest accepted base week, ten years of weekly planning
pub const MAX_BASE_WEEK: u32 = 520;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityWeeks {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseWeeks {
    pub launch: PriorityWeeks,
    pub expansion: PriorityWeeks,
}

impl Default for BaseWeeks {
    fn default() -> Self {
        Self {
            launch: PriorityWeeks {
                high: 2,
                medium: 5,
                low: 8,
            },
            expansion: PriorityWeeks {
                high: 1,
                medium: 6,
                low: 10,
            },
        }
    }
}

/// Weeks up to and including `last_week` are labelled `"{label} (W{n})"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekGroup {
    pub label: String,
    pub last_week: u32,
}

impl WeekGroup {
    fn new(label: &str, last_week: u32) -> Self {
        Self {
            label: label.to_string(),
            last_week,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOverride {
    pub activity: String,
    pub area: String,
    pub city: String,
    pub days: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub working: String,
    pub events: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            working: "Working sheet".to_string(),
            events: "Events".to_string(),
        }
    }
}

/// Header names of the master data sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub activity: String,
    pub city: String,
    pub area: String,
    pub current_clubs: String,
    pub target_clubs: String,
    pub current_meetups_per_week: String,
    pub current_days: String,
    pub target_days: String,
    pub current_attendance: String,
    pub target_attendance: String,
    pub price_per_person: String,
    pub current_revenue: String,
    pub january_revenue: String,
    pub target_revenue: String,
    pub strategy: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            activity: "Activity".to_string(),
            city: "City".to_string(),
            area: "Area".to_string(),
            current_clubs: "Current_Clubs_Count".to_string(),
            target_clubs: "Clubs_Needed_Feb".to_string(),
            current_meetups_per_week: "Number of Meetups per Week currenty".to_string(),
            current_days: "Current Days with Meetups".to_string(),
            target_days: "Target days by December in a week".to_string(),
            current_attendance: "Average Attendance per Meetup".to_string(),
            target_attendance: "Total people in a meetup".to_string(),
            price_per_person: "Average Price per Person (₹)".to_string(),
            current_revenue: "Current revenue".to_string(),
            january_revenue: "Monthly Revenue by January".to_string(),
            target_revenue: "Revenue by March".to_string(),
            strategy: "Club_Strategy".to_string(),
        }
    }
}

const GURGAON_OVERRIDES: &[(&str, &str, &str)] = &[
    (
        "BOARDGAMING",
        "GCR Extn.",
        "Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday",
    ),
    (
        "BOARDGAMING",
        "Golf Course Road",
        "Monday, Wednesday, Thursday, Friday, Saturday, Sunday",
    ),
    (
        "BOARDGAMING",
        "MG Road",
        "Monday, Tuesday, Thursday, Friday, Saturday, Sunday",
    ),
    (
        "SOCIAL_DEDUCTIONS",
        "GCR Extn.",
        "Monday, Wednesday, Thursday, Friday, Saturday, Sunday",
    ),
    (
        "SOCIAL_DEDUCTIONS",
        "South City",
        "Monday, Tuesday, Thursday, Friday, Saturday, Sunday",
    ),
    (
        "MUSIC",
        "GCR Extn.",
        "Monday, Tuesday, Wednesday, Thursday, Saturday, Sunday",
    ),
    (
        "MUSIC",
        "Golf Course Road",
        "Monday, Wednesday, Thursday, Friday, Saturday, Sunday",
    ),
    (
        "MUSIC",
        "South City",
        "Monday, Tuesday, Thursday, Friday, Saturday, Sunday",
    ),
];

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 10, 28).unwrap_or_default(),
            top_activities: vec![
                "BOARDGAMING".to_string(),
                "SOCIAL_DEDUCTIONS".to_string(),
                "MUSIC".to_string(),
            ],
            thresholds: Thresholds::default(),
            base_weeks: BaseWeeks::default(),
            default_target_days: "Monday, Wednesday, Friday".to_string(),
            default_capacity: 20,
            week_groups: vec![
                WeekGroup::new("Nov 2024", 4),
                WeekGroup::new("Dec 2024", 8),
                WeekGroup::new("Jan 2025", 13),
                WeekGroup::new("Feb 2025", u32::MAX),
            ],
            schedule_overrides: GURGAON_OVERRIDES
                .iter()
                .map(|(activity, area, days)| ScheduleOverride {
                    activity: activity.to_string(),
                    area: area.to_string(),
                    city: "Gurgaon".to_string(),
                    days: days.to_string(),
                })
                .collect(),
            sheets: SheetNames::default(),
            columns: ColumnNames::default(),
            include_maintenance_sheet: false,
        }
    }
}

impl PlanConfig {
    /// Load a config from a YAML file and validate it
    pub fn load(path: &Path) -> PlanResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> PlanResult<Self> {
        // An empty document deserializes to null, not to an empty mapping
        let config: PlanConfig = if content.trim().is_empty() {
            PlanConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> PlanResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> PlanResult<()> {
        if self.top_activities.is_empty() {
            return Err(PlanError::Config(
                "top_activities must name at least one activity".to_string(),
            ));
        }
        if self.week_groups.is_empty() {
            return Err(PlanError::Config(
                "week_groups must contain at least one group".to_string(),
            ));
        }
        if self
            .week_groups
            .windows(2)
            .any(|pair| pair[0].last_week >= pair[1].last_week)
        {
            return Err(PlanError::Config(
                "week_groups must be in strictly ascending order of last_week".to_string(),
            ));
        }
        for (kind, weeks) in [
            ("launch", self.base_weeks.launch),
            ("expansion", self.base_weeks.expansion),
        ] {
            if weeks.high == 0 || weeks.medium == 0 || weeks.low == 0 {
                return Err(PlanError::Config(format!(
                    "base_weeks.{kind} weeks must be >= 1"
                )));
            }
            if [weeks.high, weeks.medium, weeks.low]
                .iter()
                .any(|w| *w > MAX_BASE_WEEK)
            {
                return Err(PlanError::Config(format!(
                    "base_weeks.{kind} weeks must be <= {MAX_BASE_WEEK}"
                )));
            }
        }
        Ok(())
    }

    pub fn is_top_activity(&self, activity: &str) -> bool {
        self.top_activities.iter().any(|a| a == activity)
    }

    pub fn overrides(&self) -> ScheduleOverrides {
        self.schedule_overrides
            .iter()
            .map(|o| {
                (
                    RecordKey::new(&o.activity, &o.area, &o.city),
                    o.days.clone(),
                )
            })
            .collect()
    }

    /// `"Nov 2024 (W3)"` style label for a target week
    pub fn week_group_label(&self, week: u32) -> String {
        let group = self
            .week_groups
            .iter()
            .find(|g| week <= g.last_week)
            .or_else(|| self.week_groups.last());
        match group {
            Some(g) => format!("{} (W{})", g.label, week),
            None => format!("W{week}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PlanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_activities.len(), 3);
        assert_eq!(config.schedule_overrides.len(), 8);
        assert_eq!(
            config.start_date,
            NaiveDate::from_ymd_opt(2024, 10, 28).unwrap()
        );
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = PlanConfig::from_yaml_str("").unwrap();
        assert_eq!(config, PlanConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
start_date: 2025-01-06
top_activities: [CHESS]
thresholds:
  launch_medium_revenue_per_club: 10000
"#;
        let config = PlanConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config.start_date,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert!(config.is_top_activity("CHESS"));
        assert!(!config.is_top_activity("MUSIC"));
        assert_eq!(config.thresholds.launch_medium_revenue_per_club, 10000.0);
        assert_eq!(config.thresholds.expansion_min_revenue_delta, 1000.0);
        assert_eq!(config.default_capacity, 20);
    }

    #[test]
    fn test_yaml_round_trip_preserves_config() {
        let config = PlanConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = PlanConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_empty_allowlist() {
        let result = PlanConfig::from_yaml_str("top_activities: []");
        assert!(matches!(result, Err(PlanError::Config(_))));
    }

    #[test]
    fn test_rejects_unsorted_week_groups() {
        let yaml = r#"
week_groups:
  - { label: "Dec", last_week: 8 }
  - { label: "Nov", last_week: 4 }
"#;
        assert!(PlanConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_zero_base_week() {
        let yaml = r#"
base_weeks:
  launch: { high: 0, medium: 5, low: 8 }
"#;
        assert!(PlanConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_base_week_beyond_limit() {
        let yaml = r#"
base_weeks:
  launch: { high: 100000000, medium: 5, low: 8 }
"#;
        assert!(matches!(
            PlanConfig::from_yaml_str(yaml),
            Err(PlanError::Config(_))
        ));

        let yaml = r#"
base_weeks:
  expansion: { high: 1, medium: 6, low: 521 }
"#;
        assert!(PlanConfig::from_yaml_str(yaml).is_err());

        let yaml = r#"
base_weeks:
  expansion: { high: 1, medium: 6, low: 520 }
"#;
        assert!(PlanConfig::from_yaml_str(yaml).is_ok());
    }

    #[test]
    fn test_week_group_labels() {
        let config = PlanConfig::default();
        assert_eq!(config.week_group_label(1), "Nov 2024 (W1)");
        assert_eq!(config.week_group_label(4), "Nov 2024 (W4)");
        assert_eq!(config.week_group_label(5), "Dec 2024 (W5)");
        assert_eq!(config.week_group_label(13), "Jan 2025 (W13)");
        assert_eq!(config.week_group_label(14), "Feb 2025 (W14)");
    }

    #[test]
    fn test_week_group_falls_back_to_last_group() {
        let yaml = r#"
week_groups:
  - { label: "Q1", last_week: 13 }
"#;
        let config = PlanConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.week_group_label(20), "Q1 (W20)");
    }

    #[test]
    fn test_overrides_map_is_keyed_by_record() {
        let config = PlanConfig::default();
        let overrides = config.overrides();
        let key = RecordKey::new("MUSIC", "South City", "Gurgaon");
        assert_eq!(
            overrides.get(&key),
            Some("Monday, Tuesday, Thursday, Friday, Saturday, Sunday")
        );
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

//==============================================================================
// Input Records
//==============================================================================

/// Value-type key identifying one activity in one area of one city
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub activity: String,
    pub area: String,
    pub city: String,
}

impl RecordKey {
    pub fn new(
        activity: impl Into<String>,
        area: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            activity: activity.into(),
            area: area.into(),
            city: city.into(),
        }
    }
}

/// One row of the master data sheet: an (activity, area, city) combination
/// with its current and target operating metrics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityAreaRecord {
    pub activity: String,
    pub area: String,
    pub city: String,
    pub current_clubs: u32,
    /// Clubs needed by the end of the plan; absent means "no change"
    pub target_clubs: Option<u32>,
    pub current_meetups_per_week: f64,
    pub current_days: Option<String>,
    pub target_days: Option<String>,
    pub current_attendance: Option<f64>,
    pub target_attendance: Option<f64>,
    pub price_per_person: f64,
    pub current_revenue: f64,
    pub january_revenue: f64,
    pub target_revenue: f64,
    pub strategy: String,
}

impl ActivityAreaRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(&self.activity, &self.area, &self.city)
    }

    /// Target revenue minus current revenue
    pub fn revenue_gap(&self) -> f64 {
        self.target_revenue - self.current_revenue
    }

    /// Target club count, falling back to the current count when absent
    pub fn effective_target_clubs(&self) -> u32 {
        self.target_clubs.unwrap_or(self.current_clubs)
    }

    /// Number of new clubs to launch: `max(0, target - current)`
    pub fn clubs_needed(&self) -> u32 {
        self.effective_target_clubs()
            .saturating_sub(self.current_clubs)
    }
}

//==============================================================================
// Raw Sheets (passthrough copies)
//==============================================================================

/// A single cell as read from the input workbook
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the cell. Text may carry a `₹` or `Rs.` prefix and
    /// grouping commas; anything else that does not parse whole is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                let unprefixed = ["₹", "Rs.", "Rs"]
                    .iter()
                    .find_map(|prefix| trimmed.strip_prefix(prefix))
                    .unwrap_or(trimmed);
                let cleaned: String = unprefixed
                    .chars()
                    .filter(|c| *c != ',' && !c.is_whitespace())
                    .collect();
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Text view of the cell; `None` for empty cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(if n.fract() == 0.0 {
                format!("{}", *n as i64)
            } else {
                n.to_string()
            }),
            CellValue::Bool(b) => Some(b.to_string()),
        }
    }
}

/// A worksheet copied verbatim: header row plus data rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(header.trim()))
    }
}

//==============================================================================
// Labels
//==============================================================================

/// Priority label used on actions, summary rows and milestones.
/// Actions only ever carry `High`, `Medium` or `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracking status of an action or milestone, edited by hand after export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionStatus {
    #[default]
    NotStarted,
    InProgress,
    Blocked,
    Done,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 4] = [
        ActionStatus::NotStarted,
        ActionStatus::InProgress,
        ActionStatus::Blocked,
        ActionStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::NotStarted => "NOT_STARTED",
            ActionStatus::InProgress => "IN_PROGRESS",
            ActionStatus::Blocked => "BLOCKED",
            ActionStatus::Done => "DONE",
        }
    }

    /// Dropdown values, in display order
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//==============================================================================
// Actions
//==============================================================================

/// A planned launch of one new club
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchAction {
    pub id: String,
    pub action_type: String,
    pub priority: Priority,
    pub city: String,
    pub area: String,
    pub activity: String,
    pub club_name: String,
    pub target_schedule: String,
    pub target_capacity: u32,
    pub specific_action: String,
    pub success_criteria: String,
    pub revenue_target: f64,
    pub target_week: u32,
    pub target_date: String,
    pub duration_weeks: u32,
    pub owner: String,
    pub dependencies: String,
    pub strategy_notes: String,
    pub status: ActionStatus,
}

/// A planned schedule or capacity expansion of an existing club
#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionAction {
    pub id: String,
    pub action_type: String,
    pub priority: Priority,
    pub city: String,
    pub area: String,
    pub activity: String,
    pub club_to_expand: String,
    pub current_schedule: String,
    pub target_schedule: String,
    pub current_capacity: u32,
    pub target_capacity: u32,
    pub specific_action: String,
    pub success_criteria: String,
    pub revenue_impact: f64,
    pub target_week: u32,
    pub target_date: String,
    pub duration_weeks: u32,
    pub owner: String,
    pub dependencies: String,
    pub strategy_notes: String,
    pub status: ActionStatus,
}

/// Borrowed view over either action variant, for aggregation
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    Launch(&'a LaunchAction),
    Expansion(&'a ExpansionAction),
}

impl Action<'_> {
    pub fn id(&self) -> &str {
        match self {
            Action::Launch(a) => &a.id,
            Action::Expansion(a) => &a.id,
        }
    }

    pub fn activity(&self) -> &str {
        match self {
            Action::Launch(a) => &a.activity,
            Action::Expansion(a) => &a.activity,
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            Action::Launch(a) => a.priority,
            Action::Expansion(a) => a.priority,
        }
    }

    pub fn target_week(&self) -> u32 {
        match self {
            Action::Launch(a) => a.target_week,
            Action::Expansion(a) => a.target_week,
        }
    }
}

//==============================================================================
// Aggregated Views
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub metric: String,
    pub current: String,
    pub target: String,
    pub gap: String,
    pub actions: String,
    pub timeline: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyPlanEntry {
    pub week: u32,
    pub period: String,
    pub focus: String,
    pub launch_actions: usize,
    pub expansion_actions: usize,
    pub revenue_target: f64,
    pub key_activities: String,
    pub success_metrics: String,
    pub risks: String,
}

impl WeeklyPlanEntry {
    pub fn label(&self) -> String {
        format!("W{}", self.week)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneEntry {
    pub id: String,
    pub description: String,
    pub target_date: String,
    pub priority: Priority,
    pub dependencies: String,
    pub success_criteria: String,
    pub owner: String,
    pub status: ActionStatus,
    pub progress_pct: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CityProgressEntry {
    pub city: String,
    pub activity: String,
    pub current_clubs: u32,
    pub target_clubs: u32,
    pub new_clubs_needed: u32,
    pub current_revenue: f64,
    pub target_revenue: f64,
    pub revenue_gap: f64,
    pub progress_pct: f64,
    pub launch_actions: usize,
    pub expansion_actions: usize,
    pub priority: Priority,
}

impl CityProgressEntry {
    pub fn total_actions(&self) -> usize {
        self.launch_actions + self.expansion_actions
    }
}

/// Static explanation row for the Logic sheet
#[derive(Debug, Clone, PartialEq)]
pub struct LogicEntry {
    pub component: &'static str,
    pub logic: &'static str,
    pub formula: &'static str,
    pub purpose: &'static str,
}

/// Existing clubs to keep running, with names pulled from strategy notes
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceEntry {
    pub activity: String,
    pub city: String,
    pub area: String,
    pub club_names: String,
    pub current_clubs: u32,
    pub strategy: String,
    pub focus_area: String,
    pub expected_outcome: String,
}

/// Sums of the three revenue columns of the master table
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RevenueTotals {
    pub current: f64,
    pub january: f64,
    pub target: f64,
}

/// Everything the generator derives from one input table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub launches: Vec<LaunchAction>,
    pub expansions: Vec<ExpansionAction>,
    pub summary: Vec<SummaryRow>,
    pub weekly: Vec<WeeklyPlanEntry>,
    pub milestones: Vec<MilestoneEntry>,
    pub city_progress: Vec<CityProgressEntry>,
    pub logic: Vec<LogicEntry>,
    pub maintenance: Vec<MaintenanceEntry>,
    pub revenue: RevenueTotals,
}

impl Plan {
    pub fn total_actions(&self) -> usize {
        self.launches.len() + self.expansions.len()
    }

    /// All actions, launches first
    pub fn actions(&self) -> impl Iterator<Item = Action<'_>> {
        self.launches
            .iter()
            .map(Action::Launch)
            .chain(self.expansions.iter().map(Action::Expansion))
    }
}

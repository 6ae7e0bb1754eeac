//! Weekly meetup schedules
//!
//! Schedules arrive as free text ("Monday, Wednesday, Friday"). They are
//! normalised into a list of day names; the count is the number of meetup
//! days per week.

use crate::types::RecordKey;
use std::collections::HashMap;
use std::fmt;

/// A parsed, comma-separated list of meetup days
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DaySchedule {
    days: Vec<String>,
}

impl DaySchedule {
    /// Parse free text; returns `None` when no day survives trimming
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return None;
        }
        let days: Vec<String> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .collect();
        if days.is_empty() {
            None
        } else {
            Some(Self { days })
        }
    }

    pub fn parse_opt(text: Option<&str>) -> Option<Self> {
        text.and_then(Self::parse)
    }

    pub fn days_per_week(&self) -> u32 {
        self.days.len() as u32
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }
}

impl fmt::Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.days.join(", "))
    }
}

/// Target-day overrides keyed by (activity, area, city)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleOverrides {
    by_key: HashMap<RecordKey, String>,
}

impl ScheduleOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: RecordKey, days: impl Into<String>) {
        self.by_key.insert(key, days.into());
    }

    pub fn get(&self, key: &RecordKey) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// Override for `key` if one exists, otherwise `fallback`
    pub fn resolve<'a>(&'a self, key: &RecordKey, fallback: Option<&'a str>) -> Option<&'a str> {
        self.get(key).or(fallback)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl FromIterator<(RecordKey, String)> for ScheduleOverrides {
    fn from_iter<I: IntoIterator<Item = (RecordKey, String)>>(iter: I) -> Self {
        Self {
            by_key: iter.into_iter().collect(),
        }
    }
}

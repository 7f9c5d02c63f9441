//! Weekly schedules and the hour-by-weekday grid built from them.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Column headers of the schedule grid.
pub const GRID_HEADER: [&str; GRID_COLUMNS] = [
    "Time",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Hour column plus seven weekdays.
pub const GRID_COLUMNS: usize = 8;

/// One row of the schedule grid.
pub type GridRow = [String; GRID_COLUMNS];

/// A (day, start hour) slot assigned to a project/subproject pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1 = Monday .. 7 = Sunday.
    pub day: u8,
    /// Hour of day, 0..=23.
    pub start: u8,
    pub project: String,
    pub subproject: String,
}

impl ScheduleEntry {
    /// Build an entry, checking that the slot lies inside the week.
    pub fn new(day: i64, start: i64, project: &str, subproject: &str) -> Result<Self, ParseError> {
        let day = check_range("day", day, 1, 7)?;
        let start = check_range("hour", start, 0, 23)?;
        Ok(ScheduleEntry {
            day,
            start,
            project: project.to_string(),
            subproject: subproject.to_string(),
        })
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<u8, ParseError> {
    if (min..=max).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ParseError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// A snapshot of the weekly plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub created_at_utc: i64,
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// An empty schedule stamped with the current time.
    pub fn new() -> Self {
        Schedule {
            created_at_utc: Utc::now().timestamp(),
            entries: Vec::new(),
        }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the grid rows (header first, then one row per hour) for a schedule.
///
/// A missing schedule yields the same shape with every cell blank. When two
/// entries share a slot, the later one wins.
pub fn build_grid(schedule: Option<&Schedule>) -> Vec<GridRow> {
    let slots: HashMap<(u8, u8), &ScheduleEntry> = schedule
        .map(|s| s.entries().iter().map(|e| ((e.day, e.start), e)).collect())
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(25);
    rows.push(GRID_HEADER.map(str::to_string));
    for hour in 0..24u8 {
        let mut row: GridRow = Default::default();
        row[0] = format!("{:02}:00", hour);
        for day in 1..=7u8 {
            if let Some(e) = slots.get(&(day, hour)) {
                row[day as usize] = format!("{} - {}", e.project, e.subproject);
            }
        }
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(entries: Vec<ScheduleEntry>) -> Schedule {
        Schedule {
            created_at_utc: 0,
            entries,
        }
    }

    #[test]
    fn test_grid_shape_and_header() {
        let rows = build_grid(Some(&schedule(vec![])));
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[0][0], "Time");
        assert_eq!(rows[0][7], "Sunday");
        assert_eq!(rows[1][0], "00:00");
        assert_eq!(rows[24][0], "23:00");
    }

    #[test]
    fn test_entries_fill_matching_cells_only() {
        let s = schedule(vec![
            ScheduleEntry::new(1, 9, "Health", "Running").unwrap(),
            ScheduleEntry::new(7, 23, "Work", "Reports").unwrap(),
        ]);
        let rows = build_grid(Some(&s));
        assert_eq!(rows[10][1], "Health - Running");
        assert_eq!(rows[24][7], "Work - Reports");
        let filled = rows[1..].iter().flat_map(|r| r[1..].iter()).filter(|c| !c.is_empty()).count();
        assert_eq!(filled, 2);
    }

    #[test]
    fn test_later_entry_wins_slot() {
        let s = schedule(vec![
            ScheduleEntry::new(2, 8, "Health", "Running").unwrap(),
            ScheduleEntry::new(2, 8, "Work", "Email").unwrap(),
        ]);
        assert_eq!(build_grid(Some(&s))[9][2], "Work - Email");
    }

    #[test]
    fn test_missing_schedule_is_blank() {
        let rows = build_grid(None);
        assert_eq!(rows.len(), 25);
        assert!(rows[1..].iter().all(|r| r[1..].iter().all(String::is_empty)));
    }

    #[test]
    fn test_entry_rejects_out_of_week_slots() {
        assert!(matches!(
            ScheduleEntry::new(0, 9, "a", "b"),
            Err(ParseError::OutOfRange { field: "day", .. })
        ));
        assert!(matches!(
            ScheduleEntry::new(3, 24, "a", "b"),
            Err(ParseError::OutOfRange { field: "hour", .. })
        ));
    }
}

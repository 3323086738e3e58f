// Operating hours module
// Opening window of the shop for one weekday

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::services::schedule::geometry::time_to_minutes;

/// Opening hours for one weekday (0 = Sunday ... 6 = Saturday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    pub day_of_week: u8,
    pub is_closed: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl OperatingHours {
    pub fn open(day_of_week: u8, start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            day_of_week,
            is_closed: false,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self {
            day_of_week,
            is_closed: true,
            start_time: None,
            end_time: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.day_of_week > 6 {
            return Err("Day of week must be between 0 (Sunday) and 6 (Saturday)".to_string());
        }

        if self.is_closed {
            return Ok(());
        }

        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if end > start => Ok(()),
            (Some(_), Some(_)) => Err("Closing time must be after opening time".to_string()),
            _ => Err("Open days need both a start and an end time".to_string()),
        }
    }

    /// Opening window as minutes since midnight, `None` when closed.
    pub fn window_minutes(&self) -> Option<(i32, i32)> {
        if self.is_closed {
            return None;
        }
        let start = self.start_time?;
        let end = self.end_time?;
        Some((time_to_minutes(start), time_to_minutes(end)))
    }
}

/// Weekday index of a date in the Sunday-first convention used by the table.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_open_day_window() {
        let hours = OperatingHours::open(1, at(9, 0), at(18, 30));
        assert!(hours.validate().is_ok());
        assert_eq!(hours.window_minutes(), Some((540, 1110)));
    }

    #[test]
    fn test_closed_day_has_no_window() {
        let hours = OperatingHours::closed(6);
        assert!(hours.validate().is_ok());
        assert_eq!(hours.window_minutes(), None);
    }

    #[test]
    fn test_invalid_hours() {
        assert!(OperatingHours::open(7, at(9, 0), at(18, 0)).validate().is_err());
        assert!(OperatingHours::open(2, at(18, 0), at(9, 0)).validate().is_err());

        let mut missing_end = OperatingHours::open(2, at(9, 0), at(18, 0));
        missing_end.end_time = None;
        assert!(missing_end.validate().is_err());
    }

    #[test]
    fn test_day_of_week_sunday_first() {
        // 2025-03-09 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(day_of_week(sunday), 0);
        assert_eq!(day_of_week(sunday.succ_opt().unwrap()), 1);
    }
}

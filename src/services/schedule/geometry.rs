//! Conversions between wall-clock time, minutes since midnight and vertical
//! pixel offsets on the day grid.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::ScheduleError;
use crate::models::grid::{GridConfig, SLOT_STEP_MINUTES};

/// Minutes since midnight of a time of day.
pub fn time_to_minutes(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Format minutes since midnight as zero-padded `HH:MM`.
///
/// Does not wrap past midnight: 1455 formats as `24:15`.
pub fn minutes_to_time(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minutes since midnight back to a time of day, `None` outside `[0, 1440)`.
pub fn minutes_to_naive_time(minutes: i32) -> Option<NaiveTime> {
    if minutes < 0 {
        return None;
    }
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)
}

/// Strict `HH:MM` parser for form input.
pub fn parse_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    let invalid = || ScheduleError::InvalidTime(value.to_string());

    let (hours, minutes) = value.trim().split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Round to the nearest 5 minute step; `xx:58` rolls into the next hour.
pub fn round_to_nearest_5_minutes(time: NaiveTime) -> NaiveTime {
    let rounded = snap_minutes(time_to_minutes(time) as f32);
    // 23:58 would round to 24:00
    minutes_to_naive_time(rounded.min(24 * 60 - SLOT_STEP_MINUTES)).unwrap_or(time)
}

fn snap_minutes(minutes: f32) -> i32 {
    ((minutes / SLOT_STEP_MINUTES as f32).round() as i32) * SLOT_STEP_MINUTES
}

/// Nearest 5 minute step of a minute-of-day.
pub fn snap_to_step(minutes: i32) -> i32 {
    snap_minutes(minutes as f32)
}

impl GridConfig {
    /// Vertical offset of a minute-of-day. Negative before opening.
    pub fn minutes_to_position_px(&self, minutes: i32) -> f32 {
        let minutes_from_open = minutes - self.open_minute();
        (minutes_from_open as f32 / 60.0) * self.hour_height_px()
    }

    /// Vertical offset of a time of day. Callers clamp negative values.
    pub fn time_to_position_px(&self, time: NaiveTime) -> f32 {
        self.minutes_to_position_px(time_to_minutes(time))
    }

    /// Inverse of [`Self::minutes_to_position_px`], snapped to 5 minutes.
    ///
    /// Positions that land outside the grid resolve to the opening minute.
    pub fn position_to_minutes(&self, px: f32) -> i32 {
        let raw = self.open_minute() as f32 + (px / self.hour_height_px()) * 60.0;
        let snapped = snap_minutes(raw);

        if self.contains_minute(snapped) {
            snapped
        } else {
            self.open_minute()
        }
    }

    pub fn position_to_time(&self, px: f32) -> NaiveTime {
        // close_minute < 1440 is guaranteed by GridConfig::validate
        minutes_to_naive_time(self.position_to_minutes(px)).unwrap_or_default()
    }

    /// Strictly proportional block height; short appointments stay short.
    pub fn appointment_height_px(&self, duration_minutes: u32) -> f32 {
        (duration_minutes as f32 / 60.0) * self.hour_height_px()
    }

    /// Offset of the "now" indicator when `selected_date` is today and the
    /// current time lies within the grid.
    pub fn current_time_position_px(&self, selected_date: NaiveDate, now: NaiveDateTime) -> Option<f32> {
        if now.date() != selected_date {
            return None;
        }

        let minutes = time_to_minutes(now.time());
        self.contains_minute(minutes)
            .then(|| self.minutes_to_position_px(minutes))
    }

    /// `HH:00` labels for every hour line from open to close.
    pub fn hour_labels(&self) -> Vec<(String, f32)> {
        let first_hour = (self.open_minute() + 59) / 60;
        let last_hour = self.close_minute() / 60;

        (first_hour..=last_hour)
            .map(|hour| {
                let minutes = hour * 60;
                (minutes_to_time(minutes), self.minutes_to_position_px(minutes))
            })
            .collect()
    }
}

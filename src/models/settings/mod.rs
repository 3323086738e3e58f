// Settings module
// User-editable configuration loaded from settings.toml

use serde::{Deserialize, Serialize};

use crate::models::grid::GridConfig;
use crate::services::schedule::geometry::{parse_time, time_to_minutes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// First hour shown on the day grid (`HH:MM`)
    pub open_time: String,
    /// Last hour shown on the day grid (`HH:MM`)
    pub close_time: String,
    pub hour_height_px: f32,
    /// Step between offered slots in the client booking flow
    pub booking_slot_interval: u32,
    /// Pointer travel below which a released drag counts as a click
    pub drag_click_slop_px: f32,
    /// Overrides the platform data directory when set
    pub database_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            open_time: "08:00".to_string(),
            close_time: "20:00".to_string(),
            hour_height_px: 150.0,
            booking_slot_interval: 10,
            drag_click_slop_px: 4.0,
            database_path: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        self.grid()?;

        if self.booking_slot_interval == 0 || self.booking_slot_interval % 5 != 0 {
            return Err("Booking slot interval must be a positive multiple of 5 minutes".to_string());
        }

        if !(self.drag_click_slop_px.is_finite() && self.drag_click_slop_px >= 0.0) {
            return Err("Drag click slop cannot be negative".to_string());
        }

        Ok(())
    }

    /// Build the grid configuration described by these settings.
    pub fn grid(&self) -> Result<GridConfig, String> {
        let open = parse_time(&self.open_time).map_err(|e| format!("open_time: {}", e))?;
        let close = parse_time(&self.close_time).map_err(|e| format!("close_time: {}", e))?;
        GridConfig::new(time_to_minutes(open), time_to_minutes(close), self.hour_height_px)
    }
}

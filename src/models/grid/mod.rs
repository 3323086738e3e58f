// Grid module
// Fixed daily window and pixel scale of the day calendar

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: i32 = 24 * 60;

/// Minimal time unit used for snapping and duration rounding.
pub const SLOT_STEP_MINUTES: i32 = 5;

/// Immutable geometry configuration of the day grid.
///
/// `open_minute` and `close_minute` are minutes since midnight. All
/// geometry derived from a `GridConfig` is pure; the same inputs always
/// yield the same pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    open_minute: i32,
    close_minute: i32,
    hour_height_px: f32,
}

impl GridConfig {
    /// Create a validated grid configuration
    pub fn new(open_minute: i32, close_minute: i32, hour_height_px: f32) -> Result<Self, String> {
        let grid = Self {
            open_minute,
            close_minute,
            hour_height_px,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Convenience constructor for whole-hour windows
    pub fn from_hours(open_hour: u32, close_hour: u32, hour_height_px: f32) -> Result<Self, String> {
        Self::new(open_hour as i32 * 60, close_hour as i32 * 60, hour_height_px)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.open_minute < 0 {
            return Err("Opening time cannot be before midnight".to_string());
        }

        if self.close_minute <= self.open_minute {
            return Err("Closing time must be after opening time".to_string());
        }

        if self.close_minute >= MINUTES_PER_DAY {
            return Err("Closing time must be before midnight".to_string());
        }

        if !(self.hour_height_px.is_finite() && self.hour_height_px > 0.0) {
            return Err("Hour height must be a positive number of pixels".to_string());
        }

        Ok(())
    }

    pub fn open_minute(&self) -> i32 {
        self.open_minute
    }

    pub fn close_minute(&self) -> i32 {
        self.close_minute
    }

    pub fn hour_height_px(&self) -> f32 {
        self.hour_height_px
    }

    /// Pixel height of the whole grid
    pub fn total_height_px(&self) -> f32 {
        ((self.close_minute - self.open_minute) as f32 / 60.0) * self.hour_height_px
    }

    /// Pixels covered by one snapping step
    pub fn pixels_per_step(&self) -> f32 {
        (SLOT_STEP_MINUTES as f32 / 60.0) * self.hour_height_px
    }

    pub fn contains_minute(&self, minute: i32) -> bool {
        minute >= self.open_minute && minute <= self.close_minute
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            open_minute: 8 * 60,
            close_minute: 20 * 60,
            hour_height_px: 150.0,
        }
    }
}

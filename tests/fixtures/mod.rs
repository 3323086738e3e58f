// Test fixtures - reusable test data
// Provides consistent dates, grids and appointments across test files

#![allow(dead_code)]

use barber_schedule::models::appointment::{Appointment, NewAppointment};
use barber_schedule::models::grid::GridConfig;
use barber_schedule::services::database::Database;
use chrono::{NaiveDate, NaiveTime};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, Mar 10, 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// Sunday, Mar 9, 2025
    pub fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    pub fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }
}

/// 08:00-20:00 at 240 px per hour (20 px per 5 minute step)
pub fn grid() -> GridConfig {
    GridConfig::from_hours(8, 20, 240.0).unwrap()
}

pub fn memory_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.initialize_schema().unwrap();
    db
}

/// Sample appointments for testing
pub mod appointments {
    use super::*;

    pub fn haircut(date: NaiveDate, time: NaiveTime, minutes: u32) -> NewAppointment {
        Appointment::builder()
            .client_name("Avi Cohen")
            .client_phone("0521234567")
            .service_name("Haircut")
            .date(date)
            .time(time)
            .duration_minutes(minutes)
            .build()
            .unwrap()
    }

    pub fn pause(date: NaiveDate, time: NaiveTime, minutes: u32) -> NewAppointment {
        Appointment::builder()
            .pause()
            .date(date)
            .time(time)
            .duration_minutes(minutes)
            .build()
            .unwrap()
    }

    /// Unsaved appointment with an explicit id, for pure resolver tests
    pub fn stored(id: i64, time: NaiveTime, minutes: u32) -> Appointment {
        haircut(dates::monday(), time, minutes).with_id(id)
    }
}

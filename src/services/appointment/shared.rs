use chrono::{NaiveDate, NaiveTime};
use rusqlite::{self, Result, Row};

use crate::models::appointment::Appointment;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M";

pub(crate) const APPOINTMENT_COLUMNS: &str =
    "id, client_name, client_phone, service_name, date, time, service_duration";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(crate) fn parse_date(value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Accepts `HH:MM` and the `HH:MM:SS` form written by older exports.
pub(crate) fn parse_time(value: String) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(&value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn map_appointment_row(row: &Row<'_>) -> Result<Appointment> {
    Ok(Appointment {
        id: row.get(0)?,
        client_name: row.get(1)?,
        client_phone: row.get(2)?,
        service_name: row.get(3)?,
        date: parse_date(row.get(4)?)?,
        time: parse_time(row.get(5)?)?,
        duration_minutes: row.get(6)?,
    })
}

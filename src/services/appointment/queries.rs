use super::shared::{format_date, map_appointment_row, APPOINTMENT_COLUMNS};
use super::AppointmentService;
use crate::models::appointment::Appointment;
use anyhow::{Context, Result};
use chrono::NaiveDate;

impl<'a> AppointmentService<'a> {
    /// Appointments of one date ordered by start time.
    pub fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments WHERE date = ? ORDER BY time ASC",
            APPOINTMENT_COLUMNS
        ))?;

        let appointments = stmt
            .query_map([format_date(date)], map_appointment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context(|| format!("Failed to load appointments for {}", date))?;

        Ok(appointments)
    }

    /// Appointments between two dates (inclusive), for the week view.
    pub fn list_between(&self, first: NaiveDate, last: NaiveDate) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments
             WHERE date BETWEEN ? AND ?
             ORDER BY date ASC, time ASC",
            APPOINTMENT_COLUMNS
        ))?;

        let appointments = stmt
            .query_map([format_date(first), format_date(last)], map_appointment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load appointments")?;

        Ok(appointments)
    }

    /// Appointments for a client phone number, most recent first.
    pub fn find_by_phone(&self, phone: &str) -> Result<Vec<Appointment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM appointments
             WHERE client_phone = ?
             ORDER BY date DESC, time DESC",
            APPOINTMENT_COLUMNS
        ))?;

        let appointments = stmt
            .query_map([phone], map_appointment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(appointments)
    }
}

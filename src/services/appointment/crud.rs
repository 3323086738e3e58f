use super::shared::{format_date, format_time, map_appointment_row, APPOINTMENT_COLUMNS};
use super::AppointmentService;
use crate::models::appointment::{Appointment, AppointmentPatch, NewAppointment};
use anyhow::{anyhow, Context, Result};
use rusqlite::{self, params};

impl<'a> AppointmentService<'a> {
    /// Insert a new appointment and return it with its assigned id.
    pub fn create(&self, appointment: &NewAppointment) -> Result<Appointment> {
        appointment.validate().map_err(|e| anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO appointments (
                    client_name, client_phone, service_name, date, time, service_duration
                ) VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    appointment.client_name,
                    appointment.client_phone,
                    appointment.service_name,
                    format_date(appointment.date),
                    format_time(appointment.time),
                    appointment.duration_minutes,
                ],
            )
            .context("Failed to insert appointment")?;

        let id = self.conn.last_insert_rowid();
        Ok(appointment.clone().with_id(id))
    }

    /// Retrieve an appointment by ID.
    pub fn get(&self, id: i64) -> Result<Option<Appointment>> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS),
            [id],
            map_appointment_row,
        );

        match result {
            Ok(appointment) => Ok(Some(appointment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite every column of an existing appointment.
    pub fn save(&self, appointment: &Appointment) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE appointments SET
                    client_name = ?, client_phone = ?, service_name = ?, date = ?, time = ?,
                    service_duration = ?, updated_at = CURRENT_TIMESTAMP
                 WHERE id = ?",
                params![
                    appointment.client_name,
                    appointment.client_phone,
                    appointment.service_name,
                    format_date(appointment.date),
                    format_time(appointment.time),
                    appointment.duration_minutes,
                    appointment.id,
                ],
            )
            .context("Failed to update appointment")?;

        if rows_affected == 0 {
            return Err(anyhow!("Appointment with id {} not found", appointment.id));
        }

        Ok(())
    }

    /// Apply a partial update.
    pub fn update_fields(&self, id: i64, patch: &AppointmentPatch) -> Result<()> {
        let mut appointment = self
            .get(id)?
            .ok_or_else(|| anyhow!("Appointment with id {} not found", id))?;

        if patch.is_empty() {
            return Ok(());
        }

        if patch.duration_minutes == Some(0) {
            return Err(anyhow!("Duration must be positive"));
        }

        patch.apply_to(&mut appointment);
        self.save(&appointment)
    }

    /// Delete an appointment by ID.
    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM appointments WHERE id = ?", [id])
            .context("Failed to delete appointment")?;

        if rows_affected == 0 {
            return Err(anyhow!("Appointment with id {} not found", id));
        }

        Ok(())
    }
}

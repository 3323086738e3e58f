//! Appointment storage.
//!
//! [`AppointmentStore`] is the CRUD seam the booking flows and the day view
//! talk to; [`AppointmentService`] implements it on SQLite.

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::models::appointment::{Appointment, AppointmentPatch, NewAppointment};

pub mod crud;
pub mod queries;
mod shared;

/// CRUD operations over the `appointments` collection.
#[cfg_attr(test, mockall::automock)]
pub trait AppointmentStore {
    fn list(&self, date: NaiveDate) -> Result<Vec<Appointment>>;
    fn insert(&self, appointment: &NewAppointment) -> Result<Appointment>;
    fn update(&self, id: i64, patch: &AppointmentPatch) -> Result<()>;
    fn delete(&self, id: i64) -> Result<()>;
}

/// Service for managing appointments stored in SQLite.
pub struct AppointmentService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> AppointmentService<'a> {
    /// Create a new AppointmentService with a database connection
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl AppointmentStore for AppointmentService<'_> {
    fn list(&self, date: NaiveDate) -> Result<Vec<Appointment>> {
        self.list_for_date(date)
    }

    fn insert(&self, appointment: &NewAppointment) -> Result<Appointment> {
        self.create(appointment)
    }

    fn update(&self, id: i64, patch: &AppointmentPatch) -> Result<()> {
        self.update_fields(id, patch)
    }

    fn delete(&self, id: i64) -> Result<()> {
        AppointmentService::delete(self, id)
    }
}

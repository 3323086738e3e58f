//! Render-ready layout of one day's appointments.

use serde::Serialize;

use super::geometry::minutes_to_time;
use crate::models::appointment::Appointment;
use crate::models::grid::GridConfig;

/// An appointment with its derived times and grid geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutAppointment {
    pub appointment: Appointment,
    pub start_minutes: i32,
    pub end_minutes: i32,
    pub end_time: String,
    pub top_px: f32,
    pub height_px: f32,
    /// Idle minutes until the next appointment; negative when stored data
    /// overlaps, `None` for the last appointment of the day.
    pub gap_minutes: Option<i32>,
}

impl LaidOutAppointment {
    fn from_appointment(appointment: &Appointment, grid: &GridConfig) -> Self {
        let start_minutes = appointment.start_minutes();
        let end_minutes = appointment.end_minutes();
        Self {
            start_minutes,
            end_minutes,
            end_time: minutes_to_time(end_minutes),
            top_px: grid.minutes_to_position_px(start_minutes),
            height_px: grid.appointment_height_px(appointment.duration()),
            gap_minutes: None,
            appointment: appointment.clone(),
        }
    }

    pub fn is_pause(&self) -> bool {
        self.appointment.is_pause()
    }
}

/// Lay out one date's appointments: derive geometry, stable-sort by start,
/// then fill in the gap to the following appointment.
///
/// Holds no state between calls; re-run after every load or mutation.
pub fn layout_day(appointments: &[Appointment], grid: &GridConfig) -> Vec<LaidOutAppointment> {
    let mut laid_out: Vec<LaidOutAppointment> = appointments
        .iter()
        .map(|apt| LaidOutAppointment::from_appointment(apt, grid))
        .collect();

    // sort_by_key is stable: equal starts keep their input order
    laid_out.sort_by_key(|item| item.start_minutes);

    let next_starts: Vec<i32> = laid_out.iter().skip(1).map(|item| item.start_minutes).collect();
    for (item, next_start) in laid_out.iter_mut().zip(next_starts) {
        item.gap_minutes = Some(next_start - item.end_minutes);
    }

    log::debug!("Laid out {} appointments", laid_out.len());
    laid_out
}

/// Minutes booked by clients (pauses excluded).
pub fn booked_minutes(layout: &[LaidOutAppointment]) -> u32 {
    layout
        .iter()
        .filter(|item| !item.is_pause())
        .map(|item| item.appointment.duration())
        .sum()
}

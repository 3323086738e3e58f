//! Booking flows: admin create, reschedule, duration edit and cancel, plus
//! the stricter client self-booking.
//!
//! Every mutation reloads the target day from the store, runs the resolver
//! and only then writes. Nothing is written when a check fails.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::models::appointment::{Appointment, AppointmentPatch, NewAppointment};
use crate::models::grid::GridConfig;
use crate::models::operating_hours::OperatingHours;
use crate::models::service_item::{combined_name, total_duration, ServiceItem};
use crate::services::appointment::AppointmentStore;
use crate::services::schedule::geometry::{minutes_to_naive_time, minutes_to_time, time_to_minutes};
use crate::services::schedule::resolver::{check_placement, Candidate, Rejection};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Rejected(#[from] Rejection),
    #[error("invalid appointment: {0}")]
    Invalid(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl BookingError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, BookingError::Rejected(_))
    }
}

/// A committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    /// Requested duration when it was shrunk to fit
    pub adjusted_from: Option<u32>,
}

impl BookingOutcome {
    pub fn was_adjusted(&self) -> bool {
        self.adjusted_from.is_some()
    }
}

fn storage_failure(action: &str, err: anyhow::Error) -> BookingError {
    log::error!("Failed to {}: {:#}", action, err);
    BookingError::Storage(err)
}

/// Create an appointment from the admin form.
pub fn create_appointment<S: AppointmentStore + ?Sized>(
    store: &S,
    grid: &GridConfig,
    mut new: NewAppointment,
) -> Result<BookingOutcome, BookingError> {
    new.validate().map_err(BookingError::Invalid)?;

    let day = store
        .list(new.date)
        .map_err(|e| storage_failure("load appointments", e))?;
    let candidate = Candidate::new(new.date, new.time, new.duration());
    let placement = check_placement(&day, &candidate, grid).map_err(|rejection| {
        log::warn!("Rejected new appointment at {} {}: {}", new.date, new.time, rejection);
        rejection
    })?;

    new.duration_minutes = Some(placement.duration_minutes);
    let appointment = store
        .insert(&new)
        .map_err(|e| storage_failure("insert appointment", e))?;

    log::info!(
        "Created appointment {} on {} at {} ({} min)",
        appointment.id,
        appointment.date,
        appointment.time,
        placement.duration_minutes
    );

    Ok(BookingOutcome {
        appointment,
        adjusted_from: placement.adjusted_from,
    })
}

/// Move an appointment to a new start, shrinking it if the next
/// appointment would otherwise overlap.
pub fn reschedule<S: AppointmentStore + ?Sized>(
    store: &S,
    grid: &GridConfig,
    appointment: &Appointment,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<BookingOutcome, BookingError> {
    let day = store
        .list(date)
        .map_err(|e| storage_failure("load appointments", e))?;
    let candidate = Candidate::new(date, time, appointment.duration()).excluding(appointment.id);
    let placement = check_placement(&day, &candidate, grid).map_err(|rejection| {
        log::warn!("Rejected move of appointment {}: {}", appointment.id, rejection);
        rejection
    })?;

    let mut patch = AppointmentPatch::moved_to(date, time);
    if placement.was_adjusted() {
        patch = patch.with_duration(placement.duration_minutes);
    }

    store
        .update(appointment.id, &patch)
        .map_err(|e| storage_failure("update appointment", e))?;

    let mut moved = appointment.clone();
    patch.apply_to(&mut moved);
    log::info!("Moved appointment {} to {} {}", moved.id, date, time);

    Ok(BookingOutcome {
        appointment: moved,
        adjusted_from: placement.adjusted_from,
    })
}

/// Change the duration of an appointment in place.
pub fn change_duration<S: AppointmentStore + ?Sized>(
    store: &S,
    grid: &GridConfig,
    appointment: &Appointment,
    minutes: u32,
) -> Result<BookingOutcome, BookingError> {
    if minutes == 0 {
        return Err(BookingError::Invalid("Duration must be positive".to_string()));
    }

    let day = store
        .list(appointment.date)
        .map_err(|e| storage_failure("load appointments", e))?;
    let candidate =
        Candidate::new(appointment.date, appointment.time, minutes).excluding(appointment.id);
    let placement = check_placement(&day, &candidate, grid)?;

    let patch = AppointmentPatch::default().with_duration(placement.duration_minutes);
    store
        .update(appointment.id, &patch)
        .map_err(|e| storage_failure("update appointment", e))?;

    let mut resized = appointment.clone();
    patch.apply_to(&mut resized);
    log::info!(
        "Appointment {} now lasts {} min",
        resized.id,
        placement.duration_minutes
    );

    Ok(BookingOutcome {
        appointment: resized,
        adjusted_from: placement.adjusted_from,
    })
}

/// Cancel (delete) an appointment.
pub fn cancel<S: AppointmentStore + ?Sized>(store: &S, id: i64) -> Result<(), BookingError> {
    store
        .delete(id)
        .map_err(|e| storage_failure("delete appointment", e))?;
    log::info!("Cancelled appointment {}", id);
    Ok(())
}

/// Strict interval test used by client self-booking: the slot must not
/// intersect any appointment on `date`.
pub fn is_slot_available(day: &[Appointment], date: NaiveDate, start: NaiveTime, duration: u32) -> bool {
    let slot_start = time_to_minutes(start);
    let slot_end = slot_start + duration as i32;

    !day.iter()
        .filter(|apt| apt.date == date)
        .any(|apt| slot_start < apt.end_minutes() && slot_end > apt.start_minutes())
}

/// Bookable window for a date in minutes since midnight.
///
/// Configured hours narrow the grid and never extend it. A closed day, or
/// hours that fall entirely outside the grid, have no window.
pub fn booking_window(hours: Option<&OperatingHours>, grid: &GridConfig) -> Option<(i32, i32)> {
    let (open, close) = match hours {
        Some(hours) => hours.window_minutes()?,
        None => return Some((grid.open_minute(), grid.close_minute())),
    };

    let open = open.max(grid.open_minute());
    let close = close.min(grid.close_minute());
    (open < close).then_some((open, close))
}

/// Start times offered to a client for a booking of `duration` minutes.
///
/// Steps by `interval` from the window start, keeps slots strictly after
/// `not_before`, ending by closing time and free of any overlap.
pub fn available_slots(
    day: &[Appointment],
    date: NaiveDate,
    window: Option<(i32, i32)>,
    duration: u32,
    interval: u32,
    not_before: Option<NaiveTime>,
) -> Vec<NaiveTime> {
    let Some((open, close)) = window else {
        return Vec::new();
    };
    if interval == 0 || duration == 0 {
        return Vec::new();
    }

    let earliest = not_before.map(time_to_minutes);
    (open..close)
        .step_by(interval as usize)
        .filter(|start| earliest.map_or(true, |min| *start > min))
        .filter(|start| start + duration as i32 <= close)
        .filter_map(minutes_to_naive_time)
        .filter(|start| is_slot_available(day, date, *start, duration))
        .collect()
}

/// Client request for the services picked from the catalog.
///
/// The duration is the sum of the selected bookable services and the
/// service name joins their names; hidden or unknown ids are ignored.
pub fn request_from_selection(
    catalog: &[ServiceItem],
    selected_ids: &[i64],
    client_name: &str,
    client_phone: &str,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<NewAppointment, BookingError> {
    let duration = total_duration(catalog, selected_ids);
    if duration == 0 {
        return Err(BookingError::Invalid("Select at least one service".to_string()));
    }

    Appointment::builder()
        .client_name(client_name)
        .client_phone(client_phone)
        .service_name(combined_name(catalog, selected_ids))
        .date(date)
        .time(time)
        .duration_minutes(duration)
        .build()
        .map_err(BookingError::Invalid)
}

fn is_same_booking(existing: &Appointment, new: &NewAppointment) -> bool {
    existing.date == new.date
        && existing.time == new.time
        && existing.client_name == new.client_name
        && existing.client_phone == new.client_phone
}

/// Client self-booking: rejects any overlap instead of shrinking.
///
/// Re-submitting the same client, phone, date and time returns the
/// appointment already stored instead of failing.
pub fn book_for_client<S: AppointmentStore + ?Sized>(
    store: &S,
    grid: &GridConfig,
    hours: Option<&OperatingHours>,
    new: NewAppointment,
    now: NaiveDateTime,
) -> Result<BookingOutcome, BookingError> {
    new.validate().map_err(BookingError::Invalid)?;

    let (open, close) =
        booking_window(hours, grid).ok_or(Rejection::DayClosed { date: new.date })?;

    let start = time_to_minutes(new.time);
    let end = start + new.duration() as i32;
    if start < open {
        return Err(Rejection::BeforeOpening {
            time: minutes_to_time(start),
            open: minutes_to_time(open),
        }
        .into());
    }
    if end > close {
        return Err(Rejection::PastClosing {
            end: minutes_to_time(end),
            close: minutes_to_time(close),
        }
        .into());
    }
    if new.date.and_time(new.time) <= now {
        return Err(Rejection::SlotTaken {
            time: minutes_to_time(start),
            duration: new.duration(),
        }
        .into());
    }

    let day = store
        .list(new.date)
        .map_err(|e| storage_failure("load appointments", e))?;

    // A confirmation sent twice returns the row the first one created
    if let Some(existing) = day.iter().find(|apt| is_same_booking(apt, &new)) {
        log::info!(
            "Client booking on {} at {} already exists as appointment {}",
            new.date,
            new.time,
            existing.id
        );
        return Ok(BookingOutcome {
            appointment: existing.clone(),
            adjusted_from: None,
        });
    }

    if !is_slot_available(&day, new.date, new.time, new.duration()) {
        log::warn!("Client booking at {} {} overlaps an appointment", new.date, new.time);
        return Err(Rejection::SlotTaken {
            time: minutes_to_time(start),
            duration: new.duration(),
        }
        .into());
    }

    let appointment = store
        .insert(&new)
        .map_err(|e| storage_failure("insert appointment", e))?;
    log::info!("Client booked appointment {} on {} at {}", appointment.id, appointment.date, appointment.time);

    Ok(BookingOutcome {
        appointment,
        adjusted_from: None,
    })
}

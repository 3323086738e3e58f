//! State behind the admin day view.
//!
//! Owns the selected date, the loaded appointments and their layout, the
//! drag controller and the toast queue. A renderer reads from it and feeds
//! pointer events back in; every successful mutation reloads the day.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::drag::{DragController, DragOutcome, DragPreview};
use super::toast::ToastManager;
use crate::models::appointment::{Appointment, NewAppointment};
use crate::models::grid::GridConfig;
use crate::services::appointment::AppointmentStore;
use crate::services::booking::{self, BookingError, BookingOutcome};
use crate::services::schedule::geometry::round_to_nearest_5_minutes;
use crate::services::schedule::layout::{layout_day, LaidOutAppointment};

/// Pointer events delivered while an appointment block is held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start { appointment_id: i64, pointer_y: f32 },
    Move { pointer_y: f32 },
    Drop { pointer_y: f32 },
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragResponse {
    Started(DragPreview),
    Preview(DragPreview),
    /// Released without moving; show the appointment details.
    OpenDetails(Appointment),
    Committed(BookingOutcome),
    Rejected(String),
    Failed(String),
    Cancelled,
    /// Event did not apply to the current drag state.
    Ignored,
}

/// Prefill for the create form after clicking empty grid space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

pub struct DayView<S: AppointmentStore> {
    store: S,
    grid: GridConfig,
    date: NaiveDate,
    appointments: Vec<Appointment>,
    layout: Vec<LaidOutAppointment>,
    drag: DragController,
    toasts: ToastManager,
}

impl<S: AppointmentStore> DayView<S> {
    pub fn new(store: S, grid: GridConfig, date: NaiveDate, click_slop_px: f32) -> Self {
        Self {
            store,
            grid,
            date,
            appointments: Vec::new(),
            layout: Vec::new(),
            drag: DragController::new(grid, click_slop_px),
            toasts: ToastManager::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn layout(&self) -> &[LaidOutAppointment] {
        &self.layout
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastManager {
        &mut self.toasts
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Load the appointments for `date`.
    ///
    /// On failure the previously loaded day stays on screen and an error
    /// toast is queued.
    pub fn load(&mut self, date: NaiveDate) -> Result<()> {
        match self.store.list(date) {
            Ok(appointments) => {
                if date != self.date {
                    self.drag.cancel();
                }
                self.date = date;
                self.layout = layout_day(&appointments, &self.grid);
                self.appointments = appointments;
                log::debug!("Loaded {} appointments for {}", self.appointments.len(), date);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load appointments for {}: {:#}", date, e);
                self.toasts.error("Could not load appointments");
                Err(e)
            }
        }
    }

    pub fn reload(&mut self) -> Result<()> {
        self.load(self.date)
    }

    /// Offset of the "now" line when `now` falls on the viewed date.
    pub fn now_indicator_px(&self, now: NaiveDateTime) -> Option<f32> {
        self.grid.current_time_position_px(self.date, now)
    }

    pub fn open_create_at(&self, px: f32) -> AppointmentDraft {
        AppointmentDraft {
            date: self.date,
            time: round_to_nearest_5_minutes(self.grid.position_to_time(px)),
        }
    }

    pub fn submit_create(&mut self, new: NewAppointment) -> Result<BookingOutcome, BookingError> {
        let result = booking::create_appointment(&self.store, &self.grid, new);
        self.after_mutation(&result, "Appointment created");
        result
    }

    pub fn change_duration(&mut self, id: i64, minutes: u32) -> Result<BookingOutcome, BookingError> {
        let appointment = self.find(id)?;
        let result = booking::change_duration(&self.store, &self.grid, &appointment, minutes);
        self.after_mutation(&result, "Duration updated");
        result
    }

    pub fn cancel_appointment(&mut self, id: i64) -> Result<(), BookingError> {
        let result = booking::cancel(&self.store, id);
        match &result {
            Ok(()) => {
                self.toasts.success("Appointment cancelled");
                self.reload_quietly();
            }
            Err(e) => self.toasts.error(format!("Could not cancel appointment: {}", e)),
        }
        result
    }

    pub fn handle_drag(&mut self, event: DragEvent) -> DragResponse {
        match event {
            DragEvent::Start {
                appointment_id,
                pointer_y,
            } => {
                let Some(appointment) = self
                    .appointments
                    .iter()
                    .find(|apt| apt.id == appointment_id)
                    .cloned()
                else {
                    log::warn!("Drag started on unknown appointment {}", appointment_id);
                    return DragResponse::Ignored;
                };
                match self.drag.begin(&appointment, pointer_y) {
                    Ok(preview) => DragResponse::Started(preview),
                    Err(e) => {
                        log::warn!("{}", e);
                        DragResponse::Ignored
                    }
                }
            }
            DragEvent::Move { pointer_y } => match self.drag.update(pointer_y) {
                Ok(preview) => DragResponse::Preview(preview),
                Err(_) => DragResponse::Ignored,
            },
            DragEvent::Drop { pointer_y } => match self.drag.finish(pointer_y) {
                Ok(DragOutcome::Click(appointment)) => DragResponse::OpenDetails(appointment),
                Ok(DragOutcome::Moved {
                    appointment,
                    date,
                    time,
                }) => self.commit_move(&appointment, date, time),
                Err(_) => DragResponse::Ignored,
            },
            DragEvent::Cancel => match self.drag.cancel() {
                Some(_) => DragResponse::Cancelled,
                None => DragResponse::Ignored,
            },
        }
    }

    /// Drop any in-flight drag when the view goes away.
    pub fn unmount(&mut self) {
        if let Some(context) = self.drag.cancel() {
            log::debug!("Discarded drag of appointment {} on unmount", context.appointment_id());
        }
    }

    fn commit_move(&mut self, appointment: &Appointment, date: NaiveDate, time: NaiveTime) -> DragResponse {
        let result = booking::reschedule(&self.store, &self.grid, appointment, date, time);
        self.after_mutation(&result, "Appointment moved");
        match result {
            Ok(outcome) => DragResponse::Committed(outcome),
            Err(BookingError::Rejected(rejection)) => DragResponse::Rejected(rejection.to_string()),
            Err(e) => DragResponse::Failed(e.to_string()),
        }
    }

    fn after_mutation(&mut self, result: &Result<BookingOutcome, BookingError>, done: &str) {
        match result {
            Ok(outcome) => {
                match outcome.adjusted_from {
                    Some(requested) => self.toasts.info(format!(
                        "{} (shortened from {} to {} min)",
                        done,
                        requested,
                        outcome.appointment.duration()
                    )),
                    None => self.toasts.success(done),
                }
                self.reload_quietly();
            }
            Err(BookingError::Rejected(rejection)) => self.toasts.warning(rejection.to_string()),
            Err(BookingError::Invalid(message)) => self.toasts.warning(message.clone()),
            Err(BookingError::Storage(e)) => self.toasts.error(format!("Save failed: {}", e)),
        }
    }

    fn reload_quietly(&mut self) {
        // load() already logs and queues a toast on failure
        let _ = self.reload();
    }

    fn find(&self, id: i64) -> Result<Appointment, BookingError> {
        self.appointments
            .iter()
            .find(|apt| apt.id == id)
            .cloned()
            .ok_or_else(|| BookingError::Invalid(format!("Appointment {} is not on this day", id)))
    }
}

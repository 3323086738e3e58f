//! Collision detection and overlap-driven duration shrinking.
//!
//! All functions take the loaded appointments as a slice and never mutate
//! anything; the calling flow decides whether to persist.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use super::geometry::{minutes_to_time, time_to_minutes};
use crate::models::appointment::Appointment;
use crate::models::grid::{GridConfig, SLOT_STEP_MINUTES};

/// Outcome of fitting a requested duration before the next appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFit {
    /// The full requested duration fits (or nothing follows).
    Fits { duration: u32 },
    /// The duration was floored to the free time before the next appointment.
    Shrunk { requested: u32, duration: u32 },
    /// Less than one 5 minute step is free before the next appointment.
    NoRoom { requested: u32, available: u32 },
}

impl DurationFit {
    /// Duration to use; for `NoRoom` this is the unchanged request.
    pub fn duration(&self) -> u32 {
        match *self {
            DurationFit::Fits { duration } | DurationFit::Shrunk { duration, .. } => duration,
            DurationFit::NoRoom { requested, .. } => requested,
        }
    }

    pub fn was_adjusted(&self) -> bool {
        matches!(self, DurationFit::Shrunk { .. })
    }

    pub fn has_room(&self) -> bool {
        !matches!(self, DurationFit::NoRoom { .. })
    }
}

/// Reason a candidate placement cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{time} is already booked")]
    ExactCollision { existing_id: i64, time: String },
    #[error("only {available} minutes are free before the next appointment")]
    NoRoom { available: u32 },
    #[error("the appointment would end at {end}, after closing time {close}")]
    PastClosing { end: String, close: String },
    #[error("{time} is before opening time {open}")]
    BeforeOpening { time: String, open: String },
    #[error("the shop is closed on {date}")]
    DayClosed { date: NaiveDate },
    #[error("{time} is not available for a {duration} minute booking")]
    SlotTaken { time: String, duration: u32 },
}

/// A proposed `(date, time, duration)`, optionally ignoring the appointment
/// being moved or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub exclude_id: Option<i64>,
}

impl Candidate {
    pub fn new(date: NaiveDate, time: NaiveTime, duration_minutes: u32) -> Self {
        Self {
            date,
            time,
            duration_minutes,
            exclude_id: None,
        }
    }

    pub fn excluding(mut self, id: i64) -> Self {
        self.exclude_id = Some(id);
        self
    }
}

/// An accepted placement, ready to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    /// Requested duration when the resolver shrank it
    pub adjusted_from: Option<u32>,
}

impl Placement {
    pub fn end_minutes(&self) -> i32 {
        time_to_minutes(self.time) + self.duration_minutes as i32
    }

    pub fn was_adjusted(&self) -> bool {
        self.adjusted_from.is_some()
    }
}

fn others_on<'a>(
    day: &'a [Appointment],
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> impl Iterator<Item = &'a Appointment> {
    day.iter()
        .filter(move |apt| apt.date == date && Some(apt.id) != exclude_id)
}

/// Appointment on `date` starting exactly at `start`, if any.
///
/// Exact-start collisions are rejected regardless of duration.
pub fn detect_full_collision(
    day: &[Appointment],
    date: NaiveDate,
    start: NaiveTime,
    exclude_id: Option<i64>,
) -> Option<&Appointment> {
    others_on(day, date, exclude_id).find(|apt| apt.time == start)
}

/// Earliest appointment on `date` that starts strictly after `start`.
pub fn find_next_appointment(
    day: &[Appointment],
    date: NaiveDate,
    start: NaiveTime,
    exclude_id: Option<i64>,
) -> Option<&Appointment> {
    let start_minutes = time_to_minutes(start);
    others_on(day, date, exclude_id)
        .filter(|apt| apt.start_minutes() > start_minutes)
        .min_by_key(|apt| apt.start_minutes())
}

/// Fit `requested` minutes between `start` and the next appointment.
pub fn adjust_duration_for_overlap(
    day: &[Appointment],
    date: NaiveDate,
    start: NaiveTime,
    requested: u32,
    exclude_id: Option<i64>,
) -> DurationFit {
    let Some(next) = find_next_appointment(day, date, start, exclude_id) else {
        return DurationFit::Fits { duration: requested };
    };

    // Strictly positive: the next appointment starts after `start`
    let available = (next.start_minutes() - time_to_minutes(start)) as u32;
    if available >= requested {
        return DurationFit::Fits { duration: requested };
    }

    let step = SLOT_STEP_MINUTES as u32;
    let floored = available - available % step;
    if floored < step {
        return DurationFit::NoRoom { requested, available };
    }

    DurationFit::Shrunk {
        requested,
        duration: floored,
    }
}

/// Full admission check used by create, drag-drop and duration edits:
/// exact collision, opening bound, forward shrink, closing bound.
pub fn check_placement(
    day: &[Appointment],
    candidate: &Candidate,
    grid: &GridConfig,
) -> Result<Placement, Rejection> {
    if let Some(existing) =
        detect_full_collision(day, candidate.date, candidate.time, candidate.exclude_id)
    {
        return Err(Rejection::ExactCollision {
            existing_id: existing.id,
            time: minutes_to_time(existing.start_minutes()),
        });
    }

    let start = time_to_minutes(candidate.time);
    if start < grid.open_minute() {
        return Err(Rejection::BeforeOpening {
            time: minutes_to_time(start),
            open: minutes_to_time(grid.open_minute()),
        });
    }

    let fit = adjust_duration_for_overlap(
        day,
        candidate.date,
        candidate.time,
        candidate.duration_minutes,
        candidate.exclude_id,
    );

    let (duration, adjusted_from) = match fit {
        DurationFit::Fits { duration } => (duration, None),
        DurationFit::Shrunk {
            requested,
            duration,
        } => (duration, Some(requested)),
        DurationFit::NoRoom { available, .. } => return Err(Rejection::NoRoom { available }),
    };

    let end = start + duration as i32;
    if end > grid.close_minute() {
        return Err(Rejection::PastClosing {
            end: minutes_to_time(end),
            close: minutes_to_time(grid.close_minute()),
        });
    }

    Ok(Placement {
        date: candidate.date,
        time: candidate.time,
        duration_minutes: duration,
        adjusted_from,
    })
}

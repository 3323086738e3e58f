//! Drag-to-reschedule state machine.
//!
//! `Idle -> Dragging -> (Dropped | Cancelled) -> Idle`. The controller only
//! sees vertical pointer coordinates, so any pointer transport can drive it.
//! Every preview is recomputed from the recorded origin and the current
//! pointer position, never from intermediate moves.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::appointment::Appointment;
use crate::models::grid::{GridConfig, SLOT_STEP_MINUTES};
use crate::services::schedule::geometry::{minutes_to_time, snap_to_step};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    #[error("appointment {active_id} is already being dragged")]
    AlreadyDragging { active_id: i64 },
    #[error("no drag in progress")]
    NotDragging,
}

/// Live preview of the dragged block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragPreview {
    pub start_minutes: i32,
    pub top_px: f32,
    pub height_px: f32,
    /// Snapped 5 minute steps away from the original start
    pub steps: i32,
}

impl DragPreview {
    pub fn start_label(&self) -> String {
        minutes_to_time(self.start_minutes)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragContext {
    pub appointment: Appointment,
    pub original_start_minutes: i32,
    /// Where the ghost placeholder stays while dragging
    pub origin_top_px: f32,
    pub initial_pointer_y: f32,
    pub preview: DragPreview,
}

impl DragContext {
    pub fn appointment_id(&self) -> i64 {
        self.appointment.id
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragContext),
}

/// Result of releasing the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum DragOutcome {
    /// Released without meaningful movement; treat as a click.
    Click(Appointment),
    /// Released at a new snapped start on the same date.
    Moved {
        appointment: Appointment,
        date: NaiveDate,
        time: NaiveTime,
    },
}

pub struct DragController {
    grid: GridConfig,
    click_slop_px: f32,
    state: DragState,
}

impl DragController {
    pub fn new(grid: GridConfig, click_slop_px: f32) -> Self {
        Self {
            grid,
            click_slop_px,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn active(&self) -> Option<&DragContext> {
        match &self.state {
            DragState::Dragging(context) => Some(context),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active().is_some()
    }

    /// Capture the appointment, its origin and the initial pointer position.
    pub fn begin(&mut self, appointment: &Appointment, pointer_y: f32) -> Result<DragPreview, DragError> {
        if let Some(active) = self.active() {
            return Err(DragError::AlreadyDragging {
                active_id: active.appointment_id(),
            });
        }

        let original_start_minutes = appointment.start_minutes();
        let origin_top_px = self.grid.minutes_to_position_px(original_start_minutes);
        let preview = DragPreview {
            start_minutes: original_start_minutes,
            top_px: origin_top_px,
            height_px: self.grid.appointment_height_px(appointment.duration()),
            steps: 0,
        };

        log::debug!(
            "Drag start: appointment {} at {}",
            appointment.id,
            preview.start_label()
        );

        self.state = DragState::Dragging(DragContext {
            appointment: appointment.clone(),
            original_start_minutes,
            origin_top_px,
            initial_pointer_y: pointer_y,
            preview,
        });

        Ok(preview)
    }

    /// Recompute the snapped preview for the current pointer position.
    pub fn update(&mut self, pointer_y: f32) -> Result<DragPreview, DragError> {
        let grid = self.grid;
        match &mut self.state {
            DragState::Dragging(context) => {
                context.preview = snapped_preview(&grid, context, pointer_y);
                Ok(context.preview)
            }
            DragState::Idle => Err(DragError::NotDragging),
        }
    }

    /// Release the pointer and return to `Idle`.
    pub fn finish(&mut self, pointer_y: f32) -> Result<DragOutcome, DragError> {
        let DragState::Dragging(context) = std::mem::take(&mut self.state) else {
            return Err(DragError::NotDragging);
        };

        let preview = snapped_preview(&self.grid, &context, pointer_y);
        let travelled = (pointer_y - context.initial_pointer_y).abs();

        if travelled < self.click_slop_px || preview.start_minutes == context.original_start_minutes {
            log::debug!("Drag of appointment {} released as click", context.appointment_id());
            return Ok(DragOutcome::Click(context.appointment));
        }

        let time = self.grid.position_to_time(preview.top_px);
        log::debug!(
            "Drag drop: appointment {} -> {}",
            context.appointment_id(),
            time.format("%H:%M")
        );

        Ok(DragOutcome::Moved {
            date: context.appointment.date,
            appointment: context.appointment,
            time,
        })
    }

    /// Abandon the drag; the block snaps back to its origin.
    pub fn cancel(&mut self) -> Option<DragContext> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(context) => Some(context),
            DragState::Idle => None,
        }
    }
}

fn snapped_preview(grid: &GridConfig, context: &DragContext, pointer_y: f32) -> DragPreview {
    let delta_px = pointer_y - context.initial_pointer_y;
    let steps = (delta_px / grid.pixels_per_step()).round() as i32;

    let duration = context.appointment.duration() as i32;
    let latest_start = ((grid.close_minute() - duration).div_euclid(SLOT_STEP_MINUTES)
        * SLOT_STEP_MINUTES)
        .max(grid.open_minute());
    // An off-grid start stays put until it moves, then lands on the step grid
    let start_minutes = if steps == 0 {
        context.original_start_minutes
    } else {
        snap_to_step(context.original_start_minutes) + steps * SLOT_STEP_MINUTES
    }
    .clamp(grid.open_minute(), latest_start);

    DragPreview {
        start_minutes,
        top_px: grid.minutes_to_position_px(start_minutes),
        height_px: grid.appointment_height_px(duration as u32),
        steps,
    }
}

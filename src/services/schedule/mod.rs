//! Scheduling core: time/pixel geometry of the day grid, collision and
//! duration resolution, and the render-ready layout of a day.
//!
//! Everything in here is synchronous and pure. Storage lives in
//! [`crate::services::appointment`]; the flows that combine both live in
//! [`crate::services::booking`].

use thiserror::Error;

pub mod geometry;
pub mod layout;
pub mod resolver;

/// Errors raised while validating raw schedule input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
}

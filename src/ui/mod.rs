//! Front-end state that sits between a renderer and the services.

pub mod day_view;
pub mod drag;
pub mod toast;

pub use day_view::{AppointmentDraft, DayView, DragEvent, DragResponse};
pub use toast::ToastManager;

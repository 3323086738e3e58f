// Module exports for models

pub mod appointment;
pub mod grid;
pub mod operating_hours;
pub mod service_item;
pub mod settings;

// Service module exports

pub mod appointment;
pub mod booking;
pub mod database;
pub mod operating_hours;
pub mod schedule;
pub mod service_catalog;
pub mod settings;

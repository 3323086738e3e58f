// Appointment module
// Booked client appointment (or blocked "Pause" interval) on the day grid

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::services::schedule::geometry::time_to_minutes;

/// Duration applied when an appointment carries no explicit duration.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Reserved service name marking a blocked, non-bookable interval.
pub const PAUSE_SERVICE_NAME: &str = "Pause";

/// A persisted appointment.
///
/// `duration_minutes` is optional in storage; use [`Appointment::duration`]
/// to read the effective duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub client_name: String,
    pub client_phone: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: Option<u32>,
}

impl Appointment {
    /// Effective duration in minutes (stored value or the 30 minute default).
    pub fn duration(&self) -> u32 {
        self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    /// Minutes since midnight of the start time.
    pub fn start_minutes(&self) -> i32 {
        time_to_minutes(self.time)
    }

    /// Minutes since midnight of the end time. May exceed one day.
    pub fn end_minutes(&self) -> i32 {
        self.start_minutes() + self.duration() as i32
    }

    /// Whether this entry blocks time instead of serving a client.
    pub fn is_pause(&self) -> bool {
        self.service_name == PAUSE_SERVICE_NAME
    }

    /// Create a builder for a new (not yet persisted) appointment
    pub fn builder() -> NewAppointmentBuilder {
        NewAppointmentBuilder::new()
    }
}

/// Insert payload: an appointment without its storage-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub client_name: String,
    pub client_phone: String,
    pub service_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: Option<u32>,
}

impl NewAppointment {
    /// Validate the payload before it reaches the resolver or the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.service_name.trim().is_empty() {
            return Err("Service name cannot be empty".to_string());
        }

        // Pauses are not tied to a client
        if !self.is_pause() {
            if self.client_name.trim().is_empty() {
                return Err("Client name cannot be empty".to_string());
            }
            if self.client_phone.trim().is_empty() {
                return Err("Client phone cannot be empty".to_string());
            }
        }

        if self.duration_minutes == Some(0) {
            return Err("Duration must be positive".to_string());
        }

        Ok(())
    }

    pub fn duration(&self) -> u32 {
        self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES)
    }

    pub fn is_pause(&self) -> bool {
        self.service_name == PAUSE_SERVICE_NAME
    }

    /// Attach the id assigned by the store.
    pub fn with_id(self, id: i64) -> Appointment {
        Appointment {
            id,
            client_name: self.client_name,
            client_phone: self.client_phone,
            service_name: self.service_name,
            date: self.date,
            time: self.time,
            duration_minutes: self.duration_minutes,
        }
    }
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub service_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
}

impl AppointmentPatch {
    /// Patch that moves an appointment to a new start.
    pub fn moved_to(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date: Some(date),
            time: Some(time),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to an in-memory copy.
    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(ref name) = self.client_name {
            appointment.client_name = name.clone();
        }
        if let Some(ref phone) = self.client_phone {
            appointment.client_phone = phone.clone();
        }
        if let Some(ref service) = self.service_name {
            appointment.service_name = service.clone();
        }
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(minutes) = self.duration_minutes {
            appointment.duration_minutes = Some(minutes);
        }
    }
}

/// Builder for insert payloads
pub struct NewAppointmentBuilder {
    client_name: Option<String>,
    client_phone: Option<String>,
    service_name: Option<String>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
    duration_minutes: Option<u32>,
}

impl NewAppointmentBuilder {
    pub fn new() -> Self {
        Self {
            client_name: None,
            client_phone: None,
            service_name: None,
            date: None,
            time: None,
            duration_minutes: None,
        }
    }

    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    pub fn client_phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    pub fn service_name(mut self, service: impl Into<String>) -> Self {
        self.service_name = Some(service.into());
        self
    }

    /// Mark the entry as a blocked interval
    pub fn pause(mut self) -> Self {
        self.service_name = Some(PAUSE_SERVICE_NAME.to_string());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Build and validate the payload
    pub fn build(self) -> Result<NewAppointment, String> {
        let service_name = self.service_name.ok_or("Service name is required")?;
        let date = self.date.ok_or("Appointment date is required")?;
        let time = self.time.ok_or("Appointment time is required")?;

        let appointment = NewAppointment {
            client_name: self.client_name.unwrap_or_default(),
            client_phone: self.client_phone.unwrap_or_default(),
            service_name,
            date,
            time,
            duration_minutes: self.duration_minutes,
        };

        appointment.validate()?;
        Ok(appointment)
    }
}

impl Default for NewAppointmentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample(duration: Option<u32>) -> Appointment {
        Appointment {
            id: 1,
            client_name: "Avi".to_string(),
            client_phone: "0501234567".to_string(),
            service_name: "Haircut".to_string(),
            date: date(),
            time: at(10, 15),
            duration_minutes: duration,
        }
    }

    #[test]
    fn test_duration_defaults_to_thirty() {
        assert_eq!(sample(None).duration(), 30);
        assert_eq!(sample(Some(45)).duration(), 45);
    }

    #[test]
    fn test_start_and_end_minutes() {
        let appointment = sample(Some(20));
        assert_eq!(appointment.start_minutes(), 615);
        assert_eq!(appointment.end_minutes(), 635);
    }

    #[test]
    fn test_pause_detection() {
        let mut appointment = sample(None);
        assert!(!appointment.is_pause());
        appointment.service_name = PAUSE_SERVICE_NAME.to_string();
        assert!(appointment.is_pause());
    }

    #[test]
    fn test_builder_basic() {
        let new = Appointment::builder()
            .client_name("Dana")
            .client_phone("0527654321")
            .service_name("Beard trim")
            .date(date())
            .time(at(9, 0))
            .duration_minutes(15)
            .build()
            .unwrap();

        assert_eq!(new.duration(), 15);
        let persisted = new.with_id(7);
        assert_eq!(persisted.id, 7);
        assert_eq!(persisted.client_name, "Dana");
    }

    #[test]
    fn test_builder_missing_time() {
        let result = Appointment::builder()
            .client_name("Dana")
            .client_phone("0527654321")
            .service_name("Beard trim")
            .date(date())
            .build();

        assert_eq!(result.unwrap_err(), "Appointment time is required");
    }

    #[test]
    fn test_builder_requires_client_unless_pause() {
        let missing_client = Appointment::builder()
            .service_name("Haircut")
            .date(date())
            .time(at(9, 0))
            .build();
        assert_eq!(missing_client.unwrap_err(), "Client name cannot be empty");

        let pause = Appointment::builder()
            .pause()
            .date(date())
            .time(at(13, 0))
            .duration_minutes(60)
            .build()
            .unwrap();
        assert!(pause.is_pause());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = Appointment::builder()
            .pause()
            .date(date())
            .time(at(13, 0))
            .duration_minutes(0)
            .build();
        assert_eq!(result.unwrap_err(), "Duration must be positive");
    }

    #[test]
    fn test_patch_apply() {
        let mut appointment = sample(None);
        let patch = AppointmentPatch::moved_to(date(), at(11, 0)).with_duration(25);
        assert!(!patch.is_empty());

        patch.apply_to(&mut appointment);
        assert_eq!(appointment.time, at(11, 0));
        assert_eq!(appointment.duration_minutes, Some(25));
        assert_eq!(appointment.client_name, "Avi");
    }
}

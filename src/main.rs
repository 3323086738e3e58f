// Barber Schedule
// Prints the laid-out agenda for one day

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};

use barber_schedule::models::appointment::{Appointment, DEFAULT_DURATION_MINUTES};
use barber_schedule::services::appointment::{AppointmentService, AppointmentStore};
use barber_schedule::services::booking::{available_slots, booking_window};
use barber_schedule::services::database::Database;
use barber_schedule::services::operating_hours::OperatingHoursService;
use barber_schedule::services::schedule::layout::{booked_minutes, layout_day};
use barber_schedule::services::settings::SettingsService;

struct Args {
    date: NaiveDate,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut date = None;
    let mut json = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            value => {
                let parsed = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .with_context(|| format!("expected a date as YYYY-MM-DD, got '{}'", value))?;
                if date.replace(parsed).is_some() {
                    return Err(anyhow!("only one date may be given"));
                }
            }
        }
    }

    Ok(Args {
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        json,
    })
}

#[derive(Debug, PartialEq)]
enum SlotReport {
    Past,
    Closed,
    Free(Vec<String>),
}

/// Free default-length client slots for `date`, nothing for past days.
fn slot_report(
    appointments: &[Appointment],
    date: NaiveDate,
    now: NaiveDateTime,
    window: Option<(i32, i32)>,
    interval: u32,
) -> SlotReport {
    if date < now.date() {
        return SlotReport::Past;
    }
    if window.is_none() {
        return SlotReport::Closed;
    }

    let not_before = (now.date() == date).then(|| now.time());
    let slots = available_slots(
        appointments,
        date,
        window,
        DEFAULT_DURATION_MINUTES,
        interval,
        not_before,
    );
    SlotReport::Free(slots.iter().map(|t| t.format("%H:%M").to_string()).collect())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let settings = SettingsService::from_environment().load_or_default();
    let grid = settings.grid().map_err(|e| anyhow!("Invalid settings: {}", e))?;

    let db_path = SettingsService::database_path(&settings);
    log::info!("Using database at {}", db_path.display());

    let database = Database::new(&db_path)?;
    database.initialize_schema()?;

    let store = AppointmentService::new(database.connection());
    let appointments = store.list(args.date)?;
    let layout = layout_day(&appointments, &grid);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    println!("{}", args.date.format("%A %d/%m/%Y"));
    if layout.is_empty() {
        println!("  no appointments");
    }
    for item in &layout {
        let apt = &item.appointment;
        let who = if item.is_pause() {
            String::new()
        } else {
            format!("  {} ({})", apt.client_name, apt.client_phone)
        };
        println!(
            "  {}-{}  {:<16}{}",
            apt.time.format("%H:%M"),
            item.end_time,
            apt.service_name,
            who
        );
    }
    println!("  booked: {} min", booked_minutes(&layout));

    let hours = OperatingHoursService::new(database.connection()).for_date(args.date)?;
    let report = slot_report(
        &appointments,
        args.date,
        Local::now().naive_local(),
        booking_window(hours.as_ref(), &grid),
        settings.booking_slot_interval,
    );
    match report {
        SlotReport::Past => {}
        SlotReport::Closed => println!("  closed"),
        SlotReport::Free(labels) => println!(
            "  free {}-min slots: {}",
            DEFAULT_DURATION_MINUTES,
            labels.join(" ")
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_past_day_lists_no_slots() {
        let now = date().succ_opt().unwrap().and_time(at(9, 0));
        assert_eq!(slot_report(&[], date(), now, Some((480, 1200)), 10), SlotReport::Past);
    }

    #[test]
    fn test_closed_day() {
        let now = date().and_time(at(7, 0));
        assert_eq!(slot_report(&[], date(), now, None, 10), SlotReport::Closed);
    }

    #[test]
    fn test_today_only_offers_later_slots() {
        let now = date().and_time(at(19, 0));
        assert_eq!(
            slot_report(&[], date(), now, Some((480, 1200)), 10),
            SlotReport::Free(vec!["19:10".to_string(), "19:20".to_string(), "19:30".to_string()])
        );
    }
}

//! Weekly opening hours stored in the `operating_hours` table.

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{self, params, Connection, Row};

use crate::models::operating_hours::{day_of_week, OperatingHours};

const TIME_FORMAT: &str = "%H:%M";

pub struct OperatingHoursService<'a> {
    conn: &'a Connection,
}

impl<'a> OperatingHoursService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All configured weekdays, Sunday first.
    pub fn list(&self) -> Result<Vec<OperatingHours>> {
        let mut stmt = self.conn.prepare(
            "SELECT day_of_week, is_closed, start_time, end_time
             FROM operating_hours ORDER BY day_of_week ASC",
        )?;

        let rows = stmt
            .query_map([], map_hours_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to load operating hours")?;

        Ok(rows)
    }

    pub fn get(&self, day: u8) -> Result<Option<OperatingHours>> {
        let result = self.conn.query_row(
            "SELECT day_of_week, is_closed, start_time, end_time
             FROM operating_hours WHERE day_of_week = ?",
            [day],
            map_hours_row,
        );

        match result {
            Ok(hours) => Ok(Some(hours)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Hours that apply to a calendar date; `None` when never configured.
    pub fn for_date(&self, date: NaiveDate) -> Result<Option<OperatingHours>> {
        self.get(day_of_week(date))
    }

    /// Insert or replace one weekday.
    pub fn upsert(&self, hours: &OperatingHours) -> Result<()> {
        hours.validate().map_err(|e| anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO operating_hours (day_of_week, is_closed, start_time, end_time)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(day_of_week) DO UPDATE SET
                    is_closed = excluded.is_closed,
                    start_time = excluded.start_time,
                    end_time = excluded.end_time",
                params![
                    hours.day_of_week,
                    hours.is_closed as i32,
                    hours.start_time.map(|t| t.format(TIME_FORMAT).to_string()),
                    hours.end_time.map(|t| t.format(TIME_FORMAT).to_string()),
                ],
            )
            .with_context(|| format!("Failed to save hours for day {}", hours.day_of_week))?;

        Ok(())
    }
}

fn parse_optional_time(value: Option<String>) -> rusqlite::Result<Option<NaiveTime>> {
    value
        .map(|v| {
            NaiveTime::parse_from_str(&v, TIME_FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(&v, "%H:%M:%S"))
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        })
        .transpose()
}

fn map_hours_row(row: &Row<'_>) -> rusqlite::Result<OperatingHours> {
    Ok(OperatingHours {
        day_of_week: row.get(0)?,
        is_closed: row.get::<_, i32>(1)? != 0,
        start_time: parse_optional_time(row.get(2)?)?,
        end_time: parse_optional_time(row.get(3)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::Database;

    fn setup_test_db() -> Database {
        let db = Database::in_memory().unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_upsert_and_get() {
        let db = setup_test_db();
        let service = OperatingHoursService::new(db.connection());

        service
            .upsert(&OperatingHours::open(0, at(9, 0), at(18, 0)))
            .unwrap();
        service.upsert(&OperatingHours::closed(6)).unwrap();

        assert_eq!(
            service.get(0).unwrap(),
            Some(OperatingHours::open(0, at(9, 0), at(18, 0)))
        );
        assert_eq!(service.get(6).unwrap(), Some(OperatingHours::closed(6)));
        assert_eq!(service.get(3).unwrap(), None);
        assert_eq!(service.list().unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_replaces_existing_day() {
        let db = setup_test_db();
        let service = OperatingHoursService::new(db.connection());

        service
            .upsert(&OperatingHours::open(2, at(9, 0), at(18, 0)))
            .unwrap();
        service.upsert(&OperatingHours::closed(2)).unwrap();

        assert!(service.get(2).unwrap().unwrap().is_closed);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_rejects_invalid_hours() {
        let db = setup_test_db();
        let service = OperatingHoursService::new(db.connection());

        let result = service.upsert(&OperatingHours::open(1, at(18, 0), at(9, 0)));
        assert!(result.is_err());
    }

    #[test]
    fn test_for_date_uses_weekday() {
        let db = setup_test_db();
        let service = OperatingHoursService::new(db.connection());
        service.upsert(&OperatingHours::closed(0)).unwrap();

        // 2025-03-09 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert!(service.for_date(sunday).unwrap().unwrap().is_closed);
        assert!(service.for_date(sunday.succ_opt().unwrap()).unwrap().is_none());
    }
}

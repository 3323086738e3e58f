use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_appointments_table(conn)?;
    run_appointments_migrations(conn)?;
    create_appointments_indexes(conn)?;
    create_operating_hours_table(conn)?;
    create_catalog_tables(conn)?;
    Ok(())
}

fn create_appointments_table(conn: &Connection) -> Result<()> {
    // date is YYYY-MM-DD and time is HH:MM, both naive local values
    conn.execute(
        "CREATE TABLE IF NOT EXISTS appointments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_name TEXT NOT NULL,
            client_phone TEXT NOT NULL,
            service_name TEXT NOT NULL,
            date TEXT NOT NULL,
            time TEXT NOT NULL,
            service_duration INTEGER,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create appointments table")?;

    Ok(())
}

fn run_appointments_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "appointments",
        "service_duration",
        "ALTER TABLE appointments ADD COLUMN service_duration INTEGER",
    )?;

    // SQLite refuses non-constant defaults in ALTER TABLE
    migrations::ensure_column(
        conn,
        "appointments",
        "updated_at",
        "ALTER TABLE appointments ADD COLUMN updated_at TEXT",
    )?;

    Ok(())
}

fn create_appointments_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_appointments_date ON appointments(date)",
        [],
    )
    .context("Failed to create appointments date index")?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_slot ON appointments(date, time)",
        [],
    )
    .context("Failed to create appointments slot index")?;

    Ok(())
}

fn create_operating_hours_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS operating_hours (
            day_of_week INTEGER PRIMARY KEY CHECK (day_of_week BETWEEN 0 AND 6),
            is_closed INTEGER NOT NULL DEFAULT 0,
            start_time TEXT,
            end_time TEXT
        )",
        [],
    )
    .context("Failed to create operating_hours table")?;

    Ok(())
}

fn create_catalog_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create categories table")?;

    // price is in shekels; duration_minutes feeds the client booking length
    conn.execute(
        "CREATE TABLE IF NOT EXISTS services (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_id INTEGER NOT NULL REFERENCES categories(id),
            name TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            price REAL NOT NULL DEFAULT 0,
            price_is_min INTEGER NOT NULL DEFAULT 0,
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            hidden_from_booking INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create services table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_services_category ON services(category_id, sort_order)",
        [],
    )
    .context("Failed to create services category index")?;

    Ok(())
}

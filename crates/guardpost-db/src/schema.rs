//! Table definitions for the workforce data model.
//!
//! Hierarchy: clients → regions → opzones → sites → posts. Employees are
//! linked to sites through assignments and to shifts through posts.

use rusqlite::Connection;

use crate::StoreError;

pub(crate) fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS clients (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL UNIQUE,
            industry TEXT,
            contact_person TEXT,
            contact_email TEXT,
            contact_phone TEXT,
            city TEXT,
            state TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS regions (
            id INTEGER PRIMARY KEY,
            client_id INTEGER NOT NULL REFERENCES clients(id),
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS opzones (
            id INTEGER PRIMARY KEY,
            region_id INTEGER NOT NULL REFERENCES regions(id),
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            zone_manager_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY,
            opzone_id INTEGER NOT NULL REFERENCES opzones(id),
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            address TEXT,
            city TEXT,
            state TEXT,
            site_incharge_name TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY,
            site_id INTEGER NOT NULL REFERENCES sites(id),
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            description TEXT,
            post_type TEXT NOT NULL DEFAULT 'static',
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS designations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            level INTEGER NOT NULL,
            description TEXT
        );

        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY,
            employee_code TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            designation_id INTEGER REFERENCES designations(id),
            phone TEXT,
            email TEXT,
            city TEXT,
            state TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS employee_site_assignments (
            id INTEGER PRIMARY KEY,
            employee_id INTEGER NOT NULL REFERENCES employees(id),
            site_id INTEGER NOT NULL REFERENCES sites(id),
            is_primary INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS shift_templates (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            code TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            duration_hours INTEGER NOT NULL,
            is_overnight INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS shifts (
            id INTEGER PRIMARY KEY,
            post_id INTEGER NOT NULL REFERENCES posts(id),
            employee_id INTEGER NOT NULL REFERENCES employees(id),
            shift_template_id INTEGER REFERENCES shift_templates(id),
            shift_date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'scheduled',
            notes TEXT
        );

        CREATE TABLE IF NOT EXISTS attendance (
            id INTEGER PRIMARY KEY,
            shift_id INTEGER NOT NULL REFERENCES shifts(id),
            employee_id INTEGER NOT NULL REFERENCES employees(id),
            check_in_time TEXT,
            check_out_time TEXT,
            face_match_percentage REAL,
            status TEXT NOT NULL DEFAULT 'pending'
        );

        CREATE TABLE IF NOT EXISTS incidents (
            id INTEGER PRIMARY KEY,
            post_id INTEGER NOT NULL REFERENCES posts(id),
            reported_by INTEGER REFERENCES employees(id),
            incident_type TEXT NOT NULL,
            severity TEXT NOT NULL DEFAULT 'low',
            title TEXT NOT NULL,
            description TEXT,
            occurred_at TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'open',
            resolved_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_shifts_date ON shifts(shift_date);
        CREATE INDEX IF NOT EXISTS idx_incidents_occurred ON incidents(occurred_at);
        ",
    )?;
    Ok(())
}

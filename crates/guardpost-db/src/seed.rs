//! Demo dataset for first-run and test databases.
//!
//! Dates are written relative to `date('now')` so "today" and lookback
//! queries always have rows to return.

use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

pub(crate) fn seed_if_empty(conn: &Connection) -> Result<(), StoreError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM clients", [], |r| r.get(0))?;
    if count > 0 {
        info!("Database already has {} clients, skipping seed", count);
        return Ok(());
    }

    info!("Seeding demo data...");

    conn.execute_batch(
        "INSERT INTO clients (id, name, code, industry, contact_person, contact_email, contact_phone, city, state) VALUES
            (1, 'Meridian Hotels Group', 'MHG', 'Hospitality', 'Priya Nair', 'priya.nair@meridianhotels.example', '+91-98200-11001', 'Mumbai', 'Maharashtra'),
            (2, 'Vertex Industrial Parks', 'VIP', 'Manufacturing', 'Rohan Mehta', 'rohan.mehta@vertexparks.example', '+91-98200-22002', 'Pune', 'Maharashtra');

        INSERT INTO regions (id, client_id, name, code) VALUES
            (1, 1, 'West Region', 'MHG-W'),
            (2, 2, 'Pune Region', 'VIP-P');

        INSERT INTO opzones (id, region_id, name, code, zone_manager_name) VALUES
            (1, 1, 'South Mumbai Zone', 'MHG-W-SM', 'Kiran Shah'),
            (2, 2, 'Hinjewadi Zone', 'VIP-P-HJ', 'Deepak Rao');

        INSERT INTO sites (id, opzone_id, name, code, address, city, state, site_incharge_name) VALUES
            (1, 1, 'Meridian Grand Colaba', 'SITE-MGC', '12 Apollo Bunder Rd', 'Mumbai', 'Maharashtra', 'Sunil Patil'),
            (2, 1, 'Meridian Bay Worli', 'SITE-MBW', '4 Sea Face Rd', 'Mumbai', 'Maharashtra', 'Anita Desai'),
            (3, 2, 'Vertex Tech Park One', 'SITE-VTP1', 'Phase 2, Hinjewadi', 'Pune', 'Maharashtra', 'Manoj Kulkarni');

        INSERT INTO posts (id, site_id, name, code, description, post_type) VALUES
            (1, 1, 'Main Gate', 'MGC-P1', 'Primary vehicle and visitor entry', 'static'),
            (2, 1, 'Lobby Desk', 'MGC-P2', 'Guest screening at the lobby', 'static'),
            (3, 2, 'Main Gate', 'MBW-P1', 'Primary entry gate', 'static'),
            (4, 3, 'Perimeter Patrol', 'VTP1-P1', 'Perimeter rounds, 2-hour cycle', 'patrol'),
            (5, 3, 'Loading Dock', 'VTP1-P2', 'Goods entry supervision', 'static');

        INSERT INTO designations (id, name, level, description) VALUES
            (1, 'Guard', 1, 'Entry-level security guard'),
            (2, 'Senior Guard', 2, 'Experienced guard, can mentor'),
            (3, 'Supervisor', 3, 'Supervises a shift at a site'),
            (4, 'Site Supervisor', 4, 'Responsible for a whole site');

        INSERT INTO employees (id, employee_code, first_name, last_name, designation_id, phone, email, city, state) VALUES
            (1, 'EMP001', 'Amit', 'Singh', 1, '+91-98111-00001', 'amit.singh@guardpost.example', 'Mumbai', 'Maharashtra'),
            (2, 'EMP002', 'Rajesh', 'Kumar', 2, '+91-98111-00002', 'rajesh.kumar@guardpost.example', 'Mumbai', 'Maharashtra'),
            (3, 'EMP003', 'Sneha', 'Joshi', 3, '+91-98111-00003', 'sneha.joshi@guardpost.example', 'Mumbai', 'Maharashtra'),
            (4, 'EMP004', 'Vikram', 'Patil', 1, '+91-98111-00004', 'vikram.patil@guardpost.example', 'Pune', 'Maharashtra'),
            (5, 'EMP005', 'Farhan', 'Shaikh', 2, '+91-98111-00005', 'farhan.shaikh@guardpost.example', 'Pune', 'Maharashtra'),
            (6, 'EMP006', 'Kavita', 'Iyer', 4, '+91-98111-00006', 'kavita.iyer@guardpost.example', 'Pune', 'Maharashtra');

        INSERT INTO employee_site_assignments (employee_id, site_id, is_primary) VALUES
            (1, 1, 1), (2, 1, 1), (3, 1, 1), (2, 2, 0), (4, 3, 1), (5, 3, 1), (6, 3, 1);

        INSERT INTO shift_templates (id, name, code, start_time, end_time, duration_hours, is_overnight) VALUES
            (1, 'Morning Shift', 'MS', '06:00', '14:00', 8, 0),
            (2, 'Afternoon Shift', 'AS', '14:00', '22:00', 8, 0),
            (3, 'Night Shift', 'NS', '22:00', '06:00', 8, 1);
        ",
    )?;

    // Shifts and incidents use relative dates so lookback windows stay hot.
    conn.execute_batch(
        "INSERT INTO shifts (id, post_id, employee_id, shift_template_id, shift_date, start_time, end_time, status) VALUES
            (1, 1, 1, 1, date('now'), '06:00', '14:00', 'in_progress'),
            (2, 2, 2, 1, date('now'), '06:00', '14:00', 'in_progress'),
            (3, 4, 4, 2, date('now'), '14:00', '22:00', 'scheduled'),
            (4, 5, 5, 2, date('now'), '14:00', '22:00', 'scheduled'),
            (5, 1, 2, 2, date('now', '-1 day'), '14:00', '22:00', 'completed'),
            (6, 3, 3, 1, date('now', '-1 day'), '06:00', '14:00', 'completed'),
            (7, 4, 5, 3, date('now', '-2 days'), '22:00', '06:00', 'completed'),
            (8, 1, 1, 1, date('now', '-3 days'), '06:00', '14:00', 'no_show'),
            (9, 5, 6, 1, date('now', '-10 days'), '06:00', '14:00', 'completed'),
            (10, 2, 3, 2, date('now', '+1 day'), '14:00', '22:00', 'scheduled');

        INSERT INTO attendance (shift_id, employee_id, check_in_time, check_out_time, face_match_percentage, status) VALUES
            (1, 1, datetime('now', 'start of day', '+6 hours'), NULL, 97.4, 'checked_in'),
            (2, 2, datetime('now', 'start of day', '+6 hours', '+4 minutes'), NULL, 95.1, 'checked_in'),
            (5, 2, datetime('now', '-1 day', 'start of day', '+14 hours'), datetime('now', '-1 day', 'start of day', '+22 hours'), 96.8, 'checked_out'),
            (6, 3, datetime('now', '-1 day', 'start of day', '+6 hours'), datetime('now', '-1 day', 'start of day', '+14 hours'), 98.2, 'checked_out'),
            (8, 1, NULL, NULL, NULL, 'absent');

        INSERT INTO incidents (id, post_id, reported_by, incident_type, severity, title, description, occurred_at, status, resolved_at) VALUES
            (1, 1, 2, 'unauthorized_entry', 'high', 'Tailgating at main gate', 'Unidentified person followed a delivery vehicle through the gate.', datetime('now', '-1 day'), 'investigating', NULL),
            (2, 2, 3, 'theft', 'medium', 'Missing luggage trolley', 'Guest luggage trolley unaccounted for after checkout rush.', datetime('now', '-3 days'), 'open', NULL),
            (3, 4, 5, 'safety_hazard', 'low', 'Broken perimeter light', 'Pole 7 light out on the north fence.', datetime('now', '-5 days'), 'resolved', datetime('now', '-4 days')),
            (4, 5, 4, 'vandalism', 'critical', 'Dock camera tampered', 'CCTV at loading dock found rotated and cable cut.', datetime('now', '-20 days'), 'closed', datetime('now', '-18 days'));
        ",
    )?;

    info!("Seeded demo data");
    Ok(())
}

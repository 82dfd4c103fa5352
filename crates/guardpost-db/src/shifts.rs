//! Shift and attendance lookups.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::{StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct ShiftSummary {
    pub id: i64,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub employee_name: String,
    pub employee_code: String,
    pub post_name: String,
    pub site_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftDetails {
    #[serde(flatten)]
    pub summary: ShiftSummary,
    pub notes: Option<String>,
    pub template_name: Option<String>,
    pub attendance_status: Option<String>,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub shift_date: String,
    pub site_name: String,
    pub post_name: String,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub face_match_percentage: Option<f64>,
    pub status: String,
}

pub(crate) const SHIFT_SELECT: &str =
    "SELECT sh.id, sh.shift_date, sh.start_time, sh.end_time, sh.status,
            e.first_name || ' ' || e.last_name, e.employee_code, p.name, s.name
     FROM shifts sh
     JOIN employees e ON sh.employee_id = e.id
     JOIN posts p ON sh.post_id = p.id
     JOIN sites s ON p.site_id = s.id";

pub(crate) fn map_shift_row(r: &Row<'_>) -> rusqlite::Result<ShiftSummary> {
    Ok(ShiftSummary {
        id: r.get(0)?,
        shift_date: r.get(1)?,
        start_time: r.get(2)?,
        end_time: r.get(3)?,
        status: r.get(4)?,
        employee_name: r.get(5)?,
        employee_code: r.get(6)?,
        post_name: r.get(7)?,
        site_name: r.get(8)?,
    })
}

impl WorkforceStore {
    /// Shifts dated today, optionally restricted to one site.
    pub fn todays_shifts(&self, site_id: Option<i64>) -> Result<Vec<ShiftSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{SHIFT_SELECT}
             WHERE sh.shift_date = date('now') AND (?1 IS NULL OR s.id = ?1)
             ORDER BY sh.start_time"
        ))?;
        let rows = stmt.query_map(params![site_id], map_shift_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Shifts in progress right now, with the database's current timestamp.
    pub fn current_shifts(
        &self,
        site_id: Option<i64>,
    ) -> Result<(String, Vec<ShiftSummary>), StoreError> {
        let conn = self.conn();
        let now: String = conn.query_row("SELECT datetime('now')", [], |r| r.get(0))?;
        let mut stmt = conn.prepare(&format!(
            "{SHIFT_SELECT}
             WHERE sh.shift_date = date('now') AND sh.status = 'in_progress'
               AND (?1 IS NULL OR s.id = ?1)
             ORDER BY sh.start_time"
        ))?;
        let rows = stmt.query_map(params![site_id], map_shift_row)?;
        Ok((now, rows.collect::<Result<_, _>>()?))
    }

    /// Shifts on a specific date (`YYYY-MM-DD`), optionally at one site.
    pub fn shifts_by_date(
        &self,
        date: &str,
        site_id: Option<i64>,
    ) -> Result<Vec<ShiftSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{SHIFT_SELECT}
             WHERE sh.shift_date = date(?1) AND (?2 IS NULL OR s.id = ?2)
             ORDER BY sh.start_time"
        ))?;
        let rows = stmt.query_map(params![date, site_id], map_shift_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// One shift by id, including notes, template, and attendance.
    pub fn shift_details(&self, shift_id: i64) -> Result<Option<ShiftDetails>, StoreError> {
        let conn = self.conn();
        Ok(conn
            .query_row(
                "SELECT sh.id, sh.shift_date, sh.start_time, sh.end_time, sh.status,
                        e.first_name || ' ' || e.last_name, e.employee_code, p.name, s.name,
                        sh.notes, st.name, a.status, a.check_in_time, a.check_out_time
                 FROM shifts sh
                 JOIN employees e ON sh.employee_id = e.id
                 JOIN posts p ON sh.post_id = p.id
                 JOIN sites s ON p.site_id = s.id
                 LEFT JOIN shift_templates st ON sh.shift_template_id = st.id
                 LEFT JOIN attendance a ON a.shift_id = sh.id
                 WHERE sh.id = ?1",
                params![shift_id],
                |r| {
                    Ok(ShiftDetails {
                        summary: map_shift_row(r)?,
                        notes: r.get(9)?,
                        template_name: r.get(10)?,
                        attendance_status: r.get(11)?,
                        check_in_time: r.get(12)?,
                        check_out_time: r.get(13)?,
                    })
                },
            )
            .optional()?)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_todays_shifts() {
        let store = test_store();
        let shifts = store.todays_shifts(None).unwrap();
        assert_eq!(shifts.len(), 4);
    }

    #[test]
    fn test_current_shifts_are_in_progress() {
        let store = test_store();
        let (now, shifts) = store.current_shifts(None).unwrap();
        assert!(!now.is_empty());
        assert_eq!(shifts.len(), 2);
        assert!(shifts.iter().all(|s| s.status == "in_progress"));
    }

    #[test]
    fn test_current_shifts_site_filter() {
        let store = test_store();
        let (_, shifts) = store.current_shifts(Some(3)).unwrap();
        assert!(shifts.is_empty());
    }

    #[test]
    fn test_shift_details_includes_attendance() {
        let store = test_store();
        let shift = store.shift_details(1).unwrap().unwrap();
        assert_eq!(shift.summary.employee_code, "EMP001");
        assert_eq!(shift.attendance_status.as_deref(), Some("checked_in"));
        assert!(store.shift_details(999).unwrap().is_none());
    }
}

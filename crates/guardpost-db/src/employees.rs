//! Employee and designation lookups.
//!
//! Employee search matches first name, last name, full name, employee code,
//! and email, all as case-insensitive substrings.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::shifts::{map_shift_row, AttendanceRecord, ShiftSummary, SHIFT_SELECT};
use crate::{like_pattern, StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub id: i64,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetails {
    #[serde(flatten)]
    pub summary: EmployeeSummary,
    pub state: Option<String>,
    pub assigned_sites: Vec<String>,
    pub total_shifts: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Designation {
    pub id: i64,
    pub name: String,
    pub level: i64,
    pub description: Option<String>,
    pub employee_count: i64,
}

const EMPLOYEE_MATCH: &str = "(e.first_name LIKE ?1 OR e.last_name LIKE ?1
    OR (e.first_name || ' ' || e.last_name) LIKE ?1
    OR e.employee_code LIKE ?1 OR e.email LIKE ?1)";

const EMPLOYEE_SELECT: &str =
    "SELECT e.id, e.employee_code, e.first_name, e.last_name, d.name,
            e.phone, e.email, e.city, e.is_active
     FROM employees e
     LEFT JOIN designations d ON e.designation_id = d.id";

fn map_employee_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<EmployeeSummary> {
    Ok(EmployeeSummary {
        id: r.get(0)?,
        employee_code: r.get(1)?,
        first_name: r.get(2)?,
        last_name: r.get(3)?,
        designation: r.get(4)?,
        phone: r.get(5)?,
        email: r.get(6)?,
        city: r.get(7)?,
        is_active: r.get(8)?,
    })
}

/// Resolves a fuzzy name or code to (id, full name); first match wins.
pub(crate) fn resolve_employee(
    conn: &Connection,
    term: &str,
) -> Result<Option<(i64, String)>, StoreError> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT e.id, e.first_name || ' ' || e.last_name
                 FROM employees e WHERE {EMPLOYEE_MATCH}
                 ORDER BY e.first_name LIMIT 1"
            ),
            params![like_pattern(term)],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?)
}

impl WorkforceStore {
    /// Lists every employee with designation, first-name order.
    pub fn all_employees(&self) -> Result<Vec<EmployeeSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("{EMPLOYEE_SELECT} ORDER BY e.first_name"))?;
        let rows = stmt.query_map([], map_employee_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// All employees matching a search term.
    pub fn search_employees(&self, term: &str) -> Result<Vec<EmployeeSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT} WHERE {EMPLOYEE_MATCH} ORDER BY e.first_name"
        ))?;
        let rows = stmt.query_map(params![like_pattern(term)], map_employee_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Full record for the first employee matching a name or code.
    pub fn employee_details(&self, term: &str) -> Result<Option<EmployeeDetails>, StoreError> {
        let conn = self.conn();
        let Some((employee_id, _)) = resolve_employee(&conn, term)? else {
            return Ok(None);
        };

        let details = conn.query_row(
            &format!(
                "SELECT e.id, e.employee_code, e.first_name, e.last_name, d.name,
                        e.phone, e.email, e.city, e.is_active, e.state,
                        (SELECT COUNT(*) FROM shifts sh WHERE sh.employee_id = e.id)
                 FROM employees e
                 LEFT JOIN designations d ON e.designation_id = d.id
                 WHERE e.id = ?1"
            ),
            params![employee_id],
            |r| {
                Ok(EmployeeDetails {
                    summary: map_employee_row(r)?,
                    state: r.get(9)?,
                    assigned_sites: Vec::new(),
                    total_shifts: r.get(10)?,
                })
            },
        )?;

        let mut stmt = conn.prepare(
            "SELECT s.name FROM employee_site_assignments esa
             JOIN sites s ON esa.site_id = s.id
             WHERE esa.employee_id = ?1 ORDER BY esa.is_primary DESC, s.name",
        )?;
        let sites: Vec<String> = stmt
            .query_map(params![employee_id], |r| r.get(0))?
            .collect::<Result<_, _>>()?;

        Ok(Some(EmployeeDetails { assigned_sites: sites, ..details }))
    }

    /// An employee's shifts within the last `days` days (and the future).
    pub fn employee_shifts(
        &self,
        term: &str,
        days: i64,
    ) -> Result<Option<(String, Vec<ShiftSummary>)>, StoreError> {
        let conn = self.conn();
        let Some((employee_id, resolved)) = resolve_employee(&conn, term)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
            "{SHIFT_SELECT}
             WHERE sh.employee_id = ?1 AND sh.shift_date >= date('now', '-' || ?2 || ' days')
             ORDER BY sh.shift_date DESC, sh.start_time"
        ))?;
        let rows = stmt.query_map(params![employee_id, days], map_shift_row)?;
        Ok(Some((resolved, rows.collect::<Result<_, _>>()?)))
    }

    /// An employee's attendance records within the last `days` days.
    pub fn employee_attendance(
        &self,
        term: &str,
        days: i64,
    ) -> Result<Option<(String, Vec<AttendanceRecord>)>, StoreError> {
        let conn = self.conn();
        let Some((employee_id, resolved)) = resolve_employee(&conn, term)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT sh.shift_date, s.name, p.name, a.check_in_time, a.check_out_time,
                    a.face_match_percentage, a.status
             FROM attendance a
             JOIN shifts sh ON a.shift_id = sh.id
             JOIN posts p ON sh.post_id = p.id
             JOIN sites s ON p.site_id = s.id
             WHERE a.employee_id = ?1 AND sh.shift_date >= date('now', '-' || ?2 || ' days')
             ORDER BY sh.shift_date DESC",
        )?;
        let rows = stmt.query_map(params![employee_id, days], |r| {
            Ok(AttendanceRecord {
                shift_date: r.get(0)?,
                site_name: r.get(1)?,
                post_name: r.get(2)?,
                check_in_time: r.get(3)?,
                check_out_time: r.get(4)?,
                face_match_percentage: r.get(5)?,
                status: r.get(6)?,
            })
        })?;
        Ok(Some((resolved, rows.collect::<Result<_, _>>()?)))
    }

    /// Lists designations with headcount, ordered by level.
    pub fn all_designations(&self) -> Result<Vec<Designation>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT d.id, d.name, d.level, d.description,
                    (SELECT COUNT(*) FROM employees e WHERE e.designation_id = d.id)
             FROM designations d ORDER BY d.level",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(Designation {
                id: r.get(0)?,
                name: r.get(1)?,
                level: r.get(2)?,
                description: r.get(3)?,
                employee_count: r.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Employees holding a designation (fuzzy designation name).
    pub fn employees_by_designation(
        &self,
        designation: &str,
    ) -> Result<Vec<EmployeeSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{EMPLOYEE_SELECT} WHERE d.name LIKE ?1 ORDER BY e.first_name"
        ))?;
        let rows = stmt.query_map(params![like_pattern(designation)], map_employee_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_search_by_code_and_name() {
        let store = test_store();
        let by_code = store.search_employees("EMP004").unwrap();
        assert_eq!(by_code.len(), 1);
        assert_eq!(by_code[0].first_name, "Vikram");

        let by_name = store.search_employees("amit singh").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].employee_code, "EMP001");
    }

    #[test]
    fn test_employee_details_with_sites() {
        let store = test_store();
        let details = store.employee_details("Rajesh").unwrap().unwrap();
        assert_eq!(details.summary.employee_code, "EMP002");
        assert_eq!(details.assigned_sites.len(), 2);
        assert!(details.total_shifts >= 2);
    }

    #[test]
    fn test_unknown_employee_is_none() {
        let store = test_store();
        assert!(store.employee_details("Nonexistent Person").unwrap().is_none());
    }

    #[test]
    fn test_employees_by_designation_fuzzy() {
        let store = test_store();
        let guards = store.employees_by_designation("guard").unwrap();
        // "guard" also matches "Senior Guard".
        assert_eq!(guards.len(), 4);
    }
}

//! Site lookups: details, staffing, shifts, and incidents at a site.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::incidents::IncidentSummary;
use crate::shifts::ShiftSummary;
use crate::{like_pattern, StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub client_name: String,
    pub post_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteDetails {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub site_incharge_name: Option<String>,
    pub is_active: bool,
    pub opzone_name: String,
    pub region_name: String,
    pub client_name: String,
    pub post_count: i64,
    pub employee_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteEmployee {
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub is_primary: bool,
}

/// Resolves a fuzzy site name to (id, name); first match by name order.
pub(crate) fn resolve_site(
    conn: &Connection,
    name: &str,
) -> Result<Option<(i64, String)>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM sites WHERE name LIKE ?1 ORDER BY name LIMIT 1",
            params![like_pattern(name)],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?)
}

impl WorkforceStore {
    /// Resolves a fuzzy site name for callers that filter other queries
    /// by site.
    pub fn resolve_site_name(&self, name: &str) -> Result<Option<(i64, String)>, StoreError> {
        let conn = self.conn();
        resolve_site(&conn, name)
    }

    /// Lists every site with its client and post count, name order.
    pub fn all_sites(&self) -> Result<Vec<SiteSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.name, s.code, s.city, s.state, c.name,
                    (SELECT COUNT(*) FROM posts p WHERE p.site_id = s.id)
             FROM sites s
             JOIN opzones o ON s.opzone_id = o.id
             JOIN regions r ON o.region_id = r.id
             JOIN clients c ON r.client_id = c.id
             ORDER BY s.name",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(SiteSummary {
                id: r.get(0)?,
                name: r.get(1)?,
                code: r.get(2)?,
                city: r.get(3)?,
                state: r.get(4)?,
                client_name: r.get(5)?,
                post_count: r.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Full record for the first site whose name contains `name`.
    pub fn site_details(&self, name: &str) -> Result<Option<SiteDetails>, StoreError> {
        let conn = self.conn();
        Ok(conn
            .query_row(
                "SELECT s.id, s.name, s.code, s.address, s.city, s.state,
                        s.site_incharge_name, s.is_active, o.name, r.name, c.name,
                        (SELECT COUNT(*) FROM posts p WHERE p.site_id = s.id),
                        (SELECT COUNT(*) FROM employee_site_assignments esa WHERE esa.site_id = s.id)
                 FROM sites s
                 JOIN opzones o ON s.opzone_id = o.id
                 JOIN regions r ON o.region_id = r.id
                 JOIN clients c ON r.client_id = c.id
                 WHERE s.name LIKE ?1 ORDER BY s.name LIMIT 1",
                params![like_pattern(name)],
                |r| {
                    Ok(SiteDetails {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        code: r.get(2)?,
                        address: r.get(3)?,
                        city: r.get(4)?,
                        state: r.get(5)?,
                        site_incharge_name: r.get(6)?,
                        is_active: r.get(7)?,
                        opzone_name: r.get(8)?,
                        region_name: r.get(9)?,
                        client_name: r.get(10)?,
                        post_count: r.get(11)?,
                        employee_count: r.get(12)?,
                    })
                },
            )
            .optional()?)
    }

    /// Employees assigned to a site. `None` when no site matches.
    pub fn employees_at_site(
        &self,
        site_name: &str,
    ) -> Result<Option<(String, Vec<SiteEmployee>)>, StoreError> {
        let conn = self.conn();
        let Some((site_id, resolved)) = resolve_site(&conn, site_name)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT e.employee_code, e.first_name, e.last_name, d.name, e.phone, esa.is_primary
             FROM employee_site_assignments esa
             JOIN employees e ON esa.employee_id = e.id
             LEFT JOIN designations d ON e.designation_id = d.id
             WHERE esa.site_id = ?1
             ORDER BY e.first_name",
        )?;
        let rows = stmt.query_map(params![site_id], |r| {
            Ok(SiteEmployee {
                employee_code: r.get(0)?,
                first_name: r.get(1)?,
                last_name: r.get(2)?,
                designation: r.get(3)?,
                phone: r.get(4)?,
                is_primary: r.get(5)?,
            })
        })?;
        Ok(Some((resolved, rows.collect::<Result<_, _>>()?)))
    }

    /// Shifts at a site within the last `days` days (and the future).
    pub fn site_shifts(
        &self,
        site_name: &str,
        days: i64,
    ) -> Result<Option<(String, Vec<ShiftSummary>)>, StoreError> {
        let conn = self.conn();
        let Some((site_id, resolved)) = resolve_site(&conn, site_name)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
            "{} WHERE p.site_id = ?1 AND sh.shift_date >= date('now', '-' || ?2 || ' days')
             ORDER BY sh.shift_date DESC, sh.start_time",
            crate::shifts::SHIFT_SELECT
        ))?;
        let rows = stmt.query_map(params![site_id, days], crate::shifts::map_shift_row)?;
        Ok(Some((resolved, rows.collect::<Result<_, _>>()?)))
    }

    /// Incidents at a site within the last `days` days, optionally filtered
    /// by status.
    pub fn site_incidents(
        &self,
        site_name: &str,
        days: i64,
        status: Option<&str>,
    ) -> Result<Option<(String, Vec<IncidentSummary>)>, StoreError> {
        let conn = self.conn();
        let Some((site_id, resolved)) = resolve_site(&conn, site_name)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
            "{} WHERE s.id = ?1 AND i.occurred_at >= datetime('now', '-' || ?2 || ' days')
               AND (?3 IS NULL OR i.status = ?3)
             ORDER BY i.occurred_at DESC",
            crate::incidents::INCIDENT_SELECT
        ))?;
        let rows = stmt.query_map(params![site_id, days, status], crate::incidents::map_incident_row)?;
        Ok(Some((resolved, rows.collect::<Result<_, _>>()?)))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_all_sites_include_client() {
        let store = test_store();
        let sites = store.all_sites().unwrap();
        assert_eq!(sites.len(), 3);
        let vtp = sites.iter().find(|s| s.name == "Vertex Tech Park One").unwrap();
        assert_eq!(vtp.client_name, "Vertex Industrial Parks");
        assert_eq!(vtp.post_count, 2);
    }

    #[test]
    fn test_site_fuzzy_lookup() {
        let store = test_store();
        let site = store.site_details("worli").unwrap().unwrap();
        assert_eq!(site.name, "Meridian Bay Worli");
        assert_eq!(site.region_name, "West Region");
    }

    #[test]
    fn test_employees_at_site() {
        let store = test_store();
        let (resolved, employees) = store.employees_at_site("Colaba").unwrap().unwrap();
        assert_eq!(resolved, "Meridian Grand Colaba");
        assert_eq!(employees.len(), 3);
    }

    #[test]
    fn test_site_incidents_status_filter() {
        let store = test_store();
        let (_, all) = store.site_incidents("Colaba", 7, None).unwrap().unwrap();
        assert_eq!(all.len(), 2);
        let (_, open) = store.site_incidents("Colaba", 7, Some("open")).unwrap().unwrap();
        assert_eq!(open.len(), 1);
    }
}

//! Incident lookups.

use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use crate::{like_pattern, StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct IncidentSummary {
    pub id: i64,
    pub title: String,
    pub incident_type: String,
    pub severity: String,
    pub status: String,
    pub occurred_at: String,
    pub site_name: String,
    pub post_name: String,
    pub reported_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentDetails {
    #[serde(flatten)]
    pub summary: IncidentSummary,
    pub description: Option<String>,
    pub resolved_at: Option<String>,
    pub client_name: String,
}

pub(crate) const INCIDENT_SELECT: &str =
    "SELECT i.id, i.title, i.incident_type, i.severity, i.status, i.occurred_at,
            s.name, p.name, e.first_name || ' ' || e.last_name
     FROM incidents i
     JOIN posts p ON i.post_id = p.id
     JOIN sites s ON p.site_id = s.id
     LEFT JOIN employees e ON i.reported_by = e.id";

pub(crate) fn map_incident_row(r: &Row<'_>) -> rusqlite::Result<IncidentSummary> {
    Ok(IncidentSummary {
        id: r.get(0)?,
        title: r.get(1)?,
        incident_type: r.get(2)?,
        severity: r.get(3)?,
        status: r.get(4)?,
        occurred_at: r.get(5)?,
        site_name: r.get(6)?,
        post_name: r.get(7)?,
        reported_by: r.get(8)?,
    })
}

impl WorkforceStore {
    /// Incidents within the last `days` days, optionally at one site,
    /// most recent first.
    pub fn recent_incidents(
        &self,
        days: i64,
        site_id: Option<i64>,
    ) -> Result<Vec<IncidentSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{INCIDENT_SELECT}
             WHERE i.occurred_at >= datetime('now', '-' || ?1 || ' days')
               AND (?2 IS NULL OR s.id = ?2)
             ORDER BY i.occurred_at DESC"
        ))?;
        let rows = stmt.query_map(params![days, site_id], map_incident_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// One incident by id, including description and client context.
    pub fn incident_details(&self, incident_id: i64) -> Result<Option<IncidentDetails>, StoreError> {
        let conn = self.conn();
        Ok(conn
            .query_row(
                "SELECT i.id, i.title, i.incident_type, i.severity, i.status, i.occurred_at,
                        s.name, p.name, e.first_name || ' ' || e.last_name,
                        i.description, i.resolved_at, c.name
                 FROM incidents i
                 JOIN posts p ON i.post_id = p.id
                 JOIN sites s ON p.site_id = s.id
                 JOIN opzones o ON s.opzone_id = o.id
                 JOIN regions r ON o.region_id = r.id
                 JOIN clients c ON r.client_id = c.id
                 LEFT JOIN employees e ON i.reported_by = e.id
                 WHERE i.id = ?1",
                params![incident_id],
                |r| {
                    Ok(IncidentDetails {
                        summary: map_incident_row(r)?,
                        description: r.get(9)?,
                        resolved_at: r.get(10)?,
                        client_name: r.get(11)?,
                    })
                },
            )
            .optional()?)
    }

    /// Incidents of a given type (fuzzy) within the last `days` days.
    pub fn incidents_by_type(
        &self,
        incident_type: &str,
        days: i64,
    ) -> Result<Vec<IncidentSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{INCIDENT_SELECT}
             WHERE i.incident_type LIKE ?1
               AND i.occurred_at >= datetime('now', '-' || ?2 || ' days')
             ORDER BY i.occurred_at DESC"
        ))?;
        let rows = stmt.query_map(params![like_pattern(incident_type), days], map_incident_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_recent_incidents_window() {
        let store = test_store();
        assert_eq!(store.recent_incidents(7, None).unwrap().len(), 3);
        assert_eq!(store.recent_incidents(30, None).unwrap().len(), 4);
    }

    #[test]
    fn test_incident_details_joins_client() {
        let store = test_store();
        let incident = store.incident_details(4).unwrap().unwrap();
        assert_eq!(incident.summary.severity, "critical");
        assert_eq!(incident.client_name, "Vertex Industrial Parks");
    }

    #[test]
    fn test_incidents_by_type() {
        let store = test_store();
        let thefts = store.incidents_by_type("theft", 30).unwrap();
        assert_eq!(thefts.len(), 1);
        assert_eq!(thefts[0].site_name, "Meridian Grand Colaba");
    }
}

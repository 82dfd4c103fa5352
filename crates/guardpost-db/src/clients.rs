//! Client lookups and the client → region → opzone → site hierarchy.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::{like_pattern, StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct ClientSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub is_active: bool,
    pub region_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDetails {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub industry: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientHierarchy {
    pub client_name: String,
    pub regions: Vec<RegionNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionNode {
    pub name: String,
    pub code: String,
    pub opzones: Vec<OpzoneNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpzoneNode {
    pub name: String,
    pub code: String,
    pub zone_manager_name: Option<String>,
    pub sites: Vec<SiteNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteNode {
    pub name: String,
    pub code: String,
    pub city: Option<String>,
    pub post_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientStats {
    pub client_name: String,
    pub region_count: i64,
    pub site_count: i64,
    pub post_count: i64,
    pub employee_count: i64,
    pub open_incident_count: i64,
}

/// Resolves a fuzzy client name to (id, name); first match by name order.
pub(crate) fn resolve_client(
    conn: &Connection,
    name: &str,
) -> Result<Option<(i64, String)>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM clients WHERE name LIKE ?1 ORDER BY name LIMIT 1",
            params![like_pattern(name)],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?)
}

impl WorkforceStore {
    /// Lists every client with its region count, name order.
    pub fn all_clients(&self) -> Result<Vec<ClientSummary>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, c.code, c.industry, c.city, c.state, c.is_active,
                    (SELECT COUNT(*) FROM regions r WHERE r.client_id = c.id)
             FROM clients c ORDER BY c.name",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(ClientSummary {
                id: r.get(0)?,
                name: r.get(1)?,
                code: r.get(2)?,
                industry: r.get(3)?,
                city: r.get(4)?,
                state: r.get(5)?,
                is_active: r.get(6)?,
                region_count: r.get(7)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Full record for the first client whose name contains `name`.
    pub fn client_details(&self, name: &str) -> Result<Option<ClientDetails>, StoreError> {
        let conn = self.conn();
        Ok(conn
            .query_row(
                "SELECT id, name, code, industry, contact_person, contact_email,
                        contact_phone, city, state, is_active
                 FROM clients WHERE name LIKE ?1 ORDER BY name LIMIT 1",
                params![like_pattern(name)],
                |r| {
                    Ok(ClientDetails {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        code: r.get(2)?,
                        industry: r.get(3)?,
                        contact_person: r.get(4)?,
                        contact_email: r.get(5)?,
                        contact_phone: r.get(6)?,
                        city: r.get(7)?,
                        state: r.get(8)?,
                        is_active: r.get(9)?,
                    })
                },
            )
            .optional()?)
    }

    /// The region → opzone → site tree under a client.
    pub fn client_hierarchy(&self, name: &str) -> Result<Option<ClientHierarchy>, StoreError> {
        let conn = self.conn();
        let Some((client_id, client_name)) = resolve_client(&conn, name)? else {
            return Ok(None);
        };

        let mut region_stmt = conn.prepare(
            "SELECT id, name, code FROM regions WHERE client_id = ?1 ORDER BY name",
        )?;
        let regions: Vec<(i64, String, String)> = region_stmt
            .query_map(params![client_id], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?
            .collect::<Result<_, _>>()?;

        let mut opzone_stmt = conn.prepare(
            "SELECT id, name, code, zone_manager_name FROM opzones WHERE region_id = ?1 ORDER BY name",
        )?;
        let mut site_stmt = conn.prepare(
            "SELECT s.name, s.code, s.city,
                    (SELECT COUNT(*) FROM posts p WHERE p.site_id = s.id)
             FROM sites s WHERE s.opzone_id = ?1 ORDER BY s.name",
        )?;

        let mut region_nodes = Vec::with_capacity(regions.len());
        for (region_id, region_name, region_code) in regions {
            let opzones: Vec<(i64, String, String, Option<String>)> = opzone_stmt
                .query_map(params![region_id], |r| {
                    Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?))
                })?
                .collect::<Result<_, _>>()?;

            let mut opzone_nodes = Vec::with_capacity(opzones.len());
            for (opzone_id, opzone_name, opzone_code, manager) in opzones {
                let sites: Vec<SiteNode> = site_stmt
                    .query_map(params![opzone_id], |r| {
                        Ok(SiteNode {
                            name: r.get(0)?,
                            code: r.get(1)?,
                            city: r.get(2)?,
                            post_count: r.get(3)?,
                        })
                    })?
                    .collect::<Result<_, _>>()?;
                opzone_nodes.push(OpzoneNode {
                    name: opzone_name,
                    code: opzone_code,
                    zone_manager_name: manager,
                    sites,
                });
            }
            region_nodes.push(RegionNode {
                name: region_name,
                code: region_code,
                opzones: opzone_nodes,
            });
        }

        Ok(Some(ClientHierarchy { client_name, regions: region_nodes }))
    }

    /// Rollup counts for everything under a client.
    pub fn client_stats(&self, name: &str) -> Result<Option<ClientStats>, StoreError> {
        let conn = self.conn();
        let Some((client_id, client_name)) = resolve_client(&conn, name)? else {
            return Ok(None);
        };

        let stats = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM regions r WHERE r.client_id = ?1),
                (SELECT COUNT(*) FROM sites s
                    JOIN opzones o ON s.opzone_id = o.id
                    JOIN regions r ON o.region_id = r.id
                    WHERE r.client_id = ?1),
                (SELECT COUNT(*) FROM posts p
                    JOIN sites s ON p.site_id = s.id
                    JOIN opzones o ON s.opzone_id = o.id
                    JOIN regions r ON o.region_id = r.id
                    WHERE r.client_id = ?1),
                (SELECT COUNT(DISTINCT esa.employee_id) FROM employee_site_assignments esa
                    JOIN sites s ON esa.site_id = s.id
                    JOIN opzones o ON s.opzone_id = o.id
                    JOIN regions r ON o.region_id = r.id
                    WHERE r.client_id = ?1),
                (SELECT COUNT(*) FROM incidents i
                    JOIN posts p ON i.post_id = p.id
                    JOIN sites s ON p.site_id = s.id
                    JOIN opzones o ON s.opzone_id = o.id
                    JOIN regions r ON o.region_id = r.id
                    WHERE r.client_id = ?1 AND i.status IN ('open', 'investigating'))",
            params![client_id],
            |r| {
                Ok(ClientStats {
                    client_name: client_name.clone(),
                    region_count: r.get(0)?,
                    site_count: r.get(1)?,
                    post_count: r.get(2)?,
                    employee_count: r.get(3)?,
                    open_incident_count: r.get(4)?,
                })
            },
        )?;
        Ok(Some(stats))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_fuzzy_client_match_is_substring_and_case_insensitive() {
        let store = test_store();
        let client = store.client_details("meridian").unwrap().unwrap();
        assert_eq!(client.name, "Meridian Hotels Group");
    }

    #[test]
    fn test_unmatched_client_yields_none() {
        let store = test_store();
        assert!(store.client_details("Acme Corp").unwrap().is_none());
    }

    #[test]
    fn test_client_hierarchy_tree() {
        let store = test_store();
        let tree = store.client_hierarchy("Vertex").unwrap().unwrap();
        assert_eq!(tree.client_name, "Vertex Industrial Parks");
        assert_eq!(tree.regions.len(), 1);
        assert_eq!(tree.regions[0].opzones[0].sites.len(), 1);
        assert_eq!(tree.regions[0].opzones[0].sites[0].post_count, 2);
    }

    #[test]
    fn test_client_stats_rollup() {
        let store = test_store();
        let stats = store.client_stats("Meridian").unwrap().unwrap();
        assert_eq!(stats.site_count, 2);
        assert_eq!(stats.post_count, 3);
        assert_eq!(stats.employee_count, 3);
    }
}

//! Security post lookups within a site.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::shifts::{map_shift_row, ShiftSummary, SHIFT_SELECT};
use crate::sites::resolve_site;
use crate::{like_pattern, StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub post_type: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetails {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub site_name: String,
    pub shift_count: i64,
    pub incident_count: i64,
}

/// Resolves a fuzzy post name within an already-resolved site.
fn resolve_post(
    conn: &Connection,
    site_id: i64,
    post_name: &str,
) -> Result<Option<(i64, String)>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM posts WHERE site_id = ?1 AND name LIKE ?2
             ORDER BY name LIMIT 1",
            params![site_id, like_pattern(post_name)],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?)
}

/// Outcome of a site + post lookup; the site can be missing independently
/// of the post.
pub enum PostLookup<T> {
    SiteNotFound,
    PostNotFound { site_name: String },
    Found(T),
}

impl WorkforceStore {
    /// Posts at a site. `None` when no site matches.
    pub fn posts_for_site(
        &self,
        site_name: &str,
    ) -> Result<Option<(String, Vec<PostSummary>)>, StoreError> {
        let conn = self.conn();
        let Some((site_id, resolved)) = resolve_site(&conn, site_name)? else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT id, name, code, post_type, description, is_active
             FROM posts WHERE site_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map(params![site_id], |r| {
            Ok(PostSummary {
                id: r.get(0)?,
                name: r.get(1)?,
                code: r.get(2)?,
                post_type: r.get(3)?,
                description: r.get(4)?,
                is_active: r.get(5)?,
            })
        })?;
        Ok(Some((resolved, rows.collect::<Result<_, _>>()?)))
    }

    /// One post at a site, with shift and incident counts.
    pub fn post_details(
        &self,
        site_name: &str,
        post_name: &str,
    ) -> Result<PostLookup<PostDetails>, StoreError> {
        let conn = self.conn();
        let Some((site_id, resolved_site)) = resolve_site(&conn, site_name)? else {
            return Ok(PostLookup::SiteNotFound);
        };
        let Some((post_id, _)) = resolve_post(&conn, site_id, post_name)? else {
            return Ok(PostLookup::PostNotFound { site_name: resolved_site });
        };

        let details = conn.query_row(
            "SELECT p.id, p.name, p.code, p.post_type, p.description, p.is_active, s.name,
                    (SELECT COUNT(*) FROM shifts sh WHERE sh.post_id = p.id),
                    (SELECT COUNT(*) FROM incidents i WHERE i.post_id = p.id)
             FROM posts p JOIN sites s ON p.site_id = s.id
             WHERE p.id = ?1",
            params![post_id],
            |r| {
                Ok(PostDetails {
                    summary: PostSummary {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        code: r.get(2)?,
                        post_type: r.get(3)?,
                        description: r.get(4)?,
                        is_active: r.get(5)?,
                    },
                    site_name: r.get(6)?,
                    shift_count: r.get(7)?,
                    incident_count: r.get(8)?,
                })
            },
        )?;
        Ok(PostLookup::Found(details))
    }

    /// Shift history at one post within the last `days` days.
    pub fn post_shift_history(
        &self,
        site_name: &str,
        post_name: &str,
        days: i64,
    ) -> Result<PostLookup<(String, Vec<ShiftSummary>)>, StoreError> {
        let conn = self.conn();
        let Some((site_id, resolved_site)) = resolve_site(&conn, site_name)? else {
            return Ok(PostLookup::SiteNotFound);
        };
        let Some((post_id, resolved_post)) = resolve_post(&conn, site_id, post_name)? else {
            return Ok(PostLookup::PostNotFound { site_name: resolved_site });
        };

        let mut stmt = conn.prepare(&format!(
            "{SHIFT_SELECT}
             WHERE sh.post_id = ?1 AND sh.shift_date >= date('now', '-' || ?2 || ' days')
             ORDER BY sh.shift_date DESC, sh.start_time"
        ))?;
        let rows = stmt.query_map(params![post_id, days], map_shift_row)?;
        Ok(PostLookup::Found((resolved_post, rows.collect::<Result<_, _>>()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::PostLookup;
    use crate::test_store;

    #[test]
    fn test_posts_for_site() {
        let store = test_store();
        let (resolved, posts) = store.posts_for_site("Tech Park").unwrap().unwrap();
        assert_eq!(resolved, "Vertex Tech Park One");
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_post_details_found() {
        let store = test_store();
        match store.post_details("Colaba", "main gate").unwrap() {
            PostLookup::Found(post) => {
                assert_eq!(post.summary.code, "MGC-P1");
                assert!(post.shift_count >= 2);
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn test_post_not_found_keeps_site() {
        let store = test_store();
        match store.post_details("Colaba", "Helipad").unwrap() {
            PostLookup::PostNotFound { site_name } => {
                assert_eq!(site_name, "Meridian Grand Colaba");
            }
            _ => panic!("expected post-not-found"),
        }
    }
}

//! Cross-entity keyword search.

use rusqlite::params;
use serde::Serialize;

use crate::{like_pattern, StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub detail: String,
}

/// Matches across clients, sites, posts, and employees for one keyword.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub clients: Vec<SearchHit>,
    pub sites: Vec<SearchHit>,
    pub posts: Vec<SearchHit>,
    pub employees: Vec<SearchHit>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.clients.len() + self.sites.len() + self.posts.len() + self.employees.len()
    }
}

impl WorkforceStore {
    /// Searches clients, sites, posts, and employees by name-ish fields.
    pub fn search_all(&self, keyword: &str) -> Result<SearchResults, StoreError> {
        let conn = self.conn();
        let pattern = like_pattern(keyword);

        let collect = |sql: &str| -> Result<Vec<SearchHit>, StoreError> {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params![pattern], |r| {
                Ok(SearchHit { id: r.get(0)?, name: r.get(1)?, detail: r.get(2)? })
            })?;
            Ok(rows.collect::<Result<_, _>>()?)
        };

        Ok(SearchResults {
            clients: collect(
                "SELECT id, name, code FROM clients
                 WHERE name LIKE ?1 OR code LIKE ?1 OR city LIKE ?1 ORDER BY name",
            )?,
            sites: collect(
                "SELECT id, name, code FROM sites
                 WHERE name LIKE ?1 OR code LIKE ?1 OR city LIKE ?1 ORDER BY name",
            )?,
            posts: collect(
                "SELECT p.id, p.name, s.name FROM posts p
                 JOIN sites s ON p.site_id = s.id
                 WHERE p.name LIKE ?1 OR p.code LIKE ?1 ORDER BY p.name",
            )?,
            employees: collect(
                "SELECT id, first_name || ' ' || last_name, employee_code FROM employees
                 WHERE first_name LIKE ?1 OR last_name LIKE ?1
                    OR (first_name || ' ' || last_name) LIKE ?1
                    OR employee_code LIKE ?1 ORDER BY first_name",
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_search_all_spans_entities() {
        let store = test_store();
        let results = store.search_all("meridian").unwrap();
        assert_eq!(results.clients.len(), 1);
        assert_eq!(results.sites.len(), 2);
        assert!(results.employees.is_empty());
        assert_eq!(results.total(), 3);
    }

    #[test]
    fn test_search_all_no_hits() {
        let store = test_store();
        assert_eq!(store.search_all("zzz-nothing").unwrap().total(), 0);
    }
}

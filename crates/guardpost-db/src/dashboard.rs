//! Aggregate counts for the overview dashboard.

use serde::Serialize;

use crate::{StoreError, WorkforceStore};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub active_clients: i64,
    pub total_sites: i64,
    pub active_sites: i64,
    pub total_employees: i64,
    pub active_employees: i64,
    pub total_posts: i64,
    pub open_incidents: i64,
}

impl WorkforceStore {
    /// Overall counts across the data model. Open incidents include those
    /// still under investigation.
    pub fn dashboard_stats(&self) -> Result<DashboardStats, StoreError> {
        let conn = self.conn();
        let count = |sql: &str| -> Result<i64, StoreError> {
            Ok(conn.query_row(sql, [], |r| r.get(0))?)
        };

        Ok(DashboardStats {
            total_clients: count("SELECT COUNT(*) FROM clients")?,
            active_clients: count("SELECT COUNT(*) FROM clients WHERE is_active = 1")?,
            total_sites: count("SELECT COUNT(*) FROM sites")?,
            active_sites: count("SELECT COUNT(*) FROM sites WHERE is_active = 1")?,
            total_employees: count("SELECT COUNT(*) FROM employees")?,
            active_employees: count("SELECT COUNT(*) FROM employees WHERE is_active = 1")?,
            total_posts: count("SELECT COUNT(*) FROM posts")?,
            open_incidents: count(
                "SELECT COUNT(*) FROM incidents WHERE status IN ('open', 'investigating')",
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_dashboard_stats_counts() {
        let store = test_store();
        let stats = store.dashboard_stats().unwrap();
        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.total_sites, 3);
        assert_eq!(stats.total_employees, 6);
        assert_eq!(stats.total_posts, 5);
        assert_eq!(stats.open_incidents, 2);
    }
}

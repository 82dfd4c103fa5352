//! Executes tool invocations against the workforce store.
//!
//! Every invocation resolves to a JSON string, success or failure: unknown
//! names, missing parameters, not-found lookups, and store errors all come
//! back as `{"error": ...}` objects the model can explain conversationally.
//! Nothing in here aborts the conversation.

use std::str::FromStr;
use std::sync::Arc;

use guardpost_db::{PostLookup, WorkforceStore};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::kind::ToolKind;
use crate::sql_guard::validate_select;

/// Lookback windows applied when the model omits a `days` argument.
#[derive(Debug, Clone, Copy)]
pub struct LookbackDefaults {
    pub incident_days: i64,
    pub shift_days: i64,
}

impl Default for LookbackDefaults {
    fn default() -> Self {
        Self { incident_days: 7, shift_days: 30 }
    }
}

/// Maps tool invocations by name onto store queries.
pub struct ToolDispatcher {
    store: Arc<WorkforceStore>,
    defaults: LookbackDefaults,
    allow_raw_sql: bool,
}

fn error(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

fn not_found(entity: &str, term: &str) -> Value {
    error(format!("No {entity} found matching \"{term}\""))
}

fn missing_param(name: &str) -> Value {
    error(format!("Missing required parameter: {name}"))
}

fn period_label(days: i64) -> String {
    format!("last {days} days")
}

fn str_arg(args: &Value, key: &str) -> Option<String> {
    args.get(key).and_then(Value::as_str).map(str::to_string)
}

fn i64_arg(args: &Value, key: &str) -> Option<i64> {
    args.get(key).and_then(Value::as_i64)
}

/// A negative lookback would build an invalid SQLite date modifier
/// (`'--5 days'`) and silently match nothing; fall back to the default.
fn days_arg(args: &Value, key: &str, default: i64) -> i64 {
    match i64_arg(args, key) {
        Some(days) if days >= 0 => days,
        _ => default,
    }
}

fn require_str(args: &Value, key: &str) -> Result<String, Value> {
    str_arg(args, key).ok_or_else(|| missing_param(key))
}

fn require_i64(args: &Value, key: &str) -> Result<i64, Value> {
    i64_arg(args, key).ok_or_else(|| missing_param(key))
}

impl ToolDispatcher {
    pub fn new(store: Arc<WorkforceStore>, defaults: LookbackDefaults, allow_raw_sql: bool) -> Self {
        Self { store, defaults, allow_raw_sql }
    }

    /// Runs one invocation and returns its result as a JSON string.
    ///
    /// Infallible by design: every failure mode is encoded in the payload.
    pub async fn dispatch(&self, name: &str, args: &Value) -> String {
        debug!(tool = name, "dispatching tool call");
        let result = match ToolKind::from_str(name) {
            Ok(kind) => self.execute(kind, args).unwrap_or_else(|e| e),
            Err(()) => {
                warn!(tool = name, "unknown tool requested");
                error(format!("Unknown function: {name}"))
            }
        };
        result.to_string()
    }

    /// `Err` carries an error envelope, not a failure; both sides serialize
    /// the same way.
    fn execute(&self, kind: ToolKind, args: &Value) -> Result<Value, Value> {
        match kind {
            ToolKind::GetDashboardStats => {
                let stats = self.query(self.store.dashboard_stats())?;
                Ok(json!(stats))
            }
            ToolKind::GetAllClients => {
                let clients = self.query(self.store.all_clients())?;
                Ok(json!({ "count": clients.len(), "clients": clients }))
            }
            ToolKind::GetAllSites => {
                let sites = self.query(self.store.all_sites())?;
                Ok(json!({ "count": sites.len(), "sites": sites }))
            }
            ToolKind::GetAllEmployees => {
                let employees = self.query(self.store.all_employees())?;
                Ok(json!({ "count": employees.len(), "employees": employees }))
            }
            ToolKind::GetClientDetails => {
                let name = require_str(args, "client_name")?;
                match self.query(self.store.client_details(&name))? {
                    Some(details) => Ok(json!(details)),
                    None => Err(not_found("client", &name)),
                }
            }
            ToolKind::GetClientHierarchy => {
                let name = require_str(args, "client_name")?;
                match self.query(self.store.client_hierarchy(&name))? {
                    Some(tree) => Ok(json!(tree)),
                    None => Err(not_found("client", &name)),
                }
            }
            ToolKind::GetClientStats => {
                let name = require_str(args, "client_name")?;
                match self.query(self.store.client_stats(&name))? {
                    Some(stats) => Ok(json!(stats)),
                    None => Err(not_found("client", &name)),
                }
            }
            ToolKind::GetSiteDetails => {
                let name = require_str(args, "site_name")?;
                match self.query(self.store.site_details(&name))? {
                    Some(details) => Ok(json!(details)),
                    None => Err(not_found("site", &name)),
                }
            }
            ToolKind::GetEmployeesAtSite => {
                let name = require_str(args, "site_name")?;
                match self.query(self.store.employees_at_site(&name))? {
                    Some((site, employees)) => Ok(json!({
                        "site": site,
                        "count": employees.len(),
                        "employees": employees,
                    })),
                    None => Err(not_found("site", &name)),
                }
            }
            ToolKind::GetSiteShifts => {
                let name = require_str(args, "site_name")?;
                let days = days_arg(args, "days", self.defaults.shift_days);
                match self.query(self.store.site_shifts(&name, days))? {
                    Some((site, shifts)) => Ok(json!({
                        "site": site,
                        "period": period_label(days),
                        "count": shifts.len(),
                        "shifts": shifts,
                    })),
                    None => Err(not_found("site", &name)),
                }
            }
            ToolKind::GetSiteIncidents => {
                let name = require_str(args, "site_name")?;
                let days = days_arg(args, "days", self.defaults.shift_days);
                let status = str_arg(args, "status");
                match self.query(self.store.site_incidents(&name, days, status.as_deref()))? {
                    Some((site, incidents)) => Ok(json!({
                        "site": site,
                        "period": period_label(days),
                        "count": incidents.len(),
                        "incidents": incidents,
                    })),
                    None => Err(not_found("site", &name)),
                }
            }
            ToolKind::GetPostsForSite => {
                let name = require_str(args, "site_name")?;
                match self.query(self.store.posts_for_site(&name))? {
                    Some((site, posts)) => Ok(json!({
                        "site": site,
                        "count": posts.len(),
                        "posts": posts,
                    })),
                    None => Err(not_found("site", &name)),
                }
            }
            ToolKind::GetPostDetails => {
                let site_name = require_str(args, "site_name")?;
                let post_name = require_str(args, "post_name")?;
                match self.query(self.store.post_details(&site_name, &post_name))? {
                    PostLookup::Found(details) => Ok(json!(details)),
                    PostLookup::SiteNotFound => Err(not_found("site", &site_name)),
                    PostLookup::PostNotFound { site_name: site } => {
                        Err(error(format!("No post found matching \"{post_name}\" at {site}")))
                    }
                }
            }
            ToolKind::GetPostShiftHistory => {
                let site_name = require_str(args, "site_name")?;
                let post_name = require_str(args, "post_name")?;
                let days = days_arg(args, "days", self.defaults.shift_days);
                match self.query(self.store.post_shift_history(&site_name, &post_name, days))? {
                    PostLookup::Found((post, shifts)) => Ok(json!({
                        "post": post,
                        "period": period_label(days),
                        "count": shifts.len(),
                        "shifts": shifts,
                    })),
                    PostLookup::SiteNotFound => Err(not_found("site", &site_name)),
                    PostLookup::PostNotFound { site_name: site } => {
                        Err(error(format!("No post found matching \"{post_name}\" at {site}")))
                    }
                }
            }
            ToolKind::SearchEmployee => {
                let term = require_str(args, "search_term")?;
                let employees = self.query(self.store.search_employees(&term))?;
                if employees.is_empty() {
                    return Err(not_found("employee", &term));
                }
                Ok(json!({ "count": employees.len(), "employees": employees }))
            }
            ToolKind::GetEmployeeDetails => {
                let term = require_str(args, "name_or_code")?;
                match self.query(self.store.employee_details(&term))? {
                    Some(details) => Ok(json!(details)),
                    None => Err(not_found("employee", &term)),
                }
            }
            ToolKind::GetEmployeeShifts => {
                let term = require_str(args, "name_or_code")?;
                let days = days_arg(args, "days", self.defaults.shift_days);
                match self.query(self.store.employee_shifts(&term, days))? {
                    Some((employee, shifts)) => Ok(json!({
                        "employee": employee,
                        "period": period_label(days),
                        "count": shifts.len(),
                        "shifts": shifts,
                    })),
                    None => Err(not_found("employee", &term)),
                }
            }
            ToolKind::GetEmployeeAttendance => {
                let term = require_str(args, "name_or_code")?;
                let days = days_arg(args, "days", self.defaults.shift_days);
                match self.query(self.store.employee_attendance(&term, days))? {
                    Some((employee, records)) => Ok(json!({
                        "employee": employee,
                        "period": period_label(days),
                        "count": records.len(),
                        "attendance": records,
                    })),
                    None => Err(not_found("employee", &term)),
                }
            }
            ToolKind::GetAllDesignations => {
                let designations = self.query(self.store.all_designations())?;
                Ok(json!({ "count": designations.len(), "designations": designations }))
            }
            ToolKind::GetEmployeesByDesignation => {
                let designation = require_str(args, "designation")?;
                let employees = self.query(self.store.employees_by_designation(&designation))?;
                if employees.is_empty() {
                    return Err(not_found("designation", &designation));
                }
                Ok(json!({
                    "designation": designation,
                    "count": employees.len(),
                    "employees": employees,
                }))
            }
            ToolKind::GetTodaysShifts => {
                let site = self.optional_site_filter(args)?;
                let shifts = self.query(self.store.todays_shifts(site.as_ref().map(|s| s.0)))?;
                let mut payload = json!({ "count": shifts.len(), "shifts": shifts });
                if let Some((_, name)) = site {
                    payload["site"] = json!(name);
                }
                Ok(payload)
            }
            ToolKind::GetCurrentShifts => {
                let site = self.optional_site_filter(args)?;
                let (now, shifts) =
                    self.query(self.store.current_shifts(site.as_ref().map(|s| s.0)))?;
                let mut payload = json!({
                    "currentTime": now,
                    "onDutyCount": shifts.len(),
                    "shifts": shifts,
                });
                if let Some((_, name)) = site {
                    payload["site"] = json!(name);
                }
                Ok(payload)
            }
            ToolKind::GetShiftsByDate => {
                let date = require_str(args, "date")?;
                let site = self.optional_site_filter(args)?;
                let shifts =
                    self.query(self.store.shifts_by_date(&date, site.as_ref().map(|s| s.0)))?;
                let mut payload = json!({ "date": date, "count": shifts.len(), "shifts": shifts });
                if let Some((_, name)) = site {
                    payload["site"] = json!(name);
                }
                Ok(payload)
            }
            ToolKind::GetShiftDetails => {
                let shift_id = require_i64(args, "shift_id")?;
                match self.query(self.store.shift_details(shift_id))? {
                    Some(details) => Ok(json!(details)),
                    None => Err(not_found("shift", &shift_id.to_string())),
                }
            }
            ToolKind::GetRecentIncidents => {
                let days = days_arg(args, "days", self.defaults.incident_days);
                let site = self.optional_site_filter(args)?;
                let incidents =
                    self.query(self.store.recent_incidents(days, site.as_ref().map(|s| s.0)))?;
                let mut payload = json!({
                    "period": period_label(days),
                    "count": incidents.len(),
                    "incidents": incidents,
                });
                if let Some((_, name)) = site {
                    payload["site"] = json!(name);
                }
                Ok(payload)
            }
            ToolKind::GetIncidentDetails => {
                let incident_id = require_i64(args, "incident_id")?;
                match self.query(self.store.incident_details(incident_id))? {
                    Some(details) => Ok(json!(details)),
                    None => Err(not_found("incident", &incident_id.to_string())),
                }
            }
            ToolKind::GetIncidentsByType => {
                let incident_type = require_str(args, "incident_type")?;
                let days = days_arg(args, "days", self.defaults.incident_days);
                let incidents = self.query(self.store.incidents_by_type(&incident_type, days))?;
                if incidents.is_empty() {
                    return Err(not_found("incident", &incident_type));
                }
                Ok(json!({
                    "period": period_label(days),
                    "count": incidents.len(),
                    "incidents": incidents,
                }))
            }
            ToolKind::SearchAll => {
                let keyword = require_str(args, "keyword")?;
                let results = self.query(self.store.search_all(&keyword))?;
                Ok(json!({
                    "keyword": keyword,
                    "totalMatches": results.total(),
                    "results": results,
                }))
            }
            ToolKind::ExecuteDatabaseQuery => self.execute_raw_sql(args),
        }
    }

    fn execute_raw_sql(&self, args: &Value) -> Result<Value, Value> {
        if !self.allow_raw_sql {
            return Err(error("Unknown function: execute_database_query"));
        }
        let sql = require_str(args, "sql_query")?;
        let explanation = require_str(args, "explanation")?;
        if let Err(reason) = validate_select(&sql) {
            warn!(query = %sql, "rejected raw SQL");
            return Err(json!({ "error": reason, "query": sql }));
        }
        match self.store.execute_select(&sql) {
            Ok((data, count)) => Ok(json!({
                "data": data,
                "count": count,
                "explanation": explanation,
            })),
            Err(e) => Err(json!({ "error": format!("Query failed: {e}"), "query": sql })),
        }
    }

    /// Resolves an optional `site_name` argument to a site id. A filter that
    /// matches nothing is an error, not an unfiltered query.
    fn optional_site_filter(&self, args: &Value) -> Result<Option<(i64, String)>, Value> {
        match str_arg(args, "site_name") {
            None => Ok(None),
            Some(name) => match self.query(self.store.resolve_site_name(&name))? {
                Some(resolved) => Ok(Some(resolved)),
                None => Err(not_found("site", &name)),
            },
        }
    }

    fn query<T>(&self, result: Result<T, guardpost_db::StoreError>) -> Result<T, Value> {
        result.map_err(|e| {
            warn!(error = %e, "store query failed");
            error(format!("Query failed: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher(allow_raw_sql: bool) -> ToolDispatcher {
        let store = WorkforceStore::open_in_memory().unwrap();
        store.seed_if_empty().unwrap();
        ToolDispatcher::new(Arc::new(store), LookbackDefaults::default(), allow_raw_sql)
    }

    #[tokio::test]
    async fn test_unknown_tool_names_the_function() {
        let d = dispatcher(false);
        let out = d.dispatch("launch_missiles", &json!({})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["error"], "Unknown function: launch_missiles");
    }

    #[tokio::test]
    async fn test_missing_required_parameter() {
        let d = dispatcher(false);
        let out = d.dispatch("get_client_details", &json!({})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["error"], "Missing required parameter: client_name");
    }

    #[tokio::test]
    async fn test_fuzzy_client_lookup_and_not_found() {
        let d = dispatcher(false);

        let out = d.dispatch("get_client_details", &json!({"client_name": "meridian"})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["name"], "Meridian Hotels Group");

        let out = d.dispatch("get_client_details", &json!({"client_name": "Acme Corp"})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["error"], "No client found matching \"Acme Corp\"");
    }

    #[tokio::test]
    async fn test_current_shifts_shape() {
        let d = dispatcher(false);
        let out = d.dispatch("get_current_shifts", &json!({})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert!(v["currentTime"].is_string());
        let on_duty = v["onDutyCount"].as_u64().unwrap();
        assert_eq!(on_duty as usize, v["shifts"].as_array().unwrap().len());
    }

    #[tokio::test]
    async fn test_repeat_dispatch_is_byte_identical() {
        let d = dispatcher(false);
        let args = json!({"site_name": "colaba"});
        let first = d.dispatch("get_posts_for_site", &args).await;
        let second = d.dispatch("get_posts_for_site", &args).await;
        assert_eq!(first, second);
        assert!(first.contains("Meridian Grand Colaba"));
    }

    #[tokio::test]
    async fn test_raw_sql_disabled_by_default() {
        let d = dispatcher(false);
        let out = d
            .dispatch(
                "execute_database_query",
                &json!({"sql_query": "SELECT 1", "explanation": "probe"}),
            )
            .await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["error"], "Unknown function: execute_database_query");
    }

    #[tokio::test]
    async fn test_raw_sql_guard_and_execution() {
        let d = dispatcher(true);

        let out = d
            .dispatch(
                "execute_database_query",
                &json!({"sql_query": "DROP TABLE employees", "explanation": "oops"}),
            )
            .await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["error"], "Only SELECT queries are allowed");
        assert_eq!(v["query"], "DROP TABLE employees");

        let out = d
            .dispatch(
                "execute_database_query",
                &json!({
                    "sql_query": "SELECT COUNT(*) AS n FROM employees",
                    "explanation": "headcount",
                }),
            )
            .await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["count"], 1);
        assert_eq!(v["data"][0]["n"], 6);
        assert_eq!(v["explanation"], "headcount");
    }

    #[tokio::test]
    async fn test_negative_days_falls_back_to_default() {
        let d = dispatcher(false);
        let out = d.dispatch("get_recent_incidents", &json!({"days": -5})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["period"], "last 7 days");
        assert_eq!(v["count"], 3);
    }

    #[tokio::test]
    async fn test_lookback_defaults_apply() {
        let d = dispatcher(false);
        let out = d.dispatch("get_recent_incidents", &json!({})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["period"], "last 7 days");
        assert_eq!(v["count"], 3);

        let out = d.dispatch("get_recent_incidents", &json!({"days": 30})).await;
        let v: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["count"], 4);
    }
}

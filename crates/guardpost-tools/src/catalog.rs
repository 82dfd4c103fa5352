//! Function declarations advertised to the model.
//!
//! One schema per [`ToolKind`](crate::ToolKind) variant. The fixed catalog is
//! the default surface; the raw-SQL catalog swaps every fixed entry for a
//! single free-form query tool and is only offered when explicitly enabled.

use guardpost_core::ToolSchema;
use serde_json::{json, Value};

fn tool(name: &str, description: &str, parameters: Value) -> ToolSchema {
    ToolSchema {
        name: name.to_string(),
        description: description.to_string(),
        parameters,
    }
}

fn no_params() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

fn site_name_param(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

/// The fixed-function catalog: every read path the workforce store exposes,
/// each with at most three scalar parameters.
pub fn fixed_catalog() -> Vec<ToolSchema> {
    vec![
        tool(
            "get_dashboard_stats",
            "Get overall statistics including total clients, sites, employees, posts, and open incidents",
            no_params(),
        ),
        tool(
            "get_all_clients",
            "Get a list of all clients with their basic information",
            no_params(),
        ),
        tool(
            "get_all_sites",
            "Get a list of all sites with their location and client information",
            no_params(),
        ),
        tool(
            "get_all_employees",
            "Get a list of all employees with their designation and contact information",
            no_params(),
        ),
        tool(
            "get_client_details",
            "Get detailed information about a specific client by name",
            json!({
                "type": "object",
                "properties": {
                    "client_name": {
                        "type": "string",
                        "description": "The name of the client to search for (partial match supported)"
                    }
                },
                "required": ["client_name"]
            }),
        ),
        tool(
            "get_client_hierarchy",
            "Get a client's full deployment tree: regions, operational zones, and sites",
            json!({
                "type": "object",
                "properties": {
                    "client_name": {
                        "type": "string",
                        "description": "The name of the client to search for (partial match supported)"
                    }
                },
                "required": ["client_name"]
            }),
        ),
        tool(
            "get_client_stats",
            "Get aggregate counts (sites, posts, employees, open incidents) for one client",
            json!({
                "type": "object",
                "properties": {
                    "client_name": {
                        "type": "string",
                        "description": "The name of the client to search for (partial match supported)"
                    }
                },
                "required": ["client_name"]
            }),
        ),
        tool(
            "get_site_details",
            "Get detailed information about a specific site by name",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site to search for (partial match supported)")
                },
                "required": ["site_name"]
            }),
        ),
        tool(
            "get_employees_at_site",
            "Get all employees currently assigned to a site",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site to search for (partial match supported)")
                },
                "required": ["site_name"]
            }),
        ),
        tool(
            "get_site_shifts",
            "Get recent shifts at a site, optionally limited to a number of past days",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site to search for (partial match supported)"),
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 30)"
                    }
                },
                "required": ["site_name"]
            }),
        ),
        tool(
            "get_site_incidents",
            "Get incidents reported at a site, optionally filtered by status and lookback window",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site to search for (partial match supported)"),
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 30)"
                    },
                    "status": {
                        "type": "string",
                        "description": "Optional status filter: open, investigating, resolved, or closed"
                    }
                },
                "required": ["site_name"]
            }),
        ),
        tool(
            "get_posts_for_site",
            "Get all security posts at a specific site",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site to get posts for (partial match supported)")
                },
                "required": ["site_name"]
            }),
        ),
        tool(
            "get_post_details",
            "Get detailed information about one security post at a site",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site the post belongs to (partial match supported)"),
                    "post_name": {
                        "type": "string",
                        "description": "The name of the post to search for (partial match supported)"
                    }
                },
                "required": ["site_name", "post_name"]
            }),
        ),
        tool(
            "get_post_shift_history",
            "Get the shift history for one security post",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("The name of the site the post belongs to (partial match supported)"),
                    "post_name": {
                        "type": "string",
                        "description": "The name of the post to search for (partial match supported)"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 30)"
                    }
                },
                "required": ["site_name", "post_name"]
            }),
        ),
        tool(
            "search_employee",
            "Search employees by name, employee code, or email",
            json!({
                "type": "object",
                "properties": {
                    "search_term": {
                        "type": "string",
                        "description": "Name, employee code, or email fragment to search for"
                    }
                },
                "required": ["search_term"]
            }),
        ),
        tool(
            "get_employee_details",
            "Get detailed information about an employee by name or employee code",
            json!({
                "type": "object",
                "properties": {
                    "name_or_code": {
                        "type": "string",
                        "description": "The employee name or employee code to search for"
                    }
                },
                "required": ["name_or_code"]
            }),
        ),
        tool(
            "get_employee_shifts",
            "Get an employee's recent shifts",
            json!({
                "type": "object",
                "properties": {
                    "name_or_code": {
                        "type": "string",
                        "description": "The employee name or employee code to search for"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 30)"
                    }
                },
                "required": ["name_or_code"]
            }),
        ),
        tool(
            "get_employee_attendance",
            "Get an employee's check-in and check-out records",
            json!({
                "type": "object",
                "properties": {
                    "name_or_code": {
                        "type": "string",
                        "description": "The employee name or employee code to search for"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 30)"
                    }
                },
                "required": ["name_or_code"]
            }),
        ),
        tool(
            "get_all_designations",
            "Get all designations (job roles) with the number of employees holding each",
            no_params(),
        ),
        tool(
            "get_employees_by_designation",
            "Get all employees holding a given designation",
            json!({
                "type": "object",
                "properties": {
                    "designation": {
                        "type": "string",
                        "description": "The designation name to search for (partial match supported)"
                    }
                },
                "required": ["designation"]
            }),
        ),
        tool(
            "get_todays_shifts",
            "Get all shifts scheduled for today, optionally filtered by site",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("Optional site name to filter shifts (partial match supported)")
                },
                "required": []
            }),
        ),
        tool(
            "get_current_shifts",
            "Get shifts that are currently in progress right now",
            json!({
                "type": "object",
                "properties": {
                    "site_name": site_name_param("Optional site name to filter shifts (partial match supported)")
                },
                "required": []
            }),
        ),
        tool(
            "get_shifts_by_date",
            "Get all shifts on a specific calendar date",
            json!({
                "type": "object",
                "properties": {
                    "date": {
                        "type": "string",
                        "description": "The date to look up, in YYYY-MM-DD format"
                    },
                    "site_name": site_name_param("Optional site name to filter shifts (partial match supported)")
                },
                "required": ["date"]
            }),
        ),
        tool(
            "get_shift_details",
            "Get detailed information about one shift, including attendance",
            json!({
                "type": "object",
                "properties": {
                    "shift_id": {
                        "type": "integer",
                        "description": "The numeric id of the shift"
                    }
                },
                "required": ["shift_id"]
            }),
        ),
        tool(
            "get_recent_incidents",
            "Get recent security incidents, optionally filtered by number of days and site",
            json!({
                "type": "object",
                "properties": {
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 7)"
                    },
                    "site_name": site_name_param("Optional site name to filter incidents (partial match supported)")
                },
                "required": []
            }),
        ),
        tool(
            "get_incident_details",
            "Get detailed information about one incident",
            json!({
                "type": "object",
                "properties": {
                    "incident_id": {
                        "type": "integer",
                        "description": "The numeric id of the incident"
                    }
                },
                "required": ["incident_id"]
            }),
        ),
        tool(
            "get_incidents_by_type",
            "Get incidents of a given type within a lookback window",
            json!({
                "type": "object",
                "properties": {
                    "incident_type": {
                        "type": "string",
                        "description": "The incident type to search for (partial match supported)"
                    },
                    "days": {
                        "type": "integer",
                        "description": "Number of days to look back (default: 7)"
                    }
                },
                "required": ["incident_type"]
            }),
        ),
        tool(
            "search_all",
            "Search clients, sites, posts, and employees by a single keyword",
            json!({
                "type": "object",
                "properties": {
                    "keyword": {
                        "type": "string",
                        "description": "The keyword to search for across all entities"
                    }
                },
                "required": ["keyword"]
            }),
        ),
    ]
}

/// The legacy single-query catalog. Offered only when raw SQL is explicitly
/// enabled; every statement still passes through the SELECT-only guard.
pub fn raw_sql_catalog() -> Vec<ToolSchema> {
    vec![tool(
        "execute_database_query",
        "Execute a read-only SQL SELECT query against the security operations database",
        json!({
            "type": "object",
            "properties": {
                "sql_query": {
                    "type": "string",
                    "description": "A single SQLite SELECT statement"
                },
                "explanation": {
                    "type": "string",
                    "description": "A short plain-language description of what the query retrieves"
                }
            },
            "required": ["sql_query", "explanation"]
        }),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToolKind;

    #[test]
    fn test_fixed_catalog_names_all_parse() {
        let catalog = fixed_catalog();
        assert_eq!(catalog.len(), 28);
        for schema in &catalog {
            assert!(
                schema.name.parse::<ToolKind>().is_ok(),
                "unmapped tool name: {}",
                schema.name
            );
        }
    }

    #[test]
    fn test_raw_sql_catalog_is_single_entry() {
        let catalog = raw_sql_catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name, "execute_database_query");
    }
}

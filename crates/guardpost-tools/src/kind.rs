//! The closed set of callable tools.
//!
//! Adding or removing a tool is a compile-time-checked change: the
//! dispatcher matches exhaustively on this enum, and the catalog lists one
//! schema per variant.

use std::str::FromStr;

/// Every operation the dispatcher can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetDashboardStats,
    GetAllClients,
    GetAllSites,
    GetAllEmployees,
    GetClientDetails,
    GetClientHierarchy,
    GetClientStats,
    GetSiteDetails,
    GetEmployeesAtSite,
    GetSiteShifts,
    GetSiteIncidents,
    GetPostsForSite,
    GetPostDetails,
    GetPostShiftHistory,
    SearchEmployee,
    GetEmployeeDetails,
    GetEmployeeShifts,
    GetEmployeeAttendance,
    GetAllDesignations,
    GetEmployeesByDesignation,
    GetTodaysShifts,
    GetCurrentShifts,
    GetShiftsByDate,
    GetShiftDetails,
    GetRecentIncidents,
    GetIncidentDetails,
    GetIncidentsByType,
    SearchAll,
    ExecuteDatabaseQuery,
}

impl FromStr for ToolKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "get_dashboard_stats" => Ok(Self::GetDashboardStats),
            "get_all_clients" => Ok(Self::GetAllClients),
            "get_all_sites" => Ok(Self::GetAllSites),
            "get_all_employees" => Ok(Self::GetAllEmployees),
            "get_client_details" => Ok(Self::GetClientDetails),
            "get_client_hierarchy" => Ok(Self::GetClientHierarchy),
            "get_client_stats" => Ok(Self::GetClientStats),
            "get_site_details" => Ok(Self::GetSiteDetails),
            "get_employees_at_site" => Ok(Self::GetEmployeesAtSite),
            "get_site_shifts" => Ok(Self::GetSiteShifts),
            "get_site_incidents" => Ok(Self::GetSiteIncidents),
            "get_posts_for_site" => Ok(Self::GetPostsForSite),
            "get_post_details" => Ok(Self::GetPostDetails),
            "get_post_shift_history" => Ok(Self::GetPostShiftHistory),
            "search_employee" => Ok(Self::SearchEmployee),
            "get_employee_details" => Ok(Self::GetEmployeeDetails),
            "get_employee_shifts" => Ok(Self::GetEmployeeShifts),
            "get_employee_attendance" => Ok(Self::GetEmployeeAttendance),
            "get_all_designations" => Ok(Self::GetAllDesignations),
            "get_employees_by_designation" => Ok(Self::GetEmployeesByDesignation),
            "get_todays_shifts" => Ok(Self::GetTodaysShifts),
            "get_current_shifts" => Ok(Self::GetCurrentShifts),
            "get_shifts_by_date" => Ok(Self::GetShiftsByDate),
            "get_shift_details" => Ok(Self::GetShiftDetails),
            "get_recent_incidents" => Ok(Self::GetRecentIncidents),
            "get_incident_details" => Ok(Self::GetIncidentDetails),
            "get_incidents_by_type" => Ok(Self::GetIncidentsByType),
            "search_all" => Ok(Self::SearchAll),
            "execute_database_query" => Ok(Self::ExecuteDatabaseQuery),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_parse() {
        assert_eq!("get_current_shifts".parse::<ToolKind>(), Ok(ToolKind::GetCurrentShifts));
        assert_eq!("search_all".parse::<ToolKind>(), Ok(ToolKind::SearchAll));
    }

    #[test]
    fn test_unknown_name_is_err() {
        assert!("delete_everything".parse::<ToolKind>().is_err());
    }
}

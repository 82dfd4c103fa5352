//! SELECT-only guard for the free-form query tool.
//!
//! A statement must start with `select` after trimming, and must not contain
//! any mutating keyword anywhere in its text. The substring check is
//! deliberately blunt; the raw-SQL tool is off by default and this guard is
//! the last line when it is on.

const FORBIDDEN_KEYWORDS: &[&str] = &[
    "drop", "delete", "truncate", "insert", "update", "alter", "create", "grant", "revoke",
    "execute", "exec",
];

/// Validates that `sql` is a SELECT statement free of mutating keywords.
pub fn validate_select(sql: &str) -> Result<(), String> {
    let normalized = sql.trim().to_lowercase();
    if !normalized.starts_with("select") {
        return Err("Only SELECT queries are allowed".to_string());
    }
    for keyword in FORBIDDEN_KEYWORDS {
        if normalized.contains(keyword) {
            return Err(format!("Forbidden keyword detected: {keyword}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_select_passes() {
        assert!(validate_select("SELECT * FROM employees").is_ok());
        assert!(validate_select("  select name from sites  ").is_ok());
    }

    #[test]
    fn test_non_select_rejected() {
        let err = validate_select("PRAGMA table_info(employees)").unwrap_err();
        assert_eq!(err, "Only SELECT queries are allowed");
    }

    #[test]
    fn test_forbidden_keyword_rejected_even_in_select() {
        let err = validate_select("SELECT 1; DROP TABLE employees").unwrap_err();
        assert_eq!(err, "Forbidden keyword detected: drop");
    }

    #[test]
    fn test_keyword_substring_rejected() {
        // Substring matching is intentional, even inside identifiers.
        let err = validate_select("SELECT last_update FROM sites").unwrap_err();
        assert_eq!(err, "Forbidden keyword detected: update");
    }

    #[test]
    fn test_case_insensitive() {
        assert!(validate_select("SeLeCt * FROM shifts WHERE DeLeTe_me = 1").is_err());
    }
}

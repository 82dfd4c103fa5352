//! Dynamic read-only SELECT execution for the raw-query tool variant.
//!
//! Statement text must already have passed the dispatcher's guard; this
//! module only converts rows to JSON with whatever columns the query names.

use rusqlite::types::ValueRef;
use serde_json::Value;

use crate::{StoreError, WorkforceStore};

fn value_ref_to_json(v: ValueRef<'_>) -> Value {
    match v {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(t) => Value::from(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::from(format!("<{} bytes>", b.len())),
    }
}

impl WorkforceStore {
    /// Runs a SELECT and returns each row as a JSON object keyed by column
    /// name, plus the row count.
    pub fn execute_select(&self, sql: &str) -> Result<(Vec<Value>, usize), StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut obj = serde_json::Map::with_capacity(columns.len());
            for (i, col) in columns.iter().enumerate() {
                obj.insert(col.clone(), value_ref_to_json(row.get_ref(i)?));
            }
            out.push(Value::Object(obj));
        }
        let count = out.len();
        Ok((out, count))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_store;

    #[test]
    fn test_execute_select_dynamic_columns() {
        let store = test_store();
        let (rows, count) = store
            .execute_select("SELECT name, code FROM clients ORDER BY name")
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(rows[0]["name"], "Meridian Hotels Group");
        assert_eq!(rows[0]["code"], "MHG");
    }

    #[test]
    fn test_execute_select_bad_sql_is_error() {
        let store = test_store();
        assert!(store.execute_select("SELECT bogus FROM nowhere").is_err());
    }
}

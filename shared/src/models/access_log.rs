//! Access log entries and the paged log query.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::employee::Employee;
use crate::util;

/// Outcome of a simulated access attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessStatus {
    #[serde(rename = "GRANTED")]
    Granted,
    #[serde(rename = "DENIED")]
    Denied,
    #[serde(rename = "NOT_REGISTERED")]
    NotRegistered,
}

/// Immutable audit record of one simulated access attempt.
///
/// `employee_name` and `internal_id` are denormalized on purpose: the log
/// must reflect the employee as they were at attempt time, not react to
/// later renames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogEntry {
    pub id: String,
    /// Attempt timestamp, epoch millis.
    pub at: i64,
    pub status: AccessStatus,
    /// The identifier presented at the (simulated) badge reader.
    pub internal_id: String,
    /// `None` when no employee matched the presented identifier.
    pub employee_id: Option<String>,
    pub employee_name: Option<String>,
}

impl AccessLogEntry {
    /// Build a log entry snapshot for an attempt.
    pub fn record(status: AccessStatus, internal_id: &str, employee: Option<&Employee>) -> Self {
        Self {
            id: util::new_id(),
            at: util::now_millis(),
            status,
            internal_id: internal_id.to_string(),
            employee_id: employee.map(|e| e.id.clone()),
            employee_name: employee.map(|e| e.full_name()),
        }
    }
}

/// Free-form key/value filters for the backend's paged log endpoint
/// (date range, department, internal id, page, size, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessLogQuery {
    #[serde(flatten)]
    params: BTreeMap<String, String>,
}

impl AccessLogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// One page of results, backend pagination shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// Zero-based page index.
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// Wrap an unpaged vector as a single page (cache fallback path).
    pub fn single(content: Vec<T>) -> Self {
        let total = content.len() as u64;
        let size = content.len() as u32;
        Self {
            content,
            total_elements: total,
            total_pages: 1,
            number: 0,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::employee::EmployeeCreate;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AccessStatus::NotRegistered).expect("serialize status"),
            "\"NOT_REGISTERED\""
        );
        assert_eq!(
            serde_json::to_string(&AccessStatus::Granted).expect("serialize status"),
            "\"GRANTED\""
        );
    }

    #[test]
    fn test_record_without_employee_has_null_ids() {
        let entry = AccessLogEntry::record(AccessStatus::NotRegistered, "GHOST", None);
        assert_eq!(entry.internal_id, "GHOST");
        assert!(entry.employee_id.is_none());
        assert!(entry.employee_name.is_none());
    }

    #[test]
    fn test_record_snapshots_employee_name() {
        let emp = Employee::from_create(EmployeeCreate {
            internal_id: "EMP-1".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            ..Default::default()
        });
        let entry = AccessLogEntry::record(AccessStatus::Granted, "EMP-1", Some(&emp));
        assert_eq!(entry.employee_id.as_deref(), Some(emp.id.as_str()));
        assert_eq!(entry.employee_name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_query_params_round_trip() {
        let q = AccessLogQuery::new()
            .with("department", "Quality")
            .with("page", 2);
        assert_eq!(q.get("department"), Some("Quality"));
        assert_eq!(q.params().count(), 2);
    }
}

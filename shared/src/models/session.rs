//! Employee presence sessions.

use serde::{Deserialize, Serialize};

use crate::models::employee::Employee;
use crate::util;

/// One presence interval for an employee.
///
/// Append-only audit record: created on start, mutated exactly once when
/// `ended_at` is set, never deleted. `employee_name` and `internal_id`
/// are snapshots taken at session start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSession {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub internal_id: String,
    /// Epoch millis.
    pub started_at: i64,
    /// Epoch millis; `None` while the session is open.
    pub ended_at: Option<i64>,
}

impl EmployeeSession {
    /// Open a new session for an employee, snapshotting identity fields.
    pub fn open(employee: &Employee) -> Self {
        Self {
            id: util::new_id(),
            employee_id: employee.id.clone(),
            employee_name: employee.full_name(),
            internal_id: employee.internal_id.clone(),
            started_at: util::now_millis(),
            ended_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// Pointer to the session currently using the self-service portal.
///
/// Distinct from the session record itself: the portal guard only needs a
/// quick "who is at the keyboard" lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    pub employee_id: String,
    pub session_id: String,
}

/// Admin-triggered session start payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    pub employee_id: String,
    pub internal_id: String,
    pub employee_name: String,
}

impl SessionStart {
    pub fn for_employee(employee: &Employee) -> Self {
        Self {
            employee_id: employee.id.clone(),
            internal_id: employee.internal_id.clone(),
            employee_name: employee.full_name(),
        }
    }
}

/// Wire response of the portal start endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalStartResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub resumed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<EmployeeSession>,
}

/// Resolved outcome of a portal (self-service) session start.
#[derive(Debug, Clone)]
pub struct PortalStart {
    /// True when an already-open session was resumed instead of creating
    /// a new record.
    pub resumed: bool,
    pub employee: Employee,
    /// The open session. May be absent on resume when the cache has the
    /// active pointer but lost the record itself (divergent cache).
    pub session: Option<EmployeeSession>,
    /// True when served by the local fallback instead of the backend.
    pub offline: bool,
}

//! Employee record and CRUD payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util;

/// Departments known to the admin panel.
pub const DEPARTMENTS: [&str; 4] = ["Production A", "Production B", "Quality", "R&D"];

/// Service period bounding an employee's eligibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePeriod {
    /// First day of service (no time component).
    pub start_date: Option<NaiveDate>,
    /// Last day of service, inclusive. `None` means open-ended.
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub contract_type: String,
    #[serde(default)]
    pub supervisor_name: String,
    #[serde(default)]
    pub supervisor_phone: String,
}

/// Employee record - identity plus access eligibility state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Opaque record id, generated at creation, immutable.
    pub id: String,
    /// Human-assigned identifier used for portal self-service login.
    /// Distinct from `id`; uniqueness is not enforced at write time.
    pub internal_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub service: ServicePeriod,
    /// Authoritative access gate, admin-controlled. Independent of the
    /// advisory eligibility check.
    #[serde(default)]
    pub has_room_access: bool,
    #[serde(default)]
    pub notes: String,
    pub created_at: i64,
}

impl Employee {
    /// Display name snapshotted into sessions and access logs.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Materialize a record from a create payload (local/offline path;
    /// the backend does the same server-side).
    pub fn from_create(data: EmployeeCreate) -> Self {
        Self {
            id: util::new_id(),
            internal_id: data.internal_id,
            first_name: data.first_name,
            last_name: data.last_name,
            document_id: data.document_id,
            phone: data.phone,
            email: data.email,
            department: data.department,
            job_title: data.job_title,
            shift: data.shift,
            service: data.service,
            has_room_access: data.has_room_access,
            notes: data.notes,
            created_at: util::now_millis(),
        }
    }

    /// Apply a partial update in place. `id` and `created_at` never change.
    pub fn apply(&mut self, patch: EmployeeUpdate) {
        if let Some(v) = patch.internal_id {
            self.internal_id = v;
        }
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.document_id {
            self.document_id = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.job_title {
            self.job_title = v;
        }
        if let Some(v) = patch.shift {
            self.shift = v;
        }
        if let Some(v) = patch.service {
            self.service = v;
        }
        if let Some(v) = patch.has_room_access {
            self.has_room_access = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
    }
}

/// Create employee payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub internal_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub service: ServicePeriod,
    /// New employees default to having access; admins revoke explicitly.
    #[serde(default = "default_has_room_access")]
    pub has_room_access: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_has_room_access() -> bool {
    true
}

impl Default for EmployeeCreate {
    fn default() -> Self {
        Self {
            internal_id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            document_id: String::new(),
            phone: String::new(),
            email: String::new(),
            department: DEPARTMENTS[0].to_string(),
            job_title: String::new(),
            shift: String::new(),
            service: ServicePeriod::default(),
            has_room_access: true,
            notes: String::new(),
        }
    }
}

/// Partial update payload. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub internal_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_id: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub shift: Option<String>,
    pub service: Option<ServicePeriod>,
    pub has_room_access: Option<bool>,
    pub notes: Option<String>,
}

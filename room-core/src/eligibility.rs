//! Access Decision Evaluator.
//!
//! Two distinct checks live here and must not be conflated:
//!
//! - `decide` is the authoritative gate: `has_room_access` alone decides
//!   GRANTED vs DENIED.
//! - `evaluate` is the advisory eligibility verification an admin runs
//!   before toggling the gate: required fields present plus an active
//!   service period. An employee can be GRANTED while ineligible.

use chrono::NaiveDate;

use shared::{AccessStatus, Employee};

/// Advisory eligibility verdict. `reasons` is empty iff `eligible`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

/// Labels of required fields that are missing or blank.
///
/// An employee missing any of these is incomplete and fails verification
/// regardless of `has_room_access`.
pub fn missing_required_fields(employee: &Employee) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if employee.document_id.trim().is_empty() {
        missing.push("document id");
    }
    if employee.internal_id.trim().is_empty() {
        missing.push("internal id");
    }
    if employee.first_name.trim().is_empty() {
        missing.push("first name");
    }
    if employee.last_name.trim().is_empty() {
        missing.push("last name");
    }
    if employee.department.trim().is_empty() {
        missing.push("department");
    }
    if employee.service.start_date.is_none() {
        missing.push("service start date");
    }
    missing
}

/// Whether the service period covers `today`:
/// `start_date <= today && (no end_date || today <= end_date)`.
pub fn service_active(employee: &Employee, today: NaiveDate) -> bool {
    let Some(start) = employee.service.start_date else {
        return false;
    };
    if start > today {
        return false;
    }
    match employee.service.end_date {
        Some(end) => today <= end,
        None => true,
    }
}

/// Full advisory verification with human-readable reasons.
pub fn evaluate(employee: &Employee, today: NaiveDate) -> Eligibility {
    let mut reasons = Vec::new();

    let missing = missing_required_fields(employee);
    if !missing.is_empty() {
        reasons.push(format!("Missing required fields: {}", missing.join(", ")));
    }
    if !service_active(employee, today) {
        reasons.push("Service period is not active (check start/end dates)".to_string());
    }

    Eligibility {
        eligible: reasons.is_empty(),
        reasons,
    }
}

/// Authoritative access decision for a registered employee.
pub fn decide(employee: &Employee) -> AccessStatus {
    if employee.has_room_access {
        AccessStatus::Granted
    } else {
        AccessStatus::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{EmployeeCreate, ServicePeriod};

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn complete_employee() -> Employee {
        Employee::from_create(EmployeeCreate {
            internal_id: "EMP-1".into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            document_id: "D-100".into(),
            department: "Quality".into(),
            service: ServicePeriod {
                start_date: Some(date("2024-01-01")),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_complete_employee_is_eligible() {
        let verdict = evaluate(&complete_employee(), date("2024-06-01"));
        assert!(verdict.eligible);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_missing_fields_fail_verification_despite_access_flag() {
        let mut emp = complete_employee();
        emp.document_id.clear();
        emp.has_room_access = true;

        let verdict = evaluate(&emp, date("2024-06-01"));
        assert!(!verdict.eligible);
        assert!(verdict.reasons[0].contains("document id"));
        // The gate is unaffected by the advisory check.
        assert_eq!(decide(&emp), AccessStatus::Granted);
    }

    #[test]
    fn test_future_start_date_is_inactive() {
        let mut emp = complete_employee();
        emp.service.start_date = Some(date("2030-01-01"));
        emp.has_room_access = true;

        let verdict = evaluate(&emp, date("2024-06-01"));
        assert!(!verdict.eligible);
        assert!(verdict.reasons.iter().any(|r| r.contains("not active")));
        assert_eq!(decide(&emp), AccessStatus::Granted);
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let mut emp = complete_employee();
        emp.service.end_date = Some(date("2024-06-01"));

        assert!(service_active(&emp, date("2024-06-01")));
        assert!(!service_active(&emp, date("2024-06-02")));
    }

    #[test]
    fn test_start_date_boundary() {
        let emp = complete_employee();
        assert!(service_active(&emp, date("2024-01-01")));
        assert!(!service_active(&emp, date("2023-12-31")));
    }

    #[test]
    fn test_no_start_date_is_inactive() {
        let mut emp = complete_employee();
        emp.service.start_date = None;
        assert!(!service_active(&emp, date("2024-06-01")));
    }

    #[test]
    fn test_decision_follows_access_flag() {
        let mut emp = complete_employee();
        emp.has_room_access = true;
        assert_eq!(decide(&emp), AccessStatus::Granted);
        emp.has_room_access = false;
        assert_eq!(decide(&emp), AccessStatus::Denied);
    }
}

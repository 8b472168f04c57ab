//! Session Lifecycle Manager.
//!
//! Per employee the lifecycle is NO_SESSION → OPEN → CLOSED; CLOSED is
//! terminal for a session instance and a new one may be opened later.
//! The manager owns session creation/closure and the active-portal
//! pointer; everything else only reads.
//!
//! The self-service and admin paths diverge on purpose:
//! - self-service start resumes an open session (idempotent re-entry)
//!   and moves the portal pointer;
//! - admin start refuses with `AlreadyOpen` and never touches the
//!   pointer, since the employee is not necessarily at the keyboard.

use std::sync::Arc;

use shared::{ActiveSession, EmployeeSession, PortalStart, SessionStart};

use crate::error::{CoreError, CoreResult};
use crate::store::cache::{keys, CacheStore};
use crate::store::{RoomStore, SessionOpened};

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn RoomStore>,
    cache: CacheStore,
}

impl SessionManager {
    pub fn new(store: Arc<dyn RoomStore>, cache: CacheStore) -> Self {
        Self { store, cache }
    }

    /// Who is currently using the self-service portal, if anyone.
    pub fn active(&self) -> CoreResult<Option<ActiveSession>> {
        Ok(self.cache.load(keys::SESSION_ACTIVE)?)
    }

    // ========== Self-service path ==========

    /// Portal login by internal id. Resuming an open session returns
    /// `resumed: true` without creating a second record.
    pub async fn start_self_service(&self, internal_id: &str) -> CoreResult<PortalStart> {
        let outcome = self.store.employee_start(internal_id).await?;

        if let Some(session) = &outcome.session {
            self.cache.save(
                keys::SESSION_ACTIVE,
                &ActiveSession {
                    employee_id: outcome.employee.id.clone(),
                    session_id: session.id.clone(),
                },
            )?;
        }

        tracing::info!(
            internal_id,
            resumed = outcome.resumed,
            offline = outcome.offline,
            "Portal session started"
        );
        Ok(outcome)
    }

    /// Portal logout. `Ok(false)` when no session is active - ending
    /// nothing is not an error on the self-service path.
    pub async fn end_self_service(&self) -> CoreResult<bool> {
        let Some(pointer) = self.active()? else {
            return Ok(false);
        };

        let employee = self
            .store
            .employees_list()
            .await?
            .into_iter()
            .find(|e| e.id == pointer.employee_id);
        let Some(employee) = employee else {
            // Divergent state: the pointed-at employee no longer exists.
            // Drop the stale pointer instead of leaving the portal stuck.
            tracing::warn!(
                employee_id = %pointer.employee_id,
                "Active session points at an unknown employee; clearing pointer"
            );
            self.cache.remove(keys::SESSION_ACTIVE)?;
            return Ok(false);
        };

        let ended = self.store.employee_end(&employee.internal_id).await?;
        self.cache.remove(keys::SESSION_ACTIVE)?;
        tracing::info!(internal_id = %employee.internal_id, ended, "Portal session ended");
        Ok(true)
    }

    // ========== Admin path ==========

    /// Deliberate admin start. Fails with `AlreadyOpen` when the
    /// employee already has an open session.
    pub async fn admin_start(&self, employee_id: &str) -> CoreResult<SessionOpened> {
        let employee = self
            .store
            .employees_list()
            .await?
            .into_iter()
            .find(|e| e.id == employee_id)
            .ok_or_else(|| CoreError::NotFound(format!("Employee {} not found", employee_id)))?;

        let opened = self
            .store
            .sessions_start(&SessionStart::for_employee(&employee))
            .await?;
        tracing::info!(
            employee_id,
            session_id = %opened.session.id,
            offline = opened.offline,
            "Session started by admin"
        );
        Ok(opened)
    }

    /// Close the open session for an employee. Fails with `NoOpen` when
    /// none exists. Clears the portal pointer only when it refers to the
    /// same employee.
    pub async fn admin_end(&self, employee_id: &str) -> CoreResult<bool> {
        let open = self
            .store
            .sessions_by_employee(employee_id)
            .await?
            .into_iter()
            .find(EmployeeSession::is_open)
            .ok_or_else(|| CoreError::NoOpen(format!("Employee {}", employee_id)))?;

        let ended = self.store.sessions_end(&open.id).await?;

        if let Some(pointer) = self.active()? {
            if pointer.employee_id == employee_id {
                self.cache.remove(keys::SESSION_ACTIVE)?;
            }
        }
        tracing::info!(employee_id, session_id = %open.id, "Session ended by admin");
        Ok(ended)
    }

    // ========== Queries ==========

    /// Session history for an employee, newest first.
    pub async fn sessions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<EmployeeSession>> {
        self.store.sessions_by_employee(employee_id).await
    }

    /// All currently open sessions.
    pub async fn sessions_active(&self) -> CoreResult<Vec<EmployeeSession>> {
        self.store.sessions_active().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::local::LocalStore;
    use shared::{Employee, EmployeeCreate};

    fn manager() -> (SessionManager, Arc<LocalStore>) {
        let cache = CacheStore::open_in_memory().expect("open cache");
        let local = Arc::new(LocalStore::new(cache.clone()));
        (SessionManager::new(local.clone(), cache), local)
    }

    async fn seed(local: &LocalStore, internal_id: &str) -> Employee {
        local
            .employee_create(EmployeeCreate {
                internal_id: internal_id.into(),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                ..Default::default()
            })
            .await
            .expect("seed employee")
    }

    #[tokio::test]
    async fn test_self_service_resume_keeps_single_session() {
        let (manager, local) = manager();
        let emp = seed(&local, "EMP-1").await;

        let first = manager.start_self_service("EMP-1").await.expect("start");
        assert!(!first.resumed);
        let second = manager
            .start_self_service("EMP-1")
            .await
            .expect("start again");
        assert!(second.resumed);

        let sessions = manager
            .sessions_by_employee(&emp.id)
            .await
            .expect("sessions");
        assert_eq!(sessions.len(), 1);
        assert!(manager.active().expect("pointer").is_some());
    }

    #[tokio::test]
    async fn test_admin_start_rejects_when_already_open() {
        let (manager, local) = manager();
        let emp = seed(&local, "EMP-1").await;

        manager.admin_start(&emp.id).await.expect("first start");
        let err = manager
            .admin_start(&emp.id)
            .await
            .expect_err("second start must be refused");
        assert!(matches!(err, CoreError::AlreadyOpen(_)));
    }

    #[tokio::test]
    async fn test_admin_start_unknown_employee_fails() {
        let (manager, _) = manager();
        let err = manager
            .admin_start("no-such-id")
            .await
            .expect_err("unknown employee");
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_admin_start_leaves_pointer_untouched() {
        let (manager, local) = manager();
        let portal_emp = seed(&local, "EMP-1").await;
        let other_emp = seed(&local, "EMP-2").await;

        manager.start_self_service("EMP-1").await.expect("portal");
        manager.admin_start(&other_emp.id).await.expect("admin");

        let pointer = manager.active().expect("pointer").expect("still set");
        assert_eq!(pointer.employee_id, portal_emp.id);
    }

    #[tokio::test]
    async fn test_admin_end_without_open_session_reports_no_open() {
        let (manager, local) = manager();
        let emp = seed(&local, "EMP-1").await;

        let err = manager
            .admin_end(&emp.id)
            .await
            .expect_err("nothing to end");
        assert!(matches!(err, CoreError::NoOpen(_)));
    }

    #[tokio::test]
    async fn test_admin_end_clears_pointer_only_for_same_employee() {
        let (manager, local) = manager();
        let portal_emp = seed(&local, "EMP-1").await;
        let other_emp = seed(&local, "EMP-2").await;

        manager.start_self_service("EMP-1").await.expect("portal");
        manager.admin_start(&other_emp.id).await.expect("admin");

        // Ending the other employee's session keeps the portal pointer.
        manager.admin_end(&other_emp.id).await.expect("end other");
        assert!(manager.active().expect("pointer").is_some());

        // Ending the portal employee's session clears it.
        manager.admin_end(&portal_emp.id).await.expect("end portal");
        assert!(manager.active().expect("pointer").is_none());
    }

    #[tokio::test]
    async fn test_end_self_service_without_active_session_is_false() {
        let (manager, _) = manager();
        assert!(!manager.end_self_service().await.expect("end"));
    }

    #[tokio::test]
    async fn test_end_self_service_closes_and_clears() {
        let (manager, local) = manager();
        let emp = seed(&local, "EMP-1").await;

        manager.start_self_service("EMP-1").await.expect("start");
        assert!(manager.end_self_service().await.expect("end"));
        assert!(manager.active().expect("pointer").is_none());

        let sessions = manager
            .sessions_by_employee(&emp.id)
            .await
            .expect("sessions");
        assert_eq!(sessions.len(), 1);
        assert!(!sessions[0].is_open());
    }

    #[tokio::test]
    async fn test_closed_session_history_is_unbounded() {
        let (manager, local) = manager();
        let emp = seed(&local, "EMP-1").await;

        for _ in 0..3 {
            manager.start_self_service("EMP-1").await.expect("start");
            manager.end_self_service().await.expect("end");
        }

        let sessions = manager
            .sessions_by_employee(&emp.id)
            .await
            .expect("sessions");
        assert_eq!(sessions.len(), 3);
        assert!(sessions.iter().all(|s| !s.is_open()));
    }
}

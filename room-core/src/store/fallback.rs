//! Remote-first store with local cache fallback.
//!
//! Decorator over two `RoomStore` implementations. Callers see a single
//! store; this layer decides when the cache substitutes for the backend:
//!
//! - reads fall back to the cache and successful remote payloads are
//!   mirrored into it, so the next offline call serves fresh data;
//! - session and simulation writes degrade to the local variant (results
//!   carry `offline: true`); reconciliation happens on the next
//!   successful remote read, never via retries;
//! - employee CRUD and admin login are remote-authoritative and never
//!   fall back.
//!
//! Only transport-level failures (`CoreError::Remote`) trigger the
//! fallback; domain errors from the backend are authoritative.

use std::sync::Arc;

use async_trait::async_trait;

use shared::{
    AccessLogEntry, AccessLogQuery, Employee, EmployeeCreate, EmployeeSession, EmployeeUpdate,
    LoginRequest, LoginResponse, Page, PortalStart, SessionStart,
};

use crate::error::{CoreError, CoreResult};
use crate::store::local::LocalStore;
use crate::store::{RoomStore, SessionOpened, Simulation};

pub struct FallbackStore {
    primary: Arc<dyn RoomStore>,
    local: LocalStore,
}

impl FallbackStore {
    pub fn new(primary: Arc<dyn RoomStore>, local: LocalStore) -> Self {
        Self { primary, local }
    }

    /// Mirror failures must not fail the operation that produced the
    /// data; the cache is best-effort.
    fn mirror(result: CoreResult<()>, what: &str) {
        if let Err(e) = result {
            tracing::warn!(error = %e, what, "Failed to mirror remote payload into cache");
        }
    }

    fn log_fallback(operation: &str, error: &CoreError) {
        tracing::warn!(error = %error, operation, "Remote unavailable, using local cache");
    }
}

#[async_trait]
impl RoomStore for FallbackStore {
    // ========== Auth ==========

    async fn admin_login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
        // No offline fallback: a login that cannot be verified fails.
        self.primary.admin_login(request).await
    }

    async fn set_token(&self, token: Option<String>) {
        self.primary.set_token(token).await;
    }

    // ========== Employees ==========

    async fn employees_list(&self) -> CoreResult<Vec<Employee>> {
        match self.primary.employees_list().await {
            Ok(list) => {
                Self::mirror(self.local.sync_employees(&list), "employees");
                Ok(list)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("employees_list", &e);
                self.local.employees_list().await
            }
            Err(e) => Err(e),
        }
    }

    async fn employee_create(&self, data: EmployeeCreate) -> CoreResult<Employee> {
        let employee = self.primary.employee_create(data).await?;
        Self::mirror(self.local.sync_employee_created(&employee), "employee");
        Ok(employee)
    }

    async fn employee_update(&self, id: &str, patch: EmployeeUpdate) -> CoreResult<Employee> {
        let employee = self.primary.employee_update(id, patch).await?;
        Self::mirror(self.local.sync_employee_updated(&employee), "employee");
        Ok(employee)
    }

    async fn employee_delete(&self, id: &str) -> CoreResult<bool> {
        let deleted = self.primary.employee_delete(id).await?;
        Self::mirror(self.local.sync_employee_deleted(id), "employee");
        Ok(deleted)
    }

    // ========== Access simulation ==========

    async fn simulate_access(&self, internal_id: &str) -> CoreResult<Simulation> {
        match self.primary.simulate_access(internal_id).await {
            Ok(sim) => {
                Self::mirror(self.local.record_access(&sim.log), "access log");
                Ok(sim)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("simulate_access", &e);
                self.local.simulate_access(internal_id).await
            }
            Err(e) => Err(e),
        }
    }

    async fn access_logs(&self, query: &AccessLogQuery) -> CoreResult<Page<AccessLogEntry>> {
        match self.primary.access_logs(query).await {
            Ok(page) => Ok(page),
            Err(e) if e.is_remote() => {
                Self::log_fallback("access_logs", &e);
                self.local.access_logs(query).await
            }
            Err(e) => Err(e),
        }
    }

    // ========== Sessions ==========

    async fn employee_start(&self, internal_id: &str) -> CoreResult<PortalStart> {
        match self.primary.employee_start(internal_id).await {
            Ok(outcome) => {
                if let Some(session) = &outcome.session {
                    Self::mirror(
                        self.local.sync_sessions(std::slice::from_ref(session)),
                        "session",
                    );
                }
                Ok(outcome)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("employee_start", &e);
                self.local.employee_start(internal_id).await
            }
            Err(e) => Err(e),
        }
    }

    async fn employee_end(&self, internal_id: &str) -> CoreResult<bool> {
        match self.primary.employee_end(internal_id).await {
            Ok(ended) => {
                // Best-effort: close the mirrored record too so offline
                // reads agree with the backend.
                if let Err(e) = self.local.employee_end(internal_id).await {
                    tracing::debug!(error = %e, "Cache had no session to mirror-close");
                }
                Ok(ended)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("employee_end", &e);
                self.local.employee_end(internal_id).await
            }
            Err(e) => Err(e),
        }
    }

    async fn sessions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<EmployeeSession>> {
        match self.primary.sessions_by_employee(employee_id).await {
            Ok(sessions) => {
                Self::mirror(self.local.sync_sessions(&sessions), "sessions");
                Ok(sessions)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("sessions_by_employee", &e);
                self.local.sessions_by_employee(employee_id).await
            }
            Err(e) => Err(e),
        }
    }

    async fn sessions_active(&self) -> CoreResult<Vec<EmployeeSession>> {
        match self.primary.sessions_active().await {
            Ok(sessions) => {
                Self::mirror(self.local.sync_sessions(&sessions), "sessions");
                Ok(sessions)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("sessions_active", &e);
                self.local.sessions_active().await
            }
            Err(e) => Err(e),
        }
    }

    async fn sessions_start(&self, data: &SessionStart) -> CoreResult<SessionOpened> {
        match self.primary.sessions_start(data).await {
            Ok(opened) => {
                Self::mirror(
                    self.local.sync_sessions(std::slice::from_ref(&opened.session)),
                    "session",
                );
                Ok(opened)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("sessions_start", &e);
                self.local.sessions_start(data).await
            }
            Err(e) => Err(e),
        }
    }

    async fn sessions_end(&self, session_id: &str) -> CoreResult<bool> {
        match self.primary.sessions_end(session_id).await {
            Ok(ended) => {
                if let Err(e) = self.local.sessions_end(session_id).await {
                    tracing::debug!(error = %e, "Cache had no session to mirror-close");
                }
                Ok(ended)
            }
            Err(e) if e.is_remote() => {
                Self::log_fallback("sessions_end", &e);
                self.local.sessions_end(session_id).await
            }
            Err(e) => Err(e),
        }
    }
}

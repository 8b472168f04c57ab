//! Session/Log Repository - dual-path persistence.
//!
//! One trait, three implementations: `RemoteStore` talks to the backend,
//! `LocalStore` serves the redb cache with the same lifecycle contract,
//! and `FallbackStore` composes them remote-first so callers never
//! branch on online vs offline.

pub mod cache;
pub mod fallback;
pub mod local;
pub mod remote;

use async_trait::async_trait;

use shared::{
    AccessLogEntry, AccessLogQuery, AccessStatus, Employee, EmployeeCreate, EmployeeSession,
    EmployeeUpdate, LoginRequest, LoginResponse, Page, PortalStart, SessionStart,
};

use crate::error::CoreResult;

/// Outcome of one simulated access attempt.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub status: AccessStatus,
    pub log: AccessLogEntry,
    /// True when the decision was computed against the local cache.
    pub offline: bool,
}

/// Outcome of an admin-triggered session start.
#[derive(Debug, Clone)]
pub struct SessionOpened {
    pub session: EmployeeSession,
    /// True when the record was created in the local cache only.
    pub offline: bool,
}

/// The full request/response surface the core needs from its store.
///
/// Mirrors the backend API one-to-one; every method executes as one
/// atomic unit of work against the underlying store.
#[async_trait]
pub trait RoomStore: Send + Sync {
    // ========== Auth ==========

    /// Authenticate an admin. Has no offline meaning; implementations
    /// without a backend must fail.
    async fn admin_login(&self, request: &LoginRequest) -> CoreResult<LoginResponse>;

    /// Attach (or clear) the bearer token used for subsequent calls.
    async fn set_token(&self, token: Option<String>);

    // ========== Employees ==========

    async fn employees_list(&self) -> CoreResult<Vec<Employee>>;
    async fn employee_create(&self, data: EmployeeCreate) -> CoreResult<Employee>;
    async fn employee_update(&self, id: &str, patch: EmployeeUpdate) -> CoreResult<Employee>;
    async fn employee_delete(&self, id: &str) -> CoreResult<bool>;

    // ========== Access simulation ==========

    /// Evaluate a badge presentation for `internal_id` and append the
    /// resulting log entry (newest first).
    async fn simulate_access(&self, internal_id: &str) -> CoreResult<Simulation>;

    /// Paged, filtered audit log.
    async fn access_logs(&self, query: &AccessLogQuery) -> CoreResult<Page<AccessLogEntry>>;

    // ========== Sessions ==========

    /// Self-service portal start: resumes the open session when one
    /// exists for the resolved employee, otherwise opens a new one.
    async fn employee_start(&self, internal_id: &str) -> CoreResult<PortalStart>;

    /// Self-service portal end. `Ok(false)` when nothing was open.
    async fn employee_end(&self, internal_id: &str) -> CoreResult<bool>;

    /// Sessions for one employee, newest first.
    async fn sessions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<EmployeeSession>>;

    /// All currently open sessions.
    async fn sessions_active(&self) -> CoreResult<Vec<EmployeeSession>>;

    /// Admin session start. Fails with `AlreadyOpen` when the employee
    /// already has an open session; never resumes.
    async fn sessions_start(&self, data: &SessionStart) -> CoreResult<SessionOpened>;

    /// Close a session by id. Closing is monotonic: a closed session is
    /// never reopened and `ended_at` is never rewritten.
    async fn sessions_end(&self, session_id: &str) -> CoreResult<bool>;
}

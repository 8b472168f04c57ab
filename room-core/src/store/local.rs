//! Cache-backed store.
//!
//! Serves and mutates the redb cache with the same lifecycle contract as
//! the backend: idempotent portal resume, `AlreadyOpen` on admin start,
//! monotonic close, prepend-only audit log. Used standalone in tests and
//! as the degraded path behind `FallbackStore`.

use async_trait::async_trait;

use shared::{
    AccessLogEntry, AccessLogQuery, AccessStatus, ActiveSession, Employee, EmployeeCreate,
    EmployeeSession, EmployeeUpdate, LoginRequest, LoginResponse, Page, PortalStart, SessionStart,
    util,
};

use crate::error::{CoreError, CoreResult};
use crate::store::cache::{keys, CacheStore};
use crate::store::{RoomStore, SessionOpened, Simulation};

#[derive(Clone)]
pub struct LocalStore {
    cache: CacheStore,
}

impl LocalStore {
    pub fn new(cache: CacheStore) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    // ========== Cache accessors ==========

    fn employees(&self) -> CoreResult<Vec<Employee>> {
        Ok(self.cache.load_or_default(keys::EMPLOYEES)?)
    }

    fn save_employees(&self, list: &[Employee]) -> CoreResult<()> {
        Ok(self.cache.save(keys::EMPLOYEES, &list)?)
    }

    fn sessions(&self) -> CoreResult<Vec<EmployeeSession>> {
        Ok(self.cache.load_or_default(keys::SESSIONS)?)
    }

    fn save_sessions(&self, list: &[EmployeeSession]) -> CoreResult<()> {
        Ok(self.cache.save(keys::SESSIONS, &list)?)
    }

    fn logs(&self) -> CoreResult<Vec<AccessLogEntry>> {
        Ok(self.cache.load_or_default(keys::ACCESS_LOGS)?)
    }

    fn active_pointer(&self) -> CoreResult<Option<ActiveSession>> {
        Ok(self.cache.load(keys::SESSION_ACTIVE)?)
    }

    fn set_active_pointer(&self, pointer: &ActiveSession) -> CoreResult<()> {
        Ok(self.cache.save(keys::SESSION_ACTIVE, pointer)?)
    }

    fn clear_active_pointer(&self) -> CoreResult<()> {
        Ok(self.cache.remove(keys::SESSION_ACTIVE)?)
    }

    /// Resolve an employee by internal id. First match in storage order
    /// wins; duplicates are tolerated but logged.
    fn find_by_internal_id(&self, internal_id: &str) -> CoreResult<Option<Employee>> {
        let employees = self.employees()?;
        let matches = employees
            .iter()
            .filter(|e| e.internal_id == internal_id)
            .count();
        if matches > 1 {
            tracing::warn!(
                internal_id,
                matches,
                "Multiple employees share an internal id; using first match"
            );
        }
        Ok(employees.into_iter().find(|e| e.internal_id == internal_id))
    }

    fn find_open_session(&self, employee_id: &str) -> CoreResult<Option<EmployeeSession>> {
        Ok(self
            .sessions()?
            .into_iter()
            .find(|s| s.employee_id == employee_id && s.is_open()))
    }

    // ========== Mirror helpers (used by FallbackStore) ==========

    /// Replace the cached employee list with a fresh remote payload.
    pub(crate) fn sync_employees(&self, list: &[Employee]) -> CoreResult<()> {
        self.save_employees(list)
    }

    pub(crate) fn sync_employee_created(&self, employee: &Employee) -> CoreResult<()> {
        let mut employees = self.employees()?;
        employees.insert(0, employee.clone());
        self.save_employees(&employees)
    }

    pub(crate) fn sync_employee_updated(&self, employee: &Employee) -> CoreResult<()> {
        let mut employees = self.employees()?;
        match employees.iter_mut().find(|e| e.id == employee.id) {
            Some(slot) => *slot = employee.clone(),
            None => employees.insert(0, employee.clone()),
        }
        self.save_employees(&employees)
    }

    pub(crate) fn sync_employee_deleted(&self, id: &str) -> CoreResult<()> {
        let employees: Vec<Employee> =
            self.employees()?.into_iter().filter(|e| e.id != id).collect();
        self.save_employees(&employees)
    }

    /// Upsert remote session records into the cached list, newest first.
    pub(crate) fn sync_sessions(&self, fetched: &[EmployeeSession]) -> CoreResult<()> {
        let mut sessions = self.sessions()?;
        for session in fetched {
            match sessions.iter_mut().find(|s| s.id == session.id) {
                Some(slot) => *slot = session.clone(),
                None => sessions.push(session.clone()),
            }
        }
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        self.save_sessions(&sessions)
    }

    // ========== Local audit append ==========

    /// Prepend an entry to the cached access log. The log never shrinks;
    /// existing entries are never replaced.
    pub fn record_access(&self, entry: &AccessLogEntry) -> CoreResult<()> {
        let mut logs = self.logs()?;
        logs.insert(0, entry.clone());
        Ok(self.cache.save(keys::ACCESS_LOGS, &logs)?)
    }
}

#[async_trait]
impl RoomStore for LocalStore {
    // ========== Auth ==========

    async fn admin_login(&self, _request: &LoginRequest) -> CoreResult<LoginResponse> {
        // No offline meaning: credentials are only known to the backend.
        Err(CoreError::Remote(
            "admin login requires the backend".to_string(),
        ))
    }

    async fn set_token(&self, _token: Option<String>) {}

    // ========== Employees ==========

    async fn employees_list(&self) -> CoreResult<Vec<Employee>> {
        self.employees()
    }

    async fn employee_create(&self, data: EmployeeCreate) -> CoreResult<Employee> {
        let employee = Employee::from_create(data);
        self.sync_employee_created(&employee)?;
        Ok(employee)
    }

    async fn employee_update(&self, id: &str, patch: EmployeeUpdate) -> CoreResult<Employee> {
        let mut employees = self.employees()?;
        let slot = employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("Employee {} not found", id)))?;
        slot.apply(patch);
        let updated = slot.clone();
        self.save_employees(&employees)?;
        Ok(updated)
    }

    async fn employee_delete(&self, id: &str) -> CoreResult<bool> {
        let employees = self.employees()?;
        if !employees.iter().any(|e| e.id == id) {
            return Err(CoreError::NotFound(format!("Employee {} not found", id)));
        }
        self.sync_employee_deleted(id)?;
        Ok(true)
    }

    // ========== Access simulation ==========

    async fn simulate_access(&self, internal_id: &str) -> CoreResult<Simulation> {
        let employee = self.find_by_internal_id(internal_id)?;

        // has_room_access is the authoritative gate; the eligibility
        // check is a separate advisory action.
        let status = match &employee {
            Some(e) if e.has_room_access => AccessStatus::Granted,
            Some(_) => AccessStatus::Denied,
            None => AccessStatus::NotRegistered,
        };

        let log = AccessLogEntry::record(status, internal_id, employee.as_ref());
        self.record_access(&log)?;
        Ok(Simulation {
            status,
            log,
            offline: true,
        })
    }

    async fn access_logs(&self, query: &AccessLogQuery) -> CoreResult<Page<AccessLogEntry>> {
        // Best-effort filtering over the cached entries; paging and date
        // ranges are left to the backend.
        let logs = self
            .logs()?
            .into_iter()
            .filter(|entry| {
                query
                    .get("internalId")
                    .is_none_or(|v| entry.internal_id == v)
            })
            .collect();
        Ok(Page::single(logs))
    }

    // ========== Sessions ==========

    async fn employee_start(&self, internal_id: &str) -> CoreResult<PortalStart> {
        let employee = self
            .find_by_internal_id(internal_id)?
            .ok_or_else(|| CoreError::NotFound(internal_id.to_string()))?;

        // Idempotent resume: re-entry must not create a duplicate open
        // session, whether we know about it via the pointer or the list.
        if let Some(open) = self.find_open_session(&employee.id)? {
            self.set_active_pointer(&ActiveSession {
                employee_id: employee.id.clone(),
                session_id: open.id.clone(),
            })?;
            return Ok(PortalStart {
                resumed: true,
                employee,
                session: Some(open),
                offline: true,
            });
        }
        if let Some(pointer) = self.active_pointer()? {
            if pointer.employee_id == employee.id {
                // Pointer survived but the record did not (divergent
                // cache); still a resume, with no record to hand back.
                return Ok(PortalStart {
                    resumed: true,
                    employee,
                    session: None,
                    offline: true,
                });
            }
        }

        let session = EmployeeSession::open(&employee);
        let mut sessions = self.sessions()?;
        sessions.insert(0, session.clone());
        self.save_sessions(&sessions)?;
        self.set_active_pointer(&ActiveSession {
            employee_id: employee.id.clone(),
            session_id: session.id.clone(),
        })?;

        tracing::info!(internal_id, session_id = %session.id, "Portal session opened (offline)");
        Ok(PortalStart {
            resumed: false,
            employee,
            session: Some(session),
            offline: true,
        })
    }

    async fn employee_end(&self, internal_id: &str) -> CoreResult<bool> {
        let employee = self
            .find_by_internal_id(internal_id)?
            .ok_or_else(|| CoreError::NotFound(internal_id.to_string()))?;

        let mut sessions = self.sessions()?;
        let closed = match sessions
            .iter_mut()
            .find(|s| s.employee_id == employee.id && s.is_open())
        {
            Some(open) => {
                open.ended_at = Some(util::now_millis());
                true
            }
            None => false,
        };
        if closed {
            self.save_sessions(&sessions)?;
        }

        if let Some(pointer) = self.active_pointer()? {
            if pointer.employee_id == employee.id {
                self.clear_active_pointer()?;
            }
        }
        Ok(closed)
    }

    async fn sessions_by_employee(&self, employee_id: &str) -> CoreResult<Vec<EmployeeSession>> {
        let mut sessions: Vec<EmployeeSession> = self
            .sessions()?
            .into_iter()
            .filter(|s| s.employee_id == employee_id)
            .collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(sessions)
    }

    async fn sessions_active(&self) -> CoreResult<Vec<EmployeeSession>> {
        Ok(self.sessions()?.into_iter().filter(|s| s.is_open()).collect())
    }

    async fn sessions_start(&self, data: &SessionStart) -> CoreResult<SessionOpened> {
        // Admin start is deliberate: an existing open session is an
        // error, never a resume.
        if self.find_open_session(&data.employee_id)?.is_some() {
            return Err(CoreError::AlreadyOpen(data.employee_id.clone()));
        }

        let session = EmployeeSession {
            id: util::new_id(),
            employee_id: data.employee_id.clone(),
            employee_name: data.employee_name.clone(),
            internal_id: data.internal_id.clone(),
            started_at: util::now_millis(),
            ended_at: None,
        };
        let mut sessions = self.sessions()?;
        sessions.insert(0, session.clone());
        self.save_sessions(&sessions)?;

        // The admin is not necessarily the employee at the keyboard, so
        // the active portal pointer stays untouched.
        Ok(SessionOpened {
            session,
            offline: true,
        })
    }

    async fn sessions_end(&self, session_id: &str) -> CoreResult<bool> {
        let mut sessions = self.sessions()?;
        match sessions.iter_mut().find(|s| s.id == session_id) {
            Some(session) if session.is_open() => {
                session.ended_at = Some(util::now_millis());
                self.save_sessions(&sessions)?;
                Ok(true)
            }
            // ended_at is immutable once set.
            Some(_) => Err(CoreError::NoOpen(format!(
                "Session {} already closed",
                session_id
            ))),
            None => Err(CoreError::NoOpen(format!(
                "Session {} not found",
                session_id
            ))),
        }
    }
}

//! Auth Gateway.
//!
//! Admin credentials are only ever checked by the backend; the gateway
//! keeps the resulting bearer token and identity in the cache so a
//! restarted panel can restore its session without re-prompting. The
//! self-service portal side authenticates by internal id through the
//! session manager and never passes through here.

use std::sync::Arc;

use shared::{AdminSession, LoginRequest};

use crate::error::{CoreError, CoreResult};
use crate::store::cache::{keys, CacheStore};
use crate::store::RoomStore;

#[derive(Clone)]
pub struct AuthGateway {
    store: Arc<dyn RoomStore>,
    cache: CacheStore,
}

impl AuthGateway {
    pub fn new(store: Arc<dyn RoomStore>, cache: CacheStore) -> Self {
        Self { store, cache }
    }

    /// Authenticate against the backend and persist the session.
    ///
    /// There is no offline admin login: with the backend unreachable this
    /// fails with `CoreError::Remote`.
    pub async fn login(&self, username: &str, password: &str) -> CoreResult<AdminSession> {
        let response = self
            .store
            .admin_login(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        if !response.user.is_admin() {
            return Err(CoreError::InvalidCredentials(format!(
                "Role {} is not permitted",
                response.user.role
            )));
        }

        self.cache.save(keys::ADMIN_TOKEN, &response.token)?;
        self.cache.save(keys::ADMIN_SESSION, &response.user)?;
        self.store.set_token(Some(response.token)).await;

        tracing::info!(username, "Admin logged in");
        Ok(response.user)
    }

    /// Re-attach a previously persisted session, if any. Returns the
    /// restored identity; the token is handed back to the store.
    pub async fn restore(&self) -> CoreResult<Option<AdminSession>> {
        let token: Option<String> = self.cache.load(keys::ADMIN_TOKEN)?;
        let session: Option<AdminSession> = self.cache.load(keys::ADMIN_SESSION)?;

        match (token, session) {
            (Some(token), Some(session)) => {
                self.store.set_token(Some(token)).await;
                tracing::info!(username = %session.username, "Admin session restored");
                Ok(Some(session))
            }
            _ => Ok(None),
        }
    }

    /// Currently persisted admin identity, without touching the store.
    pub fn session(&self) -> CoreResult<Option<AdminSession>> {
        Ok(self.cache.load(keys::ADMIN_SESSION)?)
    }

    /// Drop the persisted session and detach the token.
    pub async fn logout(&self) -> CoreResult<()> {
        self.cache.remove(keys::ADMIN_TOKEN)?;
        self.cache.remove(keys::ADMIN_SESSION)?;
        self.store.set_token(None).await;
        tracing::info!("Admin logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{SessionOpened, Simulation};
    use async_trait::async_trait;
    use shared::{
        AccessLogEntry, AccessLogQuery, Employee, EmployeeCreate, EmployeeSession, EmployeeUpdate,
        LoginResponse, Page, PortalStart, SessionStart, ADMIN_ROLE,
    };
    use tokio::sync::Mutex;

    /// Backend stub that accepts one credential pair and records the
    /// token handed back through `set_token`.
    struct StubBackend {
        role: &'static str,
        token_seen: Mutex<Option<Option<String>>>,
    }

    impl StubBackend {
        fn new(role: &'static str) -> Self {
            Self {
                role,
                token_seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl RoomStore for StubBackend {
        async fn admin_login(&self, request: &LoginRequest) -> CoreResult<LoginResponse> {
            if request.username == "admin" && request.password == "secret" {
                Ok(LoginResponse {
                    token: "tok-123".into(),
                    user: AdminSession {
                        username: request.username.clone(),
                        role: self.role.into(),
                    },
                })
            } else {
                Err(CoreError::InvalidCredentials("Bad credentials".into()))
            }
        }

        async fn set_token(&self, token: Option<String>) {
            *self.token_seen.lock().await = Some(token);
        }

        async fn employees_list(&self) -> CoreResult<Vec<Employee>> {
            Ok(Vec::new())
        }
        async fn employee_create(&self, _data: EmployeeCreate) -> CoreResult<Employee> {
            unimplemented!("not exercised")
        }
        async fn employee_update(&self, _id: &str, _patch: EmployeeUpdate) -> CoreResult<Employee> {
            unimplemented!("not exercised")
        }
        async fn employee_delete(&self, _id: &str) -> CoreResult<bool> {
            unimplemented!("not exercised")
        }
        async fn simulate_access(&self, _internal_id: &str) -> CoreResult<Simulation> {
            unimplemented!("not exercised")
        }
        async fn access_logs(&self, _query: &AccessLogQuery) -> CoreResult<Page<AccessLogEntry>> {
            unimplemented!("not exercised")
        }
        async fn employee_start(&self, _internal_id: &str) -> CoreResult<PortalStart> {
            unimplemented!("not exercised")
        }
        async fn employee_end(&self, _internal_id: &str) -> CoreResult<bool> {
            unimplemented!("not exercised")
        }
        async fn sessions_by_employee(
            &self,
            _employee_id: &str,
        ) -> CoreResult<Vec<EmployeeSession>> {
            unimplemented!("not exercised")
        }
        async fn sessions_active(&self) -> CoreResult<Vec<EmployeeSession>> {
            unimplemented!("not exercised")
        }
        async fn sessions_start(&self, _data: &SessionStart) -> CoreResult<SessionOpened> {
            unimplemented!("not exercised")
        }
        async fn sessions_end(&self, _session_id: &str) -> CoreResult<bool> {
            unimplemented!("not exercised")
        }
    }

    fn gateway(role: &'static str) -> (AuthGateway, Arc<StubBackend>) {
        let backend = Arc::new(StubBackend::new(role));
        let cache = CacheStore::open_in_memory().expect("open cache");
        (AuthGateway::new(backend.clone(), cache), backend)
    }

    #[tokio::test]
    async fn test_login_persists_session_and_sets_token() {
        let (gateway, backend) = gateway(ADMIN_ROLE);

        let session = gateway.login("admin", "secret").await.expect("login");
        assert!(session.is_admin());
        assert_eq!(
            *backend.token_seen.lock().await,
            Some(Some("tok-123".into()))
        );
        assert!(gateway.session().expect("session").is_some());
    }

    #[tokio::test]
    async fn test_bad_credentials_leave_no_session() {
        let (gateway, _) = gateway(ADMIN_ROLE);

        let err = gateway
            .login("admin", "wrong")
            .await
            .expect_err("must be rejected");
        assert!(matches!(err, CoreError::InvalidCredentials(_)));
        assert!(gateway.session().expect("session").is_none());
    }

    #[tokio::test]
    async fn test_non_admin_role_is_rejected() {
        let (gateway, _) = gateway("viewer");

        let err = gateway
            .login("admin", "secret")
            .await
            .expect_err("role must be checked");
        assert!(matches!(err, CoreError::InvalidCredentials(_)));
        assert!(gateway.session().expect("session").is_none());
    }

    #[tokio::test]
    async fn test_restore_reattaches_token() {
        let (gateway, backend) = gateway(ADMIN_ROLE);
        gateway.login("admin", "secret").await.expect("login");
        *backend.token_seen.lock().await = None;

        let restored = gateway.restore().await.expect("restore");
        assert_eq!(restored.expect("present").username, "admin");
        assert_eq!(
            *backend.token_seen.lock().await,
            Some(Some("tok-123".into()))
        );
    }

    #[tokio::test]
    async fn test_restore_without_persisted_session_is_none() {
        let (gateway, _) = gateway(ADMIN_ROLE);
        assert!(gateway.restore().await.expect("restore").is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (gateway, backend) = gateway(ADMIN_ROLE);
        gateway.login("admin", "secret").await.expect("login");

        gateway.logout().await.expect("logout");
        assert!(gateway.session().expect("session").is_none());
        assert_eq!(*backend.token_seen.lock().await, Some(None));
        assert!(gateway.restore().await.expect("restore").is_none());
    }
}

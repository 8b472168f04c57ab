//! Top-level assembly.
//!
//! `RoomCore` wires the store stack (remote over local cache) and hands
//! out the service facades. Construct it once at startup and clone the
//! facades freely; they all share the same store.

use std::sync::Arc;

use crate::auth::AuthGateway;
use crate::config::CoreConfig;
use crate::directory::EmployeeDirectory;
use crate::error::CoreResult;
use crate::session::SessionManager;
use crate::simulator::AccessSimulator;
use crate::store::cache::CacheStore;
use crate::store::fallback::FallbackStore;
use crate::store::local::LocalStore;
use crate::store::remote::RemoteStore;
use crate::store::RoomStore;

pub struct RoomCore {
    pub auth: AuthGateway,
    pub directory: EmployeeDirectory,
    pub sessions: SessionManager,
    pub simulator: AccessSimulator,
    store: Arc<dyn RoomStore>,
}

impl RoomCore {
    /// Build the full remote-first stack from configuration.
    pub async fn connect(config: &CoreConfig) -> CoreResult<Self> {
        let cache = CacheStore::open(&config.cache_path)?;
        let local = LocalStore::new(cache.clone());
        let remote = Arc::new(RemoteStore::new(config)?);
        let store: Arc<dyn RoomStore> =
            Arc::new(FallbackStore::new(remote, local.clone()));

        if let Some(token) = &config.token {
            store.set_token(Some(token.clone())).await;
        }

        tracing::info!(base_url = %config.base_url, "Core connected");
        Ok(Self::assemble(store, local, cache))
    }

    /// Build a cache-only stack, never touching the network. Intended
    /// for tests and fully offline deployments.
    pub fn offline(cache: CacheStore) -> Self {
        let local = LocalStore::new(cache.clone());
        let store: Arc<dyn RoomStore> = Arc::new(local.clone());
        Self::assemble(store, local, cache)
    }

    fn assemble(store: Arc<dyn RoomStore>, local: LocalStore, cache: CacheStore) -> Self {
        Self {
            auth: AuthGateway::new(store.clone(), cache.clone()),
            directory: EmployeeDirectory::new(store.clone()),
            sessions: SessionManager::new(store.clone(), cache),
            simulator: AccessSimulator::new(store.clone(), local),
            store,
        }
    }

    /// Direct access to the underlying store for callers that need it.
    pub fn store(&self) -> Arc<dyn RoomStore> {
        self.store.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EmployeeCreate;

    #[tokio::test]
    async fn test_offline_core_serves_all_facades() {
        let core = RoomCore::offline(CacheStore::open_in_memory().expect("open cache"));

        let emp = core
            .directory
            .create(EmployeeCreate {
                internal_id: "EMP-1".into(),
                first_name: "Grace".into(),
                last_name: "Hopper".into(),
                ..Default::default()
            })
            .await
            .expect("create");

        let portal = core
            .sessions
            .start_self_service("EMP-1")
            .await
            .expect("portal start");
        assert_eq!(portal.employee.id, emp.id);

        let sim = core
            .simulator
            .simulate_for_employee(&emp.id)
            .await
            .expect("simulate");
        assert!(sim.offline);
    }
}

//! Employee Directory.
//!
//! CRUD over employee records plus identifier resolution. The directory
//! is the sole owner of employee mutations; every other component reads.

use std::sync::Arc;

use shared::{Employee, EmployeeCreate, EmployeeUpdate};

use crate::error::{CoreError, CoreResult};
use crate::store::RoomStore;

#[derive(Clone)]
pub struct EmployeeDirectory {
    store: Arc<dyn RoomStore>,
}

impl EmployeeDirectory {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> CoreResult<Vec<Employee>> {
        self.store.employees_list().await
    }

    /// Resolve by opaque record id.
    pub async fn get(&self, id: &str) -> CoreResult<Employee> {
        self.store
            .employees_list()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("Employee {} not found", id)))
    }

    /// Resolve by human-assigned internal id. Uniqueness is not enforced
    /// at write time; first match in storage order wins.
    pub async fn find_by_internal_id(&self, internal_id: &str) -> CoreResult<Option<Employee>> {
        let employees = self.store.employees_list().await?;
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

    pub async fn create(&self, data: EmployeeCreate) -> CoreResult<Employee> {
        let employee = self.store.employee_create(data).await?;
        tracing::info!(id = %employee.id, internal_id = %employee.internal_id, "Employee created");
        Ok(employee)
    }

    pub async fn update(&self, id: &str, patch: EmployeeUpdate) -> CoreResult<Employee> {
        self.store.employee_update(id, patch).await
    }

    /// Toggle the authoritative access gate.
    pub async fn set_room_access(&self, id: &str, enabled: bool) -> CoreResult<Employee> {
        let employee = self
            .store
            .employee_update(
                id,
                EmployeeUpdate {
                    has_room_access: Some(enabled),
                    ..Default::default()
                },
            )
            .await?;
        tracing::info!(id, enabled, "Room access flag changed");
        Ok(employee)
    }

    pub async fn delete(&self, id: &str) -> CoreResult<bool> {
        self.store.employee_delete(id).await
    }

    /// Import pre-parsed rows (CSV parsing happens upstream). Rows are
    /// created one by one; the first failure aborts the remainder.
    pub async fn bulk_import(&self, rows: Vec<EmployeeCreate>) -> CoreResult<Vec<Employee>> {
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            created.push(self.store.employee_create(row).await?);
        }
        tracing::info!(count = created.len(), "Bulk import finished");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::cache::CacheStore;
    use crate::store::local::LocalStore;

    fn directory() -> EmployeeDirectory {
        let local = LocalStore::new(CacheStore::open_in_memory().expect("open cache"));
        EmployeeDirectory::new(Arc::new(local))
    }

    fn row(internal_id: &str) -> EmployeeCreate {
        EmployeeCreate {
            internal_id: internal_id.into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_resolve_by_internal_id() {
        let directory = directory();
        let created = directory.create(row("EMP-1")).await.expect("create");

        let found = directory
            .find_by_internal_id("EMP-1")
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(found.id, created.id);

        assert!(directory
            .find_by_internal_id("GHOST")
            .await
            .expect("lookup")
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_internal_ids_resolve_first_match() {
        let directory = directory();
        // Not rejected at write time, by contract.
        directory.create(row("EMP-1")).await.expect("create first");
        let second = directory.create(row("EMP-1")).await.expect("create dup");

        let found = directory
            .find_by_internal_id("EMP-1")
            .await
            .expect("lookup")
            .expect("present");
        // LocalStore prepends, so the newest record is the first match.
        assert_eq!(found.id, second.id);
    }

    #[tokio::test]
    async fn test_set_room_access_patches_only_the_flag() {
        let directory = directory();
        let created = directory.create(row("EMP-1")).await.expect("create");
        assert!(created.has_room_access);

        let updated = directory
            .set_room_access(&created.id, false)
            .await
            .expect("patch");
        assert!(!updated.has_room_access);
        assert_eq!(updated.first_name, "Grace");
    }

    #[tokio::test]
    async fn test_bulk_import_creates_all_rows() {
        let directory = directory();
        let created = directory
            .bulk_import(vec![row("EMP-1"), row("EMP-2"), row("EMP-3")])
            .await
            .expect("import");
        assert_eq!(created.len(), 3);
        assert_eq!(directory.list().await.expect("list").len(), 3);
    }
}

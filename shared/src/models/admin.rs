//! Admin authentication DTOs.

use serde::{Deserialize, Serialize};

/// The single privileged role this system defines.
pub const ADMIN_ROLE: &str = "admin_room_911";

/// Ephemeral admin session, established on successful login.
///
/// Not an audit record: it lives in memory and the cache only as long as
/// the admin stays logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub username: String,
    pub role: String,
}

impl AdminSession {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Admin login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Admin login response: opaque bearer token plus the admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminSession,
}

//! Shared domain models and DTOs for the ROOM_911 access core.
//!
//! Everything that crosses the wire to the backend or lands in the local
//! cache lives here, so the core and any frontend agree on one shape.

pub mod models;
pub mod util;

pub use models::access_log::{AccessLogEntry, AccessLogQuery, AccessStatus, Page};
pub use models::admin::{AdminSession, LoginRequest, LoginResponse, ADMIN_ROLE};
pub use models::employee::{Employee, EmployeeCreate, EmployeeUpdate, ServicePeriod, DEPARTMENTS};
pub use models::session::{
    ActiveSession, EmployeeSession, PortalStart, PortalStartResponse, SessionStart,
};

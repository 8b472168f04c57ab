//! ROOM_911 access core.
//!
//! Session and access-decision engine for a single secured room:
//! employee directory, access simulation with an append-only audit log,
//! presence-session lifecycle, and admin/employee authentication, all on
//! top of a remote-first store that degrades to a local cache when the
//! backend is unreachable.
//!
//! The UI layer (forms, tables, exports) is a consumer of this crate and
//! contributes no logic of its own.

pub mod auth;
pub mod config;
pub mod core;
pub mod directory;
pub mod eligibility;
pub mod error;
pub mod session;
pub mod simulator;
pub mod store;

pub use auth::AuthGateway;
pub use config::CoreConfig;
pub use crate::core::RoomCore;
pub use directory::EmployeeDirectory;
pub use eligibility::Eligibility;
pub use error::{CoreError, CoreResult};
pub use session::SessionManager;
pub use simulator::AccessSimulator;
pub use store::{
    cache::CacheStore, fallback::FallbackStore, local::LocalStore, remote::RemoteStore,
    RoomStore, SessionOpened, Simulation,
};

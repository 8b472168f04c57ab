//! Domain models.
//!
//! Wire shapes follow the backend's camelCase JSON; timestamps are epoch
//! milliseconds, service dates are plain `yyyy-mm-dd` calendar dates.

pub mod access_log;
pub mod admin;
pub mod employee;
pub mod session;

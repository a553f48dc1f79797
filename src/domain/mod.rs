//! Domain entities exchanged with the employee backend.

pub mod password;
pub mod profile;
pub mod types;

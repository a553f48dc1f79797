//! DTOs and helpers that turn profile data into display values.

pub mod files;
pub mod labels;
pub mod profile;

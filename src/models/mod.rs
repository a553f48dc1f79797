//! Configuration and wire models.

pub mod config;
pub mod wire;

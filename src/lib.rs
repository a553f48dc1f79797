//! Client library for the HR settings panels: loading, editing and saving an
//! employee profile, and changing the signed-in user's password.

pub mod domain;
pub mod dto;
mod error_conversions;
pub mod forms;
pub mod models;
pub mod repository;
pub mod services;

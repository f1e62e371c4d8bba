//! # SCIM Config
//!
//! Configuration management for the SCIM user directory client.
//! Supports layered configuration from files and environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;

//! # SCIM Core
//!
//! Core types shared by every crate of the SCIM user directory client:
//! the unified error type, result aliases and logging initialisation.

pub mod error;
pub mod result;
pub mod telemetry;

pub use error::*;
pub use result::*;
pub use telemetry::*;

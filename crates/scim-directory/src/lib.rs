//! # SCIM Directory
//!
//! Translates between the flat, flag-based [`UserEntity`] used by resource
//! managers and the SCIM wire representation ([`ScimUser`]), and exposes the
//! user lifecycle through [`UsersApi`].

pub mod mapping;
pub mod model;
pub mod users;

pub use model::*;
pub use users::*;

//! # SCIM Transport
//!
//! The transport seam consumed by the directory client: an object-safe
//! [`ScimTransport`] trait, typed call helpers on top of it, the per-client
//! [`RequestContext`], and a reqwest-based [`HttpScimTransport`].

mod context;
mod http;
mod request;
mod transport;

pub use context::*;
pub use http::*;
pub use request::*;
pub use transport::*;

pub use reqwest::Method;

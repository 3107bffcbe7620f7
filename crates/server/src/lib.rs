//! HTTP surface of the Planet Express dispatch service.
//!
//! Exposed as a library so integration tests can drive the router in-process.

pub mod api;
pub mod metrics;
pub mod state;
pub mod traffic;

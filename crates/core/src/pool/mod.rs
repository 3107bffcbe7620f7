//! Fixed-size pools of scarce, named resources (crew members and ships).
//!
//! Every resource carries its own mutex. A claim scans the pool in insertion
//! order and only ever `try_lock`s, so concurrent claimers never wait on one
//! another and claims/releases on different resources run in parallel.

mod resource_pool;
mod types;

pub use resource_pool::ResourcePool;
pub use types::{PoolError, Resource, ResourceKind, ResourceSpec};

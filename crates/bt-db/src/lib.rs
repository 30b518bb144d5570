//! Database layer for Bug Tracker RS
//!
//! One repository per entity, all backed by a shared [`pool::Database`].
//! Every statement binds user input as parameters; partial updates build
//! their SET clause from the fields actually present in the payload.

pub mod bugs;
pub mod members;
pub mod patch;
pub mod pool;
pub mod projects;
pub mod repository;
pub mod users;

pub use patch::Patch;
pub use pool::{Database, PoolConfig};
pub use repository::{RepositoryError, RepositoryResult};

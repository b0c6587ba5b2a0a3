//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod repositories;
pub mod transaction;

pub use repositories::{SubTaskRepository, TodoRepository, UserRepository};
pub use transaction::{TransactionManager, TransactionScope};

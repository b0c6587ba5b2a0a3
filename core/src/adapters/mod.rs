//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;

pub use postgres::{
    connect, PostgresSession, PostgresSubTaskRepository, PostgresTodoRepository,
    PostgresTransactionManager, PostgresTransactionScope, PostgresUserRepository,
};

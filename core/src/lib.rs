//! Todo core
//!
//! Task-management backend core: users own todos, todos own subtasks.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.
//!
//! - `domain`: entities, port traits and cross-entity rules
//! - `app`: use cases, each run inside one transaction scope
//! - `adapters`: SeaORM/PostgreSQL implementations of the ports

pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod entity;
pub mod error;
pub mod telemetry;

#[cfg(test)]
mod test_utils;


pub use config::Config;
pub use error::{DomainError, ErrorKind};

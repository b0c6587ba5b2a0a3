//! Test utilities
//!
//! Manual in-memory port implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - The repositories have to share one store so a transaction scope can roll
//!   back writes made through any of them
//! - mockall has lifetime issues with traits containing `&str` parameters
//! - We control exactly what they return without macro magic

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

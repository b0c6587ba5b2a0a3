//! SeaORM table models
//!
//! Enum columns (status, priority, role) are stored as their lowercase text
//! form and parsed back in the postgres adapters.

pub mod subtasks;
pub mod todos;
pub mod users;

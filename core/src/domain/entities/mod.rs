//! Domain entities
//!
//! Pure domain models. These are separate from the SeaORM table models in the
//! `entity` module and carry no knowledge of storage.

pub mod subtask;
pub mod todo;
pub mod user;

pub use subtask::{NewSubTask, SubTask, SubTaskId};
pub use todo::{NewTodo, Todo, TodoId, TodoPriority, TodoRecord, TodoStatus};
pub use user::{NewUser, User, UserId, UserRole};

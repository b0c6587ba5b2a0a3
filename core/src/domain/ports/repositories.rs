//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Implementations run their queries on whatever transaction scope is open on
//! their session, and wrap storage failures into `DomainError::Connection` or
//! `DomainError::DataOperation` exactly once.

use async_trait::async_trait;

use crate::domain::entities::{
    NewSubTask, NewTodo, NewUser, SubTask, Todo, TodoId, TodoPriority, TodoStatus, User, UserId,
};
use crate::error::DomainError;

/// Repository for Todo entities
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Persist a new todo (status `pending`); returns it with id and timestamps
    async fn create(&self, todo: &NewTodo) -> Result<Todo, DomainError>;

    /// Persist the current state of an existing todo
    async fn update(&self, todo: &Todo) -> Result<Todo, DomainError>;

    /// Find a todo by ID
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, DomainError>;

    /// Find a page of a user's todos, optionally filtered, ordered by id
    async fn find_with_pagination(
        &self,
        user_id: &UserId,
        skip: u64,
        limit: u64,
        status: Option<TodoStatus>,
        priority: Option<TodoPriority>,
    ) -> Result<Vec<Todo>, DomainError>;

    /// Delete a todo and its subtasks. Returns false if it did not exist.
    async fn delete(&self, id: &TodoId) -> Result<bool, DomainError>;

    /// Delete every todo owned by a user; returns the number removed
    async fn delete_all_by_user_id(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Check if a todo exists
    async fn exists(&self, id: &TodoId) -> Result<bool, DomainError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Persist the current state of an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// All users, ordered by id
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Delete a user. Returns false if it did not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Check if a user exists
    async fn exists(&self, id: &UserId) -> Result<bool, DomainError>;
}

/// Repository for SubTask entities
#[async_trait]
pub trait SubTaskRepository: Send + Sync {
    /// Create a new subtask (incomplete)
    async fn create(&self, subtask: &NewSubTask) -> Result<SubTask, DomainError>;

    /// Subtasks of a todo, ordered by id
    async fn find_by_todo_id(&self, todo_id: &TodoId) -> Result<Vec<SubTask>, DomainError>;
}

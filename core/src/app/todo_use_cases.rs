//! Todo use cases
//!
//! Each use case runs inside one transaction scope: validations first
//! (existence, then ownership, then business rules), then entity mutation
//! through the todo's own methods, then a single repository write.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::{NewTodo, SubTask, Todo, TodoId, TodoPriority, TodoStatus, UserId};
use crate::domain::ports::{SubTaskRepository, TodoRepository, TransactionManager, UserRepository};
use crate::domain::services::{find_owned_todo, validate_pagination, validate_user_exists};
use crate::error::DomainError;

use super::transaction::commit_or_rollback;

/// Fields a caller may change on a todo. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// A todo together with its subtasks
#[derive(Debug, Clone, Serialize)]
pub struct TodoWithSubTasks {
    pub todo: Todo,
    pub subtasks: Vec<SubTask>,
}

// ============================================================================
// CreateTodo
// ============================================================================

pub struct CreateTodoUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    todos: Arc<TR>,
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<TR, UR, TM> CreateTodoUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(todos: Arc<TR>, users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            todos,
            users,
            transactions,
        }
    }

    /// Create a pending todo for an existing user. Priority defaults to medium.
    pub async fn execute(
        &self,
        user_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
        due_date: Option<DateTime<Utc>>,
        priority: Option<TodoPriority>,
    ) -> Result<Todo, DomainError> {
        let new_todo = NewTodo::new(user_id, title)
            .with_description(description)
            .with_due_date(due_date)
            .with_priority(priority.unwrap_or_default());

        let scope = self.transactions.begin().await?;
        let result = self.create(&new_todo).await;
        commit_or_rollback(scope, result).await
    }

    async fn create(&self, new_todo: &NewTodo) -> Result<Todo, DomainError> {
        validate_user_exists(self.users.as_ref(), &new_todo.user_id).await?;

        let todo = self.todos.create(new_todo).await?;
        tracing::info!(todo_id = %todo.id(), user_id = %todo.user_id(), "Created todo");
        Ok(todo)
    }
}

// ============================================================================
// UpdateTodo
// ============================================================================

pub struct UpdateTodoUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    todos: Arc<TR>,
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<TR, UR, TM> UpdateTodoUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(todos: Arc<TR>, users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            todos,
            users,
            transactions,
        }
    }

    /// Apply `changes` to a todo owned by `user_id`.
    ///
    /// A requested status goes through `Todo::change_status`, so an illegal
    /// transition fails with `StateTransition` and nothing is written.
    pub async fn execute(
        &self,
        todo_id: TodoId,
        user_id: UserId,
        changes: TodoChanges,
    ) -> Result<Todo, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = self.update(&todo_id, &user_id, changes).await;
        commit_or_rollback(scope, result).await
    }

    async fn update(
        &self,
        todo_id: &TodoId,
        user_id: &UserId,
        changes: TodoChanges,
    ) -> Result<Todo, DomainError> {
        validate_user_exists(self.users.as_ref(), user_id).await?;
        let mut todo = find_owned_todo(self.todos.as_ref(), todo_id, user_id).await?;

        if changes.is_empty() {
            return Err(DomainError::validation(
                "At least one field must be provided for update",
            ));
        }

        if let Some(status) = changes.status {
            todo.change_status(status)?;
        }
        if let Some(title) = changes.title {
            todo.update_title(title);
        }
        if let Some(description) = changes.description {
            todo.update_description(Some(description));
        }
        if let Some(due_date) = changes.due_date {
            todo.update_due_date(Some(due_date));
        }
        if let Some(priority) = changes.priority {
            todo.update_priority(priority);
        }

        let todo = self.todos.update(&todo).await?;
        tracing::info!(todo_id = %todo.id(), status = %todo.status(), "Updated todo");
        Ok(todo)
    }
}

// ============================================================================
// DeleteTodo
// ============================================================================

pub struct DeleteTodoUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    todos: Arc<TR>,
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<TR, UR, TM> DeleteTodoUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(todos: Arc<TR>, users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            todos,
            users,
            transactions,
        }
    }

    /// Permanently delete a todo and its subtasks.
    ///
    /// Missing and foreign todos both fail with `TodoNotFound`. A todo that is
    /// in progress must be completed or canceled first.
    pub async fn execute(&self, todo_id: TodoId, user_id: UserId) -> Result<bool, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = self.delete(&todo_id, &user_id).await;
        commit_or_rollback(scope, result).await
    }

    async fn delete(&self, todo_id: &TodoId, user_id: &UserId) -> Result<bool, DomainError> {
        validate_user_exists(self.users.as_ref(), user_id).await?;
        let todo = find_owned_todo(self.todos.as_ref(), todo_id, user_id).await?;

        if !todo.can_be_deleted() {
            return Err(DomainError::invalid_field(
                "status",
                "Cannot delete todo that is in progress. Complete or cancel it first.",
            ));
        }

        let deleted = self.todos.delete(todo_id).await?;
        tracing::info!(todo_id = %todo_id, deleted, "Deleted todo");
        Ok(deleted)
    }
}

// ============================================================================
// GetTodoById
// ============================================================================

pub struct GetTodoByIdUseCase<TR, UR, SR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    SR: SubTaskRepository,
    TM: TransactionManager,
{
    todos: Arc<TR>,
    users: Arc<UR>,
    subtasks: Arc<SR>,
    transactions: Arc<TM>,
}

impl<TR, UR, SR, TM> GetTodoByIdUseCase<TR, UR, SR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    SR: SubTaskRepository,
    TM: TransactionManager,
{
    pub fn new(todos: Arc<TR>, users: Arc<UR>, subtasks: Arc<SR>, transactions: Arc<TM>) -> Self {
        Self {
            todos,
            users,
            subtasks,
            transactions,
        }
    }

    pub async fn execute(&self, todo_id: TodoId, user_id: UserId) -> Result<Todo, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = self.load(&todo_id, &user_id).await;
        commit_or_rollback(scope, result).await
    }

    /// Same checks as `execute`, plus the todo's subtasks in id order
    pub async fn execute_with_subtasks(
        &self,
        todo_id: TodoId,
        user_id: UserId,
    ) -> Result<TodoWithSubTasks, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = async {
            let todo = self.load(&todo_id, &user_id).await?;
            let subtasks = self.subtasks.find_by_todo_id(&todo_id).await?;
            Ok::<_, DomainError>(TodoWithSubTasks { todo, subtasks })
        }
        .await;
        commit_or_rollback(scope, result).await
    }

    async fn load(&self, todo_id: &TodoId, user_id: &UserId) -> Result<Todo, DomainError> {
        validate_user_exists(self.users.as_ref(), user_id).await?;
        let todo = find_owned_todo(self.todos.as_ref(), todo_id, user_id).await?;
        tracing::debug!(todo_id = %todo_id, "Loaded todo");
        Ok(todo)
    }
}

// ============================================================================
// GetTodos
// ============================================================================

pub struct GetTodosUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    todos: Arc<TR>,
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<TR, UR, TM> GetTodosUseCase<TR, UR, TM>
where
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(todos: Arc<TR>, users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            todos,
            users,
            transactions,
        }
    }

    /// A page of the user's todos, optionally filtered by status and priority.
    ///
    /// Pagination is validated before any repository call.
    pub async fn execute(
        &self,
        user_id: UserId,
        skip: i64,
        limit: i64,
        status: Option<TodoStatus>,
        priority: Option<TodoPriority>,
    ) -> Result<Vec<Todo>, DomainError> {
        let page = validate_pagination(skip, limit)?;

        let scope = self.transactions.begin().await?;
        let result = async {
            validate_user_exists(self.users.as_ref(), &user_id).await?;
            let todos = self
                .todos
                .find_with_pagination(&user_id, page.skip, page.limit, status, priority)
                .await?;
            tracing::debug!(user_id = %user_id, count = todos.len(), "Listed todos");
            Ok::<_, DomainError>(todos)
        }
        .await;
        commit_or_rollback(scope, result).await
    }
}

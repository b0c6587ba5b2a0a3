//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    Todo, TodoId, TodoPriority, TodoRecord, TodoStatus, User, UserId, UserRole,
};

/// Create a member user with a derived username and email
pub fn test_user(id: i64) -> User {
    test_user_named(id, &format!("user{}", id))
}

pub fn test_user_named(id: i64, username: &str) -> User {
    User {
        id: UserId(id),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        full_name: None,
        role: UserRole::Member,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn test_user_with_role(id: i64, role: UserRole) -> User {
    User {
        role,
        ..test_user(id)
    }
}

/// Create a pending, medium-priority todo
pub fn test_todo(id: i64, user_id: i64) -> Todo {
    test_todo_with_status(id, user_id, TodoStatus::Pending)
}

pub fn test_todo_with_status(id: i64, user_id: i64, status: TodoStatus) -> Todo {
    todo_from(id, user_id, status, TodoPriority::Medium, None)
}

pub fn test_todo_with_priority(id: i64, user_id: i64, priority: TodoPriority) -> Todo {
    todo_from(id, user_id, TodoStatus::Pending, priority, None)
}

pub fn test_todo_due(id: i64, user_id: i64, due_date: DateTime<Utc>) -> Todo {
    todo_from(
        id,
        user_id,
        TodoStatus::Pending,
        TodoPriority::Medium,
        Some(due_date),
    )
}

fn todo_from(
    id: i64,
    user_id: i64,
    status: TodoStatus,
    priority: TodoPriority,
    due_date: Option<DateTime<Utc>>,
) -> Todo {
    Todo::restore(TodoRecord {
        id: TodoId(id),
        user_id: UserId(user_id),
        title: format!("Todo {}", id),
        description: None,
        due_date,
        status,
        priority,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    })
}

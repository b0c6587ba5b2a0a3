//! SubTask authorization
//!
//! Subtasks are authorized through their parent todo. Checks run in a fixed
//! order and the first failure wins:
//!
//! 1. the parent todo exists            -> `TodoNotFound`
//! 2. the todo is owned by the caller   -> `TodoNotFound`
//! 3. the caller exists                 -> `UserNotFound`
//! 4. the caller's role is not viewer   -> `PermissionDenied`

use crate::domain::entities::{Todo, TodoId, UserId};
use crate::domain::ports::{TodoRepository, UserRepository};
use crate::error::DomainError;

use super::todo_rules::find_owned_todo;
use super::user_rules::find_existing_user;

/// Returns the parent todo when the caller may add or change its subtasks
pub async fn ensure_can_modify_subtask<TR, UR>(
    todos: &TR,
    users: &UR,
    user_id: &UserId,
    todo_id: &TodoId,
) -> Result<Todo, DomainError>
where
    TR: TodoRepository + ?Sized,
    UR: UserRepository + ?Sized,
{
    let todo = find_owned_todo(todos, todo_id, user_id).await?;

    let user = find_existing_user(users, user_id).await?;
    if !user.can_modify_subtasks() {
        return Err(DomainError::PermissionDenied(*user_id));
    }

    Ok(todo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UserRole;
    use crate::test_utils::{test_todo, test_user, test_user_with_role, InMemoryBackend};

    async fn check(backend: &InMemoryBackend, user_id: i64, todo_id: i64) -> Result<Todo, DomainError> {
        ensure_can_modify_subtask(
            backend.todos.as_ref(),
            backend.users.as_ref(),
            &UserId(user_id),
            &TodoId(todo_id),
        )
        .await
    }

    #[tokio::test]
    async fn owner_with_member_role_is_allowed() {
        let backend = InMemoryBackend::new()
            .with_user(test_user(1))
            .with_todo(test_todo(10, 1));

        let todo = check(&backend, 1, 10).await.unwrap();
        assert_eq!(todo.id(), TodoId(10));
    }

    #[tokio::test]
    async fn missing_todo_is_checked_first() {
        // The user is also missing, but the todo check runs first.
        let backend = InMemoryBackend::new();

        let err = check(&backend, 1, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::TodoNotFound(TodoId(10))));
    }

    #[tokio::test]
    async fn foreign_todo_is_not_found_even_for_viewers() {
        let backend = InMemoryBackend::new()
            .with_user(test_user(1))
            .with_user(test_user_with_role(2, UserRole::Viewer))
            .with_todo(test_todo(10, 1));

        let err = check(&backend, 2, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::TodoNotFound(TodoId(10))));
    }

    #[tokio::test]
    async fn owner_missing_from_users_is_user_not_found() {
        let backend = InMemoryBackend::new().with_todo(test_todo(10, 1));

        let err = check(&backend, 1, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(UserId(1))));
    }

    #[tokio::test]
    async fn viewer_owner_is_denied() {
        let backend = InMemoryBackend::new()
            .with_user(test_user_with_role(1, UserRole::Viewer))
            .with_todo(test_todo(10, 1));

        let err = check(&backend, 1, 10).await.unwrap_err();
        assert!(matches!(err, DomainError::PermissionDenied(UserId(1))));
    }
}

//! Todo ownership and pagination rules

use crate::domain::entities::{Todo, TodoId, UserId};
use crate::domain::ports::TodoRepository;
use crate::error::DomainError;

/// Largest page a caller may request
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_LIMIT: i64 = 100;

/// Validated pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    /// Slice an already-loaded, ordered list
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
            .collect()
    }
}

pub fn validate_pagination(skip: i64, limit: i64) -> Result<Page, DomainError> {
    if limit > MAX_PAGE_LIMIT {
        return Err(DomainError::invalid_field(
            "limit",
            format!("Limit cannot exceed {}", MAX_PAGE_LIMIT),
        ));
    }
    if limit < 0 {
        return Err(DomainError::invalid_field("limit", "Limit cannot be negative"));
    }
    if skip < 0 {
        return Err(DomainError::invalid_field("skip", "Skip cannot be negative"));
    }

    Ok(Page {
        skip: skip as u64,
        limit: limit as u64,
    })
}

/// A todo owned by someone else is reported as missing, so a caller cannot
/// tell "does not exist" apart from "not yours".
pub fn validate_todo_ownership(todo: &Todo, user_id: &UserId) -> Result<(), DomainError> {
    if !todo.is_owned_by(*user_id) {
        return Err(DomainError::TodoNotFound(todo.id()));
    }
    Ok(())
}

/// Load a todo and check ownership; both failures are `TodoNotFound`
pub async fn find_owned_todo<TR>(
    todos: &TR,
    todo_id: &TodoId,
    user_id: &UserId,
) -> Result<Todo, DomainError>
where
    TR: TodoRepository + ?Sized,
{
    let todo = todos
        .find_by_id(todo_id)
        .await?
        .ok_or(DomainError::TodoNotFound(*todo_id))?;
    validate_todo_ownership(&todo, user_id)?;
    Ok(todo)
}

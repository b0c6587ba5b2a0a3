//! SubTask domain entity
//!
//! A child item of a todo. Its owner must match the parent todo's owner;
//! that is checked before creation, there is no storage constraint for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::todo::TodoId;
use super::user::UserId;

/// Unique identifier for a subtask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubTaskId(pub i64);

impl From<i64> for SubTaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SubTaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubTask {
    pub id: SubTaskId,
    pub user_id: UserId,
    pub todo_id: TodoId,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new subtask. Subtasks start incomplete.
#[derive(Debug, Clone)]
pub struct NewSubTask {
    pub user_id: UserId,
    pub todo_id: TodoId,
    pub title: String,
}

impl NewSubTask {
    pub fn new(user_id: UserId, todo_id: TodoId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            todo_id,
            title: title.into(),
        }
    }
}

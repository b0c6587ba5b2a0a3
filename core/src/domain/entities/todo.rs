//! Todo domain entity
//!
//! A unit of work owned by exactly one user. The status field is private:
//! it only moves through the transition methods below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TodoId(pub i64);

impl From<i64> for TodoId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Todo status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 4] = [
        TodoStatus::Pending,
        TodoStatus::InProgress,
        TodoStatus::Completed,
        TodoStatus::Canceled,
    ];

    /// Completed and canceled todos never leave their state
    pub fn is_terminal(self) -> bool {
        matches!(self, TodoStatus::Completed | TodoStatus::Canceled)
    }

    pub fn is_active(self) -> bool {
        matches!(self, TodoStatus::Pending | TodoStatus::InProgress)
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoStatus::Pending => write!(f, "pending"),
            TodoStatus::InProgress => write!(f, "in_progress"),
            TodoStatus::Completed => write!(f, "completed"),
            TodoStatus::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TodoStatus::Pending),
            "in_progress" | "inprogress" => Ok(TodoStatus::InProgress),
            "completed" => Ok(TodoStatus::Completed),
            "canceled" | "cancelled" => Ok(TodoStatus::Canceled),
            _ => Err(format!("Unknown todo status: {}", s)),
        }
    }
}

/// Todo priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoPriority::Low => write!(f, "low"),
            TodoPriority::Medium => write!(f, "medium"),
            TodoPriority::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for TodoPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TodoPriority::Low),
            "medium" => Ok(TodoPriority::Medium),
            "high" => Ok(TodoPriority::High),
            _ => Err(format!("Unknown todo priority: {}", s)),
        }
    }
}

/// Persisted shape of a todo, used by repositories to rebuild the entity
#[derive(Debug, Clone)]
pub struct TodoRecord {
    pub id: TodoId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A persisted todo
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Todo {
    id: TodoId,
    user_id: UserId,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: TodoStatus,
    priority: TodoPriority,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Todo {
    /// Rebuild a todo from storage. Not a way to skip the state machine:
    /// repositories hand back exactly what was persisted.
    pub fn restore(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
            due_date: record.due_date,
            status: record.status,
            priority: record.priority,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn status(&self) -> TodoStatus {
        self.status
    }

    pub fn priority(&self) -> TodoPriority {
        self.priority
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Move a pending todo into progress
    pub fn mark_in_progress(&mut self) -> Result<(), DomainError> {
        match self.status {
            TodoStatus::Completed => Err(DomainError::state_transition(
                "Cannot change completed todo to in progress",
                TodoStatus::Completed,
                TodoStatus::InProgress,
            )),
            TodoStatus::Canceled => Err(DomainError::state_transition(
                "Cannot change canceled todo to in progress",
                TodoStatus::Canceled,
                TodoStatus::InProgress,
            )),
            TodoStatus::Pending | TodoStatus::InProgress => {
                self.status = TodoStatus::InProgress;
                Ok(())
            }
        }
    }

    pub fn mark_completed(&mut self) -> Result<(), DomainError> {
        match self.status {
            TodoStatus::Completed => Err(DomainError::state_transition(
                "Todo is already completed",
                TodoStatus::Completed,
                TodoStatus::Completed,
            )),
            TodoStatus::Canceled => Err(DomainError::state_transition(
                "Cannot complete a canceled todo",
                TodoStatus::Canceled,
                TodoStatus::Completed,
            )),
            TodoStatus::Pending | TodoStatus::InProgress => {
                self.status = TodoStatus::Completed;
                Ok(())
            }
        }
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        match self.status {
            TodoStatus::Completed => Err(DomainError::state_transition(
                "Cannot cancel a completed todo",
                TodoStatus::Completed,
                TodoStatus::Canceled,
            )),
            TodoStatus::Canceled => Err(DomainError::state_transition(
                "Todo is already canceled",
                TodoStatus::Canceled,
                TodoStatus::Canceled,
            )),
            TodoStatus::Pending | TodoStatus::InProgress => {
                self.status = TodoStatus::Canceled;
                Ok(())
            }
        }
    }

    /// Whether the generic "set status" path may move this todo to `new_status`
    pub fn can_change_status_to(&self, new_status: TodoStatus) -> bool {
        if self.status == new_status {
            return false;
        }

        match (self.status, new_status) {
            (TodoStatus::Completed, TodoStatus::Pending) => false,
            (TodoStatus::Canceled, TodoStatus::Pending | TodoStatus::InProgress) => false,
            _ => true,
        }
    }

    pub fn change_status(&mut self, new_status: TodoStatus) -> Result<(), DomainError> {
        if !self.can_change_status_to(new_status) {
            return Err(DomainError::state_transition(
                format!(
                    "Cannot change status from {} to {}",
                    self.status, new_status
                ),
                self.status,
                new_status,
            ));
        }

        self.status = new_status;
        Ok(())
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// Overdue only while work is still open; terminal todos are never overdue
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => due < now && self.status.is_active(),
            None => false,
        }
    }

    /// Work in progress must be completed or canceled before removal
    pub fn can_be_deleted(&self) -> bool {
        self.status != TodoStatus::InProgress
    }

    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn update_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
    }

    pub fn update_priority(&mut self, priority: TodoPriority) {
        self.priority = priority;
    }
}

/// Data needed to create a new todo.
///
/// New todos always start `pending`; the repository assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TodoPriority,
}

impl NewTodo {
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            description: None,
            due_date: None,
            priority: TodoPriority::default(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_priority(mut self, priority: TodoPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn status(&self) -> TodoStatus {
        TodoStatus::Pending
    }
}

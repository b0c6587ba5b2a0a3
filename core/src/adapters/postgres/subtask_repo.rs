//! PostgreSQL adapter for SubTaskRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::{persistence_error, PostgresSession};
use crate::domain::entities::{NewSubTask, SubTask, SubTaskId, TodoId, UserId};
use crate::domain::ports::SubTaskRepository;
use crate::entity::subtasks;
use crate::error::DomainError;

const ENTITY: &str = "subtask";

/// PostgreSQL implementation of SubTaskRepository
pub struct PostgresSubTaskRepository {
    session: PostgresSession,
}

impl PostgresSubTaskRepository {
    pub fn new(session: PostgresSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SubTaskRepository for PostgresSubTaskRepository {
    async fn create(&self, subtask: &NewSubTask) -> Result<SubTask, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = subtasks::ActiveModel {
            user_id: Set(subtask.user_id.0),
            todo_id: Set(subtask.todo_id.0),
            title: Set(subtask.title.clone()),
            is_completed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = on_conn!(self.session, |conn| model.insert(conn).await)
            .map_err(|e| persistence_error("SubTaskRepository::create", ENTITY, e))?;

        Ok(result.into())
    }

    async fn find_by_todo_id(&self, todo_id: &TodoId) -> Result<Vec<SubTask>, DomainError> {
        let results = on_conn!(self.session, |conn| subtasks::Entity::find()
            .filter(subtasks::Column::TodoId.eq(todo_id.0))
            .order_by_asc(subtasks::Column::Id)
            .all(conn)
            .await)
        .map_err(|e| persistence_error("SubTaskRepository::find_by_todo_id", ENTITY, e))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<subtasks::Model> for SubTask {
    fn from(model: subtasks::Model) -> Self {
        SubTask {
            id: SubTaskId(model.id),
            user_id: UserId(model.user_id),
            todo_id: TodoId(model.todo_id),
            title: model.title,
            is_completed: model.is_completed,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

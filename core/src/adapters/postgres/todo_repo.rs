//! PostgreSQL adapter for TodoRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::{persistence_error, PostgresSession};
use crate::domain::entities::{
    NewTodo, Todo, TodoId, TodoPriority, TodoRecord, TodoStatus, UserId,
};
use crate::domain::ports::TodoRepository;
use crate::entity::{subtasks, todos};
use crate::error::DomainError;

const ENTITY: &str = "todo";

/// PostgreSQL implementation of TodoRepository
pub struct PostgresTodoRepository {
    session: PostgresSession,
}

impl PostgresTodoRepository {
    pub fn new(session: PostgresSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn create(&self, todo: &NewTodo) -> Result<Todo, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = todos::ActiveModel {
            user_id: Set(todo.user_id.0),
            title: Set(todo.title.clone()),
            description: Set(todo.description.clone()),
            due_date: Set(todo.due_date.map(|d| d.fixed_offset())),
            status: Set(todo.status().to_string()),
            priority: Set(todo.priority.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = on_conn!(self.session, |conn| model.insert(conn).await)
            .map_err(|e| persistence_error("TodoRepository::create", ENTITY, e))?;

        Ok(result.into())
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, DomainError> {
        let model = todos::ActiveModel {
            id: Set(todo.id().0),
            user_id: Set(todo.user_id().0),
            title: Set(todo.title().to_string()),
            description: Set(todo.description().map(str::to_string)),
            due_date: Set(todo.due_date().map(|d| d.fixed_offset())),
            status: Set(todo.status().to_string()),
            priority: Set(todo.priority().to_string()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        match on_conn!(self.session, |conn| model.update(conn).await) {
            Ok(result) => Ok(result.into()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::TodoNotFound(todo.id())),
            Err(e) => Err(persistence_error("TodoRepository::update", ENTITY, e)),
        }
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, DomainError> {
        let result = on_conn!(self.session, |conn| todos::Entity::find_by_id(id.0)
            .one(conn)
            .await)
        .map_err(|e| persistence_error("TodoRepository::find_by_id", ENTITY, e))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_with_pagination(
        &self,
        user_id: &UserId,
        skip: u64,
        limit: u64,
        status: Option<TodoStatus>,
        priority: Option<TodoPriority>,
    ) -> Result<Vec<Todo>, DomainError> {
        let mut query = todos::Entity::find().filter(todos::Column::UserId.eq(user_id.0));
        if let Some(status) = status {
            query = query.filter(todos::Column::Status.eq(status.to_string()));
        }
        if let Some(priority) = priority {
            query = query.filter(todos::Column::Priority.eq(priority.to_string()));
        }
        let query = query
            .order_by_asc(todos::Column::Id)
            .offset(skip)
            .limit(limit);

        let results = on_conn!(self.session, |conn| query.all(conn).await)
            .map_err(|e| persistence_error("TodoRepository::find_with_pagination", ENTITY, e))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, DomainError> {
        let result = on_conn!(self.session, |conn| async {
            subtasks::Entity::delete_many()
                .filter(subtasks::Column::TodoId.eq(id.0))
                .exec(conn)
                .await?;
            todos::Entity::delete_by_id(id.0).exec(conn).await
        }
        .await)
        .map_err(|e| persistence_error("TodoRepository::delete", ENTITY, e))?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_all_by_user_id(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let result = on_conn!(self.session, |conn| async {
            let todo_ids: Vec<i64> = todos::Entity::find()
                .select_only()
                .column(todos::Column::Id)
                .filter(todos::Column::UserId.eq(user_id.0))
                .into_tuple()
                .all(conn)
                .await?;

            if !todo_ids.is_empty() {
                subtasks::Entity::delete_many()
                    .filter(subtasks::Column::TodoId.is_in(todo_ids))
                    .exec(conn)
                    .await?;
            }

            todos::Entity::delete_many()
                .filter(todos::Column::UserId.eq(user_id.0))
                .exec(conn)
                .await
        }
        .await)
        .map_err(|e| persistence_error("TodoRepository::delete_all_by_user_id", ENTITY, e))?;

        Ok(result.rows_affected)
    }

    async fn exists(&self, id: &TodoId) -> Result<bool, DomainError> {
        let count = on_conn!(self.session, |conn| todos::Entity::find_by_id(id.0)
            .count(conn)
            .await)
        .map_err(|e| persistence_error("TodoRepository::exists", ENTITY, e))?;

        Ok(count > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<todos::Model> for Todo {
    fn from(model: todos::Model) -> Self {
        Todo::restore(TodoRecord {
            id: TodoId(model.id),
            user_id: UserId(model.user_id),
            title: model.title,
            description: model.description,
            due_date: model.due_date.map(|d| d.with_timezone(&Utc)),
            status: model.status.parse().unwrap_or(TodoStatus::Pending),
            priority: model.priority.parse().unwrap_or_default(),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        })
    }
}

//! PostgreSQL adapter for UserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use super::{persistence_error, PostgresSession};
use crate::domain::entities::{NewUser, User, UserId};
use crate::domain::ports::UserRepository;
use crate::entity::users;
use crate::error::DomainError;

const ENTITY: &str = "user";

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    session: PostgresSession,
}

impl PostgresUserRepository {
    pub fn new(session: PostgresSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            full_name: Set(user.full_name.clone()),
            role: Set(user.role.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = on_conn!(self.session, |conn| model.insert(conn).await)
            .map_err(|e| persistence_error("UserRepository::create", ENTITY, e))?;

        Ok(result.into())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let model = users::ActiveModel {
            id: Set(user.id.0),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            full_name: Set(user.full_name.clone()),
            role: Set(user.role.to_string()),
            is_active: Set(user.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        match on_conn!(self.session, |conn| model.update(conn).await) {
            Ok(result) => Ok(result.into()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::UserNotFound(user.id)),
            Err(e) => Err(persistence_error("UserRepository::update", ENTITY, e)),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = on_conn!(self.session, |conn| users::Entity::find_by_id(id.0)
            .one(conn)
            .await)
        .map_err(|e| persistence_error("UserRepository::find_by_id", ENTITY, e))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let result = on_conn!(self.session, |conn| users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(conn)
            .await)
        .map_err(|e| persistence_error("UserRepository::find_by_username", ENTITY, e))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let result = on_conn!(self.session, |conn| users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(conn)
            .await)
        .map_err(|e| persistence_error("UserRepository::find_by_email", ENTITY, e))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let results = on_conn!(self.session, |conn| users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(conn)
            .await)
        .map_err(|e| persistence_error("UserRepository::find_all", ENTITY, e))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        let result = on_conn!(self.session, |conn| users::Entity::delete_by_id(id.0)
            .exec(conn)
            .await)
        .map_err(|e| persistence_error("UserRepository::delete", ENTITY, e))?;

        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        let count = on_conn!(self.session, |conn| users::Entity::find_by_id(id.0)
            .count(conn)
            .await)
        .map_err(|e| persistence_error("UserRepository::exists", ENTITY, e))?;

        Ok(count > 0)
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            email: model.email,
            full_name: model.full_name,
            role: model.role.parse().unwrap_or_default(),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

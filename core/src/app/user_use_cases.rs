//! User use cases

use std::sync::Arc;

use crate::domain::entities::{NewUser, User, UserId, UserRole};
use crate::domain::ports::{TodoRepository, TransactionManager, UserRepository};
use crate::domain::services::{
    find_existing_user, validate_pagination, validate_user_uniqueness,
    validate_user_update_uniqueness,
};
use crate::error::DomainError;

use super::transaction::commit_or_rollback;

/// Fields a caller may change on a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
}

// ============================================================================
// CreateUser
// ============================================================================

pub struct CreateUserUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<UR, TM> CreateUserUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    /// Register a user. Username and email must both be unused; nothing is
    /// written when either collides.
    pub async fn execute(
        &self,
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: Option<String>,
        role: Option<UserRole>,
    ) -> Result<User, DomainError> {
        let new_user = NewUser::new(username, email)
            .with_full_name(full_name)
            .with_role(role.unwrap_or_default());

        let scope = self.transactions.begin().await?;
        let result = self.create(&new_user).await;
        commit_or_rollback(scope, result).await
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        validate_user_uniqueness(self.users.as_ref(), &new_user.username, &new_user.email)
            .await?;

        let user = self.users.create(new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }
}

// ============================================================================
// UpdateUser
// ============================================================================

pub struct UpdateUserUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<UR, TM> UpdateUserUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    pub async fn execute(&self, user_id: UserId, changes: UserChanges) -> Result<User, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = self.update(&user_id, changes).await;
        commit_or_rollback(scope, result).await
    }

    async fn update(&self, user_id: &UserId, changes: UserChanges) -> Result<User, DomainError> {
        let mut user = find_existing_user(self.users.as_ref(), user_id).await?;

        validate_user_update_uniqueness(
            self.users.as_ref(),
            &user,
            changes.username.as_deref(),
            changes.email.as_deref(),
        )
        .await?;

        user.update(
            changes.username,
            changes.email,
            changes.full_name,
            changes.role,
        )?;

        let user = self.users.update(&user).await?;
        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }
}

// ============================================================================
// DeleteUser
// ============================================================================

pub struct DeleteUserUseCase<UR, TR, TM>
where
    UR: UserRepository,
    TR: TodoRepository,
    TM: TransactionManager,
{
    users: Arc<UR>,
    todos: Arc<TR>,
    transactions: Arc<TM>,
}

impl<UR, TR, TM> DeleteUserUseCase<UR, TR, TM>
where
    UR: UserRepository,
    TR: TodoRepository,
    TM: TransactionManager,
{
    pub fn new(users: Arc<UR>, todos: Arc<TR>, transactions: Arc<TM>) -> Self {
        Self {
            users,
            todos,
            transactions,
        }
    }

    /// Delete a user and every todo they own in one scope.
    ///
    /// Returns `false` when the user does not exist. If removing the user
    /// fails after the todos are gone, the todos come back with the rollback.
    pub async fn execute(&self, user_id: UserId) -> Result<bool, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = self.delete(&user_id).await;
        commit_or_rollback(scope, result).await
    }

    async fn delete(&self, user_id: &UserId) -> Result<bool, DomainError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            tracing::debug!(user_id = %user_id, "User to delete does not exist");
            return Ok(false);
        }

        let removed_todos = self.todos.delete_all_by_user_id(user_id).await?;

        if !self.users.delete(user_id).await? {
            return Err(DomainError::System(format!(
                "Failed to delete user with id {}",
                user_id
            )));
        }

        tracing::info!(user_id = %user_id, removed_todos, "Deleted user");
        Ok(true)
    }
}

// ============================================================================
// GetUserById
// ============================================================================

pub struct GetUserByIdUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<UR, TM> GetUserByIdUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<User, DomainError> {
        let scope = self.transactions.begin().await?;
        let result = find_existing_user(self.users.as_ref(), &user_id).await;
        commit_or_rollback(scope, result).await
    }
}

// ============================================================================
// GetUsers
// ============================================================================

pub struct GetUsersUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<UR, TM> GetUsersUseCase<UR, TM>
where
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            users,
            transactions,
        }
    }

    /// A page of all users in id order
    pub async fn execute(&self, skip: i64, limit: i64) -> Result<Vec<User>, DomainError> {
        let page = validate_pagination(skip, limit)?;

        let scope = self.transactions.begin().await?;
        let result = self.users.find_all().await.map(|users| page.apply(users));
        commit_or_rollback(scope, result).await
    }
}

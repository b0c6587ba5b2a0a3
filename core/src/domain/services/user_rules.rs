//! User existence and uniqueness rules

use crate::domain::entities::{User, UserId};
use crate::domain::ports::UserRepository;
use crate::error::DomainError;

const USERNAME_CONSTRAINT: &str = "username_uniqueness";
const EMAIL_CONSTRAINT: &str = "email_uniqueness";

/// Fails with `UserNotFound` if the user is absent
pub async fn validate_user_exists<UR>(users: &UR, user_id: &UserId) -> Result<(), DomainError>
where
    UR: UserRepository + ?Sized,
{
    if !users.exists(user_id).await? {
        return Err(DomainError::UserNotFound(*user_id));
    }
    Ok(())
}

/// Load a user or fail with `UserNotFound`
pub async fn find_existing_user<UR>(users: &UR, user_id: &UserId) -> Result<User, DomainError>
where
    UR: UserRepository + ?Sized,
{
    users
        .find_by_id(user_id)
        .await?
        .ok_or(DomainError::UserNotFound(*user_id))
}

/// Username and email must both be free. Username is checked first.
pub async fn validate_user_uniqueness<UR>(
    users: &UR,
    username: &str,
    email: &str,
) -> Result<(), DomainError>
where
    UR: UserRepository + ?Sized,
{
    if users.find_by_username(username).await?.is_some() {
        return Err(username_taken(username));
    }
    if users.find_by_email(email).await?.is_some() {
        return Err(email_taken(email));
    }
    Ok(())
}

/// Only fields that actually change are checked, and a match on the user
/// being updated is not a collision.
pub async fn validate_user_update_uniqueness<UR>(
    users: &UR,
    current: &User,
    new_username: Option<&str>,
    new_email: Option<&str>,
) -> Result<(), DomainError>
where
    UR: UserRepository + ?Sized,
{
    if let Some(username) = new_username.filter(|u| *u != current.username) {
        if let Some(existing) = users.find_by_username(username).await? {
            if existing.id != current.id {
                return Err(username_taken(username));
            }
        }
    }

    if let Some(email) = new_email.filter(|e| *e != current.email) {
        if let Some(existing) = users.find_by_email(email).await? {
            if existing.id != current.id {
                return Err(email_taken(email));
            }
        }
    }

    Ok(())
}

fn username_taken(username: &str) -> DomainError {
    DomainError::UniqueConstraint {
        message: format!("Username '{}' already exists", username),
        constraint: USERNAME_CONSTRAINT,
    }
}

fn email_taken(email: &str) -> DomainError {
    DomainError::UniqueConstraint {
        message: format!("Email '{}' already exists", email),
        constraint: EMAIL_CONSTRAINT,
    }
}

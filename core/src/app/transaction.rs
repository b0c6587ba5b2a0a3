//! Scope completion for use cases
//!
//! Use cases open a scope, run their body, and hand both to
//! [`commit_or_rollback`]. If the body's future is dropped before that point
//! the scope's own `Drop` rolls it back.

use crate::domain::ports::TransactionScope;
use crate::error::DomainError;

/// Commit on success. On failure roll back and return the original error; a
/// rollback failure is only logged.
pub async fn commit_or_rollback<S, T>(
    scope: S,
    result: Result<T, DomainError>,
) -> Result<T, DomainError>
where
    S: TransactionScope,
{
    let depth = scope.depth();
    match result {
        Ok(value) => {
            scope.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = scope.rollback().await {
                tracing::error!(
                    depth,
                    error = %rollback_err,
                    original = %err,
                    "Failed to roll back transaction scope"
                );
            }
            Err(err)
        }
    }
}

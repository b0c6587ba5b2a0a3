//! PostgreSQL adapter for TransactionManager
//!
//! The first scope on a session is a real transaction; scopes opened inside
//! it are savepoints on the same connection.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, TransactionTrait};
use tokio::sync::Mutex;

use super::{persistence_error, PostgresSession};
use crate::domain::ports::{TransactionManager, TransactionScope};
use crate::error::DomainError;

/// PostgreSQL implementation of TransactionManager
pub struct PostgresTransactionManager {
    session: PostgresSession,
}

impl PostgresTransactionManager {
    pub fn new(session: PostgresSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl TransactionManager for PostgresTransactionManager {
    type Scope = PostgresTransactionScope;

    async fn begin(&self) -> Result<PostgresTransactionScope, DomainError> {
        let mut stack = self.session.scopes.lock().await;

        let txn = match stack.last() {
            Some(parent) => parent.begin().await,
            None => self.session.db.begin().await,
        }
        .map_err(|e| persistence_error("TransactionManager::begin", "transaction", e))?;

        let depth = stack.len();
        stack.push(txn);
        tracing::debug!(depth, "Opened transaction scope");

        Ok(PostgresTransactionScope {
            scopes: self.session.scopes.clone(),
            depth,
            finished: false,
        })
    }
}

/// Handle to one entry of a session's transaction stack
pub struct PostgresTransactionScope {
    scopes: Arc<Mutex<Vec<DatabaseTransaction>>>,
    depth: usize,
    finished: bool,
}

impl PostgresTransactionScope {
    /// Take this scope's transaction off the stack. Anything still open above
    /// it is dropped first, which rolls those savepoints back.
    async fn take(&mut self) -> Result<DatabaseTransaction, DomainError> {
        let mut stack = self.scopes.lock().await;
        if stack.len() <= self.depth {
            return Err(DomainError::System(format!(
                "Transaction scope at depth {} is no longer open",
                self.depth
            )));
        }
        stack.truncate(self.depth + 1);
        self.finished = true;
        stack.pop().ok_or_else(|| {
            DomainError::System("Transaction stack emptied while in use".to_string())
        })
    }
}

#[async_trait]
impl TransactionScope for PostgresTransactionScope {
    fn depth(&self) -> usize {
        self.depth
    }

    async fn commit(mut self) -> Result<(), DomainError> {
        let txn = self.take().await?;
        txn.commit()
            .await
            .map_err(|e| persistence_error("TransactionScope::commit", "transaction", e))?;
        tracing::debug!(depth = self.depth, "Committed transaction scope");
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), DomainError> {
        let txn = self.take().await?;
        txn.rollback()
            .await
            .map_err(|e| persistence_error("TransactionScope::rollback", "transaction", e))?;
        tracing::debug!(depth = self.depth, "Rolled back transaction scope");
        Ok(())
    }
}

impl Drop for PostgresTransactionScope {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        // Dropping a sea-orm transaction without committing rolls it back.
        let depth = self.depth;
        match self.scopes.try_lock() {
            Ok(mut stack) => {
                stack.truncate(depth);
                tracing::debug!(depth, "Abandoned transaction scope rolled back");
            }
            Err(_) => {
                let scopes = self.scopes.clone();
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            scopes.lock().await.truncate(depth);
                        });
                    }
                    Err(_) => tracing::error!(
                        depth,
                        "Abandoned transaction scope could not be rolled back"
                    ),
                }
            }
        }
    }
}

//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.
//!
//! Every adapter built from one [`PostgresSession`] shares its stack of open
//! transactions. Queries run on the innermost open transaction, or directly
//! on the pool when none is open.

use std::sync::Arc;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::DomainError;

/// Run `$body` with `$conn` bound to the innermost open transaction, or to the
/// pool if the session has none. The stack stays locked for the whole body.
macro_rules! on_conn {
    ($session:expr, |$conn:ident| $body:expr) => {{
        let stack = $session.scopes.lock().await;
        match stack.last() {
            Some($conn) => $body,
            None => {
                let $conn = &$session.db;
                $body
            }
        }
    }};
}

pub mod subtask_repo;
pub mod todo_repo;
pub mod transaction_manager;
pub mod user_repo;


pub use subtask_repo::PostgresSubTaskRepository;
pub use todo_repo::PostgresTodoRepository;
pub use transaction_manager::{PostgresTransactionManager, PostgresTransactionScope};
pub use user_repo::PostgresUserRepository;

/// Open the connection pool described by `config`
pub async fn connect(config: &Config) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.database_max_connections)
        .sqlx_logging(config.database_sql_logging);

    let db = Database::connect(options)
        .await
        .context("Failed to connect to PostgreSQL")?;

    tracing::info!(
        max_connections = config.database_max_connections,
        "Connected to PostgreSQL"
    );
    Ok(db)
}

/// One logical unit of work, typically one request.
///
/// Cloning a session shares its transaction stack; create a new session per
/// request so unrelated callers do not nest inside each other.
#[derive(Clone)]
pub struct PostgresSession {
    db: DatabaseConnection,
    scopes: Arc<Mutex<Vec<DatabaseTransaction>>>,
}

impl PostgresSession {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            scopes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn todo_repository(&self) -> PostgresTodoRepository {
        PostgresTodoRepository::new(self.clone())
    }

    pub fn user_repository(&self) -> PostgresUserRepository {
        PostgresUserRepository::new(self.clone())
    }

    pub fn subtask_repository(&self) -> PostgresSubTaskRepository {
        PostgresSubTaskRepository::new(self.clone())
    }

    pub fn transaction_manager(&self) -> PostgresTransactionManager {
        PostgresTransactionManager::new(self.clone())
    }
}

/// Wrap a storage failure exactly once. The driver message is logged and kept
/// as `cause`; it never reaches the caller's response body.
pub(crate) fn persistence_error(
    operation: &'static str,
    entity: &'static str,
    err: DbErr,
) -> DomainError {
    tracing::error!(operation, entity, error = %err, "Persistence operation failed");

    let cause = err.to_string();
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => DomainError::Connection {
            operation,
            entity,
            cause,
        },
        _ => DomainError::DataOperation {
            operation,
            entity,
            cause,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn query_errors_are_data_operation_failures() {
        let err = persistence_error(
            "TodoRepository::find_by_id",
            "todo",
            DbErr::Custom("syntax error at or near".to_string()),
        );

        assert_eq!(err.kind(), ErrorKind::DataOperation);
        assert!(!err.user_message().contains("syntax"));
        match err {
            DomainError::DataOperation {
                operation, entity, ..
            } => {
                assert_eq!(operation, "TodoRepository::find_by_id");
                assert_eq!(entity, "todo");
            }
            other => panic!("expected data operation error, got {:?}", other),
        }
    }

    #[test]
    fn pool_exhaustion_is_a_connection_failure() {
        let err = persistence_error(
            "TransactionManager::begin",
            "transaction",
            DbErr::ConnectionAcquire(sea_orm::error::ConnAcquireErr::Timeout),
        );

        assert_eq!(err.kind(), ErrorKind::Connection);
        assert!(err.kind().retryable());
    }
}

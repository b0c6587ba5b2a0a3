//! Transaction scope port
//!
//! A `TransactionManager` is bound to one logical session. Beginning a scope
//! while another is open on the same session opens a savepoint inside it, so
//! scopes form a stack. A scope that is dropped without `commit` or `rollback`
//! (early return, or the caller abandoning the future) is rolled back.

use async_trait::async_trait;

use crate::error::DomainError;

#[async_trait]
pub trait TransactionManager: Send + Sync {
    type Scope: TransactionScope;

    /// Open a transaction, or a savepoint if one is already open
    async fn begin(&self) -> Result<Self::Scope, DomainError>;
}

#[async_trait]
pub trait TransactionScope: Send {
    /// Nesting level of this scope; 0 is the top-level transaction
    fn depth(&self) -> usize;

    async fn commit(self) -> Result<(), DomainError>;

    async fn rollback(self) -> Result<(), DomainError>;
}

//! SubTask use cases

use std::sync::Arc;

use crate::domain::entities::{NewSubTask, SubTask, TodoId, UserId};
use crate::domain::ports::{SubTaskRepository, TodoRepository, TransactionManager, UserRepository};
use crate::domain::services::ensure_can_modify_subtask;
use crate::error::DomainError;

use super::transaction::commit_or_rollback;

pub struct CreateSubTaskUseCase<SR, TR, UR, TM>
where
    SR: SubTaskRepository,
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    subtasks: Arc<SR>,
    todos: Arc<TR>,
    users: Arc<UR>,
    transactions: Arc<TM>,
}

impl<SR, TR, UR, TM> CreateSubTaskUseCase<SR, TR, UR, TM>
where
    SR: SubTaskRepository,
    TR: TodoRepository,
    UR: UserRepository,
    TM: TransactionManager,
{
    pub fn new(subtasks: Arc<SR>, todos: Arc<TR>, users: Arc<UR>, transactions: Arc<TM>) -> Self {
        Self {
            subtasks,
            todos,
            users,
            transactions,
        }
    }

    /// Add an incomplete subtask to a todo the caller owns.
    ///
    /// The subtask's owner is always the parent todo's owner.
    pub async fn execute(
        &self,
        user_id: UserId,
        todo_id: TodoId,
        title: impl Into<String>,
    ) -> Result<SubTask, DomainError> {
        let title = title.into();

        let scope = self.transactions.begin().await?;
        let result = self.create(&user_id, &todo_id, title).await;
        commit_or_rollback(scope, result).await
    }

    async fn create(
        &self,
        user_id: &UserId,
        todo_id: &TodoId,
        title: String,
    ) -> Result<SubTask, DomainError> {
        let todo = ensure_can_modify_subtask(
            self.todos.as_ref(),
            self.users.as_ref(),
            user_id,
            todo_id,
        )
        .await?;

        let subtask = self
            .subtasks
            .create(&NewSubTask::new(todo.user_id(), todo.id(), title))
            .await?;
        tracing::info!(subtask_id = %subtask.id, todo_id = %todo_id, "Created subtask");
        Ok(subtask)
    }
}

//! Application layer
//!
//! Use cases that sequence domain rules, entity mutation and repository
//! writes inside a single transaction scope.

pub mod subtask_use_cases;
pub mod todo_use_cases;
pub mod transaction;
pub mod user_use_cases;

pub use subtask_use_cases::CreateSubTaskUseCase;
pub use todo_use_cases::{
    CreateTodoUseCase, DeleteTodoUseCase, GetTodoByIdUseCase, GetTodosUseCase, TodoChanges,
    TodoWithSubTasks, UpdateTodoUseCase,
};
pub use transaction::commit_or_rollback;
pub use user_use_cases::{
    CreateUserUseCase, DeleteUserUseCase, GetUserByIdUseCase, GetUsersUseCase, UpdateUserUseCase,
    UserChanges,
};

//! Domain services
//!
//! Stateless rule checks that span more than one entity or need a repository
//! lookup. They only read; writes belong to the use cases.

pub mod subtask_rules;
pub mod todo_rules;
pub mod user_rules;

pub use subtask_rules::ensure_can_modify_subtask;
pub use todo_rules::{
    find_owned_todo, validate_pagination, validate_todo_ownership, Page, DEFAULT_PAGE_LIMIT,
    MAX_PAGE_LIMIT,
};
pub use user_rules::{
    find_existing_user, validate_user_exists, validate_user_uniqueness,
    validate_user_update_uniqueness,
};

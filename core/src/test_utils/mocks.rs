//! In-memory implementations of the port traits
//!
//! All repositories built from one `InMemoryStore` share its state, and the
//! store's transaction manager snapshots that state for every scope it opens.
//! Rolling back a scope restores its snapshot, so tests can observe commit,
//! rollback and savepoint behaviour without a database.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::domain::entities::{
    NewSubTask, NewTodo, NewUser, SubTask, SubTaskId, Todo, TodoId, TodoPriority, TodoRecord,
    TodoStatus, User, UserId,
};
use crate::domain::ports::{
    SubTaskRepository, TodoRepository, TransactionManager, TransactionScope, UserRepository,
};
use crate::error::DomainError;

// ============================================================================
// Shared store
// ============================================================================

#[derive(Debug, Clone, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    todos: HashMap<TodoId, Todo>,
    subtasks: HashMap<SubTaskId, SubTask>,
    next_id: i64,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
    savepoints: Mutex<Vec<StoreState>>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    max_depth: AtomicUsize,
    fail_user_delete: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a user without counting it as a write
    pub fn insert_user(&self, user: User) {
        let mut state = self.state.write().unwrap();
        state.next_id = state.next_id.max(user.id.0);
        state.users.insert(user.id, user);
    }

    /// Seed a todo without counting it as a write
    pub fn insert_todo(&self, todo: Todo) {
        let mut state = self.state.write().unwrap();
        state.next_id = state.next_id.max(todo.id().0);
        state.todos.insert(todo.id(), todo);
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.state.read().unwrap().users.get(&id).cloned()
    }

    pub fn todo(&self, id: TodoId) -> Option<Todo> {
        self.state.read().unwrap().todos.get(&id).cloned()
    }

    pub fn todo_count(&self) -> usize {
        self.state.read().unwrap().todos.len()
    }

    pub fn user_count(&self) -> usize {
        self.state.read().unwrap().users.len()
    }

    pub fn subtask_count(&self) -> usize {
        self.state.read().unwrap().subtasks.len()
    }

    /// Every repository call, reads included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }

    /// Deepest scope nesting seen so far (1 = top-level transaction only)
    pub fn max_depth(&self) -> usize {
        self.max_depth.load(Ordering::SeqCst)
    }

    pub fn open_scopes(&self) -> usize {
        self.savepoints.lock().unwrap().len()
    }

    /// Make the next `UserRepository::delete` fail like a storage error
    pub fn fail_next_user_delete(&self) {
        self.fail_user_delete.store(true, Ordering::SeqCst);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.state.read().unwrap()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreState> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.state.write().unwrap()
    }

    fn push_savepoint(&self) -> usize {
        let snapshot = self.state.read().unwrap().clone();
        let mut savepoints = self.savepoints.lock().unwrap();
        let depth = savepoints.len();
        savepoints.push(snapshot);
        self.max_depth.fetch_max(depth + 1, Ordering::SeqCst);
        depth
    }

    fn release_savepoint(&self, depth: usize) {
        self.savepoints.lock().unwrap().truncate(depth);
        self.commits.fetch_add(1, Ordering::SeqCst);
    }

    fn rollback_to(&self, depth: usize) {
        let mut savepoints = self.savepoints.lock().unwrap();
        if let Some(snapshot) = savepoints.get(depth).cloned() {
            *self.state.write().unwrap() = snapshot;
        }
        savepoints.truncate(depth);
        self.rollbacks.fetch_add(1, Ordering::SeqCst);
    }
}

/// Store plus one of each adapter, wired the way a request session would be
pub struct InMemoryBackend {
    pub store: Arc<InMemoryStore>,
    pub users: Arc<InMemoryUserRepository>,
    pub todos: Arc<InMemoryTodoRepository>,
    pub subtasks: Arc<InMemorySubTaskRepository>,
    pub transactions: Arc<InMemoryTransactionManager>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            todos: Arc::new(InMemoryTodoRepository::new(store.clone())),
            subtasks: Arc::new(InMemorySubTaskRepository::new(store.clone())),
            transactions: Arc::new(InMemoryTransactionManager::new(store.clone())),
            store,
        }
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        self.store.insert_user(user);
        self
    }

    /// Pre-populate with a todo for testing
    pub fn with_todo(self, todo: Todo) -> Self {
        self.store.insert_todo(todo);
        self
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// In-Memory Transaction Manager
// ============================================================================

pub struct InMemoryTransactionManager {
    store: Arc<InMemoryStore>,
}

impl InMemoryTransactionManager {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    type Scope = InMemoryScope;

    async fn begin(&self) -> Result<InMemoryScope, DomainError> {
        let depth = self.store.push_savepoint();
        Ok(InMemoryScope {
            store: self.store.clone(),
            depth,
            finished: false,
        })
    }
}

pub struct InMemoryScope {
    store: Arc<InMemoryStore>,
    depth: usize,
    finished: bool,
}

#[async_trait]
impl TransactionScope for InMemoryScope {
    fn depth(&self) -> usize {
        self.depth
    }

    async fn commit(mut self) -> Result<(), DomainError> {
        self.finished = true;
        self.store.release_savepoint(self.depth);
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), DomainError> {
        self.finished = true;
        self.store.rollback_to(self.depth);
        Ok(())
    }
}

impl Drop for InMemoryScope {
    fn drop(&mut self) {
        if !self.finished {
            self.store.rollback_to(self.depth);
        }
    }
}

// ============================================================================
// In-Memory User Repository
// ============================================================================

pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut state = self.store.write();
        let now = Utc::now();
        let user = User {
            id: UserId(state.next_id()),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            full_name: new_user.full_name.clone(),
            role: new_user.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut state = self.store.write();
        let stored = state
            .users
            .get_mut(&user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        *stored = User {
            updated_at: Utc::now(),
            ..user.clone()
        };
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.store.read().users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .store
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .store
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<_> = self.store.read().users.values().cloned().collect();
        users.sort_by_key(|u| u.id.0);
        Ok(users)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        if self.store.fail_user_delete.swap(false, Ordering::SeqCst) {
            return Err(DomainError::DataOperation {
                operation: "UserRepository::delete",
                entity: "user",
                cause: "simulated storage failure".to_string(),
            });
        }
        Ok(self.store.write().users.remove(id).is_some())
    }

    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.store.read().users.contains_key(id))
    }
}

// ============================================================================
// In-Memory Todo Repository
// ============================================================================

pub struct InMemoryTodoRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryTodoRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, new_todo: &NewTodo) -> Result<Todo, DomainError> {
        let mut state = self.store.write();
        let now = Utc::now();
        let todo = Todo::restore(TodoRecord {
            id: TodoId(state.next_id()),
            user_id: new_todo.user_id,
            title: new_todo.title.clone(),
            description: new_todo.description.clone(),
            due_date: new_todo.due_date,
            status: new_todo.status(),
            priority: new_todo.priority,
            created_at: now,
            updated_at: now,
        });
        state.todos.insert(todo.id(), todo.clone());
        Ok(todo)
    }

    async fn update(&self, todo: &Todo) -> Result<Todo, DomainError> {
        let mut state = self.store.write();
        let stored = state
            .todos
            .get_mut(&todo.id())
            .ok_or(DomainError::TodoNotFound(todo.id()))?;
        *stored = Todo::restore(TodoRecord {
            id: todo.id(),
            user_id: todo.user_id(),
            title: todo.title().to_string(),
            description: todo.description().map(str::to_string),
            due_date: todo.due_date(),
            status: todo.status(),
            priority: todo.priority(),
            created_at: todo.created_at(),
            updated_at: Utc::now(),
        });
        Ok(stored.clone())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, DomainError> {
        Ok(self.store.read().todos.get(id).cloned())
    }

    async fn find_with_pagination(
        &self,
        user_id: &UserId,
        skip: u64,
        limit: u64,
        status: Option<TodoStatus>,
        priority: Option<TodoPriority>,
    ) -> Result<Vec<Todo>, DomainError> {
        let mut todos: Vec<_> = self
            .store
            .read()
            .todos
            .values()
            .filter(|t| t.user_id() == *user_id)
            .filter(|t| status.map_or(true, |s| t.status() == s))
            .filter(|t| priority.map_or(true, |p| t.priority() == p))
            .cloned()
            .collect();
        todos.sort_by_key(|t| t.id().0);

        Ok(todos
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn delete(&self, id: &TodoId) -> Result<bool, DomainError> {
        let mut state = self.store.write();
        state.subtasks.retain(|_, s| s.todo_id != *id);
        Ok(state.todos.remove(id).is_some())
    }

    async fn delete_all_by_user_id(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let mut state = self.store.write();
        let before = state.todos.len();
        state.todos.retain(|_, t| t.user_id() != *user_id);
        let StoreState {
            todos, subtasks, ..
        } = &mut *state;
        subtasks.retain(|_, s| todos.contains_key(&s.todo_id));
        Ok((before - todos.len()) as u64)
    }

    async fn exists(&self, id: &TodoId) -> Result<bool, DomainError> {
        Ok(self.store.read().todos.contains_key(id))
    }
}

// ============================================================================
// In-Memory SubTask Repository
// ============================================================================

pub struct InMemorySubTaskRepository {
    store: Arc<InMemoryStore>,
}

impl InMemorySubTaskRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SubTaskRepository for InMemorySubTaskRepository {
    async fn create(&self, new_subtask: &NewSubTask) -> Result<SubTask, DomainError> {
        let mut state = self.store.write();
        let now = Utc::now();
        let subtask = SubTask {
            id: SubTaskId(state.next_id()),
            user_id: new_subtask.user_id,
            todo_id: new_subtask.todo_id,
            title: new_subtask.title.clone(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        };
        state.subtasks.insert(subtask.id, subtask.clone());
        Ok(subtask)
    }

    async fn find_by_todo_id(&self, todo_id: &TodoId) -> Result<Vec<SubTask>, DomainError> {
        let mut subtasks: Vec<_> = self
            .store
            .read()
            .subtasks
            .values()
            .filter(|s| s.todo_id == *todo_id)
            .cloned()
            .collect();
        subtasks.sort_by_key(|s| s.id.0);
        Ok(subtasks)
    }
}

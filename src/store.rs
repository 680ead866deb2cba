// Todo list state management over a key-value backend

use crate::error::{Result, StoreError};
use crate::kv::KvStore;
use crate::models::Todo;
use tracing::{debug, warn};
use uuid::Uuid;

/// Fixed key the whole todo sequence is persisted under.
const STORAGE_KEY: &str = "todos";

/// Owns the canonical in-memory todo list and persists it through an
/// injected [`KvStore`] backend.
///
/// Every mutation (add, toggle, remove) snapshots the full sequence to the
/// backend. A failed save is surfaced to the caller but never rolls back the
/// in-memory change; the list and its persisted copy may diverge until the
/// next successful save.
pub struct TodoStore<S: KvStore> {
    backend: S,
    todos: Vec<Todo>,
}

impl<S: KvStore> TodoStore<S> {
    /// Create an empty store over `backend`. Call [`TodoStore::load`] once at
    /// startup to pull in any previously persisted list.
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            todos: Vec::new(),
        }
    }

    /// Add a new todo with the given title.
    ///
    /// The title is trimmed; a title that is empty after trimming fails with
    /// [`StoreError::EmptyTitle`] and leaves the list unchanged. Otherwise the
    /// new item is appended, the full sequence is persisted, and a copy of the
    /// created item is returned.
    pub fn add(&mut self, title: &str) -> Result<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let todo = Todo::new(title);
        debug!(id = %todo.id, title, "adding todo");
        self.todos.push(todo.clone());
        self.save()?;

        Ok(todo)
    }

    /// Flip the completion flag of the todo with the given id.
    ///
    /// Lookup is by id against the full sequence, never by position in a
    /// filtered view. Returns `Ok(false)` without persisting when the id is
    /// absent.
    pub fn toggle(&mut self, id: Uuid) -> Result<bool> {
        let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "toggle: id not found");
            return Ok(false);
        };

        todo.is_completed = !todo.is_completed;
        debug!(%id, is_completed = todo.is_completed, "toggled todo");
        self.save()?;

        Ok(true)
    }

    /// Remove the todo with the given id, preserving the relative order of
    /// the remaining items. Returns `Ok(false)` without persisting when the
    /// id is absent, so a repeated remove is a harmless no-op.
    pub fn remove(&mut self, id: Uuid) -> Result<bool> {
        let Some(index) = self.todos.iter().position(|t| t.id == id) else {
            debug!(%id, "remove: id not found");
            return Ok(false);
        };

        self.todos.remove(index);
        debug!(%id, "removed todo");
        self.save()?;

        Ok(true)
    }

    /// Return the todos whose title contains `filter` case-insensitively, in
    /// insertion order. An empty filter returns the full sequence.
    ///
    /// Pure read; the filter text is never stored.
    pub fn list(&self, filter: &str) -> Vec<&Todo> {
        if filter.is_empty() {
            return self.todos.iter().collect();
        }

        let needle = filter.to_lowercase();
        self.todos
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle))
            .collect()
    }

    /// Serialize the entire sequence and write it under the fixed storage key.
    pub fn save(&mut self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.todos).map_err(|e| StoreError::Save(e.into()))?;

        self.backend
            .set(STORAGE_KEY, &bytes)
            .map_err(|e| StoreError::Save(e.into()))?;

        debug!(count = self.todos.len(), "saved todos");
        Ok(())
    }

    /// Replace the in-memory sequence with the persisted one.
    ///
    /// A missing key is not an error: the list stays empty. Undecodable bytes
    /// surface [`StoreError::Load`] and leave the list empty rather than
    /// retaining partial state.
    pub fn load(&mut self) -> Result<()> {
        self.todos.clear();

        let Some(bytes) = self
            .backend
            .get(STORAGE_KEY)
            .map_err(|e| StoreError::Load(e.into()))?
        else {
            debug!("no persisted todos, starting empty");
            return Ok(());
        };

        match serde_json::from_slice(&bytes) {
            Ok(todos) => {
                self.todos = todos;
                debug!(count = self.todos.len(), "loaded todos");
                Ok(())
            }
            Err(e) => {
                warn!(error = ?e, "persisted todos are undecodable, starting empty");
                Err(StoreError::Load(e.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryKv, SqliteKv};
    use eyre::eyre;
    use tempfile::TempDir;

    fn store() -> TodoStore<MemoryKv> {
        TodoStore::new(MemoryKv::new())
    }

    #[test]
    fn test_add_appends_and_returns_trimmed_item() {
        let mut store = store();

        let todo = store.add("  Buy milk  ").unwrap();
        assert_eq!(todo.title, "Buy milk");
        assert!(!todo.is_completed);
        assert_eq!(store.list("").len(), 1);
        assert_eq!(store.list("")[0], &todo);
    }

    #[test]
    fn test_add_empty_title_fails() {
        let mut store = store();

        assert!(matches!(store.add(""), Err(StoreError::EmptyTitle)));
        assert!(matches!(store.add("   "), Err(StoreError::EmptyTitle)));
        assert!(store.list("").is_empty());
    }

    #[test]
    fn test_toggle_flips_and_is_own_inverse() {
        let mut store = store();
        let id = store.add("Walk dog").unwrap().id;

        assert!(store.toggle(id).unwrap());
        assert!(store.list("")[0].is_completed);

        assert!(store.toggle(id).unwrap());
        assert!(!store.list("")[0].is_completed);
    }

    #[test]
    fn test_toggle_absent_id_is_noop() {
        let mut store = store();
        store.add("Buy milk").unwrap();

        assert!(!store.toggle(Uuid::now_v7()).unwrap());
        assert_eq!(store.list("").len(), 1);
        assert!(!store.list("")[0].is_completed);
    }

    #[test]
    fn test_remove_preserves_order_and_is_idempotent() {
        let mut store = store();
        let a = store.add("a").unwrap().id;
        let b = store.add("b").unwrap().id;
        let c = store.add("c").unwrap().id;

        assert!(store.remove(b).unwrap());
        let titles: Vec<_> = store.list("").iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, ["a", "c"]);
        assert_eq!(store.list("")[0].id, a);
        assert_eq!(store.list("")[1].id, c);

        // Second remove of the same id is a no-op, not a crash
        assert!(!store.remove(b).unwrap());
        assert_eq!(store.list("").len(), 2);
    }

    #[test]
    fn test_list_filters_case_insensitively() {
        let mut store = store();
        store.add("Buy milk").unwrap();
        store.add("Walk dog").unwrap();
        store.add("Buy dog food").unwrap();

        let all = store.list("");
        assert_eq!(all.len(), 3);

        let hits: Vec<_> = store.list("BUY").iter().map(|t| t.title.as_str()).collect();
        assert_eq!(hits, ["Buy milk", "Buy dog food"]);

        assert!(store.list("xyz").is_empty());
    }

    #[test]
    fn test_scenario_add_toggle_list() {
        let mut store = store();
        store.add("Buy milk").unwrap();
        let walk_id = store.add("Walk dog").unwrap().id;
        store.toggle(walk_id).unwrap();

        let all = store.list("");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Buy milk");
        assert!(!all[0].is_completed);
        assert_eq!(all[1].title, "Walk dog");
        assert!(all[1].is_completed);

        let filtered = store.list("walk");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Walk dog");
        assert!(filtered[0].is_completed);
    }

    #[test]
    fn test_scenario_remove_then_list() {
        let mut store = store();
        let milk_id = store.add("Buy milk").unwrap().id;
        let walk_id = store.add("Walk dog").unwrap().id;
        store.toggle(walk_id).unwrap();

        store.remove(milk_id).unwrap();
        let all = store.list("");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Walk dog");
        assert!(all[0].is_completed);
    }

    #[test]
    fn test_roundtrip_through_sqlite_backend() {
        let temp = TempDir::new().unwrap();

        let expected = {
            let mut store = TodoStore::new(SqliteKv::open(temp.path()).unwrap());
            store.add("Buy milk").unwrap();
            let id = store.add("Walk dog").unwrap().id;
            store.toggle(id).unwrap();
            store.list("").into_iter().cloned().collect::<Vec<_>>()
        };

        // Fresh store over the same backend reproduces the sequence exactly
        let mut store = TodoStore::new(SqliteKv::open(temp.path()).unwrap());
        store.load().unwrap();
        let loaded: Vec<_> = store.list("").into_iter().cloned().collect();
        assert_eq!(loaded, expected);
    }

    #[test]
    fn test_load_missing_key_is_not_an_error() {
        let mut store = store();
        store.load().unwrap();
        assert!(store.list("").is_empty());
    }

    #[test]
    fn test_load_undecodable_bytes_fails_and_leaves_empty() {
        let mut backend = MemoryKv::new();
        backend.set("todos", b"{not json").unwrap();

        let mut store = TodoStore::new(backend);
        assert!(matches!(store.load(), Err(StoreError::Load(_))));
        assert!(store.list("").is_empty());
    }

    /// Backend that accepts nothing, for exercising save-failure semantics.
    struct FailingKv;

    impl KvStore for FailingKv {
        fn get(&self, _key: &str) -> eyre::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &[u8]) -> eyre::Result<()> {
            Err(eyre!("disk full"))
        }
    }

    #[test]
    fn test_save_failure_keeps_in_memory_mutation() {
        let mut store = TodoStore::new(FailingKv);

        let result = store.add("Buy milk");
        assert!(matches!(result, Err(StoreError::Save(_))));

        // The append is not rolled back; the list is simply unsaved.
        assert_eq!(store.list("").len(), 1);
        assert_eq!(store.list("")[0].title, "Buy milk");
    }
}

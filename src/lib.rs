// TodoStore - Persistent todo-list state management over a key-value backend

pub mod error;
pub mod kv;
pub mod models;
pub mod store;

// Re-export main types for convenience
pub use error::{Result, StoreError};
pub use kv::{KvStore, MemoryKv, SqliteKv};
pub use models::Todo;
pub use store::TodoStore;

//! Error types for the todo store.

/// Opaque cause reported by a persistence backend.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`crate::TodoStore`] operations.
///
/// Storage failures are recoverable by design: a failed save leaves the
/// in-memory list intact (simply unsaved), and a failed load leaves it empty.
/// Callers report these to the user and carry on.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo title cannot be empty")]
    EmptyTitle,

    #[error("failed to save todos")]
    Save(#[source] BackendError),

    #[error("failed to load todos")]
    Load(#[source] BackendError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StoreError>;

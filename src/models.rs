// Data model for the todo store

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task record with a title and completion flag.
///
/// The `id` is generated once at creation and never changes; it is the only
/// correlation key between list positions (which shift under filtering and
/// deletion) and persisted records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub is_completed: bool,
}

impl Todo {
    /// Create a new todo with a fresh id and `is_completed = false`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            is_completed: false,
        }
    }
}

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StateError;
use crate::key::Collection;

/// A stored document together with its revision.
///
/// Revisions start at 1 on creation and increase by one on every write.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub revision: u64,
    pub body: Value,
}

/// Result of a compare-and-swap operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasResult {
    /// The write succeeded; the document is now at `revision`.
    Ok { revision: u64 },
    /// The write was refused because the stored revision didn't match.
    /// A missing document reports revision 0.
    Conflict { current_revision: u64 },
}

/// Trait for persisting JSON documents grouped in collections.
///
/// Bodies are JSON objects. Field-level updates merge top-level keys;
/// callers that need a consistent whole-document rewrite pass every field
/// they own and guard the write with [`compare_and_swap`](Self::compare_and_swap).
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document if `id` is not taken.
    /// Returns `true` if the document was newly created.
    async fn create(
        &self,
        collection: &Collection,
        id: &str,
        body: &Value,
    ) -> Result<bool, StateError>;

    /// Get a document by id. Returns `None` if not found.
    async fn get(&self, collection: &Collection, id: &str)
    -> Result<Option<Document>, StateError>;

    /// Merge `fields` into an existing document, unconditionally.
    /// Returns the new revision, or [`StateError::NotFound`].
    async fn update(
        &self,
        collection: &Collection,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<u64, StateError>;

    /// Merge `fields` only if the stored revision equals `expected_revision`.
    async fn compare_and_swap(
        &self,
        collection: &Collection,
        id: &str,
        expected_revision: u64,
        fields: &Map<String, Value>,
    ) -> Result<CasResult, StateError>;

    /// List documents whose top-level `field` equals `value`.
    ///
    /// When the stored field is an array, a document matches if the array
    /// contains `value`. Results are ordered by id.
    async fn list_where(
        &self,
        collection: &Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StateError>;
}

/// Shared matching rule for [`DocumentStore::list_where`].
#[must_use]
pub fn field_matches(body: &Value, field: &str, value: &Value) -> bool {
    match body.get(field) {
        Some(Value::Array(items)) => items.contains(value),
        Some(stored) => stored == value,
        None => false,
    }
}

/// Merge `fields` into the object `body`, rejecting non-object bodies.
pub fn merge_fields(body: &mut Value, fields: &Map<String, Value>) -> Result<(), StateError> {
    let Value::Object(target) = body else {
        return Err(StateError::InvalidDocument(
            "document body is not a JSON object".to_owned(),
        ));
    };
    for (k, v) in fields {
        target.insert(k.clone(), v.clone());
    }
    Ok(())
}

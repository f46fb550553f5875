//! Serde helpers over [`DocumentStore`] for strongly typed records.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StateError;
use crate::key::Collection;
use crate::store::{CasResult, DocumentStore};

/// A decoded document and the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: u64,
}

/// Serialize `value` into a JSON object map.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, StateError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StateError::InvalidDocument(
            "record did not serialize to a JSON object".to_owned(),
        )),
    }
}

/// Fetch and decode a document.
pub async fn get<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &Collection,
    id: &str,
) -> Result<Option<Versioned<T>>, StateError> {
    let Some(doc) = store.get(collection, id).await? else {
        return Ok(None);
    };
    let value = serde_json::from_value(doc.body)?;
    Ok(Some(Versioned {
        value,
        revision: doc.revision,
    }))
}

/// Encode and create a document. Returns `false` if `id` already exists.
pub async fn create<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &Collection,
    id: &str,
    value: &T,
) -> Result<bool, StateError> {
    let body = Value::Object(to_fields(value)?);
    store.create(collection, id, &body).await
}

/// Rewrite every field of `value` if the document is still at `expected_revision`.
pub async fn replace_if<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: &Collection,
    id: &str,
    expected_revision: u64,
    value: &T,
) -> Result<CasResult, StateError> {
    let fields = to_fields(value)?;
    store
        .compare_and_swap(collection, id, expected_revision, &fields)
        .await
}

/// List and decode documents matching `field == value`.
pub async fn list_where<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: &Collection,
    field: &str,
    value: &Value,
) -> Result<Vec<Versioned<T>>, StateError> {
    store
        .list_where(collection, field, value)
        .await?
        .into_iter()
        .map(|doc| {
            Ok(Versioned {
                value: serde_json::from_value(doc.body)?,
                revision: doc.revision,
            })
        })
        .collect()
}

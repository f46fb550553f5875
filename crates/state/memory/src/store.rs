use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use scorecard_state::error::StateError;
use scorecard_state::key::Collection;
use scorecard_state::store::{CasResult, Document, DocumentStore, field_matches, merge_fields};

/// A single entry in the in-memory store.
#[derive(Debug, Clone)]
struct Entry {
    body: Value,
    revision: u64,
}

/// In-memory [`DocumentStore`] backed by a [`DashMap`].
///
/// Every write to a document happens under the map's shard lock for that
/// key, so revision checks and merges are atomic. This implementation is
/// fully synchronous internally; the async trait methods return
/// immediately.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    data: DashMap<String, Entry>,
}

impl MemoryDocumentStore {
    /// Create a new, empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a collection and id into the string used as the map key.
    fn render_key(collection: &Collection, id: &str) -> String {
        collection.path(id)
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(
        &self,
        collection: &Collection,
        id: &str,
        body: &Value,
    ) -> Result<bool, StateError> {
        if !body.is_object() {
            return Err(StateError::InvalidDocument(format!(
                "{} must be a JSON object",
                collection.path(id)
            )));
        }

        // Use `entry` API for atomicity: only insert if vacant.
        let was_inserted = match self.data.entry(Self::render_key(collection, id)) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(Entry {
                    body: body.clone(),
                    revision: 1,
                });
                true
            }
        };

        Ok(was_inserted)
    }

    async fn get(
        &self,
        collection: &Collection,
        id: &str,
    ) -> Result<Option<Document>, StateError> {
        Ok(self
            .data
            .get(&Self::render_key(collection, id))
            .map(|entry| Document {
                id: id.to_owned(),
                revision: entry.revision,
                body: entry.body.clone(),
            }))
    }

    async fn update(
        &self,
        collection: &Collection,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<u64, StateError> {
        let rendered = Self::render_key(collection, id);
        let mut entry = self
            .data
            .get_mut(&rendered)
            .ok_or_else(|| StateError::NotFound(rendered.clone()))?;

        merge_fields(&mut entry.body, fields)?;
        entry.revision += 1;
        Ok(entry.revision)
    }

    async fn compare_and_swap(
        &self,
        collection: &Collection,
        id: &str,
        expected_revision: u64,
        fields: &Map<String, Value>,
    ) -> Result<CasResult, StateError> {
        let Some(mut entry) = self.data.get_mut(&Self::render_key(collection, id)) else {
            return Ok(CasResult::Conflict {
                current_revision: 0,
            });
        };

        if entry.revision != expected_revision {
            return Ok(CasResult::Conflict {
                current_revision: entry.revision,
            });
        }

        merge_fields(&mut entry.body, fields)?;
        entry.revision += 1;
        Ok(CasResult::Ok {
            revision: entry.revision,
        })
    }

    async fn list_where(
        &self,
        collection: &Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StateError> {
        let prefix = Self::render_key(collection, "");
        let mut docs: Vec<Document> = self
            .data
            .iter()
            .filter_map(|item| {
                let id = item.key().strip_prefix(&prefix)?;
                field_matches(&item.value().body, field, value).then(|| Document {
                    id: id.to_owned(),
                    revision: item.value().revision,
                    body: item.value().body.clone(),
                })
            })
            .collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(docs)
    }
}

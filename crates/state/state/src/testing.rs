use serde_json::{Map, Value, json};

use crate::error::StateError;
use crate::key::Collection;
use crate::store::{CasResult, DocumentStore};

fn test_collection() -> Collection {
    Collection::Custom("conformance".to_owned())
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Run the full document store conformance test suite.
///
/// Call this from your backend's test module with a fresh store instance.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_store_conformance_tests(store: &dyn DocumentStore) -> Result<(), StateError> {
    test_get_missing(store).await?;
    test_create_and_get(store).await?;
    test_create_existing(store).await?;
    test_update_merges(store).await?;
    test_update_missing(store).await?;
    test_compare_and_swap(store).await?;
    test_list_where(store).await?;
    Ok(())
}

async fn test_get_missing(store: &dyn DocumentStore) -> Result<(), StateError> {
    let doc = store.get(&test_collection(), "missing").await?;
    assert!(doc.is_none(), "get on missing document should return None");
    Ok(())
}

async fn test_create_and_get(store: &dyn DocumentStore) -> Result<(), StateError> {
    let c = test_collection();
    let created = store.create(&c, "create-get", &json!({"name": "a"})).await?;
    assert!(created, "create on new id should return true");

    let doc = store.get(&c, "create-get").await?.expect("document should exist");
    assert_eq!(doc.id, "create-get");
    assert_eq!(doc.revision, 1, "new documents start at revision 1");
    assert_eq!(doc.body, json!({"name": "a"}));
    Ok(())
}

async fn test_create_existing(store: &dyn DocumentStore) -> Result<(), StateError> {
    let c = test_collection();
    store.create(&c, "create-existing", &json!({"v": 1})).await?;
    let created = store.create(&c, "create-existing", &json!({"v": 2})).await?;
    assert!(!created, "create on existing id should return false");

    let doc = store.get(&c, "create-existing").await?.expect("document should exist");
    assert_eq!(doc.body, json!({"v": 1}), "original body should remain");
    Ok(())
}

async fn test_update_merges(store: &dyn DocumentStore) -> Result<(), StateError> {
    let c = test_collection();
    store.create(&c, "update", &json!({"a": 1, "b": 2})).await?;
    let revision = store.update(&c, "update", &fields(json!({"b": 3, "c": 4}))).await?;
    assert_eq!(revision, 2);

    let doc = store.get(&c, "update").await?.expect("document should exist");
    assert_eq!(doc.body, json!({"a": 1, "b": 3, "c": 4}));
    assert_eq!(doc.revision, 2);
    Ok(())
}

async fn test_update_missing(store: &dyn DocumentStore) -> Result<(), StateError> {
    let result = store
        .update(&test_collection(), "update-missing", &fields(json!({"a": 1})))
        .await;
    assert!(
        matches!(result, Err(StateError::NotFound(_))),
        "update on missing document should be NotFound"
    );
    Ok(())
}

async fn test_compare_and_swap(store: &dyn DocumentStore) -> Result<(), StateError> {
    let c = test_collection();
    store.create(&c, "cas", &json!({"v": "initial"})).await?;

    // CAS with wrong revision should fail
    let result = store
        .compare_and_swap(&c, "cas", 999, &fields(json!({"v": "lost"})))
        .await?;
    assert_eq!(
        result,
        CasResult::Conflict {
            current_revision: 1
        },
        "CAS with wrong revision should conflict"
    );

    // CAS with correct revision should succeed
    let result = store
        .compare_and_swap(&c, "cas", 1, &fields(json!({"v": "updated"})))
        .await?;
    assert_eq!(result, CasResult::Ok { revision: 2 });

    // The old revision is now stale
    let result = store
        .compare_and_swap(&c, "cas", 1, &fields(json!({"v": "stale"})))
        .await?;
    assert!(matches!(result, CasResult::Conflict { .. }));

    let doc = store.get(&c, "cas").await?.expect("document should exist");
    assert_eq!(doc.body, json!({"v": "updated"}));

    // CAS on a missing document reports revision 0
    let result = store
        .compare_and_swap(&c, "cas-missing", 0, &fields(json!({"v": 1})))
        .await?;
    assert_eq!(
        result,
        CasResult::Conflict {
            current_revision: 0
        }
    );
    Ok(())
}

async fn test_list_where(store: &dyn DocumentStore) -> Result<(), StateError> {
    let c = Collection::Custom("conformance-list".to_owned());
    store
        .create(&c, "l-2", &json!({"owner": "u-1", "jury": ["j-1"]}))
        .await?;
    store
        .create(&c, "l-1", &json!({"owner": "u-1", "jury": ["j-2"]}))
        .await?;
    store
        .create(&c, "l-3", &json!({"owner": "u-2", "jury": ["j-1", "j-2"]}))
        .await?;

    let owned = store.list_where(&c, "owner", &json!("u-1")).await?;
    let ids: Vec<_> = owned.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["l-1", "l-2"], "results should be ordered by id");

    let judged = store.list_where(&c, "jury", &json!("j-1")).await?;
    let ids: Vec<_> = judged.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["l-2", "l-3"], "array fields match by membership");

    let none = store.list_where(&c, "owner", &json!("nobody")).await?;
    assert!(none.is_empty());
    Ok(())
}

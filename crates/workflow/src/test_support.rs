//! Fixtures shared by the workflow unit tests.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};

use scorecard_blob::MemoryBlobStore;
use scorecard_core::{
    Assignment, AssignmentId, IndicatorId, Notice, Role, User, UserId, VerificationMethod,
    compute_overall_status,
};
use scorecard_notify::{NotificationDispatcher, NotifyError};
use scorecard_state::typed;
use scorecard_state::{CasResult, Collection, Document, DocumentStore, StateError};
use scorecard_state_memory::MemoryDocumentStore;

use crate::policy::UploadPolicy;
use crate::service::EvidenceService;
use crate::upload::UploadRequest;

pub(crate) const ASSIGNMENT: &str = "asg-1";

#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    pub calls: Mutex<Vec<(BTreeSet<UserId>, Notice)>>,
    pub fail: AtomicBool,
}

impl RecordingDispatcher {
    pub fn calls(&self) -> Vec<(BTreeSet<UserId>, Notice)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn notify(
        &self,
        recipients: &BTreeSet<UserId>,
        notice: &Notice,
    ) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push((recipients.clone(), notice.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Connection("smtp down".into()));
        }
        Ok(())
    }
}

/// Delegates to a memory store but can be told to fail or race writes.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub inner: MemoryDocumentStore,
    pub fail_writes: AtomicBool,
    /// Bump the revision behind the caller's back before the next CAS.
    pub race_next_write: AtomicBool,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn create(
        &self,
        collection: &Collection,
        id: &str,
        body: &Value,
    ) -> Result<bool, StateError> {
        self.inner.create(collection, id, body).await
    }

    async fn get(
        &self,
        collection: &Collection,
        id: &str,
    ) -> Result<Option<Document>, StateError> {
        self.inner.get(collection, id).await
    }

    async fn update(
        &self,
        collection: &Collection,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<u64, StateError> {
        self.inner.update(collection, id, fields).await
    }

    async fn compare_and_swap(
        &self,
        collection: &Collection,
        id: &str,
        expected_revision: u64,
        fields: &Map<String, Value>,
    ) -> Result<CasResult, StateError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StateError::Connection("database unavailable".into()));
        }
        if self.race_next_write.swap(false, Ordering::SeqCst) {
            self.inner.update(collection, id, &Map::new()).await?;
        }
        self.inner
            .compare_and_swap(collection, id, expected_revision, fields)
            .await
    }

    async fn list_where(
        &self,
        collection: &Collection,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StateError> {
        self.inner.list_where(collection, field, value).await
    }
}

pub(crate) struct Fixture {
    pub service: EvidenceService,
    pub store: Arc<FlakyStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub dispatcher: Arc<RecordingDispatcher>,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_policy(UploadPolicy::default()).await
    }

    pub async fn with_policy(policy: UploadPolicy) -> Self {
        let store = Arc::new(FlakyStore::default());
        let blobs = Arc::new(MemoryBlobStore::new());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let service = EvidenceService::builder()
            .store(store.clone())
            .blobs(blobs.clone())
            .dispatcher(dispatcher.clone())
            .policy(policy)
            .build()
            .unwrap();

        for (id, name, role) in [
            ("ana", "Ana Ruiz", Role::Responsable),
            ("mallory", "Mallory", Role::Responsable),
            ("luis", "Luis", Role::Calificador),
            ("eva", "Eva", Role::Calificador),
        ] {
            service
                .create_user(User {
                    id: UserId::new(id),
                    name: name.into(),
                    email: None,
                    role,
                })
                .await
                .unwrap();
        }

        Self {
            service,
            store,
            blobs,
            dispatcher,
        }
    }

    /// Store an assignment owned by `ana` with jury `luis` and `eva`.
    pub async fn seed(&self, methods: Vec<VerificationMethod>) {
        let assignment = Assignment {
            id: AssignmentId::new(ASSIGNMENT),
            user_id: UserId::new("ana"),
            indicator_id: IndicatorId::new("ind-7"),
            jury: BTreeSet::from([UserId::new("luis"), UserId::new("eva")]),
            overall_status: compute_overall_status(&methods),
            assigned_verification_methods: methods,
        };
        assert!(
            typed::create(
                self.store.as_ref(),
                &Collection::Assignments,
                ASSIGNMENT,
                &assignment
            )
            .await
            .unwrap()
        );
    }

    pub async fn stored(&self) -> typed::Versioned<Assignment> {
        typed::get(self.store.as_ref(), &Collection::Assignments, ASSIGNMENT)
            .await
            .unwrap()
            .unwrap()
    }
}

pub(crate) fn request(method: &str) -> UploadRequest {
    UploadRequest {
        assignment_id: AssignmentId::new(ASSIGNMENT),
        method_name: method.into(),
        user_id: UserId::new("ana"),
        original_name: "Acta Final.pdf".into(),
        content_type: "application/pdf".into(),
        data: Bytes::from_static(b"%PDF-1.7 evidence"),
    }
}

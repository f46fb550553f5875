//! Users, assignments and their read views.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use scorecard_core::{
    Assignment, AssignmentId, IndicatorId, MethodStatus, User, UserId, VerificationMethod,
    compute_overall_status, effective_status,
};
use scorecard_state::Collection;
use scorecard_state::typed::{self, Versioned};

use crate::error::WorkflowError;
use crate::service::EvidenceService;

/// A verification method to create on a new assignment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewMethod {
    pub name: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Request to assign an indicator to a responsible user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewAssignment {
    /// Generated when absent.
    #[serde(default)]
    pub id: Option<AssignmentId>,
    pub user_id: UserId,
    pub indicator_id: IndicatorId,
    #[serde(default)]
    pub jury: BTreeSet<UserId>,
    #[serde(default)]
    pub verification_methods: Vec<NewMethod>,
}

/// An assignment as shown to clients: the stored record plus the status
/// each method displays at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub revision: u64,
    /// Method name to displayed status; `Pending` past due shows `Overdue`.
    pub effective_statuses: BTreeMap<String, MethodStatus>,
}

impl AssignmentView {
    pub fn new(versioned: Versioned<Assignment>, now: DateTime<Utc>) -> Self {
        let effective_statuses = versioned
            .value
            .assigned_verification_methods
            .iter()
            .map(|m| (m.name.clone(), effective_status(m, now)))
            .collect();
        Self {
            assignment: versioned.value,
            revision: versioned.revision,
            effective_statuses,
        }
    }
}

impl EvidenceService {
    /// Register a user. Fails with `AlreadyExists` on a duplicate id.
    pub async fn create_user(&self, user: User) -> Result<User, WorkflowError> {
        if user.id.as_str().trim().is_empty() {
            return Err(WorkflowError::Validation("user id is required".to_owned()));
        }
        if user.name.trim().is_empty() {
            return Err(WorkflowError::Validation("user name is required".to_owned()));
        }
        if !typed::create(self.store.as_ref(), &Collection::Users, user.id.as_str(), &user).await? {
            return Err(WorkflowError::AlreadyExists(format!("user {}", user.id)));
        }
        info!(user_id = %user.id, role = ?user.role, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: &UserId) -> Result<User, WorkflowError> {
        self.load_user(id).await
    }

    /// Create an assignment with every method `Pending`.
    ///
    /// The owner and every juror must exist and method names must be
    /// unique.
    pub async fn create_assignment(
        &self,
        request: NewAssignment,
        now: DateTime<Utc>,
    ) -> Result<AssignmentView, WorkflowError> {
        let mut seen = HashSet::new();
        for method in &request.verification_methods {
            if method.name.trim().is_empty() {
                return Err(WorkflowError::Validation(
                    "verification method name is required".to_owned(),
                ));
            }
            if !seen.insert(method.name.as_str()) {
                return Err(WorkflowError::Validation(format!(
                    "duplicate verification method '{}'",
                    method.name
                )));
            }
        }

        self.load_user(&request.user_id).await?;
        for juror in &request.jury {
            self.load_user(juror).await?;
        }

        let id = request
            .id
            .unwrap_or_else(|| AssignmentId::new(uuid::Uuid::now_v7().to_string()));
        let methods: Vec<VerificationMethod> = request
            .verification_methods
            .into_iter()
            .map(|m| VerificationMethod::new(m.name, m.due_date))
            .collect();
        let assignment = Assignment {
            overall_status: compute_overall_status(&methods),
            id,
            user_id: request.user_id,
            indicator_id: request.indicator_id,
            jury: request.jury,
            assigned_verification_methods: methods,
        };

        if !typed::create(
            self.store.as_ref(),
            &Collection::Assignments,
            assignment.id.as_str(),
            &assignment,
        )
        .await?
        {
            return Err(WorkflowError::AlreadyExists(format!(
                "assignment {}",
                assignment.id
            )));
        }
        info!(
            assignment_id = %assignment.id,
            owner = %assignment.user_id,
            methods = assignment.assigned_verification_methods.len(),
            "assignment created"
        );

        Ok(AssignmentView::new(
            Versioned {
                value: assignment,
                revision: 1,
            },
            now,
        ))
    }

    pub async fn assignment_view(
        &self,
        id: &AssignmentId,
        now: DateTime<Utc>,
    ) -> Result<AssignmentView, WorkflowError> {
        Ok(AssignmentView::new(self.load_assignment(id).await?, now))
    }

    /// Assignments owned by `user`.
    pub async fn assignments_for_owner(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<AssignmentView>, WorkflowError> {
        self.assignments_where("userId", user, now).await
    }

    /// Assignments where `user` sits on the jury.
    pub async fn assignments_for_juror(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<AssignmentView>, WorkflowError> {
        self.assignments_where("jury", user, now).await
    }

    async fn assignments_where(
        &self,
        field: &str,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Vec<AssignmentView>, WorkflowError> {
        let found = typed::list_where::<Assignment>(
            self.store.as_ref(),
            &Collection::Assignments,
            field,
            &Value::String(user.to_string()),
        )
        .await?;
        Ok(found
            .into_iter()
            .map(|v| AssignmentView::new(v, now))
            .collect())
    }
}

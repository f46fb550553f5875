use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use scorecard_core::{
    Assignment, AssignmentId, MethodStatus, Notice, Review, UserId, apply_review,
};
use scorecard_state::typed::Versioned;

use crate::error::WorkflowError;
use crate::service::EvidenceService;

/// Result of a successful review.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReviewOutcome {
    /// The method's status after the review.
    pub method_status: MethodStatus,
    pub assignment: Assignment,
    /// Whether the assignment owner was notified.
    pub owner_notified: bool,
}

impl EvidenceService {
    /// Apply a juror's decision to one verification method and tell the
    /// assignment owner about it.
    #[instrument(
        skip_all,
        fields(assignment_id = %assignment_id, method = %method_name, reviewer = %reviewer_id)
    )]
    pub async fn review(
        &self,
        assignment_id: &AssignmentId,
        method_name: &str,
        reviewer_id: &UserId,
        review: Review,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, WorkflowError> {
        let reviewer = self.load_user(reviewer_id).await?;
        let Versioned {
            value: mut assignment,
            revision,
        } = self.load_assignment(assignment_id).await?;

        let decision = review.decision;
        let (method_status, transition) =
            apply_review(&mut assignment, method_name, &reviewer.id, review, now)?;
        self.persist_methods(&assignment, revision).await?;
        self.metrics.increment_reviews();

        info!(
            ?decision,
            method_status = method_status.as_str(),
            overall_status = transition.current.as_str(),
            "method reviewed"
        );

        let owner = BTreeSet::from([assignment.user_id.clone()]);
        let owner_notified = self
            .announce(
                &owner,
                Notice::reviewed(
                    assignment.id.clone(),
                    reviewer.name.clone(),
                    method_name,
                    method_status,
                ),
            )
            .await;

        Ok(ReviewOutcome {
            method_status,
            assignment,
            owner_notified,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use scorecard_core::{
        NoticeKind, OverallStatus, ReviewDecision, ReviewDenied, VerificationMethod,
    };

    use super::*;
    use crate::test_support::{ASSIGNMENT, Fixture, request};

    fn asg() -> AssignmentId {
        AssignmentId::new(ASSIGNMENT)
    }

    async fn submitted(fx: &Fixture, names: &[&str]) {
        fx.seed(names.iter().map(|n| VerificationMethod::new(*n, None)).collect())
            .await;
        for name in names {
            fx.service.upload(request(name), Utc::now()).await.unwrap();
        }
    }

    #[tokio::test]
    async fn approving_every_method_approves_assignment_and_tells_owner() {
        let fx = Fixture::new().await;
        submitted(&fx, &["acta", "informe"]).await;

        let luis = UserId::new("luis");
        let first = fx
            .service
            .review(&asg(), "acta", &luis, Review::new(ReviewDecision::Approve), Utc::now())
            .await
            .unwrap();
        assert_eq!(first.method_status, MethodStatus::Approved);
        assert_eq!(first.assignment.overall_status, OverallStatus::Submitted);

        let mut review = Review::new(ReviewDecision::Approve);
        review.notes = Some("complete".into());
        let second = fx
            .service
            .review(&asg(), "informe", &UserId::new("eva"), review, Utc::now())
            .await
            .unwrap();
        assert_eq!(second.assignment.overall_status, OverallStatus::Approved);
        assert!(second.owner_notified);

        let stored = fx.stored().await.value;
        assert_eq!(stored.overall_status, OverallStatus::Approved);
        assert_eq!(
            stored.method("informe").unwrap().notes.as_deref(),
            Some("complete")
        );

        let calls = fx.dispatcher.calls();
        let (recipients, notice) = calls.last().unwrap();
        assert!(recipients.contains(&UserId::new("ana")));
        assert_eq!(recipients.len(), 1);
        assert_eq!(notice.kind, NoticeKind::MethodReviewed);
        assert_eq!(notice.method_status, Some(MethodStatus::Approved));
        assert_eq!(fx.service.metrics().snapshot().reviews, 2);
    }

    #[tokio::test]
    async fn rejection_dominates_overall_status() {
        let fx = Fixture::new().await;
        submitted(&fx, &["acta", "informe"]).await;

        let outcome = fx
            .service
            .review(
                &asg(),
                "acta",
                &UserId::new("luis"),
                Review::new(ReviewDecision::Reject),
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(outcome.assignment.overall_status, OverallStatus::Rejected);
    }

    #[tokio::test]
    async fn non_jurors_cannot_review() {
        let fx = Fixture::new().await;
        submitted(&fx, &["acta"]).await;

        let err = fx
            .service
            .review(
                &asg(),
                "acta",
                &UserId::new("mallory"),
                Review::new(ReviewDecision::Approve),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ReviewDenied(ReviewDenied::NotJuror(_))));
        assert_eq!(fx.stored().await.value.overall_status, OverallStatus::Submitted);
    }

    #[tokio::test]
    async fn pending_method_cannot_be_approved() {
        let fx = Fixture::new().await;
        fx.seed(vec![VerificationMethod::new("acta", None)]).await;

        let err = fx
            .service
            .review(
                &asg(),
                "acta",
                &UserId::new("luis"),
                Review::new(ReviewDecision::Approve),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::ReviewDenied(ReviewDenied::NotSubmitted(MethodStatus::Pending))
        ));
        assert_eq!(fx.stored().await.revision, 1);
    }

    #[tokio::test]
    async fn reset_with_new_deadline_allows_late_resubmission() {
        let fx = Fixture::new().await;
        let mut acta = VerificationMethod::new("acta", Some(Utc::now() - Duration::days(1)));
        acta.status = MethodStatus::Rejected;
        fx.seed(vec![acta]).await;

        let mut review = Review::new(ReviewDecision::Reset);
        review.due_date = Some(Utc::now() + Duration::days(2));
        let outcome = fx
            .service
            .review(&asg(), "acta", &UserId::new("luis"), review, Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome.method_status, MethodStatus::Pending);

        fx.service.upload(request("acta"), Utc::now()).await.unwrap();
    }

    #[tokio::test]
    async fn reset_past_due_without_new_deadline_is_denied() {
        let fx = Fixture::new().await;
        let due = Utc::now() - Duration::days(2);
        let mut acta = VerificationMethod::new("acta", Some(due));
        acta.status = MethodStatus::Rejected;
        fx.seed(vec![acta]).await;
        let before = fx.stored().await;

        let err = fx
            .service
            .review(
                &asg(),
                "acta",
                &UserId::new("luis"),
                Review::new(ReviewDecision::Reset),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::ReviewDenied(ReviewDenied::DeadlineRequired { due_date }) if due_date == due
        ));
        assert_eq!(err.kind(), "deadline_required");

        let after = fx.stored().await;
        assert_eq!(after.revision, before.revision);
        assert_eq!(after.value, before.value);
        assert!(fx.dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_reviewer_is_not_found() {
        let fx = Fixture::new().await;
        submitted(&fx, &["acta"]).await;

        let err = fx
            .service
            .review(
                &asg(),
                "acta",
                &UserId::new("ghost"),
                Review::new(ReviewDecision::Approve),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound { kind: "user", .. }));
    }
}

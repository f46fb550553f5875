use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::status::MethodStatus;

/// Reasons an evidence upload is refused before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadDenied {
    /// The assignment has no method with this name.
    #[error("verification method not found: {0}")]
    MethodNotFound(String),

    /// The method's deadline passed while it was still unresolved.
    #[error("deadline passed at {due_date}")]
    DeadlinePassed { due_date: DateTime<Utc> },

    /// The method is not open for uploads in its current status.
    #[error("method is {0}; uploads require pending or overdue")]
    InvalidState(MethodStatus),

    /// Only the assignment's owner may upload evidence.
    #[error("user {0} does not own this assignment")]
    NotOwner(String),
}

/// Reasons a jury review action is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewDenied {
    #[error("verification method not found: {0}")]
    MethodNotFound(String),

    /// The reviewer is not on the assignment's jury.
    #[error("user {0} is not a juror for this assignment")]
    NotJuror(String),

    /// Approve and reject need submitted evidence.
    #[error("method is {0}; only submitted evidence can be reviewed")]
    NotSubmitted(MethodStatus),

    /// Reset on a method that already accepts uploads.
    #[error("method is already open for uploads ({0})")]
    AlreadyOpen(MethodStatus),

    /// Reset would reopen a method whose deadline has already passed.
    #[error("due date {due_date} has passed; reset needs a future due date")]
    DeadlineRequired { due_date: DateTime<Utc> },
}

//! Upload admission rules for a verification method.

use chrono::{DateTime, Utc};

use crate::error::UploadDenied;
use crate::model::VerificationMethod;

/// Decide whether `method` may accept a new evidence file at `now`.
///
/// Rules, in order: an unresolved method past its due date is
/// `DeadlinePassed` (finalized methods are never blocked by their own
/// deadline); a method that is not `Pending` or `Overdue` is
/// `InvalidState`.
pub fn can_upload(method: &VerificationMethod, now: DateTime<Utc>) -> Result<(), UploadDenied> {
    if let Some(due_date) = method.due_date
        && now > due_date
        && !method.status.is_finalized()
    {
        return Err(UploadDenied::DeadlinePassed { due_date });
    }

    if !method.status.accepts_uploads() {
        return Err(UploadDenied::InvalidState(method.status));
    }

    Ok(())
}

/// Find `name` among `methods` and run [`can_upload`] on it.
pub fn check_upload<'a>(
    methods: &'a [VerificationMethod],
    name: &str,
    now: DateTime<Utc>,
) -> Result<&'a VerificationMethod, UploadDenied> {
    let method = methods
        .iter()
        .find(|m| m.name == name)
        .ok_or_else(|| UploadDenied::MethodNotFound(name.to_owned()))?;
    can_upload(method, now)?;
    Ok(method)
}

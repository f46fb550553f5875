pub mod error;
pub mod gate;
pub mod lifecycle;
pub mod model;
pub mod notification;
pub mod path;
pub mod status;
pub mod types;

pub use error::{ReviewDenied, UploadDenied};
pub use gate::{can_upload, check_upload};
pub use lifecycle::{Review, ReviewDecision, StatusTransition, apply_review, apply_upload};
pub use model::{Assignment, EvidenceFile, Role, User, VerificationMethod};
pub use notification::{Notice, NoticeKind, Notification};
pub use path::{evidence_url, is_safe_relative_path, sanitize_segment};
pub use status::{MethodStatus, OverallStatus, compute_overall_status, effective_status};
pub use types::{AssignmentId, IndicatorId, NotificationId, UserId};

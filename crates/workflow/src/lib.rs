pub mod builder;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod records;
pub mod review;
pub mod service;
pub mod upload;

pub use builder::EvidenceServiceBuilder;
pub use error::WorkflowError;
pub use metrics::{MetricsSnapshot, WorkflowMetrics};
pub use policy::UploadPolicy;
pub use records::{AssignmentView, NewAssignment, NewMethod};
pub use review::ReviewOutcome;
pub use service::EvidenceService;
pub use upload::{UploadOutcome, UploadRequest};

#[cfg(test)]
mod test_support;

//! Request-level upload constraints checked before anything is stored.

use crate::error::WorkflowError;

/// Default size limit: 20 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Size and content-type limits applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: u64,
    /// Accepted MIME types. Empty accepts any type.
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_content_types: Vec::new(),
        }
    }
}

impl UploadPolicy {
    /// Check `size` and `content_type` against the policy.
    ///
    /// Content types are compared case-insensitively and ignore parameters
    /// such as `; charset=...`.
    pub fn check(&self, size: u64, content_type: &str) -> Result<(), WorkflowError> {
        if size > self.max_bytes {
            return Err(WorkflowError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        if self.allowed_content_types.is_empty() {
            return Ok(());
        }
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if self
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&essence))
        {
            Ok(())
        } else {
            Err(WorkflowError::Validation(format!(
                "content type '{content_type}' is not accepted"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_only() -> UploadPolicy {
        UploadPolicy {
            max_bytes: 10,
            allowed_content_types: vec!["application/pdf".into()],
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(pdf_only().check(10, "application/pdf").is_ok());
        assert!(matches!(
            pdf_only().check(11, "application/pdf"),
            Err(WorkflowError::TooLarge { size: 11, limit: 10 })
        ));
    }

    #[test]
    fn content_type_ignores_case_and_parameters() {
        assert!(pdf_only().check(1, "Application/PDF; name=x").is_ok());
        assert!(matches!(
            pdf_only().check(1, "image/png"),
            Err(WorkflowError::Validation(_))
        ));
    }

    #[test]
    fn empty_allow_list_accepts_anything() {
        assert!(UploadPolicy::default().check(1, "image/png").is_ok());
    }
}

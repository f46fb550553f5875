use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype_string {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[cfg_attr(feature = "openapi", schema(value_type = String))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the inner string as a str slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(UserId, "Identifies a user (owner, jury member or assigner).");
newtype_string!(AssignmentId, "A unique assigned-indicator identifier.");
newtype_string!(IndicatorId, "Identifies an institutional indicator.");
newtype_string!(NotificationId, "A unique notification identifier.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_from_str() {
        let id = UserId::from("u-1");
        assert_eq!(id.as_str(), "u-1");
        assert_eq!(&*id, "u-1");
    }

    #[test]
    fn newtype_serializes_as_plain_string() {
        let id = AssignmentId::new("asg-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"asg-123\"");
        let back: AssignmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn newtype_ordering_follows_string_order() {
        let mut ids = vec![UserId::new("b"), UserId::new("a"), UserId::new("c")];
        ids.sort();
        assert_eq!(ids, vec![UserId::new("a"), UserId::new("b"), UserId::new("c")]);
    }
}

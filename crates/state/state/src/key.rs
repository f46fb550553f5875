use serde::{Deserialize, Serialize};

/// A named collection of documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Users,
    /// Assigned indicators with their verification methods.
    Assignments,
    Notifications,
    Custom(String),
}

impl Collection {
    /// Return a string representation of the collection.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Users => "users",
            Self::Assignments => "assignments",
            Self::Notifications => "notifications",
            Self::Custom(s) => s.as_str(),
        }
    }

    /// Canonical `collection/id` path of a document in this collection.
    #[must_use]
    pub fn path(&self, id: &str) -> String {
        format!("{}/{id}", self.as_str())
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
